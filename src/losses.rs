use crate::{mean, FitError, FitResult};

/// Per-row squared error (label - prediction)^2.
pub fn squared_errors(predictions: &[f64], labels: &[f64]) -> Vec<f64> {
    let mut o = Vec::with_capacity(predictions.len());
    for (pred, label) in predictions.iter().zip(labels) {
        let diff = label - pred;
        o.push(diff * diff);
    }
    o
}

/// Mean squared error over aligned prediction and label slices.
pub fn mean_squared_error(predictions: &[f64], labels: &[f64]) -> FitResult<f64> {
    if predictions.len() != labels.len() {
        return Err(FitError::SchemaMismatch {
            expected: format!("{} labels", predictions.len()),
            got: format!("{} labels", labels.len()),
        });
    }
    if predictions.is_empty() {
        return Err(FitError::EmptyDataset);
    }
    let errors = squared_errors(predictions, labels);
    Ok(mean(&errors))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_squared_error() {
        let predictions = vec![0., 1., 0., 1.];
        let labels = vec![0.5, 0.5, 0.5, 0.5];
        assert_eq!(mean_squared_error(&predictions, &labels), Ok(0.25));
    }

    #[test]
    fn test_perfect_predictions() {
        let labels = vec![0., 1., 1., 0., 1.];
        assert_eq!(mean_squared_error(&labels, &labels), Ok(0.));
    }

    #[test]
    fn test_length_mismatch() {
        let err = mean_squared_error(&[0., 1.], &[0.]);
        assert_eq!(
            err,
            Err(FitError::SchemaMismatch {
                expected: "2 labels".to_string(),
                got: "1 labels".to_string(),
            })
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(mean_squared_error(&[], &[]), Err(FitError::EmptyDataset));
    }
}
