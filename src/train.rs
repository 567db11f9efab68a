use std::time::Instant;

use log::{debug, info};
use rand::Rng;
use rayon::prelude::*;

use crate::{
    clip, dot, init_fixed, init_uniform, mean_squared_error, ColumnMajorMatrix, EncodedDataset,
    FitError, FitResult, LinearModel, Model, ModelKind, TrainConfig, TwoLayerModel,
};

/// Trained model together with the loss and iteration count reported by
/// its descent loop.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FitReport {
    pub model: Model,
    pub loss: f64,
    pub iterations: usize,
}

/// Fit the configured model on an encoded dataset.
pub fn fit(data: &EncodedDataset, config: &TrainConfig, rng: &mut impl Rng) -> FitResult<FitReport> {
    if data.n_rows() == 0 {
        return Err(FitError::EmptyDataset);
    }
    let labels = match &data.labels {
        Some(labels) => labels,
        None => {
            return Err(FitError::MissingColumn {
                column: config.label.clone(),
            });
        }
    };

    let start = Instant::now();
    let report = match config.model {
        ModelKind::Linear => fit_linear(data, labels, config, rng),
        ModelKind::TwoLayerAdditive => fit_two_layer(data, labels, config, rng),
    }?;
    info!(
        "Trained on {} rows x {} features in {:.03}s, loss {}",
        data.n_rows(),
        data.schema.len(),
        start.elapsed().as_nanos() as f64 / 1_000_000_000.,
        report.loss,
    );
    Ok(report)
}

/// Full batch gradient descent on the mean squared error of the linear
/// model, with analytic partial derivatives.
fn fit_linear(
    data: &EncodedDataset,
    labels: &[f64],
    config: &TrainConfig,
    rng: &mut impl Rng,
) -> FitResult<FitReport> {
    let mut params = match &config.hard_params {
        Some(named) => init_fixed(&data.schema, named)?,
        None => init_uniform(&data.schema, 0., 0.01, rng),
    };

    let mut loss = mean_squared_error(&predict_linear(&params, &data.features), labels)?;
    for iteration in 0..config.iterations {
        let predictions = predict_linear(&params, &data.features);
        // The reported loss is the one measured before the latest update
        loss = mean_squared_error(&predictions, labels)?;
        if iteration % 1000 == 0 {
            debug!("Iteration {}: loss {}", iteration, loss);
        }
        let partials = partial_derivatives(&predictions, labels, &data.features);
        for (param, partial) in params.iter_mut().zip(&partials) {
            *param -= config.learning_rate * partial;
        }
    }

    Ok(FitReport {
        model: Model::Linear(LinearModel {
            schema: data.schema.clone(),
            params,
        }),
        loss,
        iterations: config.iterations,
    })
}

/// d(mse)/d(param_j) = -2/n * sum((label - prediction) * feature_j) over
/// the rows, one entry per feature column.
fn partial_derivatives(
    predictions: &[f64],
    labels: &[f64],
    features: &ColumnMajorMatrix<f64>,
) -> Vec<f64> {
    let n_rows = predictions.len() as f64;
    (0..features.n_cols())
        .into_par_iter()
        .map(|j| {
            let column = features.column(j);
            // Fixed row order inside each column keeps the sums identical
            // from run to run
            let mut acc = 0.;
            for i in 0..predictions.len() {
                acc += (labels[i] - predictions[i]) * column[i];
            }
            -2. / n_rows * acc
        })
        .collect()
}

/// Fixed step descent on a scalar trajectory.
///
/// Each iteration invokes the objective once at the current position, takes
/// delta = step * objective value, stops when |delta| falls under
/// stop_threshold, and otherwise moves x down by delta. Returns the number
/// of objective evaluations.
fn descend(
    mut objective: impl FnMut(f64) -> FitResult<f64>,
    step: f64,
    stop_threshold: f64,
    max_iterations: usize,
) -> FitResult<usize> {
    let mut x = 0.;
    for iteration in 0..max_iterations {
        let delta = step * objective(x)?;
        if delta.abs() < stop_threshold {
            return Ok(iteration + 1);
        }
        x -= delta;
    }
    Ok(max_iterations)
}

/// Perturbative descent of the two layer model. The objective nudges every
/// parameter of both layers down by one learning rate step per evaluation
/// and reports the resulting loss; the scalar trajectory only decides when
/// to stop. Bounded by one evaluation per training row.
fn fit_two_layer(
    data: &EncodedDataset,
    labels: &[f64],
    config: &TrainConfig,
    rng: &mut impl Rng,
) -> FitResult<FitReport> {
    let mut layers = match (&config.hard_params, &config.hard_params1) {
        (Some(first), Some(second)) => [
            init_fixed(&data.schema, first)?,
            init_fixed(&data.schema, second)?,
        ],
        _ => [
            init_uniform(&data.schema, -0.005, 0.005, rng),
            init_uniform(&data.schema, -0.005, 0.005, rng),
        ],
    };

    let mut loss = 0.;
    let objective = |_x: f64| {
        for layer in layers.iter_mut() {
            for param in layer.iter_mut() {
                *param -= config.learning_rate;
            }
        }
        let predictions = predict_two_layer(&layers, &data.features);
        loss = mean_squared_error(&predictions, labels)?;
        Ok(loss)
    };
    let iterations = descend(
        objective,
        config.learning_rate,
        config.stop_threshold,
        data.n_rows(),
    )?;

    Ok(FitReport {
        model: Model::TwoLayer(TwoLayerModel {
            schema: data.schema.clone(),
            layers,
        }),
        loss,
        iterations,
    })
}

fn predict_linear(params: &[f64], features: &ColumnMajorMatrix<f64>) -> Vec<f64> {
    (0..features.n_rows())
        .into_par_iter()
        .map(|i| dot(params, &features.row(i)))
        .collect()
}

fn predict_two_layer(layers: &[Vec<f64>; 2], features: &ColumnMajorMatrix<f64>) -> Vec<f64> {
    (0..features.n_rows())
        .into_par_iter()
        .map(|i| {
            let row = features.row(i);
            clip(dot(&layers[0], &row)) + clip(dot(&layers[1], &row))
        })
        .collect()
}

/// Predict every row of an encoded table with a trained model, paired with
/// the row index. The table must carry the exact schema the model was
/// trained with.
pub fn infer(model: &Model, data: &EncodedDataset) -> FitResult<Vec<(usize, f64)>> {
    if &data.schema != model.schema() {
        return Err(FitError::SchemaMismatch {
            expected: format!("{:?}", model.schema().names()),
            got: format!("{:?}", data.schema.names()),
        });
    }
    let predictions = model.predict_all(&data.features)?;
    Ok(predictions.into_iter().enumerate().collect())
}
