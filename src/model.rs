use std::collections::BTreeMap;

use rand::Rng;
use rayon::prelude::*;

use crate::{dot, ColumnMajorMatrix, FeatureSchema, FitError, FitResult, StridedVecView};

/// Rectifier of the additive two layer model.
pub fn clip(x: f64) -> f64 {
    x.max(0.)
}

/// Plain dot product of the parameters with a feature row.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LinearModel {
    pub schema: FeatureSchema,
    pub params: Vec<f64>,
}

/// Sum of two rectified dot products over the same feature row.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TwoLayerModel {
    pub schema: FeatureSchema,
    pub layers: [Vec<f64>; 2],
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub enum Model {
    Linear(LinearModel),
    TwoLayer(TwoLayerModel),
}

impl Model {
    pub fn schema(&self) -> &FeatureSchema {
        match self {
            Model::Linear(model) => &model.schema,
            Model::TwoLayer(model) => &model.schema,
        }
    }

    pub fn predict(&self, row: &StridedVecView<f64>) -> f64 {
        match self {
            Model::Linear(model) => dot(&model.params, row),
            Model::TwoLayer(model) => {
                clip(dot(&model.layers[0], row)) + clip(dot(&model.layers[1], row))
            }
        }
    }

    /// Predict every row of a feature table.
    pub fn predict_all(&self, features: &ColumnMajorMatrix<f64>) -> FitResult<Vec<f64>> {
        if features.n_cols() != self.schema().len() {
            return Err(FitError::SchemaMismatch {
                expected: format!("{} features", self.schema().len()),
                got: format!("{} columns", features.n_cols()),
            });
        }
        // Indexed rows to keep the output in row order under Rayon
        Ok((0..features.n_rows())
            .into_par_iter()
            .map(|i| self.predict(&features.row(i)))
            .collect())
    }
}

/// Draw one parameter per feature uniformly in [lo, hi).
pub fn init_uniform(schema: &FeatureSchema, lo: f64, hi: f64, rng: &mut impl Rng) -> Vec<f64> {
    schema.names().iter().map(|_| rng.gen_range(lo..hi)).collect()
}

/// Parameters from a named map, laid out in schema order. The key set must
/// be exactly the schema's feature names.
pub fn init_fixed(schema: &FeatureSchema, named: &BTreeMap<String, f64>) -> FitResult<Vec<f64>> {
    if named.len() != schema.len() {
        return Err(FitError::SchemaMismatch {
            expected: format!("{} named parameters", schema.len()),
            got: format!("{} named parameters", named.len()),
        });
    }
    let mut params = Vec::with_capacity(schema.len());
    for name in schema.names() {
        match named.get(name) {
            Some(&value) => params.push(value),
            None => {
                return Err(FitError::SchemaMismatch {
                    expected: format!("a parameter named {:?}", name),
                    got: "no such name".to_string(),
                });
            }
        }
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn schema(names: &[&str]) -> FeatureSchema {
        FeatureSchema::from_names(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip(-1.5), 0.);
        assert_eq!(clip(0.), 0.);
        assert_eq!(clip(2.5), 2.5);
    }

    #[test]
    fn test_linear_predict() {
        let model = Model::Linear(LinearModel {
            schema: schema(&["Ones", "a", "b"]),
            params: vec![0.5, 2., -1.],
        });
        let row = [1., 3., 2.];
        assert_eq!(model.predict(&StridedVecView::from_slice(&row)), 4.5);

        let features = ColumnMajorMatrix::from_rows(vec![vec![1., 3., 2.], vec![1., 0., 0.]]);
        assert_eq!(model.predict_all(&features), Ok(vec![4.5, 0.5]));
    }

    #[test]
    fn test_two_layer_predict() {
        let model = Model::TwoLayer(TwoLayerModel {
            schema: schema(&["Ones", "a"]),
            layers: [vec![1., 1.], vec![-1., 0.]],
        });
        // First layer fires with 3, second is clipped at zero
        let row = [1., 2.];
        assert_eq!(model.predict(&StridedVecView::from_slice(&row)), 3.);

        // Zeroed first layer, negative second dot: the sum is exactly zero
        let negative = Model::TwoLayer(TwoLayerModel {
            schema: schema(&["Ones", "a"]),
            layers: [vec![0., 0.], vec![0., -2.]],
        });
        assert_eq!(negative.predict(&StridedVecView::from_slice(&row)), 0.);
    }

    #[test]
    fn test_predict_all_width_mismatch() {
        let model = Model::Linear(LinearModel {
            schema: schema(&["Ones", "a", "b"]),
            params: vec![0., 0., 0.],
        });
        let features = ColumnMajorMatrix::from_rows(vec![vec![1., 2.]]);
        assert_eq!(
            model.predict_all(&features).err(),
            Some(FitError::SchemaMismatch {
                expected: "3 features".to_string(),
                got: "2 columns".to_string(),
            })
        );
    }

    #[test]
    fn test_init_fixed() {
        let schema = schema(&["Ones", "x"]);
        let mut named = BTreeMap::new();
        named.insert("Ones".to_string(), 0.1);
        named.insert("x".to_string(), 0.2);
        assert_eq!(init_fixed(&schema, &named), Ok(vec![0.1, 0.2]));

        // A renamed key fails even though the count matches
        let mut renamed = BTreeMap::new();
        renamed.insert("Ones".to_string(), 0.1);
        renamed.insert("y".to_string(), 0.2);
        assert!(init_fixed(&schema, &renamed).is_err());

        // An extra key fails on the count
        named.insert("extra".to_string(), 0.3);
        assert!(init_fixed(&schema, &named).is_err());
    }

    #[test]
    fn test_init_uniform_is_seeded() {
        let schema = schema(&["Ones", "a", "b", "c"]);
        let mut rng = StdRng::seed_from_u64(42);
        let first = init_uniform(&schema, 0., 0.01, &mut rng);

        let mut rng = StdRng::seed_from_u64(42);
        let second = init_uniform(&schema, 0., 0.01, &mut rng);

        assert_eq!(first, second);
        assert!(first.iter().all(|&p| (0. ..0.01).contains(&p)));
    }
}
