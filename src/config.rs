use std::collections::BTreeMap;

use crate::{
    DEFAULT_CATEGORY_MAX, DEFAULT_ITERATIONS, DEFAULT_LEARNING_RATE, DEFAULT_STOP_THRESHOLD,
};

/// How a retained raw column is cast when it is not normalized.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Bool,
    Numeric,
    String,
}

/// Which model shape to fit.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Linear,
    TwoLayerAdditive,
}

/// Everything the encoder and the trainers need to know about a run.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TrainConfig {
    /// Raw columns kept for training, with their cast.
    pub cols: BTreeMap<String, ColumnType>,
    /// Columns whose encoding range is derived from the reference table.
    pub normalize: Vec<String>,
    /// Normalized numeric columns encoded as log10(value + 1) instead of
    /// value / scale.
    pub logarithmic: Vec<String>,
    /// Name of the label column.
    pub label: String,
    pub learning_rate: f64,
    pub iterations: usize,
    /// Distinct-value count at or below which a normalized column is
    /// categorical.
    pub category_max: usize,
    pub model: ModelKind,
    /// Step-size threshold under which the two-layer fit stops early.
    pub stop_threshold: f64,
    /// Keep only `take` rows of the reference table starting at `skip`.
    pub subset: Option<(usize, usize)>,
    /// Fixed initial weights for the first (or only) parameter vector.
    pub hard_params: Option<BTreeMap<String, f64>>,
    /// Fixed initial weights for the second parameter vector.
    pub hard_params1: Option<BTreeMap<String, f64>>,
}

impl TrainConfig {
    pub fn new(label: &str) -> Self {
        TrainConfig {
            cols: BTreeMap::new(),
            normalize: Vec::new(),
            logarithmic: Vec::new(),
            label: label.to_string(),
            learning_rate: DEFAULT_LEARNING_RATE,
            iterations: DEFAULT_ITERATIONS,
            category_max: DEFAULT_CATEGORY_MAX,
            model: ModelKind::Linear,
            stop_threshold: DEFAULT_STOP_THRESHOLD,
            subset: None,
            hard_params: None,
            hard_params1: None,
        }
    }
}
