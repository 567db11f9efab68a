use std::collections::BTreeMap;

use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::{
    ColumnMajorMatrix, ColumnType, FitError, FitResult, RawTable, TrainConfig, BIAS_FEATURE,
};

/// Permissive numeric cast: anything that does not parse is 0.0.
pub(crate) fn cast_numeric(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.)
}

/// Permissive bool cast: numbers are true iff non-zero, the empty string is
/// false, any other string is true.
pub(crate) fn cast_bool(raw: &str) -> f64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0.;
    }
    match raw.parse::<f64>() {
        Ok(v) => {
            if v != 0. {
                1.
            } else {
                0.
            }
        }
        Err(_) => 1.,
    }
}

/// Encoding range of one normalized column, derived once from the reference
/// table and reused unmodified for every later table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum ColumnRange {
    /// Ordered distinct values with the largest removed. Each value becomes
    /// a one-hot feature; the removed value is the implicit reference
    /// category and encodes as all zeros.
    Categorical { values: Vec<String> },
    /// Maximum observed value. The column encodes as value / scale.
    Numeric { scale: f64 },
}

/// Derive the encoding range of every normalized column.
///
/// A column is categorical when its distinct non-empty values are not all
/// numbers, or when there are at most `category_max` of them. Otherwise it
/// is numeric.
pub fn derive_ranges(
    table: &RawTable,
    normalize: &[String],
    category_max: usize,
) -> FitResult<BTreeMap<String, ColumnRange>> {
    let mut ranges = BTreeMap::new();
    for name in normalize {
        let raws = table.column(name)?;
        if raws.is_empty() {
            return Err(FitError::MissingColumn {
                column: name.clone(),
            });
        }
        ranges.insert(name.clone(), derive_range(name, &raws, category_max)?);
    }
    Ok(ranges)
}

fn derive_range(name: &str, raws: &[&str], category_max: usize) -> FitResult<ColumnRange> {
    let distinct: Vec<&str> = raws
        .iter()
        .map(|raw| raw.trim())
        .filter(|raw| !raw.is_empty())
        .unique()
        .collect();

    // Some iff every distinct value is a number
    let parsed: Option<Vec<f64>> = distinct.iter().map(|raw| raw.parse().ok()).collect();

    if parsed.is_none() || distinct.len() <= category_max {
        let mut values: Vec<String> = match &parsed {
            Some(parsed) => distinct
                .iter()
                .zip(parsed.iter())
                .sorted_by_key(|&(_, &v)| OrderedFloat(v))
                .map(|(&raw, _)| raw.to_string())
                .collect(),
            None => distinct.iter().map(|&raw| raw.to_string()).sorted().collect(),
        };
        // The largest value is the implicit reference category
        values.pop();
        Ok(ColumnRange::Categorical { values })
    } else {
        let scale = raws
            .iter()
            .map(|raw| cast_numeric(raw))
            .max_by_key(|&v| OrderedFloat(v))
            .unwrap_or(0.);
        if scale == 0. {
            return Err(FitError::DegenerateScale {
                column: name.to_string(),
            });
        }
        Ok(ColumnRange::Numeric { scale })
    }
}

/// Ordered derived feature names, pinned from the reference table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    pub fn from_names(names: Vec<String>) -> Self {
        FeatureSchema { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

/// A table encoded into the pinned schema.
pub struct EncodedDataset {
    pub schema: FeatureSchema,
    pub features: ColumnMajorMatrix<f64>,
    /// Cast label per row; absent when the table has no label column.
    pub labels: Option<Vec<f64>>,
}

impl EncodedDataset {
    pub fn n_rows(&self) -> usize {
        self.features.n_rows()
    }
}

/// Derives encoding state from a reference table once, then encodes any
/// table with the same columns into the pinned feature schema.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Encoder {
    /// Retained source columns with their cast, in reference-header order.
    columns: Vec<(String, ColumnType)>,
    ranges: BTreeMap<String, ColumnRange>,
    logarithmic: Vec<String>,
    label: String,
    schema: FeatureSchema,
}

impl Encoder {
    /// Derive ranges and pin the feature schema from the reference table.
    pub fn fit(config: &TrainConfig, reference: &RawTable) -> FitResult<Encoder> {
        for name in config.cols.keys() {
            if name != &config.label && !reference.header.iter().any(|h| h == name) {
                return Err(FitError::MissingColumn {
                    column: name.clone(),
                });
            }
        }

        let ranges = derive_ranges(reference, &config.normalize, config.category_max)?;

        let mut columns = Vec::new();
        for name in &reference.header {
            if name == &config.label {
                continue;
            }
            if let Some(kind) = config.cols.get(name) {
                columns.push((name.clone(), kind.clone()));
            }
        }

        let mut names = vec![BIAS_FEATURE.to_string()];
        for (name, _) in &columns {
            match ranges.get(name) {
                Some(ColumnRange::Categorical { values }) => {
                    for value in values {
                        names.push(format!("{}_{}", name, value));
                    }
                }
                Some(ColumnRange::Numeric { .. }) | None => names.push(name.clone()),
            }
        }

        Ok(Encoder {
            columns,
            ranges,
            logarithmic: config.logarithmic.clone(),
            label: config.label.clone(),
            schema: FeatureSchema { names },
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn ranges(&self) -> &BTreeMap<String, ColumnRange> {
        &self.ranges
    }

    /// Encode a table into the pinned schema.
    ///
    /// Source columns are resolved by name, so a reordered table encodes
    /// into the same feature positions as the reference.
    pub fn encode(&self, table: &RawTable) -> FitResult<EncodedDataset> {
        if table.n_rows() == 0 {
            return Err(FitError::EmptyDataset);
        }

        let mut indices = Vec::with_capacity(self.columns.len());
        for (name, _) in &self.columns {
            match table.header.iter().position(|h| h == name) {
                Some(idx) => indices.push(idx),
                None => {
                    return Err(FitError::SchemaMismatch {
                        expected: format!("source column {:?}", name),
                        got: "no such column".to_string(),
                    });
                }
            }
        }

        let mut rows = Vec::with_capacity(table.n_rows());
        for row in &table.rows {
            rows.push(self.encode_row(row, &indices));
        }
        let features = ColumnMajorMatrix::from_rows(rows);

        let labels = table.header.iter().position(|h| *h == self.label).map(|idx| {
            table
                .rows
                .iter()
                .map(|row| cast_numeric(&row[idx]))
                .collect()
        });

        Ok(EncodedDataset {
            schema: self.schema.clone(),
            features,
            labels,
        })
    }

    /// One raw row into one feature row. `indices` maps the retained
    /// columns onto `row` positions.
    fn encode_row(&self, row: &[String], indices: &[usize]) -> Vec<f64> {
        let mut features = Vec::with_capacity(self.schema.len());
        features.push(1.);
        for ((name, kind), &idx) in self.columns.iter().zip(indices) {
            let raw = row[idx].as_str();
            match self.ranges.get(name) {
                Some(ColumnRange::Categorical { values }) => {
                    let raw = raw.trim();
                    for value in values {
                        features.push(if raw == value { 1. } else { 0. });
                    }
                }
                Some(ColumnRange::Numeric { scale }) => {
                    let cast = cast_numeric(raw);
                    if self.logarithmic.iter().any(|l| l == name) {
                        features.push((cast + 1.).log10());
                    } else {
                        features.push(cast / scale);
                    }
                }
                None => features.push(match kind {
                    ColumnType::Bool => cast_bool(raw),
                    ColumnType::Numeric | ColumnType::String => cast_numeric(raw),
                }),
            }
        }
        features
    }
}
