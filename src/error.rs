use std::{error, fmt};

/// Error raised while encoding or fitting.
///
/// We define a specific type because the generic dyn Error is not Sync, so it
/// can't cross Rayon boundaries. Payloads are plain strings for the same
/// reason: the whole enum stays Clone + Serialize.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum FitError {
    /// The feature layout of the input does not match the pinned schema.
    SchemaMismatch { expected: String, got: String },
    /// A column the configuration relies on is absent, or has no raw values
    /// to derive an encoding from.
    MissingColumn { column: String },
    /// Zero rows where at least one is required.
    EmptyDataset,
    /// A numeric column whose observed maximum is exactly zero cannot be
    /// used as a scale.
    DegenerateScale { column: String },
    /// CSV reading or parsing failure.
    Csv { msg: String },
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FitError::SchemaMismatch { expected, got } => {
                write!(f, "schema mismatch: expected {}, got {}", expected, got)
            }
            FitError::MissingColumn { column } => write!(f, "missing column {:?}", column),
            FitError::EmptyDataset => f.write_str("empty dataset"),
            FitError::DegenerateScale { column } => {
                write!(f, "column {:?} has a scale of zero", column)
            }
            FitError::Csv { msg } => write!(f, "csv: {}", msg),
        }
    }
}

impl error::Error for FitError {}

impl From<csv::Error> for FitError {
    fn from(err: csv::Error) -> Self {
        FitError::Csv {
            msg: err.to_string(),
        }
    }
}

pub type FitResult<T> = Result<T, FitError>;
