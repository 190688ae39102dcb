use thiserror::Error;

/// Rejections of a caller-supplied patient input. Every variant names the
/// offending field so the caller can fix its data entry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("missing required field '{0}'")]
    MissingField(String),

    #[error("field '{field}': expected a {expected} value, got a {got}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        got: &'static str,
    },

    #[error("field '{field}': value {value} is outside the valid range [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("field '{field}': unknown category '{category}'")]
    UnknownCategory { field: String, category: String },
}

/// Schema document problems. All fatal at startup: a process with a bad
/// schema must not serve requests.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("schema declares no fields")]
    Empty,

    #[error("duplicate field name '{0}'")]
    DuplicateField(String),

    #[error("field '{field}': valid range [{min}, {max}] is not ascending")]
    InvalidRange { field: String, min: f64, max: f64 },

    #[error("field '{field}': z-score std_dev must be positive, got {std_dev}")]
    InvalidStdDev { field: String, std_dev: f64 },

    #[error("field '{field}': min-max bounds [{min}, {max}] are not ascending")]
    InvalidMinMax { field: String, min: f64, max: f64 },

    #[error("field '{field}': category set is empty")]
    EmptyCategories { field: String },

    #[error("field '{field}': duplicate category '{category}'")]
    DuplicateCategory { field: String, category: String },

    #[error("optional field '{0}' declares no default")]
    MissingDefault(String),

    #[error("field '{field}': declared default is invalid: {source}")]
    InvalidDefault {
        field: String,
        #[source]
        source: NormalizeError,
    },
}

/// A probability escaped [0, 1]. This is a defect in the model adapter,
/// never a caller error. It is surfaced, not corrected.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("probability {0} is outside [0, 1]")]
pub struct InvalidScoreError(pub f64);

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error(
    "risk thresholds must be strictly ascending within (0, 1): \
     got moderate={moderate}, high={high}, critical={critical}"
)]
pub struct ThresholdOrderError {
    pub moderate: f64,
    pub high: f64,
    pub critical: f64,
}
