use thiserror::Error;

use crate::artifact::ModelKind;

/// Artifact and inference failures. Everything here except the predict-time
/// mismatches is fatal at startup; none of it is retryable.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("artifact parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("artifact format_version {got} is newer than this build supports ({supported})")]
    FormatVersion { got: u32, supported: u32 },

    #[error("artifact was trained against schema version '{artifact}', but '{loaded}' is loaded")]
    SchemaVersionMismatch { artifact: String, loaded: String },

    #[error("feature vector has {got} columns, artifact expects {expected}")]
    WidthMismatch { expected: usize, got: usize },

    #[error("malformed {kind} model: {detail}")]
    MalformedParams { kind: ModelKind, detail: String },

    #[error("invalid calibration: {0}")]
    Calibration(String),
}
