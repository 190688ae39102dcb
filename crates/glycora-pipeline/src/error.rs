use thiserror::Error;

use glycora_core::error::{
    InvalidScoreError, NormalizeError, SchemaError, ThresholdOrderError,
};
use glycora_model::error::ModelError;
use glycora_rules::error::RuleError;

/// A failed `assess` call. Transparent wrappers: the originating component
/// error, and the field or rule it names, passes through unchanged.
#[derive(Debug, Error)]
pub enum AssessError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    InvalidScore(#[from] InvalidScoreError),
}

/// A failed context startup. Fatal: a process that cannot load its config
/// bundle must not serve requests.
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Thresholds(#[from] ThresholdOrderError),

    #[error(transparent)]
    Rules(#[from] RuleError),
}
