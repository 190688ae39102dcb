//! glycora-model
//!
//! Model artifact loading and inference. A trained artifact declares its
//! kind, the schema version it was trained against, and its calibration;
//! [`ModelAdapter`] turns it into a shared, read-only scorer. Callers never
//! branch on the model kind; the variant is selected once at load.

pub mod artifact;
pub mod calibration;
pub mod error;
pub mod models;

use glycora_core::assessment::RiskScore;
use glycora_core::input::FeatureVector;
use glycora_core::schema::FeatureSchema;

use crate::artifact::{ModelArtifact, ModelKind};
use crate::calibration::Calibration;
use crate::error::ModelError;

/// A trained model. One implementation per artifact kind.
///
/// `raw_score` must be a pure function of the feature row: no per-call
/// learning, no interior mutability. The adapter relies on this to share
/// one model across unbounded concurrent requests.
pub trait Model: Send + Sync {
    fn kind(&self) -> ModelKind;

    /// Uncalibrated score (a logit) for one normalized feature row.
    /// The slice length has already been validated by the adapter.
    fn raw_score(&self, features: &[f64]) -> f64;
}

/// The uniform front door over heterogeneous model kinds: validates the
/// incoming vector, runs the model, applies calibration.
pub struct ModelAdapter {
    model: Box<dyn Model>,
    calibration: Calibration,
    schema_version: String,
    input_width: usize,
    model_version: String,
}

impl std::fmt::Debug for ModelAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelAdapter")
            .field("schema_version", &self.schema_version)
            .field("input_width", &self.input_width)
            .field("model_version", &self.model_version)
            .finish_non_exhaustive()
    }
}

impl ModelAdapter {
    /// Build an adapter from a parsed artifact. Fails when the artifact was
    /// trained against a different schema version, when its parameters do
    /// not fit the schema's feature width, or when its calibration is
    /// unusable. All of these are fatal at startup, not per request.
    pub fn from_artifact(
        artifact: ModelArtifact,
        schema: &FeatureSchema,
    ) -> Result<Self, ModelError> {
        if artifact.schema_version != schema.version {
            return Err(ModelError::SchemaVersionMismatch {
                artifact: artifact.schema_version,
                loaded: schema.version.clone(),
            });
        }
        artifact.calibration.validate()?;

        let input_width = schema.width();
        let kind = artifact.model.kind();
        let model = artifact.model.build(input_width)?;

        tracing::info!(
            model = %kind,
            model_version = %artifact.model_version,
            schema = %artifact.schema_version,
            columns = input_width,
            "model artifact loaded"
        );

        Ok(Self {
            model,
            calibration: artifact.calibration,
            schema_version: artifact.schema_version,
            input_width,
            model_version: artifact.model_version,
        })
    }

    /// Parse an artifact document and build the adapter in one step.
    pub fn load_json(json: &str, schema: &FeatureSchema) -> Result<Self, ModelError> {
        Self::from_artifact(ModelArtifact::from_json(json)?, schema)
    }

    /// Score one normalized vector. Pure and lock-free; safe to call from
    /// any number of threads.
    pub fn predict(&self, features: &FeatureVector) -> Result<RiskScore, ModelError> {
        if features.schema_version != self.schema_version {
            return Err(ModelError::SchemaVersionMismatch {
                artifact: self.schema_version.clone(),
                loaded: features.schema_version.clone(),
            });
        }
        if features.values.len() != self.input_width {
            return Err(ModelError::WidthMismatch {
                expected: self.input_width,
                got: features.values.len(),
            });
        }

        let raw = self.model.raw_score(&features.values);
        let probability = self.calibration.apply(raw);
        Ok(RiskScore {
            probability,
            model_version: self.model_version.clone(),
        })
    }

    pub fn kind(&self) -> ModelKind {
        self.model.kind()
    }

    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }
}
