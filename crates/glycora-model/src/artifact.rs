//! The on-disk artifact format: a versioned JSON document bundling the
//! trained parameters with the metadata needed to use them safely: the
//! schema version they were trained against, the calibration transform,
//! and optionally the risk thresholds to apply downstream.

use serde::{Deserialize, Serialize};

use glycora_core::assessment::RiskThresholds;

use crate::calibration::Calibration;
use crate::error::ModelError;
use crate::models::linear::LinearModel;
use crate::models::neural::{LayerSpec, NeuralNetworkModel};
use crate::models::tree_ensemble::{TreeEnsembleModel, TreeSpec};
use crate::Model;

/// Artifact format revision understood by this build.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Linear,
    TreeEnsemble,
    NeuralNetwork,
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ModelKind::Linear => "linear",
            ModelKind::TreeEnsemble => "tree_ensemble",
            ModelKind::NeuralNetwork => "neural_network",
        })
    }
}

/// Trained parameters, tagged by model kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    Linear {
        weights: Vec<f64>,
        intercept: f64,
    },
    TreeEnsemble {
        base_score: f64,
        trees: Vec<TreeSpec>,
    },
    NeuralNetwork {
        layers: Vec<LayerSpec>,
    },
}

impl ModelSpec {
    pub fn kind(&self) -> ModelKind {
        match self {
            ModelSpec::Linear { .. } => ModelKind::Linear,
            ModelSpec::TreeEnsemble { .. } => ModelKind::TreeEnsemble,
            ModelSpec::NeuralNetwork { .. } => ModelKind::NeuralNetwork,
        }
    }

    /// Validate the parameters against the feature width and build the
    /// concrete model. The adapter holds the result as `Box<dyn Model>`;
    /// this is the only place the kind is ever matched on.
    pub fn build(self, input_width: usize) -> Result<Box<dyn Model>, ModelError> {
        Ok(match self {
            ModelSpec::Linear { weights, intercept } => {
                Box::new(LinearModel::new(weights, intercept, input_width)?)
            }
            ModelSpec::TreeEnsemble { base_score, trees } => {
                Box::new(TreeEnsembleModel::new(base_score, trees, input_width)?)
            }
            ModelSpec::NeuralNetwork { layers } => {
                Box::new(NeuralNetworkModel::new(layers, input_width)?)
            }
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    /// Identifies the training run; echoed on every score it produces.
    pub model_version: String,
    pub schema_version: String,
    pub trained_at: jiff::Timestamp,
    pub calibration: Calibration,
    /// Risk thresholds shipped alongside the model. Absent = defaults.
    #[serde(default)]
    pub thresholds: Option<RiskThresholds>,
    pub model: ModelSpec,
}

impl ModelArtifact {
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        if artifact.format_version > FORMAT_VERSION {
            return Err(ModelError::FormatVersion {
                got: artifact.format_version,
                supported: FORMAT_VERSION,
            });
        }
        Ok(artifact)
    }
}
