use serde::{Deserialize, Serialize};

use crate::artifact::ModelKind;
use crate::error::ModelError;
use crate::Model;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Relu,
    Tanh,
    Sigmoid,
    Identity,
}

impl Activation {
    fn apply(self, z: f64) -> f64 {
        match self {
            Activation::Relu => z.max(0.0),
            Activation::Tanh => z.tanh(),
            Activation::Sigmoid => 1.0 / (1.0 + (-z).exp()),
            Activation::Identity => z,
        }
    }
}

/// One dense layer. `weights` is row-major: one row of input weights per
/// output unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
    pub activation: Activation,
}

/// Small feed-forward scorer. The last layer must emit a single value,
/// which the adapter treats as the logit.
pub struct NeuralNetworkModel {
    layers: Vec<LayerSpec>,
}

impl NeuralNetworkModel {
    pub fn new(layers: Vec<LayerSpec>, input_width: usize) -> Result<Self, ModelError> {
        if layers.is_empty() {
            return Err(malformed("network has no layers".to_string()));
        }
        let mut width = input_width;
        for (l, layer) in layers.iter().enumerate() {
            if layer.weights.is_empty() {
                return Err(malformed(format!("layer {l} has no units")));
            }
            if layer.biases.len() != layer.weights.len() {
                return Err(malformed(format!(
                    "layer {l} has {} units but {} biases",
                    layer.weights.len(),
                    layer.biases.len()
                )));
            }
            for (u, row) in layer.weights.iter().enumerate() {
                if row.len() != width {
                    return Err(malformed(format!(
                        "layer {l} unit {u} expects {} inputs, previous layer provides {width}",
                        row.len()
                    )));
                }
                if row.iter().any(|w| !w.is_finite()) {
                    return Err(malformed(format!(
                        "layer {l} unit {u} has non-finite weights"
                    )));
                }
            }
            if layer.biases.iter().any(|b| !b.is_finite()) {
                return Err(malformed(format!("layer {l} has non-finite biases")));
            }
            width = layer.weights.len();
        }
        if width != 1 {
            return Err(malformed(format!(
                "final layer must emit a single logit, emits {width}"
            )));
        }
        Ok(Self { layers })
    }
}

fn malformed(detail: String) -> ModelError {
    ModelError::MalformedParams {
        kind: ModelKind::NeuralNetwork,
        detail,
    }
}

impl Model for NeuralNetworkModel {
    fn kind(&self) -> ModelKind {
        ModelKind::NeuralNetwork
    }

    fn raw_score(&self, features: &[f64]) -> f64 {
        let mut current = features.to_vec();
        for layer in &self.layers {
            let mut next = Vec::with_capacity(layer.weights.len());
            for (row, bias) in layer.weights.iter().zip(&layer.biases) {
                let z = row
                    .iter()
                    .zip(&current)
                    .map(|(w, x)| w * x)
                    .sum::<f64>()
                    + bias;
                next.push(layer.activation.apply(z));
            }
            current = next;
        }
        current[0]
    }
}
