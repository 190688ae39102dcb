use crate::artifact::ModelKind;
use crate::error::ModelError;
use crate::Model;

/// Logistic-regression-style scorer: `w · x + b` as the logit.
pub struct LinearModel {
    weights: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    pub fn new(
        weights: Vec<f64>,
        intercept: f64,
        input_width: usize,
    ) -> Result<Self, ModelError> {
        if weights.len() != input_width {
            return Err(ModelError::MalformedParams {
                kind: ModelKind::Linear,
                detail: format!(
                    "expected {input_width} weights for the loaded schema, got {}",
                    weights.len()
                ),
            });
        }
        if weights.iter().any(|w| !w.is_finite()) || !intercept.is_finite() {
            return Err(ModelError::MalformedParams {
                kind: ModelKind::Linear,
                detail: "weights and intercept must be finite".to_string(),
            });
        }
        Ok(Self { weights, intercept })
    }
}

impl Model for LinearModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Linear
    }

    fn raw_score(&self, features: &[f64]) -> f64 {
        self.weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }
}
