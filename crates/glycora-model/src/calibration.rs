//! Output calibration. Raw classifier scores are not well-calibrated
//! probabilities; the downstream thresholds assume calibration, so every
//! artifact carries one of these transforms.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Calibration {
    /// `sigmoid(coef * raw + intercept)`. `coef` must be positive so the
    /// calibrated probability preserves the raw-score ordering.
    Platt { coef: f64, intercept: f64 },
    /// `sigmoid(raw / temperature)`, `temperature > 0`.
    Temperature { temperature: f64 },
}

impl Calibration {
    pub fn validate(&self) -> Result<(), ModelError> {
        match *self {
            Calibration::Platt { coef, intercept } => {
                if !(coef.is_finite() && coef > 0.0 && intercept.is_finite()) {
                    return Err(ModelError::Calibration(format!(
                        "platt scaling requires finite intercept and positive coef, \
                         got coef={coef}, intercept={intercept}"
                    )));
                }
            }
            Calibration::Temperature { temperature } => {
                if !(temperature.is_finite() && temperature > 0.0) {
                    return Err(ModelError::Calibration(format!(
                        "temperature scaling requires a positive temperature, got {temperature}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Map a raw score into [0, 1]. Monotone for any parameters accepted
    /// by [`validate`](Self::validate).
    pub fn apply(&self, raw: f64) -> f64 {
        let z = match *self {
            Calibration::Platt { coef, intercept } => coef * raw + intercept,
            Calibration::Temperature { temperature } => raw / temperature,
        };
        sigmoid(z)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
