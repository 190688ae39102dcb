//! Assessment result types and risk stratification.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{InvalidScoreError, ThresholdOrderError};
use crate::input::FeatureVector;

/// Ordered risk bands. The ordering is load-bearing: recommendation rules
/// may ask for "High or worse".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RiskCategory {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Low => "low",
            RiskCategory::Moderate => "moderate",
            RiskCategory::High => "high",
            RiskCategory::Critical => "critical",
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probability cut points between risk bands. Declared in configuration
/// shipped alongside the model artifact; never hard-coded by callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RiskThresholds {
    pub moderate: f64,
    pub high: f64,
    pub critical: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            moderate: 0.25,
            high: 0.5,
            critical: 0.75,
        }
    }
}

impl RiskThresholds {
    pub fn validate(&self) -> Result<(), ThresholdOrderError> {
        let ascending = self.moderate > 0.0
            && self.moderate < self.high
            && self.high < self.critical
            && self.critical < 1.0;
        if ascending {
            Ok(())
        } else {
            Err(ThresholdOrderError {
                moderate: self.moderate,
                high: self.high,
                critical: self.critical,
            })
        }
    }

    /// Total over [0, 1]. Boundary values land in the higher category, so
    /// exactly 0.25 is Moderate and exactly 0.75 is Critical. Anything
    /// outside [0, 1] (NaN included) is an invariant violation upstream.
    pub fn categorize(&self, probability: f64) -> Result<RiskCategory, InvalidScoreError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(InvalidScoreError(probability));
        }
        Ok(if probability >= self.critical {
            RiskCategory::Critical
        } else if probability >= self.high {
            RiskCategory::High
        } else if probability >= self.moderate {
            RiskCategory::Moderate
        } else {
            RiskCategory::Low
        })
    }
}

/// A calibrated probability plus the model version that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RiskScore {
    pub probability: f64,
    pub model_version: String,
}

/// One guidance item. Lower priority = more urgent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Recommendation {
    pub rule_id: String,
    pub text: String,
    pub priority: u32,
}

/// The complete outcome of one pipeline run. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AssessmentResult {
    pub id: Uuid,
    pub score: RiskScore,
    pub category: RiskCategory,
    pub recommendations: Vec<Recommendation>,
    /// Echo of the normalized vector the model actually saw, for audit.
    pub features: FeatureVector,
    pub assessed_at: jiff::Timestamp,
}

/// Flat response shape consumed by the UI/API layer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreResponse {
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    pub recommendations: Vec<RecommendationItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecommendationItem {
    pub text: String,
    pub priority: u32,
}

impl From<&AssessmentResult> for ScoreResponse {
    fn from(result: &AssessmentResult) -> Self {
        Self {
            risk_score: result.score.probability,
            risk_category: result.category,
            recommendations: result
                .recommendations
                .iter()
                .map(|r| RecommendationItem {
                    text: r.text.clone(),
                    priority: r.priority,
                })
                .collect(),
        }
    }
}
