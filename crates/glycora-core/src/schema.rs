//! The feature schema: the ordered description of every metric the model
//! was trained on, including its valid domain and normalization parameters.
//!
//! Normalization parameters are declared here, not recomputed from traffic,
//! so identical inputs always produce identical vectors regardless of call
//! order.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::input::FieldValue;

/// Inclusive bounds on a raw metric value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// How a continuous metric is scaled into model space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Normalization {
    /// `(value - mean) / std_dev`
    ZScore { mean: f64, std_dev: f64 },
    /// `(value - min) / (max - min)`
    MinMax { min: f64, max: f64 },
}

impl Normalization {
    /// Strictly increasing for valid parameters, so comparisons commute
    /// with normalization: rule thresholds written in raw units can be
    /// compiled to normalized space once and compared there.
    pub fn apply(&self, raw: f64) -> f64 {
        match *self {
            Normalization::ZScore { mean, std_dev } => (raw - mean) / std_dev,
            Normalization::MinMax { min, max } => (raw - min) / (max - min),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Continuous {
        range: ValueRange,
        normalization: Normalization,
    },
    /// Encoded one-hot, one column per category, in declaration order.
    Categorical { categories: Vec<String> },
    /// Encoded as a single 0.0 / 1.0 column.
    Boolean,
}

impl FieldKind {
    /// Number of feature-vector columns this field occupies.
    pub fn width(&self) -> usize {
        match self {
            FieldKind::Categorical { categories } => categories.len(),
            _ => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Continuous { .. } => "continuous",
            FieldKind::Categorical { .. } => "categorical",
            FieldKind::Boolean => "boolean",
        }
    }
}

fn required_default() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Fields are required unless the schema explicitly relaxes them.
    #[serde(default = "required_default")]
    pub required: bool,
    /// Substituted when an optional field is absent. Optional fields must
    /// declare one; enforced at schema load.
    #[serde(default)]
    pub default: Option<FieldValue>,
}

/// The versioned feature schema. Loaded once at startup, immutable and
/// shared read-only for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: String,
    pub fields: Vec<FieldSpec>,
}

impl FeatureSchema {
    /// Parse and validate a schema document.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let schema: FeatureSchema = serde_json::from_str(json)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Total feature-vector width across all fields.
    pub fn width(&self) -> usize {
        self.fields.iter().map(|f| f.kind.width()).sum()
    }

    /// Locate a field by name, returning its first column offset.
    pub fn find(&self, name: &str) -> Option<(usize, &FieldSpec)> {
        let mut offset = 0;
        for field in &self.fields {
            if field.name == name {
                return Some((offset, field));
            }
            offset += field.kind.width();
        }
        None
    }

    /// One label per feature-vector column, for audit output.
    pub fn column_labels(&self) -> Vec<String> {
        let mut labels = Vec::with_capacity(self.width());
        for field in &self.fields {
            match &field.kind {
                FieldKind::Categorical { categories } => {
                    for category in categories {
                        labels.push(format!("{}={category}", field.name));
                    }
                }
                _ => labels.push(field.name.clone()),
            }
        }
        labels
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::Empty);
        }
        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
            field.validate()?;
        }
        Ok(())
    }
}

impl FieldSpec {
    fn validate(&self) -> Result<(), SchemaError> {
        match &self.kind {
            FieldKind::Continuous {
                range,
                normalization,
            } => {
                if !(range.min < range.max) {
                    return Err(SchemaError::InvalidRange {
                        field: self.name.clone(),
                        min: range.min,
                        max: range.max,
                    });
                }
                match *normalization {
                    Normalization::ZScore { std_dev, .. } if !(std_dev > 0.0) => {
                        return Err(SchemaError::InvalidStdDev {
                            field: self.name.clone(),
                            std_dev,
                        });
                    }
                    Normalization::MinMax { min, max } if !(min < max) => {
                        return Err(SchemaError::InvalidMinMax {
                            field: self.name.clone(),
                            min,
                            max,
                        });
                    }
                    _ => {}
                }
            }
            FieldKind::Categorical { categories } => {
                if categories.is_empty() {
                    return Err(SchemaError::EmptyCategories {
                        field: self.name.clone(),
                    });
                }
                for (i, category) in categories.iter().enumerate() {
                    if categories[..i].contains(category) {
                        return Err(SchemaError::DuplicateCategory {
                            field: self.name.clone(),
                            category: category.clone(),
                        });
                    }
                }
            }
            FieldKind::Boolean => {}
        }

        match &self.default {
            None if !self.required => Err(SchemaError::MissingDefault(self.name.clone())),
            None => Ok(()),
            Some(default) => {
                // The default must survive the same checks as a caller value.
                let mut scratch = Vec::with_capacity(self.kind.width());
                crate::input::encode_field(self, default, &mut scratch).map_err(|source| {
                    SchemaError::InvalidDefault {
                        field: self.name.clone(),
                        source,
                    }
                })
            }
        }
    }
}
