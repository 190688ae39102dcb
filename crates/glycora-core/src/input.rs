//! Raw patient input and the preprocessor that turns it into a normalized
//! feature vector.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::NormalizeError;
use crate::schema::{FeatureSchema, FieldKind, FieldSpec};

/// A raw metric value exactly as the caller sent it. Untrusted until it
/// passes through [`normalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "boolean",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "string",
        }
    }
}

/// A scoring request: metric name → raw value. May be incomplete,
/// out-of-range, or wrongly typed; created per request and discarded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientInput(pub BTreeMap<String, FieldValue>);

impl PatientInput {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        self.0.insert(name.into(), value);
    }
}

/// The normalized, fixed-order encoding of one patient, tagged with the
/// schema version that produced it. Every value is finite and inside the
/// schema's normalized range for its column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FeatureVector {
    pub schema_version: String,
    pub values: Vec<f64>,
}

/// Map a raw input onto the schema. Pure: no running statistics, no
/// mutation, identical input always yields the identical vector.
///
/// Absent required fields, uncoercible values, out-of-range numbers
/// (clamping would mask data-entry mistakes) and unknown categories are
/// all rejected, each naming the offending field.
pub fn normalize(
    input: &PatientInput,
    schema: &FeatureSchema,
) -> Result<FeatureVector, NormalizeError> {
    let mut values = Vec::with_capacity(schema.width());
    for field in &schema.fields {
        let value = match input.get(&field.name) {
            Some(value) => value,
            None => match &field.default {
                Some(default) if !field.required => default,
                _ => return Err(NormalizeError::MissingField(field.name.clone())),
            },
        };
        encode_field(field, value, &mut values)?;
    }
    Ok(FeatureVector {
        schema_version: schema.version.clone(),
        values,
    })
}

/// Encode one field into its column(s). Shared with schema validation,
/// which runs declared defaults through the same checks.
pub(crate) fn encode_field(
    field: &FieldSpec,
    value: &FieldValue,
    out: &mut Vec<f64>,
) -> Result<(), NormalizeError> {
    match &field.kind {
        FieldKind::Continuous {
            range,
            normalization,
        } => {
            let FieldValue::Number(raw) = value else {
                return Err(NormalizeError::TypeMismatch {
                    field: field.name.clone(),
                    expected: "number",
                    got: value.kind_name(),
                });
            };
            if !range.contains(*raw) {
                return Err(NormalizeError::OutOfRange {
                    field: field.name.clone(),
                    value: *raw,
                    min: range.min,
                    max: range.max,
                });
            }
            out.push(normalization.apply(*raw));
        }
        FieldKind::Boolean => {
            let FieldValue::Bool(flag) = value else {
                return Err(NormalizeError::TypeMismatch {
                    field: field.name.clone(),
                    expected: "boolean",
                    got: value.kind_name(),
                });
            };
            out.push(if *flag { 1.0 } else { 0.0 });
        }
        FieldKind::Categorical { categories } => {
            let FieldValue::Text(text) = value else {
                return Err(NormalizeError::TypeMismatch {
                    field: field.name.clone(),
                    expected: "string",
                    got: value.kind_name(),
                });
            };
            let Some(position) = categories.iter().position(|c| c == text) else {
                return Err(NormalizeError::UnknownCategory {
                    field: field.name.clone(),
                    category: text.clone(),
                });
            };
            for i in 0..categories.len() {
                out.push(if i == position { 1.0 } else { 0.0 });
            }
        }
    }
    Ok(())
}
