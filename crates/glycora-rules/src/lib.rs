//! glycora-rules
//!
//! The recommendation engine: an ordered rule set compiled against the
//! feature schema at startup, evaluated as pure predicates per request.
//! Compilation resolves field names to vector columns and converts
//! raw-unit thresholds into normalized space, so request evaluation never
//! touches the schema again.

pub mod error;
pub mod rule;

use glycora_core::assessment::{Recommendation, RiskCategory};
use glycora_core::input::FeatureVector;
use glycora_core::schema::{FeatureSchema, FieldKind};

use crate::error::RuleError;
use crate::rule::{Cmp, Condition, RuleSpec};

#[derive(Debug)]
enum CompiledCondition {
    Threshold {
        column: usize,
        op: Cmp,
        normalized: f64,
    },
    OneHot {
        column: usize,
    },
    Flag {
        column: usize,
        expected: f64,
    },
    RiskAtLeast(RiskCategory),
    All(Vec<CompiledCondition>),
    Any(Vec<CompiledCondition>),
}

impl CompiledCondition {
    fn matches(&self, values: &[f64], category: RiskCategory) -> bool {
        match self {
            CompiledCondition::Threshold {
                column,
                op,
                normalized,
            } => op.eval(values[*column], *normalized),
            CompiledCondition::OneHot { column } => values[*column] > 0.5,
            CompiledCondition::Flag { column, expected } => values[*column] == *expected,
            CompiledCondition::RiskAtLeast(least) => category >= *least,
            CompiledCondition::All(children) => {
                children.iter().all(|c| c.matches(values, category))
            }
            CompiledCondition::Any(children) => {
                children.iter().any(|c| c.matches(values, category))
            }
        }
    }
}

#[derive(Debug)]
struct CompiledRule {
    id: String,
    text: String,
    priority: u32,
    when: CompiledCondition,
}

/// An immutable, schema-checked rule set. Safe to share across threads;
/// evaluation has no side effects.
#[derive(Debug)]
pub struct RecommendationEngine {
    rules: Vec<CompiledRule>,
}

impl RecommendationEngine {
    pub fn new(rules: Vec<RuleSpec>, schema: &FeatureSchema) -> Result<Self, RuleError> {
        let mut compiled: Vec<CompiledRule> = Vec::with_capacity(rules.len());
        for spec in rules {
            if compiled.iter().any(|r| r.id == spec.id) {
                return Err(RuleError::DuplicateId(spec.id));
            }
            let when = compile(&spec.when, &spec.id, schema)?;
            compiled.push(CompiledRule {
                id: spec.id,
                text: spec.text,
                priority: spec.priority,
                when,
            });
        }
        tracing::info!(rules = compiled.len(), "recommendation engine ready");
        Ok(Self { rules: compiled })
    }

    pub fn from_json(json: &str, schema: &FeatureSchema) -> Result<Self, RuleError> {
        let rules: Vec<RuleSpec> = serde_json::from_str(json)?;
        Self::new(rules, schema)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Fire every matching rule (a patient may deserve several guidance
    /// items at once), ordered by priority ascending, declaration order
    /// breaking ties (the sort is stable).
    pub fn recommend(
        &self,
        features: &FeatureVector,
        category: RiskCategory,
    ) -> Vec<Recommendation> {
        let mut hits: Vec<&CompiledRule> = self
            .rules
            .iter()
            .filter(|rule| rule.when.matches(&features.values, category))
            .collect();
        hits.sort_by_key(|rule| rule.priority);
        hits.into_iter()
            .map(|rule| Recommendation {
                rule_id: rule.id.clone(),
                text: rule.text.clone(),
                priority: rule.priority,
            })
            .collect()
    }
}

fn compile(
    condition: &Condition,
    rule_id: &str,
    schema: &FeatureSchema,
) -> Result<CompiledCondition, RuleError> {
    let resolve = |field: &str| {
        schema.find(field).ok_or_else(|| RuleError::UnknownField {
            rule: rule_id.to_string(),
            field: field.to_string(),
        })
    };

    match condition {
        Condition::Threshold { field, op, value } => {
            let (column, spec) = resolve(field)?;
            let FieldKind::Continuous {
                range,
                normalization,
            } = &spec.kind
            else {
                return Err(RuleError::KindMismatch {
                    rule: rule_id.to_string(),
                    field: field.clone(),
                    kind: spec.kind.name(),
                    required: "continuous",
                });
            };
            if !range.contains(*value) {
                tracing::warn!(
                    rule = rule_id,
                    field = %field,
                    threshold = value,
                    "rule threshold lies outside the field's valid range and can never vary"
                );
            }
            Ok(CompiledCondition::Threshold {
                column,
                op: *op,
                normalized: normalization.apply(*value),
            })
        }
        Condition::Category { field, equals } => {
            let (column, spec) = resolve(field)?;
            let FieldKind::Categorical { categories } = &spec.kind else {
                return Err(RuleError::KindMismatch {
                    rule: rule_id.to_string(),
                    field: field.clone(),
                    kind: spec.kind.name(),
                    required: "categorical",
                });
            };
            let Some(position) = categories.iter().position(|c| c == equals) else {
                return Err(RuleError::UnknownCategory {
                    rule: rule_id.to_string(),
                    field: field.clone(),
                    category: equals.clone(),
                });
            };
            Ok(CompiledCondition::OneHot {
                column: column + position,
            })
        }
        Condition::Flag { field, is } => {
            let (column, spec) = resolve(field)?;
            if !matches!(spec.kind, FieldKind::Boolean) {
                return Err(RuleError::KindMismatch {
                    rule: rule_id.to_string(),
                    field: field.clone(),
                    kind: spec.kind.name(),
                    required: "boolean",
                });
            }
            Ok(CompiledCondition::Flag {
                column,
                expected: if *is { 1.0 } else { 0.0 },
            })
        }
        Condition::RiskAtLeast { category } => Ok(CompiledCondition::RiskAtLeast(*category)),
        Condition::All { conditions } => {
            if conditions.is_empty() {
                return Err(RuleError::EmptyCombinator {
                    rule: rule_id.to_string(),
                    combinator: "all",
                });
            }
            conditions
                .iter()
                .map(|c| compile(c, rule_id, schema))
                .collect::<Result<_, _>>()
                .map(CompiledCondition::All)
        }
        Condition::Any { conditions } => {
            if conditions.is_empty() {
                return Err(RuleError::EmptyCombinator {
                    rule: rule_id.to_string(),
                    combinator: "any",
                });
            }
            conditions
                .iter()
                .map(|c| compile(c, rule_id, schema))
                .collect::<Result<_, _>>()
                .map(CompiledCondition::Any)
        }
    }
}
