//! Rule configuration as it appears on disk: an ordered list of guidance
//! items, each guarded by a predicate over the patient's features and the
//! assessed risk category.

use serde::{Deserialize, Serialize};

use glycora_core::assessment::RiskCategory;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    pub id: String,
    /// The guidance shown to the patient or clinician.
    pub text: String,
    /// Lower = more urgent. Ties keep declaration order.
    pub priority: u32,
    pub when: Condition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cmp {
    Lt,
    Le,
    Gt,
    Ge,
}

impl Cmp {
    pub(crate) fn eval(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Cmp::Lt => lhs < rhs,
            Cmp::Le => lhs <= rhs,
            Cmp::Gt => lhs > rhs,
            Cmp::Ge => lhs >= rhs,
        }
    }
}

fn flag_default() -> bool {
    true
}

/// A predicate over (features, category). Field references are resolved
/// against the feature schema when the engine is built; a condition naming
/// a field the schema does not declare never reaches request time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// Compare a continuous field against a threshold written in raw
    /// clinical units (e.g. glucose in mg/dL, not a z-score).
    Threshold { field: String, op: Cmp, value: f64 },
    /// A categorical field takes a specific category.
    Category { field: String, equals: String },
    /// A boolean field is set (or, with `is: false`, unset).
    Flag {
        field: String,
        #[serde(default = "flag_default")]
        is: bool,
    },
    /// The assessed risk category is at least this severe.
    RiskAtLeast { category: RiskCategory },
    All { conditions: Vec<Condition> },
    Any { conditions: Vec<Condition> },
}
