use thiserror::Error;

/// Rule configuration problems. All raised while building the engine;
/// a rule that would misfire at request time is rejected at startup
/// instead.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate rule id '{0}'")]
    DuplicateId(String),

    #[error("rule '{rule}' references unknown field '{field}'")]
    UnknownField { rule: String, field: String },

    #[error("rule '{rule}': field '{field}' is {kind}, but the condition needs a {required} field")]
    KindMismatch {
        rule: String,
        field: String,
        kind: &'static str,
        required: &'static str,
    },

    #[error("rule '{rule}' references unknown category '{category}' of field '{field}'")]
    UnknownCategory {
        rule: String,
        field: String,
        category: String,
    },

    #[error("rule '{rule}': '{combinator}' lists no conditions")]
    EmptyCombinator {
        rule: String,
        combinator: &'static str,
    },
}
