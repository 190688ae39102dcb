//! glycora-core
//!
//! Pure domain vocabulary for the risk assessment pipeline: the feature
//! schema, patient input and normalization, and the assessment result
//! types. No I/O; reading documents from disk belongs to the app layer.

pub mod assessment;
pub mod error;
pub mod input;
pub mod schema;
