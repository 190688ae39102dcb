//! glycora-pipeline
//!
//! The assessment pipeline: normalize → predict → categorize → recommend,
//! over an explicitly constructed [`AssessmentContext`]. This is the only
//! entry point external callers (CLI, API layer) invoke.

pub mod context;
pub mod error;

use glycora_core::assessment::AssessmentResult;
use glycora_core::input::{normalize, PatientInput};
use uuid::Uuid;

pub use crate::context::AssessmentContext;
pub use crate::error::{AssessError, InitError};

/// A stateless view over a context. Construction is free, so a pipeline
/// per call or per thread is fine, and many may share one context
/// concurrently: every step is a pure read.
pub struct AssessmentPipeline<'ctx> {
    ctx: &'ctx AssessmentContext,
}

impl<'ctx> AssessmentPipeline<'ctx> {
    pub fn new(ctx: &'ctx AssessmentContext) -> Self {
        Self { ctx }
    }

    /// Run the full pipeline for one patient. The first failing step
    /// short-circuits and its error propagates unchanged; there is never a
    /// partial result and never a retry (input errors are not transient,
    /// and inference has no transient failure mode).
    pub fn assess(&self, input: &PatientInput) -> Result<AssessmentResult, AssessError> {
        let features = normalize(input, self.ctx.schema())?;
        let score = self.ctx.adapter().predict(&features)?;

        let category = match self.ctx.thresholds().categorize(score.probability) {
            Ok(category) => category,
            Err(err) => {
                // A defect in the adapter, not a caller problem. Surface it
                // loudly; never clamp it into a category.
                tracing::error!(
                    probability = score.probability,
                    model_version = %score.model_version,
                    "model produced an out-of-range probability"
                );
                return Err(err.into());
            }
        };

        let recommendations = self.ctx.engine().recommend(&features, category);
        tracing::debug!(
            category = %category,
            recommendations = recommendations.len(),
            "assessment complete"
        );

        Ok(AssessmentResult {
            id: Uuid::new_v4(),
            score,
            category,
            recommendations,
            features,
            assessed_at: jiff::Timestamp::now(),
        })
    }

    /// Score a batch in input order. Patients are independent: one bad
    /// record fails its own slot without touching the others.
    pub fn assess_batch(
        &self,
        inputs: &[PatientInput],
    ) -> Vec<Result<AssessmentResult, AssessError>> {
        inputs.iter().map(|input| self.assess(input)).collect()
    }
}
