//! Process-wide assessment state, modeled as an explicit context object
//! rather than ambient globals: built once at startup, shared read-only,
//! torn down explicitly. Two contexts can coexist in one process (e.g.
//! for A/B comparison of two artifacts).

use std::sync::Arc;

use glycora_core::assessment::RiskThresholds;
use glycora_core::schema::FeatureSchema;
use glycora_model::artifact::ModelArtifact;
use glycora_model::ModelAdapter;
use glycora_rules::RecommendationEngine;

use crate::error::InitError;

pub struct AssessmentContext {
    schema: Arc<FeatureSchema>,
    adapter: Arc<ModelAdapter>,
    thresholds: RiskThresholds,
    engine: Arc<RecommendationEngine>,
}

impl std::fmt::Debug for AssessmentContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssessmentContext")
            .field("thresholds", &self.thresholds)
            .finish_non_exhaustive()
    }
}

impl AssessmentContext {
    /// Load and cross-validate the whole config bundle. Any failure here is
    /// fatal: schema, artifact, and rules either agree or the process does
    /// not serve.
    pub fn init(
        schema_json: &str,
        artifact_json: &str,
        rules_json: &str,
    ) -> Result<Self, InitError> {
        let schema = FeatureSchema::from_json(schema_json)?;
        let artifact = ModelArtifact::from_json(artifact_json)?;

        let thresholds = artifact.thresholds.unwrap_or_default();
        thresholds.validate()?;

        let adapter = ModelAdapter::from_artifact(artifact, &schema)?;
        let engine = RecommendationEngine::from_json(rules_json, &schema)?;

        let ctx = Self {
            schema: Arc::new(schema),
            adapter: Arc::new(adapter),
            thresholds,
            engine: Arc::new(engine),
        };
        tracing::info!(
            schema = %ctx.schema.version,
            model = %ctx.adapter.kind(),
            model_version = %ctx.adapter.model_version(),
            rules = ctx.engine.len(),
            "assessment context initialized"
        );
        Ok(ctx)
    }

    /// Assemble a context from already-built parts (tests, A/B wiring).
    /// The thresholds must already be validated.
    pub fn from_parts(
        schema: FeatureSchema,
        adapter: ModelAdapter,
        thresholds: RiskThresholds,
        engine: RecommendationEngine,
    ) -> Self {
        Self {
            schema: Arc::new(schema),
            adapter: Arc::new(adapter),
            thresholds,
            engine: Arc::new(engine),
        }
    }

    /// Explicit teardown. Shared references held by in-flight pipelines
    /// keep their components alive until those calls finish.
    pub fn unload(self) {
        tracing::info!(schema = %self.schema.version, "assessment context unloaded");
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn adapter(&self) -> &ModelAdapter {
        &self.adapter
    }

    pub fn thresholds(&self) -> RiskThresholds {
        self.thresholds
    }

    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }
}
