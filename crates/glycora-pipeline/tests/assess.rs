use glycora_core::assessment::RiskCategory;
use glycora_core::error::NormalizeError;
use glycora_core::input::PatientInput;
use glycora_pipeline::{AssessError, AssessmentContext, AssessmentPipeline, InitError};

const SCHEMA: &str = r#"{
  "version": "v1",
  "fields": [
    {"name": "age", "kind": "continuous", "range": {"min": 18.0, "max": 100.0},
     "normalization": {"strategy": "min_max", "min": 18.0, "max": 98.0}},
    {"name": "glucose", "kind": "continuous", "range": {"min": 40.0, "max": 400.0},
     "normalization": {"strategy": "min_max", "min": 40.0, "max": 240.0}},
    {"name": "bmi", "kind": "continuous", "range": {"min": 10.0, "max": 60.0},
     "normalization": {"strategy": "z_score", "mean": 27.0, "std_dev": 5.0}},
    {"name": "activity", "kind": "categorical",
     "categories": ["sedentary", "moderate", "active"],
     "required": false, "default": "moderate"},
    {"name": "family_history", "kind": "boolean"}
  ]
}"#;

const ARTIFACT: &str = r#"{
  "format_version": 1,
  "model_version": "demo-1",
  "schema_version": "v1",
  "trained_at": "2025-11-02T00:00:00Z",
  "calibration": {"method": "platt", "coef": 1.0, "intercept": 0.0},
  "thresholds": {"moderate": 0.25, "high": 0.5, "critical": 0.75},
  "model": {"kind": "linear",
            "weights": [0.4, 2.0, 0.5, 0.3, 0.0, -0.2, 0.8],
            "intercept": -1.5}
}"#;

const RULES: &str = r#"[
  {"id": "sugar", "text": "Reduce sugar intake.", "priority": 2,
   "when": {"type": "threshold", "field": "glucose", "op": "ge", "value": 126}},
  {"id": "clinician", "text": "Consult a clinician promptly.", "priority": 1,
   "when": {"type": "risk_at_least", "category": "high"}},
  {"id": "move", "text": "Increase daily activity.", "priority": 3,
   "when": {"type": "category", "field": "activity", "equals": "sedentary"}}
]"#;

const PATIENT: &str = r#"{"age": 58, "glucose": 140, "bmi": 32,
                          "activity": "sedentary", "family_history": true}"#;

fn context() -> AssessmentContext {
    AssessmentContext::init(SCHEMA, ARTIFACT, RULES).unwrap()
}

fn patient(json: &str) -> PatientInput {
    serde_json::from_str(json).unwrap()
}

#[test]
fn assessment_is_deterministic_end_to_end() {
    let ctx = context();
    let pipeline = AssessmentPipeline::new(&ctx);
    let input = patient(PATIENT);

    let first = pipeline.assess(&input).unwrap();
    let second = pipeline.assess(&input).unwrap();

    assert_eq!(first.score, second.score);
    assert_eq!(first.category, second.category);
    assert_eq!(first.recommendations, second.recommendations);
    assert_eq!(first.features, second.features);
}

#[test]
fn high_risk_patient_gets_category_and_ranked_guidance() {
    let ctx = context();
    let result = AssessmentPipeline::new(&ctx).assess(&patient(PATIENT)).unwrap();

    // logit = 0.4·0.5 + 2.0·0.5 + 0.5·1.0 + 0.3·1.0 + 0.8·1.0 − 1.5 ≈ 1.3,
    // sigmoid(1.3) ≈ 0.786 → Critical under the 0.75 cut.
    assert!(result.score.probability > 0.75 && result.score.probability < 0.8);
    assert_eq!(result.category, RiskCategory::Critical);
    assert_eq!(result.score.model_version, "demo-1");

    let ids: Vec<&str> = result
        .recommendations
        .iter()
        .map(|r| r.rule_id.as_str())
        .collect();
    assert_eq!(ids, vec!["clinician", "sugar", "move"]);
}

#[test]
fn missing_required_field_short_circuits_with_no_partial_result() {
    let ctx = context();
    let input = patient(
        r#"{"age": 58, "glucose": 140, "activity": "sedentary", "family_history": true}"#,
    );
    let err = AssessmentPipeline::new(&ctx).assess(&input).unwrap_err();
    assert!(matches!(
        err,
        AssessError::Normalize(NormalizeError::MissingField(field)) if field == "bmi"
    ));
}

#[test]
fn out_of_range_glucose_is_rejected_not_clamped() {
    let ctx = context();
    let input = patient(
        r#"{"age": 58, "glucose": -10, "bmi": 32,
            "activity": "sedentary", "family_history": true}"#,
    );
    let err = AssessmentPipeline::new(&ctx).assess(&input).unwrap_err();
    assert!(matches!(
        err,
        AssessError::Normalize(NormalizeError::OutOfRange { field, .. }) if field == "glucose"
    ));
}

#[test]
fn echoed_vector_reproduces_the_score_through_the_adapter_alone() {
    let ctx = context();
    let result = AssessmentPipeline::new(&ctx).assess(&patient(PATIENT)).unwrap();
    let replay = ctx.adapter().predict(&result.features).unwrap();
    assert_eq!(replay, result.score);
}

#[test]
fn risk_score_is_monotone_in_glucose_end_to_end() {
    let ctx = context();
    let pipeline = AssessmentPipeline::new(&ctx);
    let mut last = 0.0;
    for glucose in [100, 120, 140, 160, 180] {
        let input = patient(&format!(
            r#"{{"age": 58, "glucose": {glucose}, "bmi": 32,
                "activity": "sedentary", "family_history": true}}"#,
        ));
        let result = pipeline.assess(&input).unwrap();
        assert!(result.score.probability >= last);
        last = result.score.probability;
    }
}

#[test]
fn batch_scores_each_patient_independently_in_order() {
    let ctx = context();
    let pipeline = AssessmentPipeline::new(&ctx);
    let inputs = vec![
        patient(PATIENT),
        patient(r#"{"age": 58, "glucose": 140, "family_history": true}"#),
        patient(
            r#"{"age": 40, "glucose": 100, "bmi": 22,
                "activity": "active", "family_history": false}"#,
        ),
    ];

    let results = pipeline.assess_batch(&inputs);
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(matches!(
        results[1].as_ref().unwrap_err(),
        AssessError::Normalize(NormalizeError::MissingField(field)) if field == "bmi"
    ));
    let low = results[2].as_ref().unwrap();
    assert!(low.category < RiskCategory::Critical);
}

#[test]
fn artifact_thresholds_override_the_defaults() {
    let artifact = ARTIFACT.replace(
        r#"{"moderate": 0.25, "high": 0.5, "critical": 0.75}"#,
        r#"{"moderate": 0.2, "high": 0.4, "critical": 0.9}"#,
    );
    let ctx = AssessmentContext::init(SCHEMA, &artifact, RULES).unwrap();
    let result = AssessmentPipeline::new(&ctx).assess(&patient(PATIENT)).unwrap();
    // ≈0.786 clears 0.4 but not 0.9 under the shifted cuts.
    assert_eq!(result.category, RiskCategory::High);
}

#[test]
fn omitted_thresholds_fall_back_to_the_defaults() {
    let artifact = ARTIFACT.replace(
        r#""thresholds": {"moderate": 0.25, "high": 0.5, "critical": 0.75},"#,
        "",
    );
    let ctx = AssessmentContext::init(SCHEMA, &artifact, RULES).unwrap();
    let result = AssessmentPipeline::new(&ctx).assess(&patient(PATIENT)).unwrap();
    assert_eq!(result.category, RiskCategory::Critical);
}

#[test]
fn descending_thresholds_are_fatal_at_init() {
    let artifact = ARTIFACT.replace(
        r#"{"moderate": 0.25, "high": 0.5, "critical": 0.75}"#,
        r#"{"moderate": 0.5, "high": 0.25, "critical": 0.75}"#,
    );
    let err = AssessmentContext::init(SCHEMA, &artifact, RULES).unwrap_err();
    assert!(matches!(err, InitError::Thresholds(_)));
}

#[test]
fn contexts_are_independent_for_ab_comparison() {
    let ctx_a = context();
    // Same schema and rules, second artifact with a flatter glucose weight.
    let artifact_b = ARTIFACT
        .replace("\"model_version\": \"demo-1\"", "\"model_version\": \"demo-2\"")
        .replace(
            "[0.4, 2.0, 0.5, 0.3, 0.0, -0.2, 0.8]",
            "[0.4, 1.0, 0.5, 0.3, 0.0, -0.2, 0.8]",
        );
    let ctx_b = AssessmentContext::init(SCHEMA, &artifact_b, RULES).unwrap();

    let input = patient(PATIENT);
    let a = AssessmentPipeline::new(&ctx_a).assess(&input).unwrap();
    let b = AssessmentPipeline::new(&ctx_b).assess(&input).unwrap();

    assert_eq!(a.score.model_version, "demo-1");
    assert_eq!(b.score.model_version, "demo-2");
    assert!(a.score.probability > b.score.probability);

    ctx_b.unload();
    assert!(AssessmentPipeline::new(&ctx_a).assess(&input).is_ok());
}

#[test]
fn mismatched_artifact_is_fatal_at_init() {
    let artifact = ARTIFACT.replace("\"schema_version\": \"v1\"", "\"schema_version\": \"v0\"");
    let err = AssessmentContext::init(SCHEMA, &artifact, RULES).unwrap_err();
    assert!(matches!(err, InitError::Model(_)));
}

#[test]
fn bad_rules_are_fatal_at_init() {
    let rules = RULES.replace("\"field\": \"glucose\"", "\"field\": \"cholesterol\"");
    let err = AssessmentContext::init(SCHEMA, ARTIFACT, &rules).unwrap_err();
    assert!(matches!(err, InitError::Rules(_)));
}
