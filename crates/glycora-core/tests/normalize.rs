use glycora_core::error::NormalizeError;
use glycora_core::input::{normalize, PatientInput};
use glycora_core::schema::FeatureSchema;

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

fn schema() -> FeatureSchema {
    FeatureSchema::from_json(SCHEMA).unwrap()
}

fn patient(json: &str) -> PatientInput {
    serde_json::from_str(json).unwrap()
}

#[test]
fn full_input_produces_the_expected_vector() {
    let input = patient(
        r#"{"age": 58, "glucose": 140, "bmi": 32,
            "activity": "sedentary", "family_history": true}"#,
    );
    let vector = normalize(&input, &schema()).unwrap();
    assert_eq!(vector.schema_version, "v1");
    assert_eq!(vector.values, vec![0.5, 0.5, 1.0, 1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn normalization_is_deterministic() {
    let input = patient(
        r#"{"age": 61, "glucose": 180, "bmi": 24.5,
            "activity": "active", "family_history": false}"#,
    );
    let schema = schema();
    assert_eq!(
        normalize(&input, &schema).unwrap(),
        normalize(&input, &schema).unwrap()
    );
}

#[test]
fn missing_required_field_names_the_field() {
    let input = patient(
        r#"{"age": 58, "glucose": 140, "activity": "sedentary", "family_history": true}"#,
    );
    let err = normalize(&input, &schema()).unwrap_err();
    assert_eq!(err, NormalizeError::MissingField("bmi".to_string()));
}

#[test]
fn absent_optional_field_takes_the_schema_default() {
    let input = patient(r#"{"age": 58, "glucose": 140, "bmi": 32, "family_history": true}"#);
    let vector = normalize(&input, &schema()).unwrap();
    // activity defaults to "moderate": second one-hot slot.
    assert_eq!(&vector.values[3..6], &[0.0, 1.0, 0.0]);
}

#[test]
fn string_for_a_continuous_field_is_a_type_mismatch() {
    let input = patient(
        r#"{"age": 58, "glucose": "140", "bmi": 32,
            "activity": "sedentary", "family_history": true}"#,
    );
    let err = normalize(&input, &schema()).unwrap_err();
    assert_eq!(
        err,
        NormalizeError::TypeMismatch {
            field: "glucose".to_string(),
            expected: "number",
            got: "string",
        }
    );
}

#[test]
fn number_for_a_boolean_field_is_a_type_mismatch() {
    let input = patient(
        r#"{"age": 58, "glucose": 140, "bmi": 32,
            "activity": "sedentary", "family_history": 1}"#,
    );
    let err = normalize(&input, &schema()).unwrap_err();
    assert_eq!(
        err,
        NormalizeError::TypeMismatch {
            field: "family_history".to_string(),
            expected: "boolean",
            got: "number",
        }
    );
}

#[test]
fn out_of_range_value_is_rejected_not_clamped() {
    let input = patient(
        r#"{"age": 58, "glucose": -10, "bmi": 32,
            "activity": "sedentary", "family_history": true}"#,
    );
    let err = normalize(&input, &schema()).unwrap_err();
    assert_eq!(
        err,
        NormalizeError::OutOfRange {
            field: "glucose".to_string(),
            value: -10.0,
            min: 40.0,
            max: 400.0,
        }
    );
}

#[test]
fn unknown_category_is_rejected() {
    let input = patient(
        r#"{"age": 58, "glucose": 140, "bmi": 32,
            "activity": "couch", "family_history": true}"#,
    );
    let err = normalize(&input, &schema()).unwrap_err();
    assert_eq!(
        err,
        NormalizeError::UnknownCategory {
            field: "activity".to_string(),
            category: "couch".to_string(),
        }
    );
}

#[test]
fn extra_fields_not_in_the_schema_are_ignored() {
    let input = patient(
        r#"{"age": 58, "glucose": 140, "bmi": 32, "activity": "sedentary",
            "family_history": true, "favorite_color": "green"}"#,
    );
    let vector = normalize(&input, &schema()).unwrap();
    assert_eq!(vector.values.len(), 7);
}
