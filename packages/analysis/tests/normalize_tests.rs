//! Behavioural tests for the response normalizer against realistic model
//! answers.

use pretty_assertions::assert_eq;
use skinsight_analysis::{classify_risk, normalize, normalize_bytes, NormalizedResult, RiskLevel};

fn empty() -> NormalizedResult {
    NormalizedResult::default()
}

#[test]
fn test_fenced_json() {
    let raw = "```json\n{\"condition\":\"Acne\",\"explanation\":\"x\"}\n```";
    assert_eq!(
        normalize(raw),
        NormalizedResult {
            condition: "Acne".into(),
            explanation: "x".into(),
            ..empty()
        }
    );
}

#[test]
fn test_prose_wrapped_json() {
    let raw = r#"Here is the result: {"diagnosis":"Rosacea","causes":"Sun exposure"} Thanks!"#;
    let result = normalize(raw);
    assert_eq!(result.condition, "Rosacea");
    assert_eq!(result.causes, vec!["Sun exposure".to_string()]);
    assert!(result.steps.is_empty());
    assert_eq!(result.doctor, None);
}

#[test]
fn test_prose_inside_fence() {
    let raw = "```\nSure! {\"prediction\": \"Tinea\"} hope that helps\n```";
    assert_eq!(normalize(raw).condition, "Tinea");
}

#[test]
fn test_alias_priority() {
    assert_eq!(normalize(r#"{"condition":"A","diagnosis":"B"}"#).condition, "A");
    assert_eq!(normalize(r#"{"prediction":"C","diagnosis":"B"}"#).condition, "B");
    assert_eq!(
        normalize(r#"{"description":"d","summary":"s"}"#).explanation,
        "s"
    );
    assert_eq!(
        normalize(r#"{"next_steps":["n"],"recommendations":["r"]}"#).steps,
        vec!["r".to_string()]
    );
    assert_eq!(
        normalize(r#"{"possible_causes":["p"],"causes[]":["c"]}"#).causes,
        vec!["c".to_string()]
    );
    assert_eq!(
        normalize(r#"{"referral":"r","specialist":"s"}"#).doctor.as_deref(),
        Some("s")
    );
}

#[test]
fn test_malformed_input_fallback() {
    assert_eq!(normalize("not json at all, no braces"), empty());
}

#[test]
fn test_broken_json_fallback() {
    assert_eq!(normalize("{\"condition\": \"Acne\", "), empty());
    assert_eq!(normalize("```json\n{\"condition\": }\n```"), empty());
}

#[test]
fn test_empty_input() {
    assert_eq!(normalize(""), empty());
    assert_eq!(normalize("   \n"), empty());
}

#[test]
fn test_steps_coercion() {
    assert_eq!(
        normalize(r#"{"steps": "Wash face"}"#).steps,
        vec!["Wash face".to_string()]
    );
    assert!(normalize(r#"{"steps": []}"#).steps.is_empty());
    assert!(normalize(r#"{"steps": null}"#).steps.is_empty());
    assert!(normalize(r#"{"steps": ""}"#).steps.is_empty());
}

#[test]
fn test_non_string_scalars() {
    let result = normalize(r#"{"condition": 42, "explanation": {"text": "x"}}"#);
    assert_eq!(result.condition, "42");
    assert_eq!(result.explanation, r#"{"text":"x"}"#);
}

#[test]
fn test_falsy_values_are_missing() {
    assert_eq!(normalize(r#"{"condition": 0}"#).condition, "");
    assert_eq!(normalize(r#"{"condition": false}"#).condition, "");
    assert_eq!(
        normalize(r#"{"condition": false, "diagnosis": "Rosacea"}"#).condition,
        "Rosacea"
    );
    assert_eq!(
        normalize(r#"{"condition": 0, "prediction": "Acne"}"#).condition,
        "Acne"
    );

    assert!(normalize(r#"{"causes": false}"#).causes.is_empty());
    assert!(normalize(r#"{"causes": 0}"#).causes.is_empty());
    assert_eq!(
        normalize(r#"{"causes": false, "possible_causes": "Heat"}"#).causes,
        vec!["Heat"]
    );
    assert_eq!(normalize(r#"{"steps": true}"#).steps, vec!["true"]);
    assert_eq!(normalize(r#"{"doctor": 0}"#).doctor, None);
}

#[test]
fn test_trimming() {
    let result = normalize(r#"{"condition": "  Eczema \n", "doctor": "  See a GP  "}"#);
    assert_eq!(result.condition, "Eczema");
    assert_eq!(result.doctor.as_deref(), Some("See a GP"));
}

#[test]
fn test_top_level_array_is_not_an_object() {
    assert_eq!(normalize(r#"[{"condition": "Acne"}]"#), empty());
}

#[test]
fn test_round_trip() {
    let original = NormalizedResult {
        condition: "Possible eczema".into(),
        explanation: "Dry, itchy patches".into(),
        causes: vec!["Dry skin barrier".into(), "Irritants".into()],
        steps: vec!["Moisturize 2-3x daily".into()],
        doctor: Some("See a clinician if worsening.".into()),
        risk: None,
    };
    let json = serde_json::to_string(&original).expect("serialize");
    assert_eq!(normalize(&json), original);

    let with_risk = original.with_risk();
    let json = serde_json::to_string(&with_risk).expect("serialize");
    assert_eq!(normalize(&json), with_risk);
}

#[test]
fn test_round_trip_without_doctor() {
    let original = NormalizedResult {
        condition: "Acne".into(),
        ..empty()
    };
    let json = serde_json::to_string(&original).expect("serialize");
    assert_eq!(normalize(&json), original);
}

#[test]
fn test_non_utf8_bytes() {
    let mut raw = b"{\"condition\": \"Acne\"} ".to_vec();
    raw.extend_from_slice(&[0xff, 0xfe, 0x00, 0xc3]);
    assert_eq!(normalize_bytes(&raw).condition, "Acne");
    assert_eq!(normalize_bytes(&[0xff, 0xff, 0xff]), empty());
}

#[test]
fn test_large_input() {
    let noise = "lorem ipsum ".repeat(300_000);
    let raw = format!("{noise}{{\"condition\": \"Melasma\"}}{noise}");
    assert_eq!(normalize(&raw).condition, "Melasma");

    let braces = "{".repeat(100_000);
    assert_eq!(normalize(&braces), empty());
}

#[test]
fn test_deeply_nested_json_does_not_panic() {
    let raw = format!("{}{}", "[".repeat(10_000), "]".repeat(10_000));
    assert_eq!(normalize(&raw), empty());
}

#[test]
fn test_multibyte_text_around_json() {
    let raw = "Résumé — voilà: {\"condition\": \"Urticária\"} ✓";
    assert_eq!(normalize(raw).condition, "Urticária");
}

#[test]
fn test_risk_from_normalized_result() {
    let raw = r#"{"condition": "Cellulitis", "doctor": "Seek urgent care if fever develops"}"#;
    assert_eq!(normalize(raw).with_risk().risk, Some(RiskLevel::High));
    assert_eq!(classify_risk("monitor for emergency signs"), RiskLevel::High);
}
