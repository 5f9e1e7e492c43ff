//! Tests for the `skinsight-normalize` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn normalize_cmd() -> Command {
    Command::cargo_bin("skinsight-normalize").expect("binary should be built")
}

#[test]
fn test_reads_stdin() {
    let output = normalize_cmd()
        .arg("--compact")
        .write_stdin("```json\n{\"diagnosis\": \"Acne\", \"steps\": \"Wash face\"}\n```")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(
        value,
        serde_json::json!({
            "condition": "Acne",
            "explanation": "",
            "causes": [],
            "steps": ["Wash face"],
        })
    );
}

#[test]
fn test_reads_file_with_risk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("response.txt");
    fs::write(
        &path,
        r#"Analysis: {"condition": "Cellulitis", "doctor": "Urgent: see a doctor today"}"#,
    )
    .expect("write fixture");

    normalize_cmd()
        .arg(&path)
        .arg("--risk")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"risk\": \"High\""))
        .stdout(predicate::str::contains("\"condition\": \"Cellulitis\""));
}

#[test]
fn test_garbage_input_still_succeeds() {
    normalize_cmd()
        .write_stdin(vec![0xff_u8, 0xfe, 0x00])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"condition\": \"\""));
}

#[test]
fn test_missing_file_fails() {
    normalize_cmd()
        .arg("/nonexistent/skinsight/response.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read input"));
}
