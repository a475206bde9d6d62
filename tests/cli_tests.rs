// CLI behavior of the loan-wizard binary
// Offline commands only; `apply` needs a live backend and is covered through the adapter tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const APPLICATION: &str = "tests/fixtures/application.json";

fn loan_wizard() -> Command {
    let mut cmd = Command::cargo_bin("loan-wizard").unwrap();
    cmd.env("RUST_LOG", "error");
    cmd
}

fn input_file(json: &serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{json}").unwrap();
    file
}

fn application_with(step: &str, field: &str, value: serde_json::Value) -> serde_json::Value {
    let content = std::fs::read_to_string(APPLICATION).unwrap();
    let mut json: serde_json::Value = serde_json::from_str(&content).unwrap();
    json[step][field] = value;
    json
}

#[test]
fn test_steps_lists_the_wizard_graph() {
    loan_wizard()
        .arg("steps")
        .assert()
        .success()
        .stdout(predicate::str::contains("📋 Loan application steps"))
        .stdout(predicate::str::contains("1. personal_info"))
        .stdout(predicate::str::contains("ADVANCE → credit_parameters"))
        .stdout(predicate::str::contains("BACK → passport_info"))
        .stdout(predicate::str::contains("submit → success"))
        .stdout(predicate::str::contains("success  terminal"));
}

#[test]
fn test_validate_accepts_complete_steps() {
    for step in ["personal", "credit", "passport", "income"] {
        loan_wizard()
            .args(["validate", "--step", step, "--input", APPLICATION])
            .assert()
            .success()
            .stdout(predicate::str::contains("is valid"));
    }
}

#[test]
fn test_validate_reports_invalid_fields() {
    let json = application_with("passport_info", "passport_division_code", "77-1".into());
    let file = input_file(&json);

    loan_wizard()
        .args(["validate", "--step", "passport", "--input"])
        .arg(file.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("❌ passport_info has invalid fields:"))
        .stdout(predicate::str::contains("passport_division_code: Enter the division code as 000-000"));
}

#[test]
fn test_validate_rejects_inn_for_wrong_company_type() {
    let json = application_with("income_info", "company_type", "ip".into());
    let file = input_file(&json);

    loan_wizard()
        .args(["validate", "--step", "4", "--input"])
        .arg(file.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("company_type"));
}

#[test]
fn test_validate_rejects_unknown_step_and_field() {
    loan_wizard()
        .args(["validate", "--step", "summary", "--input", APPLICATION])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown wizard step"));

    let json = application_with("personal_info", "nickname", "ivan".into());
    let file = input_file(&json);
    loan_wizard()
        .args(["validate", "--step", "personal", "--input"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("nickname"));
}

#[test]
fn test_payload_prints_backend_fields() {
    let output = loan_wizard()
        .args(["payload", "--input", APPLICATION])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let payload: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(payload["surname"], "Иванов");
    assert_eq!(payload["second_name"], "Иванович");
    assert_eq!(payload["passport_serial"], "4506");
    assert_eq!(payload["inn"], "7707083893");
    assert_eq!(payload["credit_period"], "24");
    assert_eq!(payload["test"], true);
    assert!(payload["guid"].as_str().is_some_and(|guid| !guid.is_empty()));
    assert!(payload.get("credit_rate-ins").is_some());
}

#[test]
fn test_config_file_switches_off_test_mode() {
    let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(config, "[backend]\ntest_mode = false").unwrap();

    let output = loan_wizard()
        .arg("--config")
        .arg(config.path())
        .args(["payload", "--input", APPLICATION])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let payload: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(payload["test"], false);
}

#[test]
fn test_missing_input_file_fails() {
    assert!(!Path::new("does-not-exist.json").exists());
    loan_wizard()
        .args(["payload", "--input", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read input file"));
}
