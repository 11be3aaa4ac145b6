use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SERVICE_VARS: [&str; 5] = [
    "GCP_PROJECT_ID",
    "GCP_LOCATION",
    "DOCUMENT_AI_PROCESSOR_ID",
    "VERTEX_LOCATION",
    "GOOGLE_ACCESS_TOKEN",
];

/// Command isolated from the caller's environment and config directory.
fn stmtscan(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stmtscan").unwrap();
    for var in SERVICE_VARS {
        cmd.env_remove(var);
    }
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"));
    cmd
}

#[test]
fn parse_missing_file_fails() {
    let home = TempDir::new().unwrap();
    stmtscan(&home)
        .args(["parse", "does-not-exist.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PDF file not found"));
}

#[test]
fn categorize_garbage_payload_prints_empty_array() {
    let home = TempDir::new().unwrap();
    stmtscan(&home)
        .arg("categorize")
        .write_stdin("definitely not json")
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn categorize_without_model_marks_uncategorized() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("tx.json");
    std::fs::write(&input, r#"[{"date": "01/02", "description": "COFFEE"}]"#).unwrap();

    stmtscan(&home)
        .arg("categorize")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""category": "Uncategorized""#));
}

#[test]
fn config_init_refuses_overwrite() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("custom.json");

    stmtscan(&home)
        .args(["config", "init", "--output"])
        .arg(&config)
        .assert()
        .success();
    assert!(config.exists());

    stmtscan(&home)
        .args(["config", "init", "--output"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn config_set_persists_value() {
    let home = TempDir::new().unwrap();

    stmtscan(&home)
        .args(["config", "set", "categorizer.pacing_ms", "250"])
        .assert()
        .success();

    stmtscan(&home)
        .args(["config", "get", "categorizer.pacing_ms"])
        .assert()
        .success()
        .stdout(predicate::str::diff("250\n"));
}

#[test]
fn check_env_reports_missing_processor() {
    let home = TempDir::new().unwrap();
    stmtscan(&home)
        .arg("check-env")
        .assert()
        .success()
        .stdout(predicate::str::contains("DOCUMENT_AI_PROCESSOR_ID"))
        .stdout(predicate::str::contains("OCR unavailable"));
}

#[test]
fn check_env_picks_up_environment() {
    let home = TempDir::new().unwrap();
    stmtscan(&home)
        .arg("check-env")
        .env("GCP_PROJECT_ID", "demo-project")
        .env("DOCUMENT_AI_PROCESSOR_ID", "abc123")
        .env("GOOGLE_ACCESS_TOKEN", "ya29.secret")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "projects/demo-project/locations/us/processors/abc123",
        ))
        .stdout(predicate::str::contains("ya29.secret").not());
}

#[test]
fn config_set_digit_only_processor_id() {
    let home = TempDir::new().unwrap();

    stmtscan(&home)
        .args(["config", "set", "document_ai.processor_id", "1234567890123456"])
        .assert()
        .success();

    stmtscan(&home)
        .args(["config", "get", "document_ai.processor_id"])
        .assert()
        .success()
        .stdout(predicate::str::diff("\"1234567890123456\"\n"));
}
