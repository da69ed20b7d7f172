//! Integration tests running the real `formscan` binary.
//!
//! None of these reach an external service: every run either needs no
//! credentials or fails before the first network call.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT_NOT_FOUND: i32 = 2;
const EXIT_CONFIGURATION: i32 = 3;

const CREDENTIAL_VARS: &[&str] = &[
    "AZURE_AI_SERVICES_URL",
    "AZURE_AI_SERVICES_KEY",
    "AZURE_OPENAI_SERVICES_URL",
    "AZURE_OPENAI_SERVICES_KEY",
];

/// Run the binary from `dir` with credential variables cleared.
fn formscan(dir: &Path, args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_formscan"));
    command.current_dir(dir).args(args).env_remove("RUST_LOG");
    for var in CREDENTIAL_VARS {
        command.env_remove(var);
    }
    command.output().expect("Failed to spawn formscan")
}

fn write_file(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create file");
    file.write_all(body.as_bytes()).expect("Failed to write file");
    path.display().to_string()
}

fn valid_config(dir: &Path) -> String {
    write_file(
        dir,
        "formscan.toml",
        r#"
[ocr]
endpoint = "https://ocr.invalid"
api_key = "ocr-key"

[llm]
endpoint = "https://llm.invalid"
api_key = "llm-key"
"#,
    )
}

#[test]
fn test_schema_prints_hebrew_template() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = formscan(dir.path(), &["schema", "hebrew"]);

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS));
    let template: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(template["שם משפחה"], "");
    assert_eq!(template["תאריך לידה"]["שנה"], "");
}

#[test]
fn test_schema_prints_english_template_in_order() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = formscan(dir.path(), &["schema", "EN"]);

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS));
    let stdout = String::from_utf8(output.stdout).expect("stdout is UTF-8");
    let last_name = stdout.find("\"lastName\"").expect("lastName present");
    let clinic = stdout
        .find("\"formReceiptDateAtClinic\"")
        .expect("formReceiptDateAtClinic present");
    assert!(last_name < clinic);
}

#[test]
fn test_schema_rejects_unknown_language() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = formscan(dir.path(), &["schema", "klingon"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_extract_without_endpoints_is_configuration_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_file(dir.path(), "empty.toml", "[pipeline]\ntemperature = 0.0\n");
    let form = write_file(dir.path(), "283_ex1.pdf", "%PDF-1.7");

    let output = formscan(dir.path(), &["--config", &config, "extract", &form]);

    assert_eq!(output.status.code(), Some(EXIT_CONFIGURATION));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_extract_missing_file_is_input_not_found() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = valid_config(dir.path());

    let output = formscan(dir.path(), &["--config", &config, "extract", "missing.pdf"]);

    assert_eq!(output.status.code(), Some(EXIT_INPUT_NOT_FOUND));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing.pdf"));
}

#[test]
fn test_extract_empty_file_is_input_not_found() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = valid_config(dir.path());
    let form = write_file(dir.path(), "blank.pdf", "");

    let output = formscan(dir.path(), &["--config", &config, "extract", &form]);

    assert_eq!(output.status.code(), Some(EXIT_INPUT_NOT_FOUND));
}

#[test]
fn test_batch_reports_each_missing_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = valid_config(dir.path());

    let output = formscan(
        dir.path(),
        &["--config", &config, "batch", "first.pdf", "second.pdf"],
    );

    assert_eq!(output.status.code(), Some(EXIT_INPUT_NOT_FOUND));
    let stdout = String::from_utf8(output.stdout).expect("stdout is UTF-8");
    let lines: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("line is JSON"))
        .collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["file"], "first.pdf");
    assert_eq!(lines[1]["file"], "second.pdf");
    assert!(lines.iter().all(|line| line.get("error").is_some()));
}

#[test]
fn test_batch_requires_files() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = formscan(dir.path(), &["batch"]);

    assert!(!output.status.success());
}
