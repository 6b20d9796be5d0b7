// warden/tests/cli_integration_tests.rs
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;

/// Constructs a `warden` command with a fixed salt and with interfering
/// environment variables cleared, so every test starts from the same state.
fn warden_cmd() -> Command {
    let mut cmd = Command::cargo_bin("warden").unwrap();
    cmd.env("WARDEN_HASH_SALT", "cli-test-salt");
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("WARDEN_ENV");
    cmd.env_remove("WARDEN_ALLOW_DEBUG_PII");
    cmd
}

#[test]
fn redact_scrubs_name_and_email_from_stdin() {
    warden_cmd()
        .write_stdin("Contact John Smith at john.smith@example.com")
        .arg("redact")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Contact [NAME_REDACTED] at [EMAIL_REDACTED]",
        ));
}

#[test]
fn redact_respects_admin_role_from_default_policy() {
    warden_cmd()
        .write_stdin("NINO AB123456C")
        .arg("redact")
        .arg("--role")
        .arg("admin")
        .assert()
        .success()
        .stdout(predicate::str::contains("AB123456C"));
}

#[test]
fn redact_summary_reports_counts_not_matches() {
    let output = warden_cmd()
        .write_stdin("Sort code 12-34-56, email clerk@example.com")
        .arg("redact")
        .arg("--summary")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Redaction Summary"));
    assert!(stderr.contains("sort_code: 1 match(es)"));
    assert!(stderr.contains("email: 1 match(es)"));
    assert!(!stderr.contains("12-34-56"));
    assert!(!stderr.contains("clerk@example.com"));
}

#[test]
fn redact_hash_level_is_deterministic_across_runs() {
    let run = || {
        let output = warden_cmd()
            .write_stdin("sort 12-34-56")
            .arg("redact")
            .arg("--level")
            .arg("hash")
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8_lossy(&output.stdout).to_string()
    };
    let first = run();
    assert!(first.contains("[SORT_"));
    assert_eq!(first, run());
}

#[test]
fn redact_json_walks_structure_and_preserves_shape() {
    let output = warden_cmd()
        .write_stdin(r#"{"client": "John Smith", "age": 41, "active": true}"#)
        .arg("redact")
        .arg("--json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["client"], Value::String("[NAME_REDACTED]".into()));
    assert_eq!(json["age"], Value::from(41));
    assert_eq!(json["active"], Value::from(true));
}

#[test]
fn redact_without_salt_fails_with_guidance() {
    let mut cmd = Command::cargo_bin("warden").unwrap();
    cmd.env_remove("WARDEN_HASH_SALT");
    cmd.write_stdin("anything")
        .arg("redact")
        .assert()
        .failure()
        .stderr(predicate::str::contains("WARDEN_HASH_SALT"));
}

#[test]
fn redact_exempt_category_passes_matches_through() {
    warden_cmd()
        .write_stdin("mail clerk@example.com")
        .arg("redact")
        .arg("--exempt")
        .arg("contact")
        .assert()
        .success()
        .stdout(predicate::str::contains("clerk@example.com"));
}

#[test]
fn scan_clean_input_reports_nothing() {
    warden_cmd()
        .write_stdin("This is a generic message.")
        .arg("scan")
        .assert()
        .success()
        .stderr(predicate::str::contains("No sensitive data detected."));
}

#[test]
fn scan_fail_on_pii_blocks_with_categories() {
    warden_cmd()
        .write_stdin("NINO AB123456C for John Smith")
        .arg("scan")
        .arg("--fail-on-pii")
        .assert()
        .failure()
        .stderr(predicate::str::contains("IDENTIFIER"));
}

#[test]
fn scan_json_report_is_machine_readable() {
    let output = warden_cmd()
        .write_stdin("Sort code 12-34-56")
        .arg("scan")
        .arg("--json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["has_pii"], Value::from(true));
    assert!(json["categories"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c == "financial"));
}

#[test]
fn rules_json_lists_builtin_set() {
    let output = warden_cmd().arg("rules").arg("--json").output().unwrap();

    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    let total = json["stats"]["total_rules"].as_u64().unwrap();
    assert!(total >= 10);
    let ids: Vec<&str> = json["rules"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"email"));
    assert!(ids.contains(&"uk_nino"));
    // Registration order survives serialization: email scans before names.
    let email_pos = ids.iter().position(|id| *id == "email").unwrap();
    let name_pos = ids.iter().position(|id| *id == "person_name").unwrap();
    assert!(email_pos < name_pos);
}

#[test]
fn custom_rules_file_extends_the_scan() {
    let dir = tempfile::tempdir().unwrap();
    let rules_path = dir.path().join("extra_rules.yaml");
    fs::write(
        &rules_path,
        r#"
- id: matter_code
  name: Matter code
  pattern: '\bMTR/\d{6}\b'
  category: legal
  severity: high
"#,
    )
    .unwrap();

    warden_cmd()
        .write_stdin("see MTR/204511")
        .arg("redact")
        .arg("--rules")
        .arg(&rules_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[MATTER_CODE_REDACTED]"));
}
