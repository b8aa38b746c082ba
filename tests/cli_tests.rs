//! CLI integration tests for the `qbr` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

const DATA: &str = "\
Partner_ID,FY FQ,Opp #,Opp Stage,Product Group Detail,Est. Renewal Available
P1,FY24 Q1,O-1,Closed Won,RHEL,\"1,000\"
P1,FY24 Q2,O-2,Negotiation,Ansible,250
P2,FY24 Q1,O-3,Negotiation,RHEL,10
";

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

/// `qbr` running inside `dir` with no ambient config
fn qbr(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("qbr").unwrap();
    cmd.current_dir(dir.path()).env_remove("QBR_CONFIG");
    cmd
}

// ═══════════════════════════════════════════════════════════════════════════
// ARGUMENTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_no_arguments_exits_one() {
    let dir = TempDir::new().unwrap();
    qbr(&dir).assert().code(1);
}

#[test]
fn test_run_missing_email_exits_one() {
    let dir = TempDir::new().unwrap();
    qbr(&dir).args(["run", "P1"]).assert().code(1);
}

#[test]
fn test_help_exits_zero() {
    let dir = TempDir::new().unwrap();
    qbr(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("summarize"));
}

#[test]
fn test_version_exits_zero() {
    let dir = TempDir::new().unwrap();
    qbr(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ═══════════════════════════════════════════════════════════════════════════
// SUMMARIZE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_summarize_prints_summaries() {
    let dir = TempDir::new().unwrap();
    let data = write_file(&dir, "data.csv", DATA);

    qbr(&dir)
        .args(["summarize", "P1", "--data"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("Closed Won"))
        .stdout(predicate::str::contains("1000"))
        .stdout(predicate::str::contains("Ansible"))
        .stdout(predicate::str::contains("OpenShift").not());
}

#[test]
fn test_summarize_exports_workbook() {
    let dir = TempDir::new().unwrap();
    let data = write_file(&dir, "data.csv", DATA);
    let output = dir.path().join("summary.xlsx");

    qbr(&dir)
        .args(["summarize", "P1", "--data"])
        .arg(&data)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    assert!(output.exists());
}

#[test]
fn test_summarize_unknown_partner_fails() {
    let dir = TempDir::new().unwrap();
    let data = write_file(&dir, "data.csv", DATA);

    qbr(&dir)
        .args(["summarize", "P9", "--data"])
        .arg(&data)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No rows"));
}

#[test]
fn test_config_file_sets_data_source() {
    let dir = TempDir::new().unwrap();
    let data = write_file(&dir, "data.csv", DATA);
    let config = write_file(
        &dir,
        "custom.yaml",
        &format!("data:\n  path: {}\n", data.display()),
    );

    qbr(&dir)
        .args(["summarize", "P2", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Negotiation"));
}

// ═══════════════════════════════════════════════════════════════════════════
// RUN
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_run_without_template_fails() {
    let dir = TempDir::new().unwrap();
    let data = write_file(&dir, "data.csv", DATA);

    qbr(&dir)
        .args(["run", "P1", "user@example.com", "--data"])
        .arg(&data)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("template_presentation_id"));
}

#[test]
fn test_run_missing_credentials_fails() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "data.csv", DATA);
    write_file(
        &dir,
        "qbr.yaml",
        "template_presentation_id: tmpl-1\ncredential_path: missing.json\ndata:\n  path: data.csv\n",
    );

    qbr(&dir)
        .args(["run", "P1", "user@example.com"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ServiceInit"))
        .stderr(predicate::str::contains("missing.json"));
}
