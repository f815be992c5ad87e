//! Command-line tests running the `process-audit` binary against a
//! temporary data directory.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

const CLIENT: &str = "5f1c2d3e-4b5a-4c6d-8e7f-0a1b2c3d4e5f";

fn cmd(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("process-audit").unwrap();
    cmd.env("PROCESS_AUDIT_DATA_DIR", data_dir)
        .env_remove("PROCESS_AUDIT_ACTOR")
        .env_remove("RUST_LOG");
    cmd
}

fn write_snapshot(dir: &Path, name: &str, value: Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
    path
}

fn promise_draft() -> Value {
    json!({
        "id": "promise_draft",
        "displayName": "Promise.pdf",
        "url": "https://files.example.com/promise.pdf",
        "type": "application/pdf"
    })
}

/// Snapshots where `promiseSent` goes from not started to completed
fn completion_snapshots(dir: &Path) -> (PathBuf, PathBuf) {
    let before = write_snapshot(
        dir,
        "before.json",
        json!({ "promiseSent": { "completed": false } }),
    );
    let after = write_snapshot(
        dir,
        "after.json",
        json!({
            "promiseSent": {
                "completed": true,
                "completionDate": "2024-01-10",
                "evidences": { "promise_draft": promise_draft() }
            }
        }),
    );
    (before, after)
}

fn diff_args(before: &Path, after: &Path) -> Vec<OsString> {
    vec![
        OsString::from("diff"),
        "--before".into(),
        before.into(),
        "--after".into(),
        after.into(),
        "--client".into(),
        CLIENT.into(),
        "--actor".into(),
        "u-42".into(),
        "--actor-name".into(),
        "Marta Ruiz".into(),
    ]
}

#[test]
fn init_creates_settings_and_catalog() {
    let data = TempDir::new().unwrap();

    cmd(data.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));

    assert!(data.path().join("config.json").exists());
    let catalog = fs::read_to_string(data.path().join("steps.yaml")).unwrap();
    assert!(catalog.contains("promiseSent"));

    cmd(data.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("steps.yaml"));
}

#[test]
fn steps_are_numbered_per_context() {
    let data = TempDir::new().unwrap();

    cmd(data.path())
        .arg("steps")
        .assert()
        .success()
        .stdout(predicate::str::contains("2/6  promiseSent"))
        .stdout(predicate::str::contains("Applicable: 6 of 11 steps"));

    cmd(data.path())
        .args(["steps", "--payment-method", "mortgage"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4/9  titleStudyPaid"));

    cmd(data.path())
        .args(["steps", "-m", "barter"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown payment method"));
}

#[test]
fn diff_previews_without_publishing() {
    let data = TempDir::new().unwrap();
    let (before, after) = completion_snapshots(data.path());

    cmd(data.path())
        .args(diff_args(&before, &after))
        .assert()
        .success()
        .stdout(predicate::str::contains("Step completed: Promise of sale sent"))
        .stdout(predicate::str::contains("1 entries (preview"));

    assert!(!data.path().join("audit.log").exists());
}

#[test]
fn diff_publishes_json_entries() {
    let data = TempDir::new().unwrap();
    let (before, after) = completion_snapshots(data.path());

    let output = cmd(data.path())
        .args(diff_args(&before, &after))
        .args(["--publish", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: Value = serde_json::from_slice(&output.stdout).unwrap();
    let payload = &entries[0]["structuredPayload"];
    assert_eq!(payload["type"], json!("completion"));
    assert_eq!(payload["step"]["number"], json!(2));
    assert_eq!(payload["step"]["total"], json!(6));
    assert_eq!(payload["evidences"]["after"][0]["name"], json!("Promise draft"));
    assert_eq!(entries[0]["actor"]["displayName"], json!("Marta Ruiz"));

    let log = fs::read_to_string(data.path().join("audit.log")).unwrap();
    assert_eq!(log.lines().count(), 1);
}

#[test]
fn identical_snapshots_produce_nothing() {
    let data = TempDir::new().unwrap();
    let (_, after) = completion_snapshots(data.path());

    cmd(data.path())
        .args(diff_args(&after, &after))
        .arg("--publish")
        .assert()
        .success()
        .stdout(predicate::str::contains("No auditable changes."));

    assert!(!data.path().join("audit.log").exists());
}

#[test]
fn reopening_without_changes_fails() {
    let data = TempDir::new().unwrap();
    let completed = json!({
        "completed": true,
        "completionDate": "2024-01-10",
        "evidences": { "promise_draft": promise_draft() }
    });
    let before = write_snapshot(
        data.path(),
        "before.json",
        json!({ "promiseSent": completed.clone() }),
    );
    let after = write_snapshot(
        data.path(),
        "after.json",
        json!({
            "promiseSent": {
                "completed": true,
                "completionDate": "2024-01-10",
                "evidences": { "promise_draft": promise_draft() },
                "reopeningReason": "double check",
                "reopeningAt": "2024-01-12T09:30:00Z",
                "previousState": completed
            }
        }),
    );

    cmd(data.path())
        .args(diff_args(&before, &after))
        .arg("--publish")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Business rule violation"));

    assert!(!data.path().join("audit.log").exists());
}

#[test]
fn unknown_step_in_snapshot_fails() {
    let data = TempDir::new().unwrap();
    let before = write_snapshot(data.path(), "before.json", json!({}));
    let after = write_snapshot(
        data.path(),
        "after.json",
        json!({ "paintingDone": { "completed": true, "completionDate": "2024-01-10" } }),
    );

    cmd(data.path())
        .args(diff_args(&before, &after))
        .assert()
        .failure()
        .stderr(predicate::str::contains("paintingDone"));
}

#[test]
fn log_and_export_read_published_entries() {
    let data = TempDir::new().unwrap();
    let (before, after) = completion_snapshots(data.path());

    cmd(data.path())
        .args(diff_args(&before, &after))
        .arg("--publish")
        .assert()
        .success()
        .stdout(predicate::str::contains("Published 1 entries"));

    cmd(data.path())
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains("Marta Ruiz"))
        .stdout(predicate::str::contains("Total: 1 entries"));

    cmd(data.path())
        .args(["log", "--client", CLIENT, "--history"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Promise of sale sent completed on 2024-01-10",
        ));

    cmd(data.path())
        .args(["export", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("promiseSent"))
        .stdout(predicate::str::contains("completion"));

    let export_path = data.path().join("export.json");
    cmd(data.path())
        .args(["export", "-f", "json", "-o"])
        .arg(&export_path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Exported 1 entries"));

    let export: Value =
        serde_json::from_str(&fs::read_to_string(&export_path).unwrap()).unwrap();
    assert_eq!(export["metadata"]["entry_count"], json!(1));
    assert_eq!(export["entries"][0]["structuredPayload"]["step"]["key"], json!("promiseSent"));
}
