//! End-to-end tests for the `pennywise` binary

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const BACKUP: &str = r#"{
  "version": 1,
  "exportedAt": "2024-07-04T12:00:00Z",
  "data": {
    "accounts": [
      {"id": "acc-1", "name": "Checking", "type": "checking", "balance": 1250.5}
    ],
    "categories": [
      {"id": "cat-1", "name": "Groceries", "type": "expense"}
    ],
    "transactions": [
      {"id": "txn-1", "account_id": "acc-1", "category_id": "cat-1",
       "amount": -54.25, "type": "expense", "description": "Market",
       "date": 1705276800000},
      {"id": "txn-2", "account_id": "acc-1", "amount": 300.0,
       "type": "income", "description": "Refund", "date": 1708387200000}
    ],
    "bills": [],
    "goals": [],
    "goalContributions": [],
    "budgets": [],
    "recurringPatterns": []
  }
}"#;

fn pennywise(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pennywise").unwrap();
    cmd.env("PENNYWISE_DATA_DIR", data_dir)
        .env_remove("PENNYWISE_PASSWORD")
        .env_remove("PENNYWISE_LOG")
        .write_stdin("");
    cmd
}

fn read_json(path: &Path) -> Value {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

/// Loads `BACKUP` into a fresh data directory
fn seeded_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let backup = dir.path().join("seed.json");
    fs::write(&backup, BACKUP).unwrap();

    pennywise(dir.path())
        .args(["import", "--force"])
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("Import (replace) completed"));
    dir
}

#[test]
fn test_init_creates_database_and_settings() {
    let dir = TempDir::new().unwrap();

    pennywise(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));

    assert!(dir.path().join("pennywise.sqlite3").exists());
    assert!(dir.path().join("config.json").exists());

    pennywise(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already initialized"));
}

#[test]
fn test_config_shows_paths() {
    let dir = TempDir::new().unwrap();

    pennywise(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("pennywise.sqlite3"))
        .stdout(predicate::str::contains("Default import mode: replace"));
}

#[test]
fn test_export_after_import_round_trips() {
    let dir = seeded_dir();
    let output = dir.path().join("backup.json");

    pennywise(dir.path())
        .arg("export")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Records: 4"));

    let snapshot = read_json(&output);
    assert_eq!(snapshot["version"], 1);
    assert_eq!(snapshot["scope"], "all");
    assert_eq!(snapshot["metadata"]["totalTransactions"], 2);
    assert_eq!(snapshot["data"]["transactions"][0]["id"], "txn-1");
    assert_eq!(snapshot["data"]["accounts"][0]["balance"], 1250.5);

    // Merging the same backup again adds nothing
    pennywise(dir.path())
        .args(["import", "--mode", "merge"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 0, skipped 4"));
}

#[test]
fn test_scoped_export_with_date_range() {
    let dir = seeded_dir();
    let output = dir.path().join("february.json");

    pennywise(dir.path())
        .args(["export", "--scope", "transactions", "--from", "2024-02-01", "--to", "2024-02-29"])
        .arg(&output)
        .assert()
        .success();

    let snapshot = read_json(&output);
    assert_eq!(snapshot["scope"], "transactions");
    assert_eq!(snapshot["data"]["accounts"].as_array().unwrap().len(), 0);
    let transactions = snapshot["data"]["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["id"], "txn-2");
}

#[test]
fn test_csv_export() {
    let dir = seeded_dir();
    let output = dir.path().join("transactions.csv");

    pennywise(dir.path())
        .args(["export", "--format", "csv", "--date-format", "YYYY-MM-DD"])
        .arg(&output)
        .assert()
        .success();

    let csv = fs::read_to_string(&output).unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("Date,Description"));
    // Newest first
    assert!(lines.next().unwrap().starts_with("2024-02-20,Refund"));
    assert!(lines.next().unwrap().contains("Groceries"));
}

#[test]
fn test_export_into_directory_uses_dated_name() {
    let dir = seeded_dir();
    let exports = dir.path().join("exports");

    pennywise(dir.path())
        .arg("export")
        .arg(&exports)
        .assert()
        .success()
        .stdout(predicate::str::contains("pennywise-backup-"));

    let written: Vec<_> = fs::read_dir(&exports).unwrap().collect();
    assert_eq!(written.len(), 1);
}

#[test]
fn test_encrypted_round_trip() {
    let dir = seeded_dir();
    let output = dir.path().join("sealed.json");

    pennywise(dir.path())
        .env("PENNYWISE_PASSWORD", "correct horse")
        .args(["export", "--encrypt"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("encrypted backup"));

    let envelope = read_json(&output);
    assert_eq!(envelope["encrypted"], true);
    assert_eq!(envelope["algorithm"], "aes-256-gcm");
    assert!(envelope.get("data").unwrap().is_string());

    pennywise(dir.path())
        .env("PENNYWISE_PASSWORD", "correct horse")
        .args(["import", "--force"])
        .arg(&output)
        .assert()
        .success();
}

#[test]
fn test_encrypted_import_without_password_is_client_error() {
    let dir = seeded_dir();
    let output = dir.path().join("sealed.json");

    pennywise(dir.path())
        .env("PENNYWISE_PASSWORD", "correct horse")
        .args(["export", "--encrypt"])
        .arg(&output)
        .assert()
        .success();

    pennywise(dir.path())
        .args(["import", "--force"])
        .arg(&output)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("no records were written"));

    pennywise(dir.path())
        .env("PENNYWISE_PASSWORD", "wrong")
        .args(["import", "--force"])
        .arg(&output)
        .assert()
        .code(2);
}

#[test]
fn test_encrypted_export_without_password_fails() {
    let dir = seeded_dir();

    pennywise(dir.path())
        .args(["export", "--encrypt"])
        .arg(dir.path().join("sealed.json"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("password is required"));
}

#[test]
fn test_inspect_reports_invalid_backup() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("broken.json");
    fs::write(&file, r#"{"version": 9, "data": {}}"#).unwrap();

    pennywise(dir.path())
        .arg("inspect")
        .arg(&file)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Invalid backup"));
}

#[test]
fn test_inspect_valid_backup() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("backup.json");
    fs::write(&file, BACKUP).unwrap();

    pennywise(dir.path())
        .arg("inspect")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Valid backup (v1, scope all): 4 records"));
}

#[test]
fn test_replace_without_force_can_be_declined() {
    let dir = seeded_dir();
    let file = dir.path().join("empty.json");
    fs::write(
        &file,
        r#"{"version":1,"exportedAt":"2024-07-04T12:00:00Z","data":{
            "accounts":[],"categories":[],"transactions":[],"bills":[],"goals":[],
            "goalContributions":[],"budgets":[],"recurringPatterns":[]}}"#,
    )
    .unwrap();

    pennywise(dir.path())
        .arg("import")
        .arg(&file)
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Import cancelled."));

    // Data is still there
    pennywise(dir.path())
        .arg("export")
        .arg(dir.path().join("after.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Records: 4"));
}

#[test]
fn test_history_lists_operations() {
    let dir = seeded_dir();

    pennywise(dir.path())
        .arg("export")
        .arg(dir.path().join("backup.json"))
        .assert()
        .success();

    pennywise(dir.path())
        .args(["history", "-n", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("IMPORT replace"))
        .stdout(predicate::str::contains("EXPORT all (json)"));
}
