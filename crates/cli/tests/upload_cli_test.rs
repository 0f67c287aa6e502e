//! # CLI Tests
//!
//! Runs the `docload` binary end to end. Only paths that never reach the
//! network are covered: dry runs and startup failures.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

/// Helper to create a fixture file within a given directory.
fn create_fixture_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let file_path = dir.join(name);
    fs::write(&file_path, content).expect("Failed to write fixture file");
    file_path
}

/// A `docload` command isolated from the caller's working directory and environment.
fn docload(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("docload").unwrap();
    cmd.current_dir(dir);
    for var in [
        "DOCLOAD_CREDENTIAL_PATH",
        "DOCLOAD_DATA_PATH",
        "DOCLOAD_COLLECTION",
        "DOCLOAD_PROJECT_ID",
        "DOCLOAD_DATABASE_ID",
        "DOCLOAD_EMULATOR_HOST",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_dry_run_reports_each_record() {
    let temp_dir = tempdir().unwrap();
    let data = serde_json::json!([
        {"id": 1, "name": "Ada Lovelace"},
        {"name": "Grace Hopper"}
    ]);
    let data_path = create_fixture_file(temp_dir.path(), "professors.json", &data.to_string());

    docload(temp_dir.path())
        .arg("--dry-run")
        .arg("--data")
        .arg(&data_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Would upload: Ada Lovelace"))
        .stdout(predicate::str::contains("Would upload: Grace Hopper"))
        .stdout(predicate::str::contains("Uploaded:").not())
        .stdout(predicate::str::contains(
            "All 2 records uploaded to collection 'professors'",
        ));
}

#[test]
fn test_dry_run_empty_array_succeeds() {
    let temp_dir = tempdir().unwrap();
    let data_path = create_fixture_file(temp_dir.path(), "empty.json", "[]");

    docload(temp_dir.path())
        .args(["--dry-run", "--collection", "staff", "--data"])
        .arg(&data_path)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("upload:").not())
        .stdout(predicate::str::contains(
            "All 0 records uploaded to collection 'staff'",
        ));
}

#[test]
fn test_malformed_json_fails_before_any_write() {
    let temp_dir = tempdir().unwrap();
    let data_path = create_fixture_file(temp_dir.path(), "bad.json", "[{\"id\": 1,");

    docload(temp_dir.path())
        .arg("--dry-run")
        .arg("--data")
        .arg(&data_path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("upload:").not())
        .stderr(predicate::str::contains("Error uploading data"))
        .stderr(predicate::str::contains("Failed to parse data file"));
}

#[test]
fn test_failed_record_is_reported_once() {
    let temp_dir = tempdir().unwrap();
    let data_path = create_fixture_file(
        temp_dir.path(),
        "professors.json",
        r#"[{"id": "a", "name": "Ada Lovelace"}, 5]"#,
    );

    docload(temp_dir.path())
        .arg("--dry-run")
        .arg("--data")
        .arg(&data_path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Would upload: Ada Lovelace"))
        .stdout(predicate::str::contains("All").not())
        .stderr(predicate::str::contains("Upload aborted").not())
        .stderr(predicate::function(|err: &str| {
            err.matches("Record 1 is not a JSON object").count() == 1
        }));
}

#[test]
fn test_missing_data_file_fails() {
    let temp_dir = tempdir().unwrap();

    docload(temp_dir.path())
        .args(["--dry-run", "--data", "nowhere.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read data file"));
}

#[test]
fn test_missing_credentials_fail() {
    let temp_dir = tempdir().unwrap();
    let data_path = create_fixture_file(temp_dir.path(), "professors.json", "[]");

    docload(temp_dir.path())
        .arg("--data")
        .arg(&data_path)
        .args(["--credentials", "missing_key.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Credential error"));
}

#[test]
fn test_invalid_credentials_fail() {
    let temp_dir = tempdir().unwrap();
    let data_path = create_fixture_file(temp_dir.path(), "professors.json", "[]");
    let key_path = create_fixture_file(temp_dir.path(), "service_key.json", "not json");

    docload(temp_dir.path())
        .arg("--data")
        .arg(&data_path)
        .arg("--credentials")
        .arg(&key_path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Credential error"));
}

#[test]
fn test_config_file_is_used() {
    let temp_dir = tempdir().unwrap();
    create_fixture_file(
        temp_dir.path(),
        "records.json",
        r#"[{"id": "x1", "name": "Barbara Liskov"}]"#,
    );
    create_fixture_file(
        temp_dir.path(),
        "docload.yml",
        "data_path: records.json\ncollection: faculty\n",
    );

    docload(temp_dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Would upload: Barbara Liskov"))
        .stdout(predicate::str::contains(
            "All 1 records uploaded to collection 'faculty'",
        ));
}

#[test]
fn test_invalid_collection_flag_fails() {
    let temp_dir = tempdir().unwrap();
    let data_path = create_fixture_file(temp_dir.path(), "professors.json", "[]");

    docload(temp_dir.path())
        .args(["--dry-run", "--collection", "a/b", "--data"])
        .arg(&data_path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("must not contain '/'"));
}
