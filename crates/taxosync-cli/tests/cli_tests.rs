//! Smoke tests for the taxosync binary

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_import() {
    let mut cmd = Command::cargo_bin("taxosync").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("import"));
}

#[test]
fn test_import_help_shows_flags() {
    let mut cmd = Command::cargo_bin("taxosync").unwrap();
    cmd.arg("import").arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--username"))
        .stdout(predicate::str::contains("--collection"))
        .stdout(predicate::str::contains("--record-set"))
        .stdout(predicate::str::contains("--audit-file"));
}

#[test]
fn test_no_subcommand_shows_usage() {
    let mut cmd = Command::cargo_bin("taxosync").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_import_missing_input_file() {
    let mut cmd = Command::cargo_bin("taxosync").unwrap();
    cmd.arg("import")
        .arg("/nonexistent/taxa.csv")
        .arg("--username")
        .arg("importer")
        .arg("--password")
        .arg("secret")
        .arg("--collection")
        .arg("KUMammals");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}
