//! CLI surface tests: argument parsing and help text, no cluster required.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_doctor_command() {
    Command::cargo_bin("fluxdoc")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("doctor"));
}

#[test]
fn doctor_help_documents_watch_mode() {
    Command::cargo_bin("fluxdoc")
        .unwrap()
        .args(["doctor", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--watch"))
        .stdout(predicate::str::contains("--interval"));
}

#[test]
fn interval_requires_watch() {
    Command::cargo_bin("fluxdoc")
        .unwrap()
        .args(["doctor", "--interval", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--watch"));
}

#[test]
fn unknown_command_fails() {
    Command::cargo_bin("fluxdoc")
        .unwrap()
        .arg("frobnicate")
        .assert()
        .failure();
}
