#![allow(deprecated)] // Command::cargo_bin until assert_cmd settles its replacement

mod common;

use std::fs;

use assert_cmd::Command;
use common::{coverage_document, file_coverage, options_in, write_producer};
use predicates::prelude::*;

fn coverage_merge() -> Command {
    Command::cargo_bin("coverage-merge").expect("coverage-merge binary should exist")
}

#[test]
fn help_mentions_config() {
    coverage_merge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn no_input_succeeds_with_warning() {
    let dir = tempfile::tempdir().unwrap();

    coverage_merge()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("All files"))
        .stderr(predicate::str::contains("no coverage data found"));

    assert!(dir.path().join("coverage/index.html").is_file());
    assert!(!dir.path().join(".nyc_output").exists());
}

#[test]
fn merges_both_producers() {
    let dir = tempfile::tempdir().unwrap();
    let options = options_in(dir.path());
    write_producer(
        &options,
        "unit",
        &coverage_document(&[file_coverage("src/utils/counter.ts", &[1, 1, 1, 1, 1], &[])]),
    );
    write_producer(
        &options,
        "component",
        &coverage_document(&[file_coverage(
            "src/App.tsx",
            &[1, 1, 1, 1, 1, 1, 1, 1, 0, 0],
            &[],
        )]),
    );

    coverage_merge()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("86.66"))
        .stdout(predicate::str::contains("9-10"));

    assert!(dir.path().join("coverage/App.tsx.html").is_file());
    assert!(!dir.path().join("reports/coverage-unit.json").exists());
}

#[test]
fn malformed_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let options = options_in(dir.path());
    write_producer(&options, "unit", "[1, 2");

    coverage_merge()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: malformed coverage data"));
}

#[test]
fn reads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("merge.json"),
        r#"{"producers": ["vitest"], "reporters": ["text-summary"], "log": {"level": "off"}}"#,
    )
    .unwrap();
    let mut options = options_in(dir.path());
    options.producers = vec!["vitest".to_string()];
    write_producer(
        &options,
        "vitest",
        &coverage_document(&[file_coverage("src/App.tsx", &[1, 0], &[])]),
    );

    coverage_merge()
        .current_dir(dir.path())
        .args(["--config", "merge.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Statements   : 50% ( 1/2 )"))
        .stderr(predicate::str::is_empty());

    assert!(!dir.path().join("coverage").exists());
}

#[test]
fn invalid_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(".coverage-merge.json"),
        r#"{"reporters": ["lcov"]}"#,
    )
    .unwrap();

    coverage_merge()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn log_level_flag_silences_warnings() {
    let dir = tempfile::tempdir().unwrap();

    coverage_merge()
        .current_dir(dir.path())
        .args(["--log-level", "off"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn unwritable_report_dir_fails() {
    let dir = tempfile::tempdir().unwrap();
    let options = options_in(dir.path());
    write_producer(
        &options,
        "unit",
        &coverage_document(&[file_coverage("src/App.tsx", &[1], &[])]),
    );
    fs::write(dir.path().join("coverage"), "").unwrap();

    coverage_merge()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: I/O error on"));
}

#[test]
fn report_dir_inside_workspace_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(".coverage-merge.json"),
        r#"{"reportDir": ".nyc_output/html"}"#,
    )
    .unwrap();

    coverage_merge()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("reportDir and workspaceDir"));
}
