//! Integration tests for the picotest binary

#![allow(missing_docs)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn picotest_cmd() -> Command {
    Command::cargo_bin("picotest").unwrap()
}

#[test]
fn test_help_flag() {
    picotest_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("test reporter"));
}

#[test]
fn test_plain_text_passes_through() {
    picotest_cmd()
        .write_stdin("hello world\n")
        .assert()
        .success()
        .stdout("hello world\r\n");
}

#[test]
fn test_run_summary_on_stdout() {
    picotest_cmd()
        .write_stdin(
            "⚡:test:Suite A\n⚡:desc:Group 1\n⚡:it:does x\n⚡:assert:true\n\
             ⚡:assert:false\n⚡:it_end\n⚡:test_end\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("[PICOTEST] SUITE A"))
        .stdout(predicate::str::contains("• failed assertion #2"))
        .stdout(predicate::str::contains("2 tests complete. 1 passing."));
}

#[test]
fn test_protocol_fault_exits_non_zero() {
    picotest_cmd()
        .write_stdin("⚡:test:x\n⚡:assert:true\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("before any 'desc'"));
}

#[test]
fn test_self_test_mode() {
    picotest_cmd()
        .arg("TEST")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reducer"))
        .stdout(predicate::str::contains("0 failing"));
}

#[test]
fn test_config_marker() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("picotest.toml");
    fs::write(&config, "marker = \"#\"\n").unwrap();

    picotest_cmd()
        .arg("--config")
        .arg(&config)
        .write_stdin("#:test:hashed\n⚡:test:text\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "\x1b[1d\x1b[2J\x1b[0m\x1b[22m\x1b[1m🎮  [PICOTEST] HASHED",
        ))
        .stdout(predicate::str::contains("⚡:test:text\r\n"));
}

#[test]
fn test_invalid_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("picotest.toml");
    fs::write(&config, "marker = \":\"\n").unwrap();

    picotest_cmd()
        .arg("--config")
        .arg(&config)
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}
