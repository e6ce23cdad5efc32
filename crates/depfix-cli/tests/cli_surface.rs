use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn depfix_cmd() -> Command {
    let mut cmd = Command::cargo_bin("depfix").unwrap();
    cmd.env_remove("RUST_LOG")
        .env("DEPFIX_PYTHON", "depfix-no-such-python");
    cmd
}

#[test]
fn test_help_lists_commands() {
    depfix_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("fix"))
        .stdout(predicate::str::contains("lock"))
        .stdout(predicate::str::contains("restore"))
        .stdout(predicate::str::contains("graph"))
        .stdout(predicate::str::contains("outdated"));
}

#[test]
fn test_graph_rejects_unknown_format() {
    depfix_cmd()
        .args(["graph", "--format", "svg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_scan_without_inspector_is_failure() {
    let tmp = TempDir::new().unwrap();

    depfix_cmd()
        .current_dir(tmp.path())
        .args(["scan"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Environment inspection failed"));
}

#[test]
fn test_invalid_config_is_reported() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("depfix.toml"), "[index\nurl = ").unwrap();

    depfix_cmd()
        .current_dir(tmp.path())
        .args(["scan"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_log_file_is_written() {
    let tmp = TempDir::new().unwrap();
    let log = tmp.path().join("depfix.log");
    fs::write(tmp.path().join("requirements.lock.json"), "{}").unwrap();

    depfix_cmd()
        .current_dir(tmp.path())
        .args(["--verbose", "--log-file", log.to_str().unwrap(), "restore"])
        .assert()
        .success();

    let content = fs::read_to_string(&log).unwrap();
    assert!(content.contains("nothing to install"));
}
