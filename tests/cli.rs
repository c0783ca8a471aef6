//! Integration tests for CLI commands

#![allow(deprecated)]

use assert_cmd::{assert::OutputAssertExt, cargo::CommandCargoExt};
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn write_chat(tmp: &TempDir) -> std::path::PathBuf {
    let path = tmp.path().join("chat.jsonl");
    std::fs::write(
        &path,
        concat!(
            r#"{"role":"user","content":"how do I parse a config file"}"#,
            "\n",
            r#"{"role":"assistant","content":"Use the toml crate."}"#,
            "\n",
            r#"{"role":"user","content":"and write it back?"}"#,
            "\n",
        ),
    )
    .unwrap();
    path
}

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("chatmap").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("view"))
        .stdout(predicate::str::contains("index"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_index_command_help() {
    let mut cmd = Command::cargo_bin("chatmap").unwrap();
    cmd.arg("index").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Print the index of user messages"));
}

#[test]
fn test_index_command_json_format() {
    let tmp = TempDir::new().unwrap();
    let chat = write_chat(&tmp);

    let mut cmd = Command::cargo_bin("chatmap").unwrap();
    cmd.arg("index")
        .arg(&chat)
        .arg("--format")
        .arg("json")
        .arg("--config")
        .arg(tmp.path().join("config.toml"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"user_messages\": 2"))
        .stdout(predicate::str::contains("how do I parse a config file"));
}

#[test]
fn test_index_command_table_format() {
    let tmp = TempDir::new().unwrap();
    let chat = write_chat(&tmp);

    let mut cmd = Command::cargo_bin("chatmap").unwrap();
    cmd.arg("index")
        .arg(&chat)
        .arg("--config")
        .arg(tmp.path().join("config.toml"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("and write it back?"));
}

#[test]
fn test_index_missing_file_fails() {
    let tmp = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("chatmap").unwrap();
    cmd.arg("index")
        .arg(tmp.path().join("nope.jsonl"))
        .arg("--config")
        .arg(tmp.path().join("config.toml"));

    cmd.assert().failure();
}

#[test]
fn test_config_init_writes_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("c.toml");

    let mut cmd = Command::cargo_bin("chatmap").unwrap();
    cmd.arg("config").arg("--config").arg(&path).arg("--init");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("min_width"));
    assert!(path.exists());

    // second init refuses to overwrite
    let mut cmd = Command::cargo_bin("chatmap").unwrap();
    cmd.arg("config").arg("--config").arg(&path).arg("--init");
    cmd.assert().failure();
}

#[test]
fn test_view_requires_files() {
    let mut cmd = Command::cargo_bin("chatmap").unwrap();
    cmd.arg("view");

    cmd.assert().failure();
}
