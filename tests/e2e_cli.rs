//! CLI end-to-end tests
//!
//! Tests for the tonearm command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

/// Get a command for the tonearm binary
#[allow(deprecated)]
fn tonearm_cmd() -> Command {
    Command::cargo_bin("tonearm").unwrap()
}

/// Write a config whose database lives inside `dir`.
fn write_config(dir: &Path) -> PathBuf {
    let config_file = dir.join("config.toml");
    let db_path = dir.join("library.db");
    fs::write(
        &config_file,
        format!(
            "[storage]\ndatabase = {:?}\n\n[streaming]\nchunk_size = 4096\n",
            db_path.to_str().unwrap()
        ),
    )
    .unwrap();
    config_file
}

fn setup() -> (TempDir, PathBuf) {
    let temp = tempdir().unwrap();
    let config = write_config(temp.path());
    (temp, config)
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = tonearm_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = tonearm_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tonearm"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = tonearm_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_start_invalid_port() {
    let mut cmd = tonearm_cmd();
    cmd.args(["start", "--port", "99999"]).assert().failure();
}

#[test]
fn test_cli_start_with_help() {
    let mut cmd = tonearm_cmd();
    cmd.args(["start", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Host").or(predicate::str::contains("Port")));
}

#[test]
fn test_cli_add_list_and_plays() {
    let (temp, config) = setup();
    let song = temp.path().join("Opening Theme.mp3");
    fs::write(&song, vec![0u8; 2048]).unwrap();

    let output = tonearm_cmd()
        .args(["--config", config.to_str().unwrap(), "add"])
        .arg(&song)
        .args(["--album", "Overtures"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let id = String::from_utf8(output.stdout).unwrap().trim().to_string();
    assert_eq!(id.len(), 36);

    tonearm_cmd()
        .args(["--config", config.to_str().unwrap(), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(id.as_str()))
        .stdout(predicate::str::contains("Opening Theme"))
        .stdout(predicate::str::contains("(Overtures)"));

    tonearm_cmd()
        .args(["--config", config.to_str().unwrap(), "plays", &id])
        .assert()
        .success()
        .stdout(predicate::str::diff("0\n"));
}

#[test]
fn test_cli_add_nonexistent_file() {
    let (temp, config) = setup();

    tonearm_cmd()
        .args(["--config", config.to_str().unwrap(), "add"])
        .arg(temp.path().join("missing.mp3"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_cli_add_rejects_non_audio() {
    let (temp, config) = setup();
    let notes = temp.path().join("notes.txt");
    fs::write(&notes, "liner notes").unwrap();

    tonearm_cmd()
        .args(["--config", config.to_str().unwrap(), "add"])
        .arg(&notes)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a supported audio file"));
}

#[test]
fn test_cli_list_empty() {
    let (_temp, config) = setup();

    tonearm_cmd()
        .args(["--config", config.to_str().unwrap(), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No songs registered"));
}

#[test]
fn test_cli_plays_invalid_id() {
    let (_temp, config) = setup();

    tonearm_cmd()
        .args(["--config", config.to_str().unwrap(), "plays", "not-a-uuid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid song ID"));
}

#[test]
fn test_cli_validate_good_config() {
    let (_temp, config) = setup();

    tonearm_cmd()
        .args(["validate", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Chunk size: 4096"));
}

#[test]
fn test_cli_config_validation() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("config.toml");

    fs::write(
        &config_file,
        r#"
[streaming]
chunk_size = 0
"#,
    )
    .unwrap();

    tonearm_cmd()
        .args(["validate", config_file.to_str().unwrap()])
        .assert()
        .failure();
}
