//! CLI end-to-end tests
//!
//! Tests for the moovmend command-line interface.

mod common;

use assert_cmd::prelude::*;
use common::{write_capture, write_garbage, Fixture};
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the moovmend binary
#[allow(deprecated)]
fn moovmend_cmd() -> Command {
    let mut cmd = Command::cargo_bin("moovmend").unwrap();
    // Keep user config files out of the way.
    cmd.env("HOME", env!("CARGO_TARGET_TMPDIR"));
    cmd
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = moovmend_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = moovmend_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("moovmend"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = moovmend_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_repair_help() {
    let mut cmd = moovmend_cmd();
    cmd.args(["repair", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Repair every capture"));
}

#[test]
fn test_cli_repair_directory() {
    let fx = Fixture::new();
    write_capture(&fx.corrupted, "C0001.MP4", 20, 600);
    write_capture(&fx.corrupted, "C0002.MP4", 40, 900);

    let mut cmd = moovmend_cmd();
    cmd.arg("repair")
        .arg(&fx.corrupted)
        .arg("--reference")
        .arg(&fx.reference)
        .arg("--output")
        .arg(&fx.output)
        .assert()
        .success()
        .stdout(predicate::str::contains("C0001.MP4 repaired"))
        .stdout(predicate::str::contains("2 repaired, 0 failed"));

    assert_eq!(fs::metadata(fx.output.join("C0001")).unwrap().len(), 624 - 334);
    assert_eq!(fs::metadata(fx.output.join("C0002")).unwrap().len(), 944 - 334);
}

#[test]
fn test_cli_repair_partial_failure_exit_code() {
    let fx = Fixture::new();
    write_capture(&fx.corrupted, "C0001.MP4", 20, 600);
    write_garbage(&fx.corrupted, "C0002.MP4", 2000);

    let mut cmd = moovmend_cmd();
    cmd.arg("repair")
        .arg(&fx.corrupted)
        .arg("--reference")
        .arg(&fx.reference)
        .arg("--output")
        .arg(&fx.output)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("C0002.MP4"));

    assert!(fx.output.join("C0001").exists());
    assert!(!fx.output.join("C0002").exists());
}

#[test]
fn test_cli_repair_keep_extension_json() {
    let fx = Fixture::new();
    write_capture(&fx.corrupted, "C0001.MP4", 20, 600);

    let mut cmd = moovmend_cmd();
    let output = cmd
        .arg("repair")
        .arg(&fx.corrupted)
        .arg("--reference")
        .arg(&fx.reference)
        .arg("--output")
        .arg(&fx.output)
        .arg("--keep-extension")
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["results"][0]["status"], "repaired");
    assert!(fx.output.join("C0001.mov").exists());
}

#[test]
fn test_cli_repair_json_logs_progress_to_stderr() {
    let fx = Fixture::new();
    write_capture(&fx.corrupted, "C0001.MP4", 20, 600);

    let mut cmd = moovmend_cmd();
    cmd.env_remove("RUST_LOG")
        .arg("repair")
        .arg(&fx.corrupted)
        .arg("--reference")
        .arg(&fx.reference)
        .arg("--output")
        .arg(&fx.output)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("[1/1] Processing").not())
        .stderr(predicate::str::contains("C0001.MP4 repaired"));
}

#[test]
fn test_cli_repair_into_input_dir_is_refused() {
    let fx = Fixture::new();
    let clip = write_capture(&fx.corrupted, "clip.mov", 20, 600);

    let mut cmd = moovmend_cmd();
    cmd.arg("repair")
        .arg(&fx.corrupted)
        .arg("--reference")
        .arg(&fx.reference)
        .arg("--output")
        .arg(&fx.corrupted)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is the input directory"));

    assert_eq!(fs::metadata(&clip).unwrap().len(), 624);
}

#[test]
fn test_cli_repair_missing_reference() {
    let fx = Fixture::new();
    write_capture(&fx.corrupted, "C0001.MP4", 20, 600);

    let mut cmd = moovmend_cmd();
    cmd.arg("repair")
        .arg(&fx.corrupted)
        .arg("--reference")
        .arg(fx.root.path().join("missing.MP4"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("reference file not found"));
}

#[test]
fn test_cli_repair_nonexistent_dir() {
    let fx = Fixture::new();
    let mut cmd = moovmend_cmd();
    cmd.args(["repair", "/nonexistent/path/DCIM", "--reference"])
        .arg(&fx.reference)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not exist"));
}

#[test]
fn test_cli_inspect() {
    let fx = Fixture::new();
    let file = write_capture(&fx.corrupted, "C0001.MP4", 20, 600);

    let mut cmd = moovmend_cmd();
    cmd.arg("inspect")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Anchor offset: 24"))
        .stdout(predicate::str::contains("Repaired size: 290 bytes"));

    // Inspection never writes output.
    assert!(!fx.output.exists());
}

#[test]
fn test_cli_inspect_json() {
    let fx = Fixture::new();
    let file = write_capture(&fx.corrupted, "C0001.MP4", 20, 600);

    let output = moovmend_cmd()
        .args(["inspect", "--json"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["anchor"], 24);
    assert_eq!(plan["declared_size"], 16);
    assert_eq!(plan["marker_offsets"], serde_json::json!([20]));
}

#[test]
fn test_cli_inspect_without_marker() {
    let fx = Fixture::new();
    let file = write_garbage(&fx.corrupted, "C0001.MP4", 1000);

    let mut cmd = moovmend_cmd();
    cmd.arg("inspect")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot find 'moov'"));
}

#[test]
fn test_cli_inspect_nonexistent_file() {
    let mut cmd = moovmend_cmd();
    cmd.args(["inspect", "/nonexistent/path/C0001.MP4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not exist"));
}

#[test]
fn test_cli_validate_config() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("moovmend.toml");

    fs::write(
        &config_file,
        r#"
[profile]
header_skip_bytes = 16
trailer_trim_bytes = 334

[output]
strip_extension = false

[scan]
extensions = ["MP4"]
"#,
    )
    .unwrap();

    let mut cmd = moovmend_cmd();
    cmd.args(["validate", config_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Extensions: MP4"));
}

#[test]
fn test_cli_validate_invalid_config() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("bad.toml");
    fs::write(&config_file, "[profile\nbroken").unwrap();

    let mut cmd = moovmend_cmd();
    cmd.args(["validate", config_file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_cli_init_config() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("moovmend.toml");

    let mut cmd = moovmend_cmd();
    cmd.args(["init-config", config_file.to_str().unwrap()])
        .assert()
        .success();

    let content = fs::read_to_string(&config_file).unwrap();
    assert!(content.contains("trailer_trim_bytes = 334"));

    // Second run refuses to overwrite.
    let mut cmd = moovmend_cmd();
    cmd.args(["init-config", config_file.to_str().unwrap()])
        .assert()
        .failure();
}

#[test]
fn test_cli_trailer_trim_override() {
    let fx = Fixture::new();
    write_capture(&fx.corrupted, "C0001.MP4", 20, 600);

    let mut cmd = moovmend_cmd();
    cmd.arg("repair")
        .arg(&fx.corrupted)
        .arg("--reference")
        .arg(&fx.reference)
        .arg("--output")
        .arg(&fx.output)
        .args(["--trailer-trim", "100"])
        .assert()
        .success();

    assert_eq!(fs::metadata(fx.output.join("C0001")).unwrap().len(), 624 - 100);
}
