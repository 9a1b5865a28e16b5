//! CLI integration tests for ember-cli
//!
//! Runs the built binary against bytecode and fixture files.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

/// Helper to run the CLI with arguments
fn run_ember(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_ember"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn fixture_pack() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../ember-fixtures/tests/data/basic.json")
}

// ==================== Help & Version Tests ====================

#[test]
fn test_cli_help() {
    let output = run_ember(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ember"));
    assert!(stdout.contains("run"));
    assert!(stdout.contains("exec"));
}

#[test]
fn test_cli_version() {
    let output = run_ember(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("ember"));
}

// ==================== Exec Tests ====================

#[test]
fn test_exec_json() {
    let output = run_ember(&["exec", "0x6001600201", "--json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["stack"], serde_json::json!(["0x3"]));
    assert_eq!(value["success"], true);
}

#[test]
fn test_exec_calldata() {
    let output = run_ember(&["exec", "600035", "--calldata", "0x01", "--json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let top = value["stack"][0].as_str().unwrap();
    assert!(top.starts_with("0x1"));
    assert_eq!(top.len(), 2 + 64);
}

#[test]
fn test_exec_fault_still_exits_zero() {
    let output = run_ember(&["exec", "01"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("success: false"));
}

#[test]
fn test_exec_invalid_hex() {
    let output = run_ember(&["exec", "0xzz"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid hex"));
}

// ==================== Run Tests ====================

#[test]
fn test_run_fixture_pack() {
    let pack = fixture_pack();
    let output = run_ember(&["run", pack.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stdout));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Pass Rate: 100.00%"));
}

#[test]
fn test_run_failure_exits_one() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"name":"wrong","code":{{"bin":"6001"}},"expect":{{"stack":["0x2"]}}}}]"#
    )
    .unwrap();

    let output = run_ember(&["run", file.path().to_str().unwrap(), "--json"]);
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["success"], false);
    assert_eq!(value["failed"][0]["name"], "wrong");
}

#[test]
fn test_run_with_config_file() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, "log_level = \"error\"\nfail_fast = true").unwrap();

    let pack = fixture_pack();
    let output = run_ember(&[
        "--config",
        config.path().to_str().unwrap(),
        "run",
        pack.to_str().unwrap(),
        "--filter",
        "ADD",
    ]);
    assert!(output.status.success());
}
