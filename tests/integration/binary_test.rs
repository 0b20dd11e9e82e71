//! Tests that run the `tileserver` binary in console mode.

use std::io::Write;
use std::process::{Command, Stdio};

/// Runs the binary with the given arguments and stdin, returning
/// (exit code, stdout, stderr).
fn run_binary(args: &[&str], stdin: &str) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tileserver"))
        .args(args)
        .env("RUST_LOG", "warn")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start tileserver");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");

    let output = child.wait_with_output().expect("Failed to wait for tileserver");
    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (exit_code, stdout, stderr)
}

fn missing_config() -> String {
    let dir = std::env::temp_dir().join("tileserver-test-no-config");
    dir.join("config.toml").display().to_string()
}

#[test]
fn test_stdin_mode_answers_each_line() {
    let config = missing_config();
    let (code, stdout, _) = run_binary(
        &["--config", &config, "--grid-size", "2"],
        "add(2,3)\n\ngrid()\nmult(x,1)\n",
    );
    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        "5\n..\n..\nCaller: argument 0 must be float, got 'x'\n"
    );
}

#[test]
fn test_invalid_config_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[game]\ngrid_size = 0\n").unwrap();

    let (code, stdout, stderr) = run_binary(&["--config", path.to_str().unwrap()], "");
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("grid_size"), "stderr was: {stderr}");
}

#[test]
fn test_help_flag_shows_command_guide() {
    let (code, stdout, _) = run_binary(&["--help"], "");
    assert_eq!(code, 0);
    assert!(stdout.contains("Command syntax:"));
    assert!(stdout.contains("--serve"));
}
