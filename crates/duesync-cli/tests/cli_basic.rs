//! Basic CLI E2E tests.
//!
//! Invokes the CLI via cargo run against the dev data directory and checks
//! exit codes and output shape. Calendar commands are exercised only in
//! their no-network paths (status, not-connected).

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "duesync-cli", "--"])
        .args(args)
        .env("DUESYNC_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_task_create_and_list() {
    let (stdout, _, code) = run_cli(&["task", "create", "E2E task", "--due", "2030-01-02"]);
    assert_eq!(code, 0, "task create failed");
    assert!(stdout.contains("Task created:"));

    let (stdout, _, code) = run_cli(&["task", "list"]);
    assert_eq!(code, 0, "task list failed");
    assert!(stdout.contains("E2E task"));
}

#[test]
fn test_task_list_json_parses() {
    let _ = run_cli(&["task", "create", "JSON task"]);
    let (stdout, _, code) = run_cli(&["task", "list", "--json"]);
    assert_eq!(code, 0, "task list --json failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("invalid JSON output");
    assert!(parsed.is_array());
}

#[test]
fn test_task_done_roundtrip() {
    let (stdout, _, code) = run_cli(&["task", "create", "Finish me"]);
    assert_eq!(code, 0);
    let id = stdout.trim().rsplit(' ').next().unwrap().to_string();

    let (stdout, _, code) = run_cli(&["task", "done", &id]);
    assert_eq!(code, 0, "task done failed");
    assert!(stdout.contains("Task done:"));
}

#[test]
fn test_task_create_rejects_malformed_due_date() {
    let (_, stderr, code) = run_cli(&["task", "create", "Bad date", "--due", "soon"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Malformed due date"));
}

#[test]
fn test_notify_check_and_list() {
    let (stdout, _, code) = run_cli(&["notify", "check"]);
    assert_eq!(code, 0, "notify check failed");
    assert!(stdout.contains("notifications"));

    let (_, _, code) = run_cli(&["notify", "list"]);
    assert_eq!(code, 0, "notify list failed");
}

#[test]
fn test_sync_status() {
    let (stdout, _, code) = run_cli(&["sync", "status"]);
    assert_eq!(code, 0, "sync status failed");
    assert!(stdout.contains("Google Calendar:"));
    assert!(stdout.contains("Linked tasks:"));
}

#[test]
fn test_config_get_set_list() {
    let (_, _, code) = run_cli(&["config", "set", "sync.batch_limit", "25"]);
    assert_eq!(code, 0, "config set failed");

    let (stdout, _, code) = run_cli(&["config", "get", "sync.batch_limit"]);
    assert_eq!(code, 0, "config get failed");
    assert_eq!(stdout.trim(), "25");

    let (stdout, _, code) = run_cli(&["config", "list"]);
    assert_eq!(code, 0, "config list failed");
    assert!(stdout.contains("sync.calendar_id"));
}

#[test]
fn test_config_unknown_key_fails() {
    let (_, stderr, code) = run_cli(&["config", "get", "sync.retries"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Unknown configuration key"));
}

#[test]
fn test_auth_rejects_unknown_service() {
    let (_, stderr, code) = run_cli(&["auth", "set-token", "notion", "tok"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Unknown service"));
}
