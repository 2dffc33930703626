//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against temporary config and calendar files.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_jogplan"))
        .args(args)
        .env_remove("JOGPLAN_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path is UTF-8")
}

#[test]
fn test_config_list_creates_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    let (stdout, _, code) = run_cli(&["--config", path_str(&config), "config", "list"]);
    assert_eq!(code, 0, "config list failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["sessions"]["jog_minutes"], 25);
    assert_eq!(parsed["scheduler"]["day_start"], "06:00:00");
    assert!(config.exists());
}

#[test]
fn test_config_set_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let config = path_str(&config);

    let (_, _, code) = run_cli(&["--config", config, "config", "set", "sessions.pre_jog_minutes", "10"]);
    assert_eq!(code, 0, "config set failed");

    let (stdout, _, code) = run_cli(&["--config", config, "config", "get", "sessions.pre_jog_minutes"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "10");
}

#[test]
fn test_config_unknown_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    let (_, stderr, code) = run_cli(&["--config", path_str(&config), "config", "get", "sessions.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"), "stderr was: {stderr}");
}

#[test]
fn test_slot_find_on_empty_calendar() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let calendar = dir.path().join("calendar.json");

    let (stdout, stderr, code) = run_cli(&[
        "--config", path_str(&config),
        "slot", "find",
        "--calendar", path_str(&calendar),
        "--from", "2025-04-07T05:00:00Z",
        "--minutes", "30",
        "--utc",
    ]);
    assert_eq!(code, 0, "slot find failed: {stderr}");
    let slot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(slot["start"], "2025-04-07T06:00:00Z");
    assert_eq!(slot["end"], "2025-04-07T06:30:00Z");
}

#[test]
fn test_slot_find_reports_no_slot() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let calendar = dir.path().join("calendar.json");
    std::fs::write(
        &calendar,
        r#"[{"id":"1","title":"Offsite","start_time":"2025-04-07T06:00:00Z","end_time":"2025-04-07T21:00:00Z"}]"#,
    )
    .unwrap();

    let (stdout, _, code) = run_cli(&[
        "--config", path_str(&config),
        "slot", "find",
        "--calendar", path_str(&calendar),
        "--from", "2025-04-07T05:00:00Z",
        "--goal-end", "2025-04-07T23:59:00Z",
        "--utc",
    ]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "no slot found");
}

#[test]
fn test_slot_find_rejects_zero_minutes() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let calendar = dir.path().join("calendar.json");

    let (_, stderr, code) = run_cli(&[
        "--config", path_str(&config),
        "slot", "find",
        "--calendar", path_str(&calendar),
        "--from", "2025-04-07T05:00:00Z",
        "--minutes", "0",
        "--utc",
    ]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_slot_find_rejects_out_of_range_minutes() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let calendar = dir.path().join("calendar.json");

    let (_, stderr, code) = run_cli(&[
        "--config", path_str(&config),
        "slot", "find",
        "--calendar", path_str(&calendar),
        "--from", "2025-04-07T05:00:00Z",
        "--minutes", "9223372036854775807",
        "--utc",
    ]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error: --minutes out of range"), "stderr was: {stderr}");
}

#[test]
fn test_plan_next_books_into_calendar() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let calendar = dir.path().join("calendar.json");
    let args = [
        "--config", path_str(&config),
        "plan", "next",
        "--calendar", path_str(&calendar),
        "--from", "2025-04-07T05:00:00Z",
        "--goal-start", "2025-04-07T00:00:00Z",
        "--utc",
    ];

    let mut book_args = args.to_vec();
    book_args.push("--book");
    let (stdout, stderr, code) = run_cli(&book_args);
    assert_eq!(code, 0, "plan next failed: {stderr}");
    let booked: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(booked[0]["kind"], "jog");
    assert_eq!(booked[0]["start"], "2025-04-07T06:00:00Z");
    assert_eq!(booked[0]["end"], "2025-04-07T06:25:00Z");

    let events: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&calendar).unwrap()).unwrap();
    assert_eq!(events.as_array().unwrap().len(), 1);
    assert_eq!(events[0]["title"], "Jogging");

    // The booked session is now busy time
    let (stdout, _, code) = run_cli(&args);
    assert_eq!(code, 0);
    let planned: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(planned[0]["start"], "2025-04-07T06:25:00Z");
}
