//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with an isolated config directory and
//! verify outputs.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use serde_json::Value;

fn cli(config_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pomowidget"));
    cmd.env("POMOWIDGET_CONFIG_DIR", config_dir)
        .env_remove("RUST_LOG");
    cmd
}

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(config_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = cli(config_dir)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Event lines followed by the final snapshot.
fn simulate(config_dir: &Path, args: &[&str]) -> (Vec<Value>, Value) {
    let mut full = vec!["simulate"];
    full.extend_from_slice(args);
    let (stdout, stderr, code) = run_cli(config_dir, &full);
    assert_eq!(code, 0, "simulate failed: {stderr}");

    let mut lines: Vec<Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("every line is JSON"))
        .collect();
    let snapshot = lines.pop().expect("snapshot line");
    (lines, snapshot)
}

fn of_type<'a>(events: &'a [Value], kind: &str) -> Vec<&'a Value> {
    events.iter().filter(|e| e["type"] == kind).collect()
}

#[test]
fn test_simulate_counts_down() {
    let dir = tempfile::tempdir().unwrap();
    let (events, snapshot) = simulate(dir.path(), &["--start", "--seconds", "3"]);

    assert_eq!(snapshot["session"]["remaining_secs"], 1497);
    assert_eq!(snapshot["session"]["running"], true);
    assert_eq!(snapshot["display"], "24:57");
    assert_eq!(of_type(&events, "TimerTicked").len(), 3);
}

#[test]
fn test_simulate_alarm_with_and_without_audio() {
    let dir = tempfile::tempdir().unwrap();

    let (events, snapshot) = simulate(dir.path(), &["--work", "0", "--start", "--seconds", "2"]);
    let fired = of_type(&events, "AlarmFired");
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0]["audible"], true);
    assert_eq!(snapshot["session"]["running"], false);

    let (events, _) = simulate(
        dir.path(),
        &["--work", "0", "--start", "--seconds", "2", "--mute"],
    );
    assert_eq!(of_type(&events, "AlarmFired")[0]["audible"], false);
}

#[test]
fn test_simulate_idle_slideshow() {
    let dir = tempfile::tempdir().unwrap();
    let (events, snapshot) = simulate(dir.path(), &["--seconds", "46"]);

    assert_eq!(of_type(&events, "IdleEntered").len(), 1);
    let shown: Vec<u64> = of_type(&events, "SlideShown")
        .iter()
        .map(|e| e["index"].as_u64().unwrap())
        .collect();
    assert_eq!(shown, vec![0, 1, 2]);
    assert_eq!(snapshot["idle"], "idle");
}

#[test]
fn test_simulate_break_phase_duration() {
    let dir = tempfile::tempdir().unwrap();
    let (_, snapshot) = simulate(dir.path(), &["--break-phase", "--break", "10", "--seconds", "0"]);
    assert_eq!(snapshot["session"]["phase"], "break");
    assert_eq!(snapshot["session"]["remaining_secs"], 600);
}

#[test]
fn test_simulate_rejects_bad_minutes() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["simulate", "--work", "abc"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_simulate_swatch_and_music() {
    let dir = tempfile::tempdir().unwrap();
    let (events, snapshot) = simulate(dir.path(), &["--music", "--swatch", "3", "--seconds", "0"]);
    assert_eq!(snapshot["music_playing"], true);
    assert_eq!(snapshot["background"], "#caffbf");
    assert_eq!(of_type(&events, "BackgroundChanged").len(), 1);
}

#[test]
fn test_config_get_default() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "timer.work_minutes"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "25");
}

#[test]
fn test_config_set_feeds_widget() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "set", "timer.work_minutes", "30"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "timer.work_minutes"]);
    assert_eq!(stdout.trim(), "30");

    let (_, snapshot) = simulate(dir.path(), &["--seconds", "0"]);
    assert_eq!(snapshot["session"]["remaining_secs"], 1800);
}

#[test]
fn test_config_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "timer.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_reset_and_path() {
    let dir = tempfile::tempdir().unwrap();
    let _ = run_cli(dir.path(), &["config", "set", "idle.quiet_period_secs", "30"]);
    let (_, _, code) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);

    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "idle.quiet_period_secs"]);
    assert_eq!(stdout.trim(), "10");

    let (stdout, _, _) = run_cli(dir.path(), &["config", "path"]);
    assert!(stdout.trim().ends_with("config.toml"));
}

#[test]
fn test_config_list_is_json() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0);
    let parsed: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["slideshow"]["images"].as_array().unwrap().len(), 7);
}

#[test]
fn test_run_reads_commands_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = cli(dir.path())
        .arg("run")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"work 1\nstart\nstatus\nquit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("\"running\": true"));
    assert!(stdout.contains("\"work_field\": \"1\""));
}
