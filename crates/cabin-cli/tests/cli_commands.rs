//! End-to-end tests for the `cabin` binary.

#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cabin() -> Command {
    Command::cargo_bin("cabin").unwrap()
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

#[test]
fn simulate_autopilot_wins() {
    cabin()
        .args(["simulate", "--seed", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Timeline"))
        .stdout(predicate::str::contains("session won"))
        .stdout(predicate::str::contains("0/3"));
}

#[test]
fn simulate_reckless_loses_all_lives() {
    cabin()
        .args(["simulate", "--seed", "2", "--player", "reckless"])
        .assert()
        .success()
        .stdout(predicate::str::contains("face #"))
        .stdout(predicate::str::contains("lost (lives-death)"));
}

#[test]
fn simulate_json_emits_one_event_per_line() {
    let output = cabin()
        .args(["simulate", "--seed", "5", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert!(!lines.is_empty());
    assert_eq!(lines[0]["elapsedMs"], 35_000);
    assert_eq!(lines[0]["event"]["type"], "phaseChanged");
    assert_eq!(lines.last().unwrap()["event"]["type"], "sessionWon");
}

#[test]
fn simulate_script_shout_kills() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("shout.json");
    fs::write(
        &script,
        r#"[{"atMs": 0, "gaze": "center"}, {"atMs": 40000, "gaze": "center", "noise": 80}]"#,
    )
    .unwrap();

    cabin()
        .args(["simulate", "--seed", "4", "--script"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("microphone-death"))
        .stdout(predicate::str::contains("session lost"));
}

#[test]
fn simulate_script_player_needs_file() {
    cabin()
        .args(["simulate", "--player", "script"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires --script"));
}

#[test]
fn simulate_missing_script_fails() {
    cabin()
        .args(["simulate", "--script", "/nonexistent/script.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn simulate_rejects_narrow_screen() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("cabin.json");
    fs::write(&config, r#"{"screenWidth": 200}"#).unwrap();

    cabin()
        .args(["simulate", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}

#[test]
fn simulate_config_seed_is_overridden() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("cabin.json");
    fs::write(&config, r#"{"seed": 1, "screenWidth": 1280, "screenHeight": 720}"#).unwrap();

    cabin()
        .args(["simulate", "--seed", "9", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("seed=9"));
}

// ---------------------------------------------------------------------------
// odds
// ---------------------------------------------------------------------------

#[test]
fn odds_prints_expected_weights() {
    cabin()
        .args(["odds", "--draws", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("53.8%"))
        .stdout(predicate::str::contains("38.5%"))
        .stdout(predicate::str::contains("7.7%"));
}

#[test]
fn odds_rejects_zero_draws() {
    cabin()
        .args(["odds", "--draws", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}
