//! End-to-end tests for the `carousel` binary
//!
//! These tests run the built CLI and check its stdout, with logging switched
//! off so stderr noise cannot leak into the assertions.

use std::process::{Command, Output};

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_carousel"))
        .args(args)
        .env("CAROUSEL_LOG_LEVEL", "off")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run carousel binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_simulate_prints_timeline() {
    let output = run_cli(&[
        "simulate",
        "--slides",
        "3",
        "--rotation-speed-ms",
        "1000",
        "--duration-ms",
        "2600",
    ]);
    assert!(output.status.success());

    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 7);
    assert!(lines[0].trim_start().starts_with("0ms  ready"));
    assert!(lines[2].trim_start().starts_with("1000ms  transitionStart"));
    assert!(lines[5].trim_start().starts_with("2500ms  transitionComplete"));
    assert!(lines[6].contains("2 transitions"));
    assert!(lines[6].contains("slide 3/3"));
    assert!(!text.contains("\x1b["));
}

#[test]
fn test_simulate_json_lines() {
    let output = run_cli(&[
        "simulate",
        "--slides",
        "4",
        "--no-autoplay",
        "--transition",
        "none",
        "--at",
        "100:next",
        "--at",
        "200:goto=3",
        "--json",
    ]);
    assert!(output.status.success());

    let events: Vec<serde_json::Value> = stdout(&output)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let channels: Vec<&str> = events
        .iter()
        .map(|event| event["channel"].as_str().unwrap())
        .collect();
    assert_eq!(
        channels,
        vec![
            "ready",
            "transitionStart",
            "transitionComplete",
            "transitionStart",
            "transitionComplete",
        ]
    );
    assert_eq!(events[3]["at_ms"], 200);
    assert_eq!(events[4]["current"], 3);
    assert_eq!(events[4]["status"], "stopped");
}

#[test]
fn test_simulate_single_slide_is_silent() {
    let output = run_cli(&["simulate", "--slides", "1", "--json"]);
    assert!(output.status.success());
    assert!(stdout(&output).trim().is_empty());
}

#[test]
fn test_simulate_rejects_unknown_transition() {
    let output = run_cli(&["simulate", "--transition", "warp"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown transition type: warp"));
}

#[test]
fn test_simulate_reports_bad_script_target() {
    let output = run_cli(&["simulate", "--at", "50:goto=9"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("goto=9"));
    assert!(stderr.contains("Index out of range"));
}

#[test]
fn test_transitions_json() {
    let output = run_cli(&["transitions", "--json"]);
    assert!(output.status.success());

    let listing: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(listing["total"], 4);
    let slide = listing["transitions"]
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["type"] == "slide")
        .unwrap();
    assert_eq!(
        slide["directions"],
        serde_json::json!(["left", "right", "up", "down"])
    );
}

#[test]
fn test_validate_config_files() {
    let dir = tempfile::tempdir().unwrap();

    let good = dir.path().join("good.json");
    std::fs::write(&good, r#"{ "auto_play": false, "transition": { "type": "none" } }"#).unwrap();
    let output = run_cli(&["validate", "--config", good.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("✓ Valid configuration: none"));

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, r#"{ "rotation_speed_ms": 0 }"#).unwrap();
    let output = run_cli(&["validate", "--config", bad.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("rotation_speed_ms must be greater than zero"));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    let output = run_cli(&["validate", "--config", broken.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("Config parse error"));
}
