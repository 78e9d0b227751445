//! Integration tests for the one-shot `carbomatic` commands.
//!
//! These run the compiled binary. None of them reach the network.

use std::process::{Command, Output};

fn carbomatic(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_carbomatic"))
        .args(args)
        .env_remove("ANTHROPIC_API_KEY")
        .env("XDG_CONFIG_HOME", std::env::temp_dir().join("carbomatic-cli-test-none"))
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run carbomatic binary")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn calc_two_day_load_prints_result() {
    let output = carbomatic(&["calc", "--weight-kg", "70", "--days", "2"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let json = stdout_json(&output);
    assert_eq!(json["daily_carb_grams"], 840.0);
    assert_eq!(json["total_carb_grams"], 1680.0);
    assert_eq!(json["loading_days"], 2);
}

#[test]
fn calc_high_intensity_fixes_three_days() {
    let output = carbomatic(&["calc", "--weight-kg", "60", "--intensity", "high"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["daily_carb_grams"], 720.0);
    assert_eq!(json["total_carb_grams"], 2160.0);
    assert_eq!(json["loading_days"], 3);
}

#[test]
fn calc_without_weight_fails() {
    let output = carbomatic(&["calc", "--days", "2"]);
    assert!(!output.status.success());
}

#[test]
fn meal_plan_without_key_fails_fast() {
    let output = carbomatic(&["meal-plan", "--daily-carb-grams", "840", "--days", "2"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("ANTHROPIC_API_KEY not found"),
        "unexpected stderr: {stderr}"
    );
}
