#![cfg(test)]
#![allow(
    clippy::unwrap_used,
    reason = "Test setup failures should abort the test"
)]

use std::fs;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_css-prefixer"))
        .args(args)
        .env_remove("AUTOPREFIXER_GRID")
        .output()
        .unwrap()
}

#[test]
fn files_are_prefixed() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.css");
    let output = dir.path().join("out.css");
    fs::write(&input, "a { transform: none }").unwrap();
    let done = run(&[
        "--browsers",
        "chrome 30",
        "-o",
        output.to_str().unwrap(),
        input.to_str().unwrap(),
    ]);
    assert!(done.status.success());
    let css = fs::read_to_string(&output).unwrap();
    assert!(css.contains("-webkit-transform: none"));
}

#[test]
fn warnings_go_to_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("box.css");
    fs::write(&input, "a { display: box }").unwrap();
    let done = run(&["--browsers", "chrome 20", input.to_str().unwrap()]);
    assert!(done.status.success());
    let errors = String::from_utf8(done.stderr).unwrap();
    assert!(errors.contains("box.css:1:"));
    assert!(errors.contains("You should write display: flex"));
    assert_eq!(String::from_utf8(done.stdout).unwrap(), "a { display: box }");
}

#[test]
fn config_files_feed_the_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("prefixer.json");
    fs::write(&config, r#"{"browsers": ["ie 11"], "grid": "autoplace"}"#).unwrap();
    let done = run(&["--config", config.to_str().unwrap(), "--info", "--json"]);
    assert!(done.status.success());
    let report: serde_json::Value = serde_json::from_slice(&done.stdout).unwrap();
    assert_eq!(report["browsers"][0]["name"], "IE");
}

#[test]
fn unknown_flags_fail() {
    let done = run(&["--frobnicate"]);
    assert!(!done.status.success());
}
