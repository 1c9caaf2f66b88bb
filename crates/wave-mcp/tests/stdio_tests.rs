//! Tests for the waveform-mcp binary speaking JSON-RPC over stdio.
//!
//! These tests exercise the actual compiled binary using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use wave_test_utils::TestWaveforms;

fn server_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("waveform-mcp"))
}

fn responses(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn help_flag() {
    server_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("waveform analysis"));
}

#[test]
fn version_flag() {
    server_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unexpected_argument_fails() {
    server_cmd().arg("--root").arg(".").assert().failure();
}

#[test]
fn empty_input_exits_cleanly() {
    server_cmd()
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn session_over_stdio() {
    let waves = TestWaveforms::new();
    let counter = waves.counter();
    let call = json!({
        "jsonrpc": "2.0",
        "id": 3,
        "method": "tools/call",
        "params": {
            "name": "execute_wal_expression",
            "arguments": {
                "waveform_file": counter,
                "expression": "(length (find (= tb.clk 1)))"
            }
        }
    });
    let input = [
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"assert_cmd","version":"1"}}}"#.to_string(),
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#.to_string(),
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#.to_string(),
        call.to_string(),
    ]
    .join("\n");

    let output = server_cmd()
        .env_remove("RUST_LOG")
        .write_stdin(input)
        .assert()
        .success()
        .stderr(predicate::str::contains("Starting waveform-mcp server"))
        .get_output()
        .stdout
        .clone();

    let replies = responses(&output);
    assert_eq!(replies.len(), 3, "the notification must not be answered");
    assert_eq!(replies[0]["result"]["serverInfo"]["name"], "waveform-mcp");
    assert_eq!(replies[1]["result"]["tools"].as_array().unwrap().len(), 6);
    assert_eq!(replies[2]["id"], 3);
    assert_eq!(replies[2]["result"]["isError"], false);
    let text = replies[2]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("Result: 40"), "{text}");
}

#[test]
fn garbage_line_does_not_stop_the_server() {
    let input = "this is not json\n{\"jsonrpc\":\"2.0\",\"id\":9,\"method\":\"ping\"}\n";
    let output = server_cmd()
        .write_stdin(input)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let replies = responses(&output);
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["error"]["code"], -32700);
    assert_eq!(replies[1]["id"], 9);
    assert_eq!(replies[1]["result"], json!({}));
}

#[test]
fn deeply_nested_expression_keeps_the_server_alive() {
    let waves = TestWaveforms::new();
    let expression = format!("{}1{}", "(+ ".repeat(200_000), ")".repeat(200_000));
    let call = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": {
            "name": "execute_wal_expression",
            "arguments": {"waveform_file": waves.counter(), "expression": expression}
        }
    });
    let input = format!("{call}\n{{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}}\n");

    let output = server_cmd()
        .write_stdin(input)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let replies = responses(&output);
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["result"]["isError"], true);
    assert_eq!(replies[1]["id"], 2);
}
