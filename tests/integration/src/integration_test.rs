//! End-to-end integration test for the vertical slice
//!
//! Exercises the complete flow: VCD file -> trace -> WAL evaluation -> tool
//! output, and checks that every layer agrees about the same recording.

use pretty_assertions::assert_eq;
use serde_json::json;
use wave_mcp::{Dispatcher, ToolResult};
use wave_test_utils::{SIM_IR_CHANGES, TestWaveforms};

fn run(dispatcher: &Dispatcher, tool: &str, arguments: serde_json::Value) -> String {
    let result: ToolResult = dispatcher.dispatch(tool, arguments);
    assert!(!result.is_error, "{tool} failed: {}", result.joined_text());
    result.joined_text()
}

#[test]
fn test_trace_and_wal_agree_on_length() {
    let waves = TestWaveforms::new();
    let trace = wave_trace::open(waves.counter()).unwrap();

    let length = wave_wal::evaluate(&trace, "(length (find true))").unwrap();
    assert_eq!(length, wave_wal::Value::Int(trace.len() as i64));
    assert_eq!(trace.len(), 81);
    assert_eq!(trace.timestamps().last(), Some(&400));
}

#[test]
fn test_length_tool_reports_trace_length() {
    let waves = TestWaveforms::new();
    let file = waves.counter();
    let text = run(&Dispatcher::new(), "get_waveform_length", json!({"waveform_file": file}));

    assert!(text.contains("Length: 81 time steps"));
    assert!(text.contains("Time range: 0 to 80"));
    assert!(text.contains("Timestamps: 0 to 400"));
    assert!(text.contains("Method: WAL (length (find true))"));
}

#[test]
fn test_transitions_match_wal_edge_count() {
    let waves = TestWaveforms::new();
    let file = waves.counter();
    let trace = wave_trace::open(&file).unwrap();

    let edges = wave_wal::evaluate(&trace, "(count (&& (> INDEX 0) (!= tb.clk (prev tb.clk))))")
        .unwrap();
    let reported = trace.transitions("tb.clk", 0, trace.len() - 1).unwrap().len();
    assert_eq!(edges, wave_wal::Value::Int(reported as i64));

    let text = run(
        &Dispatcher::new(),
        "get_signal_transitions",
        json!({"waveform_file": file, "signal_name": "tb.clk"}),
    );
    let listed = text.lines().filter(|l| l.starts_with("  Time ")).count();
    assert_eq!(listed, reported);
    assert_eq!(listed, 80);
}

#[test]
fn test_expression_tool_matches_library_result() {
    let waves = TestWaveforms::new();
    let file = waves.counter();
    let trace = wave_trace::open(&file).unwrap();
    let expression = "(count (= tb.clk 1))";

    let direct = wave_wal::evaluate(&trace, expression).unwrap();
    let text = run(
        &Dispatcher::new(),
        "execute_wal_expression",
        json!({"waveform_file": file, "expression": expression}),
    );
    assert!(text.contains(&format!("Result: {direct}")));
    assert_eq!(direct.to_string(), "40");
}

#[test]
fn test_signal_list_covers_every_trace_signal() {
    let waves = TestWaveforms::new();
    let file = waves.sim();
    let trace = wave_trace::open(&file).unwrap();
    let text = run(&Dispatcher::new(), "get_signal_list", json!({"waveform_file": file}));

    for name in trace.signal_names() {
        assert!(text.contains(&format!("  {name} [")), "{name} missing from:\n{text}");
    }
}

#[test]
fn test_ir_changes_visible_in_every_layer() {
    let waves = TestWaveforms::new();
    let trace = wave_trace::open(waves.sim()).unwrap();

    let from_trace: Vec<u64> = trace
        .transitions("cpu.ir", 0, 150)
        .unwrap()
        .iter()
        .map(|t| t.index as u64)
        .collect();
    assert_eq!(from_trace, SIM_IR_CHANGES[1..]);

    let from_wal =
        wave_wal::evaluate(&trace, "(find (&& (> INDEX 0) (!= cpu.ir (prev cpu.ir))))").unwrap();
    let expected: Vec<wave_wal::Value> = SIM_IR_CHANGES[1..]
        .iter()
        .map(|&i| wave_wal::Value::Int(i as i64))
        .collect();
    assert_eq!(from_wal, wave_wal::Value::List(expected));
}
