//! Scenario-based Integration Tests
//!
//! Each test drives the dispatcher the way an MCP client would, against
//! recordings written to a temporary directory, and checks the text and
//! error category a caller receives.

use pretty_assertions::assert_eq;
use regex::Regex;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use wave_mcp::{Dispatcher, ToolResult, list_tools};
use wave_test_utils::{SIM_IR_CHANGES, TestWaveforms, VcdBuilder};

// =============================================================================
// Test Infrastructure
// =============================================================================

#[fixture]
fn waves() -> TestWaveforms {
    TestWaveforms::new()
}

fn call(tool: &str, arguments: Value) -> ToolResult {
    Dispatcher::new().dispatch(tool, arguments)
}

fn ok_text(result: &ToolResult) -> String {
    assert!(!result.is_error, "unexpected failure: {}", result.joined_text());
    result.joined_text()
}

fn err_text(result: &ToolResult) -> String {
    assert!(result.is_error, "unexpected success: {}", result.joined_text());
    result.joined_text()
}

/// `(index, from, to, timestamp)` for every transition line.
fn transitions(text: &str) -> Vec<(u64, String, String, u64)> {
    let line = Regex::new(r"^  Time (\d+): (\S+) -> (\S+) \(timestamp (\d+)\)$").unwrap();
    text.lines()
        .filter_map(|l| line.captures(l))
        .map(|c| {
            (
                c[1].parse().unwrap(),
                c[2].to_string(),
                c[3].to_string(),
                c[4].parse().unwrap(),
            )
        })
        .collect()
}

// =============================================================================
// Catalog
// =============================================================================

#[test]
fn scenario_catalog_has_six_distinct_tools() {
    let tools = list_tools();
    assert_eq!(tools.len(), 6);
    let mut names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), 6);
}

// =============================================================================
// Invocation errors
// =============================================================================

#[rstest]
#[case("get_signal_list", json!({}), "waveform_file")]
#[case("get_signal_transitions", json!({"waveform_file": "a.vcd"}), "signal_name")]
#[case("execute_wal_expression", json!({"waveform_file": "a.vcd"}), "expression")]
#[case("get_wal_examples", json!({"waveform_file": null}), "waveform_file")]
fn scenario_missing_argument_is_named(
    #[case] tool: &str,
    #[case] arguments: Value,
    #[case] argument: &str,
) {
    let text = err_text(&call(tool, arguments));
    assert!(text.starts_with("invalid invocation: "), "{text}");
    assert!(text.contains(&format!("'{argument}'")), "{text}");
}

#[test]
fn scenario_mistyped_time_bound() {
    let text = err_text(&call(
        "get_signal_transitions",
        json!({"waveform_file": "a.vcd", "signal_name": "s", "start_time": "zero"}),
    ));
    assert!(text.contains("start_time"));
}

// =============================================================================
// Transitions
// =============================================================================

#[rstest]
fn scenario_transitions_in_window(waves: TestWaveforms) {
    let text = ok_text(&call(
        "get_signal_transitions",
        json!({
            "waveform_file": waves.sim(),
            "signal_name": "cpu.ir",
            "start_time": 0,
            "end_time": 100
        }),
    ));
    let indices: Vec<u64> = transitions(&text).iter().map(|t| t.0).collect();
    assert_eq!(indices, vec![7, 23, 42, 99]);
    assert!(indices.windows(2).all(|w| w[0] <= w[1]));
}

#[rstest]
fn scenario_counter_transitions_carry_values(waves: TestWaveforms) {
    let text = ok_text(&call(
        "get_signal_transitions",
        json!({
            "waveform_file": waves.counter(),
            "signal_name": "tb.dut.counter",
            "start_time": 0,
            "end_time": 10
        }),
    ));
    assert!(text.contains("  Width: 4 bits"), "{text}");
    assert!(text.contains("  Initial value at time 0: 0"));
    assert_eq!(
        transitions(&text),
        vec![
            (5, "0".to_string(), "1".to_string(), 25),
            (7, "1".to_string(), "2".to_string(), 35),
            (9, "2".to_string(), "3".to_string(), 45),
        ]
    );
    assert!(text.ends_with("Total time steps checked: 10"));
}

#[rstest]
fn scenario_quiet_window(waves: TestWaveforms) {
    let text = ok_text(&call(
        "get_signal_transitions",
        json!({
            "waveform_file": waves.sim(),
            "signal_name": "cpu.ir",
            "start_time": 50,
            "end_time": 90
        }),
    ));
    assert!(text.contains("No transitions detected in time range."));
}

#[rstest]
#[case(json!({"start_time": 10, "end_time": 5}))]
#[case(json!({"start_time": 0, "end_time": 151}))]
#[case(json!({"start_time": 200}))]
fn scenario_bad_windows_are_range_errors(waves: TestWaveforms, #[case] window: Value) {
    let mut arguments = json!({"waveform_file": waves.sim(), "signal_name": "cpu.pc"});
    if let (Some(target), Some(bounds)) = (arguments.as_object_mut(), window.as_object()) {
        target.extend(bounds.clone());
    }
    let text = err_text(&call("get_signal_transitions", arguments));
    assert!(text.starts_with("range error: "), "{text}");
}

#[rstest]
fn scenario_unknown_signal(waves: TestWaveforms) {
    let text = err_text(&call(
        "get_signal_transitions",
        json!({"waveform_file": waves.sim(), "signal_name": "cpu.flags"}),
    ));
    assert!(text.starts_with("resource error: "));
    assert!(text.contains("cpu.flags"));
}

#[rstest]
fn scenario_round_trip_length_then_transitions(waves: TestWaveforms) {
    let file = waves.sim();
    let length_text = ok_text(&call("get_waveform_length", json!({"waveform_file": file})));
    let length: u64 = Regex::new(r"Length: (\d+) time steps")
        .unwrap()
        .captures(&length_text)
        .and_then(|c| c[1].parse().ok())
        .unwrap();
    assert_eq!(length, 151);

    let text = ok_text(&call(
        "get_signal_transitions",
        json!({"waveform_file": file, "signal_name": "cpu.ir"}),
    ));
    let found = transitions(&text);
    let last = SIM_IR_CHANGES[SIM_IR_CHANGES.len() - 1];
    assert!(found.iter().any(|t| t.0 == last));
    assert!(found.iter().all(|t| t.0 < length));
}

#[rstest]
fn scenario_unknown_values_print_as_bits(waves: TestWaveforms) {
    let vcd = VcdBuilder::new()
        .wire("top.d", 2)
        .change_raw(0, "top.d", "xx")
        .change(10, "top.d", 2)
        .change_raw(20, "top.d", "1z")
        .build();
    let file = waves.write("xz.vcd", vcd);
    let text = ok_text(&call(
        "get_signal_transitions",
        json!({"waveform_file": file, "signal_name": "top.d"}),
    ));
    let found = transitions(&text);
    assert_eq!(found.len(), 2);
    assert_eq!((found[0].1.as_str(), found[0].2.as_str()), ("xx", "2"));
    assert_eq!((found[1].1.as_str(), found[1].2.as_str()), ("2", "1z"));
}

// =============================================================================
// Signal list
// =============================================================================

#[rstest]
fn scenario_pattern_without_matches(waves: TestWaveforms) {
    let text = ok_text(&call(
        "get_signal_list",
        json!({"waveform_file": waves.sim(), "pattern": "nomatch_xyz"}),
    ));
    assert!(!text.contains(" ["));
    assert!(text.contains("No signals found matching regex pattern."));
}

#[rstest]
fn scenario_malformed_pattern(waves: TestWaveforms) {
    let text = err_text(&call(
        "get_signal_list",
        json!({"waveform_file": waves.sim(), "pattern": "cpu.(pc"}),
    ));
    assert!(text.starts_with("range error: "));
    assert!(text.contains("cpu.(pc"));
}

// =============================================================================
// Help and examples
// =============================================================================

#[test]
fn scenario_unknown_topic_falls_back_to_overview() {
    let bogus = ok_text(&call("get_wal_help", json!({"topic": "bogus"})));
    let omitted = ok_text(&call("get_wal_help", json!({})));
    assert_eq!(bogus, omitted);
}

#[rstest]
fn scenario_examples_use_real_names(waves: TestWaveforms) {
    let file = waves.counter();
    let text = ok_text(&call("get_wal_examples", json!({"waveform_file": file})));
    assert!(text.contains("CLOCK ANALYSIS (using tb.clk):"));

    // every suggested clock query actually evaluates on the same file
    let query = "(length (find (= tb.clk 1)))";
    assert!(text.contains(query));
    let result = ok_text(&call(
        "execute_wal_expression",
        json!({"waveform_file": file, "expression": query}),
    ));
    assert!(result.contains("Result: 40"));
}

// =============================================================================
// Expressions
// =============================================================================

#[rstest]
fn scenario_list_results_are_previewed(waves: TestWaveforms) {
    let text = ok_text(&call(
        "execute_wal_expression",
        json!({"waveform_file": waves.counter(), "expression": "(find (= tb.reset 1))"}),
    ));
    assert!(text.contains("Result: [0, 1, 2, 3]"), "{text}");
    assert!(!text.contains("First few elements:"));

    let text = ok_text(&call(
        "execute_wal_expression",
        json!({"waveform_file": waves.counter(), "expression": "(find (= tb.clk 1))"}),
    ));
    assert!(text.contains("Result length: 40"));
    assert!(text.contains("  [0]: 1"));
    assert!(text.contains("  ... and 35 more"));
}

#[rstest]
fn scenario_failed_expression_suggests_signals(waves: TestWaveforms) {
    let text = err_text(&call(
        "execute_wal_expression",
        json!({"waveform_file": waves.counter(), "expression": "(count (= clk 1))"}),
    ));
    assert!(text.starts_with("evaluation error: "));
    assert!(text.contains("undefined symbol: clk"));
    assert!(text.contains("- Available signals: tb.clk, tb.reset, tb.dut.counter"));
}
