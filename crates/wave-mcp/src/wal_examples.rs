//! Example WAL queries written against a waveform's own signal names

const RULE_WIDTH: usize = 60;

fn find_named<'a>(signals: &[&'a str], needles: &[&str]) -> Option<&'a str> {
    signals.iter().copied().find(|name| {
        let lower = name.to_lowercase();
        needles.iter().any(|needle| lower.contains(needle))
    })
}

/// Build the example page for `file`. Sections for clocks, resets and
/// counters appear only when a signal name suggests one.
pub fn generate(file: &str, signals: &[&str]) -> String {
    let (Some(&first), Some(&last)) = (signals.first(), signals.last()) else {
        return "No signals found in waveform file".to_string();
    };

    let mut lines = vec![
        format!("WAL Examples for {file}"),
        "=".repeat(RULE_WIDTH),
        format!("Available signals: {} total", signals.len()),
        String::new(),
        "BASIC SIGNAL ACCESS:".to_string(),
        "- SIGNALS - List all signals in waveform".to_string(),
        format!("- {first} - Get current value of {first}"),
        "- INDEX - Current time index".to_string(),
        "- (length (find true)) - Total simulation length".to_string(),
        String::new(),
    ];

    if let Some(clk) = find_named(signals, &["clk"]) {
        lines.extend([
            format!("CLOCK ANALYSIS (using {clk}):"),
            format!("- (find (= {clk} 1)) - Find all clock high times"),
            format!("- (length (find (= {clk} 1))) - Count clock high periods"),
            format!("- (find (&& (> INDEX 0) (= {clk} 1) (= (prev {clk}) 0))) - Rising edges"),
            String::new(),
        ]);
    }

    if let Some(rst) = find_named(signals, &["reset", "rst"]) {
        lines.extend([
            format!("RESET ANALYSIS (using {rst}):"),
            format!("- (find (= {rst} 1)) - Find reset assertion times"),
            format!("- (find (= {rst} 0)) - Find reset deassertion times"),
            format!("- (length (find (= {rst} 1))) - Total reset duration"),
            String::new(),
        ]);
    }

    if let Some(cnt) = find_named(signals, &["count"]) {
        lines.extend([
            format!("COUNTER ANALYSIS (using {cnt}):"),
            format!("- (find (= {cnt} 0)) - Find when counter is zero"),
            format!("- (find (> {cnt} 10)) - Find when counter > 10"),
            format!("- (length (find (>= {cnt} 1))) - Non-zero periods"),
            String::new(),
        ]);
    }

    if let [a, b, ..] = signals {
        lines.extend([
            "MULTI-SIGNAL PATTERNS:".to_string(),
            format!("- (find (&& (= {a} 1) (= {b} 0))) - {a} high AND {b} low"),
            format!("- (find (|| (= {a} 1) (= {b} 1))) - Either signal high"),
            format!("- (find (&& (>= {a} 1) (>= {b} 1))) - Both signals non-zero"),
            String::new(),
        ]);
    }

    lines.extend([
        "DEBUGGING PATTERNS:".to_string(),
        "- (find (= overflow 1)) - Find overflow events (if an overflow signal exists)"
            .to_string(),
        "- (find (&& (= valid 1) (= ready 0))) - Handshake stalls (if protocol signals exist)"
            .to_string(),
        format!("- (length (find (> {last} 15))) - Values out of range (example: >15)"),
        String::new(),
        "TIMING ANALYSIS:".to_string(),
        "- (step 0) INDEX - Stay at the start and show the time step".to_string(),
        format!("- (step 10) {first} - Advance 10 steps and show the value of {first}"),
        format!("- (reval {first} 5) - Value of {first} five steps ahead"),
        String::new(),
        "For more help: use get_wal_help with topics 'functions', 'debugging', or 'syntax'"
            .to_string(),
    ]);
    lines.join("\n")
}
