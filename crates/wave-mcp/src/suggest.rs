//! Failure report for `execute_wal_expression`
//!
//! Hints are picked from the kind of evaluator error and name real signals
//! from the waveform so the caller can retry with a working expression.

use wave_wal::Error as WalError;

const SHOWN_SIGNALS: usize = 5;

fn hints(error: &WalError, signals: &[&str]) -> Vec<String> {
    let mut out = Vec::new();

    if matches!(
        error,
        WalError::UndefinedSymbol(_) | WalError::UndefinedFunction(_)
    ) {
        let mut available = signals
            .iter()
            .take(SHOWN_SIGNALS)
            .copied()
            .collect::<Vec<_>>()
            .join(", ");
        if signals.len() > SHOWN_SIGNALS {
            available.push_str("...");
        }
        out.extend([
            "Variable/function not found. Try:".to_string(),
            "- Check signal names with SIGNALS".to_string(),
            "- Use the exact hierarchical name from your waveform".to_string(),
            format!("- Available signals: {available}"),
        ]);
    }

    if matches!(error, WalError::Type { message, .. } if message == "argument must be a list") {
        out.extend([
            "Function expects a list. Try:".to_string(),
            "- (find condition) returns a list of time steps".to_string(),
            "- (length (find condition)) counts matches".to_string(),
            format!(
                "- Use signal names directly: {}",
                signals.first().copied().unwrap_or("signal_name")
            ),
        ]);
    }

    if matches!(error, WalError::Syntax { .. }) {
        out.extend([
            "The expression could not be read. Try:".to_string(),
            "- Check that every '(' has a matching ')'".to_string(),
            "- Close strings with a double quote".to_string(),
        ]);
    }

    if matches!(error, WalError::IndexOutOfRange { .. }) {
        out.extend([
            "A time step outside the recording was requested. Try:".to_string(),
            "- Guard (prev ...) with (> INDEX 0)".to_string(),
            "- Compare against MAX-INDEX before (step N)".to_string(),
        ]);
    }

    if out.is_empty() {
        out.extend([
            "Common WAL patterns to try:".to_string(),
            "- SIGNALS - List all signal names".to_string(),
            "- (find (= signal_name value)) - Time steps where a signal equals a value".to_string(),
            "- (count condition) - Count matching time steps".to_string(),
            "- (length (find true)) - Total simulation length".to_string(),
        ]);
    }

    if let Some(first) = signals.first() {
        out.extend([
            String::new(),
            format!("Examples with your signals (using '{first}'):"),
            format!("- (find (= {first} 1)) - Find when {first} is high"),
            format!("- (count (= {first} 0)) - Count when {first} is low"),
            format!("- (length (find (!= {first} 0))) - Time steps when {first} != 0"),
        ]);
    }
    out
}

/// Full report for a failed evaluation.
pub fn report(expression: &str, file: &str, error: &WalError, signals: &[&str]) -> String {
    let mut lines = vec![
        format!("WAL Expression: {expression}"),
        format!("Waveform file: {file}"),
        String::new(),
        format!("Execution Error: {error}"),
        String::new(),
    ];
    lines.extend(hints(error, signals));
    lines.push(String::new());
    lines.push(
        "For more help: use get_wal_help with topics 'examples', 'functions', or 'debugging'"
            .to_string(),
    );
    lines.join("\n")
}
