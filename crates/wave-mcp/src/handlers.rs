//! MCP Tool Handlers
//!
//! [`ToolCall::parse`] turns a tool name and raw argument mapping into one
//! typed variant per tool; [`Dispatcher`] runs it against a freshly opened
//! waveform and renders the text the caller sees. Argument problems are
//! reported before any file is opened.

use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use wave_trace::Trace;

use crate::source::{FileSource, WaveformSource};
use crate::tools::{ToolKind, ToolResult, descriptor};
use crate::{Error, Result, help, suggest, wal_examples};

/// WAL query used to measure a recording.
pub const LENGTH_EXPR: &str = "(length (find true))";

/// Lists longer than this are summarized element by element.
const PREVIEW_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SignalListArgs {
    pub waveform_file: String,
    #[serde(default)]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransitionArgs {
    pub waveform_file: String,
    pub signal_name: String,
    #[serde(default)]
    pub start_time: Option<u64>,
    #[serde(default)]
    pub end_time: Option<u64>,
}

impl TransitionArgs {
    /// Explicit last step, if any. `0` means the end of the recording, the
    /// same as leaving `end_time` out.
    pub fn end_bound(&self) -> Option<u64> {
        self.end_time.filter(|&end| end != 0)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WaveformArgs {
    pub waveform_file: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExpressionArgs {
    pub waveform_file: String,
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HelpArgs {
    #[serde(default)]
    pub topic: Option<String>,
}

/// A validated invocation of one catalog tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    SignalList(SignalListArgs),
    SignalTransitions(TransitionArgs),
    WaveformLength(WaveformArgs),
    WalExpression(ExpressionArgs),
    WalHelp(HelpArgs),
    WalExamples(WaveformArgs),
}

impl ToolCall {
    /// Resolve the tool and parse its arguments. A null mapping counts as
    /// empty.
    pub fn parse(name: &str, arguments: Value) -> Result<Self> {
        let kind = ToolKind::from_name(name).ok_or_else(|| Error::UnknownTool(name.to_string()))?;
        let args = match arguments {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(Error::invalid(
                    name,
                    "arguments",
                    format!("expected an object, got {other}"),
                ));
            }
        };
        descriptor(kind).validate(&args)?;

        let args = Value::Object(args);
        Ok(match kind {
            ToolKind::SignalList => Self::SignalList(typed(kind, args)?),
            ToolKind::SignalTransitions => Self::SignalTransitions(typed(kind, args)?),
            ToolKind::WaveformLength => Self::WaveformLength(typed(kind, args)?),
            ToolKind::WalExpression => Self::WalExpression(typed(kind, args)?),
            ToolKind::WalHelp => Self::WalHelp(typed(kind, args)?),
            ToolKind::WalExamples => Self::WalExamples(typed(kind, args)?),
        })
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Self::SignalList(_) => ToolKind::SignalList,
            Self::SignalTransitions(_) => ToolKind::SignalTransitions,
            Self::WaveformLength(_) => ToolKind::WaveformLength,
            Self::WalExpression(_) => ToolKind::WalExpression,
            Self::WalHelp(_) => ToolKind::WalHelp,
            Self::WalExamples(_) => ToolKind::WalExamples,
        }
    }
}

fn typed<T: DeserializeOwned>(kind: ToolKind, args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|e| Error::invalid(kind.name(), "arguments", e.to_string()))
}

/// Turns tool invocations into tool results.
pub struct Dispatcher {
    source: Box<dyn WaveformSource>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Dispatcher reading waveforms from disk
    pub fn new() -> Self {
        Self::with_source(FileSource)
    }

    pub fn with_source(source: impl WaveformSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Handle a tool call. Every failure becomes an error result; nothing
    /// escapes as a transport error.
    pub fn dispatch(&self, name: &str, arguments: Value) -> ToolResult {
        match ToolCall::parse(name, arguments).and_then(|call| self.run(call)) {
            Ok(text) => {
                tracing::debug!(tool = name, "Tool call succeeded");
                ToolResult::text(text)
            }
            Err(err) => {
                tracing::warn!(tool = name, category = %err.category(), error = %err, "Tool call failed");
                ToolResult::failure(&err)
            }
        }
    }

    /// Run a parsed call and return its text payload.
    pub fn run(&self, call: ToolCall) -> Result<String> {
        match call {
            ToolCall::SignalList(args) => {
                let pattern = args.pattern.as_deref().filter(|p| !p.is_empty());
                let regex = pattern.map(compile_pattern).transpose()?;
                let trace = self.open(&args.waveform_file)?;
                Ok(signal_list(&trace, &args.waveform_file, pattern, regex.as_ref()))
            }
            ToolCall::SignalTransitions(args) => {
                if let (Some(start), Some(end)) = (args.start_time, args.end_bound()) {
                    check_order(start, end)?;
                }
                let trace = self.open(&args.waveform_file)?;
                signal_transitions(&trace, &args)
            }
            ToolCall::WaveformLength(args) => {
                let trace = self.open(&args.waveform_file)?;
                waveform_length(&trace, &args.waveform_file)
            }
            ToolCall::WalExpression(args) => {
                if args.expression.trim().is_empty() {
                    return Err(Error::invalid(
                        ToolKind::WalExpression.name(),
                        "expression",
                        "must not be empty",
                    ));
                }
                let trace = self.open(&args.waveform_file)?;
                execute_expression(&trace, &args.waveform_file, &args.expression)
            }
            ToolCall::WalHelp(args) => Ok(help::render(args.topic.as_deref())),
            ToolCall::WalExamples(args) => {
                let trace = self.open(&args.waveform_file)?;
                Ok(wal_examples::generate(&args.waveform_file, &trace.signal_names()))
            }
        }
    }

    fn open(&self, file: &str) -> Result<Trace> {
        let trace = self.source.open(Path::new(file))?;
        tracing::debug!(
            file,
            signals = trace.signals().len(),
            steps = trace.len(),
            "Loaded waveform"
        );
        Ok(trace)
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

fn check_order(start: u64, end: u64) -> Result<()> {
    if start > end {
        return Err(Error::InvalidRange(format!(
            "start_time {start} is after end_time {end}"
        )));
    }
    Ok(())
}

fn bit_width(width: u32) -> String {
    if width == 1 {
        "1 bit".to_string()
    } else {
        format!("{width} bits")
    }
}

fn signal_list(trace: &Trace, file: &str, pattern: Option<&str>, regex: Option<&Regex>) -> String {
    let mut lines = vec![format!("Signals in {file}:")];
    if let Some(pattern) = pattern {
        lines.push(format!("Filter pattern: {pattern}"));
    }

    let before = lines.len();
    lines.extend(
        trace
            .signals()
            .iter()
            .filter(|signal| regex.is_none_or(|re| re.is_match(&signal.name)))
            .map(|signal| format!("  {} [{}]", signal.name, bit_width(signal.width))),
    );

    if lines.len() == before {
        lines.push(if pattern.is_some() {
            "  No signals found matching regex pattern.".to_string()
        } else {
            "  No signals found in waveform file.".to_string()
        });
    }
    lines.join("\n")
}

fn signal_transitions(trace: &Trace, args: &TransitionArgs) -> Result<String> {
    let file = &args.waveform_file;
    let name = &args.signal_name;
    let signal = trace.signal(name).ok_or_else(|| Error::SignalNotFound {
        signal: name.clone(),
        file: file.clone(),
    })?;
    let last = trace
        .last_index()
        .ok_or_else(|| Error::InvalidRange(format!("{file} contains no time steps")))?;

    let start = args.start_time.unwrap_or(0);
    let end = args.end_bound().unwrap_or(last as u64);
    check_order(start, end)?;
    if end > last as u64 {
        return Err(Error::InvalidRange(format!(
            "end_time {end} is beyond the last time step {last} of {file}"
        )));
    }
    // both bounds are now within the trace
    let (start, end) = (start as usize, end as usize);

    let initial = trace
        .value_at(name, start)
        .map_or_else(|| "x".to_string(), ToString::to_string);
    let transitions = trace.transitions(name, start, end).unwrap_or_default();

    let mut lines = vec![
        format!("Signal analysis for '{name}':"),
        format!("  Width: {}", bit_width(signal.width)),
        format!("  Initial value at time {start}: {initial}"),
        String::new(),
    ];
    if transitions.is_empty() {
        lines.push("No transitions detected in time range.".to_string());
    } else {
        lines.push("Transitions detected:".to_string());
        lines.extend(transitions.iter().map(|t| {
            format!(
                "  Time {}: {} -> {} (timestamp {})",
                t.index, t.from, t.to, t.timestamp
            )
        }));
    }
    lines.extend([
        String::new(),
        format!("Time range analyzed: {start} to {end}"),
        format!("Total time steps checked: {}", end - start),
    ]);
    Ok(lines.join("\n"))
}

fn waveform_length(trace: &Trace, file: &str) -> Result<String> {
    let length = match wave_wal::evaluate(trace, LENGTH_EXPR) {
        Ok(wave_wal::Value::Int(n)) => n,
        Ok(other) => {
            return Err(Error::Unexpected(format!(
                "{LENGTH_EXPR} returned {} '{other}'",
                other.type_name()
            )));
        }
        Err(source) => {
            return Err(Error::Evaluation {
                expression: LENGTH_EXPR.to_string(),
                source,
                report: String::new(),
            });
        }
    };

    let mut lines = vec![
        format!("Waveform file: {file}"),
        format!("Length: {length} time steps"),
    ];
    if length > 0 {
        lines.push(format!("Time range: 0 to {}", length - 1));
    } else {
        lines.push("Time range: empty".to_string());
    }
    if let Some(timescale) = trace.timescale() {
        lines.push(format!("Timescale: {timescale}"));
    }
    if let (Some(first), Some(last)) = (trace.timestamps().first(), trace.timestamps().last()) {
        lines.push(format!("Timestamps: {first} to {last}"));
    }
    lines.push(format!("Method: WAL {LENGTH_EXPR}"));
    Ok(lines.join("\n"))
}

fn execute_expression(trace: &Trace, file: &str, expression: &str) -> Result<String> {
    let result = wave_wal::evaluate(trace, expression).map_err(|source| Error::Evaluation {
        expression: expression.to_string(),
        report: suggest::report(expression, file, &source, &trace.signal_names()),
        source,
    })?;

    let mut lines = vec![
        format!("WAL Expression: {expression}"),
        format!("Waveform file: {file}"),
        String::new(),
        format!("Result: {result}"),
        format!("Result type: {}", result.type_name()),
    ];
    if let Some(items) = result.as_list().filter(|items| items.len() > PREVIEW_LEN) {
        lines.push(format!("Result length: {}", items.len()));
        lines.push("First few elements:".to_string());
        lines.extend(
            items
                .iter()
                .take(PREVIEW_LEN)
                .enumerate()
                .map(|(i, item)| format!("  [{i}]: {item}")),
        );
        lines.push(format!("  ... and {} more", items.len() - PREVIEW_LEN));
    }
    Ok(lines.join("\n"))
}
