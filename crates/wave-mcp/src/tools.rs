//! Tool catalog and result envelope
//!
//! The catalog is a process-wide static table built once from
//! [`ToolKind::ALL`]. Each tool lists its parameters as [`ParamSpec`]s, which
//! both render the JSON Schema advertised by `tools/list` and drive the
//! presence/type checks performed before any argument struct is parsed.
//!
//! # Tools
//!
//! - `get_signal_list` - Signals of a waveform, optionally filtered by regex
//! - `get_signal_transitions` - Value changes of one signal in a time window
//! - `get_waveform_length` - Number of recorded time steps
//! - `execute_wal_expression` - Evaluate a WAL expression
//! - `get_wal_help` - WAL reference text by topic
//! - `get_wal_examples` - WAL examples built from a waveform's signal names

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::help::TOPICS;
use crate::{Error, Result};

/// The six tools, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    SignalList,
    SignalTransitions,
    WaveformLength,
    WalExpression,
    WalHelp,
    WalExamples,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        Self::SignalList,
        Self::SignalTransitions,
        Self::WaveformLength,
        Self::WalExpression,
        Self::WalHelp,
        Self::WalExamples,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::SignalList => "get_signal_list",
            Self::SignalTransitions => "get_signal_transitions",
            Self::WaveformLength => "get_waveform_length",
            Self::WalExpression => "execute_wal_expression",
            Self::WalHelp => "get_wal_help",
            Self::WalExamples => "get_wal_examples",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// JSON type accepted for a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    /// Non-negative integer
    Integer,
}

impl ParamKind {
    fn schema_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.as_u64().is_some(),
        }
    }

    fn expectation(self) -> &'static str {
        match self {
            Self::String => "expected a string",
            Self::Integer => "expected a non-negative integer",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub default: Option<Value>,
    pub description: &'static str,
    /// Advertised choices; not enforced
    pub allowed: &'static [&'static str],
}

impl ParamSpec {
    fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
            description,
            allowed: &[],
        }
    }

    fn optional(
        name: &'static str,
        kind: ParamKind,
        default: Option<Value>,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            required: false,
            default,
            description,
            allowed: &[],
        }
    }

    fn waveform_file() -> Self {
        Self::required(
            "waveform_file",
            ParamKind::String,
            "Path to the waveform file (.vcd)",
        )
    }
}

/// One advertised tool.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub kind: ToolKind,
    pub description: &'static str,
    pub params: Vec<ParamSpec>,
}

impl ToolDescriptor {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn required(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.params.iter().filter(|p| p.required).map(|p| p.name)
    }

    /// JSON Schema for the tool's arguments.
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| {
                let mut prop = json!({
                    "type": p.kind.schema_type(),
                    "description": p.description,
                });
                if let Some(default) = &p.default {
                    prop["default"] = default.clone();
                }
                if !p.allowed.is_empty() {
                    prop["enum"] = json!(p.allowed);
                }
                (p.name.to_string(), prop)
            })
            .collect();
        let required: Vec<&str> = self.required().collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Check required presence and declared types, in declaration order.
    /// A `null` value counts as absent.
    pub fn validate(&self, args: &Map<String, Value>) -> Result<()> {
        for param in &self.params {
            match args.get(param.name) {
                None | Some(Value::Null) if param.required => {
                    return Err(Error::missing(self.name(), param.name));
                }
                None | Some(Value::Null) => {}
                Some(value) if !param.kind.accepts(value) => {
                    return Err(Error::invalid(
                        self.name(),
                        param.name,
                        format!("{}, got {value}", param.kind.expectation()),
                    ));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

fn describe(kind: ToolKind) -> ToolDescriptor {
    let (description, params) = match kind {
        ToolKind::SignalList => (
            "Get the hierarchical list of signals in a waveform file",
            vec![
                ParamSpec::waveform_file(),
                ParamSpec::optional(
                    "pattern",
                    ParamKind::String,
                    Some(json!("")),
                    "Optional regex searched in signal names (e.g. 'cpu.*', 'top\\.m1\\.')",
                ),
            ],
        ),
        ToolKind::SignalTransitions => (
            "Get the value changes of one signal within a range of time steps",
            vec![
                ParamSpec::waveform_file(),
                ParamSpec::required(
                    "signal_name",
                    ParamKind::String,
                    "Full hierarchical signal name (e.g. 'cpu.pc')",
                ),
                ParamSpec::optional(
                    "start_time",
                    ParamKind::Integer,
                    Some(json!(0)),
                    "First time step to analyze",
                ),
                ParamSpec::optional(
                    "end_time",
                    ParamKind::Integer,
                    Some(json!(0)),
                    "Last time step to analyze (0 or omitted = end of the recording)",
                ),
            ],
        ),
        ToolKind::WaveformLength => (
            "Get the length of a waveform file in time steps",
            vec![ParamSpec::waveform_file()],
        ),
        ToolKind::WalExpression => (
            "Execute a WAL (Waveform Analysis Language) expression against a waveform.\n\n\
             WAL is a Lisp-like language evaluated over the recording's time steps:\n\
             - Signal access: SIGNALS (all names), signal_name (value at the current step)\n\
             - Time: INDEX, TS, (step N), (find cond), (count cond), (prev expr)\n\
             - Logic and comparison: && || ! = != < > <= >=\n\
             - Math: + - * / **\n\n\
             Examples:\n\
             - (count (= clk 1)) counts clock-high steps\n\
             - (find (&& (= clk 1) (= data 0))) lists steps with clock high and data low\n\n\
             Use get_wal_help for the full reference.",
            vec![
                ParamSpec::waveform_file(),
                ParamSpec::required("expression", ParamKind::String, "WAL expression to evaluate"),
            ],
        ),
        ToolKind::WalHelp => (
            "Get WAL (Waveform Analysis Language) documentation by topic",
            vec![ParamSpec {
                allowed: &TOPICS,
                ..ParamSpec::optional(
                    "topic",
                    ParamKind::String,
                    Some(json!("overview")),
                    "Help topic; unknown topics show the overview",
                )
            }],
        ),
        ToolKind::WalExamples => (
            "Get WAL examples written against the signals of a specific waveform",
            vec![ParamSpec::waveform_file()],
        ),
    };
    ToolDescriptor {
        kind,
        description,
        params,
    }
}

static CATALOG: LazyLock<Vec<ToolDescriptor>> =
    LazyLock::new(|| ToolKind::ALL.into_iter().map(describe).collect());

/// Every advertised tool, in catalog order.
pub fn list_tools() -> &'static [ToolDescriptor] {
    &CATALOG
}

pub fn descriptor(kind: ToolKind) -> &'static ToolDescriptor {
    &CATALOG[kind as usize]
}

/// Result from a tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(default)]
    pub is_error: bool,
}

/// Content types for tool results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    /// Create a successful text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: content.into(),
            }],
            is_error: false,
        }
    }

    /// Create an error result naming the failure category. Evaluation
    /// failures carry their report as a second block.
    pub fn failure(err: &Error) -> Self {
        let mut content = vec![ToolContent::Text {
            text: format!("{}: {err}", err.category()),
        }];
        if let Error::Evaluation { report, .. } = err {
            if !report.is_empty() {
                content.push(ToolContent::Text {
                    text: report.clone(),
                });
            }
        }
        Self {
            content,
            is_error: true,
        }
    }

    /// All text blocks joined by newlines.
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(|block| match block {
                ToolContent::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn six_tools_with_distinct_names() {
        let names: HashSet<&str> = list_tools().iter().map(|t| t.name()).collect();
        assert_eq!(list_tools().len(), 6);
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn catalog_order_follows_kinds() {
        for kind in ToolKind::ALL {
            assert_eq!(descriptor(kind).kind, kind);
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("get_signal_values"), None);
    }

    #[test]
    fn required_arguments() {
        let required = |kind| descriptor(kind).required().collect::<Vec<_>>();
        assert_eq!(required(ToolKind::SignalList), ["waveform_file"]);
        assert_eq!(
            required(ToolKind::SignalTransitions),
            ["waveform_file", "signal_name"]
        );
        assert_eq!(required(ToolKind::WaveformLength), ["waveform_file"]);
        assert_eq!(
            required(ToolKind::WalExpression),
            ["waveform_file", "expression"]
        );
        assert!(required(ToolKind::WalHelp).is_empty());
        assert_eq!(required(ToolKind::WalExamples), ["waveform_file"]);
    }

    #[test]
    fn schemas_are_objects() {
        for tool in list_tools() {
            let schema = tool.input_schema();
            assert_eq!(schema["type"], "object", "{}", tool.name());
            for param in &tool.params {
                assert_eq!(
                    schema["properties"][param.name]["type"],
                    param.kind.schema_type()
                );
            }
        }
    }

    #[test]
    fn help_schema_lists_topics() {
        let schema = descriptor(ToolKind::WalHelp).input_schema();
        assert_eq!(schema["properties"]["topic"]["default"], "overview");
        assert_eq!(schema["properties"]["topic"]["enum"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn validate_reports_first_missing_argument() {
        let tool = descriptor(ToolKind::SignalTransitions);
        let args = json!({"waveform_file": "a.vcd"});
        let err = tool.validate(args.as_object().unwrap()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing required argument 'signal_name' for tool 'get_signal_transitions'"
        );
    }

    #[test]
    fn validate_treats_null_as_missing() {
        let tool = descriptor(ToolKind::WaveformLength);
        let args = json!({"waveform_file": null});
        assert!(matches!(
            tool.validate(args.as_object().unwrap()),
            Err(Error::MissingArgument { .. })
        ));
    }

    #[test]
    fn validate_rejects_wrong_types() {
        let tool = descriptor(ToolKind::SignalTransitions);
        for bad in [json!(-1), json!(1.5), json!("3")] {
            let args = json!({"waveform_file": "a.vcd", "signal_name": "clk", "start_time": bad});
            let err = tool.validate(args.as_object().unwrap()).unwrap_err();
            assert!(err.to_string().contains("'start_time'"), "{err}");
        }
        let args = json!({"waveform_file": 42});
        assert!(tool.validate(args.as_object().unwrap()).is_err());
    }

    #[test]
    fn result_serializes_in_mcp_shape() {
        let json = serde_json::to_value(ToolResult::text("hi")).unwrap();
        assert_eq!(
            json,
            json!({"content": [{"type": "text", "text": "hi"}], "isError": false})
        );
    }

    #[test]
    fn failure_names_the_category() {
        let result = ToolResult::failure(&Error::UnknownTool("frobnicate".into()));
        assert!(result.is_error);
        assert_eq!(result.joined_text(), "invalid invocation: unknown tool: frobnicate");
    }
}
