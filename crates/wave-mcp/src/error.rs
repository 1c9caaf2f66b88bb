//! Error types for the MCP server

use std::fmt;

use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while handling a tool call
#[derive(Debug, Error)]
pub enum Error {
    /// Tool name not present in the catalog
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Required argument absent or null
    #[error("missing required argument '{argument}' for tool '{tool}'")]
    MissingArgument { tool: String, argument: String },

    /// Argument present but of the wrong type or shape
    #[error("invalid argument '{argument}' for tool '{tool}': {message}")]
    InvalidArgument {
        tool: String,
        argument: String,
        message: String,
    },

    /// Waveform could not be opened or decoded
    #[error("cannot load waveform: {0}")]
    Trace(#[from] wave_trace::Error),

    #[error("signal '{signal}' not found in {file}")]
    SignalNotFound { signal: String, file: String },

    /// Malformed signal filter
    #[error("invalid regex pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Time bounds outside the recording or in the wrong order
    #[error("{0}")]
    InvalidRange(String),

    /// The WAL evaluator rejected the expression
    #[error("evaluation of '{expression}' failed: {source}")]
    Evaluation {
        expression: String,
        #[source]
        source: wave_wal::Error,
        /// Detailed report with suggestions, shown as a second text block
        report: String,
    },

    /// The evaluator returned something the tool cannot interpret
    #[error("unexpected result: {0}")]
    Unexpected(String),

    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure classes reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidInvocation,
    Resource,
    Range,
    Evaluation,
    Unexpected,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InvalidInvocation => "invalid invocation",
            Self::Resource => "resource error",
            Self::Range => "range error",
            Self::Evaluation => "evaluation error",
            Self::Unexpected => "unexpected error",
        })
    }
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownTool(_) | Self::MissingArgument { .. } | Self::InvalidArgument { .. } => {
                ErrorCategory::InvalidInvocation
            }
            Self::Trace(_) | Self::SignalNotFound { .. } => ErrorCategory::Resource,
            Self::InvalidPattern { .. } | Self::InvalidRange(_) => ErrorCategory::Range,
            Self::Evaluation { .. } => ErrorCategory::Evaluation,
            Self::Unexpected(_) | Self::Json(_) | Self::Io(_) => ErrorCategory::Unexpected,
        }
    }

    pub(crate) fn missing(tool: &str, argument: &str) -> Self {
        Self::MissingArgument {
            tool: tool.to_string(),
            argument: argument.to_string(),
        }
    }

    pub(crate) fn invalid(tool: &str, argument: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            tool: tool.to_string(),
            argument: argument.to_string(),
            message: message.into(),
        }
    }
}
