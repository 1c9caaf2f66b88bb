//! MCP server for waveform analysis
//!
//! This crate exposes waveform inspection and WAL (Waveform Analysis
//! Language) evaluation as Model Context Protocol tools, so an agent can list
//! signals, follow value changes and run queries against simulation dumps.
//!
//! # Architecture
//!
//! ```text
//! [ MCP Client ]
//!        | (JSON-RPC over stdio)
//!        v
//! [ WaveMcpServer ] --tools/call--> [ Dispatcher ]
//!                                        |
//!                       +----------------+----------------+
//!                       v                                 v
//!              [ wave-trace (reader) ]          [ wave-wal (evaluator) ]
//! ```
//!
//! The dispatcher keeps no state between calls: every invocation opens the
//! waveform it names and drops it before answering.

pub mod error;
pub mod handlers;
pub mod help;
pub mod protocol;
pub mod server;
pub mod source;
pub mod suggest;
pub mod tools;
pub mod wal_examples;

pub use error::{Error, ErrorCategory, Result};
pub use handlers::{Dispatcher, ToolCall};
pub use server::WaveMcpServer;
pub use source::{FileSource, WaveformSource};
pub use tools::{ToolContent, ToolDescriptor, ToolKind, ToolResult, list_tools};
