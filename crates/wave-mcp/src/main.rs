//! Waveform MCP Server
//!
//! A Model Context Protocol server exposing waveform analysis tools backed by
//! WAL.
//!
//! # Usage
//!
//! ```bash
//! waveform-mcp
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Control log verbosity (default: `wave_mcp=info`, `waveform_mcp=info`)
//!
//! # Protocol
//!
//! The server communicates via JSON-RPC 2.0 over stdio:
//! - Requests/responses go through stdout
//! - Logs go to stderr (to avoid interfering with the protocol)

use clap::Parser;
use wave_mcp::WaveMcpServer;

/// MCP server for waveform analysis with WAL
#[derive(Parser)]
#[command(name = "waveform-mcp")]
#[command(about = "MCP server for waveform analysis with WAL")]
#[command(version)]
struct Args {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout is reserved for the protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wave_mcp=info".parse()?)
                .add_directive("waveform_mcp=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let Args {} = Args::parse();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting waveform-mcp server");

    let mut server = WaveMcpServer::new();
    server.run().await?;

    Ok(())
}
