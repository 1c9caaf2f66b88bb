//! MCP Server implementation
//!
//! Reads newline-delimited JSON-RPC requests, answers each on its own line
//! and hands `tools/call` requests to the [`Dispatcher`]. Requests are
//! handled one at a time in arrival order.

use std::io::{BufRead, Write};

use serde_json::{Value, json};

use crate::handlers::Dispatcher;
use crate::protocol::{
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, InitializeParams, InitializeResult,
    JsonRpcRequest, JsonRpcResponse, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION,
    ServerCapabilities, ServerInfo, ToolCallParams, ToolsCapability,
};
use crate::tools::list_tools;
use crate::{Error, Result};

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "waveform-mcp";

/// MCP Server for waveform analysis
///
/// # Example
///
/// ```no_run
/// use wave_mcp::WaveMcpServer;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut server = WaveMcpServer::new();
///     server.run().await?;
///     Ok(())
/// }
/// ```
pub struct WaveMcpServer {
    dispatcher: Dispatcher,

    /// Whether an `initialize` request has been answered
    initialized: bool,
}

impl Default for WaveMcpServer {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveMcpServer {
    pub fn new() -> Self {
        Self::with_dispatcher(Dispatcher::new())
    }

    pub fn with_dispatcher(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            initialized: false,
        }
    }

    /// Serve requests on stdin/stdout until stdin closes.
    pub async fn run(&mut self) -> Result<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.serve(stdin.lock(), stdout.lock()).await
    }

    /// Serve requests from `input`, writing responses to `output`, until
    /// `input` is exhausted.
    pub async fn serve(&mut self, input: impl BufRead, mut output: impl Write) -> Result<()> {
        tracing::info!("MCP server ready, listening on stdio");

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            tracing::debug!(request = %line, "Received message");

            let response = match self.handle_message(&line).await {
                Ok(response) => response,
                Err(e) => serde_json::to_string(&JsonRpcResponse::error(
                    None,
                    INTERNAL_ERROR,
                    format!("Internal error: {e}"),
                ))?,
            };
            // notifications get no reply
            if !response.is_empty() {
                writeln!(output, "{response}")?;
                output.flush()?;
            }
        }

        tracing::info!("Input closed, shutting down");
        Ok(())
    }

    /// Handle a single MCP message
    ///
    /// Returns the serialized response, or an empty string when the message
    /// is a notification.
    pub async fn handle_message(&mut self, message: &str) -> Result<String> {
        let request: JsonRpcRequest = match serde_json::from_str(message) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable message");
                let response = JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {e}"));
                return serde_json::to_string(&response).map_err(Error::from);
            }
        };

        let Some(id) = request.id else {
            tracing::debug!(method = %request.method, "Notification");
            return Ok(String::new());
        };
        let id = Some(id);

        let response = if request.jsonrpc != "2.0" {
            JsonRpcResponse::error(
                id,
                INVALID_REQUEST,
                format!("Invalid Request: unsupported jsonrpc version '{}'", request.jsonrpc),
            )
        } else {
            match request.method.as_str() {
                "initialize" => self.handle_initialize(id, request.params)?,
                "ping" => JsonRpcResponse::success(id, json!({})),
                "tools/list" => self.handle_tools_list(id),
                "tools/call" => self.handle_tools_call(id, request.params)?,
                _ => JsonRpcResponse::error(
                    id,
                    METHOD_NOT_FOUND,
                    format!("Method not found: {}", request.method),
                ),
            }
        };

        serde_json::to_string(&response).map_err(Error::from)
    }

    fn handle_initialize(&mut self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        if let Ok(params) = serde_json::from_value::<InitializeParams>(params) {
            tracing::info!(
                client = params.client_info.as_ref().map(|c| c.name.as_str()),
                protocol = params.protocol_version.as_deref(),
                "Client connected"
            );
        }
        self.initialized = true;

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };
        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let tools: Vec<Value> = list_tools()
            .iter()
            .map(|t| {
                json!({
                    "name": t.name(),
                    "description": t.description,
                    "inputSchema": t.input_schema(),
                })
            })
            .collect();
        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    fn handle_tools_call(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return Ok(JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    format!("Invalid params: {e}"),
                ));
            }
        };
        if !self.initialized {
            tracing::debug!(tool = %params.name, "Tool call before initialize");
        }
        let result = self.dispatcher.dispatch(&params.name, params.arguments);
        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn reply(server: &mut WaveMcpServer, message: &str) -> Value {
        serde_json::from_str(&server.handle_message(message).await.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn initialize_marks_server_ready() {
        let mut server = WaveMcpServer::new();
        assert!(!server.is_initialized());
        let response = reply(
            &mut server,
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"clientInfo":{"name":"t"}}}"#,
        )
        .await;
        assert!(server.is_initialized());
        assert_eq!(response["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(response["result"]["serverInfo"]["name"], SERVER_NAME);
        assert!(response["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn notifications_get_no_reply() {
        let mut server = WaveMcpServer::new();
        for method in ["initialized", "notifications/initialized", "tools/list"] {
            let message = format!(r#"{{"jsonrpc":"2.0","method":"{method}"}}"#);
            assert_eq!(server.handle_message(&message).await.unwrap(), "");
        }
    }

    #[tokio::test]
    async fn parse_errors_are_answered() {
        let mut server = WaveMcpServer::new();
        let response = reply(&mut server, "{not json").await;
        assert_eq!(response["error"]["code"], PARSE_ERROR);
        assert!(response.get("id").is_none());
    }

    #[tokio::test]
    async fn wrong_version_is_invalid() {
        let mut server = WaveMcpServer::new();
        let response = reply(&mut server, r#"{"jsonrpc":"1.0","id":3,"method":"ping"}"#).await;
        assert_eq!(response["error"]["code"], INVALID_REQUEST);
        assert_eq!(response["id"], 3);
    }

    #[tokio::test]
    async fn serve_answers_line_by_line() {
        let mut server = WaveMcpServer::new();
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
        );
        let mut output = Vec::new();
        server.serve(input.as_bytes(), &mut output).await.unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[1]["result"]["tools"].as_array().unwrap().len(), 6);
    }
}
