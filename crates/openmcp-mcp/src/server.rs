//! MCP Server
//!
//! Transport-agnostic request handling over a [`CapabilityRegistry`].

use openmcp_tools::{Arguments, CapabilityRegistry};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::protocol::{JsonRpcError, McpRequest, McpResponse};
use crate::{PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION};

/// Tool information for MCP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

pub struct McpServer {
    registry: Arc<CapabilityRegistry>,
}

impl McpServer {
    pub fn new(registry: Arc<CapabilityRegistry>) -> Self {
        Self { registry }
    }

    /// Handle one request. Returns `None` for notifications.
    pub async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        debug!(method = %request.method, "Handling MCP request");

        if request.is_notification() {
            match request.method.as_str() {
                "notifications/initialized" | "initialized" => {
                    debug!("Client finished initialization")
                }
                other => debug!(method = %other, "Ignoring notification"),
            }
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "initialized" | "notifications/initialized" | "ping" => {
                McpResponse::success(request.id, json!({}))
            }
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,
            _ => McpResponse::error(request.id, JsonRpcError::method_not_found(&request.method)),
        };
        Some(response)
    }

    fn handle_initialize(&self, request: McpRequest) -> McpResponse {
        let client_info = request.params.as_ref().and_then(|p| p.get("clientInfo"));
        let client_name = client_info
            .and_then(|ci| ci.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let client_version = client_info
            .and_then(|ci| ci.get("version"))
            .and_then(Value::as_str)
            .unwrap_or("?");

        info!(client = %client_name, version = %client_version, "Client connected");

        let result = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false }
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION
            }
        });

        McpResponse::success(request.id, result)
    }

    /// One tool per tagged capability, in registration order
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.registry
            .discoverable()
            .map(|capability| {
                let description = if capability.description().is_empty() {
                    capability.summary().to_string()
                } else {
                    capability.description().to_string()
                };
                ToolInfo {
                    name: capability.name().to_string(),
                    description,
                    input_schema: capability.input_schema(),
                }
            })
            .collect()
    }

    fn handle_tools_list(&self, request: McpRequest) -> McpResponse {
        McpResponse::success(request.id, json!({ "tools": self.list_tools() }))
    }

    async fn handle_tools_call(&self, request: McpRequest) -> McpResponse {
        let params = match &request.params {
            Some(p) => p,
            None => {
                return McpResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("Missing params"),
                )
            }
        };

        let tool_name = match params.get("name").and_then(Value::as_str) {
            Some(n) => n,
            None => {
                return McpResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("Missing tool name"),
                )
            }
        };

        let capability = match self.registry.get(tool_name) {
            Some(c) if c.is_discoverable() => c,
            _ => {
                warn!(tool = %tool_name, "Call to unknown tool");
                return McpResponse::error(
                    request.id,
                    JsonRpcError::invalid_params(format!("Unknown tool: {}", tool_name)),
                );
            }
        };

        let arguments = match params.get("arguments") {
            None | Some(Value::Null) => Arguments::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => {
                return McpResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("arguments must be an object"),
                )
            }
        };

        let result = match capability.invoke(arguments).await {
            Ok(value) => tool_result(&value, false),
            Err(e) => {
                debug!(tool = %tool_name, error = %e, "Tool call failed");
                tool_result(&e.body(), true)
            }
        };
        McpResponse::success(request.id, result)
    }
}

fn tool_result(value: &Value, is_error: bool) -> Value {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    json!({
        "content": [{ "type": "text", "text": text }],
        "isError": is_error
    })
}
