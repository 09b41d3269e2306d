//! HTTP transport for the MCP server, meant to be nested under `/mcp`

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use crate::protocol::{JsonRpcError, McpRequest, McpResponse};
use crate::server::McpServer;

pub fn create_router(server: Arc<McpServer>) -> Router {
    Router::new()
        .route("/", post(mcp_handler))
        .route("/tools", get(tools_list_handler))
        .route("/tools/call", post(tools_call_handler))
        .with_state(server)
}

async fn mcp_handler(State(server): State<Arc<McpServer>>, body: Bytes) -> Response {
    let request: McpRequest = match serde_json::from_slice::<Value>(&body) {
        Err(e) => {
            return Json(McpResponse::error(None, JsonRpcError::parse_error(e.to_string())))
                .into_response()
        }
        Ok(value) => {
            let id = value.get("id").cloned();
            match serde_json::from_value(value) {
                Ok(request) => request,
                Err(e) => {
                    let error = JsonRpcError::invalid_request(e.to_string());
                    return Json(McpResponse::error(id, error)).into_response();
                }
            }
        }
    };

    debug!(method = %request.method, "HTTP MCP request");
    match server.handle_request(request).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn tools_list_handler(State(server): State<Arc<McpServer>>) -> impl IntoResponse {
    Json(json!({ "tools": server.list_tools() }))
}

async fn tools_call_handler(
    State(server): State<Arc<McpServer>>,
    Json(params): Json<Value>,
) -> impl IntoResponse {
    let request = McpRequest::new("tools/call").with_id(1).with_params(params);
    Json(server.handle_request(request).await)
}
