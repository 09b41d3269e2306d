//! Route composition

use axum::{extract::State, response::Json, routing::get, Router};
use openmcp_http::RouterBuilder;
use openmcp_mcp::McpServer;
use openmcp_tools::Catalog;
use std::sync::Arc;

use crate::dispatch::capability_router;
use crate::state::AppState;

/// Capability routes at the root, the catalog under `/api-registry` and the
/// tool-invocation protocol under `/mcp`
pub fn create_router(state: Arc<AppState>) -> Router {
    let registry = Arc::clone(&state.registry);

    let api_registry = Router::new()
        .route("/apis", get(list_apis))
        .with_state(Arc::clone(&state));

    RouterBuilder::new()
        .merge("capabilities", capability_router(Arc::clone(&registry)))
        .nest("/api-registry", "api-registry", api_registry)
        .nest(
            "/mcp",
            "mcp",
            openmcp_mcp::create_router(Arc::new(McpServer::new(registry))),
        )
        .build()
}

/// GET /api-registry/apis
async fn list_apis(State(state): State<Arc<AppState>>) -> Json<Catalog> {
    Json(state.registry.catalog())
}
