//! Capability dispatch
//!
//! Turns every registered capability into an axum route. Inputs are gathered
//! from the query string, a JSON object body and the path (later sources win),
//! then handed to the registry which binds and validates them.

use axum::{
    body::Bytes,
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{on, MethodFilter, MethodRouter},
    Router,
};
use openmcp_tools::{Arguments, CallError, CapabilityRegistry, HttpMethod};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Router with one route per capability path
pub fn capability_router(registry: Arc<CapabilityRegistry>) -> Router {
    let mut routes: Vec<(String, MethodRouter)> = Vec::new();

    for capability in registry.iter() {
        let path = axum_path(capability.path());
        let filter = method_filter(capability.method());
        let handler = {
            let registry = Arc::clone(&registry);
            let name = capability.name().to_string();
            move |path: Option<Path<HashMap<String, String>>>,
                  Query(query): Query<HashMap<String, String>>,
                  body: Bytes| {
                let registry = Arc::clone(&registry);
                let name = name.clone();
                async move {
                    dispatch(&registry, &name, path.map(|Path(p)| p), query, body).await
                }
            }
        };

        // GET and POST on one path share a single method router
        match routes.iter().position(|(p, _)| *p == path) {
            Some(index) => {
                let (path, existing) = routes.remove(index);
                routes.insert(index, (path, existing.on(filter, handler)));
            }
            None => routes.push((path, on(filter, handler))),
        }
    }

    routes
        .into_iter()
        .fold(Router::new(), |router, (path, method_router)| {
            router.route(&path, method_router)
        })
}

async fn dispatch(
    registry: &CapabilityRegistry,
    name: &str,
    path: Option<HashMap<String, String>>,
    query: HashMap<String, String>,
    body: Bytes,
) -> Response {
    let args = match collect_arguments(path, query, &body) {
        Ok(args) => args,
        Err(e) => return error_response(&e),
    };

    match registry.invoke(name, args).await {
        Ok(value) => Json(value).into_response(),
        Err(e) => {
            debug!(capability = %name, error = %e, "Capability call failed");
            error_response(&e)
        }
    }
}

fn collect_arguments(
    path: Option<HashMap<String, String>>,
    query: HashMap<String, String>,
    body: &[u8],
) -> Result<Arguments, CallError> {
    let mut args: Arguments = query
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();

    if !body.iter().all(u8::is_ascii_whitespace) {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => args.extend(fields),
            Ok(_) => return Err(CallError::invalid_argument("request body must be a JSON object")),
            Err(e) => {
                return Err(CallError::invalid_argument(format!("invalid JSON body: {}", e)))
            }
        }
    }

    args.extend(
        path.unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k, Value::String(v))),
    );
    Ok(args)
}

fn error_response(error: &CallError) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(error.body())).into_response()
}

fn method_filter(method: HttpMethod) -> MethodFilter {
    match method {
        HttpMethod::Get => MethodFilter::GET,
        HttpMethod::Post => MethodFilter::POST,
        HttpMethod::Put => MethodFilter::PUT,
        HttpMethod::Delete => MethodFilter::DELETE,
    }
}

/// `/hot/{platform}` → `/hot/:platform`
fn axum_path(template: &str) -> String {
    template
        .split('/')
        .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => format!(":{}", name),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}
