//! Shared Middleware Stack
//!
//! Applied once to the composed router so capability routes, the catalog
//! endpoint and the MCP endpoint behave the same way.

use axum::{
    body::Body,
    http::{header::HeaderName, HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
    Router,
};
use std::time::{Duration, Instant};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Middleware configuration
#[derive(Debug, Clone)]
pub struct MiddlewareConfig {
    /// Enable CORS (default: true)
    pub cors_enabled: bool,
    /// CORS allowed origins (None = any)
    pub cors_origins: Option<Vec<String>>,
    /// Enable request tracing spans (default: true)
    pub tracing_enabled: bool,
    /// Enable response compression (default: true)
    pub compression_enabled: bool,
    /// Request timeout (default: 30s)
    pub timeout: Duration,
    /// Enable security headers (default: true)
    pub security_headers: bool,
    /// Enable request logging (default: true)
    pub request_logging: bool,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            cors_enabled: true,
            cors_origins: None,
            tracing_enabled: true,
            compression_enabled: true,
            timeout: Duration::from_secs(30),
            security_headers: true,
            request_logging: true,
        }
    }
}

impl MiddlewareConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cors(mut self, enabled: bool) -> Self {
        self.cors_enabled = enabled;
        self
    }

    /// Restrict CORS to `origins`; an empty list allows any origin
    pub fn cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = if origins.is_empty() { None } else { Some(origins) };
        self
    }

    pub fn tracing(mut self, enabled: bool) -> Self {
        self.tracing_enabled = enabled;
        self
    }

    pub fn compression(mut self, enabled: bool) -> Self {
        self.compression_enabled = enabled;
        self
    }

    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    pub fn security_headers(mut self, enabled: bool) -> Self {
        self.security_headers = enabled;
        self
    }

    pub fn request_logging(mut self, enabled: bool) -> Self {
        self.request_logging = enabled;
        self
    }
}

/// Middleware stack that can be applied to a router
pub struct MiddlewareStack {
    config: MiddlewareConfig,
}

impl MiddlewareStack {
    pub fn new(config: MiddlewareConfig) -> Self {
        Self { config }
    }

    /// Apply the middleware stack to a router
    pub fn apply(self, router: Router) -> Router {
        let mut router = router;

        // Innermost first: security headers see the handler's response first
        if self.config.security_headers {
            router = router.layer(middleware::from_fn(security_headers_middleware));
        }

        if self.config.request_logging {
            router = router.layer(middleware::from_fn(request_logging_middleware));
        }

        router = router.layer(TimeoutLayer::new(self.config.timeout));

        if self.config.compression_enabled {
            router = router.layer(CompressionLayer::new());
        }

        if self.config.tracing_enabled {
            router = router.layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
            );
        }

        // CORS outermost so preflight requests never reach a handler
        if self.config.cors_enabled {
            let cors = match self.config.cors_origins {
                Some(ref origins) => {
                    let origins: Vec<HeaderValue> =
                        origins.iter().filter_map(|o| o.parse().ok()).collect();
                    CorsLayer::new()
                        .allow_origin(origins)
                        .allow_methods(Any)
                        .allow_headers(Any)
                }
                None => CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            };
            router = router.layer(cors);
        }

        router
    }
}

const SECURITY_HEADERS: [(&str, &str); 3] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
];

async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    response
}

/// Logs method, URI, status and latency at a level chosen by status class
async fn request_logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let elapsed_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        tracing::error!(%method, %uri, status, elapsed_ms, "request failed");
    } else if response.status().is_client_error() {
        tracing::warn!(%method, %uri, status, elapsed_ms, "request rejected");
    } else {
        tracing::info!(%method, %uri, status, elapsed_ms, "request served");
    }

    response
}

/// Apply middleware with the given config
pub fn apply_middleware(router: Router, config: MiddlewareConfig) -> Router {
    MiddlewareStack::new(config).apply(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_security_and_cors_headers() {
        let router = Router::new().route("/health", get(|| async { "ok" }));
        let router = apply_middleware(router, MiddlewareConfig::default());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "http://dashboard.local")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_cors_restricted_to_configured_origins() {
        let config = MiddlewareConfig::new().cors_origins(vec!["http://dashboard.local".into()]);
        let router = Router::new().route("/health", get(|| async { "ok" }));
        let router = apply_middleware(router, config);

        let request = |origin: &str| {
            Request::builder()
                .uri("/health")
                .header("origin", origin)
                .body(Body::empty())
                .unwrap()
        };

        let response = router.clone().oneshot(request("http://dashboard.local")).await.unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://dashboard.local"
        );

        let response = router.oneshot(request("http://elsewhere.local")).await.unwrap();
        assert!(response.headers().get("access-control-allow-origin").is_none());

        let config = MiddlewareConfig::new().cors_origins(Vec::new());
        assert!(config.cors_origins.is_none());
    }

    #[tokio::test]
    async fn test_disabled_layers_leave_response_untouched() {
        let router = Router::new().route("/health", get(|| async { "ok" }));
        let config = MiddlewareConfig::new()
            .cors(false)
            .security_headers(false)
            .compression(false);
        let router = apply_middleware(router, config);

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("x-content-type-options").is_none());
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }
}
