//! openmcp-http: HTTP server for the facade
//!
//! Other crates export routers that get composed here and served behind a
//! single middleware stack.
//!
//! ```text
//! openmcp-server binary
//!     └── openmcp-http (this crate)
//!         ├── Middleware stack (CORS, tracing, compression, timeout)
//!         └── Router composition
//!             ├── /{capability paths} → openmcp_web::dispatch
//!             ├── /api-registry/apis  → capability catalog
//!             └── /mcp/*              → openmcp_mcp::create_router()
//! ```

pub mod middleware;
pub mod router;
pub mod server;

pub use middleware::{MiddlewareConfig, MiddlewareStack};
pub use router::RouterBuilder;
pub use server::{HttpServer, HttpServerBuilder, ServerConfig};

// Re-export axum so downstream crates agree on one version
pub use axum;

/// Error types for the HTTP server
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("Server binding error: {0}")]
    BindError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
