//! Router Composition
//!
//! Composes the capability routes, the catalog endpoint and the MCP endpoint
//! into one router, logging where each piece is mounted.

use axum::Router;
use tracing::info;

/// Builder for composing service routers
pub struct RouterBuilder {
    router: Router,
    services: Vec<(&'static str, &'static str)>, // (prefix, name)
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            services: Vec::new(),
        }
    }

    /// Mount a router under a prefix
    pub fn nest(mut self, prefix: &'static str, name: &'static str, router: Router) -> Self {
        info!("Mounting service '{}' at {}", name, prefix);
        self.router = self.router.nest(prefix, router);
        self.services.push((prefix, name));
        self
    }

    /// Merge a router at the root
    pub fn merge(mut self, name: &'static str, router: Router) -> Self {
        info!("Mounting service '{}' at /", name);
        self.router = self.router.merge(router);
        self.services.push(("/", name));
        self
    }

    pub fn build(self) -> Router {
        info!(services = self.services.len(), "Router composed");
        self.router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
