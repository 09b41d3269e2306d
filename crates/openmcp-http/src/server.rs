//! HTTP Server
//!
//! Single listener that serves the composed facade router.

use crate::middleware::{apply_middleware, MiddlewareConfig};
use crate::{Result, ServerError};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Bind host
    pub bind_host: String,
    /// Bind port
    pub port: u16,
    /// Machine hostname, used for the logged public URL
    pub public_host: String,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind_host, self.port)
            .parse()
            .map_err(|_| ServerError::InvalidAddress(format!("{}:{}", self.bind_host, self.port)))
    }
}

/// The facade HTTP server
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn builder() -> HttpServerBuilder {
        HttpServerBuilder::new()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.socket_addr()?;
        let listener = TcpListener::bind(addr).await?;

        info!("HTTP server listening on http://{}", addr);
        info!("Public URL: http://{}:{}", self.config.public_host, self.config.port);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ServerError::BindError)?;

        info!("HTTP server stopped");
        Ok(())
    }
}

/// Builder for HttpServer
pub struct HttpServerBuilder {
    bind_host: String,
    port: u16,
    router: Option<Router>,
    middleware_config: MiddlewareConfig,
}

impl HttpServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 8000,
            router: None,
            middleware_config: MiddlewareConfig::default(),
        }
    }

    /// Set bind address (`host:port` or just a port)
    pub fn bind(mut self, addr: impl Into<String>) -> Self {
        let addr = addr.into();
        if let Some((host, port)) = addr.rsplit_once(':') {
            self.bind_host = host.to_string();
            if let Ok(p) = port.parse() {
                self.port = p;
            }
        } else if let Ok(p) = addr.parse::<u16>() {
            self.port = p;
        }
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.bind_host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    pub fn middleware(mut self, config: MiddlewareConfig) -> Self {
        self.middleware_config = config;
        self
    }

    pub fn build(self) -> HttpServer {
        let router = apply_middleware(self.router.unwrap_or_default(), self.middleware_config);

        let public_host = gethostname::gethostname().to_string_lossy().to_string();

        HttpServer {
            config: ServerConfig {
                bind_host: self.bind_host,
                port: self.port,
                public_host,
            },
            router,
        }
    }
}

impl Default for HttpServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
