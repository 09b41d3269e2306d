//! openmcp-server: unified HTTP and MCP facade over third-party APIs

use anyhow::Context;
use clap::Parser;
use openmcp_core::Settings;
use openmcp_http::{HttpServer, MiddlewareConfig};
use openmcp_web::{create_router, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "openmcp-server",
    version,
    about = "Unified HTTP and MCP facade over third-party APIs"
)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind host, overrides the configured value
    #[arg(long)]
    host: Option<String>,

    /// Bind port, overrides the configured value
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().compact())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,openmcp_web=debug")),
        )
        .init();

    let args = Args::parse();

    let mut settings =
        Settings::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(port) = args.port {
        settings.port = port;
    }

    info!("Starting openmcp-server v{}", env!("CARGO_PKG_VERSION"));
    if settings.weather_api_key.is_empty() {
        warn!("WEATHER_API_KEY is not set; weather lookups will fail upstream");
    }

    let state = Arc::new(AppState::new(settings.clone())?);
    info!(
        capabilities = state.registry.len(),
        tools = state.registry.discoverable().count(),
        "Capability registry ready"
    );

    let server = HttpServer::builder()
        .host(settings.host.clone())
        .port(settings.port)
        .router(create_router(Arc::clone(&state)))
        .middleware(
            MiddlewareConfig::new()
                .timeout(settings.request_timeout())
                .cors_origins(settings.cors_origins.clone()),
        )
        .build();

    server.serve_with_shutdown(shutdown_signal()).await?;

    info!(uptime_secs = state.uptime_secs(), "Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down...");
        },
    }
}
