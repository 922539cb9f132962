//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Bind the listener and hand it to the HTTP server

use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Error type for startup and serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Invalid bind address {address:?}: {source}")]
    Address {
        address: String,
        source: std::net::AddrParseError,
    },

    #[error("Failed to bind: {0}")]
    Bind(std::io::Error),

    #[error("Server error: {0}")]
    Serve(std::io::Error),
}

/// Bind the configured listener address.
pub async fn bind_listener(config: &AppConfig) -> Result<TcpListener, StartupError> {
    let addr: SocketAddr =
        config
            .listener
            .bind_address
            .parse()
            .map_err(|source| StartupError::Address {
                address: config.listener.bind_address.clone(),
                source,
            })?;

    let listener = TcpListener::bind(addr).await.map_err(StartupError::Bind)?;
    let local_addr = listener.local_addr().map_err(StartupError::Bind)?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );
    Ok(listener)
}

/// Start every subsystem and serve until shutdown.
pub async fn run(config: AppConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = bind_listener(&config).await?;
    let server = HttpServer::new(config);
    // Publish the empty store so the gauge exists before the first write.
    metrics::record_store_size(server.store().len());
    server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}
