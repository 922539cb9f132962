//! Address book HTTP service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id → trace → timeout → body limit → metrics
//!                                                                    │
//!                                                                    ▼
//!                                                          ┌──────────────────┐
//!                                                          │ address handlers │
//!                                                          └────────┬─────────┘
//!                                                                   │
//!                                           ┌───────────────────────┼──────────────┐
//!                                           ▼                                      ▼
//!                                   ┌───────────────┐                    ┌──────────────────┐
//!                                   │  RecordStore  │                    │ CSV transcoder   │
//!                                   │ (mutex, seq)  │                    │ export / import  │
//!                                   └───────────────┘                    └──────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use address_book::config::{load_config, AppConfig};
use address_book::lifecycle::{startup, Shutdown};
use address_book::observability::logging;

#[derive(Parser)]
#[command(name = "address-book")]
#[command(about = "In-memory address book HTTP service", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address (e.g. 127.0.0.1:8080).
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!("address-book v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        max_body_size = config.limits.max_body_size,
        metrics_enabled = config.observability.metrics_enabled,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    startup::run(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
