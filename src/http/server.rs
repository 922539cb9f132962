//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit, metrics)
//! - Bind server to listener
//! - Shut down gracefully on signal

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::http::handlers::{
    create_address, delete_address, export_csv, get_address, health, import_csv, list_addresses,
    update_address,
};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::response::catch_panic_layer;
use crate::lifecycle::signals::shutdown_signal;
use crate::observability::metrics::track_metrics;
use crate::observability::tracing::make_request_span;
use crate::store::RecordStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
}

/// HTTP server for the address book.
pub struct HttpServer {
    router: Router,
    store: Arc<RecordStore>,
}

impl HttpServer {
    /// Create a new HTTP server with an empty store.
    pub fn new(config: AppConfig) -> Self {
        Self::with_store(config, Arc::new(RecordStore::new()))
    }

    /// Create a server over an existing store.
    pub fn with_store(config: AppConfig, store: Arc<RecordStore>) -> Self {
        let state = AppState {
            store: store.clone(),
        };
        let router = Self::build_router(&config, state);
        Self { router, store }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// `/address/export` and `/address/import` are static segments and take
    /// precedence over `/address/{id}`.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/address", get(list_addresses).post(create_address))
            .route("/address/export", get(export_csv))
            .route("/address/import", post(import_csv))
            .route(
                "/address/{id}",
                get(get_address).put(update_address).delete(delete_address),
            )
            .route("/health", get(health))
            .with_state(state)
            .layer(catch_panic_layer())
            .layer(middleware::from_fn(track_metrics))
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// Run the server until Ctrl+C, SIGTERM, or a message on `shutdown`.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!(records = self.store.len(), "HTTP server stopped");
        Ok(())
    }

    /// A clone of the fully layered router, for in-process dispatch.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The store backing this server.
    pub fn store(&self) -> Arc<RecordStore> {
        self.store.clone()
    }
}
