//! Metrics collection and exposition.
//!
//! # Metrics
//! - `address_book_requests_total` (counter): requests by method, route, status
//! - `address_book_request_duration_seconds` (histogram): latency by method, route
//! - `address_book_records` (gauge): live records in the store
//! - `address_book_imported_records_total` (counter): rows accepted by CSV import
//!
//! # Design Decisions
//! - Routes are labelled by their matched pattern (`/address/{id}`), never the raw path
//! - Recording is a no-op until a recorder is installed

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    metrics::counter!(
        "address_book_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "address_book_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Publish the current store size.
pub fn record_store_size(records: usize) {
    metrics::gauge!("address_book_records").set(records as f64);
}

/// Count rows accepted by a CSV import.
pub fn record_imported(rows: usize) {
    metrics::counter!("address_book_imported_records_total").increment(rows as u64);
}

/// Middleware recording request count and latency.
pub async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
