//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by route, status
//! - `relay_request_duration_seconds` (histogram): handler latency
//! - `relay_fetch_attempts_total` (counter): origin attempts by outcome
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a completed relay request.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    let status = status.to_string();
    metrics::counter!("relay_requests_total", "route" => route, "status" => status.clone())
        .increment(1);
    metrics::histogram!("relay_request_duration_seconds", "route" => route, "status" => status)
        .record(start.elapsed().as_secs_f64());
}

/// Record a single outbound fetch attempt.
pub fn record_fetch_attempt(outcome: &'static str) {
    metrics::counter!("relay_fetch_attempts_total", "outcome" => outcome).increment(1);
}
