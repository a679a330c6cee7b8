//! Metrics collection and exposition.
//!
//! # Metrics
//! - `fizzbuzz_requests_total` (counter): requests by endpoint and status
//! - `fizzbuzz_request_duration_seconds` (histogram): latency per endpoint
//! - `fizzbuzz_distinct_params` (gauge): parameter records tracked by the counter
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   exporter every call is a no-op, which keeps tests quiet

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its HTTP scrape listener.
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one answered request.
pub fn record_request(endpoint: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "fizzbuzz_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("fizzbuzz_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Record how many distinct parameter records are being counted.
pub fn record_distinct_params(count: usize) {
    metrics::gauge!("fizzbuzz_distinct_params").set(count as f64);
}
