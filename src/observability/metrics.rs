//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method and caller-facing status
//! - `proxy_request_duration_seconds` (histogram): handler latency by method
//! - `proxy_rate_limited_total` (counter): requests rejected by the admission gate
//! - `proxy_upstream_errors_total` (counter): dispatch failures
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus
//! recorder, so tests and metrics-disabled deployments pay nothing.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve `/metrics` on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!("proxy_requests_total", "Requests answered, by method and status");
    describe_histogram!(
        "proxy_request_duration_seconds",
        Unit::Seconds,
        "Time from admission to response headers"
    );
    describe_counter!("proxy_rate_limited_total", "Requests rejected by the admission gate");
    describe_counter!("proxy_upstream_errors_total", "Requests whose upstream dispatch failed");

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "proxy_requests_total",
        "method" => method.to_owned(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("proxy_request_duration_seconds", "method" => method.to_owned())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited() {
    counter!("proxy_rate_limited_total").increment(1);
}

pub fn record_upstream_error() {
    counter!("proxy_upstream_errors_total").increment(1);
}
