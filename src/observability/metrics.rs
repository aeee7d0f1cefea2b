//! Metrics collection and exposition.
//!
//! # Metrics
//! - `catalog_requests_total` (counter): completed requests by route, outcome
//! - `catalog_request_duration_seconds` (histogram): request latency by route
//! - `catalog_errors_total` (counter): domain failures by route, error type
//!
//! # Design Decisions
//! - Instruments are process-wide aggregates, never reset while running
//! - Recording never fails the caller; a missing or broken exporter is a
//!   no-op on the request path
//! - Exposed for Prometheus scrape on a dedicated listener

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Handle for recording request metrics.
///
/// Constructed once as part of the telemetry context and passed by handle;
/// request code never reaches for the recorder through globals.
#[derive(Debug, Clone, Copy, Default)]
pub struct Metrics;

impl Metrics {
    /// Count one completed request and record its duration.
    pub fn record_request(&self, route: &str, outcome: &str, elapsed: Duration) {
        counter!(
            "catalog_requests_total",
            "route" => route.to_string(),
            "outcome" => outcome.to_string(),
        )
        .increment(1);
        histogram!(
            "catalog_request_duration_seconds",
            "route" => route.to_string(),
        )
        .record(elapsed.as_secs_f64());
    }

    /// Count one domain failure.
    pub fn record_error(&self, route: &str, error_type: &str) {
        counter!(
            "catalog_errors_total",
            "route" => route.to_string(),
            "error_type" => error_type.to_string(),
        )
        .increment(1);
    }
}

/// Install the Prometheus exporter, serving scrapes on the given address.
///
/// Must run inside a tokio runtime; the exporter serves scrapes from a
/// background task.
pub fn install_exporter(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!(
        "catalog_requests_total",
        "Completed requests by route and outcome"
    );
    describe_histogram!(
        "catalog_request_duration_seconds",
        "Request latency distribution by route"
    );
    describe_counter!(
        "catalog_errors_total",
        "Domain failures by route and error type"
    );

    tracing::info!(address = %addr, "Prometheus exporter listening");
    Ok(())
}
