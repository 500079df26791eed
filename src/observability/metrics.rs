//! Metrics collection and exposition.
//!
//! # Metrics
//! - `replica_requests_total` (counter): replica answers by replica, outcome
//! - `station_measurement` (gauge): latest value per station
//! - `dispatch_total` (counter): dispatch results by status
//! - `dispatch_duration_seconds` (histogram): time until the envelope was decided
//! - `dispatch_attempt_failures_total` (counter): failed attempts by kind

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_replica_outcome(replica: &str, outcome: &'static str) {
    counter!(
        "replica_requests_total",
        "replica" => replica.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_measurement(station: &str, value: i64) {
    gauge!("station_measurement", "station" => station.to_string()).set(value as f64);
}

pub fn record_dispatch(status: u16, elapsed: Duration) {
    counter!("dispatch_total", "status" => status.to_string()).increment(1);
    histogram!("dispatch_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_attempt_failure(kind: &'static str) {
    counter!("dispatch_attempt_failures_total", "kind" => kind).increment(1);
}
