//! Metrics collection and exposition.
//!
//! # Metrics
//! - `csp_reports_total` (counter): reports by outcome, status
//! - `csp_report_duration_seconds` (histogram): pipeline latency by outcome
//! - `csp_sink_write_failures_total` (counter): records the sink rejected
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade and is a no-op until
//!   `init_metrics` installs the Prometheus recorder

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
/// Must run inside a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one processed report.
pub fn record_report(outcome: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "csp_reports_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("csp_report_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_sink_failure() {
    metrics::counter!("csp_sink_write_failures_total").increment(1);
}
