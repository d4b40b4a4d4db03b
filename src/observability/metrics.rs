//! Metrics collection and exposition.
//!
//! # Metrics
//! - `site_requests_total` (counter): requests by method, status, kind
//! - `site_render_duration_seconds` (histogram): page render latency by outcome
//! - `site_alias_decisions_total` (counter): alias outcomes by decision
//! - `admin_dispatch_total` (counter): admin dispatch outcomes by page, outcome
//!
//! # Design Decisions
//! - Recording is cheap and never fails; without an installed exporter
//!   the calls are no-ops

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Count a finished request. `kind` is `page`, `component` or `admin`.
pub fn record_request(method: &str, status: u16, kind: &'static str) {
    metrics::counter!(
        "site_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "kind" => kind
    )
    .increment(1);
}

/// Time a page request. `outcome` is `rendered`, `degraded` or `not_found`.
pub fn record_render(outcome: &'static str, start: Instant) {
    metrics::histogram!("site_render_duration_seconds", "outcome" => outcome)
    .record(start.elapsed().as_secs_f64());
}

pub fn record_alias_decision(decision: &'static str) {
    metrics::counter!("site_alias_decisions_total", "decision" => decision).increment(1);
}

pub fn record_admin_dispatch(page: &str, outcome: &'static str) {
    metrics::counter!(
        "admin_dispatch_total",
        "page" => page.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}
