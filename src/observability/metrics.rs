//! Metrics collection and exposition.
//!
//! # Metrics
//! - `nav_navigations_total` (counter): navigations by outcome
//! - `nav_navigation_duration_seconds` (histogram): fetch + swap + init time
//! - `nav_cache_lookups_total` (counter): fragment cache hits/misses
//! - `nav_prefetch_total` (counter): prefetch attempts by result
//! - `devserver_requests_total` (counter): dev server responses by kind
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - The Prometheus exporter is only installed by the dev server binary

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_navigation(outcome: &'static str, start: Instant) {
    counter!("nav_navigations_total", "outcome" => outcome).increment(1);
    histogram!("nav_navigation_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("nav_cache_lookups_total", "result" => result).increment(1);
}

pub fn record_prefetch(result: &'static str) {
    counter!("nav_prefetch_total", "result" => result).increment(1);
}

pub fn record_dev_request(kind: &'static str) {
    counter!("devserver_requests_total", "kind" => kind).increment(1);
}
