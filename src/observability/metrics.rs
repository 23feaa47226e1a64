//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, handler, status
//! - `http_request_duration_seconds` (histogram): latency by method, handler
//! - `app_resources_ready` (gauge): 1 while shared resources are ready
//!
//! # Design Decisions
//! - One Prometheus recorder per process; the handle is cloned into app state
//! - `handler` is the route template, never the raw path, to bound cardinality

use std::sync::Mutex;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// Content type of the text exposition format.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

static HANDLE: Mutex<Option<PrometheusHandle>> = Mutex::new(None);

/// Install the process-wide Prometheus recorder, or return the handle of the
/// one already installed.
pub fn install() -> Result<PrometheusHandle, BuildError> {
    let mut slot = HANDLE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(handle) = slot.as_ref() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            LATENCY_BUCKETS,
        )?
        .install_recorder()?;

    describe_counter!("http_requests_total", "Total HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        metrics::Unit::Seconds,
        "HTTP request latency"
    );
    describe_gauge!("app_resources_ready", "Shared resources ready (1) or not (0)");

    tracing::debug!("Prometheus recorder installed");
    *slot = Some(handle.clone());
    Ok(handle)
}

/// Record one completed request.
pub fn record_request(method: &str, handler: &str, status: u16, elapsed: Duration) {
    counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "handler" => handler.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "handler" => handler.to_string()
    )
    .record(elapsed.as_secs_f64());
}

/// Record the shared-resource lifecycle state.
pub fn record_resources_ready(ready: bool) {
    gauge!("app_resources_ready").set(if ready { 1.0 } else { 0.0 });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_is_idempotent() {
        let first = install().unwrap();
        let second = install().unwrap();

        record_request("GET", "/health", 200, Duration::from_millis(3));
        let rendered = second.render();
        assert!(rendered.contains("http_requests_total"));
        assert!(first.render().contains("http_request_duration_seconds"));
    }
}
