//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the dmmio server:
//! - HTTP request metrics (latency, counts, errors)
//! - Stream lookups by resource type and outcome
//! - Pipeline status (collected dynamically)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use regex_lite::Regex;
use tracing::error;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "dmmio_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("dmmio_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "dmmio_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Stream Metrics
// =============================================================================

/// Stream resource requests by type and outcome.
pub static STREAM_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("dmmio_stream_requests_total", "Stream resource requests"),
        &["type", "result"],
    )
    .unwrap()
});

/// Catalog lookups running right now (collected dynamically).
pub static LOOKUPS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "dmmio_lookups_in_flight",
        "Number of distinct catalog lookups currently running",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Streams
    registry
        .register(Box::new(STREAM_REQUESTS.clone()))
        .unwrap();
    registry
        .register(Box::new(LOOKUPS_IN_FLIGHT.clone()))
        .unwrap();

    // Core metrics (challenge, catalog, pipeline)
    for metric in dmmio_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Collect dynamic metrics from current application state.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    LOOKUPS_IN_FLIGHT.set(state.pipeline().in_flight() as i64);
}

static STREAM_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/stream/(movie|series|anime|other)/[^/]+\.json$").unwrap());

/// Routes whose path is already a fixed label.
const STATIC_PATHS: &[&str] = &["/api/v1/health", "/api/v1/config", "/metrics"];

/// Label for every path that matches no route.
pub const UNMATCHED_PATH: &str = "/{unmatched}";

/// Normalize a path for metric labels.
///
/// Ids are replaced with placeholders and anything outside the known routes
/// collapses into [`UNMATCHED_PATH`], so label values stay a fixed set.
pub fn normalize_path(path: &str) -> String {
    if STATIC_PATHS.contains(&path) {
        return path.to_string();
    }
    match STREAM_PATH.captures(path) {
        Some(caps) => format!("/stream/{}/{{id}}.json", &caps[1]),
        None => UNMATCHED_PATH.to_string(),
    }
}

/// Normalize a request method for metric labels. Extension methods share one
/// label.
pub fn normalize_method(method: &axum::http::Method) -> &'static str {
    use axum::http::Method;
    match *method {
        Method::GET => "GET",
        Method::HEAD => "HEAD",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::PATCH => "PATCH",
        Method::OPTIONS => "OPTIONS",
        _ => "OTHER",
    }
}
