//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Challenge generation (time source lookups)
//! - Catalog pagination
//! - Pipeline executions and request coalescing

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Challenge
// =============================================================================

/// Trusted time lookups by result.
pub static TIME_SOURCE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "dmmio_time_source_requests_total",
            "Trusted time source lookups",
        ),
        &["result"], // "ok", "error"
    )
    .unwrap()
});

// =============================================================================
// Catalog
// =============================================================================

/// Catalog pages requested, by outcome.
pub static CATALOG_PAGES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("dmmio_catalog_pages_total", "Catalog pages requested"),
        &["result"], // "ok", "empty", "error"
    )
    .unwrap()
});

/// Catalog page request duration in seconds.
pub static CATALOG_PAGE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "dmmio_catalog_page_duration_seconds",
            "Duration of a single catalog page request",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0]),
        &["catalog"],
    )
    .unwrap()
});

// =============================================================================
// Pipeline
// =============================================================================

/// Pipeline executions by outcome.
pub static PIPELINE_EXECUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "dmmio_pipeline_executions_total",
            "Stream pipeline executions",
        ),
        &["result"], // "ok", "error"
    )
    .unwrap()
});

/// Pipeline execution duration in seconds.
pub static PIPELINE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "dmmio_pipeline_duration_seconds",
            "Duration of a full pipeline execution",
        )
        .buckets(vec![0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["result"],
    )
    .unwrap()
});

/// Entries surviving each stage of the pipeline.
pub static STAGE_ENTRIES: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "dmmio_stage_entries",
            "Number of entries leaving each pipeline stage",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 1000.0]),
        &["stage"], // "fetch", "filter", "dedup", or a custom stage name
    )
    .unwrap()
});

/// Requests that joined an execution already in flight.
pub static COALESCED_REQUESTS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "dmmio_coalesced_requests_total",
        "Requests served by an already running execution",
    )
    .unwrap()
});

/// Streams returned to clients.
pub static STREAMS_RETURNED: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "dmmio_last_stream_count",
        "Number of streams in the most recent response",
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Challenge
        Box::new(TIME_SOURCE_REQUESTS.clone()),
        // Catalog
        Box::new(CATALOG_PAGES.clone()),
        Box::new(CATALOG_PAGE_DURATION.clone()),
        // Pipeline
        Box::new(PIPELINE_EXECUTIONS.clone()),
        Box::new(PIPELINE_DURATION.clone()),
        Box::new(STAGE_ENTRIES.clone()),
        Box::new(COALESCED_REQUESTS.clone()),
        Box::new(STREAMS_RETURNED.clone()),
    ]
}
