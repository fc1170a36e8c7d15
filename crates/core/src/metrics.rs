//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Workflow runs (outcomes, poll attempts, duration)
//! - Calls to the generation service

use std::time::Instant;

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Workflow Metrics
// =============================================================================

/// Workflow runs by outcome.
pub static RUNS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("briefing_runs_total", "Total brief workflow runs"),
        &["outcome"], // "succeeded", "missing_session_id", "transport_failure", ...
    )
    .unwrap()
});

/// Poll attempts needed per finished run.
pub static POLL_ATTEMPTS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "briefing_poll_attempts",
            "Number of status polls made per workflow run",
        )
        .buckets(vec![1.0, 2.0, 3.0, 5.0, 8.0, 12.0, 18.0, 24.0]),
        &["outcome"],
    )
    .unwrap()
});

/// End-to-end run duration in seconds.
pub static RUN_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "briefing_run_duration_seconds",
            "Duration of a brief workflow run",
        )
        .buckets(vec![1.0, 5.0, 10.0, 20.0, 30.0, 60.0, 90.0, 120.0, 180.0]),
        &["outcome"],
    )
    .unwrap()
});

// =============================================================================
// Generation Service Metrics
// =============================================================================

/// Requests to the generation service by operation and result.
pub static BACKEND_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "briefing_backend_requests_total",
            "Total requests to the generation service",
        ),
        &["operation", "result"], // result: "ok", "error"
    )
    .unwrap()
});

/// Request duration to the generation service.
pub static BACKEND_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "briefing_backend_request_duration_seconds",
            "Duration of requests to the generation service",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Record one finished request to the generation service.
pub fn record_backend_request(operation: &str, started: Instant, ok: bool) {
    BACKEND_REQUEST_DURATION
        .with_label_values(&[operation])
        .observe(started.elapsed().as_secs_f64());
    BACKEND_REQUESTS
        .with_label_values(&[operation, if ok { "ok" } else { "error" }])
        .inc();
}

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Workflow
        Box::new(RUNS_TOTAL.clone()),
        Box::new(POLL_ATTEMPTS.clone()),
        Box::new(RUN_DURATION.clone()),
        // Generation service
        Box::new(BACKEND_REQUESTS.clone()),
        Box::new(BACKEND_REQUEST_DURATION.clone()),
    ]
}
