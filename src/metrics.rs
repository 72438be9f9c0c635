//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use lazy_static::lazy_static;
use prometheus::{HistogramOpts, IntCounterVec, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("lenspost_http_requests_total", "Total number of HTTP requests"),
        &["method", "endpoint", "status"]
    ).expect("metric can be created");
    pub static ref HTTP_REQUEST_DURATION_SECONDS: prometheus::HistogramVec = prometheus::HistogramVec::new(
        HistogramOpts::new(
            "lenspost_http_request_duration_seconds",
            "HTTP request duration in seconds"
        ).buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["method", "endpoint"]
    ).expect("metric can be created");

    // Interaction Metrics
    pub static ref INTERACTION_TOGGLES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("lenspost_interaction_toggles_total", "Total number of toggle operations"),
        &["kind", "state"]
    ).expect("metric can be created");
    pub static ref NOTIFICATIONS_EMITTED_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("lenspost_notifications_emitted_total", "Total number of notifications emitted"),
        &["kind"]
    ).expect("metric can be created");

    // Feed Metrics
    pub static ref FEED_ASSEMBLY_DURATION_SECONDS: prometheus::HistogramVec = prometheus::HistogramVec::new(
        HistogramOpts::new(
            "lenspost_feed_assembly_duration_seconds",
            "Feed assembly duration in seconds"
        ).buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 2.5]),
        &["surface"]
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("lenspost_errors_total", "Total number of errors"),
        &["error_type"]
    ).expect("metric can be created");
}

/// Initialize metrics registry.
pub fn init_metrics() {
    REGISTRY
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("HTTP_REQUESTS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("HTTP_REQUEST_DURATION_SECONDS can be registered");
    REGISTRY
        .register(Box::new(INTERACTION_TOGGLES_TOTAL.clone()))
        .expect("INTERACTION_TOGGLES_TOTAL can be registered");
    REGISTRY
        .register(Box::new(NOTIFICATIONS_EMITTED_TOTAL.clone()))
        .expect("NOTIFICATIONS_EMITTED_TOTAL can be registered");
    REGISTRY
        .register(Box::new(FEED_ASSEMBLY_DURATION_SECONDS.clone()))
        .expect("FEED_ASSEMBLY_DURATION_SECONDS can be registered");
    REGISTRY
        .register(Box::new(ERRORS_TOTAL.clone()))
        .expect("ERRORS_TOTAL can be registered");

    tracing::info!("Metrics registry initialized");
}

/// Record a toggle operation outcome.
pub fn observe_toggle(kind: &str, entered: bool) {
    let state = if entered { "on" } else { "off" };
    INTERACTION_TOGGLES_TOTAL
        .with_label_values(&[kind, state])
        .inc();
}
