//! Prometheus Metrics Definitions
//!
//! Defines the gateway's metrics and exposes a /metrics endpoint for
//! Prometheus scraping.

use axum::{http::StatusCode, response::IntoResponse};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

use crate::error::{ApiError, ApiResult};

/// HTTP request latency buckets (seconds)
/// Covers: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s
const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0,
];

/// Upstream request latency buckets (seconds)
/// Covers: 10ms through 30s
const UPSTREAM_LATENCY_BUCKETS: &[f64] = &[
    0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0, 30.0,
];

/// Global metrics instance - initialized once at startup
pub static METRICS: Lazy<ApiResult<TyriaMetrics>> = Lazy::new(TyriaMetrics::new);

/// Outcome label of an upstream request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamOutcome {
    Ok,
    TransportError,
    DecodeError,
}

impl UpstreamOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamOutcome::Ok => "ok",
            UpstreamOutcome::TransportError => "transport_error",
            UpstreamOutcome::DecodeError => "decode_error",
        }
    }
}

/// Container for all gateway metrics.
#[derive(Clone)]
pub struct TyriaMetrics {
    /// HTTP request counter - labels: method, path, status
    pub http_requests_total: CounterVec,

    /// HTTP request duration histogram - labels: method, path
    pub http_request_duration_seconds: HistogramVec,

    /// Upstream request counter - labels: endpoint, outcome
    pub upstream_requests_total: CounterVec,

    /// Upstream request duration histogram - labels: endpoint
    pub upstream_request_duration_seconds: HistogramVec,
}

impl TyriaMetrics {
    /// Create and register all metrics with Prometheus.
    pub fn new() -> ApiResult<Self> {
        Ok(Self {
            http_requests_total: register_counter_vec!(
                "tyria_http_requests_total",
                "Total number of HTTP requests",
                &["method", "path", "status"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register http_requests_total: {}", e)))?,

            http_request_duration_seconds: register_histogram_vec!(
                "tyria_http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "path"],
                HTTP_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register http_request_duration_seconds: {}", e)))?,

            upstream_requests_total: register_counter_vec!(
                "tyria_upstream_requests_total",
                "Total number of requests sent to the upstream API",
                &["endpoint", "outcome"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register upstream_requests_total: {}", e)))?,

            upstream_request_duration_seconds: register_histogram_vec!(
                "tyria_upstream_request_duration_seconds",
                "Upstream request duration in seconds",
                &["endpoint"],
                UPSTREAM_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register upstream_request_duration_seconds: {}", e)))?,
        })
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, status_str.as_str()])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    /// Record an upstream request. `endpoint` is the path without querystring.
    pub fn record_upstream_request(&self, endpoint: &str, outcome: UpstreamOutcome, duration_secs: f64) {
        self.upstream_requests_total
            .with_label_values(&[endpoint, outcome.as_str()])
            .inc();
        self.upstream_request_duration_seconds
            .with_label_values(&[endpoint])
            .observe(duration_secs);
    }
}

/// Handler for GET /metrics endpoint.
///
/// Returns Prometheus text format metrics.
pub async fn metrics_handler() -> impl IntoResponse {
    // Force registration so the gateway families show up on the first scrape.
    if let Err(e) = METRICS.as_ref() {
        tracing::error!(error = %e, "Metrics registry unavailable");
    }

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e).into_bytes(),
            )
        }
    }
}
