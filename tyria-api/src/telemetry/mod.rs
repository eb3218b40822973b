//! Tyria Telemetry - Observability Infrastructure
//!
//! Structured logging and Prometheus metrics for the API layer.

pub mod metrics;
pub mod middleware;
pub mod tracer;

pub use metrics::{metrics_handler, TyriaMetrics, UpstreamOutcome, METRICS};
pub use middleware::observability_middleware;
pub use tracer::{init_tracer, TelemetryConfig, DEFAULT_LOG_FILTER};
