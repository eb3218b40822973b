//! HTTP Routes Module
//!
//! Includes:
//! - GraphQL endpoint, playground and WebSocket transport
//! - Health check endpoints (Kubernetes-compatible)
//! - Prometheus metrics
//! - CORS support for browser-based clients

pub mod graphql;
pub mod health;

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tyria_core::Resolver;

use crate::config::ApiConfig;
use crate::error::ApiResult;
use crate::state::AppState;
use crate::telemetry::{metrics_handler, observability_middleware, METRICS};

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// With no configured origins every origin is allowed; otherwise origins are
/// matched through [`ApiConfig::is_origin_allowed`], wildcards included.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: allowing all origins");
        cors.allow_origin(Any).allow_headers(Any)
    } else {
        tracing::info!(origins = ?config.cors_origins, "CORS: allowing configured origins");
        let config = config.clone();
        cors.allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_origin(AllowOrigin::predicate(
                move |origin: &HeaderValue, _parts| {
                    origin
                        .to_str()
                        .map(|origin| config.is_origin_allowed(origin))
                        .unwrap_or(false)
                },
            ))
    }
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the complete API router.
///
/// - GraphQL at /graphql, GraphiQL at /graphql/playground, WebSocket at /graphql/ws
/// - Health checks at /health/*
/// - Metrics at /metrics
pub fn create_api_router(resolver: Resolver, config: &ApiConfig) -> ApiResult<Router> {
    if let Err(e) = METRICS.as_ref() {
        return Err(e.clone());
    }

    let state = AppState::new(resolver);
    tracing::debug!(sdl = %state.graphql_schema.sdl(), "GraphQL schema built");

    let router = Router::new()
        .nest("/graphql", graphql::create_router(state.graphql_schema.clone()))
        .nest("/health", health::create_router())
        .route("/metrics", get(metrics_handler))
        .with_state(state);

    // Execution order: CORS -> Observability -> Trace -> Handler
    Ok(router
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(observability_middleware))
        .layer(build_cors_layer(config)))
}
