//! Tyria API Server Entry Point
//!
//! Bootstraps configuration, builds the upstream client and starts the Axum
//! HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tyria_api::telemetry::{init_tracer, TelemetryConfig};
use tyria_api::{create_api_router, ApiConfig, ApiError, ApiResult, Gw2Client};
use tyria_core::Resolver;

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::default();
    init_tracer(&telemetry_config)?;

    let api_config = ApiConfig::from_env();
    let client = Gw2Client::new(&api_config)?;
    tracing::info!(upstream = %client.base_url(), "Upstream client ready");

    let resolver = Resolver::new(Arc::new(client));
    let app: Router = create_api_router(resolver, &api_config)?;

    let addr = resolve_bind_addr()?;
    tracing::info!(%addr, "Starting Tyria API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn resolve_bind_addr() -> ApiResult<SocketAddr> {
    let host = std::env::var("TYRIA_API_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port_str = std::env::var("PORT")
        .ok()
        .or_else(|| std::env::var("TYRIA_API_PORT").ok())
        .unwrap_or_else(|| "8000".to_string());
    let port = port_str
        .parse::<u16>()
        .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", port_str)))?;

    let addr = format!("{}:{}", host, port);
    addr.parse::<SocketAddr>()
        .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
}
