//! Tyria API - GraphQL Gateway over the Guild Wars 2 REST API
//!
//! Serves a read-only GraphQL schema (Axum + async-graphql) whose resolvers
//! call the upstream REST API through [`Gw2Client`], with prerequisite chains
//! resolved by `tyria-core`.

#[macro_use]
pub mod macros;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod upstream;

// Re-export commonly used types
pub use config::{ApiConfig, DEFAULT_UPSTREAM_BASE_URL};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::create_api_router;
pub use routes::graphql::{create_schema, schema_builder, QueryRoot, TyriaSchema};
pub use state::AppState;
pub use upstream::Gw2Client;
