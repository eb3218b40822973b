//! Shared application state for Axum routers.

use std::time::Instant;

use tyria_core::Resolver;

use crate::routes::graphql::{create_schema, TyriaSchema};

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Resolver,
    pub graphql_schema: TyriaSchema,
    pub start_time: Instant,
}

impl AppState {
    /// Build the state around one resolver; the schema gets a clone of it.
    pub fn new(resolver: Resolver) -> Self {
        Self {
            graphql_schema: create_schema(resolver.clone()),
            resolver,
            start_time: Instant::now(),
        }
    }
}

crate::impl_from_ref!(Resolver, resolver);
crate::impl_from_ref!(TyriaSchema, graphql_schema);
crate::impl_from_ref!(Instant, start_time);
