//! Upstream source seam
//!
//! Resolvers only ever see the upstream through [`UpstreamSource`]: one GET of
//! a path relative to the API base, answered with the decoded JSON body.

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{CoreResult, UpstreamError};

/// Body text of the upstream's "nothing matched" answer to an id batch.
pub const INVALID_IDS_TEXT: &str = "all ids provided are invalid";

/// Read-only access to the upstream JSON API.
#[async_trait]
pub trait UpstreamSource: Send + Sync {
    /// GET `endpoint` (path plus querystring, relative to the base URL) and
    /// return the decoded body unmodified.
    async fn request(&self, endpoint: &str) -> CoreResult<Value>;
}

/// True when `value` is exactly `{"text": "all ids provided are invalid"}`.
pub fn is_invalid_ids_response(value: &Value) -> bool {
    match value.as_object() {
        Some(object) => {
            object.len() == 1
                && object.get("text").and_then(Value::as_str) == Some(INVALID_IDS_TEXT)
        }
        None => false,
    }
}

/// Build `base?ids=a,b,c`.
pub fn ids_endpoint<T: Display>(base: &str, ids: &[T]) -> String {
    let joined = ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("{}?ids={}", base, joined)
}

/// Request `endpoint` and decode the body as `T`.
pub(crate) async fn fetch_as<T: DeserializeOwned>(
    source: &dyn UpstreamSource,
    endpoint: &str,
) -> CoreResult<T> {
    let value = source.request(endpoint).await?;
    serde_json::from_value(value).map_err(|e| UpstreamError::decode(endpoint, e))
}

/// Request one batch of records by id.
///
/// An empty id set issues no request. The invalid-ids answer is an empty batch.
pub(crate) async fn fetch_batch<T, I>(
    source: &dyn UpstreamSource,
    base: &str,
    ids: &[I],
) -> CoreResult<Vec<T>>
where
    T: DeserializeOwned,
    I: Display,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let endpoint = ids_endpoint(base, ids);
    let value = source.request(&endpoint).await?;
    if is_invalid_ids_response(&value) {
        tracing::debug!(endpoint = %endpoint, "Upstream reported all ids invalid");
        return Ok(Vec::new());
    }

    serde_json::from_value(value).map_err(|e| UpstreamError::decode(&endpoint, e))
}

// ============================================================================
// MOCK SOURCE
// ============================================================================

/// In-memory upstream for testing.
///
/// Serves exact endpoint fixtures, and "collections" that behave like the
/// upstream's list endpoints: `base` answers with every record id and
/// `base?ids=..` answers with the matching records in request order, or the
/// invalid-ids body when none match. Every request is logged.
#[derive(Debug, Default)]
pub struct MockSource {
    responses: HashMap<String, Value>,
    collections: HashMap<String, Vec<Value>>,
    log: Mutex<Vec<String>>,
}

impl MockSource {
    /// Create an empty mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `value` for exactly `endpoint`.
    pub fn with_response(mut self, endpoint: impl Into<String>, value: Value) -> Self {
        self.responses.insert(endpoint.into(), value);
        self
    }

    /// Serve `records` as a collection under `base`.
    pub fn with_collection(mut self, base: impl Into<String>, records: Vec<Value>) -> Self {
        self.collections.entry(base.into()).or_default().extend(records);
        self
    }

    /// Every endpoint requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of requests served so far.
    pub fn request_count(&self) -> usize {
        self.log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn serve(&self, endpoint: &str) -> Option<Value> {
        if let Some(value) = self.responses.get(endpoint) {
            return Some(value.clone());
        }

        let (base, query) = match endpoint.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (endpoint, None),
        };
        let records = self.collections.get(base)?;

        let Some(query) = query else {
            return Some(Value::Array(
                records.iter().map(|record| record["id"].clone()).collect(),
            ));
        };

        let ids = query.strip_prefix("ids=")?;
        let matched: Vec<Value> = ids
            .split(',')
            .filter_map(|id| records.iter().find(|record| record_key(record) == id))
            .cloned()
            .collect();

        if matched.is_empty() {
            Some(serde_json::json!({ "text": INVALID_IDS_TEXT }))
        } else {
            Some(Value::Array(matched))
        }
    }
}

fn record_key(record: &Value) -> String {
    match &record["id"] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl UpstreamSource for MockSource {
    async fn request(&self, endpoint: &str) -> CoreResult<Value> {
        self.log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(endpoint.to_string());

        self.serve(endpoint)
            .ok_or_else(|| UpstreamError::transport(endpoint, "no fixture registered"))
    }
}
