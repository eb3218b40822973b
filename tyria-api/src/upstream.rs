//! Guild Wars 2 REST client.
//!
//! The production [`UpstreamSource`]: one GET per request. Client errors are
//! decoded as JSON like successes, since the upstream answers id batches that
//! match nothing with HTTP 404 and a JSON body the resolvers need to see.
//! Server errors are transport failures whatever their body.

use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use tyria_core::{CoreResult, UpstreamError, UpstreamSource};

use crate::config::{normalize_base_url, ApiConfig};
use crate::error::{ApiError, ApiResult};
use crate::telemetry::{UpstreamOutcome, METRICS};

#[derive(Debug, Clone)]
pub struct Gw2Client {
    client: reqwest::Client,
    base_url: String,
}

impl Gw2Client {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("tyria-api/", env!("CARGO_PKG_VERSION")));

        if let Some(timeout) = config.upstream_timeout {
            builder = builder.timeout(timeout);
        }
        if config.upstream_accept_invalid_certs {
            tracing::warn!(
                base_url = %config.upstream_base_url,
                "TLS certificate verification disabled for upstream"
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| ApiError::internal_error(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: normalize_base_url(&config.upstream_base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of `endpoint`.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    async fn get_json(&self, endpoint: &str) -> Result<Value, (UpstreamOutcome, UpstreamError)> {
        let url = self.url(endpoint);
        tracing::debug!(url = %url, "Requesting upstream");

        let response = self.client.get(&url).send().await.map_err(|e| {
            (
                UpstreamOutcome::TransportError,
                UpstreamError::transport(endpoint, e),
            )
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            (
                UpstreamOutcome::TransportError,
                UpstreamError::transport(endpoint, e),
            )
        })?;

        if status.is_server_error() {
            tracing::warn!(endpoint, status = status.as_u16(), "Upstream server error");
            return Err((
                UpstreamOutcome::TransportError,
                UpstreamError::transport(
                    endpoint,
                    format!("HTTP {}: {}", status.as_u16(), body_excerpt(&body)),
                ),
            ));
        }
        if !status.is_success() {
            tracing::debug!(
                endpoint,
                status = status.as_u16(),
                "Upstream answered with non-success status"
            );
        }

        serde_json::from_slice(&body).map_err(|e| {
            (
                UpstreamOutcome::DecodeError,
                UpstreamError::decode(endpoint, format!("HTTP {}: {}", status.as_u16(), e)),
            )
        })
    }
}

const BODY_EXCERPT_CHARS: usize = 200;

fn body_excerpt(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .trim()
        .chars()
        .take(BODY_EXCERPT_CHARS)
        .collect()
}

/// Endpoint label for metrics: the path without its querystring.
fn metrics_endpoint(endpoint: &str) -> &str {
    endpoint.split('?').next().unwrap_or(endpoint)
}

#[async_trait]
impl UpstreamSource for Gw2Client {
    async fn request(&self, endpoint: &str) -> CoreResult<Value> {
        let start = Instant::now();
        let result = self.get_json(endpoint).await;

        let outcome = match &result {
            Ok(_) => UpstreamOutcome::Ok,
            Err((outcome, _)) => *outcome,
        };
        if let Ok(metrics) = METRICS.as_ref() {
            metrics.record_upstream_request(
                metrics_endpoint(endpoint),
                outcome,
                start.elapsed().as_secs_f64(),
            );
        }

        result.map_err(|(_, err)| err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiResult<Gw2Client> {
        Gw2Client::new(&ApiConfig {
            upstream_base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_url_joins_under_base() -> ApiResult<()> {
        let gw2 = client("https://api.guildwars2.com/v2")?;
        assert_eq!(gw2.base_url(), "https://api.guildwars2.com/v2/");
        assert_eq!(
            gw2.url("achievements?ids=1,2"),
            "https://api.guildwars2.com/v2/achievements?ids=1,2"
        );
        assert_eq!(
            gw2.url("/achievements/daily"),
            "https://api.guildwars2.com/v2/achievements/daily"
        );
        Ok(())
    }

    #[test]
    fn test_metrics_endpoint_drops_query() {
        assert_eq!(metrics_endpoint("achievements?ids=1,2,3"), "achievements");
        assert_eq!(metrics_endpoint("achievements/daily/tomorrow"), "achievements/daily/tomorrow");
    }

    #[test]
    fn test_body_excerpt_is_bounded() {
        assert_eq!(body_excerpt(b"  {\"text\":\"API not active\"}\n"), r#"{"text":"API not active"}"#);
        assert_eq!(body_excerpt(&[b'x'; 1000]).len(), BODY_EXCERPT_CHARS);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_transport_error() -> Result<(), String> {
        // Bind and release a port so nothing is listening on it.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .and_then(|listener| listener.local_addr())
            .map_err(|e| e.to_string())?
            .port();
        let gw2 = client(&format!("http://127.0.0.1:{}/v2/", port)).map_err(|e| e.to_string())?;
        let result = gw2.request("achievements").await;
        assert!(matches!(result, Err(UpstreamError::Transport { .. })));
        Ok(())
    }
}
