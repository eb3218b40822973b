//! API Configuration Module
//!
//! Configuration for the upstream client and CORS. Loaded from environment
//! variables with defaults that work against the public Guild Wars 2 API.

use std::time::Duration;

/// Public Guild Wars 2 API, version 2.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.guildwars2.com/v2/";

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// API configuration for the upstream client and CORS.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    // ========================================================================
    // Upstream Configuration
    // ========================================================================
    /// Base URL every upstream path is joined onto. Always ends with `/`.
    pub upstream_base_url: String,

    /// Per-request timeout. `None` waits indefinitely.
    pub upstream_timeout: Option<Duration>,

    /// Skip TLS certificate verification for the upstream.
    pub upstream_accept_invalid_certs: bool,

    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins.
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            upstream_timeout: None,
            upstream_accept_invalid_certs: false,
            cors_origins: Vec::new(),
            cors_max_age_secs: 86400,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `TYRIA_UPSTREAM_BASE_URL`: Upstream API base (default: public v2 API)
    /// - `TYRIA_UPSTREAM_TIMEOUT_SECS`: Per-request timeout (default: none)
    /// - `TYRIA_UPSTREAM_ACCEPT_INVALID_CERTS`: "true" or "false" (default: false)
    /// - `TYRIA_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `TYRIA_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    pub fn from_env() -> Self {
        let upstream_base_url = std::env::var("TYRIA_UPSTREAM_BASE_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(|s| normalize_base_url(&s))
            .unwrap_or_else(|| DEFAULT_UPSTREAM_BASE_URL.to_string());

        let upstream_timeout = std::env::var("TYRIA_UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let upstream_accept_invalid_certs = std::env::var("TYRIA_UPSTREAM_ACCEPT_INVALID_CERTS")
            .ok()
            .map(|s| s.to_lowercase() == "true" || s == "1")
            .unwrap_or(false);

        let cors_origins = std::env::var("TYRIA_CORS_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_max_age_secs = std::env::var("TYRIA_CORS_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86400);

        Self {
            upstream_base_url,
            upstream_timeout,
            upstream_accept_invalid_certs,
            cors_origins,
            cors_max_age_secs,
        }
    }

    /// Check if a given origin is allowed.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if self.cors_origins.is_empty() {
            return true;
        }

        self.cors_origins.iter().any(|allowed| {
            if allowed == origin {
                return true;
            }
            // Wildcard subdomains: *.example.com
            if let Some(pattern) = allowed.strip_prefix("*.") {
                if let Some(origin_domain) = origin.strip_prefix("https://") {
                    return origin_domain.ends_with(&format!(".{}", pattern))
                        || origin_domain == pattern;
                }
            }
            false
        })
    }
}

/// Ensure the base URL ends with exactly one `/` so relative paths join under it.
pub fn normalize_base_url(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}
