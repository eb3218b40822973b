//! Tracing Subscriber Initialization
//!
//! Installs a JSON `tracing-subscriber` filtered through `RUST_LOG`, with
//! service metadata logged once at startup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{ApiError, ApiResult};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "tyria_api=debug,tyria_core=debug,tower_http=debug,info";

/// Telemetry configuration from environment variables.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to the startup log
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (production, staging, development)
    pub environment: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: std::env::var("TYRIA_SERVICE_NAME")
                .unwrap_or_else(|_| "tyria-api".to_string()),
            service_version: std::env::var("TYRIA_SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            environment: std::env::var("TYRIA_ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }
}

/// Initialize the tracing subscriber.
///
/// Call once at startup, before anything logs.
pub fn init_tracer(config: &TelemetryConfig) -> ApiResult<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
        .map_err(|e| ApiError::internal_error(format!("Failed to init subscriber: {}", e)))?;

    tracing::info!(
        service_name = %config.service_name,
        service_version = %config.service_version,
        environment = %config.environment,
        "Telemetry initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EnvVarGuard {
        key: &'static str,
        original: Option<String>,
    }

    impl EnvVarGuard {
        fn set(key: &'static str, value: Option<&str>) -> Self {
            let original = std::env::var(key).ok();
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
            Self { key, original }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            match self.original.as_deref() {
                Some(v) => std::env::set_var(self.key, v),
                None => std::env::remove_var(self.key),
            }
        }
    }

    #[test]
    fn test_telemetry_config_from_env() {
        {
            let _name = EnvVarGuard::set("TYRIA_SERVICE_NAME", None);
            let _env = EnvVarGuard::set("TYRIA_ENVIRONMENT", None);
            let config = TelemetryConfig::default();
            assert_eq!(config.service_name, "tyria-api");
            assert_eq!(config.environment, "development");
        }

        let _name = EnvVarGuard::set("TYRIA_SERVICE_NAME", Some("tyria-edge"));
        let _env = EnvVarGuard::set("TYRIA_ENVIRONMENT", Some("production"));
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "tyria-edge");
        assert_eq!(config.environment, "production");
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }
}
