//! Error types for upstream access

use std::fmt;
use thiserror::Error;

/// Upstream source errors.
///
/// None of these are recovered from locally: a failure anywhere in a
/// resolution fails the whole resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("Request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("Invalid response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
}

impl UpstreamError {
    pub fn transport(endpoint: &str, reason: impl fmt::Display) -> Self {
        Self::Transport {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn decode(endpoint: &str, reason: impl fmt::Display) -> Self {
        Self::Decode {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }

    /// The endpoint the failing request was issued against.
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Transport { endpoint, .. } | Self::Decode { endpoint, .. } => endpoint,
        }
    }
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, UpstreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UpstreamError::transport("achievements", "connection refused");
        assert_eq!(
            err.to_string(),
            "Request to achievements failed: connection refused"
        );

        let err = UpstreamError::decode("masteries?ids=1", "expected value at line 1");
        assert!(err.to_string().contains("masteries?ids=1"));
        assert!(err.to_string().contains("expected value"));
    }

    #[test]
    fn test_endpoint_accessor() {
        let err = UpstreamError::transport("achievements/daily", "timed out");
        assert_eq!(err.endpoint(), "achievements/daily");
        let err = UpstreamError::decode("masteries?ids=1", "EOF");
        assert_eq!(err.endpoint(), "masteries?ids=1");
    }
}
