//! Error Types for the Tyria API
//!
//! This module defines error handling for the API layer, including:
//! - ApiError struct for structured error responses
//! - ErrorCode enum for categorizing errors
//! - IntoResponse implementation for Axum HTTP responses
//! - Conversion into GraphQL errors carrying the code as an extension
//!
//! All errors are serialized as JSON with appropriate HTTP status codes.

use async_graphql::ErrorExtensions;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tyria_core::UpstreamError;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
///
/// Each error code maps to a specific HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Request contains invalid input data
    InvalidInput,

    /// Field value is out of valid range
    InvalidRange,

    // ========================================================================
    // Upstream Errors (502)
    // ========================================================================
    /// The upstream API could not be reached or did not answer
    UpstreamUnavailable,

    /// The upstream API answered with a body that could not be decoded
    UpstreamInvalidResponse,

    // ========================================================================
    // Server Errors (500)
    // ========================================================================
    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidInput | ErrorCode::InvalidRange => StatusCode::BAD_REQUEST,

            ErrorCode::UpstreamUnavailable | ErrorCode::UpstreamInvalidResponse => {
                StatusCode::BAD_GATEWAY
            }

            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::InvalidRange => "Value is out of valid range",
            ErrorCode::UpstreamUnavailable => "Upstream API unavailable",
            ErrorCode::UpstreamInvalidResponse => "Upstream API returned an invalid response",
            ErrorCode::InternalError => "Internal server error",
        }
    }

    /// Wire name of the code, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::InvalidRange => "INVALID_RANGE",
            ErrorCode::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            ErrorCode::UpstreamInvalidResponse => "UPSTREAM_INVALID_RESPONSE",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response for API operations.
///
/// Returned as JSON by the plain HTTP endpoints, and as the `code` extension
/// of GraphQL errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    /// Add additional details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Create an InvalidRange error.
    pub fn invalid_range(field: &str, min: impl fmt::Display, max: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidRange,
            format!("Field '{}' must be between {} and {}", field, min, max),
        )
    }

    /// Create an UpstreamUnavailable error.
    pub fn upstream_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamUnavailable, message)
    }

    /// Create an UpstreamInvalidResponse error.
    pub fn upstream_invalid_response(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamInvalidResponse, message)
    }

    /// Create an InternalError.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self);
        (status, body).into_response()
    }
}

// ============================================================================
// GRAPHQL INTEGRATION
// ============================================================================

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.message.clone()).extend_with(|_, ext| {
            ext.set("code", self.code.as_str());
            if let Some(details) = self
                .details
                .clone()
                .and_then(|d| async_graphql::Value::from_json(d).ok())
            {
                ext.set("details", details);
            }
        })
    }
}

// ============================================================================
// CONVERSIONS FROM CORE ERRORS
// ============================================================================

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        tracing::error!(error = %err, endpoint = err.endpoint(), "Upstream request failed");

        let details = serde_json::json!({ "endpoint": err.endpoint() });
        match err {
            UpstreamError::Transport { .. } => {
                ApiError::upstream_unavailable(err.to_string()).with_details(details)
            }
            UpstreamError::Decode { .. } => {
                ApiError::upstream_invalid_response(err.to_string()).with_details(details)
            }
        }
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
