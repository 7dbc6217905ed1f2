//! API error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use nimbus_core::error::NimbusError;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    /// Bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Service unavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    /// Internal server error. `details` is a short category, never raw error text.
    pub fn internal(details: impl Into<String>) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Unexpected error")
        }
    }

    /// Quota exceeded.
    pub fn rate_limited() -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, "rate limit exceeded")
    }

    /// HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Message sent in the `error` field.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
            details: self.details,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<NimbusError> for ApiError {
    fn from(err: NimbusError) -> Self {
        match &err {
            NimbusError::ValidationError(_) | NimbusError::InvalidLocation { .. } => {
                tracing::warn!(error = %err, "Bad request");
                ApiError::bad_request(err.to_string())
            }
            NimbusError::UpstreamUnavailable(_) => {
                tracing::error!(error = %err, "Upstream service error");
                ApiError::service_unavailable("Upstream weather service is unavailable")
            }
            NimbusError::NotConfigured(_) => {
                tracing::error!(error = %err, "Upstream service error");
                ApiError::service_unavailable(err.to_string())
            }
            NimbusError::Unclassified(_) => {
                tracing::error!(error = %err, "Unexpected upstream error");
                ApiError::internal("upstream request failed")
            }
            NimbusError::CacheError(_) => {
                tracing::error!(error = %err, "Unexpected cache error");
                ApiError::internal("cache failure")
            }
            NimbusError::JsonError(_) => {
                tracing::error!(error = %err, "Unexpected serialization error");
                ApiError::internal("malformed data")
            }
            NimbusError::ConfigError(_) => {
                tracing::error!(error = %err, "Service misconfigured");
                ApiError::internal("service misconfigured")
            }
        }
    }
}
