//! Error handling module
//!
//! Defines error types and handling logic used in the project

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// The caller did not send an API key
    #[error("Missing x-api-key header")]
    MissingApiKey,

    /// Request validation failed
    #[error("Request validation failed: {0}")]
    Validation(String),

    /// Inbound body rejected by the JSON extractor
    #[error("Invalid request body: {message}")]
    InvalidBody { status: StatusCode, message: String },

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Known path, unsupported method
    #[error("Method {method} not allowed on {path}")]
    MethodNotAllowed { method: String, path: String },

    /// Outbound call exceeded its bound
    #[error("Anthropic API timeout - request took too long")]
    UpstreamTimeout { after: Duration },

    /// Outbound call could not be sent
    #[error("Anthropic API request failed: {0}")]
    UpstreamUnreachable(String),

    /// Upstream answered but its body could not be read
    #[error("Failed to read upstream response")]
    UpstreamUnreadable(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
///
/// Every error response renders as `{"error": "...", "type": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable message
    pub error: String,
    /// Error kind
    #[serde(rename = "type")]
    pub error_type: String,
}

impl AppError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingApiKey | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidBody { status, .. } => *status,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::UpstreamUnreachable(_)
            | AppError::UpstreamUnreadable(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::MissingApiKey => "authentication_error",
            AppError::Validation(_) => "invalid_request_error",
            AppError::InvalidBody { status, .. } if *status == StatusCode::PAYLOAD_TOO_LARGE => {
                "request_too_large"
            }
            AppError::InvalidBody { .. } => "invalid_request_error",
            AppError::NotFound(_) => "not_found_error",
            AppError::MethodNotAllowed { .. } => "invalid_request_error",
            AppError::UpstreamTimeout { .. } => "timeout_error",
            AppError::UpstreamUnreachable(_)
            | AppError::UpstreamUnreadable(_)
            | AppError::Internal(_) => "api_error",
        }
    }

    /// Whether the failure is on our side or upstream rather than the caller's
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Build the JSON body
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            error_type: self.error_type().to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Implement IntoResponse trait to allow errors to be returned directly as HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::UpstreamUnreadable(detail) => {
                tracing::error!("Application error: {} ({}) - Status code: {}", self, detail, status);
            }
            AppError::UpstreamTimeout { after } => {
                tracing::error!("Application error: {} after {:?} - Status code: {}", self, after, status);
            }
            _ if self.is_server_error() => {
                tracing::error!("Application error: {} - Status code: {}", self, status);
            }
            _ => {
                tracing::warn!("Client error: {} - Status code: {}", self, status);
            }
        }

        (status, Json(self.to_error_response())).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;
