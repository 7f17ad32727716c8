//! Axum-specific error types and mappings.
//!
//! Maps `CoreError` onto HTTP status codes and the
//! `{"error": {"message", "hint"}}` response body.

use astrix_core::CoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Bad request (invalid or missing input).
    #[error("Bad request: {message}")]
    BadRequest { message: String, hint: String },

    /// Well-formed request carrying unusable content.
    #[error("Unprocessable: {message}")]
    Unprocessable { message: String, hint: String },

    #[error("Endpoint not found")]
    NotFound,

    /// The upstream credential is not configured.
    #[error("Internal configuration error: {0}")]
    Misconfigured(String),

    /// Upstream inference service failed after retries.
    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    /// Internal server error.
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl HttpError {
    pub fn bad_request(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Misconfigured(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, hint) = match self {
            Self::BadRequest { message, hint } | Self::Unprocessable { message, hint } => {
                (message, Some(hint))
            }
            Self::NotFound => (
                "Endpoint not found".to_string(),
                Some("Check the route path".to_string()),
            ),
            Self::Misconfigured(detail) => {
                error!(target: "astrix.http", %detail, "Server misconfigured");
                (
                    "Internal configuration error".to_string(),
                    Some("Set GROQ_API_KEY".to_string()),
                )
            }
            Self::ServiceUnavailable { message } => {
                warn!(target: "astrix.http", %message, "Upstream unavailable");
                (message, Some("Try again later".to_string()))
            }
            Self::Internal { detail } => {
                error!(target: "astrix.http", %detail, "Request failed");
                let hint = (!detail.is_empty()).then_some(detail);
                ("Internal calculation failure".to_string(), hint)
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { message, hint },
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<CoreError> for HttpError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Configuration(msg) => Self::Misconfigured(msg),
            CoreError::Validation(msg) => Self::bad_request(msg, "Check the request fields"),
            CoreError::UpstreamUnavailable(_) => Self::unavailable("Upstream service unavailable"),
            CoreError::Internal(detail) => Self::Internal { detail },
        }
    }
}
