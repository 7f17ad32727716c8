//! Port definitions (trait abstractions) for upstream inference services.
//!
//! Ports define the interfaces that the core expects from infrastructure.
//! They contain no HTTP details and use only domain types.
//!
//! # Design Rules
//!
//! - No `reqwest` types in any signature
//! - Adapters map their internal errors onto [`UpstreamError`] at the boundary
//! - Retry and failover live behind the port, never in the service

pub mod chat_model;
pub mod speech;

use thiserror::Error;

pub use chat_model::{ChatModelPort, ModelInvocation, ModelRoute};
pub use speech::SpeechPort;

/// Errors reported by upstream port implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The service could not be reached, rate-limited us, or answered with a
    /// failure status. Retrying later may succeed.
    #[error("Upstream unavailable: {message}")]
    Unavailable { message: String },

    /// The call could not be made or its answer could not be understood.
    #[error("Upstream integration failure: {message}")]
    Internal { message: String },
}

impl UpstreamError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Core error type for semantic domain errors.
///
/// Adapters map this to their own error types (HTTP status codes, CLI exit
/// codes).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Required process configuration is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation error (invalid input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upstream inference service failed after retries and failover.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Internal error (unexpected condition).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

impl From<UpstreamError> for CoreError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Unavailable { message } => Self::UpstreamUnavailable(message),
            UpstreamError::Internal { message } => Self::Internal(message),
        }
    }
}
