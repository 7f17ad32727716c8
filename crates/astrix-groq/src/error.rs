//! Error types for Groq API operations.
//!
//! These errors stay inside `astrix-groq` except for client construction, and
//! are mapped to core `UpstreamError` at the port boundary.

use thiserror::Error;

/// Result type alias for Groq operations.
pub type GroqResult<T> = Result<T, GroqError>;

/// Errors related to Groq API operations.
#[derive(Debug, Error)]
pub enum GroqError {
    /// The request never produced an HTTP response (connect, timeout, reset).
    #[error("Network error: {0}")]
    Transport(String),

    /// Every attempt was rate limited.
    #[error("Rate limited on all {attempts} attempts: {url}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// The URL that was requested
        url: String,
    },

    /// The API answered with a status the caller does not accept.
    #[error("Groq API request failed with status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body, kept for diagnostics
        body: String,
    },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response from Groq API: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// The outgoing request could not be built.
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Every chat model route failed.
    #[error("All chat models failed: {}", summarize(.failures))]
    ModelsExhausted { failures: Vec<GroqError> },
}

impl GroqError {
    /// Whether retrying later could succeed.
    pub const fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_)
                | Self::RetriesExhausted { .. }
                | Self::UnexpectedStatus { .. }
                | Self::ModelsExhausted { .. }
        )
    }
}

fn summarize(failures: &[GroqError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
