//! Speech-related value types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Synthesized speech, base64-encoded for embedding in a JSON reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioResult {
    pub audio_base64: String,
    pub format: String,
    pub voice: String,
}

/// A recorded audio file to transcribe.
///
/// The bytes are owned, so every upload attempt sends the recording from its
/// first byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl AudioUpload {
    /// Content type used when the client did not declare one.
    pub const DEFAULT_CONTENT_TYPE: &'static str = "application/octet-stream";

    pub fn new(
        filename: impl Into<String>,
        content_type: Option<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type
                .filter(|ct| !ct.is_empty())
                .unwrap_or_else(|| Self::DEFAULT_CONTENT_TYPE.to_string()),
            bytes: bytes.into(),
        }
    }
}

/// Result of a transcription call.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub confidence: Option<f64>,
    /// Full upstream response, kept for callers that want segment detail.
    pub raw: Value,
}
