//! Speech port: synthesis and transcription.

use async_trait::async_trait;

use super::UpstreamError;
use crate::domain::{AudioResult, AudioUpload, Transcript};

/// Text-to-speech and speech-to-text against an upstream service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechPort: Send + Sync {
    /// Synthesize `text` into encoded audio.
    async fn synthesize(&self, text: &str) -> Result<AudioResult, UpstreamError>;

    /// Transcribe a recorded audio file.
    async fn transcribe(&self, upload: &AudioUpload) -> Result<Transcript, UpstreamError>;
}
