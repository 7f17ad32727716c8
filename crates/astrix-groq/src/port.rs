//! Port trait implementations for `GroqClient`.
//!
//! Maps internal `GroqError`s onto the core-owned `UpstreamError`.

use astrix_core::{
    AudioResult, AudioUpload, ChatModelPort, ModelInvocation, PromptPayload, SpeechPort,
    Transcript, UpstreamError,
};
use async_trait::async_trait;

use crate::client::GroqClient;
use crate::error::GroqError;
use crate::http::HttpBackend;

// ============================================================================
// Error Mapping
// ============================================================================

fn map_error(err: GroqError) -> UpstreamError {
    if err.is_unavailable() {
        UpstreamError::unavailable(err.to_string())
    } else {
        UpstreamError::internal(err.to_string())
    }
}

// ============================================================================
// Port Implementations
// ============================================================================

#[async_trait]
impl<B: HttpBackend> ChatModelPort for GroqClient<B> {
    async fn invoke(&self, payload: &PromptPayload) -> Result<ModelInvocation, UpstreamError> {
        self.complete_chat(payload).await.map_err(map_error)
    }
}

#[async_trait]
impl<B: HttpBackend> SpeechPort for GroqClient<B> {
    async fn synthesize(&self, text: &str) -> Result<AudioResult, UpstreamError> {
        self.synthesize_speech(text).await.map_err(map_error)
    }

    async fn transcribe(&self, upload: &AudioUpload) -> Result<Transcript, UpstreamError> {
        self.transcribe_audio(upload).await.map_err(map_error)
    }
}
