//! The facade adapters call into.
//!
//! `AstrixService` exposes the three downstream operations. Each one checks
//! configuration and input before touching any port, then runs its steps
//! strictly in sequence.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::config::AstrixConfig;
use crate::domain::reply;
use crate::domain::{
    AudioResult, AudioUpload, AudioWarning, ChatReply, ChatRequest, PromptAssembler, ReplyMeta,
    Transcript,
};
use crate::ports::{ChatModelPort, CoreError, CoreResult, SpeechPort, UpstreamError};

/// Substituted when the model answered without any message.
pub const EMPTY_REPLY_PLACEHOLDER: &str = "The stars are silent right now. Try again?";

const LOG_PREVIEW_CHARS: usize = 50;

/// Chat, transcription and synthesis over injected upstream ports.
pub struct AstrixService {
    config: Arc<AstrixConfig>,
    assembler: PromptAssembler,
    chat_model: Arc<dyn ChatModelPort>,
    speech: Arc<dyn SpeechPort>,
}

impl AstrixService {
    pub fn new(
        config: Arc<AstrixConfig>,
        chat_model: Arc<dyn ChatModelPort>,
        speech: Arc<dyn SpeechPort>,
    ) -> Self {
        let assembler = PromptAssembler::from_config(&config);
        Self {
            config,
            assembler,
            chat_model,
            speech,
        }
    }

    pub fn config(&self) -> &AstrixConfig {
        &self.config
    }

    /// Answer a chat message using today's local date.
    pub async fn chat(&self, request: &ChatRequest) -> CoreResult<ChatReply> {
        self.chat_on(request, Local::now().date_naive()).await
    }

    /// Answer a chat message as of `today`.
    ///
    /// In voice mode the reply is also synthesized. A synthesis failure does
    /// not fail the chat: the reply comes back without audio and with an
    /// `audio_warning`.
    pub async fn chat_on(&self, request: &ChatRequest, today: NaiveDate) -> CoreResult<ChatReply> {
        self.config.require_api_key()?;
        if !request.has_message() {
            return Err(CoreError::Validation(
                "Missing required field: message".to_string(),
            ));
        }

        info!(
            target: "astrix.chat",
            preview = %request.message_preview(LOG_PREVIEW_CHARS),
            context_keys = ?request.context_keys(),
            is_voice = request.is_voice,
            "Chat request"
        );

        let payload = self.assembler.build(request, today);
        let invocation = self.chat_model.invoke(&payload).await?;
        let mut parsed = reply::extract(invocation.raw());

        if parsed.messages.is_empty() {
            parsed.messages.push(EMPTY_REPLY_PLACEHOLDER.to_string());
        }

        let (audio, audio_warning) = if request.is_voice {
            self.speak(&parsed.messages).await
        } else {
            (None, None)
        };

        Ok(ChatReply {
            meta: ReplyMeta {
                model: invocation.model().to_string(),
                fallback_used: invocation.fallback_used(),
                audio_warning,
            },
            messages: parsed.messages,
            reaction: parsed.reaction,
            command: parsed.command,
            audio,
        })
    }

    /// Transcribe a recorded audio file.
    pub async fn transcribe(&self, upload: &AudioUpload) -> CoreResult<Transcript> {
        self.config.require_api_key()?;
        if upload.filename.trim().is_empty() {
            return Err(CoreError::Validation(
                "Invalid file: provide a named audio recording".to_string(),
            ));
        }

        info!(
            target: "astrix.speech",
            filename = %upload.filename,
            content_type = %upload.content_type,
            size = upload.bytes.len(),
            "Transcription request"
        );
        Ok(self.speech.transcribe(upload).await?)
    }

    /// Synthesize speech for `text`.
    pub async fn synthesize(&self, text: &str) -> CoreResult<AudioResult> {
        self.config.require_api_key()?;
        if text.trim().is_empty() {
            return Err(CoreError::Validation(
                "Missing required field: text".to_string(),
            ));
        }

        Ok(self.speech.synthesize(text).await?)
    }

    async fn speak(&self, messages: &[String]) -> (Option<AudioResult>, Option<AudioWarning>) {
        let text = messages.join(" ");
        match self.speech.synthesize(&text).await {
            Ok(audio) => (Some(audio), None),
            Err(err) => {
                let warning = match err {
                    UpstreamError::Unavailable { .. } => AudioWarning::TtsUnavailable,
                    UpstreamError::Internal { .. } => AudioWarning::TtsError,
                };
                warn!(target: "astrix.speech", error = %err, ?warning, "Voice reply synthesis failed");
                (None, Some(warning))
            }
        }
    }
}
