//! Text-to-speech and speech-to-text calls.

use astrix_core::{AudioResult, AudioUpload, Transcript};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::GroqClient;
use crate::error::{GroqError, GroqResult};
use crate::http::{HttpBackend, MultipartForm, ResponseBody, UpstreamRequest};

/// STT sampling temperature, sent as a form field.
const TRANSCRIPTION_TEMPERATURE: &str = "0";
/// Response format that carries segment detail alongside `text`.
const TRANSCRIPTION_FORMAT: &str = "verbose_json";

#[derive(Debug, Serialize)]
struct SpeechBody<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'a str,
}

impl<B: HttpBackend> GroqClient<B> {
    pub(crate) async fn synthesize_speech(&self, text: &str) -> GroqResult<AudioResult> {
        let body = serde_json::to_value(SpeechBody {
            model: &self.config.tts_model,
            voice: &self.config.tts_voice,
            input: text,
            response_format: &self.config.tts_format,
        })?;
        let request = UpstreamRequest::post(self.endpoints.speech.clone())
            .with_header("Accept", format!("audio/{}", self.config.tts_format))
            .json(body);

        let response = self.transport.send(&request).await?;
        if !response.is_success() {
            return Err(response.into_status_error());
        }

        debug!(target: "astrix.speech", bytes = response.bytes.len(), "Speech synthesized");
        Ok(AudioResult {
            audio_base64: STANDARD.encode(&response.bytes),
            format: self.config.tts_format.clone(),
            voice: self.config.tts_voice.clone(),
        })
    }

    pub(crate) async fn transcribe_audio(&self, upload: &AudioUpload) -> GroqResult<Transcript> {
        let form = MultipartForm::new()
            .file(
                "file",
                upload.filename.clone(),
                upload.content_type.clone(),
                Bytes::copy_from_slice(&upload.bytes),
            )
            .text("model", self.config.stt_model.clone())
            .text("temperature", TRANSCRIPTION_TEMPERATURE)
            .text("response_format", TRANSCRIPTION_FORMAT);
        let request = UpstreamRequest::post(self.endpoints.transcriptions.clone()).multipart(form);

        let response = self.transport.send(&request).await?;
        if !response.is_success() {
            return Err(response.into_status_error());
        }

        match response.body {
            ResponseBody::Json(raw @ Value::Object(_)) => Ok(Transcript {
                text: raw
                    .get("text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                confidence: raw.get("confidence").and_then(Value::as_f64),
                raw,
            }),
            _ => Err(GroqError::InvalidResponse {
                message: "transcription body is not a JSON object".to_string(),
            }),
        }
    }
}
