//! `POST /api/stt` and `POST /api/tts`.

use astrix_core::{AudioResult, AudioUpload, CoreError};
use axum::Json;
use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ensure_configured, parse_json};
use crate::error::HttpError;
use crate::state::AppState;

const FILE_FIELD: &str = "file";
const FILE_HINT: &str = "Attach audio file under 'file'";

// ── Request / response shapes ────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct SynthesizeRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub transcript: String,
    pub confidence: Option<f64>,
    pub raw: Value,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// `POST /api/stt`
pub async fn speech_to_text(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscriptResponse>, HttpError> {
    ensure_configured(&state)?;
    let upload = read_upload(multipart)
        .await?
        .ok_or_else(|| HttpError::bad_request("Missing required field: file", FILE_HINT))?;

    let transcript = state
        .service
        .transcribe(&upload)
        .await
        .map_err(|err| match err {
            CoreError::Validation(_) => HttpError::Unprocessable {
                message: "Invalid file".to_string(),
                hint: "Provide a valid audio recording".to_string(),
            },
            CoreError::UpstreamUnavailable(_) => HttpError::unavailable("Speech service unavailable"),
            other => other.into(),
        })?;

    Ok(Json(TranscriptResponse {
        transcript: transcript.text,
        confidence: transcript.confidence,
        raw: transcript.raw,
    }))
}

/// `POST /api/tts`
pub async fn text_to_speech(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AudioResult>, HttpError> {
    ensure_configured(&state)?;
    let request: SynthesizeRequest = parse_json(&body)?;
    let text = request.text.unwrap_or_default();

    let audio = state
        .service
        .synthesize(&text)
        .await
        .map_err(|err| match err {
            CoreError::Validation(message) => {
                HttpError::bad_request(message, "Provide text to synthesize")
            }
            CoreError::UpstreamUnavailable(_) => HttpError::unavailable("Voice service unavailable"),
            other => other.into(),
        })?;
    Ok(Json(audio))
}

/// First multipart field named `file`, if any.
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Option<AudioUpload>, HttpError> {
    let Ok(mut multipart) = multipart else {
        return Ok(None);
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HttpError::bad_request(format!("Malformed upload: {e}"), FILE_HINT))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| HttpError::bad_request(format!("Malformed upload: {e}"), FILE_HINT))?;
        return Ok(Some(AudioUpload::new(filename, content_type, bytes.to_vec())));
    }

    Ok(None)
}
