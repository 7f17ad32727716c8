//! Fake ports and request helpers shared by the route tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use astrix_axum::{AxumContext, create_router};
use astrix_core::{
    AstrixConfig, AudioResult, AudioUpload, ChatModelPort, ModelInvocation, ModelRoute,
    PromptPayload, SpeechPort, Transcript, UpstreamError,
};
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::{Value, json};

pub const BOUNDARY: &str = "astrix-test-boundary";

// ── Fake chat model ───────────────────────────────────────────────────────────

pub struct FakeChat {
    outcome: Result<ModelInvocation, UpstreamError>,
    calls: AtomicUsize,
    last_payload: Mutex<Option<PromptPayload>>,
}

impl FakeChat {
    pub fn replying(content: &str) -> Self {
        Self::with_outcome(Ok(ModelInvocation::new(
            json!({"choices": [{"message": {"role": "assistant", "content": content}}]}),
            ModelRoute::Primary,
            "openai/gpt-oss-120b",
        )))
    }

    pub fn with_outcome(outcome: Result<ModelInvocation, UpstreamError>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_payload: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_payload(&self) -> Option<PromptPayload> {
        self.last_payload.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModelPort for FakeChat {
    async fn invoke(&self, payload: &PromptPayload) -> Result<ModelInvocation, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_payload.lock().unwrap() = Some(payload.clone());
        self.outcome.clone()
    }
}

// ── Fake speech ───────────────────────────────────────────────────────────────

pub struct FakeSpeech {
    synthesis: Result<AudioResult, UpstreamError>,
    transcription: Result<Transcript, UpstreamError>,
    synth_texts: Mutex<Vec<String>>,
    uploads: Mutex<Vec<AudioUpload>>,
}

impl Default for FakeSpeech {
    fn default() -> Self {
        Self {
            synthesis: Ok(sample_audio()),
            transcription: Ok(Transcript {
                text: "mera career kaisa rahega".to_string(),
                confidence: Some(0.87),
                raw: json!({"text": "mera career kaisa rahega", "segments": []}),
            }),
            synth_texts: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }
}

impl FakeSpeech {
    #[must_use]
    pub fn failing_synthesis(mut self, err: UpstreamError) -> Self {
        self.synthesis = Err(err);
        self
    }

    #[must_use]
    pub fn failing_transcription(mut self, err: UpstreamError) -> Self {
        self.transcription = Err(err);
        self
    }

    pub fn synth_texts(&self) -> Vec<String> {
        self.synth_texts.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<AudioUpload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechPort for FakeSpeech {
    async fn synthesize(&self, text: &str) -> Result<AudioResult, UpstreamError> {
        self.synth_texts.lock().unwrap().push(text.to_string());
        self.synthesis.clone()
    }

    async fn transcribe(&self, upload: &AudioUpload) -> Result<Transcript, UpstreamError> {
        self.uploads.lock().unwrap().push(upload.clone());
        self.transcription.clone()
    }
}

pub fn sample_audio() -> AudioResult {
    AudioResult {
        audio_base64: "UklGRiQAAABXQVZF".to_string(),
        format: "wav".to_string(),
        voice: "Cillian-PlayAI".to_string(),
    }
}

// ── App construction ──────────────────────────────────────────────────────────

pub fn configured() -> AstrixConfig {
    AstrixConfig::new().with_api_key("gsk_test")
}

pub fn app(
    config: AstrixConfig,
    chat: &Arc<FakeChat>,
    speech: &Arc<FakeSpeech>,
    static_dir: Option<&Path>,
) -> Router {
    let ctx = AxumContext::with_ports(config, chat.clone(), speech.clone());
    create_router(ctx, static_dir)
}

// ── Requests / responses ──────────────────────────────────────────────────────

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_raw(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

/// Multipart request with a single file part.
pub fn post_file(uri: &str, field: &str, filename: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn parse_json(response: Response) -> Value {
    let body = body_bytes(response).await;
    serde_json::from_slice(&body).unwrap_or_else(|e| panic!("Expected valid JSON body: {e}"))
}
