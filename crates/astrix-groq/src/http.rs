//! HTTP backend abstraction and the retrying transport.
//!
//! `HttpBackend` performs exactly one attempt. `Transport` wraps a backend and
//! owns the retry policy, so tests can script backend outcomes and observe
//! the retry timing without a network.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use serde_json::Value;
use tracing::warn;
use url::Url;

use crate::config::GroqClientConfig;
use crate::error::{GroqError, GroqResult};

const RATE_LIMITED: u16 = 429;
const BODY_SNIPPET_CHARS: usize = 500;

// ============================================================================
// Request / Response
// ============================================================================

/// One part of a multipart form. File parts own their bytes so the form can
/// be rebuilt for every attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        filename: String,
        content_type: String,
        bytes: Bytes,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    pub parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Bytes,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        });
        self
    }

    /// Value of the first text part called `name`.
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            FormPart::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    fn to_reqwest(&self) -> GroqResult<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for part in &self.parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
                FormPart::File {
                    name,
                    filename,
                    content_type,
                    bytes,
                } => {
                    let file = reqwest::multipart::Part::bytes(bytes.to_vec())
                        .file_name(filename.clone())
                        .mime_str(content_type)
                        .map_err(|e| GroqError::InvalidRequest {
                            message: format!("invalid content type '{content_type}': {e}"),
                        })?;
                    form.part(name.clone(), file)
                }
            };
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(MultipartForm),
}

/// A request to the upstream API, independent of any HTTP client library.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl UpstreamRequest {
    pub const fn post(url: Url) -> Self {
        Self {
            method: Method::POST,
            url,
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    #[must_use]
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

/// Upstream answer: status, body parsed as JSON when possible, raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: ResponseBody,
    pub bytes: Bytes,
}

impl UpstreamResponse {
    pub fn from_bytes(status: u16, bytes: Bytes) -> Self {
        let body = serde_json::from_slice::<Value>(&bytes).map_or_else(
            |_| ResponseBody::Text(String::from_utf8_lossy(&bytes).into_owned()),
            ResponseBody::Json,
        );
        Self {
            status,
            body,
            bytes,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body rendered for error messages, truncated.
    pub fn snippet(&self) -> String {
        let text = match &self.body {
            ResponseBody::Json(value) => value.to_string(),
            ResponseBody::Text(text) => text.clone(),
        };
        text.chars().take(BODY_SNIPPET_CHARS).collect()
    }

    pub(crate) fn into_status_error(self) -> GroqError {
        GroqError::UnexpectedStatus {
            status: self.status,
            body: self.snippet(),
        }
    }
}

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Performs a single HTTP attempt.
///
/// Network-level failures are reported as [`GroqError::Transport`]; any HTTP
/// response, whatever its status, is `Ok`.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    async fn execute(&self, request: &UpstreamRequest) -> GroqResult<UpstreamResponse>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production backend using reqwest. Injects the bearer credential.
pub struct ReqwestBackend {
    client: reqwest::Client,
    token: Option<String>,
}

impl ReqwestBackend {
    pub fn new(config: &GroqClientConfig) -> GroqResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GroqError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            token: config.token.clone(),
        })
    }

    fn build_request(&self, request: &UpstreamRequest) -> GroqResult<reqwest::RequestBuilder> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.as_str());
        if let Some(ref token) = self.token {
            builder = builder.bearer_auth(token);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Multipart(form) => builder.multipart(form.to_reqwest()?),
        };
        Ok(builder)
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn execute(&self, request: &UpstreamRequest) -> GroqResult<UpstreamResponse> {
        let response = self
            .build_request(request)?
            .send()
            .await
            .map_err(|e| GroqError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GroqError::Transport(e.to_string()))?;
        Ok(UpstreamResponse::from_bytes(status, bytes))
    }
}

// ============================================================================
// Retry Policy / Transport
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub rate_limit_base_delay: Duration,
    pub network_retry_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &GroqClientConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            rate_limit_base_delay: config.rate_limit_base_delay,
            network_retry_delay: config.network_retry_delay,
        }
    }

    /// Backoff after the `attempt`-th (1-based) rate-limited response.
    pub fn rate_limit_delay(&self, attempt: u32) -> Duration {
        self.rate_limit_base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Sends requests through a backend, retrying rate limits and network
/// failures.
pub struct Transport<B: HttpBackend> {
    backend: B,
    policy: RetryPolicy,
}

impl<B: HttpBackend> Transport<B> {
    pub const fn new(backend: B, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Send `request`, returning the first response that is not a 429.
    ///
    /// No sleep follows the final attempt.
    pub async fn send(&self, request: &UpstreamRequest) -> GroqResult<UpstreamResponse> {
        let attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=attempts {
            let is_last = attempt == attempts;
            match self.backend.execute(request).await {
                Ok(response) if response.status == RATE_LIMITED => {
                    if is_last {
                        break;
                    }
                    let delay = self.policy.rate_limit_delay(attempt);
                    warn!(
                        target: "astrix.transport",
                        url = %request.url,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Rate limited, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Ok(response) => return Ok(response),
                Err(GroqError::Transport(message)) => {
                    if is_last {
                        return Err(GroqError::Transport(message));
                    }
                    warn!(
                        target: "astrix.transport",
                        url = %request.url,
                        attempt,
                        error = %message,
                        "Network error, retrying"
                    );
                    tokio::time::sleep(self.policy.network_retry_delay).await;
                }
                Err(err) => return Err(err),
            }
        }

        Err(GroqError::RetriesExhausted {
            attempts,
            url: request.url.to_string(),
        })
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
