//! Chat request and reply shapes.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::audio::AudioResult;

/// Role of a message in the prompt sent upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Parse a role supplied in caller history.
    ///
    /// Callers may only replay `user` and `assistant` turns; anything else,
    /// including `system`, is rejected.
    pub fn from_history(role: &str) -> Option<Self> {
        match role {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

/// Inbound chat request.
///
/// Every field except `message` is optional on the wire and may be `null`.
/// `context`, `local_birth`, `chart_data` and `history` are kept as raw JSON:
/// they are produced elsewhere and only projected or filtered here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChatRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    pub context: Value,
    #[serde(alias = "localBirth")]
    pub local_birth: Value,
    #[serde(alias = "chartData")]
    pub chart_data: Value,
    #[serde(alias = "isVoice", deserialize_with = "null_as_default")]
    pub is_voice: bool,
    pub history: Value,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ChatRequest {
    /// Create a text-mode request with no context.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn with_local_birth(mut self, local_birth: Value) -> Self {
        self.local_birth = local_birth;
        self
    }

    #[must_use]
    pub fn with_chart_data(mut self, chart_data: Value) -> Self {
        self.chart_data = chart_data;
        self
    }

    #[must_use]
    pub const fn with_voice(mut self, is_voice: bool) -> Self {
        self.is_voice = is_voice;
        self
    }

    #[must_use]
    pub fn with_history(mut self, history: Vec<Value>) -> Self {
        self.history = Value::Array(history);
        self
    }

    /// Whether the message carries any text.
    pub fn has_message(&self) -> bool {
        !self.message.trim().is_empty()
    }

    /// First characters of the message, for log lines.
    pub fn message_preview(&self, max_chars: usize) -> String {
        self.message.chars().take(max_chars).collect()
    }

    /// Top-level keys of the conversation context, for log lines.
    pub fn context_keys(&self) -> Vec<&str> {
        self.context
            .as_object()
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Why a voice reply came back without audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioWarning {
    /// The speech service could not be reached or refused the request.
    TtsUnavailable,
    /// Synthesis failed for any other reason.
    TtsError,
}

/// Observability fields attached to every chat reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyMeta {
    /// Model that actually produced the reply.
    pub model: String,
    /// Whether the fallback model answered.
    pub fallback_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_warning: Option<AudioWarning>,
}

/// Final chat reply handed back to the adapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub meta: ReplyMeta,
    pub messages: Vec<String>,
    pub reaction: String,
    pub command: String,
    pub audio: Option<AudioResult>,
}
