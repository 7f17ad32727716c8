//! Normalization of raw chat-completion output.
//!
//! Models are asked for a JSON object but do not always comply. Extraction
//! never fails: anything that is not a structured reply becomes a single
//! plain-text message.

use serde::Serialize;
use serde_json::Value;

/// UI command asking the client to render the user's chart.
pub const SHOW_CHART_COMMAND: &str = "SHOW_CHART";

/// Structured reply extracted from model output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedReply {
    pub messages: Vec<String>,
    /// Emoji reaction, possibly empty.
    pub reaction: String,
    /// UI command, possibly empty.
    pub command: String,
}

impl ParsedReply {
    /// Reply made of one unstructured message.
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            messages: vec![content.into()],
            ..Self::default()
        }
    }

    pub fn shows_chart(&self) -> bool {
        self.command == SHOW_CHART_COMMAND
    }
}

/// How the model content was interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyContent {
    /// No usable content at all.
    Empty,
    /// Content was a JSON object.
    Structured(ParsedReply),
    /// Content was not a JSON object and is used verbatim.
    PlainText(String),
}

impl ReplyContent {
    /// Classify the content string of the first completion choice.
    pub fn classify(content: &str) -> Self {
        let content = content.trim();
        if content.is_empty() {
            return Self::Empty;
        }

        match serde_json::from_str::<Value>(content) {
            Ok(Value::Object(object)) => Self::Structured(ParsedReply {
                messages: messages_field(object.get("messages")),
                reaction: string_field(object.get("reaction")),
                command: string_field(object.get("command")),
            }),
            _ => Self::PlainText(content.to_string()),
        }
    }

    pub fn into_reply(self) -> ParsedReply {
        match self {
            Self::Empty => ParsedReply::default(),
            Self::Structured(reply) => reply,
            Self::PlainText(text) => ParsedReply::plain(text),
        }
    }
}

/// Extract `{messages, reaction, command}` from a raw chat-completion body.
///
/// A body without choices yields an empty reply; callers decide what to show
/// in that case.
pub fn extract(raw: &Value) -> ParsedReply {
    let Some(content) = first_choice_content(raw) else {
        return ParsedReply::default();
    };

    let classified = ReplyContent::classify(content);
    if let ReplyContent::PlainText(_) = &classified {
        tracing::debug!(
            target: "astrix.reply",
            "Model content was not a JSON object; using it as a single message"
        );
    }
    classified.into_reply()
}

fn first_choice_content(raw: &Value) -> Option<&str> {
    raw.get("choices")?
        .as_array()?
        .first()?
        .get("message")?
        .get("content")?
        .as_str()
}

fn messages_field(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(single)) => vec![single.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn string_field(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
