//! Domain types for a single chat, transcription, or synthesis request.
//!
//! Everything here is a request-scoped value: built, consumed, and dropped
//! within one inbound call.

pub mod audio;
pub mod chat;
pub mod prompt;
pub mod reply;

pub use audio::{AudioResult, AudioUpload, Transcript};
pub use chat::{AudioWarning, ChatReply, ChatRequest, MessageRole, ReplyMeta};
pub use prompt::{GenerationParams, PromptAssembler, PromptMessage, PromptPayload, ResponseFormat};
pub use reply::{ParsedReply, SHOW_CHART_COMMAND};

use serde_json::Value;

/// Whether an opaque JSON input carries anything worth forwarding.
///
/// `null`, `false`, zero, and empty strings, arrays, or objects all count as
/// absent.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_present() {
        assert!(!is_present(&Value::Null));
        assert!(!is_present(&json!({})));
        assert!(!is_present(&json!([])));
        assert!(!is_present(&json!("")));
        assert!(!is_present(&json!(0)));
        assert!(!is_present(&json!(false)));

        assert!(is_present(&json!({"summary": "talked about career"})));
        assert!(is_present(&json!([1])));
        assert!(is_present(&json!("Leo")));
        assert!(is_present(&json!(1.5)));
    }
}
