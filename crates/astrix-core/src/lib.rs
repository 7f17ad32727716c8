#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export commonly used types for convenience
pub use config::{
    AstrixConfig, DEFAULT_FALLBACK_MODEL, DEFAULT_MAX_HISTORY_MESSAGES, DEFAULT_PRIMARY_MODEL,
};
pub use domain::{
    AudioResult, AudioUpload, AudioWarning, ChatReply, ChatRequest, GenerationParams,
    MessageRole, ParsedReply, PromptAssembler, PromptMessage, PromptPayload, ReplyMeta,
    ResponseFormat, SHOW_CHART_COMMAND, Transcript,
};
pub use ports::{
    ChatModelPort, CoreError, CoreResult, ModelInvocation, ModelRoute, SpeechPort, UpstreamError,
};
pub use services::{AstrixService, EMPTY_REPLY_PLACEHOLDER};
