#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// DefaultGroqClient is used through the core port traits, not its generic
// internals.
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod port;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultGroqClient;

// Configuration
pub use config::{
    DEFAULT_BASE_URL, DEFAULT_STT_MODEL, DEFAULT_TTS_FORMAT, DEFAULT_TTS_MODEL, DEFAULT_TTS_VOICE,
    GroqClientConfig,
};

// Errors
pub use error::{GroqError, GroqResult};
