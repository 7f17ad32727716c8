//! Groq client for chat completions and speech.

mod chat;
mod speech;

use url::Url;

use crate::config::GroqClientConfig;
use crate::error::GroqResult;
use crate::http::{HttpBackend, ReqwestBackend, RetryPolicy, Transport};

// ============================================================================
// Type Aliases
// ============================================================================

/// Default Groq client using the reqwest HTTP backend.
pub type DefaultGroqClient = GroqClient<ReqwestBackend>;

// ============================================================================
// Endpoints
// ============================================================================

/// Endpoint URLs resolved once from the configured base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Endpoints {
    pub(crate) chat: Url,
    pub(crate) speech: Url,
    pub(crate) transcriptions: Url,
}

impl Endpoints {
    fn resolve(base_url: &str) -> GroqResult<Self> {
        let mut base = Url::parse(base_url)?;
        // Url::join drops the last segment unless the path ends with '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            chat: base.join("chat/completions")?,
            speech: base.join("audio/speech")?,
            transcriptions: base.join("audio/transcriptions")?,
        })
    }
}

// ============================================================================
// Client
// ============================================================================

/// Client for the Groq OpenAI-compatible API.
///
/// Generic over the HTTP backend for testing. Use [`DefaultGroqClient`] in
/// production and talk to it through the core port traits.
pub struct GroqClient<B: HttpBackend> {
    pub(crate) transport: Transport<B>,
    pub(crate) endpoints: Endpoints,
    pub(crate) config: GroqClientConfig,
}

impl DefaultGroqClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GroqClientConfig) -> GroqResult<Self> {
        let backend = ReqwestBackend::new(&config)?;
        Self::assemble(config, backend)
    }
}

impl<B: HttpBackend> GroqClient<B> {
    /// Create a new client with a custom backend.
    #[cfg(test)]
    pub(crate) fn with_backend(config: GroqClientConfig, backend: B) -> GroqResult<Self> {
        Self::assemble(config, backend)
    }

    fn assemble(config: GroqClientConfig, backend: B) -> GroqResult<Self> {
        let endpoints = Endpoints::resolve(&config.base_url)?;
        let transport = Transport::new(backend, RetryPolicy::from_config(&config));
        Ok(Self {
            transport,
            endpoints,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GroqError;
    use crate::http::testing::FakeBackend;

    #[test]
    fn test_default_client_creation() {
        let client = DefaultGroqClient::new(GroqClientConfig::new()).unwrap();
        assert_eq!(
            client.endpoints.chat.as_str(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn test_endpoints_resolve_without_trailing_slash() {
        let endpoints = Endpoints::resolve("http://127.0.0.1:8080/openai/v1").unwrap();
        assert_eq!(
            endpoints.speech.as_str(),
            "http://127.0.0.1:8080/openai/v1/audio/speech"
        );
        assert_eq!(
            endpoints.transcriptions.as_str(),
            "http://127.0.0.1:8080/openai/v1/audio/transcriptions"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = GroqClientConfig::new().with_base_url("not a url");
        let result = GroqClient::with_backend(config, FakeBackend::new());
        assert!(matches!(result, Err(GroqError::InvalidUrl(_))));
    }
}
