//! Public configuration for the Groq client.

use std::fmt;
use std::time::Duration;

use astrix_core::AstrixConfig;

/// OpenAI-compatible API root. Endpoint paths are joined onto it.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1/";
pub const DEFAULT_TTS_MODEL: &str = "playai-tts";
pub const DEFAULT_TTS_VOICE: &str = "Cillian-PlayAI";
pub const DEFAULT_TTS_FORMAT: &str = "wav";
pub const DEFAULT_STT_MODEL: &str = "whisper-large-v3";

/// Configuration for the Groq client.
///
/// # Example
///
/// ```
/// use astrix_groq::GroqClientConfig;
/// use std::time::Duration;
///
/// let config = GroqClientConfig::new()
///     .with_token("gsk_test")
///     .with_timeout(Duration::from_secs(10))
///     .with_max_attempts(5);
/// ```
#[derive(Clone)]
pub struct GroqClientConfig {
    pub(crate) base_url: String,
    pub(crate) user_agent: String,
    /// Applied to each attempt separately
    pub(crate) timeout: Duration,
    pub(crate) token: Option<String>,
    /// Total attempts per call, including the first
    pub(crate) max_attempts: u32,
    /// First 429 backoff; doubles on every further attempt
    pub(crate) rate_limit_base_delay: Duration,
    pub(crate) network_retry_delay: Duration,
    pub(crate) primary_model: String,
    pub(crate) fallback_model: String,
    pub(crate) tts_model: String,
    pub(crate) tts_voice: String,
    pub(crate) tts_format: String,
    pub(crate) stt_model: String,
}

impl Default for GroqClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("astrix-groq/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            token: None,
            max_attempts: 3,
            rate_limit_base_delay: Duration::from_secs(1),
            network_retry_delay: Duration::from_secs(1),
            primary_model: astrix_core::DEFAULT_PRIMARY_MODEL.to_string(),
            fallback_model: astrix_core::DEFAULT_FALLBACK_MODEL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            tts_voice: DEFAULT_TTS_VOICE.to_string(),
            tts_format: DEFAULT_TTS_FORMAT.to_string(),
            stt_model: DEFAULT_STT_MODEL.to_string(),
        }
    }
}

impl fmt::Debug for GroqClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqClientConfig")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("max_attempts", &self.max_attempts)
            .field("rate_limit_base_delay", &self.rate_limit_base_delay)
            .field("network_retry_delay", &self.network_retry_delay)
            .field("primary_model", &self.primary_model)
            .field("fallback_model", &self.fallback_model)
            .field("tts_model", &self.tts_model)
            .field("tts_voice", &self.tts_voice)
            .field("tts_format", &self.tts_format)
            .field("stt_model", &self.stt_model)
            .finish()
    }
}

impl From<&AstrixConfig> for GroqClientConfig {
    fn from(config: &AstrixConfig) -> Self {
        Self::new()
            .with_optional_token(config.api_key().map(str::to_string))
            .with_primary_model(config.primary_model())
            .with_fallback_model(config.fallback_model())
    }
}

impl GroqClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API root. Defaults to `https://api.groq.com/openai/v1/`.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the per-attempt timeout. Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the bearer credential sent with every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_optional_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Set the total number of attempts per call. Defaults to 3.
    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the first rate-limit backoff. Defaults to 1 second.
    #[must_use]
    pub const fn with_rate_limit_delay(mut self, delay: Duration) -> Self {
        self.rate_limit_base_delay = delay;
        self
    }

    /// Set the delay after a network failure. Defaults to 1 second.
    #[must_use]
    pub const fn with_network_retry_delay(mut self, delay: Duration) -> Self {
        self.network_retry_delay = delay;
        self
    }

    #[must_use]
    pub fn with_primary_model(mut self, model: impl Into<String>) -> Self {
        self.primary_model = model.into();
        self
    }

    #[must_use]
    pub fn with_fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = model.into();
        self
    }

    #[must_use]
    pub fn with_tts_model(mut self, model: impl Into<String>) -> Self {
        self.tts_model = model.into();
        self
    }

    #[must_use]
    pub fn with_tts_voice(mut self, voice: impl Into<String>) -> Self {
        self.tts_voice = voice.into();
        self
    }

    #[must_use]
    pub fn with_tts_format(mut self, format: impl Into<String>) -> Self {
        self.tts_format = format.into();
        self
    }

    #[must_use]
    pub fn with_stt_model(mut self, model: impl Into<String>) -> Self {
        self.stt_model = model.into();
        self
    }
}
