//! Process-wide configuration.
//!
//! `AstrixConfig` is read once at startup and passed to every component that
//! needs it. Nothing in the pipeline looks up environment variables on its own.

use std::fmt;

use crate::ports::{CoreError, CoreResult};

/// Primary chat model used when `GROQ_PRIMARY_MODEL` is not set.
pub const DEFAULT_PRIMARY_MODEL: &str = "openai/gpt-oss-120b";

/// Fallback chat model used when `GROQ_FALLBACK_MODEL` is not set.
pub const DEFAULT_FALLBACK_MODEL: &str = "llama-3.3-70b-versatile";

/// Number of prior conversation turns forwarded to the model.
pub const DEFAULT_MAX_HISTORY_MESSAGES: usize = 20;

/// Environment variable holding the upstream API credential.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";
/// Environment variable overriding the primary model.
pub const PRIMARY_MODEL_ENV: &str = "GROQ_PRIMARY_MODEL";
/// Environment variable overriding the fallback model.
pub const FALLBACK_MODEL_ENV: &str = "GROQ_FALLBACK_MODEL";
/// Environment variable overriding the history window.
pub const MAX_HISTORY_ENV: &str = "ASTRIX_MAX_HISTORY";

/// Immutable configuration shared by all request handlers.
///
/// # Example
///
/// ```
/// use astrix_core::AstrixConfig;
///
/// let config = AstrixConfig::new()
///     .with_api_key("gsk_test")
///     .with_fallback_model("llama-3.1-8b-instant");
/// assert_eq!(config.fallback_model(), "llama-3.1-8b-instant");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AstrixConfig {
    pub(crate) api_key: Option<String>,
    pub(crate) primary_model: String,
    pub(crate) fallback_model: String,
    pub(crate) max_history_messages: usize,
}

impl Default for AstrixConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            primary_model: DEFAULT_PRIMARY_MODEL.to_string(),
            fallback_model: DEFAULT_FALLBACK_MODEL.to_string(),
            max_history_messages: DEFAULT_MAX_HISTORY_MESSAGES,
        }
    }
}

// The credential never ends up in logs.
impl fmt::Debug for AstrixConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AstrixConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("primary_model", &self.primary_model)
            .field("fallback_model", &self.fallback_model)
            .field("max_history_messages", &self.max_history_messages)
            .finish()
    }
}

impl AstrixConfig {
    /// Create a configuration with default models and no credential.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the configuration from process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default().with_optional_api_key(read(API_KEY_ENV));
        if let Some(model) = read(PRIMARY_MODEL_ENV) {
            config.primary_model = model;
        }
        if let Some(model) = read(FALLBACK_MODEL_ENV) {
            config.fallback_model = model;
        }
        if let Some(raw) = read(MAX_HISTORY_ENV) {
            match raw.parse::<usize>() {
                Ok(limit) => config.max_history_messages = limit,
                Err(e) => tracing::warn!(
                    target: "astrix.config",
                    value = %raw,
                    error = %e,
                    "Ignoring invalid {MAX_HISTORY_ENV}"
                ),
            }
        }
        config
    }

    /// Set the upstream API credential.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set an optional upstream API credential.
    #[must_use]
    pub fn with_optional_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    /// Set the primary chat model.
    #[must_use]
    pub fn with_primary_model(mut self, model: impl Into<String>) -> Self {
        self.primary_model = model.into();
        self
    }

    /// Set the fallback chat model.
    #[must_use]
    pub fn with_fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = model.into();
        self
    }

    /// Set how many prior turns are forwarded to the model (0 drops history).
    #[must_use]
    pub const fn with_max_history_messages(mut self, limit: usize) -> Self {
        self.max_history_messages = limit;
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Return the credential or a configuration error.
    pub fn require_api_key(&self) -> CoreResult<&str> {
        self.api_key().ok_or_else(|| {
            CoreError::Configuration(format!("{API_KEY_ENV} is not set"))
        })
    }

    pub fn primary_model(&self) -> &str {
        &self.primary_model
    }

    pub fn fallback_model(&self) -> &str {
        &self.fallback_model
    }

    pub const fn max_history_messages(&self) -> usize {
        self.max_history_messages
    }
}
