//! Chat model port.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::UpstreamError;
use crate::domain::PromptPayload;

/// One entry in the ordered list of models tried for a chat call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelRoute {
    Primary,
    Fallback,
}

impl ModelRoute {
    /// Routes in the order they are attempted.
    pub const ORDER: [Self; 2] = [Self::Primary, Self::Fallback];

    pub const fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback)
    }
}

/// Outcome of a successful chat call.
///
/// Records which route answered so callers never have to infer it.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInvocation {
    raw: Value,
    route: ModelRoute,
    model: String,
}

impl ModelInvocation {
    pub fn new(raw: Value, route: ModelRoute, model: impl Into<String>) -> Self {
        Self {
            raw,
            route,
            model: model.into(),
        }
    }

    /// Raw chat-completion body.
    pub const fn raw(&self) -> &Value {
        &self.raw
    }

    pub const fn route(&self) -> ModelRoute {
        self.route
    }

    /// Model identifier that produced the reply.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub const fn fallback_used(&self) -> bool {
        self.route.is_fallback()
    }
}

/// Sends an assembled prompt to a chat model.
///
/// Implementations own retries and primary→fallback failover; a returned
/// error means every route failed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatModelPort: Send + Sync {
    async fn invoke(&self, payload: &PromptPayload) -> Result<ModelInvocation, UpstreamError>;
}
