//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the Axum web adapter. The Groq client is instantiated here and
//! injected into the core service as its chat and speech ports.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use astrix_core::{AstrixConfig, AstrixService, ChatModelPort, SpeechPort};
use astrix_groq::{DefaultGroqClient, GroqClientConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port for the HTTP server.
    pub port: u16,
    /// Optional path to static assets (`index.html` and `/static/*`).
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// Set the static directory for UI serving.
    #[must_use]
    pub fn with_static_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(path.into());
        self
    }

    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// The core application facade.
    pub service: Arc<AstrixService>,
}

impl AxumContext {
    /// Build a context over explicit port implementations.
    pub fn with_ports(
        config: AstrixConfig,
        chat_model: Arc<dyn ChatModelPort>,
        speech: Arc<dyn SpeechPort>,
    ) -> Self {
        Self {
            service: Arc::new(AstrixService::new(Arc::new(config), chat_model, speech)),
        }
    }
}

/// Wire the core service to the Groq client.
///
/// A missing credential is not fatal here: the server still starts and every
/// API call answers with a configuration error.
pub fn bootstrap(config: AstrixConfig) -> Result<AxumContext> {
    if config.api_key().is_none() {
        warn!(
            target: "astrix.bootstrap",
            "GROQ_API_KEY is not set; API routes will answer with a configuration error"
        );
    }

    info!(
        target: "astrix.bootstrap",
        primary_model = config.primary_model(),
        fallback_model = config.fallback_model(),
        max_history = config.max_history_messages(),
        "Axum bootstrap resolved models"
    );

    let client = Arc::new(
        DefaultGroqClient::new(GroqClientConfig::from(&config))
            .context("failed to create Groq client")?,
    );
    let chat_model: Arc<dyn ChatModelPort> = client.clone();
    let speech: Arc<dyn SpeechPort> = client;

    Ok(AxumContext::with_ports(config, chat_model, speech))
}

/// Start the web server.
///
/// Static assets are served only when `server.static_dir` points at an
/// existing directory.
pub async fn start_server(server: ServerConfig, config: AstrixConfig) -> Result<()> {
    let ctx = bootstrap(config)?;

    let static_dir = match server.static_dir {
        Some(dir) if dir.is_dir() => {
            info!("Serving static assets from: {}", dir.display());
            Some(dir)
        }
        Some(dir) => {
            warn!("Static directory {} not found; serving API only", dir.display());
            None
        }
        None => None,
    };
    let app = crate::routes::create_router(ctx, static_dir.as_deref());

    let addr: SocketAddr = format!("{}:{}", server.host, server.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", server.host, server.port))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Astrix server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert!(config.static_dir.is_none());

        let config = config.with_port(8080).with_static_dir("ui");
        assert_eq!(config.port, 8080);
        assert_eq!(config.static_dir, Some(PathBuf::from("ui")));
    }

    #[test]
    fn test_bootstrap_without_credential() {
        let ctx = bootstrap(AstrixConfig::new()).unwrap();
        assert!(ctx.service.config().api_key().is_none());
    }
}
