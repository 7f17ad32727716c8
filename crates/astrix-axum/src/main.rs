//! `astrix` server binary.

use std::path::PathBuf;

use astrix_axum::{ServerConfig, start_server};
use astrix_core::AstrixConfig;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Astrix astrology chat server.
#[derive(Debug, Parser)]
#[command(name = "astrix", version, about)]
struct Args {
    /// Interface to bind
    #[arg(long, env = "ASTRIX_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Directory holding index.html and the /static assets
    #[arg(long, env = "ASTRIX_STATIC_DIR", default_value = "static")]
    static_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before anything reads them
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let server = ServerConfig {
        host: args.host,
        port: args.port,
        static_dir: Some(args.static_dir),
    };
    start_server(server, AstrixConfig::from_env()).await
}
