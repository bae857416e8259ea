//! Soko API server.

mod config;
mod error;
mod routes;
mod state;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::state::AppState;

/// REST backend for the Soko marketplace directory.
#[derive(Debug, Parser)]
#[command(name = "soko-api", version, about)]
struct Args {
    /// Address to bind, e.g. 127.0.0.1:8080. Overrides the config file.
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter.clone())),
        )
        .init();

    let state = AppState::new();
    let app = routes::router(state);

    tracing::info!(bind = %config.bind, "starting soko-api");
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
