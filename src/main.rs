// Main entry point for tocar
// `tocar <ficheiro>` plays one file; `tocar serve` runs the HTTP API.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tocar::config::Cli;
use tocar::player::{MusicPlayer, RodioEngine};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tocar=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    tocar::cli::dispatch(cli, open_player).await
}

fn open_player() -> Result<Arc<MusicPlayer>> {
    let engine = RodioEngine::new().context("Failed to initialize audio engine")?;
    Ok(Arc::new(MusicPlayer::new(Arc::new(engine))))
}
