//! Command-line and environment configuration
//!
//! There is no config file. Everything comes from arguments, with
//! `TOCAR_*` environment variables as fallbacks for the server.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Play a local audio file, or serve an HTTP API that controls playback.
#[derive(Parser, Debug)]
#[command(name = "tocar", version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Audio file to play (blocks until the track ends)
    pub ficheiro: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP control API
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", env = "TOCAR_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "TOCAR_PORT")]
    pub port: u16,

    /// Directory listed by /api/musicas and used to resolve relative paths
    #[arg(short, long, env = "TOCAR_MUSIC_DIR")]
    pub music_dir: Option<PathBuf>,

    /// Directory with a static web frontend to serve
    #[arg(long, env = "TOCAR_PUBLIC_DIR")]
    pub public_dir: Option<PathBuf>,

    /// How often the end-of-track monitor polls the engine
    #[arg(long, default_value = "1000", env = "TOCAR_POLL_INTERVAL_MS")]
    pub poll_interval_ms: u64,
}

/// Resolved server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub music_dir: PathBuf,
    pub public_dir: Option<PathBuf>,
    pub poll_interval: Duration,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        ServerConfig {
            host: args.host,
            port: args.port,
            music_dir: args.music_dir.unwrap_or_else(default_music_dir),
            public_dir: args.public_dir,
            poll_interval: Duration::from_millis(args.poll_interval_ms.max(1)),
        }
    }
}

/// The OS music folder when there is one, else the working directory.
pub fn default_music_dir() -> PathBuf {
    dirs::audio_dir().unwrap_or_else(|| PathBuf::from("."))
}
