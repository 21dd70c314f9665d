// ==========================================
// BLOCKING CLI PLAYBACK
// ==========================================
// `tocar <ficheiro>`: play one file and wait for it to end, printing a
// progress line on every monitor tick. Ctrl+C stops playback cleanly.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

use crate::config::{Cli, Command, ServerConfig};
use crate::error::PlayerError;
use crate::player::{spawn_monitor, MusicPlayer, DEFAULT_POLL_INTERVAL};

pub const USAGE: &str = "Uso: tocar <caminho_do_ficheiro>";

/// Route parsed arguments to the server or to blocking playback.
///
/// `open_player` is only called once the arguments are known to be usable,
/// so usage and missing-file errors never depend on an audio device.
pub async fn dispatch<F>(cli: Cli, open_player: F) -> anyhow::Result<ExitCode>
where
    F: FnOnce() -> anyhow::Result<Arc<MusicPlayer>>,
{
    match (cli.command, cli.ficheiro) {
        (Some(Command::Serve(args)), _) => {
            let config = ServerConfig::from(args);
            crate::api::run(config, open_player()?).await?;
            Ok(ExitCode::SUCCESS)
        }
        (None, Some(path)) => {
            if !path.is_file() {
                report_missing(&path);
                return Ok(ExitCode::FAILURE);
            }
            Ok(play_blocking(open_player()?, &path, DEFAULT_POLL_INTERVAL).await)
        }
        (None, None) => {
            eprintln!("{}", USAGE);
            Ok(ExitCode::FAILURE)
        }
    }
}

pub async fn play_blocking(
    player: Arc<MusicPlayer>,
    path: &Path,
    poll_interval: Duration,
) -> ExitCode {
    match player.play(path) {
        Ok(()) => {}
        Err(PlayerError::FileNotFound(_)) => {
            report_missing(path);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("Erro ao tocar {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    }

    println!("Reproduzindo música: {}", path.display());

    let monitor = spawn_monitor(player.clone(), poll_interval);
    let started = Instant::now();
    let mut ticker = tokio::time::interval(poll_interval);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let status = player.status();
                if !status.playing {
                    break;
                }
                if let Some(name) = status.current_file {
                    println!("A tocar: {} [{}]", name, format_elapsed(started.elapsed()));
                }
            }
            _ = &mut ctrl_c => {
                info!("Interrupted, stopping playback");
                player.stop();
                println!("Reprodução interrompida.");
                break;
            }
        }
    }

    monitor.abort();
    println!("Reprodução terminada.");
    ExitCode::SUCCESS
}

fn report_missing(path: &Path) {
    eprintln!("Erro: O ficheiro não existe: {}", path.display());
}

/// mm:ss
fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
