// ==========================================
// PLAYER ERRORS
// ==========================================
// Every failure the player can report. None of them are fatal once the
// engine is up: callers turn them into a `false` / `sucesso: false` answer.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayerError {
    /// The requested path does not point at an existing file
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The audio backend failed to open, decode or start the track
    #[error("playback engine failure: {0}")]
    Engine(String),
}

pub type Result<T> = std::result::Result<T, PlayerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_names_the_path() {
        let err = PlayerError::FileNotFound(PathBuf::from("/music/missing.mp3"));
        assert_eq!(err.to_string(), "file not found: /music/missing.mp3");
    }

    #[test]
    fn engine_failure_keeps_backend_message() {
        let err = PlayerError::Engine("no default output device".into());
        assert!(err.to_string().ends_with("no default output device"));
    }
}
