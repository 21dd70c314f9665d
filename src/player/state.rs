// ==========================================
// PLAYER STATE
// ==========================================
// The single-track state machine. Two meaningful states:
// - idle:   is_playing = false, nothing loaded
// - active: is_playing = true, split by is_paused
//
// Invariants kept by every operation below:
// - is_paused implies is_playing
// - current_file is None whenever is_playing is false
// - volume stays inside 0.0..=1.0
//
// All fields sit behind one lock, and the engine is driven while that
// lock is held, so API calls and the monitor task never interleave.

use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::engine::PlaybackEngine;
use crate::error::{PlayerError, Result};

/// Volume applied before anyone touches the volume control.
pub const DEFAULT_VOLUME: f32 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub current_file: Option<PathBuf>,
    pub is_playing: bool,
    pub is_paused: bool,
    pub volume: f32,
}

impl Default for PlayerState {
    fn default() -> Self {
        PlayerState {
            current_file: None,
            is_playing: false,
            is_paused: false,
            volume: DEFAULT_VOLUME,
        }
    }
}

/// Read-only snapshot handed to the control surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStatus {
    pub playing: bool,
    pub paused: bool,
    /// File name only, never the full path
    pub current_file: Option<String>,
    pub volume_percent: u8,
    pub engine_busy: bool,
}

pub struct MusicPlayer {
    engine: Arc<dyn PlaybackEngine>,
    state: Mutex<PlayerState>,
}

impl MusicPlayer {
    pub fn new(engine: Arc<dyn PlaybackEngine>) -> Self {
        MusicPlayer {
            engine,
            state: Mutex::new(PlayerState::default()),
        }
    }

    // ==========================================
    // PLAYBACK CONTROL: play()
    // ==========================================
    // Replaces whatever is playing with `path`.
    //
    // A missing file leaves the state untouched. A file that fails to
    // decode also leaves it untouched, because the engine keeps the old
    // track until the new one loaded.
    pub fn play(&self, path: &Path) -> Result<()> {
        if !path.is_file() {
            warn!(path = %path.display(), "Refusing to play: file does not exist");
            return Err(PlayerError::FileNotFound(path.to_path_buf()));
        }

        let mut state = self.state.lock();

        if let Err(e) = self.engine.load(path) {
            error!(path = %path.display(), "Failed to load track: {}", e);
            return Err(e);
        }

        self.engine.set_volume(state.volume);

        if let Err(e) = self.engine.play() {
            error!(path = %path.display(), "Failed to start playback: {}", e);
            // The new track is loaded but silent; drop it so engine and state agree
            self.engine.stop();
            let volume = state.volume;
            *state = PlayerState {
                volume,
                ..PlayerState::default()
            };
            return Err(e);
        }

        state.current_file = Some(path.to_path_buf());
        state.is_playing = true;
        state.is_paused = false;

        info!(path = %path.display(), "Playing");
        Ok(())
    }

    pub fn pause(&self) -> bool {
        let mut state = self.state.lock();
        if !state.is_playing || state.is_paused {
            return false;
        }

        self.engine.pause();
        state.is_paused = true;
        debug!("Paused");
        true
    }

    pub fn resume(&self) -> bool {
        let mut state = self.state.lock();
        if !state.is_playing || !state.is_paused {
            return false;
        }

        self.engine.unpause();
        state.is_paused = false;
        debug!("Resumed");
        true
    }

    /// Always succeeds, including when already idle.
    pub fn stop(&self) -> bool {
        let mut state = self.state.lock();

        self.engine.stop();
        state.is_playing = false;
        state.is_paused = false;
        state.current_file = None;

        debug!("Stopped");
        true
    }

    /// Clamp to 0.0..=1.0, apply, and return what was stored.
    pub fn set_volume(&self, volume: f32) -> f32 {
        let volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };

        let mut state = self.state.lock();
        self.engine.set_volume(volume);
        state.volume = volume;

        debug!(volume, "Volume set");
        volume
    }

    pub fn status(&self) -> PlayerStatus {
        let state = self.state.lock();

        PlayerStatus {
            playing: state.is_playing,
            paused: state.is_paused,
            current_file: state
                .current_file
                .as_deref()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned()),
            volume_percent: volume_percent(state.volume),
            engine_busy: self.engine.is_busy(),
        }
    }

    /// Copy of the raw state, full path included.
    pub fn snapshot(&self) -> PlayerState {
        self.state.lock().clone()
    }

    // ==========================================
    // END-OF-TRACK DETECTION
    // ==========================================
    // One monitor tick. An engine that went idle while we think we are
    // actively playing means the track ran out on its own. Never fires
    // while paused. Returns true when the track was marked as finished.
    //
    // A tick that lands while a command holds the lock (a load can take a
    // while) is skipped; the next tick sees the settled state.
    pub fn check_track_end(&self) -> bool {
        let Some(mut state) = self.state.try_lock() else {
            return false;
        };
        if !state.is_playing || state.is_paused || self.engine.is_busy() {
            return false;
        }

        if let Some(path) = state.current_file.take() {
            info!(path = %path.display(), "Track finished");
        }
        state.is_playing = false;
        true
    }
}

/// 0.0..=1.0 volume as a rounded 0..=100 percentage.
pub fn volume_percent(volume: f32) -> u8 {
    (volume * 100.0).round().clamp(0.0, 100.0) as u8
}
