//! Shared test helpers: a scripted playback engine and on-disk fixtures.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tocar::player::{MusicPlayer, PlaybackEngine};
use tocar::{PlayerError, Result};

/// Engine that never touches an audio device.
///
/// Busy from `play()` until `finish_track()` or `stop()`, like a real
/// backend running out of samples. Every call is recorded.
#[derive(Default)]
pub struct FakeEngine {
    busy: AtomicBool,
    fail_load: AtomicBool,
    fail_play: AtomicBool,
    calls: Mutex<Vec<String>>,
    volume: Mutex<Option<f32>>,
}

impl FakeEngine {
    pub fn finish_track(&self) {
        self.busy.store(false, Ordering::SeqCst);
    }

    pub fn fail_next_loads(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }

    pub fn fail_next_plays(&self, fail: bool) {
        self.fail_play.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn volume(&self) -> Option<f32> {
        *self.volume.lock().unwrap()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

impl PlaybackEngine for FakeEngine {
    fn load(&self, path: &Path) -> Result<()> {
        self.record(format!("load {}", path.display()));
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(PlayerError::Engine("unsupported format".into()));
        }
        Ok(())
    }

    fn play(&self) -> Result<()> {
        self.record("play");
        if self.fail_play.load(Ordering::SeqCst) {
            return Err(PlayerError::Engine("output device went away".into()));
        }
        self.busy.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn pause(&self) {
        self.record("pause");
    }

    fn unpause(&self) {
        self.record("unpause");
    }

    fn stop(&self) {
        self.record("stop");
        self.busy.store(false, Ordering::SeqCst);
    }

    fn set_volume(&self, volume: f32) {
        self.record(format!("volume {}", volume));
        *self.volume.lock().unwrap() = Some(volume);
    }

    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

pub fn fake_player() -> (Arc<MusicPlayer>, Arc<FakeEngine>) {
    let engine = Arc::new(FakeEngine::default());
    let player = Arc::new(MusicPlayer::new(engine.clone()));
    (player, engine)
}

/// Create an (unplayable, but existing) audio file inside `dir`.
pub fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, b"not really audio").unwrap();
    path
}
