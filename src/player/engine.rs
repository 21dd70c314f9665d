// ==========================================
// AUDIO PLAYBACK ENGINE
// ==========================================
// The opaque audio backend the player drives. `PlaybackEngine` is the
// seam: the player only ever talks to this trait, so tests can swap in a
// scripted engine and the binary uses `RodioEngine`.
//
// Rodio model recap:
// - OutputStream keeps the OS audio device open
// - OutputStreamHandle creates Sinks on that device
// - Sink is the play/pause/volume control for whatever was appended to it

use parking_lot::Mutex;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, error, info};

use crate::error::{PlayerError, Result};

/// Operations the player needs from an audio backend.
///
/// All methods take `&self`: the engine is shared between the control
/// surface and the monitor task and must do its own locking.
pub trait PlaybackEngine: Send + Sync {
    /// Decode `path` and get it ready to play. Nothing is audible yet.
    fn load(&self, path: &Path) -> Result<()>;

    /// Start the loaded track.
    fn play(&self) -> Result<()>;

    fn pause(&self);

    fn unpause(&self);

    /// Stop and discard the loaded track. Safe when nothing is loaded.
    fn stop(&self);

    /// Volume in 0.0..=1.0; also applies to tracks loaded later.
    fn set_volume(&self, volume: f32);

    /// True while audio is being produced. Must not block.
    fn is_busy(&self) -> bool;
}

// ==========================================
// RODIO ENGINE
// ==========================================
// One Sink per loaded track. A new Sink is built for every `load` so a
// stopped Sink is never reused, and the old one is only swapped out once
// the new file decoded successfully.
pub struct RodioEngine {
    handle: OutputStreamHandle,
    sink: Mutex<Option<Sink>>,
    volume: Mutex<f32>,
}

impl RodioEngine {
    /// Open the default output device.
    ///
    /// This is the only fatal failure of the whole program: without an
    /// output device there is nothing to control.
    pub fn new() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| PlayerError::Engine(format!("no audio output device: {}", e)))?;

        // OutputStream is !Send and must outlive every Sink. The engine lives
        // for the whole process, so the stream is leaked rather than stored.
        std::mem::forget(stream);

        info!("Audio output device opened");

        Ok(RodioEngine {
            handle,
            sink: Mutex::new(None),
            volume: Mutex::new(1.0),
        })
    }

    fn decode(path: &Path) -> Result<Decoder<BufReader<File>>> {
        let file = File::open(path)
            .map_err(|e| PlayerError::Engine(format!("failed to open {}: {}", path.display(), e)))?;

        Decoder::new(BufReader::new(file)).map_err(|e| {
            PlayerError::Engine(format!(
                "failed to decode {}: {}. File may be corrupted or in an unsupported format",
                path.display(),
                e
            ))
        })
    }
}

impl PlaybackEngine for RodioEngine {
    fn load(&self, path: &Path) -> Result<()> {
        let volume = *self.volume.lock();

        // rodio decoders can panic on malformed files
        let sink = catch_engine_panic("decoder", || {
            let decoder = Self::decode(path)?;

            let sink = Sink::try_new(&self.handle)
                .map_err(|e| PlayerError::Engine(format!("failed to create sink: {}", e)))?;
            sink.pause();
            sink.set_volume(volume);
            sink.append(decoder);
            Ok(sink)
        })?;

        if let Some(previous) = self.sink.lock().replace(sink) {
            previous.stop();
        }

        debug!(path = %path.display(), "Track loaded");
        Ok(())
    }

    fn play(&self) -> Result<()> {
        match self.sink.lock().as_ref() {
            Some(sink) => {
                sink.play();
                Ok(())
            }
            None => Err(PlayerError::Engine("no track loaded".into())),
        }
    }

    fn pause(&self) {
        if let Some(sink) = self.sink.lock().as_ref() {
            sink.pause();
        }
    }

    fn unpause(&self) {
        if let Some(sink) = self.sink.lock().as_ref() {
            sink.play();
        }
    }

    fn stop(&self) {
        if let Some(sink) = self.sink.lock().take() {
            sink.stop();
        }
    }

    fn set_volume(&self, volume: f32) {
        *self.volume.lock() = volume;
        if let Some(sink) = self.sink.lock().as_ref() {
            sink.set_volume(volume);
        }
    }

    fn is_busy(&self) -> bool {
        self.sink
            .lock()
            .as_ref()
            .map(|sink| !sink.empty() && !sink.is_paused())
            .unwrap_or(false)
    }
}

/// Run `f`, turning a panic inside the audio backend into an engine error.
fn catch_engine_panic<T>(what: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!("Audio {} panicked: {}", what, detail);
            Err(PlayerError::Engine(format!("{} panicked: {}", what, detail)))
        }
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        // Silence the device before the handle goes away
        if let Some(sink) = self.sink.get_mut().take() {
            sink.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoder_panic_becomes_engine_error() {
        let result: Result<()> = catch_engine_panic("decoder", || panic!("bad frame header"));

        match result {
            Err(PlayerError::Engine(msg)) => {
                assert_eq!(msg, "decoder panicked: bad frame header");
            }
            other => panic!("expected engine error, got {:?}", other),
        }
    }

    #[test]
    fn formatted_panic_message_is_kept() {
        let result: Result<()> =
            catch_engine_panic("decoder", || panic!("frame {} out of range", 7));
        assert!(matches!(
            result,
            Err(PlayerError::Engine(msg)) if msg.ends_with("frame 7 out of range")
        ));
    }

    #[test]
    fn errors_and_values_pass_through() {
        assert_eq!(catch_engine_panic("decoder", || Ok(3)).unwrap(), 3);

        let result: Result<()> =
            catch_engine_panic("decoder", || Err(PlayerError::Engine("eof".into())));
        assert!(matches!(result, Err(PlayerError::Engine(msg)) if msg == "eof"));
    }
}
