// ==========================================
// MONITOR LOOP
// ==========================================
// Background task that polls the engine's busy flag and reconciles it into
// the player state. This is the only path that changes state without an
// explicit command: it detects a track running out on its own.
//
// The task is never joined. Dropping the runtime at process exit drops it.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::state::MusicPlayer;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub fn spawn_monitor(player: Arc<MusicPlayer>, poll_interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(?poll_interval, "Playback monitor started");

        loop {
            ticker.tick().await;
            player.check_track_end();
        }
    })
}
