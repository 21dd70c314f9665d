pub mod engine;
pub mod monitor;
pub mod state;

pub use engine::{PlaybackEngine, RodioEngine};
pub use monitor::{spawn_monitor, DEFAULT_POLL_INTERVAL};
pub use state::{volume_percent, MusicPlayer, PlayerState, PlayerStatus, DEFAULT_VOLUME};
