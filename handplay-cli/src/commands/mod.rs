pub mod classify;
pub mod leaderboard;
pub mod replay;

pub use classify::classify_frame;
pub use leaderboard::show_leaderboard;
pub use replay::{replay_recording, ReplayOptions};

use handplay_core::HandObservation;
use serde::Deserialize;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// One line of a keypoint recording.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordedFrame {
    /// Seconds since the recording started.
    #[serde(default)]
    pub t: f64,
    #[serde(default)]
    pub hands: Vec<HandObservation>,
}
