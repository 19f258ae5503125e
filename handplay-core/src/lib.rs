//! handplay core - hand keypoints, pose classification and the leaderboard
//!
//! This library holds everything the minigames share: the 21-landmark hand
//! skeleton, the stateless pose/gesture classifiers, game configuration and
//! the durable leaderboard ledger.

pub mod classifier;
pub mod config;
pub mod error;
pub mod hand;
pub mod leaderboard;

pub use classifier::{classify, is_pointing_pose, is_restart_gesture, is_start_pose, Pose};
pub use config::{GameConfig, LeaderboardConfig, PathConfig, RpsConfig};
pub use error::{HandplayError, Result};
pub use hand::{HandObservation, Keypoint, Landmark, LANDMARK_COUNT};
pub use leaderboard::{LeaderboardEntry, LeaderboardStore};
