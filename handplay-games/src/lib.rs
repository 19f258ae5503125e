//! Gesture-controlled minigames
//!
//! Two per-session state machines fed one frame of hand keypoints at a time:
//! a path-tracing game scored by elapsed time, and rock-paper-scissors with a
//! debounced move confirmation. Time and randomness are passed in, so both
//! can be replayed deterministically.

pub mod error;
pub mod path;
pub mod rps;
pub mod session;

pub use error::{GameError, Result};
pub use path::{PathDefinition, PathEvent, PathGameState, PathSnapshot, PathTracker, Point};
pub use rps::{
    Choice, Opponent, Outcome, RandomOpponent, RoundState, RpsEngine, RpsEvent, RpsRound,
    RpsSnapshot, ScriptedOpponent,
};
pub use session::{FrameEvent, GameKind, GameSession, Snapshot};
