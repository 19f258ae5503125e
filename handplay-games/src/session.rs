use crate::path::{PathEvent, PathSnapshot, PathTracker};
use crate::rps::{Opponent, RpsEngine, RpsEvent, RpsSnapshot};
use crate::{GameError, Result};
use chrono::{DateTime, Utc};
use handplay_core::{GameConfig, HandObservation, LeaderboardEntry, LeaderboardStore};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Which minigame a session is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    PathTracing,
    RockPaperScissors,
}

impl GameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PathTracing => "line_following",
            Self::RockPaperScissors => "rps",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "line_following" | "path" => Ok(Self::PathTracing),
            "rps" | "rock_paper_scissors" => Ok(Self::RockPaperScissors),
            other => Err(GameError::InvalidSetup(format!("unknown game {:?}", other))),
        }
    }
}

enum ActiveGame {
    Path(PathTracker),
    Rps(RpsEngine),
}

/// Everything that happened during one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum FrameEvent {
    Path(PathEvent),
    Rps(RpsEvent),
    /// A finished path run was written to the leaderboard.
    Recorded(LeaderboardEntry),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum Snapshot {
    PathTracing(PathSnapshot),
    RockPaperScissors(RpsSnapshot),
}

/// One player's session with one minigame.
///
/// Owns its engine exclusively; only the leaderboard is shared between
/// sessions.
pub struct GameSession {
    id: Uuid,
    game: ActiveGame,
    leaderboard: Option<Arc<LeaderboardStore>>,
    /// Set only for path sessions, which record finished runs.
    player_name: Option<String>,
    frames: u64,
}

impl GameSession {
    /// Path-tracing session. Finished runs go to `leaderboard` when given.
    pub fn path_tracing(
        config: &GameConfig,
        leaderboard: Option<Arc<LeaderboardStore>>,
    ) -> Result<Self> {
        let tracker = PathTracker::new(&config.path)?;
        Ok(Self::with_game(
            ActiveGame::Path(tracker),
            leaderboard,
            Some(config.path.player_name.clone()),
        ))
    }

    pub fn rock_paper_scissors(config: &GameConfig, opponent: Box<dyn Opponent>) -> Result<Self> {
        let engine = RpsEngine::new(&config.rps, opponent)?;
        Ok(Self::with_game(
            ActiveGame::Rps(engine),
            None,
            None,
        ))
    }

    fn with_game(
        game: ActiveGame,
        leaderboard: Option<Arc<LeaderboardStore>>,
        player_name: Option<String>,
    ) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            game,
            leaderboard,
            player_name,
            frames: 0,
        };
        tracing::info!("Session {} playing {}", session.id, session.kind());
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> GameKind {
        match self.game {
            ActiveGame::Path(_) => GameKind::PathTracing,
            ActiveGame::Rps(_) => GameKind::RockPaperScissors,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    /// Process one frame, in arrival order.
    ///
    /// The engine state always advances. If recording a finished run fails,
    /// the error is returned once and the write is not retried.
    pub fn advance(
        &mut self,
        hands: &[HandObservation],
        now: DateTime<Utc>,
    ) -> Result<Vec<FrameEvent>> {
        self.frames += 1;

        match &mut self.game {
            ActiveGame::Rps(engine) => Ok(engine
                .advance(hands, now)
                .into_iter()
                .map(FrameEvent::Rps)
                .collect()),
            ActiveGame::Path(tracker) => {
                let mut events = Vec::new();
                for event in tracker.advance(hands, now) {
                    let finished = match event {
                        PathEvent::Finished { elapsed_secs } => Some(elapsed_secs),
                        _ => None,
                    };
                    events.push(FrameEvent::Path(event));

                    if let (Some(elapsed_secs), Some(store), Some(name)) =
                        (finished, &self.leaderboard, &self.player_name)
                    {
                        let entry = store.append(name, elapsed_secs)?;
                        events.push(FrameEvent::Recorded(entry));
                    }
                }
                Ok(events)
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        match &self.game {
            ActiveGame::Path(tracker) => Snapshot::PathTracing(tracker.snapshot()),
            ActiveGame::Rps(engine) => Snapshot::RockPaperScissors(engine.snapshot()),
        }
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("frames", &self.frames)
            .field("records_runs", &self.leaderboard.is_some())
            .finish()
    }
}
