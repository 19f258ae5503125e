//! Path-tracing game: follow a wavy band with the index fingertip from the
//! start marker to the finish column without leaving the band.

pub mod definition;

pub use definition::{PathDefinition, Point};

use crate::Result;
use chrono::{DateTime, Utc};
use handplay_core::{classifier, HandObservation, Landmark, PathConfig};
use serde::Serialize;

/// Progress of one attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PathGameState {
    Idle,
    Drawing {
        started_at: DateTime<Utc>,
    },
    Failed {
        started_at: DateTime<Utc>,
        elapsed_secs: f64,
    },
    Finished {
        started_at: DateTime<Utc>,
        elapsed_secs: f64,
    },
}

impl PathGameState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Drawing { .. } => "drawing",
            Self::Failed { .. } => "failed",
            Self::Finished { .. } => "finished",
        }
    }

    /// Frozen attempt duration once the attempt is over.
    pub fn elapsed_secs(&self) -> Option<f64> {
        match self {
            Self::Failed { elapsed_secs, .. } | Self::Finished { elapsed_secs, .. } => {
                Some(*elapsed_secs)
            }
            _ => None,
        }
    }

    /// Line shown to the player for this state.
    pub fn status_text(&self) -> &'static str {
        match self {
            Self::Idle => "Move to Start!",
            Self::Drawing { .. } => "Drawing...",
            Self::Failed { .. } => "FAILED!",
            Self::Finished { .. } => "FINISH!",
        }
    }
}

/// Transitions reported by [`PathTracker::advance`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PathEvent {
    Started { at: Point },
    Failed { at: Point, elapsed_secs: f64 },
    Finished { elapsed_secs: f64 },
    Restarted,
}

/// What a renderer needs to draw the current frame.
#[derive(Debug, Clone, Serialize)]
pub struct PathSnapshot {
    pub state: PathGameState,
    pub status: &'static str,
    pub trace: Vec<Point>,
    pub fingertip: Option<Point>,
    /// Start marker until the attempt begins, then the finish marker while drawing.
    pub marker: Option<Point>,
}

/// Per-session state machine for the path-tracing game.
#[derive(Debug, Clone)]
pub struct PathTracker {
    definition: PathDefinition,
    frame_width: f64,
    frame_height: f64,
    state: PathGameState,
    trace: Vec<Point>,
    fingertip: Option<Point>,
}

impl PathTracker {
    pub fn new(config: &PathConfig) -> Result<Self> {
        Ok(Self {
            definition: PathDefinition::from_config(config)?,
            frame_width: f64::from(config.frame_width),
            frame_height: f64::from(config.frame_height),
            state: PathGameState::Idle,
            trace: Vec::new(),
            fingertip: None,
        })
    }

    pub fn definition(&self) -> &PathDefinition {
        &self.definition
    }

    pub fn state(&self) -> &PathGameState {
        &self.state
    }

    pub fn trace(&self) -> &[Point] {
        &self.trace
    }

    pub fn fingertip(&self) -> Option<Point> {
        self.fingertip
    }

    /// Feed one frame of detected hands.
    ///
    /// Only the first hand counts. A frame with no usable hand changes
    /// nothing but clears the fingertip cursor. A restart gesture wins over
    /// everything else and ends processing for that frame.
    pub fn advance(&mut self, hands: &[HandObservation], now: DateTime<Utc>) -> Vec<PathEvent> {
        let mut events = Vec::new();

        self.fingertip = None;
        let Some(hand) = hands.first().filter(|h| h.is_well_formed()) else {
            return events;
        };
        let Some(tip) = self.fingertip_of(hand) else {
            return events;
        };
        self.fingertip = Some(tip);

        if classifier::is_restart_gesture(hand) {
            if self.state != PathGameState::Idle || !self.trace.is_empty() {
                self.reset();
                tracing::info!("Path game restarted");
                events.push(PathEvent::Restarted);
            }
            return events;
        }

        if self.state == PathGameState::Idle {
            if !(self.definition.is_at_start(tip) && classifier::is_pointing_pose(hand)) {
                return events;
            }
            self.trace.clear();
            self.state = PathGameState::Drawing { started_at: now };
            tracing::info!("Path attempt started at ({:.0}, {:.0})", tip.x, tip.y);
            events.push(PathEvent::Started { at: tip });
        }

        if let PathGameState::Drawing { started_at } = self.state {
            self.step_drawing(tip, started_at, now, &mut events);
        }

        events
    }

    fn step_drawing(
        &mut self,
        tip: Point,
        started_at: DateTime<Utc>,
        now: DateTime<Utc>,
        events: &mut Vec<PathEvent>,
    ) {
        let elapsed_secs = elapsed_secs(started_at, now);

        if !self.definition.is_within_band(tip) {
            self.state = PathGameState::Failed {
                started_at,
                elapsed_secs,
            };
            tracing::info!(
                "Path attempt failed after {:.2}s at ({:.0}, {:.0})",
                elapsed_secs,
                tip.x,
                tip.y
            );
            events.push(PathEvent::Failed {
                at: tip,
                elapsed_secs,
            });
            return;
        }

        self.trace.push(tip);

        if self.definition.is_at_finish(tip) {
            self.state = PathGameState::Finished {
                started_at,
                elapsed_secs,
            };
            tracing::info!("Path attempt finished in {:.2}s", elapsed_secs);
            events.push(PathEvent::Finished { elapsed_secs });
        }
    }

    /// Back to idle with an empty trace.
    pub fn reset(&mut self) {
        self.state = PathGameState::Idle;
        self.trace.clear();
    }

    pub fn snapshot(&self) -> PathSnapshot {
        let marker = match self.state {
            PathGameState::Idle => Some(self.definition.start_point()),
            PathGameState::Drawing { .. } => Some(self.definition.finish_point()),
            _ => None,
        };

        PathSnapshot {
            state: self.state.clone(),
            status: self.state.status_text(),
            trace: self.trace.clone(),
            fingertip: self.fingertip,
            marker,
        }
    }

    fn fingertip_of(&self, hand: &HandObservation) -> Option<Point> {
        let tip = hand.get(Landmark::IndexTip)?;
        Some(Point::new(
            f64::from(tip.x) * self.frame_width,
            f64::from(tip.y) * self.frame_height,
        ))
    }
}

// Replayed timestamps can run backwards; such gaps count as zero.
fn elapsed_secs(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from)
        .to_std()
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
