//! Rock-paper-scissors against the computer.
//!
//! A round walks START -> POSE_DETECT -> CONFIRM -> RESULT -> RESET. The
//! player's move is only accepted after it has been classified the same way
//! on several consecutive frames, which filters out single-frame tracker noise.

pub mod outcome;

pub use outcome::{resolve, Choice, Opponent, Outcome, RandomOpponent, ScriptedOpponent};

use crate::{GameError, Result};
use chrono::{DateTime, Duration, Utc};
use handplay_core::{classifier, HandObservation, Pose, RpsConfig};
use serde::Serialize;
use uuid::Uuid;

/// Where the live round stands, with the data each stage needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundState {
    /// Waiting for the start pose.
    Start,
    /// Counting down before reading the player's move.
    PoseDetect {
        since: DateTime<Utc>,
        /// The previous read was not a valid move.
        retrying: bool,
    },
    /// Holding `choice` steady for enough consecutive frames.
    Confirm {
        choice: Choice,
        streak: u32,
        since: DateTime<Utc>,
    },
    Result {
        player: Choice,
        computer: Choice,
        outcome: Outcome,
        since: DateTime<Utc>,
    },
    /// Result cleared; the next frame starts a fresh round.
    Reset,
}

impl RoundState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::PoseDetect { .. } => "POSE_DETECT",
            Self::Confirm { .. } => "CONFIRM",
            Self::Result { .. } => "RESULT",
            Self::Reset => "RESET",
        }
    }
}

/// The one live round. Replaced wholesale when RESET completes.
#[derive(Debug, Clone)]
pub struct RpsRound {
    id: Uuid,
    state: RoundState,
    state_entered_at: Option<DateTime<Utc>>,
}

impl RpsRound {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: RoundState::Start,
            state_entered_at: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn state_entered_at(&self) -> Option<DateTime<Utc>> {
        self.state_entered_at
    }

    pub fn player_choice(&self) -> Option<Choice> {
        match self.state {
            RoundState::Confirm { choice, .. } => Some(choice),
            RoundState::Result { player, .. } => Some(player),
            _ => None,
        }
    }

    pub fn computer_choice(&self) -> Option<Choice> {
        match self.state {
            RoundState::Result { computer, .. } => Some(computer),
            _ => None,
        }
    }

    pub fn confirmation_streak(&self) -> u32 {
        match self.state {
            RoundState::Confirm { streak, .. } => streak,
            _ => 0,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            RoundState::Result { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    /// Line shown to the player for the current stage.
    pub fn status_text(&self) -> &'static str {
        match &self.state {
            RoundState::Start | RoundState::Reset => "Waiting for start pose...",
            RoundState::PoseDetect { retrying: false, .. } => "Show your move!",
            RoundState::PoseDetect { retrying: true, .. } => {
                "Invalid Pose. Show Rock, Paper, or Scissors"
            }
            RoundState::Confirm { .. } => "Confirming...",
            RoundState::Result { outcome, .. } => outcome.message(),
        }
    }

    fn enter(&mut self, state: RoundState, now: DateTime<Utc>) {
        tracing::debug!(
            "Round {}: {} -> {}",
            self.id,
            self.state.as_str(),
            state.as_str()
        );
        self.state = state;
        self.state_entered_at = Some(now);
    }
}

/// Transitions reported by [`RpsEngine::advance`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RpsEvent {
    RoundStarted,
    InvalidPose,
    PoseLocked { choice: Choice },
    ConfirmationBroken { streak: u32, seen: Pose },
    Resolved {
        player: Choice,
        computer: Choice,
        outcome: Outcome,
    },
    ResultCleared,
    RoundReset,
}

/// What a renderer needs to draw the current frame.
#[derive(Debug, Clone, Serialize)]
pub struct RpsSnapshot {
    pub round_id: Uuid,
    pub state: RoundState,
    pub status: &'static str,
    pub player_choice: Option<Choice>,
    pub computer_choice: Option<Choice>,
    pub confirmation_streak: u32,
    pub state_entered_at: Option<DateTime<Utc>>,
}

/// Per-session rock-paper-scissors state machine.
pub struct RpsEngine {
    countdown: Duration,
    result_display: Duration,
    required_confirmation_frames: u32,
    round: RpsRound,
    opponent: Box<dyn Opponent>,
}

impl RpsEngine {
    pub fn new(config: &RpsConfig, opponent: Box<dyn Opponent>) -> Result<Self> {
        config.validate()?;

        let to_chrono = |d: std::time::Duration, what: &str| {
            Duration::from_std(d)
                .map_err(|e| GameError::InvalidSetup(format!("{} out of range: {}", what, e)))
        };

        Ok(Self {
            countdown: to_chrono(config.countdown, "countdown")?,
            result_display: to_chrono(config.result_display, "result display")?,
            required_confirmation_frames: config.required_confirmation_frames,
            round: RpsRound::new(),
            opponent,
        })
    }

    pub fn round(&self) -> &RpsRound {
        &self.round
    }

    /// Feed one frame of detected hands.
    ///
    /// Only the first hand is read. Stages that wait on the player do nothing
    /// on a frame without hands; the timed RESULT and RESET stages advance
    /// regardless.
    pub fn advance(&mut self, hands: &[HandObservation], now: DateTime<Utc>) -> Vec<RpsEvent> {
        let hand = hands.first();
        let mut events = Vec::new();

        match self.round.state.clone() {
            RoundState::Start => {
                if hand.map_or(false, classifier::is_start_pose) {
                    self.round.enter(
                        RoundState::PoseDetect {
                            since: now,
                            retrying: false,
                        },
                        now,
                    );
                    tracing::info!("Round {} started", self.round.id);
                    events.push(RpsEvent::RoundStarted);
                }
            }
            RoundState::PoseDetect { since, .. } => {
                let Some(hand) = hand else {
                    return events;
                };
                if now - since < self.countdown {
                    return events;
                }

                let pose = classifier::classify(hand);
                match Choice::try_from(pose) {
                    Ok(choice) => {
                        self.round.enter(
                            RoundState::Confirm {
                                choice,
                                streak: 0,
                                since: now,
                            },
                            now,
                        );
                        events.push(RpsEvent::PoseLocked { choice });
                    }
                    Err(_) => {
                        // Restart the countdown and keep waiting for a real move.
                        self.round.enter(
                            RoundState::PoseDetect {
                                since: now,
                                retrying: true,
                            },
                            now,
                        );
                        events.push(RpsEvent::InvalidPose);
                    }
                }
            }
            RoundState::Confirm {
                choice,
                streak,
                since,
            } => {
                let Some(hand) = hand else {
                    return events;
                };

                let seen = classifier::classify(hand);
                if seen != Pose::from(choice) {
                    tracing::debug!(
                        "Confirmation of {} broken at {} by {}",
                        choice,
                        streak,
                        seen
                    );
                    self.round.enter(
                        RoundState::PoseDetect {
                            since: now,
                            retrying: false,
                        },
                        now,
                    );
                    events.push(RpsEvent::ConfirmationBroken { streak, seen });
                    return events;
                }

                let streak = streak + 1;
                if streak < self.required_confirmation_frames {
                    self.round.state = RoundState::Confirm {
                        choice,
                        streak,
                        since,
                    };
                    return events;
                }

                let computer = self.opponent.next_choice();
                let outcome = resolve(choice, computer);
                self.round.enter(
                    RoundState::Result {
                        player: choice,
                        computer,
                        outcome,
                        since: now,
                    },
                    now,
                );
                tracing::info!(
                    "Round {}: player {} vs computer {} -> {}",
                    self.round.id,
                    choice,
                    computer,
                    outcome.message()
                );
                events.push(RpsEvent::Resolved {
                    player: choice,
                    computer,
                    outcome,
                });
            }
            RoundState::Result { since, .. } => {
                if now - since >= self.result_display {
                    self.round.enter(RoundState::Reset, now);
                    events.push(RpsEvent::ResultCleared);
                }
            }
            RoundState::Reset => {
                self.round = RpsRound::new();
                events.push(RpsEvent::RoundReset);
            }
        }

        events
    }

    pub fn snapshot(&self) -> RpsSnapshot {
        RpsSnapshot {
            round_id: self.round.id,
            state: self.round.state.clone(),
            status: self.round.status_text(),
            player_choice: self.round.player_choice(),
            computer_choice: self.round.computer_choice(),
            confirmation_streak: self.round.confirmation_streak(),
            state_entered_at: self.round.state_entered_at,
        }
    }
}

impl std::fmt::Debug for RpsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpsEngine")
            .field("round", &self.round)
            .field(
                "required_confirmation_frames",
                &self.required_confirmation_frames,
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handplay_core::hand::testing::HandBuilder;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn at(ms: i64) -> DateTime<Utc> {
        t0() + Duration::milliseconds(ms)
    }

    fn engine(computer: Vec<Choice>) -> RpsEngine {
        RpsEngine::new(
            &RpsConfig::default(),
            Box::new(ScriptedOpponent::new(computer).unwrap()),
        )
        .unwrap()
    }

    fn palm() -> Vec<HandObservation> {
        vec![HandBuilder::open_palm().build()]
    }

    fn fist() -> Vec<HandObservation> {
        vec![HandBuilder::fist().build()]
    }

    fn scissors() -> Vec<HandObservation> {
        vec![HandBuilder::scissors().build()]
    }

    fn pointing() -> Vec<HandObservation> {
        vec![HandBuilder::pointing().build()]
    }

    /// Drive a fresh engine into CONFIRM holding `hand`, locked at 3s.
    fn confirming(engine: &mut RpsEngine, hand: &[HandObservation]) {
        assert_eq!(engine.advance(&palm(), t0()), vec![RpsEvent::RoundStarted]);
        let events = engine.advance(hand, at(3_000));
        assert!(matches!(events[..], [RpsEvent::PoseLocked { .. }]));
    }

    #[test]
    fn test_waits_for_start_pose() {
        let mut engine = engine(vec![Choice::Rock]);
        assert!(engine.advance(&fist(), t0()).is_empty());
        assert!(engine.advance(&[], t0()).is_empty());
        assert_eq!(engine.round().state(), &RoundState::Start);
        assert_eq!(engine.round().status_text(), "Waiting for start pose...");

        assert_eq!(engine.advance(&palm(), at(10)), vec![RpsEvent::RoundStarted]);
        assert_eq!(engine.round().state().as_str(), "POSE_DETECT");
        assert_eq!(engine.round().state_entered_at(), Some(at(10)));
        assert_eq!(engine.round().confirmation_streak(), 0);
    }

    #[test]
    fn test_countdown_before_reading_move() {
        let mut engine = engine(vec![Choice::Rock]);
        engine.advance(&palm(), t0());

        assert!(engine.advance(&fist(), at(2_999)).is_empty());
        assert_eq!(engine.round().state().as_str(), "POSE_DETECT");

        assert_eq!(
            engine.advance(&fist(), at(3_000)),
            vec![RpsEvent::PoseLocked {
                choice: Choice::Rock
            }]
        );
        assert_eq!(engine.round().player_choice(), Some(Choice::Rock));
        assert_eq!(engine.round().confirmation_streak(), 0);
    }

    #[test]
    fn test_invalid_pose_restarts_countdown() {
        let mut engine = engine(vec![Choice::Rock]);
        engine.advance(&palm(), t0());

        assert_eq!(
            engine.advance(&pointing(), at(3_000)),
            vec![RpsEvent::InvalidPose]
        );
        assert_eq!(
            engine.round().status_text(),
            "Invalid Pose. Show Rock, Paper, or Scissors"
        );

        // The timer restarted at 3s, so a valid move at 5s is still too early.
        assert!(engine.advance(&fist(), at(5_000)).is_empty());
        assert_eq!(
            engine.advance(&fist(), at(6_000)),
            vec![RpsEvent::PoseLocked {
                choice: Choice::Rock
            }]
        );
    }

    #[test]
    fn test_steady_pose_resolves_after_required_frames() {
        let mut engine = engine(vec![Choice::Paper]);
        confirming(&mut engine, &scissors());

        for frame in 1..5 {
            assert!(engine.advance(&scissors(), at(3_000 + frame * 33)).is_empty());
            assert_eq!(engine.round().confirmation_streak(), frame as u32);
        }

        let events = engine.advance(&scissors(), at(3_165));
        assert_eq!(
            events,
            vec![RpsEvent::Resolved {
                player: Choice::Scissors,
                computer: Choice::Paper,
                outcome: Outcome::PlayerWins,
            }]
        );
        assert_eq!(engine.round().state().as_str(), "RESULT");
        assert_eq!(engine.round().computer_choice(), Some(Choice::Paper));
        assert_eq!(engine.round().status_text(), "You win!");
    }

    #[test]
    fn test_mismatch_at_four_resets_streak() {
        let mut engine = engine(vec![Choice::Rock]);
        confirming(&mut engine, &fist());

        for frame in 1..=4 {
            engine.advance(&fist(), at(3_000 + frame * 33));
        }
        assert_eq!(engine.round().confirmation_streak(), 4);

        let events = engine.advance(&palm(), at(3_200));
        assert_eq!(
            events,
            vec![RpsEvent::ConfirmationBroken {
                streak: 4,
                seen: Pose::Paper
            }]
        );
        assert_eq!(engine.round().confirmation_streak(), 0);
        assert_eq!(
            engine.round().state(),
            &RoundState::PoseDetect {
                since: at(3_200),
                retrying: false
            }
        );
        assert_eq!(engine.round().player_choice(), None);
    }

    #[test]
    fn test_frames_without_hands_keep_streak() {
        let mut engine = engine(vec![Choice::Rock]);
        confirming(&mut engine, &fist());

        engine.advance(&fist(), at(3_033));
        engine.advance(&[], at(3_066));
        assert_eq!(engine.round().confirmation_streak(), 1);
    }

    #[test]
    fn test_full_round_resets_to_fresh_start() {
        let mut engine = engine(vec![Choice::Rock]);
        confirming(&mut engine, &fist());
        for frame in 1..=5 {
            engine.advance(&fist(), at(3_000 + frame * 33));
        }
        assert_eq!(engine.round().outcome(), Some(Outcome::Tie));
        let first_round = engine.round().id();

        assert!(engine.advance(&[], at(4_000)).is_empty());
        assert_eq!(engine.advance(&[], at(5_165)), vec![RpsEvent::ResultCleared]);
        assert_eq!(engine.round().state(), &RoundState::Reset);
        assert_eq!(engine.round().player_choice(), None);
        assert_eq!(engine.round().computer_choice(), None);

        assert_eq!(engine.advance(&[], at(5_200)), vec![RpsEvent::RoundReset]);
        assert_eq!(engine.round().state(), &RoundState::Start);
        assert_ne!(engine.round().id(), first_round);
        assert_eq!(engine.round().state_entered_at(), None);
    }

    #[test]
    fn test_computer_choice_comes_from_opponent() {
        let mut engine = engine(vec![Choice::Scissors, Choice::Rock]);

        for (round, expected) in [Outcome::ComputerWins, Outcome::PlayerWins]
            .into_iter()
            .enumerate()
        {
            let base = round as i64 * 10_000;
            engine.advance(&palm(), at(base));
            engine.advance(&palm(), at(base + 3_000));
            for frame in 1..=5 {
                engine.advance(&palm(), at(base + 3_000 + frame * 33));
            }
            assert_eq!(engine.round().outcome(), Some(expected));

            engine.advance(&[], at(base + 6_000));
            engine.advance(&[], at(base + 6_033));
            assert_eq!(engine.round().state(), &RoundState::Start);
        }
    }

    #[test]
    fn test_snapshot_reports_round_fields() {
        let mut engine = engine(vec![Choice::Rock]);
        confirming(&mut engine, &fist());
        engine.advance(&fist(), at(3_033));

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.player_choice, Some(Choice::Rock));
        assert_eq!(snapshot.computer_choice, None);
        assert_eq!(snapshot.confirmation_streak, 1);
        assert_eq!(snapshot.status, "Confirming...");

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["state"]["state"], "CONFIRM");
        assert_eq!(json["state"]["choice"], "rock");
    }

    #[test]
    fn test_rejects_zero_confirmation_frames() {
        let config = RpsConfig {
            required_confirmation_frames: 0,
            ..RpsConfig::default()
        };
        let opponent = Box::new(ScriptedOpponent::new(vec![Choice::Rock]).unwrap());
        assert!(RpsEngine::new(&config, opponent).is_err());
    }
}
