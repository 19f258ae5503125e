use super::{CommandResult, RecordedFrame};
use crate::config::CliConfig;
use chrono::{DateTime, Duration, Utc};
use handplay_core::{HandplayError, LeaderboardStore};
use handplay_games::{FrameEvent, GameKind, GameSession, PathEvent, RandomOpponent, RpsEvent};
use std::path::Path;
use std::sync::Arc;

/// Longest recording offset accepted, one year.
const MAX_RECORDING_SECS: f64 = 365.0 * 24.0 * 60.0 * 60.0;

#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// Seed for the rock-paper-scissors opponent.
    pub seed: Option<u64>,
    /// Skip writing finished runs to the leaderboard.
    pub dry_run: bool,
    /// Emit events as JSON lines instead of text.
    pub json: bool,
}

/// Feed a JSONL keypoint recording through a fresh session, one line per frame.
pub async fn replay_recording(
    settings: &CliConfig,
    game: GameKind,
    recording: &Path,
    options: &ReplayOptions,
) -> CommandResult {
    let content = tokio::fs::read_to_string(recording).await?;
    let frames = parse_recording(&content)?;
    tracing::info!("Loaded {} frames from {}", frames.len(), recording.display());

    let mut session = match game {
        GameKind::PathTracing => {
            let store = if options.dry_run {
                None
            } else {
                Some(Arc::new(LeaderboardStore::open_in(
                    &settings.data_dir,
                    &settings.game.leaderboard,
                )?))
            };
            GameSession::path_tracing(&settings.game, store)?
        }
        GameKind::RockPaperScissors => {
            let opponent = match options.seed {
                Some(seed) => RandomOpponent::seeded(seed),
                None => RandomOpponent::from_entropy(),
            };
            GameSession::rock_paper_scissors(&settings.game, Box::new(opponent))?
        }
    };

    let base = Utc::now();
    for frame in &frames {
        let now = frame_time(base, frame.t)
            .ok_or_else(|| format!("frame time {}s is out of range", frame.t))?;
        for event in session.advance(&frame.hands, now)? {
            if options.json {
                println!("{}", serde_json::to_string(&event)?);
            } else {
                println!("[{:>8.3}s] {}", frame.t, describe(&event));
            }
        }
    }

    if options.json {
        println!("{}", serde_json::to_string(&session.snapshot())?);
    } else {
        println!("Replayed {} frames ({})", session.frames(), session.kind());
    }

    Ok(())
}

/// Parse JSONL frames. Blank lines and `#` comments are skipped; timestamps
/// must be finite, non-negative, at most a year and non-decreasing.
pub fn parse_recording(content: &str) -> Result<Vec<RecordedFrame>, HandplayError> {
    let mut frames: Vec<RecordedFrame> = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let frame: RecordedFrame = serde_json::from_str(trimmed)
            .map_err(|e| HandplayError::data_format(index + 1, line, e.to_string()))?;

        if !frame.t.is_finite() || frame.t < 0.0 {
            return Err(HandplayError::data_format(
                index + 1,
                line,
                "timestamp must be a non-negative number of seconds",
            ));
        }
        if frame.t > MAX_RECORDING_SECS {
            return Err(HandplayError::data_format(
                index + 1,
                line,
                "timestamp out of range",
            ));
        }
        if let Some(previous) = frames.last() {
            if frame.t < previous.t {
                return Err(HandplayError::data_format(
                    index + 1,
                    line,
                    "timestamps must not go backwards",
                ));
            }
        }

        frames.push(frame);
    }

    Ok(frames)
}

fn frame_time(base: DateTime<Utc>, t: f64) -> Option<DateTime<Utc>> {
    let micros = (t * 1_000_000.0).round();
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return None;
    }
    base.checked_add_signed(Duration::microseconds(micros as i64))
}

fn describe(event: &FrameEvent) -> String {
    match event {
        FrameEvent::Path(PathEvent::Started { at }) => {
            format!("Run started at ({:.0}, {:.0})", at.x, at.y)
        }
        FrameEvent::Path(PathEvent::Failed { at, elapsed_secs }) => format!(
            "FAILED at ({:.0}, {:.0}) after {:.2}s",
            at.x, at.y, elapsed_secs
        ),
        FrameEvent::Path(PathEvent::Finished { elapsed_secs }) => {
            format!("FINISH! {:.2} seconds", elapsed_secs)
        }
        FrameEvent::Path(PathEvent::Restarted) => "Restarted".to_string(),
        FrameEvent::Recorded(entry) => format!("Recorded {}", entry),
        FrameEvent::Rps(RpsEvent::RoundStarted) => "Round started".to_string(),
        FrameEvent::Rps(RpsEvent::InvalidPose) => "Invalid pose, try again".to_string(),
        FrameEvent::Rps(RpsEvent::PoseLocked { choice }) => format!("Locked {}", choice),
        FrameEvent::Rps(RpsEvent::ConfirmationBroken { streak, seen }) => {
            format!("Confirmation broken after {} frames (saw {})", streak, seen)
        }
        FrameEvent::Rps(RpsEvent::Resolved {
            player,
            computer,
            outcome,
        }) => format!("{} vs {}: {}", player, computer, outcome.message()),
        FrameEvent::Rps(RpsEvent::ResultCleared) => "Result cleared".to_string(),
        FrameEvent::Rps(RpsEvent::RoundReset) => "Round reset".to_string(),
    }
}
