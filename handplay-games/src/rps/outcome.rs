use crate::{GameError, Result};
use handplay_core::Pose;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A playable move; [`Pose::Invalid`] has no counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Self::Rock, Self::Paper, Self::Scissors];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Paper => "paper",
            Self::Scissors => "scissors",
        }
    }

    pub fn beats(&self, other: Choice) -> bool {
        matches!(
            (self, other),
            (Self::Rock, Self::Scissors) | (Self::Scissors, Self::Paper) | (Self::Paper, Self::Rock)
        )
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<Pose> for Choice {
    type Error = Pose;

    fn try_from(pose: Pose) -> std::result::Result<Self, Pose> {
        match pose {
            Pose::Rock => Ok(Self::Rock),
            Pose::Paper => Ok(Self::Paper),
            Pose::Scissors => Ok(Self::Scissors),
            Pose::Invalid => Err(pose),
        }
    }
}

impl From<Choice> for Pose {
    fn from(choice: Choice) -> Self {
        match choice {
            Choice::Rock => Pose::Rock,
            Choice::Paper => Pose::Paper,
            Choice::Scissors => Pose::Scissors,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    PlayerWins,
    ComputerWins,
    Tie,
}

impl Outcome {
    pub fn message(&self) -> &'static str {
        match self {
            Self::PlayerWins => "You win!",
            Self::ComputerWins => "Computer wins!",
            Self::Tie => "It's a tie!",
        }
    }
}

/// Result of one round from the player's point of view.
pub fn resolve(player: Choice, computer: Choice) -> Outcome {
    if player == computer {
        Outcome::Tie
    } else if player.beats(computer) {
        Outcome::PlayerWins
    } else {
        Outcome::ComputerWins
    }
}

/// Source of the computer's moves.
pub trait Opponent: Send {
    fn next_choice(&mut self) -> Choice;
}

/// Uniformly random moves.
#[derive(Debug)]
pub struct RandomOpponent<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomOpponent<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomOpponent<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible sequence for replays.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send> Opponent for RandomOpponent<R> {
    fn next_choice(&mut self) -> Choice {
        Choice::ALL[self.rng.gen_range(0..Choice::ALL.len())]
    }
}

/// Plays a fixed list of moves, cycling when it runs out.
#[derive(Debug, Clone)]
pub struct ScriptedOpponent {
    choices: Vec<Choice>,
    next: usize,
}

impl ScriptedOpponent {
    pub fn new(choices: Vec<Choice>) -> Result<Self> {
        if choices.is_empty() {
            return Err(GameError::InvalidSetup(
                "scripted opponent needs at least one move".to_string(),
            ));
        }

        Ok(Self { choices, next: 0 })
    }
}

impl Opponent for ScriptedOpponent {
    fn next_choice(&mut self) -> Choice {
        let choice = self.choices[self.next];
        self.next = (self.next + 1) % self.choices.len();
        choice
    }
}
