use crate::error::{HandplayError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const SEPARATOR: &str = ": ";
const UNIT: &str = "seconds";

/// One finished run: who, and how long it took.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub duration_seconds: f64,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, duration_seconds: f64) -> Result<Self> {
        let name = name.into();

        if name.contains(['\n', '\r']) {
            return Err(HandplayError::invalid_entry(format!(
                "name {:?} contains a line break",
                name
            )));
        }

        if !duration_seconds.is_finite() || duration_seconds < 0.0 {
            return Err(HandplayError::invalid_entry(format!(
                "duration {} must be a non-negative number of seconds",
                duration_seconds
            )));
        }

        Ok(Self {
            name,
            duration_seconds,
        })
    }

    /// Ledger line, newline-terminated: `<name>: <duration:.2> seconds`.
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }

    /// Parse one ledger line (without its terminator).
    ///
    /// The name is everything before the last `": "`, so names that
    /// themselves contain the separator still read back intact.
    pub fn parse_line(line: &str) -> std::result::Result<Self, String> {
        let (name, rest) = line
            .rsplit_once(SEPARATOR)
            .ok_or_else(|| format!("missing {:?} separator", SEPARATOR))?;

        let mut fields = rest.split_whitespace();
        let duration = fields.next().ok_or("missing duration")?;
        let duration_seconds: f64 = duration
            .parse()
            .map_err(|e| format!("bad duration {:?}: {}", duration, e))?;

        match fields.next() {
            Some(UNIT) => {}
            Some(other) => return Err(format!("expected unit {:?}, found {:?}", UNIT, other)),
            None => return Err(format!("missing unit {:?}", UNIT)),
        }

        if fields.next().is_some() {
            return Err("trailing fields after unit".to_string());
        }

        Self::new(name, duration_seconds).map_err(|e| e.to_string())
    }
}

impl fmt::Display for LeaderboardEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{:.2} {}",
            self.name, SEPARATOR, self.duration_seconds, UNIT
        )
    }
}
