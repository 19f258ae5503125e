use crate::error::{HandplayError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub path: PathConfig,
    pub rps: RpsConfig,
    pub leaderboard: LeaderboardConfig,
}

/// Geometry of the path-tracing game, in camera pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    pub frame_width: u32,
    pub frame_height: u32,
    /// Vertical center of the band at the start point.
    pub baseline_y: f64,
    pub amplitude: f64,
    /// Wave cycles per pixel.
    pub frequency: f64,
    pub start_x: f64,
    pub finish_x: f64,
    /// Half-width of the band.
    pub tolerance: f64,
    pub point_radius: f64,
    /// Name recorded on the leaderboard for a finished run.
    pub player_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RpsConfig {
    /// Wait after the start pose before the player's move is read, in seconds.
    #[serde(with = "seconds")]
    pub countdown: Duration,
    pub required_confirmation_frames: u32,
    /// How long the result stays up before the round resets, in seconds.
    #[serde(with = "seconds")]
    pub result_display: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    pub file_name: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            frame_width: 1920,
            frame_height: 1080,
            baseline_y: 300.0,
            amplitude: 70.0,
            frequency: 0.002,
            start_x: 500.0,
            finish_x: 1500.0,
            tolerance: 20.0, // half of a 40px band
            point_radius: 10.0,
            player_name: "Player".to_string(),
        }
    }
}

impl Default for RpsConfig {
    fn default() -> Self {
        Self {
            countdown: Duration::from_secs(3),
            required_confirmation_frames: 5,
            result_display: Duration::from_secs(2),
        }
    }
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            file_name: "leaderboard.txt".to_string(),
        }
    }
}

impl GameConfig {
    /// Load a JSON config file; missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.path.validate()?;
        self.rps.validate()?;
        self.leaderboard.validate()
    }
}

impl PathConfig {
    pub fn validate(&self) -> Result<()> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(HandplayError::config("Frame dimensions must be non-zero"));
        }

        let values = [
            self.baseline_y,
            self.amplitude,
            self.frequency,
            self.start_x,
            self.finish_x,
            self.tolerance,
            self.point_radius,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(HandplayError::config("Path parameters must be finite"));
        }

        if self.tolerance <= 0.0 {
            return Err(HandplayError::config("Tolerance must be greater than 0"));
        }

        if self.point_radius < 0.0 {
            return Err(HandplayError::config("Point radius cannot be negative"));
        }

        if self.start_x >= self.finish_x {
            return Err(HandplayError::config(format!(
                "Start x ({}) must be left of finish x ({})",
                self.start_x, self.finish_x
            )));
        }

        validate_player_name(&self.player_name)
    }
}

impl RpsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.required_confirmation_frames == 0 {
            return Err(HandplayError::config(
                "Required confirmation frames must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl LeaderboardConfig {
    pub fn validate(&self) -> Result<()> {
        if self.file_name.trim().is_empty() {
            return Err(HandplayError::config("Leaderboard file name cannot be empty"));
        }

        Ok(())
    }
}

// Durations are written as plain (fractional) seconds in config files.
mod seconds {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs)
            .map_err(|_| de::Error::custom(format!("invalid duration {} seconds", secs)))
    }
}

/// Names end up on a single ledger line, so they must be non-empty and line-free.
pub fn validate_player_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(HandplayError::config("Player name cannot be empty"));
    }

    if name.contains(['\n', '\r']) {
        return Err(HandplayError::config("Player name cannot contain line breaks"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        GameConfig::default().validate().unwrap();
    }

    #[test]
    fn test_rejects_bad_path_geometry() {
        let mut config = PathConfig::default();
        config.tolerance = 0.0;
        assert!(matches!(config.validate(), Err(HandplayError::Config(_))));

        let mut config = PathConfig::default();
        config.finish_x = config.start_x;
        assert!(config.validate().is_err());

        let mut config = PathConfig::default();
        config.amplitude = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = PathConfig::default();
        config.player_name = "two\nlines".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_confirmation_frames() {
        let config = RpsConfig {
            required_confirmation_frames: 0,
            ..RpsConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("handplay.json");
        std::fs::write(
            &path,
            r#"{"path": {"tolerance": 35.0, "player_name": "Ana"}, "rps": {"required_confirmation_frames": 8}}"#,
        )
        .unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.path.tolerance, 35.0);
        assert_eq!(config.path.player_name, "Ana");
        assert_eq!(config.path.start_x, 500.0);
        assert_eq!(config.rps.required_confirmation_frames, 8);
        assert_eq!(config.rps.countdown, Duration::from_secs(3));
        assert_eq!(config.leaderboard.file_name, "leaderboard.txt");
    }

    #[test]
    fn test_durations_are_plain_seconds() {
        let json = serde_json::to_value(RpsConfig::default()).unwrap();
        assert_eq!(json["countdown"], 3.0);
        assert_eq!(json["result_display"], 2.0);

        let config: RpsConfig =
            serde_json::from_str(r#"{"countdown": 1.5, "result_display": 4}"#).unwrap();
        assert_eq!(config.countdown, Duration::from_millis(1500));
        assert_eq!(config.result_display, Duration::from_secs(4));
        assert_eq!(config.required_confirmation_frames, 5);

        assert!(serde_json::from_str::<RpsConfig>(r#"{"countdown": -1.0}"#).is_err());
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("handplay.json");
        std::fs::write(&path, r#"{"path": {"start_x": 900.0, "finish_x": 100.0}}"#).unwrap();

        assert!(matches!(
            GameConfig::load(&path),
            Err(HandplayError::Config(_))
        ));
    }
}
