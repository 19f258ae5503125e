use handplay_core::{GameConfig, HandplayError};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub game: GameConfig,
}

impl CliConfig {
    /// Explicit `--config` wins; otherwise `<data_dir>/config.json` if present,
    /// else built-in defaults.
    pub fn resolve(
        data_dir: Option<PathBuf>,
        config_path: Option<&Path>,
    ) -> Result<Self, HandplayError> {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        let game = match config_path {
            Some(path) => GameConfig::load(path)?,
            None => {
                let candidate = data_dir.join(CONFIG_FILE);
                if candidate.exists() {
                    tracing::debug!("Using config {}", candidate.display());
                    GameConfig::load(&candidate)?
                } else {
                    GameConfig::default()
                }
            }
        };

        Ok(Self { data_dir, game })
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("handplay")
}
