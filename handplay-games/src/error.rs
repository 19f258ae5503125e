use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("handplay core error: {0}")]
    Core(#[from] handplay_core::HandplayError),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid game setup: {0}")]
    InvalidSetup(String),
}
