use thiserror::Error;

pub type Result<T> = std::result::Result<T, HandplayError>;

#[derive(Error, Debug)]
pub enum HandplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Malformed data at line {line}: {reason} ({content:?})")]
    DataFormat {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("Invalid leaderboard entry: {0}")]
    InvalidEntry(String),
}

impl HandplayError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_entry(msg: impl Into<String>) -> Self {
        Self::InvalidEntry(msg.into())
    }

    pub fn data_format(line: usize, content: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataFormat {
            line,
            content: content.into(),
            reason: reason.into(),
        }
    }
}
