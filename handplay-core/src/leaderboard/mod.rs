//! Append-only text ledger of finished path-tracing runs.
//!
//! Each run is one line `<name>: <seconds> seconds`. Reads return entries
//! sorted by duration, fastest first. A line that does not parse aborts the
//! read with [`HandplayError::DataFormat`]; nothing is guessed or skipped.

pub mod entry;

pub use entry::LeaderboardEntry;

use crate::config::LeaderboardConfig;
use crate::error::{HandplayError, Result};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Shared handle to the ledger file.
///
/// Appends and reads go through one lock, so concurrent sessions never
/// interleave records or observe a half-written line.
#[derive(Debug)]
pub struct LeaderboardStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LeaderboardStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store for `config.file_name` inside `data_dir`, creating the directory.
    pub fn open_in(data_dir: &Path, config: &LeaderboardConfig) -> Result<Self> {
        config.validate()?;
        std::fs::create_dir_all(data_dir)?;
        Ok(Self::new(data_dir.join(&config.file_name)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Durably append one record. Either the whole line is written and synced,
    /// or an error is returned; failures are not retried.
    pub fn append(&self, name: &str, duration_seconds: f64) -> Result<LeaderboardEntry> {
        let entry = LeaderboardEntry::new(name, duration_seconds)?;
        let line = entry.to_line();

        let _guard = self.lock.lock();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.sync_data()?;

        tracing::info!(
            "Recorded {} at {:.2}s in {}",
            entry.name,
            entry.duration_seconds,
            self.path.display()
        );
        Ok(entry)
    }

    /// All entries, sorted ascending by duration. A missing ledger is empty.
    pub fn read_all(&self) -> Result<Vec<LeaderboardEntry>> {
        let content = {
            let _guard = self.lock.lock();
            match std::fs::read_to_string(&self.path) {
                Ok(content) => content,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!("No leaderboard at {}", self.path.display());
                    return Ok(Vec::new());
                }
                Err(e) => return Err(e.into()),
            }
        };

        let mut entries = Vec::new();
        for (i, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let entry = LeaderboardEntry::parse_line(line).map_err(|reason| {
                tracing::warn!("Corrupt leaderboard line {}: {}", i + 1, reason);
                HandplayError::data_format(i + 1, line, reason)
            })?;
            entries.push(entry);
        }

        // Stable, so equal times keep their append order.
        entries.sort_by(|a, b| a.duration_seconds.total_cmp(&b.duration_seconds));
        Ok(entries)
    }
}
