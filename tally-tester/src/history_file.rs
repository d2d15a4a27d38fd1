//! Game history persisted as a JSON array on disk.
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tally_game::{GameHistory, GameResult, HistoryRecord};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryFileError {
    #[error("failed to access history file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("history file {} JSON error: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One committed game plus the moment it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedGame {
    #[serde(flatten)]
    pub record: HistoryRecord,
    pub committed_at: DateTime<Utc>,
}

/// Append-only history backed by a JSON file.
///
/// The whole log is rewritten on each commit.
#[derive(Debug)]
pub struct JsonHistoryFile {
    path: PathBuf,
    games: Vec<ArchivedGame>,
}

impl JsonHistoryFile {
    /// Open `path`, loading any games already recorded there.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, HistoryFileError> {
        let path = path.as_ref().to_path_buf();
        let games = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => Vec::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| HistoryFileError::Json {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(HistoryFileError::Io { path, source }),
        };
        debug!(
            "loaded {} archived game(s) from {}",
            games.len(),
            path.display()
        );
        Ok(Self { path, games })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn games(&self) -> &[ArchivedGame] {
        &self.games
    }

    fn next_game_number(&self) -> u32 {
        self.games
            .last()
            .map_or(1, |game| game.record.game_number.saturating_add(1))
    }

    fn persist(&self) -> Result<(), HistoryFileError> {
        let path = self.path.clone();
        let json = serde_json::to_string_pretty(&self.games)
            .map_err(|source| HistoryFileError::Json { path, source })?;
        fs::write(&self.path, json).map_err(|source| HistoryFileError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl GameHistory for JsonHistoryFile {
    type Error = HistoryFileError;

    fn commit(&mut self, result: &GameResult) -> Result<(), Self::Error> {
        let record = HistoryRecord::new(self.next_game_number(), result);
        let game_number = record.game_number;
        self.games.push(ArchivedGame {
            record,
            committed_at: Utc::now(),
        });
        if let Err(err) = self.persist() {
            self.games.pop();
            return Err(err);
        }
        info!("archived game {game_number} to {}", self.path.display());
        Ok(())
    }
}
