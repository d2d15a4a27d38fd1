//! Hand-off of finished games to an external history log.
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::leaderboard::{Leaderboard, LeaderboardEntry, winner};

/// Trait for abstracting the append-only game history.
/// Platform-specific implementations decide where records are kept.
pub trait GameHistory {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Append the result of an ended game.
    ///
    /// # Errors
    ///
    /// Returns an error if the result cannot be stored.
    fn commit(&mut self, result: &GameResult) -> Result<(), Self::Error>;
}

impl<H: GameHistory + ?Sized> GameHistory for &mut H {
    type Error = H::Error;

    fn commit(&mut self, result: &GameResult) -> Result<(), Self::Error> {
        (**self).commit(result)
    }
}

/// Final standings of a game at the moment it ended.
///
/// `winner` is only set when every player had filled every category; a game
/// ended early still has standings but no winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub standings: Leaderboard,
    #[serde(default)]
    pub winner: Option<LeaderboardEntry>,
}

impl GameResult {
    #[must_use]
    pub fn new(standings: Leaderboard, game_complete: bool) -> Self {
        let winner = winner(game_complete, &standings).cloned();
        Self { standings, winner }
    }
}

/// One committed game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// One-based position in the history log.
    pub game_number: u32,
    pub ranking: Leaderboard,
    #[serde(default)]
    pub winner: Option<LeaderboardEntry>,
}

impl HistoryRecord {
    #[must_use]
    pub fn new(game_number: u32, result: &GameResult) -> Self {
        Self {
            game_number,
            ranking: result.standings.clone(),
            winner: result.winner.clone(),
        }
    }

    #[must_use]
    pub fn winner(&self) -> Option<&LeaderboardEntry> {
        self.winner.as_ref()
    }
}

/// History kept in memory for the lifetime of the process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryHistory {
    records: Vec<HistoryRecord>,
}

impl MemoryHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&HistoryRecord> {
        self.records.last()
    }
}

impl GameHistory for MemoryHistory {
    type Error = Infallible;

    fn commit(&mut self, result: &GameResult) -> Result<(), Self::Error> {
        let game_number = u32::try_from(self.records.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1);
        self.records.push(HistoryRecord::new(game_number, result));
        Ok(())
    }
}
