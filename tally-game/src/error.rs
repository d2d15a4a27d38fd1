//! Rejections raised on the score and roster write paths.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::category::Category;

/// Why a write to a scorecard cell was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteReason {
    /// The cell already holds a value for this game.
    AlreadyRecorded,
    /// The game has ended; every cell is frozen until reset.
    GameEnded,
}

impl std::fmt::Display for RewriteReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RewriteReason::AlreadyRecorded => write!(f, "already recorded"),
            RewriteReason::GameEnded => write!(f, "game has ended"),
        }
    }
}

/// Errors raised when a score write violates the scorecard rules.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("cannot record {category} for player {player_id}: {reason}")]
    IllegalRewrite {
        player_id: String,
        category: Category,
        reason: RewriteReason,
    },
    #[error("unknown category id '{0}'")]
    UnknownCategory(String),
    #[error("unknown player id '{0}'")]
    UnknownPlayer(String),
}

/// Errors raised when the player roster is modified.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("player id '{0}' is already seated")]
    DuplicatePlayer(String),
    #[error("unknown player id '{0}'")]
    UnknownPlayer(String),
    #[error("player name must not be empty")]
    EmptyName,
    #[error("roster cannot change while a game is in progress")]
    RosterLocked,
}
