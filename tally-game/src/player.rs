//! Player identity and scorecard ownership.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::category::Category;
use crate::score::{ScoreEntry, Scorecard};

/// Stable identifier for a seated player.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A seated player: identity plus the scorecard for the current game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub scores: Scorecard,
}

impl Player {
    #[must_use]
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            scores: Scorecard::new(),
        }
    }

    #[must_use]
    pub fn entry(&self, category: Category) -> ScoreEntry {
        self.scores.entry(category)
    }

    /// Drop every recorded mark while keeping id and name.
    pub fn reset_scores(&mut self) {
        self.scores.clear();
    }
}
