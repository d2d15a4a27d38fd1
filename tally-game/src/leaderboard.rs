//! Ranked standings and winner selection.
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::calculator::{default_rules, grand_total_with_rules, section_total};
use crate::category::Section;
use crate::config::RulesConfig;
use crate::player::{Player, PlayerId};

/// One player's row in the standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_id: PlayerId,
    pub player_name: String,
    pub total_score: u32,
    pub upper_section_total: u32,
}

/// Standings ordered best first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub ranking: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    #[must_use]
    pub fn leader(&self) -> Option<&LeaderboardEntry> {
        self.ranking.first()
    }

    /// True when every ranked player finished on zero.
    #[must_use]
    pub fn all_zero(&self) -> bool {
        self.ranking.iter().all(|entry| entry.total_score == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LeaderboardEntry> {
        self.ranking.iter()
    }

    /// Rows paired with their podium placement, if any.
    pub fn placements(&self) -> impl Iterator<Item = (Option<Placement>, &LeaderboardEntry)> {
        self.ranking
            .iter()
            .enumerate()
            .map(|(idx, entry)| (Placement::for_rank(idx), entry))
    }
}

/// Podium position for the first three ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Gold,
    Silver,
    Bronze,
}

impl Placement {
    /// Placement for a zero-based leaderboard index.
    #[must_use]
    pub const fn for_rank(index: usize) -> Option<Self> {
        match index {
            0 => Some(Placement::Gold),
            1 => Some(Placement::Silver),
            2 => Some(Placement::Bronze),
            _ => None,
        }
    }

    #[must_use]
    pub const fn medal(self) -> &'static str {
        match self {
            Placement::Gold => "🥇",
            Placement::Silver => "🥈",
            Placement::Bronze => "🥉",
        }
    }
}

#[must_use]
pub fn leaderboard(players: &[Player]) -> Leaderboard {
    leaderboard_with_rules(players, default_rules())
}

/// Rank players by grand total, then by upper-section total.
///
/// The sort is stable: players tied on both keys keep their roster order.
#[must_use]
pub fn leaderboard_with_rules(players: &[Player], rules: &RulesConfig) -> Leaderboard {
    let mut ranking: Vec<LeaderboardEntry> = players
        .iter()
        .map(|player| LeaderboardEntry {
            player_id: player.id.clone(),
            player_name: player.name.clone(),
            total_score: grand_total_with_rules(player, rules),
            upper_section_total: section_total(player, Section::Upper),
        })
        .collect();
    ranking.sort_by_key(|entry| (Reverse(entry.total_score), Reverse(entry.upper_section_total)));
    Leaderboard { ranking }
}

/// The leading entry, but only once the game is complete.
#[must_use]
pub fn winner(game_complete: bool, leaderboard: &Leaderboard) -> Option<&LeaderboardEntry> {
    if !game_complete {
        return None;
    }
    leaderboard.leader()
}
