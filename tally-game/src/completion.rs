//! Completion checks for players and the game as a whole.
use crate::category::Category;
use crate::player::Player;

/// True once every category holds a mark (points or crossed).
#[must_use]
pub fn is_player_complete(player: &Player) -> bool {
    player.scores.is_full()
}

/// True iff there is at least one player and every player is complete.
///
/// A playerless game never counts as finished.
#[must_use]
pub fn is_game_complete(players: &[Player]) -> bool {
    !players.is_empty() && players.iter().all(is_player_complete)
}

/// Categories the player has not played yet, in scorecard order.
pub fn remaining_categories(player: &Player) -> impl Iterator<Item = Category> + '_ {
    Category::ALL
        .into_iter()
        .filter(|category| !player.scores.is_recorded(*category))
}
