//! Tally Scoring Engine
//!
//! Platform-agnostic scoring logic for multiplayer dice scorecards.
//! This crate tracks per-player category scores, derives totals and bonuses,
//! detects completion and ranks players, without UI or storage dependencies.

pub mod calculator;
pub mod category;
pub mod completion;
pub mod config;
pub mod constants;
pub mod error;
pub mod history;
pub mod leaderboard;
pub mod player;
pub mod score;
pub mod state;

// Re-export commonly used types
pub use calculator::{
    ScoreBreakdown, grand_total, grand_total_with_rules, section_total, upper_bonus,
    upper_bonus_with_rules,
};
pub use category::{Category, ScoreStyle, Section, max_score, score_style, section};
pub use completion::{is_game_complete, is_player_complete, remaining_categories};
pub use config::RulesConfig;
pub use error::{RewriteReason, RosterError, ScoreError};
pub use history::{GameHistory, GameResult, HistoryRecord, MemoryHistory};
pub use leaderboard::{
    Leaderboard, LeaderboardEntry, Placement, leaderboard, leaderboard_with_rules, winner,
};
pub use player::{Player, PlayerId};
pub use score::{Mark, ScoreEntry, Scorecard};
pub use state::{EndOutcome, GamePhase, GameState};

/// Scoring table pairing a game with the history it commits into.
pub struct GameEngine<H>
where
    H: GameHistory,
{
    state: GameState,
    history: H,
}

impl<H> GameEngine<H>
where
    H: GameHistory,
{
    /// Create an engine with an empty roster and default rules
    pub fn new(history: H) -> Self {
        Self::with_state(GameState::new(), history)
    }

    pub const fn with_state(state: GameState, history: H) -> Self {
        Self { state, history }
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    pub const fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    #[must_use]
    pub const fn history(&self) -> &H {
        &self.history
    }

    /// Record a score on the owned game.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected; see [`GameState::record_score`].
    pub fn record(
        &mut self,
        player_id: &str,
        category: Category,
        mark: Mark,
    ) -> Result<(), ScoreError> {
        self.state.record_score(player_id, category, mark)
    }

    /// End the owned game, committing into the owned history.
    ///
    /// # Errors
    ///
    /// Returns an error if the history commit fails.
    pub fn end_game(&mut self) -> Result<EndOutcome, H::Error> {
        self.state.end(&mut self.history)
    }

    /// Clear every scorecard for a rematch with the same roster.
    pub fn new_game(&mut self) {
        self.state.reset();
    }

    pub fn into_parts(self) -> (GameState, H) {
        (self.state, self.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Unavailable;

    impl fmt::Display for Unavailable {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "history unavailable")
        }
    }

    impl std::error::Error for Unavailable {}

    #[derive(Default)]
    struct OfflineHistory {
        attempts: usize,
    }

    impl GameHistory for OfflineHistory {
        type Error = Unavailable;

        fn commit(&mut self, _result: &GameResult) -> Result<(), Self::Error> {
            self.attempts += 1;
            Err(Unavailable)
        }
    }

    #[test]
    fn engine_plays_and_commits_a_game() {
        let mut engine = GameEngine::new(MemoryHistory::new());
        engine.state_mut().add_player("p1", "Ada").unwrap();
        engine.state_mut().add_player("p2", "Bo").unwrap();
        for category in Category::ALL {
            engine.record("p1", category, Mark::Points(3)).unwrap();
            engine.record("p2", category, Mark::Crossed).unwrap();
        }
        assert!(engine.state().is_complete());
        let outcome = engine.end_game().unwrap();
        assert!(outcome.committed());
        assert_eq!(engine.history().len(), 1);

        engine.new_game();
        let (state, history) = engine.into_parts();
        assert_eq!(state.phase(), GamePhase::NotStarted);
        assert_eq!(state.players().len(), 2);
        assert_eq!(history.records()[0].winner().unwrap().player_name, "Ada");
    }

    #[test]
    fn failed_commit_keeps_game_open() {
        let mut engine = GameEngine::new(OfflineHistory::default());
        engine.state_mut().add_player("p1", "Ada").unwrap();
        engine
            .record("p1", Category::Chance, Mark::Points(18))
            .unwrap();
        assert!(engine.end_game().is_err());
        assert_eq!(engine.state().phase(), GamePhase::InProgress);
        assert!(engine.end_game().is_err());
        assert_eq!(engine.history().attempts, 2);
    }
}
