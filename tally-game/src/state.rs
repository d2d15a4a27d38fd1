//! Game state: roster, lifecycle phase and the score write path.
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::calculator::ScoreBreakdown;
use crate::category::{Category, ScoreStyle, score_style};
use crate::completion::is_game_complete;
use crate::config::RulesConfig;
use crate::error::{RewriteReason, RosterError, ScoreError};
use crate::history::{GameHistory, GameResult};
use crate::leaderboard::{Leaderboard, LeaderboardEntry, leaderboard_with_rules, winner};
use crate::player::{Player, PlayerId};
use crate::score::{Mark, ScoreEntry};

/// Lifecycle phase of the current game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    NotStarted,
    InProgress,
    Ended,
}

/// What [`GameState::end`] did with the final standings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndOutcome {
    /// The result was handed to the history collaborator.
    Committed(GameResult),
    /// Every player finished on zero; nothing was committed.
    Discarded(GameResult),
    /// The game had already ended; nothing changed.
    AlreadyEnded,
}

impl EndOutcome {
    #[must_use]
    pub const fn committed(&self) -> bool {
        matches!(self, EndOutcome::Committed(_))
    }

    #[must_use]
    pub fn result(&self) -> Option<&GameResult> {
        match self {
            EndOutcome::Committed(result) | EndOutcome::Discarded(result) => Some(result),
            EndOutcome::AlreadyEnded => None,
        }
    }

    #[must_use]
    pub fn standings(&self) -> Option<&Leaderboard> {
        self.result().map(|result| &result.standings)
    }
}

#[derive(Debug, Deserialize)]
struct GameSnapshot {
    #[serde(default)]
    players: Vec<Player>,
    #[serde(default)]
    phase: GamePhase,
    #[serde(default)]
    rules: RulesConfig,
}

/// Complete state of one scoring table.
///
/// The caller owns the value and passes it (or a lock around it) into every
/// operation; nothing here notifies observers of changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameSnapshot")]
pub struct GameState {
    players: Vec<Player>,
    phase: GamePhase,
    rules: RulesConfig,
    #[serde(skip)]
    complete: bool,
}

impl TryFrom<GameSnapshot> for GameState {
    type Error = RosterError;

    fn try_from(snapshot: GameSnapshot) -> Result<Self, Self::Error> {
        for (idx, player) in snapshot.players.iter().enumerate() {
            if snapshot.players[..idx].iter().any(|p| p.id == player.id) {
                return Err(RosterError::DuplicatePlayer(player.id.to_string()));
            }
        }
        let mut state = Self {
            players: snapshot.players,
            phase: snapshot.phase,
            rules: snapshot.rules,
            complete: false,
        };
        state.refresh_completion();
        Ok(state)
    }
}

impl GameState {
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(RulesConfig::load_from_static())
    }

    #[must_use]
    pub fn with_rules(rules: RulesConfig) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    // Queries ---------------------------------------------------------------

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id.as_str() == player_id)
    }

    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub const fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    #[must_use]
    pub const fn is_started(&self) -> bool {
        !matches!(self.phase, GamePhase::NotStarted)
    }

    #[must_use]
    pub const fn is_ended(&self) -> bool {
        matches!(self.phase, GamePhase::Ended)
    }

    /// Whether every seated player has filled every category.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    #[must_use]
    pub fn leaderboard(&self) -> Leaderboard {
        leaderboard_with_rules(&self.players, &self.rules)
    }

    #[must_use]
    pub fn winner(&self) -> Option<LeaderboardEntry> {
        winner(self.complete, &self.leaderboard()).cloned()
    }

    #[must_use]
    pub fn breakdown(&self, player_id: &str) -> Option<ScoreBreakdown> {
        self.player(player_id)
            .map(|player| ScoreBreakdown::with_rules(player, &self.rules))
    }

    /// Cell value for (player, category); unknown players read as unset.
    #[must_use]
    pub fn entry(&self, player_id: &str, category: Category) -> ScoreEntry {
        self.player(player_id)
            .map_or(ScoreEntry::Unset, |player| player.entry(category))
    }

    #[must_use]
    pub fn cell_style(&self, player_id: &str, category: Category) -> ScoreStyle {
        score_style(self.entry(player_id, category), category.max_score())
    }

    // Score write path ------------------------------------------------------

    /// Record a mark for one player's category.
    ///
    /// A write to a game that has not started yet starts it.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::UnknownPlayer`] if no such player is seated and
    /// [`ScoreError::IllegalRewrite`] if the cell is already filled or the
    /// game has ended. A rejected write leaves the state untouched.
    pub fn record_score(
        &mut self,
        player_id: &str,
        category: Category,
        mark: Mark,
    ) -> Result<(), ScoreError> {
        if self.is_ended() {
            debug!("rejected {category} for {player_id}: game has ended");
            return Err(ScoreError::IllegalRewrite {
                player_id: player_id.to_string(),
                category,
                reason: RewriteReason::GameEnded,
            });
        }
        let Some(idx) = self.player_index(player_id) else {
            return Err(ScoreError::UnknownPlayer(player_id.to_string()));
        };
        if let Err(reason) = self.players[idx].scores.record(category, mark) {
            debug!("rejected {category} for {player_id}: {reason}");
            return Err(ScoreError::IllegalRewrite {
                player_id: player_id.to_string(),
                category,
                reason,
            });
        }
        if self.phase == GamePhase::NotStarted {
            self.start();
        }
        self.refresh_completion();
        debug!(
            "recorded {category} = {} for {player_id} (complete: {})",
            ScoreEntry::from(mark),
            self.complete
        );
        Ok(())
    }

    /// Record a mark addressing the category by its string id.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::UnknownCategory`] if the id does not name a
    /// category, otherwise the errors of [`GameState::record_score`].
    pub fn record_score_by_id(
        &mut self,
        player_id: &str,
        category_id: &str,
        mark: Mark,
    ) -> Result<(), ScoreError> {
        let category: Category = category_id.parse()?;
        self.record_score(player_id, category, mark)
    }

    // Lifecycle -------------------------------------------------------------

    /// Move to `InProgress`. Idempotent while already in progress.
    pub fn start(&mut self) {
        if self.phase == GamePhase::InProgress {
            return;
        }
        info!(
            "game started with {} player(s) (was {:?})",
            self.players.len(),
            self.phase
        );
        self.phase = GamePhase::InProgress;
    }

    /// End the game and hand the standings to `history`.
    ///
    /// If every player's grand total is zero the game is treated as abandoned:
    /// the phase still moves to `Ended` but nothing is committed. Calling this
    /// on a game that never started ends it the same way; calling it on an
    /// ended game is a no-op.
    ///
    /// The zero check and the commit both read the same standings snapshot,
    /// and `&mut self` keeps score writes out until the call returns.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's error if the commit fails; the phase is left
    /// unchanged so the caller can retry.
    pub fn end<H>(&mut self, history: &mut H) -> Result<EndOutcome, H::Error>
    where
        H: GameHistory + ?Sized,
    {
        match self.phase {
            GamePhase::Ended => {
                warn!("end requested for a game that already ended");
                return Ok(EndOutcome::AlreadyEnded);
            }
            GamePhase::NotStarted => warn!("ending a game that was never started"),
            GamePhase::InProgress => {}
        }

        let result = GameResult::new(self.leaderboard(), self.complete);
        if result.standings.all_zero() {
            self.phase = GamePhase::Ended;
            info!("game ended with all-zero totals; history commit skipped");
            return Ok(EndOutcome::Discarded(result));
        }

        history.commit(&result)?;
        self.phase = GamePhase::Ended;
        let winner = result.winner.as_ref().map(|entry| &entry.player_name);
        info!("game ended and committed; winner {winner:?}");
        Ok(EndOutcome::Committed(result))
    }

    /// Back to `NotStarted` with every scorecard cleared. Names and ids stay.
    pub fn reset(&mut self) {
        for player in &mut self.players {
            player.reset_scores();
        }
        self.phase = GamePhase::NotStarted;
        self.refresh_completion();
        info!("game reset; {} player(s) kept", self.players.len());
    }

    // Roster ----------------------------------------------------------------

    /// Seat a new player at the end of the roster.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::RosterLocked`] while a game is in progress,
    /// [`RosterError::EmptyName`] for a blank name and
    /// [`RosterError::DuplicatePlayer`] if the id is taken.
    pub fn add_player(
        &mut self,
        player_id: impl Into<PlayerId>,
        name: &str,
    ) -> Result<&Player, RosterError> {
        if self.phase == GamePhase::InProgress {
            return Err(RosterError::RosterLocked);
        }
        let player_id = player_id.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        if self.player_index(player_id.as_str()).is_some() {
            return Err(RosterError::DuplicatePlayer(player_id.to_string()));
        }
        debug!("seating player {player_id} ({name})");
        self.players.push(Player::new(player_id, name));
        self.refresh_completion();
        let idx = self.players.len() - 1;
        Ok(&self.players[idx])
    }

    /// Remove a player and their scorecard.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::RosterLocked`] while a game is in progress and
    /// [`RosterError::UnknownPlayer`] if no such player is seated.
    pub fn remove_player(&mut self, player_id: &str) -> Result<Player, RosterError> {
        if self.phase == GamePhase::InProgress {
            return Err(RosterError::RosterLocked);
        }
        let idx = self
            .player_index(player_id)
            .ok_or_else(|| RosterError::UnknownPlayer(player_id.to_string()))?;
        let removed = self.players.remove(idx);
        self.refresh_completion();
        debug!("removed player {player_id}");
        Ok(removed)
    }

    /// Change a player's display name; allowed in every phase.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::EmptyName`] for a blank name and
    /// [`RosterError::UnknownPlayer`] if no such player is seated.
    pub fn rename_player(&mut self, player_id: &str, name: &str) -> Result<(), RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        let idx = self
            .player_index(player_id)
            .ok_or_else(|| RosterError::UnknownPlayer(player_id.to_string()))?;
        name.clone_into(&mut self.players[idx].name);
        Ok(())
    }

    fn player_index(&self, player_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id.as_str() == player_id)
    }

    fn refresh_completion(&mut self) {
        self.complete = is_game_complete(&self.players);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistory;

    fn seated(ids: &[&str]) -> GameState {
        let mut state = GameState::new();
        for id in ids {
            state.add_player(*id, &id.to_uppercase()).unwrap();
        }
        state
    }

    fn fill(state: &mut GameState, player_id: &str, mark: Mark) {
        for category in Category::ALL {
            state.record_score(player_id, category, mark).unwrap();
        }
    }

    #[test]
    fn new_state_is_not_started_and_incomplete() {
        let state = GameState::new();
        assert_eq!(state.phase(), GamePhase::NotStarted);
        assert!(!state.is_complete());
        assert!(state.leaderboard().is_empty());
        assert!(state.winner().is_none());
    }

    #[test]
    fn start_is_idempotent_and_reopens_ended_games() {
        let mut state = seated(&["p1"]);
        state.start();
        state.start();
        assert_eq!(state.phase(), GamePhase::InProgress);
        state.end(&mut MemoryHistory::new()).unwrap();
        assert!(state.is_ended());
        state.start();
        assert_eq!(state.phase(), GamePhase::InProgress);
    }

    #[test]
    fn first_write_starts_the_game() {
        let mut state = seated(&["p1"]);
        state
            .record_score("p1", Category::Chance, Mark::Points(20))
            .unwrap();
        assert_eq!(state.phase(), GamePhase::InProgress);
    }

    #[test]
    fn second_write_is_rejected_and_first_value_kept() {
        let mut state = seated(&["p1"]);
        state
            .record_score("p1", Category::Fives, Mark::Points(15))
            .unwrap();
        let err = state
            .record_score("p1", Category::Fives, Mark::Points(25))
            .unwrap_err();
        assert_eq!(
            err,
            ScoreError::IllegalRewrite {
                player_id: "p1".to_string(),
                category: Category::Fives,
                reason: RewriteReason::AlreadyRecorded,
            }
        );
        assert_eq!(state.entry("p1", Category::Fives), ScoreEntry::Points(15));
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let mut state = seated(&["p1"]);
        assert_eq!(
            state.record_score_by_id("p1", "bogus", Mark::Crossed),
            Err(ScoreError::UnknownCategory("bogus".to_string()))
        );
        assert_eq!(
            state.record_score("ghost", Category::Ones, Mark::Crossed),
            Err(ScoreError::UnknownPlayer("ghost".to_string()))
        );
        assert_eq!(state.phase(), GamePhase::NotStarted);
        state
            .record_score_by_id("p1", "large_straight", Mark::Points(40))
            .unwrap();
        assert_eq!(
            state.entry("p1", Category::LargeStraight),
            ScoreEntry::Points(40)
        );
    }

    #[test]
    fn writes_after_end_are_rejected() {
        let mut state = seated(&["p1"]);
        state
            .record_score("p1", Category::Ones, Mark::Points(3))
            .unwrap();
        state.end(&mut MemoryHistory::new()).unwrap();
        let err = state
            .record_score("p1", Category::Twos, Mark::Points(4))
            .unwrap_err();
        assert!(matches!(
            err,
            ScoreError::IllegalRewrite {
                reason: RewriteReason::GameEnded,
                ..
            }
        ));
        assert_eq!(state.entry("p1", Category::Twos), ScoreEntry::Unset);
    }

    #[test]
    fn completion_flag_tracks_writes() {
        let mut state = seated(&["p1", "p2"]);
        fill(&mut state, "p1", Mark::Points(2));
        assert!(!state.is_complete());
        assert!(state.winner().is_none());
        fill(&mut state, "p2", Mark::Points(1));
        assert!(state.is_complete());
        assert_eq!(state.winner().unwrap().player_id.as_str(), "p1");
    }

    #[test]
    fn all_zero_game_is_discarded() {
        let mut state = seated(&["p1"]);
        for (idx, category) in Category::ALL.into_iter().enumerate() {
            let mark = if idx % 3 == 0 {
                Mark::Points(0)
            } else {
                Mark::Crossed
            };
            state.record_score("p1", category, mark).unwrap();
        }
        let mut history = MemoryHistory::new();
        let outcome = state.end(&mut history).unwrap();
        assert!(matches!(outcome, EndOutcome::Discarded(_)));
        assert!(state.is_ended());
        assert!(history.is_empty());
    }

    #[test]
    fn scored_game_is_committed_once() {
        let mut state = seated(&["p1", "p2"]);
        state
            .record_score("p2", Category::Yahtzee, Mark::Points(50))
            .unwrap();
        let mut history = MemoryHistory::new();
        let outcome = state.end(&mut history).unwrap();
        assert!(outcome.committed());
        assert_eq!(history.len(), 1);
        let record = history.last().unwrap();
        assert_eq!(record.ranking.leader().unwrap().player_id.as_str(), "p2");
        assert!(record.winner().is_none());

        assert_eq!(state.end(&mut history).unwrap(), EndOutcome::AlreadyEnded);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn ending_an_unstarted_game_forces_ended() {
        let mut state = seated(&["p1"]);
        let outcome = state.end(&mut MemoryHistory::new()).unwrap();
        assert!(matches!(outcome, EndOutcome::Discarded(_)));
        assert_eq!(state.phase(), GamePhase::Ended);
    }

    #[test]
    fn reset_clears_scores_and_keeps_roster() {
        let mut state = seated(&["p1", "p2"]);
        fill(&mut state, "p1", Mark::Points(4));
        fill(&mut state, "p2", Mark::Crossed);
        state.end(&mut MemoryHistory::new()).unwrap();
        state.reset();
        assert_eq!(state.phase(), GamePhase::NotStarted);
        assert!(!state.is_complete());
        assert!(state.players().iter().all(|p| p.scores.is_empty()));
        let names: Vec<&str> = state.players().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["P1", "P2"]);
    }

    #[test]
    fn roster_is_locked_during_play() {
        let mut state = seated(&["p1"]);
        assert_eq!(
            state.add_player("p1", "Dup").unwrap_err(),
            RosterError::DuplicatePlayer("p1".to_string())
        );
        assert_eq!(
            state.add_player("p2", "   ").unwrap_err(),
            RosterError::EmptyName
        );
        state.start();
        assert_eq!(
            state.add_player("p2", "Bo").unwrap_err(),
            RosterError::RosterLocked
        );
        assert_eq!(
            state.remove_player("p1").unwrap_err(),
            RosterError::RosterLocked
        );
        state.rename_player("p1", " Ada ").unwrap();
        assert_eq!(state.player("p1").unwrap().name, "Ada");
        state.reset();
        let removed = state.remove_player("p1").unwrap();
        assert_eq!(removed.id.as_str(), "p1");
        assert!(state.players().is_empty());
    }

    #[test]
    fn cell_style_reads_current_entry() {
        let mut state = seated(&["p1"]);
        assert_eq!(state.cell_style("p1", Category::Sixes), ScoreStyle::Empty);
        state
            .record_score("p1", Category::Sixes, Mark::Crossed)
            .unwrap();
        assert_eq!(state.cell_style("p1", Category::Sixes), ScoreStyle::Crossed);
        state
            .record_score("p1", Category::Yahtzee, Mark::Points(50))
            .unwrap();
        assert_eq!(state.cell_style("p1", Category::Yahtzee), ScoreStyle::Max);
    }

    #[test]
    fn deserialized_state_recomputes_completion() {
        let mut state = seated(&["p1"]);
        fill(&mut state, "p1", Mark::Points(1));
        let json = serde_json::to_string(&state).unwrap();
        assert!(!json.contains("complete"));
        let restored: GameState = serde_json::from_str(&json).unwrap();
        assert!(restored.is_complete());
        assert_eq!(restored, state);
    }

    #[test]
    fn unfinished_game_commits_without_a_winner() {
        let mut state = seated(&["p1", "p2"]);
        state
            .record_score("p1", Category::Chance, Mark::Points(21))
            .unwrap();
        assert!(!state.is_complete());
        let mut history = MemoryHistory::new();
        let outcome = state.end(&mut history).unwrap();
        let result = outcome.result().unwrap();
        assert!(result.winner.is_none());
        assert_eq!(result.standings.leader().unwrap().player_id.as_str(), "p1");
        assert!(state.winner().is_none());
        assert!(history.last().unwrap().winner().is_none());
    }

    #[test]
    fn finished_game_commits_its_winner() {
        let mut state = seated(&["p1", "p2"]);
        fill(&mut state, "p1", Mark::Points(1));
        fill(&mut state, "p2", Mark::Points(2));
        let mut history = MemoryHistory::new();
        state.end(&mut history).unwrap();
        let recorded = history.last().unwrap().winner().cloned();
        assert_eq!(recorded, state.winner());
        assert_eq!(recorded.unwrap().player_id.as_str(), "p2");
    }

    #[test]
    fn removing_the_unfinished_player_completes_the_game() {
        let mut state = seated(&["p1", "p2"]);
        fill(&mut state, "p1", Mark::Points(3));
        state
            .record_score("p2", Category::Ones, Mark::Points(1))
            .unwrap();
        state.end(&mut MemoryHistory::new()).unwrap();
        assert!(state.is_ended());
        assert!(!state.is_complete());

        state.remove_player("p2").unwrap();
        assert!(state.is_complete());
        assert_eq!(state.winner().unwrap().player_id.as_str(), "p1");

        state.add_player("p3", "Cy").unwrap();
        assert!(!state.is_complete());
    }

    #[test]
    fn duplicate_ids_in_saved_state_are_rejected() {
        let json = r#"{
            "players": [
                {"id": "p1", "name": "Ada"},
                {"id": "p1", "name": "Bo"}
            ],
            "phase": "in_progress"
        }"#;
        let err = serde_json::from_str::<GameState>(json).unwrap_err();
        assert!(err.to_string().contains("p1"), "{err}");
    }
}
