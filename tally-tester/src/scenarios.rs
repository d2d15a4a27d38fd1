//! Scenario catalog for the logic tester.
use anyhow::{Result, ensure};
use tally_game::{
    Category, EndOutcome, GamePhase, GameState, Mark, MemoryHistory, RewriteReason, ScoreEntry,
    ScoreError,
};

use crate::logic::{DEFAULT_SEATS, ScoringStrategy, SimulationPlan, SimulationSummary};

/// Named plan the tester can run.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub key: String,
    pub name: String,
    pub description: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        plan: SimulationPlan,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: description.into(),
            plan,
        }
    }
}

pub fn catalog() -> Vec<TestScenario> {
    vec![
        TestScenario::new(
            "smoke",
            "Smoke",
            "Greedy players fill their cards; totals, winner and history agree",
            SimulationPlan::new(&[ScoringStrategy::Greedy; DEFAULT_SEATS])
                .with_expectation(completed_and_committed)
                .with_expectation(grand_totals_add_up)
                .with_expectation(winner_matches_history),
        ),
        TestScenario::new(
            "tie-break",
            "Tie Break",
            "Equal grand totals are ordered by upper-section total",
            SimulationPlan::new(&[])
                .with_fixed_roster()
                .with_expectation(tie_breaks_on_upper_section),
        ),
        TestScenario::new(
            "discard-all-zero",
            "Discard All Zero",
            "A game where everyone crosses every cell ends without a history commit",
            SimulationPlan::new(&[ScoringStrategy::Forfeit; 3])
                .with_expectation(all_zero_game_is_discarded),
        ),
        TestScenario::new(
            "rewrite-rejected",
            "Rewrite Rejected",
            "Filled cells and ended games refuse further writes",
            SimulationPlan::new(&[ScoringStrategy::Greedy, ScoringStrategy::Random])
                .without_end()
                .with_expectation(filled_cells_reject_rewrites)
                .with_expectation(ended_game_rejects_writes),
        ),
        TestScenario::new(
            "reset-clears",
            "Reset Clears",
            "Reset empties every card but keeps the roster",
            SimulationPlan::new(&[ScoringStrategy::UpperFirst, ScoringStrategy::Random])
                .with_expectation(reset_keeps_roster),
        ),
        TestScenario::new(
            "upper-bonus",
            "Upper Bonus",
            "Upper-first play awards the bonus exactly at the threshold",
            SimulationPlan::new(&[ScoringStrategy::UpperFirst; DEFAULT_SEATS])
                .with_expectation(bonus_follows_threshold)
                .with_expectation(grand_totals_add_up),
        ),
        TestScenario::new(
            "random-roster",
            "Random Roster",
            "Randomly scored games produce a correctly ordered leaderboard",
            SimulationPlan::new(&[ScoringStrategy::Random; 4])
                .with_expectation(leaderboard_is_ordered)
                .with_expectation(completed_and_committed),
        ),
        TestScenario::new(
            "prefilled-cell",
            "Prefilled Cell",
            "A cell recorded before play is kept and never offered again",
            SimulationPlan::new(&[ScoringStrategy::Greedy; DEFAULT_SEATS])
                .with_setup(prefill_first_yahtzee)
                .with_expectation(prefilled_cell_is_kept)
                .with_expectation(completed_and_committed),
        ),
        TestScenario::new(
            "empty-roster",
            "Empty Roster",
            "A table with no players is never complete and has no winner",
            SimulationPlan::new(&[])
                .with_fixed_roster()
                .with_expectation(empty_roster_has_no_winner),
        ),
    ]
}

pub fn list_scenarios() -> Vec<(String, String)> {
    catalog()
        .into_iter()
        .map(|scenario| (scenario.key, scenario.description))
        .collect()
}

pub fn scenario_keys() -> Vec<String> {
    catalog().into_iter().map(|scenario| scenario.key).collect()
}

pub fn get_scenario(key: &str) -> Option<TestScenario> {
    catalog()
        .into_iter()
        .find(|scenario| scenario.key.eq_ignore_ascii_case(key))
}

fn completed_and_committed(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.final_state.is_complete(),
        "game should be complete after every round"
    );
    ensure!(summary.rejected.is_empty(), "unexpected rejected writes");
    ensure!(summary.committed(), "scored game should be committed");
    ensure!(
        summary.history.len() == 1,
        "expected one history record, found {}",
        summary.history.len()
    );
    Ok(())
}

fn grand_totals_add_up(summary: &SimulationSummary) -> Result<()> {
    for player in summary.final_state.players() {
        let Some(b) = summary.final_state.breakdown(player.id.as_str()) else {
            anyhow::bail!("no breakdown for {}", player.id);
        };
        ensure!(
            b.grand_total == b.upper_total + b.upper_bonus + b.lower_total,
            "{}: {} != {} + {} + {}",
            player.id,
            b.grand_total,
            b.upper_total,
            b.upper_bonus,
            b.lower_total
        );
    }
    Ok(())
}

fn winner_matches_history(summary: &SimulationSummary) -> Result<()> {
    let winner = summary.final_state.winner();
    let leader = summary.final_state.leaderboard().leader().cloned();
    ensure!(
        winner == leader,
        "winner {winner:?} is not leader {leader:?}"
    );
    let recorded = summary
        .history
        .last()
        .and_then(|record| record.winner())
        .cloned();
    ensure!(
        recorded == winner,
        "history winner {recorded:?} differs from {winner:?}"
    );
    Ok(())
}

fn tie_breaks_on_upper_section(_summary: &SimulationSummary) -> Result<()> {
    let mut state = GameState::new();
    state.add_player("p2", "Lower Heavy")?;
    state.add_player("p1", "Upper Heavy")?;

    // 63 upper + 35 bonus + 22 lower = 120
    for (category, points) in [
        (Category::Threes, 9),
        (Category::Fours, 16),
        (Category::Fives, 20),
        (Category::Sixes, 18),
        (Category::Chance, 22),
    ] {
        state.record_score("p1", category, Mark::Points(points))?;
    }
    // 40 upper + 80 lower = 120
    for (category, points) in [
        (Category::Fives, 10),
        (Category::Sixes, 30),
        (Category::LargeStraight, 40),
        (Category::SmallStraight, 30),
        (Category::Chance, 10),
    ] {
        state.record_score("p2", category, Mark::Points(points))?;
    }
    for id in ["p1", "p2"] {
        for category in Category::ALL {
            if !state.entry(id, category).is_set() {
                state.record_score(id, category, Mark::Crossed)?;
            }
        }
    }

    let board = state.leaderboard();
    let order: Vec<(&str, u32, u32)> = board
        .iter()
        .map(|e| (e.player_id.as_str(), e.total_score, e.upper_section_total))
        .collect();
    ensure!(
        order == vec![("p1", 120, 63), ("p2", 120, 40)],
        "unexpected order {order:?}"
    );
    let winner = state.winner();
    ensure!(
        winner.as_ref().map(|w| w.player_id.as_str()) == Some("p1"),
        "winner should be p1, got {winner:?}"
    );
    Ok(())
}

fn all_zero_game_is_discarded(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        matches!(summary.outcome, Some(EndOutcome::Discarded(_))),
        "all-zero game should be discarded, got {:?}",
        summary.outcome
    );
    ensure!(summary.history.is_empty(), "nothing should be committed");
    ensure!(
        summary.final_state.phase() == GamePhase::Ended,
        "discarded game should still end"
    );
    for player in summary.final_state.players() {
        ensure!(
            Category::ALL
                .iter()
                .all(|c| player.entry(*c) == ScoreEntry::Crossed),
            "{} should have crossed every cell",
            player.id
        );
    }
    Ok(())
}

fn filled_cells_reject_rewrites(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.final_state.phase() == GamePhase::InProgress,
        "game should still be in progress"
    );
    let mut state = summary.final_state.clone();
    for turn in &summary.turns {
        let before = state.entry(&turn.player_id, turn.decision.category);
        let err = state
            .record_score(&turn.player_id, turn.decision.category, Mark::Points(1))
            .err();
        ensure!(
            matches!(
                err,
                Some(ScoreError::IllegalRewrite {
                    reason: RewriteReason::AlreadyRecorded,
                    ..
                })
            ),
            "rewrite of {} for {} was not rejected: {err:?}",
            turn.decision.category,
            turn.player_id
        );
        ensure!(
            state.entry(&turn.player_id, turn.decision.category) == before,
            "rejected rewrite changed the cell"
        );
    }
    Ok(())
}

fn ended_game_rejects_writes(summary: &SimulationSummary) -> Result<()> {
    let mut state = summary.final_state.clone();
    state.reset();
    state.record_score("p1", Category::Chance, Mark::Points(17))?;
    let Ok(_) = state.end(&mut MemoryHistory::new());
    let err = state
        .record_score("p1", Category::Yahtzee, Mark::Points(50))
        .err();
    ensure!(
        matches!(
            err,
            Some(ScoreError::IllegalRewrite {
                reason: RewriteReason::GameEnded,
                ..
            })
        ),
        "write after end should be rejected, got {err:?}"
    );
    ensure!(
        state.entry("p1", Category::Yahtzee) == ScoreEntry::Unset,
        "rejected write leaked into the card"
    );
    Ok(())
}

fn reset_keeps_roster(summary: &SimulationSummary) -> Result<()> {
    let mut state = summary.final_state.clone();
    let names: Vec<String> = state.players().iter().map(|p| p.name.clone()).collect();
    state.reset();
    ensure!(
        state.phase() == GamePhase::NotStarted,
        "reset should restart"
    );
    ensure!(!state.is_complete(), "reset game cannot be complete");
    ensure!(state.winner().is_none(), "reset game has no winner");
    ensure!(
        state.players().iter().all(|p| p.scores.is_empty()),
        "every card should be cleared"
    );
    let after: Vec<String> = state.players().iter().map(|p| p.name.clone()).collect();
    ensure!(after == names, "roster changed across reset");
    ensure!(
        summary.history.len() == 1,
        "reset must not touch committed history"
    );
    Ok(())
}

fn bonus_follows_threshold(summary: &SimulationSummary) -> Result<()> {
    let rules = summary.final_state.rules();
    for player in summary.final_state.players() {
        let Some(b) = summary.final_state.breakdown(player.id.as_str()) else {
            anyhow::bail!("no breakdown for {}", player.id);
        };
        let expected = if b.upper_total >= rules.upper_bonus_threshold {
            rules.upper_bonus
        } else {
            0
        };
        ensure!(
            b.upper_bonus == expected,
            "{}: upper {} gave bonus {}",
            player.id,
            b.upper_total,
            b.upper_bonus
        );
        ensure!(
            b.bonus_shortfall == rules.upper_bonus_threshold.saturating_sub(b.upper_total),
            "{}: shortfall {} is wrong",
            player.id,
            b.bonus_shortfall
        );
    }
    Ok(())
}

fn leaderboard_is_ordered(summary: &SimulationSummary) -> Result<()> {
    let board = summary.final_state.leaderboard();
    ensure!(
        board.len() == summary.final_state.players().len(),
        "leaderboard should list every player"
    );
    for pair in board.ranking.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        ensure!(
            (a.total_score, a.upper_section_total) >= (b.total_score, b.upper_section_total),
            "{} ranked above {}",
            a.player_id,
            b.player_id
        );
    }
    Ok(())
}

fn prefill_first_yahtzee(state: &mut GameState) {
    if let Err(err) = state.record_score("p1", Category::Yahtzee, Mark::Points(50)) {
        log::warn!("prefill skipped: {err}");
    }
}

fn prefilled_cell_is_kept(summary: &SimulationSummary) -> Result<()> {
    let state = &summary.final_state;
    ensure!(
        state.entry("p1", Category::Yahtzee) == ScoreEntry::Points(50),
        "prefilled yahtzee was lost"
    );
    let p1_turns = summary.turns.iter().filter(|t| t.player_id == "p1").count();
    ensure!(
        p1_turns == Category::ALL.len() - 1,
        "p1 should play the remaining {} cells, played {p1_turns}",
        Category::ALL.len() - 1
    );
    Ok(())
}

fn empty_roster_has_no_winner(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        !summary.final_state.is_complete(),
        "an empty table is never complete"
    );
    ensure!(
        summary.final_state.winner().is_none(),
        "an empty table has no winner"
    );
    ensure!(
        matches!(
            &summary.outcome,
            Some(EndOutcome::Discarded(result)) if result.standings.is_empty()
        ),
        "ending an empty table should discard, got {:?}",
        summary.outcome
    );
    Ok(())
}
