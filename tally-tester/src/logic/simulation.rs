use anyhow::Result;
use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::sync::Arc;
use tally_game::constants::CATEGORY_COUNT;
use tally_game::{EndOutcome, GameState, MemoryHistory, ScoreError};

use crate::logic::dice::{Hand, roll_turn};
use crate::logic::policy::{PolicyDecision, ScoringPolicy, ScoringStrategy};

/// Seats used when a plan does not pin its roster.
pub const DEFAULT_SEATS: usize = 2;

/// Snapshot of one scored turn.
#[derive(Debug, Clone)]
pub struct TurnRecord {
    pub round: usize,
    pub player_id: String,
    pub policy_name: &'static str,
    pub hand: Hand,
    pub decision: PolicyDecision,
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Roster, strategies and checks for one simulated game.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    /// Strategy per seat; cycled when the roster is resized.
    pub strategies: Vec<ScoringStrategy>,
    pub seats: usize,
    /// When set, `--players` does not resize this plan.
    pub roster_fixed: bool,
    pub end_game: bool,
    pub setup: Option<fn(&mut GameState)>,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(strategies: &[ScoringStrategy]) -> Self {
        Self {
            strategies: strategies.to_vec(),
            seats: strategies.len(),
            roster_fixed: false,
            end_game: true,
            setup: None,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_seats(mut self, seats: usize) -> Self {
        self.seats = seats;
        self
    }

    #[must_use]
    pub const fn with_fixed_roster(mut self) -> Self {
        self.roster_fixed = true;
        self
    }

    #[must_use]
    pub const fn without_end(mut self) -> Self {
        self.end_game = false;
        self
    }

    #[must_use]
    pub fn with_setup(mut self, setup: fn(&mut GameState)) -> Self {
        self.setup = Some(setup);
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }

    /// Copy of the plan seated for `players`, unless the roster is pinned.
    #[must_use]
    pub fn resized(&self, players: Option<usize>) -> Self {
        match players {
            Some(seats) if !self.roster_fixed => self.clone().with_seats(seats),
            _ => self.clone(),
        }
    }

    fn strategy_for_seat(&self, seat: usize) -> ScoringStrategy {
        if self.strategies.is_empty() {
            return ScoringStrategy::Greedy;
        }
        self.strategies[seat % self.strategies.len()]
    }
}

/// Complete record of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategies: Vec<ScoringStrategy>,
    pub turns: Vec<TurnRecord>,
    pub rejected: Vec<ScoreError>,
    pub final_state: GameState,
    pub outcome: Option<EndOutcome>,
    pub history: MemoryHistory,
}

impl SimulationSummary {
    #[must_use]
    pub fn committed(&self) -> bool {
        self.outcome.as_ref().is_some_and(EndOutcome::committed)
    }
}

/// Headless deterministic runner for the scoring engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameTester {
    verbose: bool,
}

impl GameTester {
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Seat the plan's roster and play every round with seeded dice.
    #[must_use]
    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> SimulationSummary {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut state = GameState::new();
        let mut strategies = Vec::with_capacity(plan.seats);
        let mut policies: Vec<Box<dyn ScoringPolicy + Send>> = Vec::with_capacity(plan.seats);

        for seat in 0..plan.seats {
            let strategy = plan.strategy_for_seat(seat);
            let id = format!("p{}", seat + 1);
            let name = format!("{} #{}", strategy.label(), seat + 1);
            if let Err(err) = state.add_player(id.as_str(), &name) {
                debug!("could not seat {id}: {err}");
                continue;
            }
            strategies.push(strategy);
            let policy_seed = seed.wrapping_add(u64::try_from(seat).unwrap_or(u64::MAX));
            policies.push(strategy.create_policy(policy_seed));
        }

        if let Some(setup) = plan.setup {
            setup(&mut state);
        }

        let mut turns = Vec::new();
        let mut rejected = Vec::new();
        for round in 1..=CATEGORY_COUNT {
            for (seat, policy) in policies.iter_mut().enumerate() {
                let Some(player) = state.players().get(seat) else {
                    continue;
                };
                let player_id = player.id.to_string();
                let hand = roll_turn(&mut rng);
                let Some(decision) = policy.pick_cell(player, &hand) else {
                    continue;
                };
                match state.record_score(&player_id, decision.category, decision.mark) {
                    Ok(()) => turns.push(TurnRecord {
                        round,
                        player_id,
                        policy_name: policy.name(),
                        hand,
                        decision,
                    }),
                    Err(err) => {
                        debug!("round {round}: {err}");
                        rejected.push(err);
                    }
                }
            }
        }

        let mut history = MemoryHistory::new();
        let outcome = if plan.end_game {
            let Ok(outcome) = state.end(&mut history);
            Some(outcome)
        } else {
            None
        };

        if self.verbose {
            println!(
                "    seed {seed}: {} turns, {} rejected, phase {:?}",
                turns.len(),
                rejected.len(),
                state.phase()
            );
        }

        SimulationSummary {
            seed,
            strategies,
            turns,
            rejected,
            final_state: state,
            outcome,
            history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_game::GamePhase;

    #[test]
    fn greedy_game_fills_every_card_and_commits() {
        let plan = SimulationPlan::new(&[ScoringStrategy::Greedy, ScoringStrategy::Greedy]);
        let summary = GameTester::new(false).run_plan(&plan, 1337);
        assert!(summary.final_state.is_complete());
        assert_eq!(summary.turns.len(), 2 * CATEGORY_COUNT);
        assert!(summary.rejected.is_empty());
        assert_eq!(summary.final_state.phase(), GamePhase::Ended);
        assert!(summary.committed());
        assert_eq!(summary.history.len(), 1);
    }

    #[test]
    fn runs_are_deterministic_per_seed() {
        let plan = SimulationPlan::new(&[ScoringStrategy::Random, ScoringStrategy::UpperFirst]);
        let tester = GameTester::new(false);
        let a = tester.run_plan(&plan, 42);
        let b = tester.run_plan(&plan, 42);
        assert_eq!(a.final_state, b.final_state);
        assert_eq!(a.final_state.leaderboard(), b.final_state.leaderboard());
    }

    #[test]
    fn resized_respects_fixed_roster() {
        let plan = SimulationPlan::new(&[ScoringStrategy::Greedy]);
        assert_eq!(plan.resized(Some(4)).seats, 4);
        assert_eq!(plan.resized(None).seats, 1);
        let fixed = plan.with_fixed_roster();
        assert_eq!(fixed.resized(Some(4)).seats, 1);
    }

    #[test]
    fn strategies_cycle_across_seats() {
        let plan =
            SimulationPlan::new(&[ScoringStrategy::Greedy, ScoringStrategy::Forfeit]).with_seats(3);
        let summary = GameTester::new(false).run_plan(&plan, 5);
        assert_eq!(
            summary.strategies,
            vec![
                ScoringStrategy::Greedy,
                ScoringStrategy::Forfeit,
                ScoringStrategy::Greedy
            ]
        );
        let p2 = summary.final_state.breakdown("p2").unwrap();
        assert_eq!(p2.grand_total, 0);
    }

    #[test]
    fn unended_plan_leaves_game_in_progress() {
        let plan = SimulationPlan::new(&[ScoringStrategy::Greedy]).without_end();
        let summary = GameTester::new(false).run_plan(&plan, 3);
        assert!(summary.outcome.is_none());
        assert_eq!(summary.final_state.phase(), GamePhase::InProgress);
        assert!(summary.history.is_empty());
    }
}
