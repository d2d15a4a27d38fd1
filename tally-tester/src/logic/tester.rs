use colored::Colorize;
use log::warn;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tally_game::{EndOutcome, GameHistory, ScoreEntry};

use crate::history_file::JsonHistoryFile;
use crate::logic::simulation::{GameTester, SimulationPlan, SimulationSummary};
use crate::scenarios::TestScenario;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    /// Games whose standings reached the history log.
    pub games_committed: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    verbose: bool,
    players: Option<usize>,
    archive: Option<JsonHistoryFile>,
}

impl LogicTester {
    pub const fn new(verbose: bool) -> Self {
        Self {
            verbose,
            players: None,
            archive: None,
        }
    }

    /// Reseat flexible plans with this many players.
    #[must_use]
    pub const fn with_players(mut self, players: Option<usize>) -> Self {
        self.players = players;
        self
    }

    /// Append every committed game to `archive` as it finishes.
    #[must_use]
    pub fn with_archive(mut self, archive: JsonHistoryFile) -> Self {
        self.archive = Some(archive);
        self
    }

    pub fn archive(&self) -> Option<&JsonHistoryFile> {
        self.archive.as_ref()
    }

    pub fn run_scenario(
        &mut self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let plan = scenario.plan.resized(self.players);
        let mut results = Vec::new();

        for &seed in seeds {
            if self.verbose {
                println!(
                    "🧪 Testing scenario: {} (seats: {} seed: {})",
                    scenario.name.bright_white(),
                    plan.seats,
                    seed
                );
            }

            let result = self.run_single_scenario(&scenario.name, &plan, seed, iterations);
            results.push(result);
        }

        results
    }

    fn run_single_scenario(
        &mut self,
        name: &str,
        plan: &SimulationPlan,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let tester = GameTester::new(self.verbose);

        let mut successes = 0;
        let mut committed = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            let summary = tester.run_plan(plan, iteration_seed);
            if summary.committed() {
                committed += 1;
                self.archive_summary(&summary);
            }

            if let Some(err) = evaluate_expectations(plan, &summary) {
                let context = summarize_turns(&summary);
                failures.push(format!(
                    "Iteration {} (seed {}, seats {}, turns {}, phase {:?}): {} | {} | {}",
                    i + 1,
                    summary.seed,
                    summary.strategies.len(),
                    summary.turns.len(),
                    summary.final_state.phase(),
                    err,
                    summarize_standings(&summary),
                    context
                ));

                if self.verbose {
                    println!(
                        "  ❌ Iteration {}/{} failed: {}",
                        i + 1,
                        iterations,
                        err.clone().red()
                    );
                    println!("     ↳ Last turns: {context}");
                }
            } else {
                successes += 1;
                let duration = start_time.elapsed();
                performance_data.push(duration);

                if self.verbose {
                    println!(
                        "  ✅ Iteration {}/{} passed ({duration:?}) {}",
                        i + 1,
                        iterations,
                        summarize_standings(&summary)
                    );
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: name.to_string(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            games_committed: committed,
            failures,
            average_duration,
            performance_data,
        }
    }

    fn archive_summary(&mut self, summary: &SimulationSummary) {
        let Some(archive) = self.archive.as_mut() else {
            return;
        };
        let Some(result) = summary.outcome.as_ref().and_then(EndOutcome::result) else {
            return;
        };
        if let Err(err) = archive.commit(result) {
            warn!("could not archive game for seed {}: {err}", summary.seed);
        }
    }
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    for expectation in &plan.expectations {
        if let Err(err) = expectation.evaluate(summary) {
            return Some(format!("{err:#}"));
        }
    }
    None
}

fn summarize_turns(summary: &SimulationSummary) -> String {
    if summary.turns.is_empty() {
        return "no turns recorded".to_string();
    }

    summary
        .turns
        .iter()
        .rev()
        .take(3)
        .map(|turn| {
            format!(
                "round {} {} [{}] {:?} -> {} {}",
                turn.round,
                turn.player_id,
                turn.policy_name,
                turn.hand.dice,
                turn.decision.category,
                ScoreEntry::from(turn.decision.mark)
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn summarize_standings(summary: &SimulationSummary) -> String {
    let board = summary.final_state.leaderboard();
    if board.is_empty() {
        return "no players seated".to_string();
    }
    board
        .iter()
        .map(|entry| format!("{} {}", entry.player_name, entry.total_score))
        .collect::<Vec<_>>()
        .join(", ")
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis_vec = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis_vec
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}
