use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tally_game::{Category, Mark, Player, remaining_categories};

use crate::logic::dice::Hand;

/// Cell chosen by a [`ScoringPolicy`] for the hand just rolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyDecision {
    pub category: Category,
    pub mark: Mark,
}

impl PolicyDecision {
    #[must_use]
    pub const fn new(category: Category, mark: Mark) -> Self {
        Self { category, mark }
    }
}

/// Policy interface for automated scorekeeping.
pub trait ScoringPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Pick an open category for `hand`. Returns `None` once the card is full.
    fn pick_cell(&mut self, player: &Player, hand: &Hand) -> Option<PolicyDecision>;
}

/// Built-in scoring strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScoringStrategy {
    Greedy,
    UpperFirst,
    Random,
    Forfeit,
}

impl ScoringStrategy {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ScoringStrategy::Greedy => "Greedy",
            ScoringStrategy::UpperFirst => "Upper First",
            ScoringStrategy::Random => "Random",
            ScoringStrategy::Forfeit => "Forfeit",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn ScoringPolicy + Send> {
        match self {
            ScoringStrategy::Greedy => Box::new(GreedyPolicy),
            ScoringStrategy::UpperFirst => Box::new(UpperFirstPolicy),
            ScoringStrategy::Random => Box::new(RandomPolicy::new(seed)),
            ScoringStrategy::Forfeit => Box::new(ForfeitPolicy),
        }
    }
}

impl fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct GreedyPolicy;
struct UpperFirstPolicy;
struct ForfeitPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

/// Highest-scoring open category. A hand worth nothing anywhere crosses out
/// the open category with the lowest ceiling.
fn greedy_pick(player: &Player, hand: &Hand) -> Option<PolicyDecision> {
    let open: Vec<Category> = remaining_categories(player).collect();
    let best = open
        .iter()
        .copied()
        .map(|category| (category, hand.score(category)))
        .filter(|(_, points)| *points > 0)
        .max_by_key(|(category, points)| (*points, std::cmp::Reverse(*category)));
    if let Some((category, points)) = best {
        return Some(PolicyDecision::new(category, Mark::Points(points)));
    }
    open.into_iter()
        .min_by_key(|category| category.max_score())
        .map(|category| PolicyDecision::new(category, Mark::Crossed))
}

impl ScoringPolicy for GreedyPolicy {
    fn name(&self) -> &'static str {
        "Greedy"
    }

    fn pick_cell(&mut self, player: &Player, hand: &Hand) -> Option<PolicyDecision> {
        greedy_pick(player, hand)
    }
}

impl ScoringPolicy for UpperFirstPolicy {
    fn name(&self) -> &'static str {
        "Upper First"
    }

    fn pick_cell(&mut self, player: &Player, hand: &Hand) -> Option<PolicyDecision> {
        let face = hand.most_common_face();
        let upper = remaining_categories(player).find(|category| category.face() == Some(face));
        match upper {
            Some(category) => Some(PolicyDecision::new(
                category,
                Mark::Points(hand.score(category)),
            )),
            None => greedy_pick(player, hand),
        }
    }
}

impl ScoringPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn pick_cell(&mut self, player: &Player, hand: &Hand) -> Option<PolicyDecision> {
        let open: Vec<Category> = remaining_categories(player).collect();
        if open.is_empty() {
            return None;
        }
        let category = open[self.rng.gen_range(0..open.len())];
        Some(PolicyDecision::new(
            category,
            Mark::Points(hand.score(category)),
        ))
    }
}

impl ScoringPolicy for ForfeitPolicy {
    fn name(&self) -> &'static str {
        "Forfeit"
    }

    fn pick_cell(&mut self, player: &Player, _hand: &Hand) -> Option<PolicyDecision> {
        remaining_categories(player)
            .next()
            .map(|category| PolicyDecision::new(category, Mark::Crossed))
    }
}
