pub mod dice;
pub mod policy;
pub mod reports;
pub mod seeds;
pub mod simulation;
pub mod tester;

pub use policy::ScoringStrategy;
pub use seeds::{SeedInfo, resolve_seed_inputs};
pub use simulation::{DEFAULT_SEATS, GameTester, SimulationPlan, SimulationSummary};
pub use tester::*;
