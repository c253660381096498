//! The planning graph: alternating action and proposition layers grown level by
//! level from a state, the mutex relations between them, and the heuristics and
//! solver built on top.

pub mod heuristic;
pub mod layer;
pub mod level;
pub mod planning_graph;
pub mod solver;

pub use heuristic::{level_sum, max_level, null_heuristic, Estimate, Heuristic, HeuristicConfig};
pub use layer::{ActionLayer, MutexSet, PropositionLayer};
pub use level::PlanGraphLevel;
pub use planning_graph::{Expansion, PlanningGraph};
pub use solver::GraphPlan;
