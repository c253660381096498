//! Propositional STRIPS planning with planning graphs.
//!
//! [`strips`] holds the domain model and its text format, [`graph`] builds planning
//! graphs with action and proposition mutexes and derives the max-level and
//! level-sum heuristics from them, [`problem`] wraps a domain with its initial and
//! goal states for forward search, and [`search`] runs A* over it.

pub mod graph;
pub mod problem;
pub mod search;
pub mod strips;

pub use graph::{Estimate, Expansion, GraphPlan, Heuristic, HeuristicConfig, PlanningGraph};
pub use problem::PlanningProblem;
pub use search::{astar, SearchConfig, SearchProblem};
pub use strips::{Action, ActionId, Domain, Proposition, State};
