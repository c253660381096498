//! Planning graph heuristics.
//!
//! Both estimators grow a fresh [`PlanningGraph`] from the evaluated state until the
//! goal shows up in the newest level or the graph levels off. A graph that levels
//! off first means the goal is unreachable from that state, reported as
//! [`Estimate::Infinite`] so the search prunes it.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{trace, warn};

use super::planning_graph::{Expansion, PlanningGraph};
use crate::problem::PlanningProblem;
use crate::strips::{Domain, Proposition, State};

/// A heuristic value. `Infinite` orders after every finite value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Estimate {
    Finite(usize),
    Infinite,
}

impl Estimate {
    pub fn is_finite(self) -> bool {
        matches!(self, Estimate::Finite(_))
    }

    /// Adds a path cost, `Infinite` stays infinite.
    pub fn plus(self, cost: usize) -> Estimate {
        match self {
            Estimate::Finite(v) => Estimate::Finite(v.saturating_add(cost)),
            Estimate::Infinite => Estimate::Infinite,
        }
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Estimate::Finite(v) => write!(f, "{}", v),
            Estimate::Infinite => write!(f, "inf"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heuristic {
    /// First level holding every goal.
    MaxLevel,
    /// Sum of the first level of each goal.
    LevelSum,
    /// Always zero, turns A* into uniform cost search.
    Zero,
}

impl std::str::FromStr for Heuristic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "max" => Ok(Heuristic::MaxLevel),
            "sum" => Ok(Heuristic::LevelSum),
            "zero" => Ok(Heuristic::Zero),
            other => Err(format!("unknown heuristic '{}', expected max, sum or zero", other)),
        }
    }
}

/// Which heuristic to evaluate and how to grow its graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeuristicConfig {
    pub heuristic: Heuristic,
    pub expansion: Expansion,
    /// Give up (and report `Infinite`) past this many levels.
    pub max_levels: Option<usize>,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            heuristic: Heuristic::Zero,
            expansion: Expansion::default(),
            max_levels: None,
        }
    }
}

impl HeuristicConfig {
    pub fn new(heuristic: Heuristic) -> Self {
        Self { heuristic, ..Self::default() }
    }

    pub fn estimate(&self, state: &State, problem: &PlanningProblem) -> Estimate {
        let domain = problem.domain();
        let goal = problem.goal();
        match self.heuristic {
            Heuristic::MaxLevel => {
                max_level_with(domain, state, goal, self.expansion, self.max_levels)
            }
            Heuristic::LevelSum => {
                level_sum_with(domain, state, goal, self.expansion, self.max_levels)
            }
            Heuristic::Zero => Estimate::Finite(0),
        }
    }
}

/// Number of levels needed before every goal proposition is present.
pub fn max_level(state: &State, problem: &PlanningProblem) -> Estimate {
    max_level_with(problem.domain(), state, problem.goal(), Expansion::Relaxed, None)
}

/// Sum, over the goal propositions, of the level where each first appears.
pub fn level_sum(state: &State, problem: &PlanningProblem) -> Estimate {
    level_sum_with(problem.domain(), state, problem.goal(), Expansion::Relaxed, None)
}

pub fn null_heuristic(_state: &State, _problem: &PlanningProblem) -> Estimate {
    Estimate::Finite(0)
}

fn out_of_levels(depth: usize, max_levels: Option<usize>) -> bool {
    match max_levels {
        Some(max) if depth >= max => {
            warn!(max, "planning graph level bound reached");
            true
        }
        _ => false,
    }
}

pub fn max_level_with(
    domain: &Domain,
    state: &State,
    goal: &State,
    expansion: Expansion,
    max_levels: Option<usize>,
) -> Estimate {
    let mut graph = PlanningGraph::new(domain, state, expansion);
    loop {
        let depth = graph.depth();
        if graph.goals_reachable(depth, goal) {
            trace!(depth, "max-level");
            return Estimate::Finite(depth);
        }
        if graph.has_leveled_off() || out_of_levels(depth, max_levels) {
            trace!(depth, "max-level: goal unreachable");
            return Estimate::Infinite;
        }
        graph.expand_next();
    }
}

pub fn level_sum_with(
    domain: &Domain,
    state: &State,
    goal: &State,
    expansion: Expansion,
    max_levels: Option<usize>,
) -> Estimate {
    let mut graph = PlanningGraph::new(domain, state, expansion);
    let mut first_appearances: BTreeMap<&Proposition, usize> = BTreeMap::new();
    loop {
        let depth = graph.depth();
        let layer = graph.last().proposition_layer();
        for prop in goal {
            if !first_appearances.contains_key(prop) && layer.contains(prop) {
                first_appearances.insert(prop, depth);
            }
        }
        if first_appearances.len() == goal.len() {
            let sum = first_appearances.values().sum();
            trace!(depth, sum, "level-sum");
            return Estimate::Finite(sum);
        }
        if graph.has_leveled_off() || out_of_levels(depth, max_levels) {
            trace!(depth, "level-sum: goal unreachable");
            return Estimate::Infinite;
        }
        graph.expand_next();
    }
}

#[cfg(test)]
mod tests {
    use super::{level_sum_with, max_level_with, Estimate, Heuristic};
    use crate::graph::planning_graph::Expansion;
    use crate::strips::proposition::state;
    use crate::strips::Domain;

    const CHAIN: &str = "Propositions:\nA B C D\nActions:\n\
        Name: ab\npre: A\nadd: B\ndelete: A\n\
        Name: bc\npre: B\nadd: C\ndelete: B\n";

    #[test]
    fn test_estimate_ordering() {
        assert!(Estimate::Finite(usize::MAX) < Estimate::Infinite);
        assert!(Estimate::Finite(1) < Estimate::Finite(2));
        assert_eq!(Estimate::Finite(2).plus(3), Estimate::Finite(5));
        assert_eq!(Estimate::Infinite.plus(3), Estimate::Infinite);
        assert_eq!(Estimate::Finite(usize::MAX).plus(1), Estimate::Finite(usize::MAX));
        assert_eq!(format!("{}", Estimate::Infinite), "inf");
    }

    #[test]
    fn test_max_level_and_level_sum() {
        let domain = Domain::parse(CHAIN).unwrap();
        let start = state(vec!["A"]);
        let goal = state(vec!["B", "C"]);
        assert_eq!(
            max_level_with(&domain, &start, &goal, Expansion::Relaxed, None),
            Estimate::Finite(2)
        );
        assert_eq!(
            level_sum_with(&domain, &start, &goal, Expansion::Relaxed, None),
            Estimate::Finite(3)
        );
    }

    #[test]
    fn test_goal_already_true() {
        let domain = Domain::parse(CHAIN).unwrap();
        let start = state(vec!["A"]);
        assert_eq!(
            max_level_with(&domain, &start, &start, Expansion::Relaxed, None),
            Estimate::Finite(0)
        );
        assert_eq!(
            level_sum_with(&domain, &start, &start, Expansion::Relaxed, None),
            Estimate::Finite(0)
        );
    }

    #[test]
    fn test_unreachable_goal_is_infinite() {
        let domain = Domain::parse(CHAIN).unwrap();
        let start = state(vec!["A"]);
        let goal = state(vec!["C", "D"]);
        assert_eq!(
            max_level_with(&domain, &start, &goal, Expansion::Relaxed, None),
            Estimate::Infinite
        );
        assert_eq!(
            level_sum_with(&domain, &start, &goal, Expansion::Relaxed, None),
            Estimate::Infinite
        );
        assert_eq!(
            max_level_with(&domain, &start, &goal, Expansion::Mutex, None),
            Estimate::Infinite
        );
    }

    #[test]
    fn test_mutex_graph_delays_max_level() {
        let domain = Domain::parse(CHAIN).unwrap();
        let start = state(vec!["A"]);
        // A and B can never hold together once A is gone
        let goal = state(vec!["A", "B"]);
        assert_eq!(
            max_level_with(&domain, &start, &goal, Expansion::Relaxed, None),
            Estimate::Finite(1)
        );
        assert_eq!(
            max_level_with(&domain, &start, &goal, Expansion::Mutex, None),
            Estimate::Infinite
        );
    }

    #[test]
    fn test_level_bound() {
        let domain = Domain::parse(CHAIN).unwrap();
        let start = state(vec!["A"]);
        let goal = state(vec!["C"]);
        assert_eq!(
            max_level_with(&domain, &start, &goal, Expansion::Relaxed, Some(1)),
            Estimate::Infinite
        );
        assert_eq!(
            max_level_with(&domain, &start, &goal, Expansion::Relaxed, Some(2)),
            Estimate::Finite(2)
        );
    }

    #[test]
    fn test_heuristic_from_str() {
        assert_eq!("max".parse::<Heuristic>(), Ok(Heuristic::MaxLevel));
        assert_eq!("sum".parse::<Heuristic>(), Ok(Heuristic::LevelSum));
        assert_eq!("zero".parse::<Heuristic>(), Ok(Heuristic::Zero));
        assert!("other".parse::<Heuristic>().is_err());
    }
}
