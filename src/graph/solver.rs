use std::collections::BTreeSet;

use tracing::{debug, info};

use super::level::PlanGraphLevel;
use super::planning_graph::{Expansion, PlanningGraph};
use crate::strips::{ActionId, Domain, Proposition, State};

/// Plan extraction straight from the mutex planning graph.
///
/// The graph is grown until the goals are present and pairwise non-mutex, then a
/// backward search picks non-mutex producers for the goals level by level. Goal
/// sets that failed at a level are remembered ("nogoods") and never retried there.
pub struct GraphPlan<'d> {
    graph: PlanningGraph<'d>,
    goal: State,
    nogoods: Vec<BTreeSet<State>>,
}

impl<'d> GraphPlan<'d> {
    pub fn new(domain: &'d Domain, initial: &State, goal: &State) -> Self {
        Self {
            graph: PlanningGraph::new(domain, initial, Expansion::Mutex),
            goal: goal.clone(),
            nogoods: Vec::new(),
        }
    }

    pub fn graph(&self) -> &PlanningGraph<'d> {
        &self.graph
    }

    /// A plan as a sequence of steps, each step a set of non-mutex actions that may
    /// run in any order. No-ops are left out, so a step can be empty.
    pub fn solve_layered(&mut self, max_levels: Option<usize>) -> Option<Vec<Vec<ActionId>>> {
        // level where the graph first leveled off and the nogood count seen there
        let mut leveled: Option<(usize, usize)> = None;
        loop {
            let depth = self.graph.depth();
            if self.graph.goals_reachable(depth, &self.goal) {
                self.nogoods.resize_with(depth + 1, BTreeSet::new);
                let mut extraction = Extraction { graph: &self.graph, nogoods: &mut self.nogoods };
                if let Some(steps) = extraction.extract(&self.goal, depth) {
                    info!(levels = depth, "graphplan found a plan");
                    let domain = self.graph.domain();
                    return Some(
                        steps
                            .into_iter()
                            .map(|step| {
                                step.into_iter()
                                    .filter(|a| !domain.action(*a).is_noop())
                                    .collect()
                            })
                            .collect(),
                    );
                }
                debug!(depth, nogoods = self.nogoods[depth].len(), "extraction failed");
            }
            if self.graph.has_leveled_off() {
                match leveled {
                    None => leveled = Some((depth, self.nogood_count(depth))),
                    Some((at, count)) => {
                        let now = self.nogood_count(at);
                        if now == count {
                            info!(levels = depth, "graphplan: goal unreachable");
                            return None;
                        }
                        leveled = Some((at, now));
                    }
                }
                // goals never became reachable, no extraction will ever change anything
                if !self.graph.goals_reachable(depth, &self.goal) {
                    info!(levels = depth, "graphplan: goal unreachable");
                    return None;
                }
            }
            if matches!(max_levels, Some(max) if depth >= max) {
                info!(levels = depth, "graphplan: level bound reached");
                return None;
            }
            self.graph.expand_next();
        }
    }

    /// The layered plan flattened into one action sequence.
    pub fn solve(&mut self, max_levels: Option<usize>) -> Option<Vec<ActionId>> {
        self.solve_layered(max_levels).map(|steps| steps.into_iter().flatten().collect())
    }

    fn nogood_count(&self, level: usize) -> usize {
        self.nogoods.get(level).map_or(0, BTreeSet::len)
    }
}

struct Extraction<'g, 'd> {
    graph: &'g PlanningGraph<'d>,
    nogoods: &'g mut Vec<BTreeSet<State>>,
}

impl<'g, 'd> Extraction<'g, 'd> {
    fn extract(&mut self, goals: &State, level: usize) -> Option<Vec<Vec<ActionId>>> {
        if level == 0 {
            return Some(Vec::new());
        }
        if self.nogoods[level].contains(goals) {
            return None;
        }
        let graph = self.graph;
        let layer = graph.level(level);
        // fewest producers first
        let mut ordered: Vec<&Proposition> = goals.iter().collect();
        ordered.sort_by_key(|p| layer.proposition_layer().producers(p).len());
        let mut chosen = Vec::new();
        let plan = self.assign(&ordered, &mut chosen, level);
        if plan.is_none() {
            self.nogoods[level].insert(goals.clone());
        }
        plan
    }

    fn assign(
        &mut self,
        goals: &[&Proposition],
        chosen: &mut Vec<ActionId>,
        level: usize,
    ) -> Option<Vec<Vec<ActionId>>> {
        let graph = self.graph;
        let domain = graph.domain();
        let (goal, rest) = match goals.split_first() {
            Some(split) => split,
            None => {
                let preconditions: State = chosen
                    .iter()
                    .flat_map(|a| domain.action(*a).preconditions())
                    .cloned()
                    .collect();
                let mut plan = self.extract(&preconditions, level - 1)?;
                plan.push(chosen.clone());
                return Some(plan);
            }
        };
        if chosen.iter().any(|a| domain.action(*a).adds(goal)) {
            return self.assign(rest, chosen, level);
        }
        let current: &PlanGraphLevel = graph.level(level);
        let actions = current.action_layer();
        // no-ops first keeps plans short
        let mut producers: Vec<ActionId> =
            current.proposition_layer().producers(goal).iter().copied().collect();
        producers.sort_by_key(|a| !domain.action(*a).is_noop());
        for producer in producers {
            if chosen.iter().any(|c| actions.is_mutex(*c, producer)) {
                continue;
            }
            chosen.push(producer);
            if let Some(plan) = self.assign(rest, chosen, level) {
                return Some(plan);
            }
            chosen.pop();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::GraphPlan;
    use crate::strips::proposition::state;
    use crate::strips::Domain;

    const ROBOT: &str = "Propositions:\nat1 at2 clean1 clean2\nActions:\n\
        Name: go12\npre: at1\nadd: at2\ndelete: at1\n\
        Name: go21\npre: at2\nadd: at1\ndelete: at2\n\
        Name: clean1\npre: at1\nadd: clean1\n\
        Name: clean2\npre: at2\nadd: clean2\n";

    fn names(domain: &Domain, plan: &[crate::strips::ActionId]) -> Vec<String> {
        plan.iter().map(|a| domain.action(*a).name().to_owned()).collect()
    }

    #[test]
    fn test_finds_plan() {
        let domain = Domain::parse(ROBOT).unwrap();
        let goal = state(vec!["clean1", "clean2"]);
        let mut solver = GraphPlan::new(&domain, &state(vec!["at1"]), &goal);
        let plan = solver.solve(None).unwrap();
        assert_eq!(names(&domain, &plan), vec!["clean1", "go12", "clean2"]);
    }

    #[test]
    fn test_parallel_steps() {
        let domain = Domain::parse(ROBOT).unwrap();
        let goal = state(vec!["clean1", "clean2"]);
        let mut solver = GraphPlan::new(&domain, &state(vec!["at1"]), &goal);
        let steps = solver.solve_layered(None).unwrap();
        assert_eq!(steps.len(), 3);
        assert!(steps.iter().all(|step| step.len() == 1));
    }

    #[test]
    fn test_goal_already_holds() {
        let domain = Domain::parse(ROBOT).unwrap();
        let mut solver = GraphPlan::new(&domain, &state(vec!["at1"]), &state(vec!["at1"]));
        assert_eq!(solver.solve(None), Some(Vec::new()));
    }

    #[test]
    fn test_unreachable() {
        let domain = Domain::parse(ROBOT).unwrap();
        let mut solver = GraphPlan::new(&domain, &state(vec!["at1"]), &state(vec!["at1", "at2"]));
        assert_eq!(solver.solve(None), None);

        let mut solver = GraphPlan::new(&domain, &state(vec!["clean1"]), &state(vec!["clean2"]));
        assert_eq!(solver.solve(None), None);
    }
}
