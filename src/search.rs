use std::{cmp::Reverse, collections::HashMap, hash::Hash};

use priority_queue::PriorityQueue;
use tracing::{debug, trace, warn};

use crate::graph::Estimate;

/// What a best-first search needs to know about a problem.
pub trait SearchProblem {
    type State: Clone + Eq + Hash;
    type Action: Clone;

    fn start_state(&self) -> Self::State;

    fn is_goal(&self, state: &Self::State) -> bool;

    /// Every `(next_state, action, step_cost)` reachable in one step.
    fn successors(&self, state: &Self::State) -> Vec<(Self::State, Self::Action, usize)>;

    /// Cost of a whole action sequence, one per action unless overridden.
    fn cost(&self, actions: &[Self::Action]) -> usize {
        actions.len()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Stop with no plan after this many state expansions.
    pub max_expansions: Option<usize>,
}

fn reconstruct_path<S, A>(mut came_from: HashMap<S, (S, A)>, goal: S) -> Vec<A>
where
    S: Eq + Hash,
{
    let mut actions = Vec::new();
    let mut current = goal;
    while let Some((previous, action)) = came_from.remove(&current) {
        actions.push(action);
        current = previous;
    }
    actions.reverse();
    actions
}

/// A* over `problem`. States whose heuristic is [`Estimate::Infinite`] are pruned.
/// Returns the actions leading from the start state to a goal state.
pub fn astar<P, H>(problem: &P, heuristic: H, config: &SearchConfig) -> Option<Vec<P::Action>>
where
    P: SearchProblem,
    H: Fn(&P::State, &P) -> Estimate,
{
    let mut open_set = PriorityQueue::new();
    let mut came_from: HashMap<P::State, (P::State, P::Action)> = HashMap::new();
    let mut g_score: HashMap<P::State, usize> = HashMap::new();
    let mut h_score: HashMap<P::State, Estimate> = HashMap::new();
    // insertion counter, ties on f go to the older entry
    let mut pushed = 0usize;
    let mut expanded = 0usize;

    let start = problem.start_state();
    let h = heuristic(&start, problem);
    if !h.is_finite() {
        debug!("start state pruned by heuristic");
        return None;
    }
    h_score.insert(start.clone(), h);
    g_score.insert(start.clone(), 0);
    open_set.push(start, Reverse((h, pushed)));

    while let Some((current, Reverse((f, _)))) = open_set.pop() {
        if problem.is_goal(&current) {
            debug!(expanded, "goal reached");
            return Some(reconstruct_path(came_from, current));
        }
        if matches!(config.max_expansions, Some(max) if expanded >= max) {
            warn!(expanded, "search expansion bound reached");
            return None;
        }
        expanded += 1;
        let g = g_score[&current];
        trace!(expanded, g, %f, "expanding");
        for (next, action, cost) in problem.successors(&current) {
            let tentative = g + cost;
            if g_score.get(&next).map_or(false, |&known| known <= tentative) {
                continue;
            }
            let h = match h_score.get(&next) {
                Some(h) => *h,
                None => {
                    let h = heuristic(&next, problem);
                    h_score.insert(next.clone(), h);
                    h
                }
            };
            if !h.is_finite() {
                continue;
            }
            g_score.insert(next.clone(), tentative);
            came_from.insert(next.clone(), (current.clone(), action));
            pushed += 1;
            open_set.push(next, Reverse((h.plus(tentative), pushed)));
        }
    }
    debug!(expanded, "open set exhausted");
    None
}
