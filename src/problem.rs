use std::cell::Cell;
use std::path::Path;

use tracing::debug;

use crate::search::SearchProblem;
use crate::strips::domain::{read_file, Error};
use crate::strips::parser::{ast, Parser};
use crate::strips::{ActionId, Domain, State};

/// A domain together with an initial and a goal state.
///
/// Successors are exact forward-chaining transitions and never look at mutexes;
/// those only matter to the planning graph heuristics.
#[derive(Debug)]
pub struct PlanningProblem {
    domain: Domain,
    initial: State,
    goal: State,
    expanded: Cell<usize>,
}

impl PlanningProblem {
    /// Fails when either state names a proposition the domain does not declare.
    pub fn new(domain: Domain, initial: State, goal: State) -> Result<Self, Error> {
        for (which, state) in [("initial", &initial), ("goal", &goal)] {
            if let Some(prop) = state.iter().find(|p| !domain.is_declared(p)) {
                return Err(Error::UndeclaredInState {
                    state: which,
                    proposition: prop.to_string(),
                });
            }
        }
        debug!(initial = initial.len(), goal = goal.len(), "planning problem ready");
        Ok(Self { domain, initial, goal, expanded: Cell::new(0) })
    }

    fn from_ast(domain: Domain, problem: ast::Problem) -> Result<Self, Error> {
        let initial = domain.state("initial", problem.initial.iter().map(|n| n.text))?;
        let goal = domain.state("goal", problem.goal.iter().map(|n| n.text))?;
        Self::new(domain, initial, goal)
    }

    pub fn parse(domain_code: &str, problem_code: &str) -> Result<Self, Error> {
        let domain = Domain::parse(domain_code)?;
        let problem = Parser::new(problem_code).problem()?;
        Self::from_ast(domain, problem)
    }

    pub fn from_files<D: AsRef<Path>, P: AsRef<Path>>(
        domain_path: D,
        problem_path: P,
    ) -> Result<Self, Error> {
        let domain = Domain::from_file(domain_path)?;
        let path = problem_path.as_ref();
        let code = read_file(path)?;
        let problem = Parser::new(&code)
            .problem()
            .map_err(|source| Error::Parse { path: path.display().to_string(), source })?;
        Self::from_ast(domain, problem)
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn initial(&self) -> &State {
        &self.initial
    }

    pub fn goal(&self) -> &State {
        &self.goal
    }

    pub fn start_state(&self) -> State {
        self.initial.clone()
    }

    /// Every goal proposition holds in `state`.
    pub fn is_goal_state(&self, state: &State) -> bool {
        self.goal.is_subset(state)
    }

    /// One `(next_state, action, 1)` per applicable non-no-op action.
    pub fn successors(&self, state: &State) -> Vec<(State, ActionId, usize)> {
        self.expanded.set(self.expanded.get() + 1);
        self.domain
            .actions()
            .filter(|(_, action)| !action.is_noop() && action.is_applicable(state))
            .map(|(id, action)| (action.apply(state), id, 1))
            .collect()
    }

    /// Unit cost per action.
    pub fn cost_of_actions(&self, actions: &[ActionId]) -> usize {
        actions.len()
    }

    /// How many states had their successors generated so far.
    pub fn expanded(&self) -> usize {
        self.expanded.get()
    }

    /// Runs `plan` from the initial state: every action must be applicable in turn
    /// and the final state must satisfy the goal.
    pub fn validate_plan(&self, plan: &[ActionId]) -> bool {
        let mut state = self.initial.clone();
        for id in plan {
            let action = self.domain.action(*id);
            if !action.is_applicable(&state) {
                debug!(action = action.name(), "plan step not applicable");
                return false;
            }
            state = action.apply(&state);
        }
        self.is_goal_state(&state)
    }
}

impl SearchProblem for PlanningProblem {
    type State = State;
    type Action = ActionId;

    fn start_state(&self) -> State {
        PlanningProblem::start_state(self)
    }

    fn is_goal(&self, state: &State) -> bool {
        self.is_goal_state(state)
    }

    fn successors(&self, state: &State) -> Vec<(State, ActionId, usize)> {
        PlanningProblem::successors(self, state)
    }

    fn cost(&self, actions: &[ActionId]) -> usize {
        self.cost_of_actions(actions)
    }
}
