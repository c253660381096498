use super::level::PlanGraphLevel;
use crate::strips::{Domain, Proposition, State};

/// How new levels are built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Expansion {
    /// Reachability only, deletes and mutexes ignored.
    #[default]
    Relaxed,
    /// Full expansion with action and proposition mutexes.
    Mutex,
}

/// An ordered chain of [`PlanGraphLevel`]s grown from a single state.
#[derive(Debug, Clone)]
pub struct PlanningGraph<'d> {
    domain: &'d Domain,
    expansion: Expansion,
    levels: Vec<PlanGraphLevel>,
}

impl<'d> PlanningGraph<'d> {
    pub fn new(domain: &'d Domain, state: &State, expansion: Expansion) -> Self {
        Self {
            domain,
            expansion,
            levels: vec![PlanGraphLevel::initial(state)],
        }
    }

    pub fn domain(&self) -> &'d Domain {
        self.domain
    }

    /// Index of the newest level.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn levels(&self) -> &[PlanGraphLevel] {
        &self.levels
    }

    /// # Panics
    /// When `index` is past the newest level.
    pub fn level(&self, index: usize) -> &PlanGraphLevel {
        &self.levels[index]
    }

    pub fn last(&self) -> &PlanGraphLevel {
        &self.levels[self.depth()]
    }

    /// Appends one level built from the newest one.
    pub fn expand_next(&mut self) -> &PlanGraphLevel {
        let previous = self.last();
        let next = match self.expansion {
            Expansion::Relaxed => PlanGraphLevel::expand_without_mutex(self.domain, previous),
            Expansion::Mutex => PlanGraphLevel::expand(self.domain, previous),
        };
        self.levels.push(next);
        self.last()
    }

    /// The newest level has as many propositions as the one before it. Proposition
    /// sets only grow, so nothing new can appear past this point.
    pub fn is_fixed(&self) -> bool {
        let depth = self.depth();
        depth > 0
            && self.levels[depth].proposition_layer().len()
                == self.levels[depth - 1].proposition_layer().len()
    }

    /// [`is_fixed`](Self::is_fixed) and the proposition mutex count stopped shrinking
    /// too. Identical to `is_fixed` for relaxed graphs, whose mutex sets stay empty.
    pub fn has_leveled_off(&self) -> bool {
        let depth = self.depth();
        self.is_fixed()
            && self.levels[depth].proposition_layer().mutex_props().len()
                == self.levels[depth - 1].proposition_layer().mutex_props().len()
    }

    /// All of `goal` is present at `index` and, for mutex graphs, no two goals are mutex there.
    pub fn goals_reachable(&self, index: usize, goal: &State) -> bool {
        let layer = self.levels[index].proposition_layer();
        if !layer.contains_all(goal) {
            return false;
        }
        match self.expansion {
            Expansion::Relaxed => true,
            Expansion::Mutex => {
                let goals: Vec<&Proposition> = goal.iter().collect();
                goals
                    .iter()
                    .enumerate()
                    .all(|(i, p)| goals[i + 1..].iter().all(|q| !layer.is_mutex(p, q)))
            }
        }
    }

    /// The first level holding `prop`, if any level built so far does.
    pub fn first_appearance(&self, prop: &Proposition) -> Option<usize> {
        self.levels.iter().position(|level| level.proposition_layer().contains(prop))
    }
}
