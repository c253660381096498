use std::fmt;

use super::proposition::{Proposition, State};

/// Index of an action inside the [`Domain`](super::Domain) that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(pub(crate) usize);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A ground STRIPS operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    name: String,
    preconditions: Vec<Proposition>,
    add_list: Vec<Proposition>,
    delete_list: Vec<Proposition>,
    is_noop: bool,
}

impl Action {
    pub fn new(
        name: &str,
        preconditions: Vec<Proposition>,
        add_list: Vec<Proposition>,
        delete_list: Vec<Proposition>,
    ) -> Self {
        Self {
            name: name.to_owned(),
            preconditions,
            add_list,
            delete_list,
            is_noop: false,
        }
    }

    /// The identity action that carries `prop` over to the next layer.
    pub fn noop(prop: &Proposition) -> Self {
        Self {
            name: format!("noop_{}", prop),
            preconditions: vec![prop.clone()],
            add_list: vec![prop.clone()],
            delete_list: Vec::new(),
            is_noop: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn preconditions(&self) -> &[Proposition] {
        &self.preconditions
    }

    pub fn add_list(&self) -> &[Proposition] {
        &self.add_list
    }

    pub fn delete_list(&self) -> &[Proposition] {
        &self.delete_list
    }

    pub fn is_noop(&self) -> bool {
        self.is_noop
    }

    pub fn adds(&self, prop: &Proposition) -> bool {
        self.add_list.contains(prop)
    }

    pub fn deletes(&self, prop: &Proposition) -> bool {
        self.delete_list.contains(prop)
    }

    pub fn requires(&self, prop: &Proposition) -> bool {
        self.preconditions.contains(prop)
    }

    /// True when every precondition holds in `state`.
    pub fn is_applicable(&self, state: &State) -> bool {
        self.preconditions.iter().all(|p| state.contains(p))
    }

    /// Forward transition: the add list joined with whatever `state` holds that
    /// this action does not delete. Mutex relations play no part here.
    pub fn apply(&self, state: &State) -> State {
        state
            .iter()
            .filter(|p| !self.deletes(p))
            .chain(self.add_list.iter())
            .cloned()
            .collect()
    }

    /// One action deletes a precondition or an add effect of the other.
    pub fn interferes_with(&self, other: &Action) -> bool {
        fn clobbers(a: &Action, b: &Action) -> bool {
            a.delete_list.iter().any(|p| b.requires(p) || b.adds(p))
        }
        clobbers(self, other) || clobbers(other, self)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
