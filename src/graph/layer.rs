use std::collections::{BTreeMap, BTreeSet};

use crate::strips::{Action, ActionId, Pair, Proposition, State};

/// A symmetric, irreflexive relation stored as a set of [`Pair`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutexSet<T: Ord> {
    pairs: BTreeSet<Pair<T>>,
}

impl<T: Ord> Default for MutexSet<T> {
    fn default() -> Self {
        Self { pairs: BTreeSet::new() }
    }
}

impl<T: Ord + Clone> MutexSet<T> {
    /// Returns false when `a == b`, nothing is recorded in that case.
    pub fn insert(&mut self, a: T, b: T) -> bool {
        match Pair::new(a, b) {
            Some(pair) => self.pairs.insert(pair),
            None => false,
        }
    }

    pub fn contains(&self, a: &T, b: &T) -> bool {
        match Pair::new(a.clone(), b.clone()) {
            Some(pair) => self.pairs.contains(&pair),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pair<T>> + '_ {
        self.pairs.iter()
    }
}

/// Propositions of one graph level, each with the actions of the same level that
/// produce it, and the proposition mutex relation.
///
/// Producer sets belong to the layer. The same proposition in another layer has
/// its own, independently computed producers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropositionLayer {
    propositions: BTreeMap<Proposition, BTreeSet<ActionId>>,
    mutex: MutexSet<Proposition>,
}

impl PropositionLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A layer holding exactly `state`, with no producers and no mutexes.
    pub fn from_state(state: &State) -> Self {
        let mut layer = Self::new();
        for prop in state {
            layer.add_proposition(prop.clone());
        }
        layer
    }

    pub fn add_proposition(&mut self, prop: Proposition) {
        self.propositions.entry(prop).or_default();
    }

    /// Records `action` as a producer of `prop`, adding `prop` to the layer if needed.
    pub fn add_producer(&mut self, prop: Proposition, action: ActionId) {
        self.propositions.entry(prop).or_default().insert(action);
    }

    pub fn contains(&self, prop: &Proposition) -> bool {
        self.propositions.contains_key(prop)
    }

    pub fn contains_all<'a, I: IntoIterator<Item = &'a Proposition>>(&self, props: I) -> bool {
        props.into_iter().all(|p| self.contains(p))
    }

    pub fn propositions(&self) -> impl Iterator<Item = &Proposition> + '_ {
        self.propositions.keys()
    }

    pub fn len(&self) -> usize {
        self.propositions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.propositions.is_empty()
    }

    pub fn to_state(&self) -> State {
        self.propositions.keys().cloned().collect()
    }

    /// # Panics
    /// When `prop` is not in this layer.
    pub fn producers(&self, prop: &Proposition) -> &BTreeSet<ActionId> {
        match self.propositions.get(prop) {
            Some(producers) => producers,
            None => panic!("proposition '{}' is not in this layer", prop),
        }
    }

    /// # Panics
    /// When either proposition is not in this layer.
    pub fn add_mutex_prop(&mut self, p: Proposition, q: Proposition) {
        self.assert_member(&p);
        self.assert_member(&q);
        self.mutex.insert(p, q);
    }

    /// True iff `{p, q}` was declared mutex. A proposition is never mutex with itself.
    ///
    /// # Panics
    /// When either proposition is not in this layer.
    pub fn is_mutex(&self, p: &Proposition, q: &Proposition) -> bool {
        self.assert_member(p);
        self.assert_member(q);
        self.mutex.contains(p, q)
    }

    pub fn mutex_props(&self) -> &MutexSet<Proposition> {
        &self.mutex
    }

    /// Every precondition of `action` is in this layer.
    pub fn all_preconds_in_layer(&self, action: &Action) -> bool {
        self.contains_all(action.preconditions())
    }

    fn assert_member(&self, prop: &Proposition) {
        assert!(self.contains(prop), "proposition '{}' is not in this layer", prop);
    }
}

/// Actions enabled at one graph level and the action mutex relation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionLayer {
    actions: BTreeSet<ActionId>,
    mutex: MutexSet<ActionId>,
}

impl ActionLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: ActionId) {
        self.actions.insert(action);
    }

    pub fn contains(&self, action: ActionId) -> bool {
        self.actions.contains(&action)
    }

    pub fn actions(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.actions.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// # Panics
    /// When either action is not in this layer.
    pub fn add_mutex_actions(&mut self, a: ActionId, b: ActionId) {
        self.assert_member(a);
        self.assert_member(b);
        self.mutex.insert(a, b);
    }

    /// True iff `{a, b}` was declared mutex. An action is never mutex with itself.
    ///
    /// # Panics
    /// When either action is not in this layer.
    pub fn is_mutex(&self, a: ActionId, b: ActionId) -> bool {
        self.assert_member(a);
        self.assert_member(b);
        self.mutex.contains(&a, &b)
    }

    pub fn mutex_actions(&self) -> &MutexSet<ActionId> {
        &self.mutex
    }

    fn assert_member(&self, action: ActionId) {
        assert!(self.contains(action), "action {} is not in this layer", action);
    }
}
