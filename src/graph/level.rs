use tracing::debug;

use super::layer::{ActionLayer, MutexSet, PropositionLayer};
use crate::strips::{Action, ActionId, Domain, Proposition, State};

/// One level of the planning graph: the actions enabled at this level and the
/// propositions they produce.
///
/// Level 0 only has a proposition layer, seeded from a state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanGraphLevel {
    action_layer: ActionLayer,
    proposition_layer: PropositionLayer,
}

impl PlanGraphLevel {
    pub fn initial(state: &State) -> Self {
        Self {
            action_layer: ActionLayer::new(),
            proposition_layer: PropositionLayer::from_state(state),
        }
    }

    pub fn action_layer(&self) -> &ActionLayer {
        &self.action_layer
    }

    pub fn proposition_layer(&self) -> &PropositionLayer {
        &self.proposition_layer
    }

    /// Builds the level that follows `previous`, mutexes included.
    ///
    /// The four steps run strictly in order, each reading only the previous level
    /// and the steps before it.
    pub fn expand(domain: &Domain, previous: &PlanGraphLevel) -> Self {
        let previous_layer = &previous.proposition_layer;
        let mut level = Self::default();
        level.update_action_layer(domain, previous_layer, true);
        level.update_mutex_actions(domain, previous_layer.mutex_props());
        level.update_proposition_layer(domain);
        level.update_mutex_proposition();
        debug!(
            actions = level.action_layer.len(),
            action_mutexes = level.action_layer.mutex_actions().len(),
            propositions = level.proposition_layer.len(),
            proposition_mutexes = level.proposition_layer.mutex_props().len(),
            "expanded level"
        );
        level
    }

    /// Reachability only: an action is enabled as soon as its preconditions are
    /// present, and no mutex relation is computed.
    pub fn expand_without_mutex(domain: &Domain, previous: &PlanGraphLevel) -> Self {
        let mut level = Self::default();
        level.update_action_layer(domain, &previous.proposition_layer, false);
        level.update_proposition_layer(domain);
        debug!(
            actions = level.action_layer.len(),
            propositions = level.proposition_layer.len(),
            "expanded relaxed level"
        );
        level
    }

    fn update_action_layer(
        &mut self,
        domain: &Domain,
        previous: &PropositionLayer,
        check_mutex: bool,
    ) {
        for (id, action) in domain.actions() {
            if !previous.all_preconds_in_layer(action) {
                continue;
            }
            if check_mutex && has_mutex_preconditions(action, previous) {
                continue;
            }
            self.action_layer.add_action(id);
        }
    }

    fn update_mutex_actions(&mut self, domain: &Domain, previous_mutex: &MutexSet<Proposition>) {
        let actions: Vec<ActionId> = self.action_layer.actions().collect();
        for (i, &a) in actions.iter().enumerate() {
            for &b in &actions[i + 1..] {
                if mutex_actions(domain, a, b, previous_mutex) {
                    self.action_layer.add_mutex_actions(a, b);
                }
            }
        }
    }

    fn update_proposition_layer(&mut self, domain: &Domain) {
        for id in self.action_layer.actions() {
            for prop in domain.action(id).add_list() {
                self.proposition_layer.add_producer(prop.clone(), id);
            }
        }
    }

    fn update_mutex_proposition(&mut self) {
        let props: Vec<Proposition> = self.proposition_layer.propositions().cloned().collect();
        let mut mutexes = Vec::new();
        for (i, p) in props.iter().enumerate() {
            for q in &props[i + 1..] {
                let action_mutex = self.action_layer.mutex_actions();
                if mutex_propositions(&self.proposition_layer, p, q, action_mutex) {
                    mutexes.push((p.clone(), q.clone()));
                }
            }
        }
        for (p, q) in mutexes {
            self.proposition_layer.add_mutex_prop(p, q);
        }
    }
}

fn has_mutex_preconditions(action: &Action, layer: &PropositionLayer) -> bool {
    let pre = action.preconditions();
    pre.iter()
        .enumerate()
        .any(|(i, p)| pre[i + 1..].iter().any(|q| layer.is_mutex(p, q)))
}

/// Distinct actions are mutex when they interfere, or when they are independent but
/// some precondition of one is mutex with some precondition of the other.
pub fn mutex_actions(
    domain: &Domain,
    a: ActionId,
    b: ActionId,
    previous_mutex: &MutexSet<Proposition>,
) -> bool {
    if a == b {
        return false;
    }
    if !domain.are_independent(a, b) {
        return true;
    }
    have_competing_needs(domain.action(a), domain.action(b), previous_mutex)
}

pub fn have_competing_needs(
    a: &Action,
    b: &Action,
    previous_mutex: &MutexSet<Proposition>,
) -> bool {
    a.preconditions()
        .iter()
        .any(|p| b.preconditions().iter().any(|q| previous_mutex.contains(p, q)))
}

/// Every way of producing `p` is mutex with every way of producing `q`. A shared
/// producer is never mutex with itself, so it keeps the pair compatible.
pub fn mutex_propositions(
    layer: &PropositionLayer,
    p: &Proposition,
    q: &Proposition,
    action_mutex: &MutexSet<ActionId>,
) -> bool {
    let q_producers = layer.producers(q);
    layer
        .producers(p)
        .iter()
        .all(|a| q_producers.iter().all(|b| action_mutex.contains(a, b)))
}
