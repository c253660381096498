use std::collections::{BTreeMap, BTreeSet};
use std::{fs, path::Path};

use tracing::debug;

use super::action::{Action, ActionId};
use super::pair::Pair;
use super::parser::{self, ast, Parser};
use super::proposition::{Proposition, State};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("{path}: {source}")]
    Parse { path: String, source: parser::Error },
    #[error(transparent)]
    Syntax(#[from] parser::Error),
    #[error("proposition '{0}' declared more than once")]
    DuplicateProposition(String),
    #[error("action '{0}' declared more than once")]
    DuplicateAction(String),
    #[error("action '{action}' references undeclared proposition '{proposition}'")]
    UndeclaredProposition { action: String, proposition: String },
    #[error("action '{action}' lists '{proposition}' more than once in its {list} list")]
    RepeatedInList { action: String, list: &'static str, proposition: String },
    #[error("{state} state references undeclared proposition '{proposition}'")]
    UndeclaredInState { state: &'static str, proposition: String },
}

pub(crate) fn read_file(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })
}

/// The validated, immutable universe a planning graph is built against: declared
/// propositions, the parsed actions followed by one no-op per proposition, and the
/// interference relation between actions.
///
/// A `Domain` is never mutated once built, so any number of graphs and searches can
/// share one by reference.
#[derive(Debug)]
pub struct Domain {
    propositions: Vec<Proposition>,
    declared: BTreeSet<Proposition>,
    actions: Vec<Action>,
    noops: BTreeMap<Proposition, ActionId>,
    interfering: BTreeSet<Pair<ActionId>>,
}

impl Domain {
    /// Validates the universe and synthesizes the no-op actions.
    pub fn new(propositions: Vec<Proposition>, mut actions: Vec<Action>) -> Result<Self, Error> {
        let mut declared = BTreeSet::new();
        for prop in &propositions {
            if !declared.insert(prop.clone()) {
                return Err(Error::DuplicateProposition(prop.to_string()));
            }
        }
        let mut names = BTreeSet::new();
        for action in &actions {
            if !names.insert(action.name().to_owned()) {
                return Err(Error::DuplicateAction(action.name().to_owned()));
            }
            let lists = [
                ("precondition", action.preconditions()),
                ("add", action.add_list()),
                ("delete", action.delete_list()),
            ];
            for (list, props) in lists {
                let mut seen = BTreeSet::new();
                for prop in props.iter() {
                    if !declared.contains(prop) {
                        return Err(Error::UndeclaredProposition {
                            action: action.name().to_owned(),
                            proposition: prop.to_string(),
                        });
                    }
                    if !seen.insert(prop) {
                        return Err(Error::RepeatedInList {
                            action: action.name().to_owned(),
                            list,
                            proposition: prop.to_string(),
                        });
                    }
                }
            }
        }
        let mut noops = BTreeMap::new();
        for prop in &propositions {
            let noop = Action::noop(prop);
            if !names.insert(noop.name().to_owned()) {
                return Err(Error::DuplicateAction(noop.name().to_owned()));
            }
            noops.insert(prop.clone(), ActionId(actions.len()));
            actions.push(noop);
        }
        let interfering = Self::interference(&actions);
        debug!(
            propositions = propositions.len(),
            actions = actions.len(),
            interfering = interfering.len(),
            "domain ready"
        );
        Ok(Self { propositions, declared, actions, noops, interfering })
    }

    /// Every pair of actions where one deletes a precondition or an add effect of the other.
    fn interference(actions: &[Action]) -> BTreeSet<Pair<ActionId>> {
        let mut deleters: BTreeMap<&Proposition, Vec<ActionId>> = BTreeMap::new();
        let mut users: BTreeMap<&Proposition, Vec<ActionId>> = BTreeMap::new();
        for (idx, action) in actions.iter().enumerate() {
            let id = ActionId(idx);
            for prop in action.delete_list() {
                deleters.entry(prop).or_default().push(id);
            }
            for prop in action.preconditions().iter().chain(action.add_list()) {
                users.entry(prop).or_default().push(id);
            }
        }
        let mut interfering = BTreeSet::new();
        for (prop, deleting) in &deleters {
            if let Some(using) = users.get(prop) {
                for d in deleting {
                    interfering.extend(using.iter().filter_map(|u| Pair::new(*d, *u)));
                }
            }
        }
        interfering
    }

    fn from_ast(domain: ast::Domain) -> Result<Self, Error> {
        fn props(names: &[ast::Name]) -> Vec<Proposition> {
            names.iter().map(|n| Proposition::new(n.text)).collect()
        }
        let actions = domain
            .actions
            .iter()
            .map(|a| {
                Action::new(
                    a.name.text,
                    props(&a.preconditions),
                    props(&a.add),
                    props(&a.delete),
                )
            })
            .collect();
        Self::new(props(&domain.propositions), actions)
    }

    /// Builds a domain out of domain-file text.
    pub fn parse(code: &str) -> Result<Self, Error> {
        Self::from_ast(Parser::new(code).domain()?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let code = read_file(path)?;
        let domain = Parser::new(&code)
            .domain()
            .map_err(|source| Error::Parse { path: path.display().to_string(), source })?;
        Self::from_ast(domain)
    }

    /// Resolves names into a [`State`], refusing propositions the domain never declared.
    pub fn state<'n, I: IntoIterator<Item = &'n str>>(
        &self,
        which: &'static str,
        names: I,
    ) -> Result<State, Error> {
        names
            .into_iter()
            .map(|name| {
                let prop = Proposition::new(name);
                if self.declared.contains(&prop) {
                    Ok(prop)
                } else {
                    Err(Error::UndeclaredInState { state: which, proposition: name.to_owned() })
                }
            })
            .collect()
    }

    pub fn propositions(&self) -> &[Proposition] {
        &self.propositions
    }

    pub fn is_declared(&self, prop: &Proposition) -> bool {
        self.declared.contains(prop)
    }

    /// All actions, no-ops included, in id order.
    pub fn actions(&self) -> impl Iterator<Item = (ActionId, &Action)> + '_ {
        self.actions.iter().enumerate().map(|(idx, action)| (ActionId(idx), action))
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// # Panics
    /// When `id` was not handed out by this domain.
    pub fn action(&self, id: ActionId) -> &Action {
        &self.actions[id.0]
    }

    pub fn find_action(&self, name: &str) -> Option<ActionId> {
        self.actions().find(|(_, a)| a.name() == name).map(|(id, _)| id)
    }

    pub fn noop(&self, prop: &Proposition) -> Option<ActionId> {
        self.noops.get(prop).copied()
    }

    /// Two distinct actions that do not interfere. An action is never independent of itself.
    pub fn are_independent(&self, a: ActionId, b: ActionId) -> bool {
        match Pair::new(a, b) {
            Some(pair) => !self.interfering.contains(&pair),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Domain, Error};
    use crate::strips::{Action, Proposition};

    const DOMAIN: &str = "Propositions:\nA B C\nActions:\n\
        Name: M\npre: A\nadd: B\ndelete: A\n\
        Name: N\npre: C\nadd: C\n";

    fn props(names: &[&str]) -> Vec<Proposition> {
        names.iter().map(|n| Proposition::new(n)).collect()
    }

    #[test]
    fn test_noops_are_synthesized() {
        let domain = Domain::parse(DOMAIN).unwrap();
        assert_eq!(domain.action_count(), 5);
        for prop in domain.propositions() {
            let id = domain.noop(prop).unwrap();
            let noop = domain.action(id);
            assert!(noop.is_noop());
            assert_eq!(noop.preconditions(), &[prop.clone()]);
            assert_eq!(noop.add_list(), &[prop.clone()]);
            assert!(noop.delete_list().is_empty());
        }
        assert!(!domain.action(domain.find_action("M").unwrap()).is_noop());
    }

    #[test]
    fn test_independence() {
        let domain = Domain::parse(DOMAIN).unwrap();
        let m = domain.find_action("M").unwrap();
        let n = domain.find_action("N").unwrap();
        let noop_a = domain.noop(&Proposition::new("A")).unwrap();
        let noop_b = domain.noop(&Proposition::new("B")).unwrap();
        assert!(!domain.are_independent(m, noop_a));
        assert!(!domain.are_independent(noop_a, m));
        assert!(domain.are_independent(m, noop_b));
        assert!(domain.are_independent(m, n));
        assert!(!domain.are_independent(m, m));
        assert_eq!(domain.interfering.len(), 1);
    }

    #[test]
    fn test_interference_matches_actions() {
        let code = "Propositions:\nA B C\nActions:\n\
            Name: M\npre: A\nadd: B\ndelete: A\n\
            Name: N\npre: B\nadd: C\ndelete: B C\n";
        let domain = Domain::parse(code).unwrap();
        for (a, first) in domain.actions() {
            for (b, second) in domain.actions() {
                assert_eq!(
                    domain.are_independent(a, b),
                    a != b && !first.interferes_with(second),
                    "{} {}",
                    first,
                    second
                );
            }
        }
    }

    #[test]
    fn test_undeclared_proposition() {
        let actions = vec![Action::new("M", props(&["A"]), props(&["Z"]), Vec::new())];
        match Domain::new(props(&["A"]), actions) {
            Err(Error::UndeclaredProposition { action, proposition }) => {
                assert_eq!(action, "M");
                assert_eq!(proposition, "Z");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_repeated_in_list() {
        let actions = vec![Action::new("M", props(&["A", "A"]), Vec::new(), Vec::new())];
        assert!(matches!(
            Domain::new(props(&["A"]), actions),
            Err(Error::RepeatedInList { list: "precondition", .. })
        ));
    }

    #[test]
    fn test_duplicates() {
        assert!(matches!(
            Domain::new(props(&["A", "A"]), Vec::new()),
            Err(Error::DuplicateProposition(_))
        ));
        let actions = vec![
            Action::new("M", Vec::new(), Vec::new(), Vec::new()),
            Action::new("M", Vec::new(), Vec::new(), Vec::new()),
        ];
        assert!(matches!(Domain::new(props(&["A"]), actions), Err(Error::DuplicateAction(_))));
        let clash = vec![Action::noop(&Proposition::new("A"))];
        assert!(matches!(Domain::new(props(&["A"]), clash), Err(Error::DuplicateAction(_))));
    }

    #[test]
    fn test_state_validation() {
        let domain = Domain::parse(DOMAIN).unwrap();
        assert_eq!(domain.state("initial", vec!["A", "C"]).unwrap().len(), 2);
        assert!(matches!(
            domain.state("goal", vec!["Q"]),
            Err(Error::UndeclaredInState { state: "goal", .. })
        ));
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;
        use tempfile::Builder;

        let mut file = Builder::new()
            .suffix(".txt")
            .tempfile()
            .expect("Unable to create temporary file");
        write!(file.as_file_mut(), "{}", DOMAIN).expect("Unable to write to tempfile");
        let domain = Domain::from_file(file.path()).unwrap();
        assert_eq!(domain.propositions().len(), 3);

        let missing = Domain::from_file("does/not/exist.txt");
        assert!(matches!(missing, Err(Error::Io { .. })));
    }
}
