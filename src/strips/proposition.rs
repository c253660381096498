use std::{collections::BTreeSet, fmt, rc::Rc};

/// An atomic ground fact. The name is the whole identity, so cloning is cheap and
/// two propositions built from the same name compare equal.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Proposition(Rc<str>);

/// A world state: the set of propositions that currently hold.
pub type State = BTreeSet<Proposition>;

impl Proposition {
    pub fn new(name: &str) -> Self {
        Self(Rc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Proposition {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Builds a [`State`] out of proposition names.
pub fn state<'a, I: IntoIterator<Item = &'a str>>(names: I) -> State {
    names.into_iter().map(Proposition::new).collect()
}

#[cfg(test)]
mod tests {
    use super::{state, Proposition};

    #[test]
    fn test_identity_is_name() {
        let a = Proposition::new("at-robot-l1");
        let b = Proposition::from("at-robot-l1");
        assert_eq!(a, b);
        assert_ne!(a, Proposition::new("at-robot-l2"));
        assert_eq!(a.name(), "at-robot-l1");
        assert_eq!(format!("{}", a), "at-robot-l1");
    }

    #[test]
    fn test_state_deduplicates() {
        let s = state(vec!["A", "B", "A"]);
        assert_eq!(s.len(), 2);
        assert!(s.contains(&Proposition::new("B")));
    }
}
