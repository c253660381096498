use super::Span;

/// A proposition or action name together with where it was written.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Name<'a> {
    pub text: &'a str,
    pub span: Span,
}

#[derive(PartialEq, Debug)]
pub struct Action<'a> {
    pub name: Name<'a>,
    pub preconditions: Vec<Name<'a>>,
    pub add: Vec<Name<'a>>,
    pub delete: Vec<Name<'a>>,
}

#[derive(PartialEq, Debug)]
pub struct Domain<'a> {
    pub propositions: Vec<Name<'a>>,
    pub actions: Vec<Action<'a>>,
}

#[derive(PartialEq, Debug)]
pub struct Problem<'a> {
    pub initial: Vec<Name<'a>>,
    pub goal: Vec<Name<'a>>,
}
