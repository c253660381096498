//! The static STRIPS universe: propositions, ground actions and the validated
//! [`Domain`] every planning graph is built against.

pub mod action;
pub mod domain;
pub mod pair;
pub mod parser;
pub mod proposition;

pub use action::{Action, ActionId};
pub use domain::Domain;
pub use pair::Pair;
pub use proposition::{Proposition, State};
