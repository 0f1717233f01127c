//! Branching decides which part of the search space is explored next.
//!
//! A [`Brancher`] returns a decision [`Predicate`]; the search applies it and, once the subtree
//! below it has been explored, its negation. The [`IndependentVariableValueBrancher`] combines a
//! [`VariableSelector`] with a [`ValueSelector`]:
//!
//! ```
//! # use reconf_core::branching::IndependentVariableValueBrancher;
//! # use reconf_core::branching::InDomainMin;
//! # use reconf_core::branching::InputOrder;
//! # use reconf_core::State;
//! let mut state = State::default();
//! let x = state.new_interval_variable(0, 3, None);
//! let y = state.new_interval_variable(2, 5, None);
//!
//! let brancher = IndependentVariableValueBrancher::new(InputOrder::new(&[y, x]), InDomainMin);
//! # let _ = brancher;
//! ```
mod brancher;
mod independent_variable_value_brancher;
mod selection_context;
pub mod value_selection;
pub mod variable_selection;

pub use brancher::Brancher;
pub use independent_variable_value_brancher::IndependentVariableValueBrancher;
pub use selection_context::SelectionContext;
pub use value_selection::InDomainMin;
pub use value_selection::ValueSelection;
pub use value_selection::ValueSelector;
pub use variable_selection::InputOrder;
pub use variable_selection::VariableSelector;

#[cfg(doc)]
use crate::engine::predicates::Predicate;
