//! Selection of the variable to branch on.
mod input_order;

pub use input_order::InputOrder;

use super::SelectionContext;
use crate::engine::variables::DomainId;

/// Chooses the variable the next decision is about.
pub trait VariableSelector {
    /// An unfixed variable, or [`None`] if all variables under consideration are fixed.
    fn select_variable(&mut self, context: &SelectionContext) -> Option<DomainId>;
}
