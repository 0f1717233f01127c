//! Selection of the value to branch on.
mod in_domain_min;

pub use in_domain_min::InDomainMin;

use super::SelectionContext;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;

/// Chooses the decision for a selected variable.
pub trait ValueSelector {
    fn select_value(&mut self, context: &SelectionContext, variable: DomainId) -> Predicate;
}

/// The value selection policies which can be configured.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ValueSelection {
    /// Assign the earliest, or smallest, value in the domain; see [`InDomainMin`].
    #[default]
    InDomainMin,
}

impl ValueSelector for ValueSelection {
    fn select_value(&mut self, context: &SelectionContext, variable: DomainId) -> Predicate {
        match self {
            ValueSelection::InDomainMin => InDomainMin.select_value(context, variable),
        }
    }
}
