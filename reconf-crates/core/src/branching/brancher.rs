use super::SelectionContext;
use crate::engine::predicates::Predicate;
use crate::search::Solution;

/// A branching strategy.
///
/// Every decision has to shrink the domain of at least one variable; a [`Brancher`] which returns
/// a predicate that already holds makes the search loop forever.
pub trait Brancher {
    /// The next decision, or [`None`] if every variable the brancher is concerned with is fixed.
    fn next_decision(&mut self, context: &SelectionContext) -> Option<Predicate>;

    /// Called for every solution the search finds.
    fn on_solution(&mut self, _solution: &Solution) {}
}
