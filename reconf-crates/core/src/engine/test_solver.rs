//! Helpers to test propagators. The [`TestSolver`] sets up specific domains for a propagator and
//! gives direct access to the incremental steps of propagation.
use super::Conflict;
use super::EmptyDomain;
use super::State;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;
use crate::predicate;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorHandle;

/// A container for variables and propagators in unit tests.
#[derive(Debug, Default)]
pub(crate) struct TestSolver {
    pub(crate) state: State,
}

impl TestSolver {
    pub(crate) fn new_variable(&mut self, lb: i32, ub: i32) -> DomainId {
        self.state.new_interval_variable(lb, ub, None)
    }

    /// Add the propagator and propagate to a fixed point.
    pub(crate) fn new_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, Conflict>
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        let handle = self.state.add_propagator(constructor);
        self.state.propagate_to_fixed_point()?;
        Ok(handle)
    }

    pub(crate) fn propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> &P {
        self.state
            .get_propagator(handle)
            .expect("the handle belongs to this solver")
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.state.new_checkpoint();
    }

    pub(crate) fn synchronise(&mut self, checkpoint: usize) {
        self.state.restore_to(checkpoint);
    }

    pub(crate) fn lower_bound(&self, var: DomainId) -> i32 {
        self.state.lower_bound(var)
    }

    pub(crate) fn upper_bound(&self, var: DomainId) -> i32 {
        self.state.upper_bound(var)
    }

    pub(crate) fn contains(&self, var: DomainId, value: i32) -> bool {
        self.state.contains(var, value)
    }

    pub(crate) fn assert_bounds(&self, var: DomainId, lb: i32, ub: i32) {
        let actual_lb = self.lower_bound(var);
        let actual_ub = self.upper_bound(var);

        assert_eq!(
            (lb, ub),
            (actual_lb, actual_ub),
            "The expected bounds [{lb}..{ub}] did not match the actual bounds [{actual_lb}..{actual_ub}]"
        );
    }

    /// Post the predicate and propagate. The predicate itself must not empty a domain.
    pub(crate) fn post_and_propagate(&mut self, predicate: Predicate) -> Result<(), Conflict> {
        let result: Result<bool, EmptyDomain> = self.state.post(predicate);
        assert!(
            result.is_ok(),
            "The provided predicate {predicate} caused an empty domain"
        );
        self.state.propagate_to_fixed_point()
    }

    pub(crate) fn remove_and_propagate(&mut self, var: DomainId, value: i32) -> Result<(), Conflict> {
        self.post_and_propagate(predicate!(var != value))
    }

    pub(crate) fn set_lower_bound_and_propagate(
        &mut self,
        var: DomainId,
        bound: i32,
    ) -> Result<(), Conflict> {
        self.post_and_propagate(predicate!(var >= bound))
    }

    pub(crate) fn set_upper_bound_and_propagate(
        &mut self,
        var: DomainId,
        bound: i32,
    ) -> Result<(), Conflict> {
        self.post_and_propagate(predicate!(var <= bound))
    }

    pub(crate) fn assign_and_propagate(&mut self, var: DomainId, value: i32) -> Result<(), Conflict> {
        self.post_and_propagate(predicate!(var == value))
    }

    /// Run every propagator once more and report whether any domain changed.
    pub(crate) fn is_at_fixed_point(&mut self) -> bool {
        let snapshot = self.domain_snapshot();
        self.state.enqueue_all_propagators();
        let result = self.state.propagate_to_fixed_point();
        result.is_ok() && snapshot == self.domain_snapshot()
    }

    fn domain_snapshot(&self) -> Vec<Vec<i32>> {
        self.state
            .variables()
            .map(|var| self.state.iterate_domain(var).collect())
            .collect()
    }
}
