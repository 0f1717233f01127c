use crate::basic_types::PropagationStatusCP;
use crate::engine::predicates::Predicate;
use crate::propagation::DomainEvents;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

#[derive(Clone, Copy, Debug)]
pub(crate) struct EquivalenceArgs {
    pub(crate) left: Predicate,
    pub(crate) right: Predicate,
}

impl PropagatorConstructor for EquivalenceArgs {
    type PropagatorImpl = EquivalencePropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.left.get_domain(), DomainEvents::ANY_INT, LocalId::from(0));
        context.register(self.right.get_domain(), DomainEvents::ANY_INT, LocalId::from(1));

        EquivalencePropagator {
            left: self.left,
            right: self.right,
        }
    }
}

/// Propagator for `left <-> right` over two predicates.
#[derive(Clone, Debug)]
pub(crate) struct EquivalencePropagator {
    left: Predicate,
    right: Predicate,
}

impl Propagator for EquivalencePropagator {
    fn name(&self) -> &str {
        "Equivalence"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        for (known, other) in [(self.left, self.right), (self.right, self.left)] {
            match context.evaluate_predicate(known) {
                Some(true) => context.post(other)?,
                Some(false) => context.post(!other)?,
                None => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;
    use crate::predicate;

    #[test]
    fn truth_is_copied_in_both_directions() {
        let mut solver = TestSolver::default();
        let host = solver.new_variable(0, 3);
        let delay = solver.new_variable(0, 5);

        let _ = solver
            .new_propagator(EquivalenceArgs {
                left: predicate!(host == 2),
                right: predicate!(delay <= 0),
            })
            .expect("no conflict");
        solver.assert_bounds(delay, 0, 5);

        solver.new_checkpoint();
        solver.remove_and_propagate(host, 2).expect("no conflict");
        solver.assert_bounds(delay, 1, 5);

        solver.synchronise(0);
        solver
            .set_upper_bound_and_propagate(delay, 0)
            .expect("no conflict");
        assert_eq!(solver.state.fixed_value(host), Some(2));
    }

    #[test]
    fn contradicting_predicates_fail() {
        let mut solver = TestSolver::default();
        let host = solver.new_variable(1, 1);
        let delay = solver.new_variable(3, 5);

        let result = solver.new_propagator(EquivalenceArgs {
            left: predicate!(host == 1),
            right: predicate!(delay <= 0),
        });

        assert!(result.is_err());
    }
}
