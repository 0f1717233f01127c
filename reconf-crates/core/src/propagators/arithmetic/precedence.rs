use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::DomainId;
use crate::predicate;
use crate::propagation::DomainEvents;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

#[derive(Clone, Copy, Debug)]
pub(crate) struct PrecedenceArgs {
    pub(crate) before: DomainId,
    pub(crate) offset: i32,
    pub(crate) after: DomainId,
}

impl PropagatorConstructor for PrecedenceArgs {
    type PropagatorImpl = PrecedencePropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.before, DomainEvents::LOWER_BOUND, LocalId::from(0));
        context.register(self.after, DomainEvents::UPPER_BOUND, LocalId::from(1));

        PrecedencePropagator {
            before: self.before,
            offset: self.offset,
            after: self.after,
        }
    }
}

/// Propagator for `before + offset <= after`.
#[derive(Clone, Debug)]
pub(crate) struct PrecedencePropagator {
    before: DomainId,
    offset: i32,
    after: DomainId,
}

impl Propagator for PrecedencePropagator {
    fn name(&self) -> &str {
        "Precedence"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        let before_lb = context.lower_bound(self.before);
        context.post(predicate!(self.after >= before_lb + self.offset))?;

        let after_ub = context.upper_bound(self.after);
        context.post(predicate!(self.before <= after_ub - self.offset))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn bounds_are_pushed_in_both_directions() {
        let mut solver = TestSolver::default();
        let before = solver.new_variable(3, 10);
        let after = solver.new_variable(0, 8);

        let _ = solver
            .new_propagator(PrecedenceArgs {
                before,
                offset: 2,
                after,
            })
            .expect("no empty domains");

        solver.assert_bounds(after, 5, 8);
        solver.assert_bounds(before, 3, 6);
    }

    #[test]
    fn tightening_is_undone_on_backtrack() {
        let mut solver = TestSolver::default();
        let before = solver.new_variable(0, 10);
        let after = solver.new_variable(0, 10);

        let _ = solver
            .new_propagator(PrecedenceArgs {
                before,
                offset: 0,
                after,
            })
            .expect("no empty domains");

        solver.new_checkpoint();
        solver
            .set_lower_bound_and_propagate(before, 7)
            .expect("consistent");
        solver.assert_bounds(after, 7, 10);

        solver.synchronise(0);
        solver.assert_bounds(after, 0, 10);
    }
}
