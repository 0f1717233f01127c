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
pub(crate) struct DurationArgs {
    pub(crate) start: DomainId,
    pub(crate) duration: DomainId,
    pub(crate) end: DomainId,
}

impl PropagatorConstructor for DurationArgs {
    type PropagatorImpl = DurationPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let DurationArgs {
            start,
            duration,
            end,
        } = self;

        context.register(start, DomainEvents::BOUNDS, LocalId::from(0));
        context.register(duration, DomainEvents::BOUNDS, LocalId::from(1));
        context.register(end, DomainEvents::BOUNDS, LocalId::from(2));

        DurationPropagator {
            start,
            duration,
            end,
        }
    }
}

/// Propagator for `end = start + duration`. The propagator is bounds consistent.
#[derive(Clone, Debug)]
pub(crate) struct DurationPropagator {
    start: DomainId,
    duration: DomainId,
    end: DomainId,
}

impl Propagator for DurationPropagator {
    fn name(&self) -> &str {
        "Duration"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        let start_lb = context.lower_bound(self.start);
        let start_ub = context.upper_bound(self.start);
        let duration_lb = context.lower_bound(self.duration);
        let duration_ub = context.upper_bound(self.duration);

        context.post(predicate!(self.end >= start_lb + duration_lb))?;
        context.post(predicate!(self.end <= start_ub + duration_ub))?;

        let end_lb = context.lower_bound(self.end);
        let end_ub = context.upper_bound(self.end);

        context.post(predicate!(self.start >= end_lb - duration_ub))?;
        context.post(predicate!(self.start <= end_ub - duration_lb))?;

        let start_lb = context.lower_bound(self.start);
        let start_ub = context.upper_bound(self.start);

        context.post(predicate!(self.duration >= end_lb - start_ub))?;
        context.post(predicate!(self.duration <= end_ub - start_lb))?;

        Ok(())
    }
}
