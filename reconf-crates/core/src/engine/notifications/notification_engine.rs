use enumset::EnumSet;

use super::DomainEvent;
use super::WatchListDomainEvents;
use crate::engine::propagator_queue::PropagatorQueue;
use crate::engine::trailed::TrailedValues;
use crate::engine::variables::DomainId;
use crate::engine::Assignments;
use crate::propagation::EnqueueDecision;
use crate::propagation::NotificationContext;
use crate::propagation::PropagatorStore;
use crate::propagation::PropagatorVarId;

/// Collects the events caused by domain changes and hands them to the watching propagators.
#[derive(Debug, Default)]
pub(crate) struct NotificationEngine {
    watch_list_domain_events: WatchListDomainEvents,
    /// Events which have not been delivered yet, in the order in which they happened.
    events: Vec<(DomainEvent, DomainId)>,
}

impl NotificationEngine {
    pub(crate) fn grow(&mut self) {
        self.watch_list_domain_events.grow();
    }

    pub(crate) fn watch_all(
        &mut self,
        domain: DomainId,
        events: EnumSet<DomainEvent>,
        propagator_var: PropagatorVarId,
    ) {
        self.watch_list_domain_events
            .watch_all(domain, events, propagator_var);
    }

    pub(crate) fn event_occurred(
        &mut self,
        lower_bound_before: i32,
        upper_bound_before: i32,
        lower_bound_after: i32,
        upper_bound_after: i32,
        removal_took_place: bool,
        domain: DomainId,
    ) {
        if lower_bound_after == upper_bound_after && lower_bound_before != upper_bound_before {
            self.events.push((DomainEvent::Assign, domain));
        }
        if lower_bound_after != lower_bound_before {
            self.events.push((DomainEvent::LowerBound, domain));
        }
        if upper_bound_after != upper_bound_before {
            self.events.push((DomainEvent::UpperBound, domain));
        }
        if removal_took_place {
            self.events.push((DomainEvent::Removal, domain));
        }
    }

    pub(crate) fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Deliver every pending event to its watchers and enqueue the propagators that ask for it.
    pub(crate) fn notify_propagators_about_domain_events(
        &mut self,
        assignments: &Assignments,
        trailed_values: &mut TrailedValues,
        propagators: &mut PropagatorStore,
        propagator_queue: &mut PropagatorQueue,
    ) {
        for (event, domain) in std::mem::take(&mut self.events) {
            for &propagator_var in self
                .watch_list_domain_events
                .get_affected_propagators(event, domain)
            {
                let propagator_id = propagator_var.propagator;
                let propagator = &mut propagators[propagator_id];
                let context = NotificationContext::new(trailed_values, assignments);

                let decision = propagator.notify(context, propagator_var.variable, event.into());

                if decision == EnqueueDecision::Enqueue {
                    propagator_queue.enqueue_propagator(propagator_id, propagator.priority());
                }
            }
        }
    }
}
