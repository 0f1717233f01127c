use enumset::EnumSet;

use super::DomainEvent;
use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;
use crate::propagation::PropagatorVarId;

/// For every variable, the propagators (and their local ids) watching each kind of event.
#[derive(Default, Debug)]
pub(crate) struct WatchListDomainEvents {
    watchers: KeyedVec<DomainId, Watcher>,
}

#[derive(Debug, Default, Clone)]
struct Watcher {
    lower_bound_watchers: Vec<PropagatorVarId>,
    upper_bound_watchers: Vec<PropagatorVarId>,
    assign_watchers: Vec<PropagatorVarId>,
    removal_watchers: Vec<PropagatorVarId>,
}

impl WatchListDomainEvents {
    pub(crate) fn grow(&mut self) {
        let _ = self.watchers.push(Watcher::default());
    }

    pub(crate) fn watch_all(
        &mut self,
        domain: DomainId,
        events: EnumSet<DomainEvent>,
        propagator_var: PropagatorVarId,
    ) {
        let watcher = &mut self.watchers[domain];

        for event in events {
            let event_watchers = match event {
                DomainEvent::LowerBound => &mut watcher.lower_bound_watchers,
                DomainEvent::UpperBound => &mut watcher.upper_bound_watchers,
                DomainEvent::Assign => &mut watcher.assign_watchers,
                DomainEvent::Removal => &mut watcher.removal_watchers,
            };

            if !event_watchers.contains(&propagator_var) {
                event_watchers.push(propagator_var);
            }
        }
    }

    pub(crate) fn get_affected_propagators(
        &self,
        event: DomainEvent,
        domain: DomainId,
    ) -> &[PropagatorVarId] {
        let watcher = &self.watchers[domain];

        match event {
            DomainEvent::Assign => &watcher.assign_watchers,
            DomainEvent::LowerBound => &watcher.lower_bound_watchers,
            DomainEvent::UpperBound => &watcher.upper_bound_watchers,
            DomainEvent::Removal => &watcher.removal_watchers,
        }
    }
}
