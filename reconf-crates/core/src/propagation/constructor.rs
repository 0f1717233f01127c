use super::Domains;
use super::LocalId;
use super::Propagator;
use super::PropagatorId;
use super::PropagatorVarId;
use super::WriteTrailedValues;
use crate::engine::trailed::TrailedInteger;
use crate::engine::trailed::TrailedValues;
use crate::engine::variables::DomainId;
use crate::engine::State;
use crate::propagation::DomainEvents;

/// Creates a fully initialised [`Propagator`].
///
/// The constructor subscribes the propagator to the events it needs and allocates its trailed
/// state.
pub trait PropagatorConstructor {
    /// The propagator that is produced by this constructor.
    type PropagatorImpl: Propagator;

    /// Create the propagator instance from `Self`.
    fn create(self, context: PropagatorConstructorContext) -> Self::PropagatorImpl;
}

/// Handed to a [`PropagatorConstructor`] to register variables and to allocate trailed values.
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    state: &'a mut State,
    propagator_id: PropagatorId,
}

impl PropagatorConstructorContext<'_> {
    pub(crate) fn new(
        propagator_id: PropagatorId,
        state: &mut State,
    ) -> PropagatorConstructorContext<'_> {
        PropagatorConstructorContext {
            state,
            propagator_id,
        }
    }

    /// Get domain information.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(&self.state.assignments, &self.state.trailed_values)
    }

    /// Subscribe the propagator to the given events of `var`. The [`LocalId`] is what
    /// [`Propagator::notify`] receives; every variable of a propagator needs its own.
    pub fn register(&mut self, var: DomainId, domain_events: DomainEvents, local_id: LocalId) {
        let propagator_var = PropagatorVarId {
            propagator: self.propagator_id,
            variable: local_id,
        };

        self.state
            .notification_engine
            .watch_all(var, domain_events.get_int_events(), propagator_var);
    }

    pub(crate) fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.state.trailed_values.grow(initial_value)
    }
}

impl WriteTrailedValues for PropagatorConstructorContext<'_> {
    fn trailed_values_mut(&mut self) -> &mut TrailedValues {
        &mut self.state.trailed_values
    }
}
