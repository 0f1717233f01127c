use enumset::enum_set;
use enumset::EnumSet;

use super::DomainEvent;

/// A set of [`DomainEvent`]s a propagator subscribes to for one variable.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DomainEvents {
    int_events: EnumSet<DomainEvent>,
}

impl DomainEvents {
    /// Lower and upper bound tightening.
    pub const BOUNDS: DomainEvents =
        DomainEvents::new(enum_set!(DomainEvent::LowerBound | DomainEvent::UpperBound));
    /// Every change to the domain.
    pub const ANY_INT: DomainEvents = DomainEvents::new(enum_set!(
        DomainEvent::Assign | DomainEvent::LowerBound | DomainEvent::UpperBound | DomainEvent::Removal
    ));
    pub const LOWER_BOUND: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::LowerBound));
    pub const UPPER_BOUND: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::UpperBound));
    pub const ASSIGN: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::Assign));
    pub const REMOVAL: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::Removal));
}

impl DomainEvents {
    pub const fn new(int_events: EnumSet<DomainEvent>) -> DomainEvents {
        DomainEvents { int_events }
    }

    pub fn get_int_events(&self) -> EnumSet<DomainEvent> {
        self.int_events
    }
}
