use super::DomainEvent;

/// A [`DomainEvent`] as handed to [`Propagator::notify`](crate::propagation::Propagator::notify).
#[derive(Clone, Debug, Copy)]
pub struct OpaqueDomainEvent(DomainEvent);

impl From<DomainEvent> for OpaqueDomainEvent {
    fn from(event: DomainEvent) -> Self {
        OpaqueDomainEvent(event)
    }
}

impl OpaqueDomainEvent {
    pub fn unwrap(self) -> DomainEvent {
        self.0
    }
}
