//! Delivery of domain events to the propagators that watch the changed variables.
mod domain_event;
mod domain_events;
mod notification_engine;
mod opaque_domain_event;
mod watch_list;

pub use domain_event::DomainEvent;
pub use domain_events::DomainEvents;
pub(crate) use notification_engine::NotificationEngine;
pub use opaque_domain_event::OpaqueDomainEvent;
pub(crate) use watch_list::WatchListDomainEvents;
