//! The interface between propagators and the solver state.
//!
//! A propagator is created from a [`PropagatorConstructor`], which subscribes it to the
//! [`DomainEvents`] of the variables it watches, each under a [`LocalId`]. Whenever such an event
//! happens, [`Propagator::notify`] is called so the propagator can update its trailed bookkeeping
//! and decide whether it wants to run. Enqueued propagators are run through
//! [`Propagator::propagate`] until no propagator changes a domain anymore.
//!
//! All mutable state of a propagator that depends on the position in the search tree must be
//! stored in trailed values, which are restored automatically on backtracking.
mod constructor;
mod contexts;
mod domains;
mod local_id;
mod propagator;
mod propagator_id;
mod store;

pub use constructor::PropagatorConstructor;
pub use constructor::PropagatorConstructorContext;
pub use contexts::NotificationContext;
pub use contexts::PropagationContext;
pub(crate) use contexts::WriteTrailedValues;
pub use domains::Domains;
pub(crate) use domains::HasAssignments;
pub(crate) use domains::ReadDomains;
pub use local_id::LocalId;
pub use propagator::EnqueueDecision;
pub use propagator::Priority;
pub use propagator::Propagator;
pub use propagator_id::PropagatorId;
pub(crate) use propagator_id::PropagatorVarId;
pub use store::PropagatorHandle;
pub(crate) use store::PropagatorStore;

pub use crate::basic_types::Inconsistency;
pub use crate::basic_types::PropagationStatusCP;
pub use crate::basic_types::PropagatorConflict;
pub use crate::engine::notifications::DomainEvent;
pub use crate::engine::notifications::DomainEvents;
pub use crate::engine::notifications::OpaqueDomainEvent;
