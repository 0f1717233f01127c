use downcast_rs::impl_downcast;
use downcast_rs::Downcast;

use super::Domains;
use super::LocalId;
use super::NotificationContext;
use super::PropagationContext;
use crate::basic_types::PropagationStatusCP;
use crate::engine::notifications::OpaqueDomainEvent;

// Allows retrieving the concrete propagator behind a `Box<dyn Propagator>` through a typed handle.
impl_downcast!(Propagator);

/// A propagator removes values from domains which cannot be part of any solution, or states
/// that the current domains are inconsistent.
///
/// Only [`Propagator::name`] and [`Propagator::propagate`] are required. Propagators with
/// incremental state also implement [`Propagator::notify`] and
/// [`Propagator::debug_check_consistency`].
pub trait Propagator: Downcast {
    /// The name of the propagator, used in log messages.
    fn name(&self) -> &str;

    /// Remove values from the domains (through [`PropagationContext::post`]) which cannot be part
    /// of any solution given the current domains, or report an inconsistency.
    ///
    /// The propagator does not have to reach a fixed point itself; it is called again as long as
    /// it is notified of changes it subscribed to.
    fn propagate(&mut self, context: PropagationContext) -> PropagationStatusCP;

    /// Called for every subscribed event on a watched variable, including the events caused by
    /// this propagator. Used to update trailed bookkeeping; expensive work belongs in
    /// [`Propagator::propagate`].
    ///
    /// By default the propagator is always enqueued.
    fn notify(
        &mut self,
        _context: NotificationContext,
        _local_id: LocalId,
        _event: OpaqueDomainEvent,
    ) -> EnqueueDecision {
        EnqueueDecision::Enqueue
    }

    /// Called after the state has been restored to an earlier checkpoint. Trailed values are
    /// already restored at that point.
    fn synchronise(&mut self, _domains: Domains) {}

    /// The [`Priority`] with which the propagator is enqueued.
    fn priority(&self) -> Priority {
        Priority::VeryLow
    }

    /// Compare the incrementally maintained bookkeeping of the propagator with a recomputation
    /// from the current domains. Only called when debug checks are enabled; returning `false`
    /// indicates a bug in the propagator.
    fn debug_check_consistency(&self, _domains: Domains) -> bool {
        true
    }
}

/// Indicator of what to do when a propagator is notified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueDecision {
    /// The propagator should be enqueued.
    Enqueue,
    /// The propagator should not be enqueued.
    Skip,
}

/// The priority of a propagator. Propagators with a higher priority run first; cheap propagators
/// should get a high priority.
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
    #[default]
    VeryLow = 3,
}
