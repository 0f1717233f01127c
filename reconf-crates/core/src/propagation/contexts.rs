use super::domains::HasAssignments;
use super::Domains;
use crate::engine::notifications::NotificationEngine;
use crate::engine::predicates::Predicate;
use crate::engine::trailed::TrailedInteger;
use crate::engine::trailed::TrailedValues;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;

/// The context of [`Propagator::propagate`](super::Propagator::propagate): read access to the
/// domains, write access to trailed values and the ability to post predicates.
#[derive(Debug)]
pub struct PropagationContext<'a> {
    trailed_values: &'a mut TrailedValues,
    assignments: &'a mut Assignments,
    notification_engine: &'a mut NotificationEngine,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(
        trailed_values: &'a mut TrailedValues,
        assignments: &'a mut Assignments,
        notification_engine: &'a mut NotificationEngine,
    ) -> Self {
        PropagationContext {
            trailed_values,
            assignments,
            notification_engine,
        }
    }

    pub fn as_readonly(&self) -> Domains<'_> {
        Domains::new(&*self.assignments, &*self.trailed_values)
    }

    /// Apply `predicate` to the domains. Returns [`EmptyDomain`] if the predicate contradicts the
    /// current domain of its variable.
    pub fn post(&mut self, predicate: Predicate) -> Result<(), EmptyDomain> {
        let _ = self
            .assignments
            .post_predicate(predicate, &mut *self.notification_engine)?;
        Ok(())
    }
}

impl HasAssignments for PropagationContext<'_> {
    fn assignments(&self) -> &Assignments {
        &*self.assignments
    }

    fn trailed_values(&self) -> &TrailedValues {
        &*self.trailed_values
    }
}

impl WriteTrailedValues for PropagationContext<'_> {
    fn trailed_values_mut(&mut self) -> &mut TrailedValues {
        &mut *self.trailed_values
    }
}

/// The context of [`Propagator::notify`](super::Propagator::notify): the domains can be read
/// and the trailed values of the propagator can be updated.
#[derive(Debug)]
pub struct NotificationContext<'a> {
    trailed_values: &'a mut TrailedValues,
    assignments: &'a Assignments,
}

impl<'a> NotificationContext<'a> {
    pub(crate) fn new(trailed_values: &'a mut TrailedValues, assignments: &'a Assignments) -> Self {
        NotificationContext {
            trailed_values,
            assignments,
        }
    }

    pub fn as_readonly(&self) -> Domains<'_> {
        Domains::new(self.assignments, &*self.trailed_values)
    }
}

impl HasAssignments for NotificationContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }

    fn trailed_values(&self) -> &TrailedValues {
        &*self.trailed_values
    }
}

impl WriteTrailedValues for NotificationContext<'_> {
    fn trailed_values_mut(&mut self) -> &mut TrailedValues {
        &mut *self.trailed_values
    }
}

/// Contexts in which the trailed values of a propagator may be changed.
pub(crate) trait WriteTrailedValues {
    fn trailed_values_mut(&mut self) -> &mut TrailedValues;

    fn assign_trailed(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.trailed_values_mut().assign(trailed_integer, value);
    }

    fn add_assign_trailed(&mut self, trailed_integer: TrailedInteger, addition: i64) {
        self.trailed_values_mut().add_assign(trailed_integer, addition);
    }
}
