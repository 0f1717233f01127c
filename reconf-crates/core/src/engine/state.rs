use log::debug;

use crate::basic_types::ConflictCause;
use crate::basic_types::Inconsistency;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::engine::notifications::NotificationEngine;
use crate::engine::predicates::Predicate;
use crate::engine::propagator_queue::PropagatorQueue;
use crate::engine::trailed::TrailedValues;
use crate::engine::variables::DomainId;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;
use crate::propagation::Domains;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::PropagatorHandle;
use crate::propagation::PropagatorId;
use crate::propagation::PropagatorStore;
use crate::reconf_asserts::reconf_assert_advanced;
use crate::reconf_asserts::reconf_assert_eq_simple;
use crate::reconf_asserts::reconf_assert_simple;

/// The [`State`] is the container of variables and propagators.
///
/// Domain changes are made with [`State::post`] and propagated with
/// [`State::propagate_to_fixed_point`]. Every change made after a call to
/// [`State::new_checkpoint`] is undone by [`State::restore_to`].
#[derive(Debug, Default)]
pub struct State {
    /// The propagators; they are notified when the domains of the variables they watch change.
    pub(crate) propagators: PropagatorStore,
    /// The domains of the integer variables.
    pub(crate) assignments: Assignments,
    /// Values which are restored automatically on backtracking.
    pub(crate) trailed_values: TrailedValues,
    /// Dictates the order in which propagators are called.
    pub(crate) propagator_queue: PropagatorQueue,
    /// Delivers domain events to the watching propagators.
    pub(crate) notification_engine: NotificationEngine,
    variable_names: KeyedVec<DomainId, Option<String>>,
}

/// Information concerning the conflict returned by [`State::propagate_to_fixed_point`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Conflict {
    /// A propagator explicitly detected an inconsistency.
    Propagator {
        propagator: PropagatorId,
        cause: ConflictCause,
    },
    /// A propagator posted a change which left a domain without values.
    EmptyDomain { propagator: PropagatorId },
}

impl Conflict {
    /// The propagator which reported the conflict.
    pub fn propagator(&self) -> PropagatorId {
        match self {
            Conflict::Propagator { propagator, .. } | Conflict::EmptyDomain { propagator } => {
                *propagator
            }
        }
    }

    pub fn cause(&self) -> Option<ConflictCause> {
        match self {
            Conflict::Propagator { cause, .. } => Some(*cause),
            Conflict::EmptyDomain { .. } => None,
        }
    }
}

/// Operations to create variables.
impl State {
    /// Creates a new interval variable with the given lower and upper bound.
    ///
    /// Variables are not influenced by checkpoints: a variable created at a non-zero checkpoint
    /// does not disappear when restoring past that checkpoint.
    pub fn new_interval_variable(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: Option<String>,
    ) -> DomainId {
        reconf_assert_simple!(
            lower_bound <= upper_bound,
            "Cannot create the empty domain [{lower_bound}, {upper_bound}]"
        );
        let domain_id = self.assignments.grow(lower_bound, upper_bound);
        self.notification_engine.grow();
        self.variable_names.accomodate(domain_id, None);
        self.variable_names[domain_id] = name;

        domain_id
    }

    /// The name given to the variable at creation, if any.
    pub fn variable_name(&self, domain_id: DomainId) -> Option<&str> {
        self.variable_names.get(domain_id)?.as_deref()
    }

    pub fn num_variables(&self) -> usize {
        self.assignments.num_domains()
    }

    pub fn variables(&self) -> impl Iterator<Item = DomainId> {
        self.assignments.get_domains()
    }
}

/// Operations to retrieve information about values.
impl State {
    pub fn lower_bound(&self, domain_id: DomainId) -> i32 {
        self.assignments.get_lower_bound(domain_id)
    }

    pub fn upper_bound(&self, domain_id: DomainId) -> i32 {
        self.assignments.get_upper_bound(domain_id)
    }

    pub fn contains(&self, domain_id: DomainId, value: i32) -> bool {
        self.assignments.is_value_in_domain(domain_id, value)
    }

    pub fn is_fixed(&self, domain_id: DomainId) -> bool {
        self.assignments.is_domain_assigned(domain_id)
    }

    /// The value of the variable if its domain is a singleton.
    pub fn fixed_value(&self, domain_id: DomainId) -> Option<i32> {
        self.assignments.get_assigned_value(domain_id)
    }

    pub fn domain_size(&self, domain_id: DomainId) -> usize {
        self.assignments.get_domain_size(domain_id)
    }

    /// The values of the domain in increasing order.
    pub fn iterate_domain(&self, domain_id: DomainId) -> impl Iterator<Item = i32> + '_ {
        self.assignments.get_domain_iterator(domain_id)
    }

    /// Returns whether the predicate is true, false, or undecided in the current domains.
    pub fn truth_value(&self, predicate: Predicate) -> Option<bool> {
        self.assignments.evaluate_predicate(predicate)
    }

    pub fn get_checkpoint(&self) -> usize {
        self.assignments.get_checkpoint()
    }

    /// Read-only access to the domains, as taken by the query methods of propagators.
    pub fn get_domains(&self) -> Domains<'_> {
        Domains::new(&self.assignments, &self.trailed_values)
    }
}

/// Operations for adding and retrieving propagators.
impl State {
    /// Add a new propagator. The constructor subscribes the propagator to the domain events it
    /// needs.
    ///
    /// The propagator is enqueued but not run; call [`State::propagate_to_fixed_point`] to run it
    /// for the first time.
    pub fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> PropagatorHandle<Constructor::PropagatorImpl>
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        let propagator_id = self.propagators.next_id();
        let constructor_context = PropagatorConstructorContext::new(propagator_id, self);
        let propagator = constructor.create(constructor_context);

        debug!("adding propagator {} as {propagator_id}", propagator.name());

        let handle = self.propagators.add_propagator(propagator);
        reconf_assert_eq_simple!(handle.propagator_id(), propagator_id);

        let priority = self.propagators[propagator_id].priority();
        self.propagator_queue
            .enqueue_propagator(propagator_id, priority);

        handle
    }

    /// Get a reference to the propagator identified by the given handle.
    pub fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.propagators.get_propagator(handle)
    }

    pub fn num_propagators(&self) -> usize {
        self.propagators.num_propagators()
    }
}

/// Operations for modifying the state.
impl State {
    /// Apply a [`Predicate`] to the domains.
    ///
    /// Returns `true` if a domain changed, and `false` if the predicate already held. No
    /// propagation takes place; see [`State::propagate_to_fixed_point`].
    ///
    /// # Example
    /// ```
    /// use reconf_core::predicate;
    /// use reconf_core::State;
    ///
    /// let mut state = State::default();
    /// let variable = state.new_interval_variable(1, 10, Some("x1".to_owned()));
    ///
    /// state.new_checkpoint();
    /// assert_eq!(state.get_checkpoint(), 1);
    ///
    /// state
    ///     .post(predicate!(variable <= 5))
    ///     .expect("the lower bound is 1");
    /// assert_eq!(state.upper_bound(variable), 5);
    ///
    /// state.restore_to(0);
    /// assert_eq!(state.upper_bound(variable), 10);
    /// ```
    pub fn post(&mut self, predicate: Predicate) -> Result<bool, EmptyDomain> {
        self.assignments
            .post_predicate(predicate, &mut self.notification_engine)
    }

    /// Create a checkpoint which can be returned to with [`State::restore_to`].
    ///
    /// Panics if the state is not at a fixed point.
    pub fn new_checkpoint(&mut self) {
        reconf_assert_simple!(
            self.propagator_queue.is_empty(),
            "Can only create a new checkpoint when all propagation has occurred"
        );
        self.assignments.new_checkpoint();
        self.trailed_values.new_checkpoint();
    }

    /// Undo all changes made after `checkpoint` was created. Restoring to the current checkpoint
    /// is a no-op; restoring to a later checkpoint panics.
    pub fn restore_to(&mut self, checkpoint: usize) {
        reconf_assert_simple!(checkpoint <= self.get_checkpoint());
        if checkpoint == self.get_checkpoint() {
            // Pending events stem from posts that will be discarded with the failed node.
            self.notification_engine.clear_events();
            self.propagator_queue.clear();
            return;
        }

        self.assignments.synchronise(checkpoint);
        self.trailed_values.synchronise(checkpoint);

        self.notification_engine.clear_events();
        self.propagator_queue.clear();

        for propagator in self.propagators.iter_propagators_mut() {
            let domains = Domains::new(&self.assignments, &self.trailed_values);
            propagator.synchronise(domains);
        }
    }

    /// Perform a single call to [`Propagator::propagate`] and deliver the resulting events.
    fn propagate(&mut self, propagator_id: PropagatorId) -> Result<(), Conflict> {
        let propagation_status = {
            let propagator = &mut self.propagators[propagator_id];
            let context = PropagationContext::new(
                &mut self.trailed_values,
                &mut self.assignments,
                &mut self.notification_engine,
            );
            propagator.propagate(context)
        };

        match propagation_status {
            Ok(()) => {
                self.notification_engine
                    .notify_propagators_about_domain_events(
                        &self.assignments,
                        &mut self.trailed_values,
                        &mut self.propagators,
                        &mut self.propagator_queue,
                    );
                reconf_assert_advanced!(
                    self.propagators[propagator_id].debug_check_consistency(Domains::new(
                        &self.assignments,
                        &self.trailed_values
                    )),
                    "The bookkeeping of {} ({propagator_id}) does not match its domains",
                    self.propagators[propagator_id].name(),
                );
                Ok(())
            }
            Err(inconsistency) => {
                self.notification_engine.clear_events();
                self.propagator_queue.clear();

                let conflict = match inconsistency {
                    Inconsistency::EmptyDomain => Conflict::EmptyDomain {
                        propagator: propagator_id,
                    },
                    Inconsistency::Conflict(conflict) => Conflict::Propagator {
                        propagator: propagator_id,
                        cause: conflict.cause,
                    },
                };
                debug!(
                    "{} ({propagator_id}) failed: {conflict:?}",
                    self.propagators[propagator_id].name()
                );

                Err(conflict)
            }
        }
    }

    /// Perform fixed-point propagation.
    ///
    /// Posted predicates and added propagators cause propagators to be enqueued; they run until
    /// no propagator changes a domain anymore. After a [`Conflict`] the only meaningful operation
    /// is [`State::restore_to`].
    pub fn propagate_to_fixed_point(&mut self) -> Result<(), Conflict> {
        // The first events are those of the posted predicates.
        self.notification_engine
            .notify_propagators_about_domain_events(
                &self.assignments,
                &mut self.trailed_values,
                &mut self.propagators,
                &mut self.propagator_queue,
            );

        while let Some(propagator_id) = self.propagator_queue.pop() {
            self.propagate(propagator_id)?;
        }

        Ok(())
    }

    /// Enqueue every propagator, e.g. to check that the state is at a fixed point.
    pub(crate) fn enqueue_all_propagators(&mut self) {
        for index in 0..self.propagators.num_propagators() {
            let propagator_id = PropagatorId::create_from_index(index);
            let priority = self.propagators[propagator_id].priority();
            self.propagator_queue
                .enqueue_propagator(propagator_id, priority);
        }
    }
}
