//! The constraints of the reconfiguration core and the builders collecting their input.
//!
//! A constraint is a relation over variables, enforced through one propagator. Builders validate
//! their input eagerly and report a [`ConfigurationError`] before anything is added to the
//! [`State`].
//!
//! # Example
//! ```
//! # use reconf_core::constraints::disjoint;
//! # use reconf_core::constraints::Constraint;
//! # use reconf_core::State;
//! let mut state = State::default();
//! let x = state.new_interval_variable(0, 2, None);
//! let y = state.new_interval_variable(0, 2, None);
//!
//! disjoint(vec![vec![x], vec![y]], 3)
//!     .post(&mut state)
//!     .expect("valid groups");
//! ```
mod disjoint;
mod packing;
mod scheduler;

pub use disjoint::*;
pub use packing::*;
pub use scheduler::*;

use crate::basic_types::ConfigurationError;
use crate::propagation::PropagatorConstructor;
use crate::State;

/// A relation over variables which can be added to a [`State`].
pub trait Constraint {
    /// Add the [`Constraint`] to the [`State`].
    ///
    /// The propagator is enqueued; conflicts surface on the next call to
    /// [`State::propagate_to_fixed_point`].
    fn post(self, state: &mut State) -> Result<(), ConfigurationError>;
}

impl<ConcretePropagator> Constraint for ConcretePropagator
where
    ConcretePropagator: PropagatorConstructor + 'static,
    ConcretePropagator::PropagatorImpl: 'static,
{
    fn post(self, state: &mut State) -> Result<(), ConfigurationError> {
        let _ = state.add_propagator(self);
        Ok(())
    }
}

impl<C: Constraint> Constraint for Vec<C> {
    fn post(self, state: &mut State) -> Result<(), ConfigurationError> {
        self.into_iter().try_for_each(|c| c.post(state))
    }
}
