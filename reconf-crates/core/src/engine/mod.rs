//! The constraint programming engine: domains, reversible state and the propagation loop.
mod assignments;
pub(crate) mod notifications;
pub mod predicates;
pub(crate) mod propagator_queue;
mod state;
#[cfg(test)]
pub(crate) mod test_solver;
pub(crate) mod trailed;
pub mod variables;

pub(crate) use assignments::Assignments;
pub use assignments::EmptyDomain;
pub use state::Conflict;
pub use state::State;
