//! # reconf-core
//! The propagation core of a solver computing reconfiguration plans for virtual machines hosted
//! on a set of nodes.
//!
//! A VM present on a node over an interval of time is modelled by a [`model::Slice`]. The core
//! provides three constraints over slices:
//! - a cumulative scheduler which keeps the usage of every node, and of every group of aliased
//!   nodes, within its capacity at every instant
//!   ([`constraints::SchedulerBuilder`]);
//! - a vector bin-packing of the final placement over all resource dimensions
//!   ([`constraints::PackingBuilder`]);
//! - disjointness between groups of variables ([`constraints::disjoint`]).
//!
//! The constraints are propagated by a small constraint programming engine: integer domains,
//! reversible state restored on backtracking, and a propagation queue running every
//! [`propagation::Propagator`] to a fixed point. A depth-first [`search`] finds solutions.
//!
//! # Using the model
//! The [`model::ReconfigurationProblem`] creates the slices of every VM transition, posts the
//! constraints and extracts a [`model::ReconfigurationPlan`]:
//! ```rust
//! # use reconf_core::model::Action;
//! # use reconf_core::model::PlanResult;
//! # use reconf_core::model::ReconfigurationProblem;
//! # use reconf_core::model::VmState;
//! # use reconf_core::model::VmTransition;
//! # use reconf_core::termination::Indefinite;
//! // Two nodes with one unit of memory each; the VM on node 0 has to make room.
//! let mut problem = ReconfigurationProblem::new(2, 10);
//! let _ = problem
//!     .add_vm(VmTransition {
//!         source: VmState::Running,
//!         target: VmState::Killed,
//!         current_host: Some(0),
//!         duration: 2,
//!     })
//!     .unwrap();
//! let _ = problem
//!     .add_vm(VmTransition {
//!         source: VmState::Ready,
//!         target: VmState::Running,
//!         current_host: None,
//!         duration: 3,
//!     })
//!     .unwrap();
//! problem.add_dimension(&[1, 0], &[1, 0], &[0, 1]).unwrap();
//!
//! let PlanResult::Plan(plan) = problem.solve(&mut Indefinite).unwrap() else {
//!     panic!("a plan exists");
//! };
//! assert!(matches!(plan.actions[0], Action::Shutdown { end: 2, .. }));
//! assert!(matches!(plan.actions[1], Action::Boot { node: 0, start: 2, .. }));
//! ```
//!
//! # Using the state directly
//! ```rust
//! # use reconf_core::constraints::disjoint;
//! # use reconf_core::constraints::Constraint;
//! # use reconf_core::predicate;
//! # use reconf_core::State;
//! let mut state = State::default();
//! let x = state.new_interval_variable(0, 3, None);
//! let y = state.new_interval_variable(0, 3, None);
//! disjoint(vec![vec![x], vec![y]], 4).post(&mut state).unwrap();
//!
//! let _ = state.post(predicate!(x == 2)).unwrap();
//! state.propagate_to_fixed_point().unwrap();
//! assert!(!state.contains(y, 2));
//! ```
pub(crate) mod basic_types;
pub mod containers;
pub(crate) mod engine;
pub mod propagation;
pub(crate) mod propagators;
pub(crate) mod reconf_asserts;

pub mod branching;
pub mod constraints;
pub mod model;
pub mod search;
pub mod termination;

pub use crate::basic_types::ConfigurationError;
pub use crate::basic_types::ConflictCause;
pub use crate::engine::predicates;
pub use crate::engine::variables;
pub use crate::engine::Conflict;
pub use crate::engine::EmptyDomain;
pub use crate::engine::State;
pub use crate::propagators::disjoint::DisjointConstructor;
pub use crate::propagators::disjoint::DisjointPropagator;
pub use crate::propagators::packing::VectorPackingConstructor;
pub use crate::propagators::packing::VectorPackingOptions;
pub use crate::propagators::packing::VectorPackingPropagator;
pub use crate::propagators::scheduler::KnownSlices;
pub use crate::propagators::scheduler::SchedulerAssignment;
pub use crate::propagators::scheduler::SchedulerChecker;
pub use crate::propagators::scheduler::SchedulerViolation;
pub use crate::propagators::scheduler::TaskSchedulerConstructor;
pub use crate::propagators::scheduler::TaskSchedulerOptions;
pub use crate::propagators::scheduler::TaskSchedulerPropagator;
