//! The propagators of the reconfiguration model.
//!
//! The [`scheduler`] keeps the usage of every node and alias group below its capacity over time,
//! [`packing`] keeps the final placement within the capacities of the nodes, and [`disjoint`]
//! keeps groups of variables apart. The arithmetic propagators relate the time variables of
//! a slice.
pub(crate) mod arithmetic;
pub(crate) mod disjoint;
pub(crate) mod packing;
pub(crate) mod scheduler;
