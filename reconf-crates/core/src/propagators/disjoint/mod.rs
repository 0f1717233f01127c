//! Disjointness between groups of variables.
mod disjoint;

pub use disjoint::DisjointConstructor;
pub use disjoint::DisjointPropagator;
