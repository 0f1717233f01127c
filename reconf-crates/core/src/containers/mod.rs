//! Index-keyed storage used throughout the crate. Entities (variables, propagators, trailed
//! integers, slices) are referred to by small integer keys instead of references.
mod keyed_vec;

pub use keyed_vec::KeyedVec;
pub use keyed_vec::StorageKey;
