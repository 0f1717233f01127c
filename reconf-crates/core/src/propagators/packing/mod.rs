//! Vector bin-packing: every item is put in one bin and, in every dimension, the load of a bin
//! is the total size of its items.
mod options;
mod vector_packing;

pub use options::VectorPackingOptions;
pub use vector_packing::VectorPackingConstructor;
pub use vector_packing::VectorPackingPropagator;
