/// Options of the [`VectorPackingPropagator`](super::VectorPackingPropagator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorPackingOptions {
    /// Remove bins from items which are too large for them, and force items into bins which
    /// cannot reach their minimal load without them.
    pub knapsack_filtering: bool,
    /// The largest load window, and the largest total size of undecided items of a bin, for
    /// which the exactly reachable loads of the bin are computed. `0` disables the filtering.
    pub reachability_limit: u32,
}

impl Default for VectorPackingOptions {
    fn default() -> Self {
        VectorPackingOptions {
            knapsack_filtering: true,
            reachability_limit: 4096,
        }
    }
}
