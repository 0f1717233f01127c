use thiserror::Error;

/// Malformed input given to one of the constraint builders. These are reported before any
/// search takes place.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("capacity {capacity} of node {node} is negative")]
    NegativeCapacity { node: usize, capacity: i64 },
    #[error("usage {usage} of slice {slice} is negative")]
    NegativeUsage { slice: usize, usage: i64 },
    #[error("expected {expected} {what}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("node index {node} is out of range for {nb_nodes} nodes")]
    NodeOutOfRange { node: usize, nb_nodes: usize },
    #[error("the host of {kind} slice {slice} can take {value}, outside [0, {nb_nodes})")]
    HostOutOfRange {
        kind: &'static str,
        slice: usize,
        value: i32,
        nb_nodes: usize,
    },
    #[error("item {item} may be assigned to bin {bin}, but there are only {nb_bins} bins")]
    BinOutOfRange { item: usize, bin: i32, nb_bins: usize },
    #[error("variable {variable} of group {group} can take {value}, outside [0, {nb_values})")]
    ValueOutOfRange {
        group: usize,
        variable: usize,
        value: i32,
        nb_values: usize,
    },
    #[error("an alias group must contain at least one node")]
    EmptyAlias,
    #[error("more than one {kind} slice is given for vm {subject}")]
    DuplicateSlice { kind: &'static str, subject: u32 },
    #[error("a disjoint constraint needs at least two groups, got {0}")]
    NotEnoughGroups(usize),
}
