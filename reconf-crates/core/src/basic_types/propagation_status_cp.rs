use crate::engine::EmptyDomain;

/// The result of invoking a propagator. Propagation either succeeds or identifies an
/// inconsistency, after which the search has to backtrack.
pub type PropagationStatusCP = Result<(), Inconsistency>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Inconsistency {
    EmptyDomain,
    Conflict(PropagatorConflict),
}

impl From<EmptyDomain> for Inconsistency {
    fn from(_: EmptyDomain) -> Self {
        Inconsistency::EmptyDomain
    }
}

impl From<PropagatorConflict> for Inconsistency {
    fn from(conflict: PropagatorConflict) -> Self {
        Inconsistency::Conflict(conflict)
    }
}

/// A conflict stated by a propagator which is _not_ an empty domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropagatorConflict {
    pub cause: ConflictCause,
}

impl From<ConflictCause> for PropagatorConflict {
    fn from(cause: ConflictCause) -> Self {
        PropagatorConflict { cause }
    }
}

impl From<ConflictCause> for Inconsistency {
    fn from(cause: ConflictCause) -> Self {
        Inconsistency::Conflict(cause.into())
    }
}

/// What a propagator found to be violated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictCause {
    /// The mandatory usage of a resource exceeds its capacity at `time`.
    CapacityExceeded {
        resource: usize,
        dimension: usize,
        time: i32,
    },
    /// The total item size of a dimension does not fit between the summed load bounds.
    TotalSizeMismatch { dimension: usize },
    /// No subset of the candidate items reaches a load inside the bounds of the bin.
    UnreachableLoad { bin: usize, dimension: usize },
    /// Two groups of a disjoint constraint both require `value`.
    GroupCollision { value: i32 },
}
