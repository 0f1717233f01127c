use itertools::Itertools;
use thiserror::Error;

use super::VmId;
use crate::basic_types::ConfigurationError;

/// Errors raised while building or solving a
/// [`ReconfigurationProblem`](super::ReconfigurationProblem).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("the views depend on each other in a cycle: {}", .cycle.iter().join(" -> "))]
    DependencyCycle { cycle: Vec<String> },
    #[error("view '{view}' depends on '{dependency}', which is not registered")]
    MissingDependency { view: String, dependency: String },
    #[error("more than one view is registered as '{0}'")]
    DuplicateView(String),
    #[error("{vm} is running but has no current host")]
    MissingHost { vm: VmId },
    #[error("the transition of {vm} has negative duration {duration}")]
    InvalidDuration { vm: VmId, duration: i32 },
}
