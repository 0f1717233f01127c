use std::fmt::Display;
use std::fmt::Formatter;

use crate::engine::variables::DomainId;

/// Identifies a virtual machine of a [`ReconfigurationProblem`](super::ReconfigurationProblem).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VmId(pub u32);

impl Display for VmId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "vm#{}", self.0)
    }
}

/// The presence of one VM on one node over a time interval.
///
/// A consuming slice (c-slice) models a VM on its current host: it starts at 0 and ends when the
/// VM leaves. A demanding slice (d-slice) models a VM on its future host: it starts when the VM
/// arrives and ends at the horizon. The surrounding model enforces `end = start + duration`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slice {
    pub subject: VmId,
    /// The node index hosting the slice.
    pub host: DomainId,
    pub start: DomainId,
    pub end: DomainId,
    pub duration: DomainId,
}

/// The states a VM can be in before or after a reconfiguration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum VmState {
    #[default]
    Running,
    Ready,
    Sleeping,
    Killed,
}

impl VmState {
    /// Whether a VM in this state occupies resources of a node.
    pub fn is_running(self) -> bool {
        self == VmState::Running
    }
}

/// The transition a VM undergoes during the reconfiguration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VmTransition {
    pub source: VmState,
    pub target: VmState,
    /// The node hosting the VM; required when `source` is running.
    pub current_host: Option<usize>,
    /// The duration of the action performing the transition.
    pub duration: i32,
}
