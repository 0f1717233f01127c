//! The reconfiguration model: VMs, their transitions and the slices they occupy.
//!
//! A [`ReconfigurationProblem`] turns the transition of every VM into slices, posts the
//! scheduler and packing constraints over them through [`ModelView`]s, and extracts a
//! [`ReconfigurationPlan`] from the first solution found.
mod model_error;
mod plan;
mod problem;
mod slice;
mod views;

pub use model_error::ModelError;
pub use plan::Action;
pub use plan::ReconfigurationPlan;
pub use problem::PlanResult;
pub use problem::ReconfigurationProblem;
pub use problem::VmSlices;
pub use slice::Slice;
pub use slice::VmId;
pub use slice::VmState;
pub use slice::VmTransition;
pub use views::ModelView;
pub use views::ViewRegistry;
