mod configuration_error;
mod propagation_status_cp;
mod trail;

pub use configuration_error::ConfigurationError;
pub use propagation_status_cp::ConflictCause;
pub use propagation_status_cp::Inconsistency;
pub use propagation_status_cp::PropagationStatusCP;
pub use propagation_status_cp::PropagatorConflict;
pub(crate) use trail::Trail;
