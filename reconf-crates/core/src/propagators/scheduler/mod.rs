//! The cumulative scheduler over consuming and demanding slices.
mod checker;
mod options;
mod profile;
mod resource;
mod task_scheduler;

pub use checker::SchedulerAssignment;
pub use checker::SchedulerChecker;
pub use checker::SchedulerViolation;
pub use options::TaskSchedulerOptions;
pub(crate) use profile::MandatoryProfile;
pub(crate) use resource::LocalResource;
pub(crate) use resource::ResourceDimension;
pub use task_scheduler::KnownSlices;
pub(crate) use task_scheduler::SchedulerTask;
pub use task_scheduler::TaskSchedulerConstructor;
pub use task_scheduler::TaskSchedulerPropagator;
