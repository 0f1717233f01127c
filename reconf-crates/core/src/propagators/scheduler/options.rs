/// Options of the [`TaskSchedulerPropagator`](super::TaskSchedulerPropagator).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskSchedulerOptions {
    /// Tighten the start and end times of the slices on a resource on every call, instead of
    /// waiting until no host touching the resource is undecided anymore.
    pub eager_time_filtering: bool,
}
