use log::debug;
use log::trace;

use super::resource::LocalResource;
use super::resource::Membership;
use super::resource::ResourceDimension;
use super::MandatoryProfile;
use super::TaskSchedulerOptions;
use crate::basic_types::ConflictCause;
use crate::basic_types::PropagationStatusCP;
use crate::engine::trailed::TrailedBitSet;
use crate::engine::trailed::TrailedInteger;
use crate::engine::variables::DomainId;
use crate::predicate;
use crate::propagation::DomainEvents;
use crate::propagation::Domains;
use crate::propagation::EnqueueDecision;
use crate::propagation::HasAssignments;
use crate::propagation::LocalId;
use crate::propagation::NotificationContext;
use crate::propagation::OpaqueDomainEvent;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::propagation::WriteTrailedValues;

/// The variables of a slice the scheduler reasons about. For a c-slice `time` is its end, for a
/// d-slice its start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SchedulerTask {
    pub(crate) host: DomainId,
    pub(crate) time: DomainId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SliceKind {
    Consuming,
    Demanding,
}

/// Creates a [`TaskSchedulerPropagator`]; obtained from
/// [`SchedulerBuilder::build`](crate::constraints::SchedulerBuilder::build).
#[derive(Clone, Debug)]
pub struct TaskSchedulerConstructor {
    pub(crate) c_slices: Vec<SchedulerTask>,
    pub(crate) d_slices: Vec<SchedulerTask>,
    /// The nodes, in order, followed by the alias groups.
    pub(crate) resources: Vec<LocalResource>,
    /// Pairs of a c-slice and a d-slice of the same VM.
    pub(crate) associations: Vec<(usize, usize)>,
    pub(crate) options: TaskSchedulerOptions,
}

impl PropagatorConstructor for TaskSchedulerConstructor {
    type PropagatorImpl = TaskSchedulerPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let TaskSchedulerConstructor {
            c_slices,
            d_slices,
            resources,
            associations,
            options,
        } = self;

        debug!(
            "posting task scheduler over {} c-slices, {} d-slices and {} resources",
            c_slices.len(),
            d_slices.len(),
            resources.len()
        );

        for (index, task) in c_slices.iter().chain(d_slices.iter()).enumerate() {
            let index = index as u32;
            context.register(task.host, DomainEvents::ANY_INT, LocalId::from(2 * index));
            context.register(task.time, DomainEvents::BOUNDS, LocalId::from(2 * index + 1));
        }

        let resources = resources
            .into_iter()
            .map(|resource| ResourceState::new(&mut context, resource, &c_slices, &d_slices))
            .collect();

        TaskSchedulerPropagator {
            c_slices: c_slices.into_boxed_slice(),
            d_slices: d_slices.into_boxed_slice(),
            resources,
            associations: associations.into_boxed_slice(),
            options,
        }
    }
}

/// A resource together with the trailed partition of the slices touching it.
#[derive(Clone, Debug)]
struct ResourceState {
    resource: LocalResource,
    known_c: TrailedBitSet,
    candidate_c: TrailedBitSet,
    known_d: TrailedBitSet,
    candidate_d: TrailedBitSet,
    /// The number of candidate slices, i.e. of hosts touching the resource which are undecided.
    pending: TrailedInteger,
}

impl ResourceState {
    fn new(
        context: &mut PropagatorConstructorContext,
        resource: LocalResource,
        c_slices: &[SchedulerTask],
        d_slices: &[SchedulerTask],
    ) -> ResourceState {
        let c_memberships = c_slices
            .iter()
            .map(|task| resource.membership(&context.domains(), task.host))
            .collect::<Vec<_>>();
        let d_memberships = d_slices
            .iter()
            .map(|task| resource.membership(&context.domains(), task.host))
            .collect::<Vec<_>>();

        let trailed_values = context.trailed_values_mut();
        let known_c = TrailedBitSet::new(trailed_values, c_slices.len(), false);
        let candidate_c = TrailedBitSet::new(trailed_values, c_slices.len(), false);
        let known_d = TrailedBitSet::new(trailed_values, d_slices.len(), false);
        let candidate_d = TrailedBitSet::new(trailed_values, d_slices.len(), false);

        let mut pending = 0;
        for (memberships, known, candidate) in [
            (&c_memberships, &known_c, &candidate_c),
            (&d_memberships, &known_d, &candidate_d),
        ] {
            for (index, membership) in memberships.iter().enumerate() {
                match membership {
                    Membership::Known => {
                        let _ = known.insert(trailed_values, index);
                    }
                    Membership::Candidate => {
                        let _ = candidate.insert(trailed_values, index);
                        pending += 1;
                    }
                    Membership::Outside => {}
                }
            }
        }

        let pending = context.new_trailed_integer(pending);

        ResourceState {
            resource,
            known_c,
            candidate_c,
            known_d,
            candidate_d,
            pending,
        }
    }

    fn sets(&self, kind: SliceKind) -> (&TrailedBitSet, &TrailedBitSet) {
        match kind {
            SliceKind::Consuming => (&self.known_c, &self.candidate_c),
            SliceKind::Demanding => (&self.known_d, &self.candidate_d),
        }
    }
}

/// Propagator ensuring that, on every node and alias group and in every dimension, the usage of
/// the slices present never exceeds the capacity.
///
/// A c-slice is present on its host during `[0, end)`, a d-slice from its start onwards. The
/// propagator sweeps the mandatory profile of every resource (see [`MandatoryProfile`]), fails
/// when it exceeds the capacity, removes the resource from the hosts of candidate slices which
/// cannot fit, and tightens the end of c-slices and the start of d-slices hosted on the
/// resource.
///
/// The time tightenings of a resource run once none of the hosts touching it is undecided,
/// unless [`TaskSchedulerOptions::eager_time_filtering`] is set.
#[derive(Clone, Debug)]
pub struct TaskSchedulerPropagator {
    c_slices: Box<[SchedulerTask]>,
    d_slices: Box<[SchedulerTask]>,
    resources: Box<[ResourceState]>,
    associations: Box<[(usize, usize)]>,
    options: TaskSchedulerOptions,
}

/// Indices of the slices hosted on a resource for certain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KnownSlices {
    pub consuming: Vec<usize>,
    pub demanding: Vec<usize>,
}

impl TaskSchedulerPropagator {
    /// The number of resources: first one per node, then one per alias group in the order in
    /// which they were added.
    pub fn num_resources(&self) -> usize {
        self.resources.len()
    }

    /// The mandatory usage of `dimension` on `resource` as `(start, level)` pairs; each level
    /// holds until the start of the next pair.
    pub fn mandatory_profile(
        &self,
        domains: Domains,
        resource: usize,
        dimension: usize,
    ) -> Vec<(i32, i64)> {
        let state = &self.resources[resource];
        self.build_profile(&domains, state, &state.resource.dimensions[dimension])
            .levels()
    }

    pub fn known_slices(&self, domains: Domains, resource: usize) -> KnownSlices {
        let state = &self.resources[resource];
        let trailed_values = domains.trailed_values();
        KnownSlices {
            consuming: state.known_c.iter(trailed_values).collect(),
            demanding: state.known_d.iter(trailed_values).collect(),
        }
    }

    /// The number of slices whose host may, but need not, be on `resource`.
    pub fn pending(&self, domains: Domains, resource: usize) -> usize {
        domains.value(self.resources[resource].pending) as usize
    }

    fn decode(&self, local_id: LocalId) -> (SliceKind, usize, bool) {
        let index = local_id.unpack() as usize / 2;
        let is_host = local_id.unpack() % 2 == 0;

        if index < self.c_slices.len() {
            (SliceKind::Consuming, index, is_host)
        } else {
            (SliceKind::Demanding, index - self.c_slices.len(), is_host)
        }
    }

    fn task(&self, kind: SliceKind, index: usize) -> SchedulerTask {
        match kind {
            SliceKind::Consuming => self.c_slices[index],
            SliceKind::Demanding => self.d_slices[index],
        }
    }

    /// Move the slice out of the candidate set of every resource it is no longer a candidate for.
    /// Returns whether any set changed.
    fn update_membership<Context: ReadDomains + WriteTrailedValues>(
        &self,
        context: &mut Context,
        kind: SliceKind,
        index: usize,
    ) -> bool {
        let host = self.task(kind, index).host;
        let mut changed = false;

        for state in self.resources.iter() {
            let (known, candidate) = state.sets(kind);
            if !candidate.contains(context.trailed_values(), index) {
                continue;
            }

            let membership = state.resource.membership(&*context, host);
            if membership == Membership::Candidate {
                continue;
            }

            let trailed_values = context.trailed_values_mut();
            let _ = candidate.remove(trailed_values, index);
            if membership == Membership::Known {
                let _ = known.insert(trailed_values, index);
            }
            context.add_assign_trailed(state.pending, -1);
            changed = true;
        }

        changed
    }

    fn build_profile<Context: ReadDomains>(
        &self,
        context: &Context,
        state: &ResourceState,
        dimension: &ResourceDimension,
    ) -> MandatoryProfile {
        let trailed_values = context.trailed_values();
        let mut base_level = 0;
        let mut changes = Vec::new();

        for index in state.known_c.iter(trailed_values) {
            let usage = dimension.c_usages[index];
            if usage == 0 {
                continue;
            }
            base_level += usage;
            changes.push((context.lower_bound(self.c_slices[index].time), -usage));
        }
        for index in state.known_d.iter(trailed_values) {
            let usage = dimension.d_usages[index];
            if usage == 0 {
                continue;
            }
            changes.push((context.upper_bound(self.d_slices[index].time), usage));
        }

        MandatoryProfile::from_changes(base_level, changes)
    }

    fn propagate_resource(
        &self,
        context: &mut PropagationContext,
        resource_index: usize,
    ) -> PropagationStatusCP {
        let state = &self.resources[resource_index];
        let tighten_times =
            self.options.eager_time_filtering || context.value(state.pending) == 0;

        for (dimension_index, dimension) in state.resource.dimensions.iter().enumerate() {
            let profile = self.build_profile(&*context, state, dimension);

            if let Some(time) = profile.first_time_exceeding(0, i32::MAX, dimension.capacity) {
                trace!(
                    "resource {resource_index} exceeds capacity {} of dimension {dimension_index} at {time}",
                    dimension.capacity
                );
                return Err(ConflictCause::CapacityExceeded {
                    resource: resource_index,
                    dimension: dimension_index,
                    time,
                }
                .into());
            }

            self.prune_candidates(context, state, dimension, &profile)?;

            if tighten_times {
                self.tighten_known(context, state, dimension, &profile)?;
            }
        }

        Ok(())
    }

    /// Remove the resource from the hosts of candidate slices which do not fit next to the
    /// mandatory profile.
    fn prune_candidates(
        &self,
        context: &mut PropagationContext,
        state: &ResourceState,
        dimension: &ResourceDimension,
        profile: &MandatoryProfile,
    ) -> PropagationStatusCP {
        let candidate_c = state
            .candidate_c
            .iter(context.trailed_values())
            .collect::<Vec<_>>();
        for index in candidate_c {
            let usage = dimension.c_usages[index];
            let end_lb = context.lower_bound(self.c_slices[index].time);
            if usage > 0
                && end_lb > 0
                && profile.max_level_in(0, end_lb) > dimension.capacity - usage
            {
                trace!("c-slice {index} cannot stay on {:?}", state.resource.members());
                self.remove_members(context, state, self.c_slices[index].host)?;
            }
        }

        let candidate_d = state
            .candidate_d
            .iter(context.trailed_values())
            .collect::<Vec<_>>();
        for index in candidate_d {
            let usage = dimension.d_usages[index];
            let start_ub = context.upper_bound(self.d_slices[index].time);
            if usage > 0 && profile.max_level_in(start_ub, i32::MAX) > dimension.capacity - usage {
                trace!("d-slice {index} cannot move to {:?}", state.resource.members());
                self.remove_members(context, state, self.d_slices[index].host)?;
            }
        }

        Ok(())
    }

    fn remove_members(
        &self,
        context: &mut PropagationContext,
        state: &ResourceState,
        host: DomainId,
    ) -> PropagationStatusCP {
        for &node in state.resource.members() {
            context.post(predicate!(host != node))?;
        }
        Ok(())
    }

    /// Tighten the end of known c-slices and the start of known d-slices so that they do not
    /// overlap a part of the profile they do not fit next to.
    fn tighten_known(
        &self,
        context: &mut PropagationContext,
        state: &ResourceState,
        dimension: &ResourceDimension,
        profile: &MandatoryProfile,
    ) -> PropagationStatusCP {
        let known_c = state
            .known_c
            .iter(context.trailed_values())
            .collect::<Vec<_>>();
        for index in known_c {
            let usage = dimension.c_usages[index];
            if usage == 0 {
                continue;
            }
            let end = self.c_slices[index].time;
            let limit = dimension.capacity - usage;
            if let Some(time) =
                profile.first_time_exceeding(context.lower_bound(end), context.upper_bound(end), limit)
            {
                trace!("c-slice {index} ends at the latest at {time}");
                context.post(predicate!(end <= time))?;
            }
        }

        let known_d = state
            .known_d
            .iter(context.trailed_values())
            .collect::<Vec<_>>();
        for index in known_d {
            let usage = dimension.d_usages[index];
            if usage == 0 {
                continue;
            }
            let start = self.d_slices[index].time;
            let limit = dimension.capacity - usage;
            if let Some(time) = profile.last_end_exceeding(
                context.lower_bound(start),
                context.upper_bound(start),
                limit,
            ) {
                trace!("d-slice {index} starts at the earliest at {time}");
                context.post(predicate!(start >= time))?;
            }
        }

        Ok(())
    }

    /// The d-slice of a VM staying on the node of its c-slice starts once the c-slice ended.
    fn propagate_associations(&self, context: &mut PropagationContext) -> PropagationStatusCP {
        for &(c_index, d_index) in self.associations.iter() {
            let c_slice = self.c_slices[c_index];
            let d_slice = self.d_slices[d_index];

            let (Some(c_host), Some(d_host)) = (
                context.fixed_value(c_slice.host),
                context.fixed_value(d_slice.host),
            ) else {
                continue;
            };
            if c_host != d_host {
                continue;
            }

            let end_lb = context.lower_bound(c_slice.time);
            context.post(predicate!(d_slice.time >= end_lb))?;
            let start_ub = context.upper_bound(d_slice.time);
            context.post(predicate!(c_slice.time <= start_ub))?;
        }

        Ok(())
    }
}

impl Propagator for TaskSchedulerPropagator {
    fn name(&self) -> &str {
        "TaskScheduler"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn notify(
        &mut self,
        mut context: NotificationContext,
        local_id: LocalId,
        _event: OpaqueDomainEvent,
    ) -> EnqueueDecision {
        let (kind, index, is_host) = self.decode(local_id);
        if !is_host || self.update_membership(&mut context, kind, index) {
            EnqueueDecision::Enqueue
        } else {
            EnqueueDecision::Skip
        }
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        for resource_index in 0..self.resources.len() {
            self.propagate_resource(&mut context, resource_index)?;
        }
        self.propagate_associations(&mut context)
    }

    fn debug_check_consistency(&self, domains: Domains) -> bool {
        let trailed_values = domains.trailed_values();

        self.resources.iter().all(|state| {
            let mut pending = 0;
            let consistent = [SliceKind::Consuming, SliceKind::Demanding]
                .into_iter()
                .all(|kind| {
                    let (known, candidate) = state.sets(kind);
                    let num_slices = match kind {
                        SliceKind::Consuming => self.c_slices.len(),
                        SliceKind::Demanding => self.d_slices.len(),
                    };

                    (0..num_slices).all(|index| {
                        let expected = state
                            .resource
                            .membership(&domains, self.task(kind, index).host);
                        let is_known = known.contains(trailed_values, index);
                        let is_candidate = candidate.contains(trailed_values, index);
                        if is_candidate {
                            pending += 1;
                        }

                        match expected {
                            Membership::Known => is_known && !is_candidate,
                            Membership::Candidate => !is_known && is_candidate,
                            Membership::Outside => !is_known && !is_candidate,
                        }
                    })
                });

            consistent && domains.value(state.pending) == pending
        })
    }
}
