use std::mem;

use fnv::FnvHashSet;
use log::debug;
use log::warn;

use super::Action;
use super::ModelError;
use super::ModelView;
use super::ReconfigurationPlan;
use super::Slice;
use super::ViewRegistry;
use super::VmId;
use super::VmTransition;
use crate::basic_types::ConfigurationError;
use crate::branching::IndependentVariableValueBrancher;
use crate::branching::InputOrder;
use crate::branching::ValueSelection;
use crate::constraints::Constraint;
use crate::constraints::PackingBuilder;
use crate::constraints::SchedulerBuilder;
use crate::engine::variables::DomainId;
use crate::predicate;
use crate::propagators::arithmetic::DurationArgs;
use crate::propagators::arithmetic::EquivalenceArgs;
use crate::propagators::arithmetic::PrecedenceArgs;
use crate::propagators::packing::VectorPackingOptions;
use crate::propagators::scheduler::SchedulerAssignment;
use crate::propagators::scheduler::TaskSchedulerOptions;
use crate::reconf_asserts::reconf_assert_moderate;
use crate::search::satisfy;
use crate::search::SatisfactionResult;
use crate::search::Solution;
use crate::termination::TerminationCondition;
use crate::State;

/// The slices created for one VM, and the variable linking them when it has both.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VmSlices {
    pub transition: VmTransition,
    pub consuming: Option<Slice>,
    pub demanding: Option<Slice>,
    /// `c.end - d.start` for a running VM which keeps running: 0 when it stays on its node and
    /// the duration of the migration otherwise.
    pub overlap: Option<DomainId>,
}

/// Per-VM usages of one resource dimension, before and after the reconfiguration.
#[derive(Clone, Debug)]
struct Dimension {
    capacities: Vec<i64>,
    before: Vec<i64>,
    after: Vec<i64>,
}

#[derive(Clone, Debug)]
struct Alias {
    nodes: Vec<usize>,
    capacity: i64,
    before: Vec<i64>,
    after: Vec<i64>,
}

/// The outcome of [`ReconfigurationProblem::solve`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlanResult {
    Plan(ReconfigurationPlan),
    /// No plan brings every VM to its target state within the horizon.
    Infeasible,
    /// The termination condition stopped the search before a plan was found.
    Unknown,
}

/// A reconfiguration of VMs over `nb_nodes` nodes which must complete within `horizon`.
///
/// Every VM running before the reconfiguration gets a c-slice on its current host, and every VM
/// running after it a d-slice on a host chosen by the search. The capacities given through
/// [`ReconfigurationProblem::add_dimension`] constrain both the schedule of the slices and the
/// final placement.
///
/// # Example
/// ```
/// # use reconf_core::model::PlanResult;
/// # use reconf_core::model::ReconfigurationProblem;
/// # use reconf_core::model::VmState;
/// # use reconf_core::model::VmTransition;
/// # use reconf_core::termination::Indefinite;
/// let mut problem = ReconfigurationProblem::new(2, 20);
/// let vm = problem
///     .add_vm(VmTransition {
///         source: VmState::Ready,
///         target: VmState::Running,
///         current_host: None,
///         duration: 4,
///     })
///     .expect("valid transition");
/// problem.add_dimension(&[1, 2], &[0], &[2]).expect("valid dimension");
///
/// let PlanResult::Plan(plan) = problem.solve(&mut Indefinite).expect("valid model") else {
///     panic!("the vm fits on node 1");
/// };
/// assert_eq!(plan.actions.len(), 1);
/// assert_eq!(plan.actions[0].vm(), vm);
/// assert_eq!(plan.makespan, 4);
/// ```
#[derive(Debug)]
pub struct ReconfigurationProblem {
    state: State,
    nb_nodes: usize,
    horizon: i32,
    vms: Vec<VmSlices>,
    c_slices: Vec<Slice>,
    d_slices: Vec<Slice>,
    dimensions: Vec<Dimension>,
    aliases: Vec<Alias>,
    views: ViewRegistry,
    scheduler_options: TaskSchedulerOptions,
    packing_options: VectorPackingOptions,
}

impl ReconfigurationProblem {
    pub fn new(nb_nodes: usize, horizon: i32) -> ReconfigurationProblem {
        let mut views = ViewRegistry::default();
        views.add(Box::new(SchedulerView));
        views.add(Box::new(PackingView));

        ReconfigurationProblem {
            state: State::default(),
            nb_nodes,
            horizon,
            vms: Vec::new(),
            c_slices: Vec::new(),
            d_slices: Vec::new(),
            dimensions: Vec::new(),
            aliases: Vec::new(),
            views,
            scheduler_options: TaskSchedulerOptions::default(),
            packing_options: VectorPackingOptions::default(),
        }
    }

    pub fn with_scheduler_options(mut self, options: TaskSchedulerOptions) -> Self {
        self.scheduler_options = options;
        self
    }

    pub fn with_packing_options(mut self, options: VectorPackingOptions) -> Self {
        self.packing_options = options;
        self
    }

    pub fn nb_nodes(&self) -> usize {
        self.nb_nodes
    }

    pub fn horizon(&self) -> i32 {
        self.horizon
    }

    pub fn num_vms(&self) -> usize {
        self.vms.len()
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// The state holding the variables of the slices; views add their constraints to it.
    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    pub fn c_slices(&self) -> &[Slice] {
        &self.c_slices
    }

    pub fn d_slices(&self) -> &[Slice] {
        &self.d_slices
    }

    pub fn vm_slices(&self, vm: VmId) -> Option<&VmSlices> {
        self.vms.get(vm.0 as usize)
    }

    /// Add a VM and create the slices of its transition.
    pub fn add_vm(&mut self, transition: VmTransition) -> Result<VmId, ModelError> {
        let vm = VmId(self.vms.len() as u32);
        if transition.duration < 0 {
            return Err(ModelError::InvalidDuration {
                vm,
                duration: transition.duration,
            });
        }

        let home = if transition.source.is_running() {
            let home = transition
                .current_host
                .ok_or(ModelError::MissingHost { vm })?;
            if home >= self.nb_nodes {
                return Err(ConfigurationError::NodeOutOfRange {
                    node: home,
                    nb_nodes: self.nb_nodes,
                }
                .into());
            }
            Some(home as i32)
        } else {
            None
        };

        let consuming = home.map(|home| self.new_c_slice(vm, home));
        let demanding = transition
            .target
            .is_running()
            .then(|| self.new_d_slice(vm));

        let mut overlap = None;
        match (consuming, demanding) {
            (Some(c_slice), Some(d_slice)) => {
                overlap = Some(self.link_migration(vm, &c_slice, &d_slice, transition.duration));
            }
            (Some(c_slice), None) => {
                let _ = self.state.add_propagator(PrecedenceArgs {
                    before: c_slice.start,
                    offset: transition.duration,
                    after: c_slice.end,
                });
            }
            (None, Some(d_slice)) => {
                let _ = self.state.add_propagator(PrecedenceArgs {
                    before: d_slice.start,
                    offset: transition.duration,
                    after: d_slice.end,
                });
            }
            (None, None) => {
                debug!("{vm} is not running before nor after the reconfiguration");
            }
        }

        self.c_slices.extend(consuming);
        self.d_slices.extend(demanding);
        self.vms.push(VmSlices {
            transition,
            consuming,
            demanding,
            overlap,
        });

        Ok(vm)
    }

    /// Add a resource dimension: one capacity per node, and the usage of every VM before and
    /// after the reconfiguration. The usages are checked against the VMs when solving.
    pub fn add_dimension(
        &mut self,
        capacities: &[i64],
        usages_before: &[i64],
        usages_after: &[i64],
    ) -> Result<(), ModelError> {
        if capacities.len() != self.nb_nodes {
            return Err(ConfigurationError::LengthMismatch {
                what: "node capacities",
                expected: self.nb_nodes,
                actual: capacities.len(),
            }
            .into());
        }

        self.dimensions.push(Dimension {
            capacities: capacities.to_vec(),
            before: usages_before.to_vec(),
            after: usages_after.to_vec(),
        });
        Ok(())
    }

    /// Add a group of nodes sharing `capacity` over the whole reconfiguration.
    pub fn add_alias(
        &mut self,
        capacity: i64,
        usages_before: &[i64],
        usages_after: &[i64],
        nodes: &[usize],
    ) -> Result<(), ModelError> {
        if nodes.is_empty() {
            return Err(ConfigurationError::EmptyAlias.into());
        }

        self.aliases.push(Alias {
            nodes: nodes.to_vec(),
            capacity,
            before: usages_before.to_vec(),
            after: usages_after.to_vec(),
        });
        Ok(())
    }

    pub fn add_view(&mut self, view: Box<dyn ModelView>) {
        self.views.add(view);
    }

    /// The scheduler over the slices and the dimensions added so far.
    pub fn scheduler_builder(&self) -> Result<SchedulerBuilder, ModelError> {
        let mut builder = SchedulerBuilder::new(
            self.nb_nodes,
            self.c_slices.clone(),
            self.d_slices.clone(),
        )?
        .with_options(self.scheduler_options);

        for dimension in self.dimensions.iter() {
            let (c_usages, d_usages) = self.slice_usages(&dimension.before, &dimension.after)?;
            let _ = builder.add_dimension(&dimension.capacities, &c_usages, &d_usages)?;
        }
        for alias in self.aliases.iter() {
            let (c_usages, d_usages) = self.slice_usages(&alias.before, &alias.after)?;
            let _ = builder.add_alias(alias.capacity, &c_usages, &d_usages, &alias.nodes)?;
        }

        Ok(builder)
    }

    /// The packing of the d-slices into the nodes, over the dimensions added so far.
    pub fn packing_builder(&self) -> Result<PackingBuilder, ModelError> {
        let mut builder =
            PackingBuilder::new(self.nb_nodes, &self.d_slices).with_options(self.packing_options);

        for dimension in self.dimensions.iter() {
            let (_, sizes) = self.slice_usages(&dimension.before, &dimension.after)?;
            let _ = builder.add_dimension(&dimension.capacities, &sizes)?;
        }

        Ok(builder)
    }

    /// Inject the views in dependency order and search for a plan.
    pub fn solve(
        mut self,
        termination: &mut impl TerminationCondition,
    ) -> Result<PlanResult, ModelError> {
        let checker = self.scheduler_builder()?.checker();

        let views = mem::take(&mut self.views).resolve()?;
        for view in views {
            debug!("injecting view '{}'", view.identifier());
            view.inject(&mut self)?;
        }

        let decision_variables = self.decision_variables();
        let mut brancher = IndependentVariableValueBrancher::new(
            InputOrder::new(&decision_variables),
            ValueSelection::default(),
        );

        match satisfy(&mut self.state, &mut brancher, termination) {
            SatisfactionResult::Satisfiable(solution) => {
                reconf_assert_moderate!(
                    checker.check(&self.scheduler_assignment(&solution)).is_ok(),
                    "the plan overloads a resource"
                );
                let plan = self.extract_plan(&solution);
                debug!(
                    "found a plan of {} actions ending at {}",
                    plan.actions.len(),
                    plan.makespan
                );
                Ok(PlanResult::Plan(plan))
            }
            SatisfactionResult::Unsatisfiable => {
                debug!("no plan exists within horizon {}", self.horizon);
                Ok(PlanResult::Infeasible)
            }
            SatisfactionResult::Unknown => Ok(PlanResult::Unknown),
        }
    }

    fn new_c_slice(&mut self, vm: VmId, home: i32) -> Slice {
        let slice = Slice {
            subject: vm,
            host: self.new_variable(home, home, vm, "c.host"),
            start: self.new_variable(0, 0, vm, "c.start"),
            end: self.new_variable(0, self.horizon, vm, "c.end"),
            duration: self.new_variable(0, self.horizon, vm, "c.duration"),
        };
        self.add_duration(&slice);
        slice
    }

    fn new_d_slice(&mut self, vm: VmId) -> Slice {
        let last_node = self.nb_nodes as i32 - 1;
        if last_node < 0 {
            warn!("{vm} must run after the reconfiguration, but there are no nodes");
        }
        let slice = Slice {
            subject: vm,
            host: self.new_variable(0, last_node.max(0), vm, "d.host"),
            start: self.new_variable(0, self.horizon, vm, "d.start"),
            end: self.new_variable(self.horizon, self.horizon, vm, "d.end"),
            duration: self.new_variable(0, self.horizon, vm, "d.duration"),
        };
        self.add_duration(&slice);
        slice
    }

    fn add_duration(&mut self, slice: &Slice) {
        let _ = self.state.add_propagator(DurationArgs {
            start: slice.start,
            duration: slice.duration,
            end: slice.end,
        });
    }

    /// Relate the slices of a VM which keeps running: the VM stays on its node in zero time, or
    /// migrates for `duration`, during which both slices are charged.
    fn link_migration(
        &mut self,
        vm: VmId,
        c_slice: &Slice,
        d_slice: &Slice,
        duration: i32,
    ) -> DomainId {
        let overlap = self.new_variable(0, duration, vm, "overlap");
        let _ = self.state.add_propagator(DurationArgs {
            start: d_slice.start,
            duration: overlap,
            end: c_slice.end,
        });

        if duration > 0 {
            let home = self.state.lower_bound(c_slice.host);
            let _ = self.state.add_propagator(EquivalenceArgs {
                left: predicate!(d_slice.host == home),
                right: predicate!(overlap <= 0),
            });
            let _ = self.state.add_propagator(EquivalenceArgs {
                left: predicate!(d_slice.host != home),
                right: predicate!(overlap >= duration),
            });
        }

        overlap
    }

    fn new_variable(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        vm: VmId,
        what: &str,
    ) -> DomainId {
        self.state.new_interval_variable(
            lower_bound,
            upper_bound.max(lower_bound),
            Some(format!("{vm}.{what}")),
        )
    }

    /// Map usages per VM onto the c-slices and d-slices.
    fn slice_usages(
        &self,
        before: &[i64],
        after: &[i64],
    ) -> Result<(Vec<i64>, Vec<i64>), ModelError> {
        for (what, usages) in [("usages before", before), ("usages after", after)] {
            if usages.len() != self.vms.len() {
                return Err(ConfigurationError::LengthMismatch {
                    what,
                    expected: self.vms.len(),
                    actual: usages.len(),
                }
                .into());
            }
        }

        let usage_of = |usages: &[i64], slice: &Slice| usages[slice.subject.0 as usize];
        Ok((
            self.c_slices
                .iter()
                .map(|slice| usage_of(before, slice))
                .collect(),
            self.d_slices
                .iter()
                .map(|slice| usage_of(after, slice))
                .collect(),
        ))
    }

    /// Branch on where the VMs go, then when they arrive, then when they leave, then on
    /// everything else.
    fn decision_variables(&self) -> Vec<DomainId> {
        let mut variables = self
            .d_slices
            .iter()
            .map(|slice| slice.host)
            .chain(self.d_slices.iter().map(|slice| slice.start))
            .chain(self.c_slices.iter().map(|slice| slice.end))
            .collect::<Vec<_>>();

        let mut seen = variables.iter().copied().collect::<FnvHashSet<_>>();
        variables.extend(
            self.state
                .variables()
                .filter(|&variable| seen.insert(variable)),
        );
        variables
    }

    fn scheduler_assignment(&self, solution: &Solution) -> SchedulerAssignment {
        SchedulerAssignment {
            c_slices: self
                .c_slices
                .iter()
                .map(|slice| (solution.value(slice.host), solution.value(slice.end)))
                .collect(),
            d_slices: self
                .d_slices
                .iter()
                .map(|slice| (solution.value(slice.host), solution.value(slice.start)))
                .collect(),
        }
    }

    fn extract_plan(&self, solution: &Solution) -> ReconfigurationPlan {
        let actions = self
            .vms
            .iter()
            .enumerate()
            .filter_map(|(index, slices)| {
                let vm = VmId(index as u32);
                let duration = slices.transition.duration;
                let node_of = |slice: &Slice| solution.value(slice.host) as usize;

                match (slices.consuming, slices.demanding) {
                    (Some(c_slice), Some(d_slice)) => {
                        let (from, to) = (node_of(&c_slice), node_of(&d_slice));
                        (from != to).then(|| Action::Migrate {
                            vm,
                            from,
                            to,
                            start: solution.value(d_slice.start),
                            end: solution.value(c_slice.end),
                        })
                    }
                    (Some(c_slice), None) => {
                        let end = solution.value(c_slice.end);
                        Some(Action::Shutdown {
                            vm,
                            node: node_of(&c_slice),
                            start: end - duration,
                            end,
                        })
                    }
                    (None, Some(d_slice)) => {
                        let start = solution.value(d_slice.start);
                        Some(Action::Boot {
                            vm,
                            node: node_of(&d_slice),
                            start,
                            end: start + duration,
                        })
                    }
                    (None, None) => None,
                }
            })
            .collect();

        ReconfigurationPlan::new(actions)
    }
}

/// Posts the cumulative scheduler over all slices.
#[derive(Clone, Copy, Debug)]
struct SchedulerView;

impl ModelView for SchedulerView {
    fn identifier(&self) -> &str {
        "scheduler"
    }

    fn inject(&self, problem: &mut ReconfigurationProblem) -> Result<(), ModelError> {
        let builder = problem.scheduler_builder()?;
        builder.post(problem.state_mut())?;
        Ok(())
    }
}

/// Posts the vector packing of the d-slices.
#[derive(Clone, Copy, Debug)]
struct PackingView;

impl ModelView for PackingView {
    fn identifier(&self) -> &str {
        "packing"
    }

    fn inject(&self, problem: &mut ReconfigurationProblem) -> Result<(), ModelError> {
        let builder = problem.packing_builder()?;
        builder.post(problem.state_mut())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VmState;
    use crate::termination::Indefinite;

    fn running(host: usize, duration: i32) -> VmTransition {
        VmTransition {
            source: VmState::Running,
            target: VmState::Running,
            current_host: Some(host),
            duration,
        }
    }

    fn solve(problem: ReconfigurationProblem) -> ReconfigurationPlan {
        match problem.solve(&mut Indefinite) {
            Ok(PlanResult::Plan(plan)) => plan,
            other => panic!("expected a plan, got {other:?}"),
        }
    }

    #[test]
    fn transitions_create_the_slices_of_running_states() {
        let mut problem = ReconfigurationProblem::new(2, 10);
        let staying = problem.add_vm(running(0, 3)).expect("valid");
        let leaving = problem
            .add_vm(VmTransition {
                target: VmState::Killed,
                ..running(1, 2)
            })
            .expect("valid");
        let booting = problem
            .add_vm(VmTransition {
                source: VmState::Sleeping,
                current_host: None,
                ..running(0, 2)
            })
            .expect("valid");

        let slices = |vm| problem.vm_slices(vm).expect("exists");
        assert!(slices(staying).consuming.is_some() && slices(staying).demanding.is_some());
        assert!(slices(leaving).consuming.is_some() && slices(leaving).demanding.is_none());
        assert!(slices(booting).consuming.is_none() && slices(booting).demanding.is_some());
        assert_eq!(problem.c_slices().len(), 2);
        assert_eq!(problem.d_slices().len(), 2);
    }

    #[test]
    fn running_vms_need_a_host() {
        let mut problem = ReconfigurationProblem::new(2, 10);

        assert_eq!(
            problem.add_vm(VmTransition {
                current_host: None,
                ..running(0, 1)
            }),
            Err(ModelError::MissingHost { vm: VmId(0) })
        );
        assert_eq!(
            problem.add_vm(running(2, 1)),
            Err(ModelError::Configuration(ConfigurationError::NodeOutOfRange {
                node: 2,
                nb_nodes: 2
            }))
        );
        assert_eq!(
            problem.add_vm(running(0, -1)),
            Err(ModelError::InvalidDuration {
                vm: VmId(0),
                duration: -1
            })
        );
    }

    #[test]
    fn full_nodes_keep_their_vms() {
        let mut problem = ReconfigurationProblem::new(2, 10);
        let _ = problem.add_vm(running(0, 3)).expect("valid");
        let _ = problem.add_vm(running(1, 3)).expect("valid");
        problem
            .add_dimension(&[2, 2], &[2, 2], &[2, 2])
            .expect("valid");

        let plan = solve(problem);

        assert!(plan.is_empty(), "unexpected actions {:?}", plan.actions);
    }

    #[test]
    fn a_grown_vm_is_migrated_once_the_other_left() {
        let mut problem = ReconfigurationProblem::new(2, 20);
        let grown = problem.add_vm(running(0, 3)).expect("valid");
        let _ = problem
            .add_vm(VmTransition {
                target: VmState::Killed,
                ..running(1, 2)
            })
            .expect("valid");
        problem
            .add_dimension(&[2, 4], &[2, 4], &[4, 0])
            .expect("valid");

        let plan = solve(problem);

        let migration = plan
            .actions
            .iter()
            .find(|action| action.vm() == grown)
            .expect("the vm moves");
        let shutdown_end = plan
            .actions
            .iter()
            .find(|action| action.vm() != grown)
            .map(Action::end)
            .expect("the other vm stops");
        assert!(matches!(
            migration,
            Action::Migrate { from: 0, to: 1, .. }
        ));
        assert!(migration.start() >= shutdown_end);
        assert_eq!(migration.end() - migration.start(), 3);
    }

    #[test]
    fn usages_must_cover_every_vm() {
        let mut problem = ReconfigurationProblem::new(1, 10);
        let _ = problem.add_vm(running(0, 1)).expect("valid");
        problem.add_dimension(&[4], &[1, 1], &[1]).expect("valid");

        assert_eq!(
            problem.solve(&mut Indefinite).err(),
            Some(ModelError::Configuration(ConfigurationError::LengthMismatch {
                what: "usages before",
                expected: 1,
                actual: 2
            }))
        );
    }

    #[test]
    fn too_large_vms_make_the_problem_infeasible() {
        let mut problem = ReconfigurationProblem::new(2, 10);
        let _ = problem
            .add_vm(VmTransition {
                source: VmState::Ready,
                current_host: None,
                ..running(0, 1)
            })
            .expect("valid");
        problem.add_dimension(&[2, 2], &[0], &[3]).expect("valid");

        assert_eq!(problem.solve(&mut Indefinite), Ok(PlanResult::Infeasible));
    }
}
