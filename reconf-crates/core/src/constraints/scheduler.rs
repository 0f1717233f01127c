use fnv::FnvHashMap;
use log::debug;

use super::Constraint;
use crate::basic_types::ConfigurationError;
use crate::engine::variables::DomainId;
use crate::model::Slice;
use crate::propagators::scheduler::LocalResource;
use crate::propagators::scheduler::ResourceDimension;
use crate::propagators::scheduler::SchedulerChecker;
use crate::propagators::scheduler::SchedulerTask;
use crate::propagators::scheduler::TaskSchedulerConstructor;
use crate::propagators::scheduler::TaskSchedulerOptions;
use crate::State;

/// The capacities of every node and the usages of every slice in one resource dimension.
#[derive(Clone, Debug)]
struct NodeDimension {
    capacities: Vec<i64>,
    c_usages: Vec<i64>,
    d_usages: Vec<i64>,
}

/// A group of nodes sharing one pooled capacity.
#[derive(Clone, Debug)]
struct Alias {
    nodes: Vec<usize>,
    capacity: i64,
    c_usages: Vec<i64>,
    d_usages: Vec<i64>,
}

/// Collects the slices and resource dimensions of a cumulative scheduler.
///
/// A c-slice and a d-slice with the same subject are associated: when both are hosted on the same
/// node, the d-slice cannot start before the c-slice ends.
///
/// # Example
/// ```
/// # use reconf_core::constraints::Constraint;
/// # use reconf_core::constraints::SchedulerBuilder;
/// # use reconf_core::model::Slice;
/// # use reconf_core::model::VmId;
/// # use reconf_core::State;
/// let mut state = State::default();
/// let slice = |state: &mut State, subject: u32, start: (i32, i32), end: (i32, i32)| Slice {
///     subject: VmId(subject),
///     host: state.new_interval_variable(0, 0, None),
///     start: state.new_interval_variable(start.0, start.1, None),
///     end: state.new_interval_variable(end.0, end.1, None),
///     duration: state.new_interval_variable(0, 10, None),
/// };
/// let leaving = slice(&mut state, 0, (0, 0), (5, 5));
/// let arriving = slice(&mut state, 1, (0, 10), (10, 10));
///
/// let mut builder = SchedulerBuilder::new(1, vec![leaving], vec![arriving]).expect("no duplicates");
/// let _ = builder.add_dimension(&[4], &[2], &[3]).expect("valid dimension");
/// builder.post(&mut state).expect("hosts are nodes");
///
/// state.propagate_to_fixed_point().expect("feasible");
/// assert_eq!(state.lower_bound(arriving.start), 5);
/// ```
#[derive(Clone, Debug)]
pub struct SchedulerBuilder {
    nb_nodes: usize,
    c_slices: Vec<Slice>,
    d_slices: Vec<Slice>,
    associations: Vec<(usize, usize)>,
    dimensions: Vec<NodeDimension>,
    aliases: Vec<Alias>,
    options: TaskSchedulerOptions,
}

impl SchedulerBuilder {
    pub fn new(
        nb_nodes: usize,
        c_slices: Vec<Slice>,
        d_slices: Vec<Slice>,
    ) -> Result<SchedulerBuilder, ConfigurationError> {
        let c_indices = index_by_subject(&c_slices, "consuming")?;
        let d_indices = index_by_subject(&d_slices, "demanding")?;

        let mut associations = c_indices
            .iter()
            .filter_map(|(subject, &c_slice)| {
                d_indices
                    .get(subject)
                    .map(|&d_slice| (c_slice, d_slice))
            })
            .collect::<Vec<_>>();
        associations.sort_unstable();

        Ok(SchedulerBuilder {
            nb_nodes,
            c_slices,
            d_slices,
            associations,
            dimensions: Vec::new(),
            aliases: Vec::new(),
            options: TaskSchedulerOptions::default(),
        })
    }

    pub fn with_options(mut self, options: TaskSchedulerOptions) -> SchedulerBuilder {
        self.options = options;
        self
    }

    pub fn c_slices(&self) -> &[Slice] {
        &self.c_slices
    }

    pub fn d_slices(&self) -> &[Slice] {
        &self.d_slices
    }

    /// The pairs `(c-slice, d-slice)` of slices sharing a subject.
    pub fn associations(&self) -> &[(usize, usize)] {
        &self.associations
    }

    /// Add a resource dimension: one capacity per node and one usage per slice.
    pub fn add_dimension(
        &mut self,
        capacities: &[i64],
        c_usages: &[i64],
        d_usages: &[i64],
    ) -> Result<&mut SchedulerBuilder, ConfigurationError> {
        check_length("node capacities", self.nb_nodes, capacities.len())?;
        self.check_usages(c_usages, d_usages)?;
        if let Some((node, &capacity)) = capacities
            .iter()
            .enumerate()
            .find(|&(_, &capacity)| capacity < 0)
        {
            return Err(ConfigurationError::NegativeCapacity { node, capacity });
        }

        self.dimensions.push(NodeDimension {
            capacities: capacities.to_vec(),
            c_usages: c_usages.to_vec(),
            d_usages: d_usages.to_vec(),
        });
        Ok(self)
    }

    /// Add a group of nodes whose slices share one capacity, in a single dimension.
    pub fn add_alias(
        &mut self,
        capacity: i64,
        c_usages: &[i64],
        d_usages: &[i64],
        nodes: &[usize],
    ) -> Result<&mut SchedulerBuilder, ConfigurationError> {
        let Some(&first) = nodes.first() else {
            return Err(ConfigurationError::EmptyAlias);
        };
        if let Some(&node) = nodes.iter().find(|&&node| node >= self.nb_nodes) {
            return Err(ConfigurationError::NodeOutOfRange {
                node,
                nb_nodes: self.nb_nodes,
            });
        }
        if capacity < 0 {
            return Err(ConfigurationError::NegativeCapacity {
                node: first,
                capacity,
            });
        }
        self.check_usages(c_usages, d_usages)?;

        self.aliases.push(Alias {
            nodes: nodes.to_vec(),
            capacity,
            c_usages: c_usages.to_vec(),
            d_usages: d_usages.to_vec(),
        });
        Ok(self)
    }

    /// The constructor of the scheduler propagator. Its resources are the nodes, in order, when at
    /// least one dimension was added, followed by the alias groups.
    pub fn build(&self) -> TaskSchedulerConstructor {
        TaskSchedulerConstructor {
            c_slices: self
                .c_slices
                .iter()
                .map(|slice| SchedulerTask {
                    host: slice.host,
                    time: slice.end,
                })
                .collect(),
            d_slices: self
                .d_slices
                .iter()
                .map(|slice| SchedulerTask {
                    host: slice.host,
                    time: slice.start,
                })
                .collect(),
            resources: self.resources(),
            associations: self.associations.clone(),
            options: self.options,
        }
    }

    /// A checker verifying complete assignments of the slices against the same resources.
    pub fn checker(&self) -> SchedulerChecker {
        SchedulerChecker {
            resources: self.resources(),
            associations: self.associations.clone(),
        }
    }

    fn resources(&self) -> Vec<LocalResource> {
        let nodes = (0..self.nb_nodes)
            .filter(|_| !self.dimensions.is_empty())
            .map(|node| {
                let dimensions = self
                    .dimensions
                    .iter()
                    .map(|dimension| ResourceDimension {
                        capacity: dimension.capacities[node],
                        c_usages: dimension.c_usages.clone().into_boxed_slice(),
                        d_usages: dimension.d_usages.clone().into_boxed_slice(),
                    })
                    .collect();
                LocalResource::new([node as i32], self.nb_nodes, dimensions)
            });

        let aliases = self.aliases.iter().map(|alias| {
            LocalResource::new(
                alias.nodes.iter().map(|&node| node as i32),
                self.nb_nodes,
                vec![ResourceDimension {
                    capacity: alias.capacity,
                    c_usages: alias.c_usages.clone().into_boxed_slice(),
                    d_usages: alias.d_usages.clone().into_boxed_slice(),
                }],
            )
        });

        nodes.chain(aliases).collect()
    }

    fn check_usages(&self, c_usages: &[i64], d_usages: &[i64]) -> Result<(), ConfigurationError> {
        check_length("c-slice usages", self.c_slices.len(), c_usages.len())?;
        check_length("d-slice usages", self.d_slices.len(), d_usages.len())?;
        check_non_negative(c_usages)?;
        check_non_negative(d_usages)
    }

    fn check_hosts(&self, state: &State) -> Result<(), ConfigurationError> {
        for (kind, slices) in [("consuming", &self.c_slices), ("demanding", &self.d_slices)] {
            for (slice, host) in slices.iter().map(|slice| slice.host).enumerate() {
                check_host(state, kind, slice, host, self.nb_nodes)?;
            }
        }
        Ok(())
    }
}

impl Constraint for SchedulerBuilder {
    fn post(self, state: &mut State) -> Result<(), ConfigurationError> {
        self.check_hosts(state)?;
        debug!(
            "posting scheduler with {} dimensions and {} alias groups",
            self.dimensions.len(),
            self.aliases.len()
        );
        self.build().post(state)
    }
}

fn index_by_subject(
    slices: &[Slice],
    kind: &'static str,
) -> Result<FnvHashMap<u32, usize>, ConfigurationError> {
    let mut indices = FnvHashMap::default();
    for (index, slice) in slices.iter().enumerate() {
        if indices.insert(slice.subject.0, index).is_some() {
            return Err(ConfigurationError::DuplicateSlice {
                kind,
                subject: slice.subject.0,
            });
        }
    }
    Ok(indices)
}

pub(super) fn check_length(
    what: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), ConfigurationError> {
    if expected != actual {
        return Err(ConfigurationError::LengthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

pub(super) fn check_non_negative(usages: &[i64]) -> Result<(), ConfigurationError> {
    match usages.iter().enumerate().find(|&(_, &usage)| usage < 0) {
        Some((slice, &usage)) => Err(ConfigurationError::NegativeUsage { slice, usage }),
        None => Ok(()),
    }
}

pub(super) fn check_host(
    state: &State,
    kind: &'static str,
    slice: usize,
    host: DomainId,
    nb_nodes: usize,
) -> Result<(), ConfigurationError> {
    let lower_bound = state.lower_bound(host);
    let upper_bound = state.upper_bound(host);
    let value = if lower_bound < 0 {
        lower_bound
    } else if upper_bound as usize >= nb_nodes {
        upper_bound
    } else {
        return Ok(());
    };

    Err(ConfigurationError::HostOutOfRange {
        kind,
        slice,
        value,
        nb_nodes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VmId;

    fn slice(state: &mut State, subject: u32, host: (i32, i32)) -> Slice {
        Slice {
            subject: VmId(subject),
            host: state.new_interval_variable(host.0, host.1, None),
            start: state.new_interval_variable(0, 10, None),
            end: state.new_interval_variable(0, 10, None),
            duration: state.new_interval_variable(0, 10, None),
        }
    }

    #[test]
    fn slices_of_the_same_vm_are_associated() {
        let mut state = State::default();
        let c_0 = slice(&mut state, 0, (0, 0));
        let c_1 = slice(&mut state, 1, (1, 1));
        let d_1 = slice(&mut state, 1, (0, 1));
        let d_2 = slice(&mut state, 2, (0, 1));

        let builder = SchedulerBuilder::new(2, vec![c_0, c_1], vec![d_2, d_1]).expect("valid");

        assert_eq!(builder.associations(), &[(1, 1)]);
    }

    #[test]
    fn duplicate_subjects_are_rejected() {
        let mut state = State::default();
        let first = slice(&mut state, 3, (0, 0));
        let second = slice(&mut state, 3, (0, 1));

        let result = SchedulerBuilder::new(2, vec![], vec![first, second]);

        assert_eq!(
            result.err(),
            Some(ConfigurationError::DuplicateSlice {
                kind: "demanding",
                subject: 3
            })
        );
    }

    #[test]
    fn dimensions_are_validated() {
        let mut state = State::default();
        let c = slice(&mut state, 0, (0, 0));
        let mut builder = SchedulerBuilder::new(2, vec![c], vec![]).expect("valid");

        assert_eq!(
            builder.add_dimension(&[4], &[1], &[]).err(),
            Some(ConfigurationError::LengthMismatch {
                what: "node capacities",
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            builder.add_dimension(&[4, -1], &[1], &[]).err(),
            Some(ConfigurationError::NegativeCapacity {
                node: 1,
                capacity: -1
            })
        );
        assert_eq!(
            builder.add_dimension(&[4, 4], &[-2], &[]).err(),
            Some(ConfigurationError::NegativeUsage {
                slice: 0,
                usage: -2
            })
        );
        assert!(builder.add_dimension(&[4, 4], &[2], &[]).is_ok());
    }

    #[test]
    fn aliases_are_validated() {
        let mut state = State::default();
        let d = slice(&mut state, 0, (0, 2));
        let mut builder = SchedulerBuilder::new(3, vec![], vec![d]).expect("valid");

        assert_eq!(
            builder.add_alias(5, &[], &[1], &[]).err(),
            Some(ConfigurationError::EmptyAlias)
        );
        assert_eq!(
            builder.add_alias(5, &[], &[1], &[0, 3]).err(),
            Some(ConfigurationError::NodeOutOfRange {
                node: 3,
                nb_nodes: 3
            })
        );
        assert!(builder.add_alias(5, &[], &[1], &[0, 2]).is_ok());
        assert_eq!(builder.build().resources.len(), 1);
    }

    #[test]
    fn hosts_outside_the_nodes_are_rejected_when_posting() {
        let mut state = State::default();
        let d = slice(&mut state, 0, (0, 4));
        let builder = SchedulerBuilder::new(3, vec![], vec![d]).expect("valid");

        assert_eq!(
            builder.post(&mut state).err(),
            Some(ConfigurationError::HostOutOfRange {
                kind: "demanding",
                slice: 0,
                value: 4,
                nb_nodes: 3
            })
        );
        assert_eq!(state.num_propagators(), 0);
    }

    #[test]
    fn every_node_becomes_a_resource() {
        let mut state = State::default();
        let c = slice(&mut state, 0, (1, 1));
        let mut builder = SchedulerBuilder::new(3, vec![c], vec![]).expect("valid");
        let _ = builder.add_dimension(&[1, 2, 3], &[1], &[]).expect("valid");
        let _ = builder.add_dimension(&[4, 5, 6], &[2], &[]).expect("valid");

        let constructor = builder.build();

        assert_eq!(constructor.resources.len(), 3);
        assert_eq!(constructor.resources[1].members(), &[1]);
        assert_eq!(constructor.resources[2].dimensions[1].capacity, 6);
    }
}
