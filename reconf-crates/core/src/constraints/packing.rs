use log::debug;

use super::scheduler::check_host;
use super::scheduler::check_length;
use super::scheduler::check_non_negative;
use super::Constraint;
use crate::basic_types::ConfigurationError;
use crate::engine::variables::DomainId;
use crate::model::Slice;
use crate::propagators::packing::VectorPackingConstructor;
use crate::propagators::packing::VectorPackingOptions;
use crate::State;

/// Collects the dimensions of a vector packing of the d-slices into the nodes.
///
/// Every node is a bin, the host of every d-slice is an item, and each dimension adds one load
/// variable per node ranging over `[0, capacity]`.
#[derive(Clone, Debug)]
pub struct PackingBuilder {
    nb_nodes: usize,
    items: Vec<DomainId>,
    /// `capacities[dimension][node]`
    capacities: Vec<Vec<i64>>,
    /// `sizes[dimension][item]`
    sizes: Vec<Vec<i64>>,
    options: VectorPackingOptions,
}

impl PackingBuilder {
    pub fn new(nb_nodes: usize, d_slices: &[Slice]) -> PackingBuilder {
        PackingBuilder {
            nb_nodes,
            items: d_slices.iter().map(|slice| slice.host).collect(),
            capacities: Vec::new(),
            sizes: Vec::new(),
            options: VectorPackingOptions::default(),
        }
    }

    pub fn with_options(mut self, options: VectorPackingOptions) -> PackingBuilder {
        self.options = options;
        self
    }

    pub fn num_dimensions(&self) -> usize {
        self.sizes.len()
    }

    /// Add a dimension: one capacity per node and one size per d-slice.
    pub fn add_dimension(
        &mut self,
        capacities: &[i64],
        sizes: &[i64],
    ) -> Result<&mut PackingBuilder, ConfigurationError> {
        check_length("node capacities", self.nb_nodes, capacities.len())?;
        check_length("d-slice sizes", self.items.len(), sizes.len())?;
        check_non_negative(sizes)?;
        if let Some((node, &capacity)) = capacities
            .iter()
            .enumerate()
            .find(|&(_, &capacity)| capacity < 0)
        {
            return Err(ConfigurationError::NegativeCapacity { node, capacity });
        }

        self.capacities.push(capacities.to_vec());
        self.sizes.push(sizes.to_vec());
        Ok(self)
    }

    /// Create the load variables in `state` and the constructor of the packing propagator.
    ///
    /// Fails when an item may be put in a bin which does not exist.
    pub fn build(&self, state: &mut State) -> Result<VectorPackingConstructor, ConfigurationError> {
        for (item, &host) in self.items.iter().enumerate() {
            check_host(state, "demanding", item, host, self.nb_nodes).map_err(|_| {
                let lower_bound = state.lower_bound(host);
                ConfigurationError::BinOutOfRange {
                    item,
                    bin: if lower_bound < 0 {
                        lower_bound
                    } else {
                        state.upper_bound(host)
                    },
                    nb_bins: self.nb_nodes,
                }
            })?;
        }

        let loads = self
            .capacities
            .iter()
            .enumerate()
            .map(|(dimension, capacities)| {
                capacities
                    .iter()
                    .enumerate()
                    .map(|(node, &capacity)| {
                        let name = format!("load[{dimension}][{node}]");
                        state.new_interval_variable(0, clamp_to_i32(capacity), Some(name))
                    })
                    .collect()
            })
            .collect();

        Ok(VectorPackingConstructor {
            items: self.items.clone(),
            sizes: self.sizes.clone(),
            loads,
            options: self.options,
        })
    }
}

impl Constraint for PackingBuilder {
    fn post(self, state: &mut State) -> Result<(), ConfigurationError> {
        if self.sizes.is_empty() {
            debug!("skipping packing without dimensions");
            return Ok(());
        }

        self.build(state)?.post(state)
    }
}

fn clamp_to_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VmId;

    fn d_slice(state: &mut State, subject: u32, hosts: (i32, i32)) -> Slice {
        Slice {
            subject: VmId(subject),
            host: state.new_interval_variable(hosts.0, hosts.1, None),
            start: state.new_interval_variable(0, 10, None),
            end: state.new_interval_variable(10, 10, None),
            duration: state.new_interval_variable(0, 10, None),
        }
    }

    #[test]
    fn loads_range_over_the_capacities() {
        let mut state = State::default();
        let slices = [d_slice(&mut state, 0, (0, 1)), d_slice(&mut state, 1, (0, 1))];
        let mut builder = PackingBuilder::new(2, &slices);
        let _ = builder.add_dimension(&[4, 6], &[1, 2]).expect("valid");

        let constructor = builder.build(&mut state).expect("valid");

        let loads = constructor.loads();
        assert_eq!(loads.len(), 1);
        assert_eq!(state.upper_bound(loads[0][0]), 4);
        assert_eq!(state.upper_bound(loads[0][1]), 6);
        assert_eq!(state.variable_name(loads[0][1]), Some("load[0][1]"));
    }

    #[test]
    fn items_outside_the_bins_are_rejected() {
        let mut state = State::default();
        let slices = [d_slice(&mut state, 0, (0, 2))];
        let mut builder = PackingBuilder::new(2, &slices);
        let _ = builder.add_dimension(&[4, 6], &[1]).expect("valid");

        assert_eq!(
            builder.build(&mut state).err(),
            Some(ConfigurationError::BinOutOfRange {
                item: 0,
                bin: 2,
                nb_bins: 2
            })
        );
    }

    #[test]
    fn sizes_must_match_the_items() {
        let mut state = State::default();
        let slices = [d_slice(&mut state, 0, (0, 1))];
        let mut builder = PackingBuilder::new(2, &slices);

        assert_eq!(
            builder.add_dimension(&[4, 6], &[1, 1]).err(),
            Some(ConfigurationError::LengthMismatch {
                what: "d-slice sizes",
                expected: 1,
                actual: 2
            })
        );
        assert_eq!(builder.num_dimensions(), 0);
    }
}
