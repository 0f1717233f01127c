use log::debug;
use log::trace;

use super::VectorPackingOptions;
use crate::basic_types::ConflictCause;
use crate::basic_types::Inconsistency;
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

/// Creates a [`VectorPackingPropagator`]; obtained from
/// [`PackingBuilder::build`](crate::constraints::PackingBuilder::build).
///
/// The domain of every item is a subset of `[0, nb_bins)`.
#[derive(Clone, Debug)]
pub struct VectorPackingConstructor {
    /// The bin of every item.
    pub(crate) items: Vec<DomainId>,
    /// `sizes[dimension][item]`
    pub(crate) sizes: Vec<Vec<i64>>,
    /// `loads[dimension][bin]`
    pub(crate) loads: Vec<Vec<DomainId>>,
    pub(crate) options: VectorPackingOptions,
}

impl VectorPackingConstructor {
    /// The load variables, indexed by dimension and then by bin.
    pub fn loads(&self) -> &[Vec<DomainId>] {
        &self.loads
    }
}

impl PropagatorConstructor for VectorPackingConstructor {
    type PropagatorImpl = VectorPackingPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let VectorPackingConstructor {
            items,
            sizes,
            loads,
            options,
        } = self;
        let nb_items = items.len();
        let nb_bins = loads.first().map_or(0, Vec::len);

        debug!(
            "posting vector packing of {nb_items} items into {nb_bins} bins over {} dimensions",
            sizes.len()
        );

        for (item, &host) in items.iter().enumerate() {
            context.register(host, DomainEvents::ANY_INT, LocalId::from(item as u32));
        }
        for (dimension, dimension_loads) in loads.iter().enumerate() {
            for (bin, &load) in dimension_loads.iter().enumerate() {
                let local_id = nb_items + dimension * nb_bins + bin;
                context.register(load, DomainEvents::BOUNDS, LocalId::from(local_id as u32));
            }
        }

        let domains = items
            .iter()
            .map(|&host| context.domains().iterate_domain(host).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let load_bounds = loads
            .iter()
            .map(|dimension_loads| {
                dimension_loads
                    .iter()
                    .map(|&load| {
                        (
                            context.domains().lower_bound(load) as i64,
                            context.domains().upper_bound(load) as i64,
                        )
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let mut required = vec![vec![0; nb_bins]; sizes.len()];
        let mut candidate = vec![vec![0; nb_bins]; sizes.len()];

        let trailed_values = context.trailed_values_mut();
        let committed = TrailedBitSet::new(trailed_values, nb_items, false);
        let candidates = (0..nb_bins)
            .map(|_| TrailedBitSet::new(trailed_values, nb_items, false))
            .collect::<Box<[_]>>();

        for (item, domain) in domains.iter().enumerate() {
            let is_fixed = domain.len() == 1;
            if is_fixed {
                let _ = committed.insert(trailed_values, item);
            }

            for &bin in domain {
                let bin = bin as usize;
                if !is_fixed {
                    let _ = candidates[bin].insert(trailed_values, item);
                }
                for (dimension, dimension_sizes) in sizes.iter().enumerate() {
                    candidate[dimension][bin] += dimension_sizes[item];
                    if is_fixed {
                        required[dimension][bin] += dimension_sizes[item];
                    }
                }
            }
        }

        let mut order = (0..nb_items).collect::<Vec<_>>();
        order.sort_by(|&left, &right| {
            let size_of = |item: usize| sizes.iter().map(move |dimension| dimension[item]);
            size_of(right).cmp(size_of(left))
        });

        let mut allocate = |values: Vec<Vec<i64>>| {
            values
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|value| context.new_trailed_integer(value))
                        .collect::<Box<[_]>>()
                })
                .collect::<Box<[_]>>()
        };
        let required = allocate(required);
        let candidate = allocate(candidate);

        let sum_load_inf = load_bounds
            .iter()
            .map(|bounds| context.new_trailed_integer(bounds.iter().map(|(lb, _)| lb).sum()))
            .collect();
        let sum_load_sup = load_bounds
            .iter()
            .map(|bounds| context.new_trailed_integer(bounds.iter().map(|(_, ub)| ub).sum()))
            .collect();
        let loads_changed = context.new_trailed_integer(0);

        let total_sizes = sizes
            .iter()
            .map(|dimension| dimension.iter().sum())
            .collect();

        VectorPackingPropagator {
            items: items.into_boxed_slice(),
            sizes: sizes.into_iter().map(Vec::into_boxed_slice).collect(),
            loads: loads.into_iter().map(Vec::into_boxed_slice).collect(),
            order: order.into_boxed_slice(),
            total_sizes,
            required,
            candidate,
            candidates,
            committed,
            sum_load_inf,
            sum_load_sup,
            loads_changed,
            options,
        }
    }
}

/// Propagator for vector bin-packing: every item goes to exactly one bin and, in every dimension,
/// the load variable of a bin equals the total size of the items in it.
///
/// For every bin the propagator maintains the _required_ load (the items fixed to the bin) and
/// the _candidate_ load (the items which may still go to the bin, including the required ones).
/// The load variables are kept within these two values and within what the other bins leave
/// of the total size. Knapsack reasoning then removes the bin from items which do not fit in it
/// anymore, and forces items into bins which cannot reach their minimal load without them.
#[derive(Clone, Debug)]
pub struct VectorPackingPropagator {
    items: Box<[DomainId]>,
    sizes: Box<[Box<[i64]>]>,
    loads: Box<[Box<[DomainId]>]>,
    /// The items by decreasing size, compared lexicographically over the dimensions.
    order: Box<[usize]>,
    total_sizes: Box<[i64]>,
    required: Box<[Box<[TrailedInteger]>]>,
    candidate: Box<[Box<[TrailedInteger]>]>,
    /// Per bin, the items which are not fixed yet and can go to the bin.
    candidates: Box<[TrailedBitSet]>,
    /// The items whose size has been added to the required load of their bin.
    committed: TrailedBitSet,
    sum_load_inf: Box<[TrailedInteger]>,
    sum_load_sup: Box<[TrailedInteger]>,
    /// Set when a load variable changed outside of this propagator; the sums of the load bounds
    /// are stale until the next call to propagate.
    loads_changed: TrailedInteger,
    options: VectorPackingOptions,
}

fn to_bound(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

impl VectorPackingPropagator {
    pub fn num_bins(&self) -> usize {
        self.candidates.len()
    }

    /// The total size in `dimension` of the items fixed to `bin`.
    pub fn required_load(&self, domains: Domains, bin: usize, dimension: usize) -> i64 {
        domains.value(self.required[dimension][bin])
    }

    /// The total size in `dimension` of the items which may go to `bin`, the required ones
    /// included.
    pub fn candidate_load(&self, domains: Domains, bin: usize, dimension: usize) -> i64 {
        domains.value(self.candidate[dimension][bin])
    }

    /// The items which are not fixed yet and can still go to `bin`.
    pub fn candidate_items(&self, domains: Domains, bin: usize) -> Vec<usize> {
        self.candidates[bin].iter(domains.trailed_values()).collect()
    }

    fn num_dimensions(&self) -> usize {
        self.sizes.len()
    }

    /// The bin no longer is a candidate for the item. Returns whether the bookkeeping changed.
    fn remove_item<Context: ReadDomains + WriteTrailedValues>(
        &self,
        context: &mut Context,
        item: usize,
        bin: usize,
    ) -> bool {
        if !self.candidates[bin].remove(context.trailed_values_mut(), item) {
            return false;
        }
        for dimension in 0..self.num_dimensions() {
            context.add_assign_trailed(
                self.candidate[dimension][bin],
                -self.sizes[dimension][item],
            );
        }
        true
    }

    /// The item is fixed to the bin. Returns whether the bookkeeping changed.
    fn assign_item<Context: ReadDomains + WriteTrailedValues>(
        &self,
        context: &mut Context,
        item: usize,
        bin: usize,
    ) -> bool {
        let trailed_values = context.trailed_values_mut();
        if !self.committed.insert(trailed_values, item) {
            return false;
        }
        let _ = self.candidates[bin].remove(trailed_values, item);
        for dimension in 0..self.num_dimensions() {
            context.add_assign_trailed(self.required[dimension][bin], self.sizes[dimension][item]);
        }
        true
    }

    /// Bring the bookkeeping of the item in line with its domain.
    fn synchronise_item<Context: ReadDomains + WriteTrailedValues>(
        &self,
        context: &mut Context,
        item: usize,
    ) -> bool {
        let host = self.items[item];
        let mut changed = false;

        for bin in 0..self.num_bins() {
            if self.candidates[bin].contains(context.trailed_values(), item)
                && !context.contains(host, bin as i32)
            {
                changed |= self.remove_item(context, item, bin);
            }
        }
        if let Some(bin) = context.fixed_value(host) {
            changed |= self.assign_item(context, item, bin as usize);
        }

        changed
    }

    fn recompute_load_sums(&self, context: &mut PropagationContext) {
        for dimension in 0..self.num_dimensions() {
            let (inf, sup) = self.loads[dimension]
                .iter()
                .fold((0, 0), |(inf, sup), &load| {
                    (
                        inf + context.lower_bound(load) as i64,
                        sup + context.upper_bound(load) as i64,
                    )
                });
            context.assign_trailed(self.sum_load_inf[dimension], inf);
            context.assign_trailed(self.sum_load_sup[dimension], sup);
        }
    }

    fn check_total_sizes(&self, context: &PropagationContext) -> PropagationStatusCP {
        for (dimension, &total) in self.total_sizes.iter().enumerate() {
            if total > context.value(self.sum_load_sup[dimension])
                || total < context.value(self.sum_load_inf[dimension])
            {
                trace!("the items of dimension {dimension} do not fit the bins");
                return Err(ConflictCause::TotalSizeMismatch { dimension }.into());
            }
        }
        Ok(())
    }

    /// Tighten the bounds of a load variable and update the sums of the load bounds. Returns
    /// whether a bound changed.
    fn set_load_bounds(
        &self,
        context: &mut PropagationContext,
        dimension: usize,
        bin: usize,
        lower_bound: i64,
        upper_bound: i64,
    ) -> Result<bool, Inconsistency> {
        let load = self.loads[dimension][bin];
        let lb_before = context.lower_bound(load);
        let ub_before = context.upper_bound(load);

        context.post(predicate!(load >= to_bound(lower_bound)))?;
        context.post(predicate!(load <= to_bound(upper_bound)))?;

        let lb_after = context.lower_bound(load);
        let ub_after = context.upper_bound(load);
        context.add_assign_trailed(
            self.sum_load_inf[dimension],
            (lb_after - lb_before) as i64,
        );
        context.add_assign_trailed(
            self.sum_load_sup[dimension],
            (ub_after - ub_before) as i64,
        );

        Ok(lb_after != lb_before || ub_after != ub_before)
    }

    fn tighten_loads(&self, context: &mut PropagationContext) -> Result<bool, Inconsistency> {
        let mut changed = false;

        for dimension in 0..self.num_dimensions() {
            let total = self.total_sizes[dimension];
            for bin in 0..self.num_bins() {
                let load = self.loads[dimension][bin];
                let others_sup =
                    context.value(self.sum_load_sup[dimension]) - context.upper_bound(load) as i64;
                let others_inf =
                    context.value(self.sum_load_inf[dimension]) - context.lower_bound(load) as i64;

                let lower_bound = context
                    .value(self.required[dimension][bin])
                    .max(total - others_sup);
                let upper_bound = context
                    .value(self.candidate[dimension][bin])
                    .min(total - others_inf);

                changed |= self.set_load_bounds(context, dimension, bin, lower_bound, upper_bound)?;
            }
        }

        Ok(changed)
    }

    /// Scan the candidates of the bin by decreasing size; the scan stops at the first item which
    /// neither has to be removed nor forced.
    fn filter_knapsack(
        &self,
        context: &mut PropagationContext,
        bin: usize,
    ) -> Result<bool, Inconsistency> {
        let mut changed = false;

        for &item in self.order.iter() {
            if !self.candidates[bin].contains(context.trailed_values(), item) {
                continue;
            }
            let host = self.items[item];

            let does_not_fit = (0..self.num_dimensions()).any(|dimension| {
                context.value(self.required[dimension][bin]) + self.sizes[dimension][item]
                    > context.upper_bound(self.loads[dimension][bin]) as i64
            });
            if does_not_fit {
                trace!("item {item} does not fit in bin {bin}");
                context.post(predicate!(host != bin as i32))?;
                let _ = self.synchronise_item(context, item);
                changed = true;
                continue;
            }

            let is_needed = (0..self.num_dimensions()).any(|dimension| {
                context.value(self.candidate[dimension][bin]) - self.sizes[dimension][item]
                    < context.lower_bound(self.loads[dimension][bin]) as i64
            });
            if is_needed {
                trace!("item {item} is needed in bin {bin}");
                context.post(predicate!(host == bin as i32))?;
                let _ = self.synchronise_item(context, item);
                changed = true;
                continue;
            }

            break;
        }

        Ok(changed)
    }

    /// Restrict the load of the bin to the nearest sums which subsets of its candidates reach.
    fn filter_reachable(
        &self,
        context: &mut PropagationContext,
        dimension: usize,
        bin: usize,
    ) -> Result<bool, Inconsistency> {
        let limit = self.options.reachability_limit as i64;
        let load = self.loads[dimension][bin];
        let lower_bound = context.lower_bound(load) as i64;
        let upper_bound = context.upper_bound(load) as i64;
        let required = context.value(self.required[dimension][bin]);
        let free = context.value(self.candidate[dimension][bin]) - required;

        if free == 0 || free > limit || upper_bound - lower_bound > limit {
            return Ok(false);
        }

        let free = free as usize;
        let mut reachable = vec![false; free + 1];
        reachable[0] = true;
        let mut max_reached = 0;
        for item in self.candidates[bin].iter(context.trailed_values()) {
            let size = self.sizes[dimension][item] as usize;
            if size == 0 {
                continue;
            }
            let new_max = (max_reached + size).min(free);
            for sum in (size..=new_max).rev() {
                if reachable[sum - size] {
                    reachable[sum] = true;
                }
            }
            max_reached = new_max;
        }

        let from = (lower_bound - required).max(0) as usize;
        let to = ((upper_bound - required).min(free as i64)).max(-1);
        let reachable_in_window = if to < from as i64 {
            None
        } else {
            let to = to as usize;
            (from..=to)
                .find(|&sum| reachable[sum])
                .zip((from..=to).rev().find(|&sum| reachable[sum]))
        };

        let Some((lowest, highest)) = reachable_in_window else {
            trace!("no load of bin {bin} in dimension {dimension} is reachable");
            return Err(ConflictCause::UnreachableLoad { bin, dimension }.into());
        };

        self.set_load_bounds(
            context,
            dimension,
            bin,
            required + lowest as i64,
            required + highest as i64,
        )
    }
}

impl Propagator for VectorPackingPropagator {
    fn name(&self) -> &str {
        "VectorPacking"
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
        let index = local_id.unpack() as usize;
        if index >= self.items.len() {
            context.assign_trailed(self.loads_changed, 1);
            return EnqueueDecision::Enqueue;
        }

        if self.synchronise_item(&mut context, index) {
            EnqueueDecision::Enqueue
        } else {
            EnqueueDecision::Skip
        }
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        if context.value(self.loads_changed) != 0 {
            self.recompute_load_sums(&mut context);
            context.assign_trailed(self.loads_changed, 0);
        }

        loop {
            self.check_total_sizes(&context)?;
            let mut changed = self.tighten_loads(&mut context)?;

            if self.options.knapsack_filtering {
                for bin in 0..self.num_bins() {
                    changed |= self.filter_knapsack(&mut context, bin)?;
                }
            }

            if self.options.reachability_limit > 0 {
                for dimension in 0..self.num_dimensions() {
                    for bin in 0..self.num_bins() {
                        changed |= self.filter_reachable(&mut context, dimension, bin)?;
                    }
                }
            }

            if !changed {
                return Ok(());
            }
        }
    }

    fn debug_check_consistency(&self, domains: Domains) -> bool {
        let trailed_values = domains.trailed_values();
        let mut required = vec![vec![0; self.num_bins()]; self.num_dimensions()];
        let mut candidate = vec![vec![0; self.num_bins()]; self.num_dimensions()];

        for (item, &host) in self.items.iter().enumerate() {
            let is_fixed = domains.is_fixed(host);
            if is_fixed != self.committed.contains(trailed_values, item) {
                return false;
            }

            for bin in 0..self.num_bins() {
                let in_domain = domains.contains(host, bin as i32);
                if self.candidates[bin].contains(trailed_values, item) != (in_domain && !is_fixed) {
                    return false;
                }
                if !in_domain {
                    continue;
                }
                for dimension in 0..self.num_dimensions() {
                    candidate[dimension][bin] += self.sizes[dimension][item];
                    if is_fixed {
                        required[dimension][bin] += self.sizes[dimension][item];
                    }
                }
            }
        }

        (0..self.num_dimensions()).all(|dimension| {
            let sums_are_fresh = domains.value(self.loads_changed) != 0
                || self.loads[dimension].iter().fold((0, 0), |(inf, sup), &load| {
                    (
                        inf + domains.lower_bound(load) as i64,
                        sup + domains.upper_bound(load) as i64,
                    )
                }) == (
                    domains.value(self.sum_load_inf[dimension]),
                    domains.value(self.sum_load_sup[dimension]),
                );

            sums_are_fresh
                && (0..self.num_bins()).all(|bin| {
                    let load = self.loads[dimension][bin];
                    let required_load = domains.value(self.required[dimension][bin]);
                    let candidate_load = domains.value(self.candidate[dimension][bin]);

                    required_load == required[dimension][bin]
                        && candidate_load == candidate[dimension][bin]
                        && required_load <= domains.lower_bound(load) as i64
                        && candidate_load >= domains.upper_bound(load) as i64
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;
    use crate::engine::Conflict;

    fn one_dimension(
        solver: &mut TestSolver,
        capacities: &[i32],
        sizes: &[i64],
    ) -> (Vec<DomainId>, Vec<DomainId>, VectorPackingConstructor) {
        let nb_bins = capacities.len() as i32;
        let items = sizes
            .iter()
            .map(|_| solver.new_variable(0, nb_bins - 1))
            .collect::<Vec<_>>();
        let loads = capacities
            .iter()
            .map(|&capacity| solver.new_variable(0, capacity))
            .collect::<Vec<_>>();

        let constructor = VectorPackingConstructor {
            items: items.clone(),
            sizes: vec![sizes.to_vec()],
            loads: vec![loads.clone()],
            options: VectorPackingOptions::default(),
        };
        (items, loads, constructor)
    }

    #[test]
    fn items_which_cannot_be_split_over_the_bins_fail() {
        let mut solver = TestSolver::default();
        let (_, _, constructor) = one_dimension(&mut solver, &[5, 5], &[4, 3, 3]);

        let result = solver.new_propagator(constructor);

        assert!(matches!(
            result,
            Err(Conflict::Propagator {
                cause: ConflictCause::UnreachableLoad { dimension: 0, .. },
                ..
            })
        ));
    }

    #[test]
    fn knapsack_reasoning_alone_fails_once_the_largest_item_is_placed() {
        let mut solver = TestSolver::default();
        let (items, loads, mut constructor) = one_dimension(&mut solver, &[5, 5], &[4, 3, 3]);
        constructor.options.reachability_limit = 0;

        let _ = solver.new_propagator(constructor).expect("no conflict");
        solver.assert_bounds(loads[0], 5, 5);
        solver.assert_bounds(loads[1], 5, 5);

        let result = solver.assign_and_propagate(items[0], 0);
        assert!(matches!(result, Err(Conflict::EmptyDomain { .. })));
    }

    #[test]
    fn loads_lie_between_required_and_candidate_load() {
        let mut solver = TestSolver::default();
        let item_0 = solver.new_variable(0, 0);
        let item_1 = solver.new_variable(0, 1);
        let load_0 = solver.new_variable(0, 10);
        let load_1 = solver.new_variable(0, 10);

        let handle = solver
            .new_propagator(VectorPackingConstructor {
                items: vec![item_0, item_1],
                sizes: vec![vec![2, 3]],
                loads: vec![vec![load_0, load_1]],
                options: VectorPackingOptions::default(),
            })
            .expect("no conflict");

        solver.assert_bounds(load_0, 2, 5);
        solver.assert_bounds(load_1, 0, 3);

        let domains = solver.state.get_domains();
        let propagator = solver.propagator(handle);
        assert_eq!(propagator.required_load(domains, 0, 0), 2);
        assert_eq!(propagator.candidate_load(domains, 0, 0), 5);
        assert_eq!(propagator.candidate_items(domains, 1), vec![1]);

        solver
            .set_upper_bound_and_propagate(load_0, 4)
            .expect("no conflict");
        assert_eq!(solver.state.fixed_value(item_1), Some(1));
        solver.assert_bounds(load_0, 2, 2);
        solver.assert_bounds(load_1, 3, 3);
    }

    #[test]
    fn item_is_forced_into_a_bin_which_needs_it() {
        let mut solver = TestSolver::default();
        let item_0 = solver.new_variable(0, 1);
        let item_1 = solver.new_variable(0, 1);
        let load_0 = solver.new_variable(3, 3);
        let load_1 = solver.new_variable(0, 10);

        let _ = solver
            .new_propagator(VectorPackingConstructor {
                items: vec![item_0, item_1],
                sizes: vec![vec![3, 1]],
                loads: vec![vec![load_0, load_1]],
                options: VectorPackingOptions {
                    knapsack_filtering: true,
                    reachability_limit: 0,
                },
            })
            .expect("no conflict");

        assert_eq!(solver.state.fixed_value(item_0), Some(0));
        assert_eq!(solver.state.fixed_value(item_1), Some(1));
        solver.assert_bounds(load_1, 1, 1);
        assert!(solver.is_at_fixed_point());
    }

    #[test]
    fn too_large_total_size_fails() {
        let mut solver = TestSolver::default();
        let (_, _, constructor) = one_dimension(&mut solver, &[2, 2], &[2, 2, 1]);

        let result = solver.new_propagator(constructor);

        assert!(matches!(
            result,
            Err(Conflict::Propagator {
                cause: ConflictCause::TotalSizeMismatch { dimension: 0 },
                ..
            })
        ));
    }

    #[test]
    fn bookkeeping_is_restored_on_backtrack() {
        let mut solver = TestSolver::default();
        let (items, loads, constructor) = one_dimension(&mut solver, &[6, 6, 6], &[3, 2, 2]);

        let handle = solver.new_propagator(constructor).expect("no conflict");

        solver.new_checkpoint();
        solver
            .assign_and_propagate(items[0], 2)
            .expect("no conflict");
        {
            let domains = solver.state.get_domains();
            let propagator = solver.propagator(handle);
            assert_eq!(propagator.required_load(domains, 2, 0), 3);
            assert_eq!(propagator.candidate_load(domains, 0, 0), 4);
            assert_eq!(propagator.candidate_items(domains, 2), vec![1, 2]);
        }
        solver.assert_bounds(loads[2], 3, 5);

        solver.synchronise(0);
        let domains = solver.state.get_domains();
        let propagator = solver.propagator(handle);
        assert_eq!(propagator.required_load(domains, 2, 0), 0);
        assert_eq!(propagator.candidate_load(domains, 0, 0), 7);
        assert_eq!(propagator.candidate_items(domains, 2), vec![0, 1, 2]);
        solver.assert_bounds(loads[2], 0, 5);
    }

    #[test]
    fn every_dimension_constrains_the_bins() {
        let mut solver = TestSolver::default();
        let item_0 = solver.new_variable(0, 1);
        let item_1 = solver.new_variable(0, 1);
        let cpu = [solver.new_variable(0, 8), solver.new_variable(0, 8)];
        let memory = [solver.new_variable(0, 4), solver.new_variable(0, 1)];

        let _ = solver
            .new_propagator(VectorPackingConstructor {
                items: vec![item_0, item_1],
                sizes: vec![vec![1, 1], vec![2, 1]],
                loads: vec![cpu.to_vec(), memory.to_vec()],
                options: VectorPackingOptions::default(),
            })
            .expect("no conflict");

        // The memory of bin 1 only fits the second item.
        assert_eq!(solver.state.fixed_value(item_0), Some(0));
        assert!(solver.contains(item_1, 0));
        assert!(solver.contains(item_1, 1));
    }
}
