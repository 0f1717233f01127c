use std::ops::Range;

use log::debug;
use log::trace;

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

/// Creates a [`DisjointPropagator`]; obtained from [`disjoint`](crate::constraints::disjoint).
///
/// Every variable ranges over a subset of `[0, nb_values)`.
#[derive(Clone, Debug)]
pub struct DisjointConstructor {
    pub(crate) groups: Vec<Vec<DomainId>>,
    pub(crate) nb_values: usize,
}

impl PropagatorConstructor for DisjointConstructor {
    type PropagatorImpl = DisjointPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let DisjointConstructor { groups, nb_values } = self;

        debug!(
            "posting disjoint over {} groups of {nb_values} values",
            groups.len()
        );

        let mut variables = Vec::new();
        let mut group_of = Vec::new();
        let mut group_ranges = Vec::new();
        for (group, members) in groups.iter().enumerate() {
            group_ranges.push(variables.len()..variables.len() + members.len());
            for &variable in members {
                let local_id = LocalId::from(variables.len() as u32);
                context.register(variable, DomainEvents::ANY_INT, local_id);
                variables.push(variable);
                group_of.push(group);
            }
        }

        let domains = variables
            .iter()
            .map(|&variable| context.domains().iterate_domain(variable).collect::<Vec<_>>())
            .collect::<Vec<_>>();

        let mut counts = vec![vec![0_i64; nb_values]; groups.len()];
        let mut pending = Vec::new();

        let trailed_values = context.trailed_values_mut();
        let required = (0..groups.len())
            .map(|_| TrailedBitSet::new(trailed_values, nb_values, false))
            .collect::<Box<[_]>>();
        let known_domains = domains
            .iter()
            .zip(group_of.iter())
            .map(|(domain, &group)| {
                let known = TrailedBitSet::new(trailed_values, nb_values, false);
                for &value in domain {
                    let _ = known.insert(trailed_values, value as usize);
                    counts[group][value as usize] += 1;
                }
                if let [value] = domain.as_slice() {
                    if required[group].insert(trailed_values, *value as usize) {
                        pending.push((group, *value));
                    }
                }
                known
            })
            .collect();

        let candidates = counts
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|count| context.new_trailed_integer(count))
                    .collect()
            })
            .collect();

        DisjointPropagator {
            variables: variables.into_boxed_slice(),
            group_of: group_of.into_boxed_slice(),
            group_ranges: group_ranges.into_boxed_slice(),
            nb_values,
            candidates,
            required,
            known_domains,
            pending,
        }
    }
}

/// Propagator ensuring that no value is taken by variables of two different groups.
///
/// Once a variable of a group is fixed to a value, the value is _required_ by the group and is
/// removed from the variables of every other group. Two groups requiring the same value is a
/// conflict. With two groups this is the classic disjoint constraint.
#[derive(Clone, Debug)]
pub struct DisjointPropagator {
    /// The variables of all groups, in group order; the local id of a variable is its index.
    variables: Box<[DomainId]>,
    group_of: Box<[usize]>,
    /// The indices into `variables` of every group.
    group_ranges: Box<[Range<usize>]>,
    nb_values: usize,
    /// `candidates[group][value]` counts the variables of the group which contain the value.
    candidates: Box<[Box<[TrailedInteger]>]>,
    required: Box<[TrailedBitSet]>,
    /// The domain of every variable as last seen by the propagator.
    known_domains: Box<[TrailedBitSet]>,
    /// Required values which have not been removed from the other groups yet. Entries can be
    /// stale after backtracking; they are checked against `required` before use.
    pending: Vec<(usize, i32)>,
}

impl DisjointPropagator {
    pub fn num_groups(&self) -> usize {
        self.group_ranges.len()
    }

    /// The number of variables of `group` which can take `value`.
    pub fn candidate_count(&self, domains: Domains, group: usize, value: i32) -> usize {
        domains.value(self.candidates[group][value as usize]) as usize
    }

    /// The values taken by a fixed variable of `group`.
    pub fn required_values(&self, domains: Domains, group: usize) -> Vec<i32> {
        self.required[group]
            .iter(domains.trailed_values())
            .map(|value| value as i32)
            .collect()
    }

    /// Bring the bookkeeping of the variable in line with its domain. Returns whether its group
    /// requires a new value.
    fn synchronise_variable<Context: ReadDomains + WriteTrailedValues>(
        &mut self,
        context: &mut Context,
        index: usize,
    ) -> bool {
        let variable = self.variables[index];
        let group = self.group_of[index];
        let known = &self.known_domains[index];

        let removed = known
            .iter(context.trailed_values())
            .filter(|&value| !context.contains(variable, value as i32))
            .collect::<Vec<_>>();
        for value in removed {
            let _ = known.remove(context.trailed_values_mut(), value);
            context.add_assign_trailed(self.candidates[group][value], -1);
        }

        let Some(value) = context.fixed_value(variable) else {
            return false;
        };
        if !self.required[group].insert(context.trailed_values_mut(), value as usize) {
            return false;
        }
        self.pending.push((group, value));
        true
    }

    /// Remove `value`, required by `group`, from the variables of every other group.
    fn exclude_from_other_groups(
        &mut self,
        context: &mut PropagationContext,
        group: usize,
        value: i32,
    ) -> PropagationStatusCP {
        for other in 0..self.group_ranges.len() {
            if other == group {
                continue;
            }
            if self.required[other].contains(context.trailed_values(), value as usize) {
                trace!("groups {group} and {other} both require {value}");
                return Err(ConflictCause::GroupCollision { value }.into());
            }
            if context.value(self.candidates[other][value as usize]) == 0 {
                continue;
            }

            for index in self.group_ranges[other].clone() {
                let variable = self.variables[index];
                if !context.contains(variable, value) {
                    continue;
                }
                trace!("removing {value} from a variable of group {other}");
                context.post(predicate!(variable != value))?;
                let _ = self.synchronise_variable(context, index);
            }
        }

        Ok(())
    }
}

impl Propagator for DisjointPropagator {
    fn name(&self) -> &str {
        "Disjoint"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn notify(
        &mut self,
        mut context: NotificationContext,
        local_id: LocalId,
        _event: OpaqueDomainEvent,
    ) -> EnqueueDecision {
        if self.synchronise_variable(&mut context, local_id.unpack() as usize) {
            EnqueueDecision::Enqueue
        } else {
            EnqueueDecision::Skip
        }
    }

    fn synchronise(&mut self, _domains: Domains) {
        self.pending.clear();
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        while let Some((group, value)) = self.pending.pop() {
            if !self.required[group].contains(context.trailed_values(), value as usize) {
                continue;
            }
            if let Err(inconsistency) = self.exclude_from_other_groups(&mut context, group, value) {
                self.pending.clear();
                return Err(inconsistency);
            }
        }
        Ok(())
    }

    fn debug_check_consistency(&self, domains: Domains) -> bool {
        let trailed_values = domains.trailed_values();
        let nb_values = self.nb_values;
        let mut counts = vec![vec![0; nb_values]; self.group_ranges.len()];
        let mut required = vec![vec![false; nb_values]; self.group_ranges.len()];

        for (index, &variable) in self.variables.iter().enumerate() {
            let group = self.group_of[index];
            let known = self.known_domains[index]
                .iter(trailed_values)
                .map(|value| value as i32)
                .collect::<Vec<_>>();
            if known != domains.iterate_domain(variable).collect::<Vec<_>>() {
                return false;
            }
            for &value in &known {
                counts[group][value as usize] += 1;
            }
            if let Some(value) = domains.fixed_value(variable) {
                required[group][value as usize] = true;
            }
        }

        (0..self.group_ranges.len()).all(|group| {
            (0..nb_values).all(|value| {
                domains.value(self.candidates[group][value]) == counts[group][value]
                    && self.required[group].contains(trailed_values, value)
                        == required[group][value]
            })
        })
    }
}
