use fnv::FnvHashSet;

use crate::basic_types::Trail;
use crate::containers::KeyedVec;
use crate::engine::notifications::NotificationEngine;
use crate::engine::predicates::Predicate;
use crate::engine::predicates::PredicateType;
use crate::engine::variables::DomainId;
use crate::reconf_asserts::reconf_assert_moderate;
use crate::reconf_asserts::reconf_assert_simple;

/// The domains of all integer variables, together with the trail needed to restore them.
#[derive(Clone, Debug, Default)]
pub(crate) struct Assignments {
    trail: Trail<ConstraintProgrammingTrailEntry>,
    domains: KeyedVec<DomainId, IntegerDomain>,
}

/// Returned when applying a predicate would leave a domain without values. The domain itself is
/// left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyDomain;

#[derive(Clone, Copy, Debug)]
struct ConstraintProgrammingTrailEntry {
    predicate: Predicate,
    old_lower_bound: i32,
    old_upper_bound: i32,
    /// Set when the entry added the right-hand side of `predicate` to the holes.
    hole_added: bool,
}

/// An interval with holes. Both bounds are always values of the domain.
#[derive(Clone, Debug)]
struct IntegerDomain {
    lower_bound: i32,
    upper_bound: i32,
    holes: FnvHashSet<i32>,
}

impl IntegerDomain {
    fn contains(&self, value: i32) -> bool {
        self.lower_bound <= value && value <= self.upper_bound && !self.holes.contains(&value)
    }

    fn debug_bounds_check(&self) -> bool {
        self.lower_bound <= self.upper_bound
            && !self.holes.contains(&self.lower_bound)
            && !self.holes.contains(&self.upper_bound)
    }
}

impl Assignments {
    pub(crate) fn grow(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        reconf_assert_simple!(lower_bound <= upper_bound, "Cannot create an empty domain.");

        self.domains.push(IntegerDomain {
            lower_bound,
            upper_bound,
            holes: FnvHashSet::default(),
        })
    }

    pub(crate) fn num_domains(&self) -> usize {
        self.domains.len()
    }

    pub(crate) fn get_domains(&self) -> impl Iterator<Item = DomainId> {
        self.domains.keys()
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint();
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.trail.get_checkpoint()
    }

    #[cfg(test)]
    pub(crate) fn num_trail_entries(&self) -> usize {
        self.trail.len()
    }

    pub(crate) fn get_lower_bound(&self, domain_id: DomainId) -> i32 {
        self.domains[domain_id].lower_bound
    }

    pub(crate) fn get_upper_bound(&self, domain_id: DomainId) -> i32 {
        self.domains[domain_id].upper_bound
    }

    pub(crate) fn is_value_in_domain(&self, domain_id: DomainId, value: i32) -> bool {
        self.domains[domain_id].contains(value)
    }

    pub(crate) fn is_domain_assigned(&self, domain_id: DomainId) -> bool {
        self.get_lower_bound(domain_id) == self.get_upper_bound(domain_id)
    }

    pub(crate) fn get_assigned_value(&self, domain_id: DomainId) -> Option<i32> {
        self.is_domain_assigned(domain_id)
            .then(|| self.get_lower_bound(domain_id))
    }

    /// The values of the domain in increasing order.
    pub(crate) fn get_domain_iterator(
        &self,
        domain_id: DomainId,
    ) -> impl Iterator<Item = i32> + '_ {
        let domain = &self.domains[domain_id];
        (domain.lower_bound..=domain.upper_bound).filter(|value| !domain.holes.contains(value))
    }

    pub(crate) fn get_domain_size(&self, domain_id: DomainId) -> usize {
        self.get_domain_iterator(domain_id).count()
    }
}

impl Assignments {
    /// Apply the given [`Predicate`] to the domains.
    ///
    /// Returns `false` if the predicate already held, `true` if a domain changed. If applying the
    /// predicate would empty the domain, [`EmptyDomain`] is returned and nothing changes.
    pub(crate) fn post_predicate(
        &mut self,
        predicate: Predicate,
        notification_engine: &mut NotificationEngine,
    ) -> Result<bool, EmptyDomain> {
        let domain_id = predicate.get_domain();
        let lower_bound_before = self.get_lower_bound(domain_id);
        let upper_bound_before = self.get_upper_bound(domain_id);

        let mut removal_took_place = false;

        let update_took_place = match predicate.get_predicate_type() {
            PredicateType::LowerBound => self.tighten_lower_bound(predicate)?,
            PredicateType::UpperBound => self.tighten_upper_bound(predicate)?,
            PredicateType::NotEqual => {
                removal_took_place = self.remove_value_from_domain(predicate)?;
                removal_took_place
            }
            PredicateType::Equal => self.make_assignment(predicate)?,
        };

        if update_took_place {
            reconf_assert_moderate!(self.domains[domain_id].debug_bounds_check());
            notification_engine.event_occurred(
                lower_bound_before,
                upper_bound_before,
                self.get_lower_bound(domain_id),
                self.get_upper_bound(domain_id),
                removal_took_place,
                domain_id,
            );
        }

        Ok(update_took_place)
    }

    fn push_entry(&mut self, predicate: Predicate, hole_added: bool) {
        let domain = &self.domains[predicate.get_domain()];
        self.trail.push(ConstraintProgrammingTrailEntry {
            predicate,
            old_lower_bound: domain.lower_bound,
            old_upper_bound: domain.upper_bound,
            hole_added,
        });
    }

    fn tighten_lower_bound(&mut self, predicate: Predicate) -> Result<bool, EmptyDomain> {
        let domain_id = predicate.get_domain();
        let new_lower_bound = predicate.get_right_hand_side();

        if new_lower_bound <= self.get_lower_bound(domain_id) {
            return Ok(false);
        }
        if new_lower_bound > self.get_upper_bound(domain_id) {
            return Err(EmptyDomain);
        }

        self.push_entry(predicate, false);
        let domain = &mut self.domains[domain_id];
        domain.lower_bound = new_lower_bound;
        while domain.holes.contains(&domain.lower_bound) {
            domain.lower_bound += 1;
        }

        Ok(true)
    }

    fn tighten_upper_bound(&mut self, predicate: Predicate) -> Result<bool, EmptyDomain> {
        let domain_id = predicate.get_domain();
        let new_upper_bound = predicate.get_right_hand_side();

        if new_upper_bound >= self.get_upper_bound(domain_id) {
            return Ok(false);
        }
        if new_upper_bound < self.get_lower_bound(domain_id) {
            return Err(EmptyDomain);
        }

        self.push_entry(predicate, false);
        let domain = &mut self.domains[domain_id];
        domain.upper_bound = new_upper_bound;
        while domain.holes.contains(&domain.upper_bound) {
            domain.upper_bound -= 1;
        }

        Ok(true)
    }

    fn remove_value_from_domain(&mut self, predicate: Predicate) -> Result<bool, EmptyDomain> {
        let domain_id = predicate.get_domain();
        let removed_value = predicate.get_right_hand_side();

        if !self.is_value_in_domain(domain_id, removed_value) {
            return Ok(false);
        }
        if self.is_domain_assigned(domain_id) {
            return Err(EmptyDomain);
        }

        self.push_entry(predicate, true);
        let domain = &mut self.domains[domain_id];
        let _ = domain.holes.insert(removed_value);

        // The bounds skip over every removed value, so a bound never lands on a hole.
        if domain.lower_bound == removed_value {
            while domain.holes.contains(&domain.lower_bound) {
                domain.lower_bound += 1;
            }
        }
        if domain.upper_bound == removed_value {
            while domain.holes.contains(&domain.upper_bound) {
                domain.upper_bound -= 1;
            }
        }

        Ok(true)
    }

    fn make_assignment(&mut self, predicate: Predicate) -> Result<bool, EmptyDomain> {
        let domain_id = predicate.get_domain();
        let assigned_value = predicate.get_right_hand_side();

        if !self.is_value_in_domain(domain_id, assigned_value) {
            return Err(EmptyDomain);
        }
        if self.is_domain_assigned(domain_id) {
            return Ok(false);
        }

        self.push_entry(predicate, false);
        let domain = &mut self.domains[domain_id];
        domain.lower_bound = assigned_value;
        domain.upper_bound = assigned_value;

        Ok(true)
    }

    /// Returns whether the predicate holds (`Some(true)`), is violated (`Some(false)`), or is
    /// undecided in the current domains.
    pub(crate) fn evaluate_predicate(&self, predicate: Predicate) -> Option<bool> {
        let domain_id = predicate.get_domain();
        let value = predicate.get_right_hand_side();

        match predicate.get_predicate_type() {
            PredicateType::LowerBound => {
                if self.get_lower_bound(domain_id) >= value {
                    Some(true)
                } else if self.get_upper_bound(domain_id) < value {
                    Some(false)
                } else {
                    None
                }
            }
            PredicateType::UpperBound => {
                if self.get_upper_bound(domain_id) <= value {
                    Some(true)
                } else if self.get_lower_bound(domain_id) > value {
                    Some(false)
                } else {
                    None
                }
            }
            PredicateType::NotEqual => {
                if !self.is_value_in_domain(domain_id, value) {
                    Some(true)
                } else if self.is_domain_assigned(domain_id) {
                    Some(false)
                } else {
                    None
                }
            }
            PredicateType::Equal => {
                if !self.is_value_in_domain(domain_id, value) {
                    Some(false)
                } else if self.is_domain_assigned(domain_id) {
                    Some(true)
                } else {
                    None
                }
            }
        }
    }

    /// Undo every domain change made after `new_checkpoint`.
    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) {
        reconf_assert_simple!(
            new_checkpoint <= self.trail.get_checkpoint(),
            "Expected the new checkpoint {new_checkpoint} to be at most the current checkpoint {}",
            self.trail.get_checkpoint(),
        );
        if new_checkpoint == self.trail.get_checkpoint() {
            return;
        }

        let domains = &mut self.domains;
        self.trail.synchronise(new_checkpoint).for_each(|entry| {
            let domain = &mut domains[entry.predicate.get_domain()];
            domain.lower_bound = entry.old_lower_bound;
            domain.upper_bound = entry.old_upper_bound;
            if entry.hole_added {
                let _ = domain.holes.remove(&entry.predicate.get_right_hand_side());
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate;

    fn post(assignments: &mut Assignments, predicate: Predicate) -> Result<bool, EmptyDomain> {
        assignments.post_predicate(predicate, &mut NotificationEngine::default())
    }

    #[test]
    fn removing_a_bound_skips_over_holes() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, 5);

        assert_eq!(post(&mut assignments, predicate![x != 1]), Ok(true));
        assert_eq!(post(&mut assignments, predicate![x != 2]), Ok(true));
        assert_eq!(post(&mut assignments, predicate![x != 0]), Ok(true));

        assert_eq!(assignments.get_lower_bound(x), 3);
        assert_eq!(assignments.get_domain_iterator(x).collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn posting_a_predicate_that_holds_is_a_no_op() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(2, 5);

        assert_eq!(post(&mut assignments, predicate![x >= 1]), Ok(false));
        assert_eq!(post(&mut assignments, predicate![x != 7]), Ok(false));
        assert_eq!(assignments.num_trail_entries(), 0);
    }

    #[test]
    fn emptying_a_domain_is_reported_and_leaves_it_unchanged() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(2, 2);

        assert_eq!(post(&mut assignments, predicate![x != 2]), Err(EmptyDomain));
        assert_eq!(post(&mut assignments, predicate![x >= 3]), Err(EmptyDomain));
        assert_eq!(post(&mut assignments, predicate![x == 4]), Err(EmptyDomain));
        assert_eq!(assignments.get_assigned_value(x), Some(2));
    }

    #[test]
    fn synchronise_restores_bounds_and_holes() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, 9);

        assignments.new_checkpoint();
        let _ = post(&mut assignments, predicate![x != 4]);
        let _ = post(&mut assignments, predicate![x <= 6]);
        assignments.new_checkpoint();
        let _ = post(&mut assignments, predicate![x == 5]);

        assignments.synchronise(1);
        assert_eq!(assignments.get_domain_iterator(x).collect::<Vec<_>>(), vec![0, 1, 2, 3, 5, 6]);

        assignments.synchronise(0);
        assert_eq!(assignments.get_domain_size(x), 10);
        assert!(assignments.is_value_in_domain(x, 4));
    }

    #[test]
    fn evaluating_predicates_agrees_with_the_domain() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, 3);
        let _ = post(&mut assignments, predicate![x != 1]);

        assert_eq!(assignments.evaluate_predicate(predicate![x != 1]), Some(true));
        assert_eq!(assignments.evaluate_predicate(predicate![x == 1]), Some(false));
        assert_eq!(assignments.evaluate_predicate(predicate![x >= 2]), None);
        assert_eq!(assignments.evaluate_predicate(predicate![x <= 3]), Some(true));
    }
}
