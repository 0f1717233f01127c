use crate::engine::predicates::Predicate;
use crate::engine::trailed::TrailedInteger;
use crate::engine::trailed::TrailedValues;
use crate::engine::variables::DomainId;
use crate::engine::Assignments;

/// Read-only access to the domains and the trailed values of the state.
///
/// Query methods of propagators take a [`Domains`] (see [`State::get_domains`]) so that the
/// values they report correspond to the current node of the search.
///
/// [`State::get_domains`]: crate::State::get_domains
#[derive(Clone, Copy, Debug)]
pub struct Domains<'a> {
    assignments: &'a Assignments,
    trailed_values: &'a TrailedValues,
}

impl<'a> Domains<'a> {
    pub(crate) fn new(assignments: &'a Assignments, trailed_values: &'a TrailedValues) -> Self {
        Domains {
            assignments,
            trailed_values,
        }
    }
}

pub(crate) trait HasAssignments {
    fn assignments(&self) -> &Assignments;

    fn trailed_values(&self) -> &TrailedValues;
}

impl HasAssignments for Domains<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }

    fn trailed_values(&self) -> &TrailedValues {
        self.trailed_values
    }
}

/// Reading domain information, shared by every context handed to a propagator.
pub(crate) trait ReadDomains: HasAssignments {
    fn lower_bound(&self, var: DomainId) -> i32 {
        self.assignments().get_lower_bound(var)
    }

    fn upper_bound(&self, var: DomainId) -> i32 {
        self.assignments().get_upper_bound(var)
    }

    fn contains(&self, var: DomainId, value: i32) -> bool {
        self.assignments().is_value_in_domain(var, value)
    }

    fn is_fixed(&self, var: DomainId) -> bool {
        self.assignments().is_domain_assigned(var)
    }

    fn fixed_value(&self, var: DomainId) -> Option<i32> {
        self.assignments().get_assigned_value(var)
    }

    fn iterate_domain(&self, var: DomainId) -> impl Iterator<Item = i32> + '_ {
        self.assignments().get_domain_iterator(var)
    }

    fn evaluate_predicate(&self, predicate: Predicate) -> Option<bool> {
        self.assignments().evaluate_predicate(predicate)
    }

    fn value(&self, trailed_integer: TrailedInteger) -> i64 {
        self.trailed_values().read(trailed_integer)
    }
}

impl<T: HasAssignments> ReadDomains for T {}
