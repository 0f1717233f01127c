use crate::engine::variables::DomainId;
use crate::engine::Assignments;

/// Read access to the domains for a [`Brancher`](super::Brancher).
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext<'a> {
    assignments: &'a Assignments,
}

impl<'a> SelectionContext<'a> {
    pub(crate) fn new(assignments: &'a Assignments) -> Self {
        SelectionContext { assignments }
    }

    pub fn lower_bound(&self, variable: DomainId) -> i32 {
        self.assignments.get_lower_bound(variable)
    }

    pub fn upper_bound(&self, variable: DomainId) -> i32 {
        self.assignments.get_upper_bound(variable)
    }

    pub fn contains(&self, variable: DomainId, value: i32) -> bool {
        self.assignments.is_value_in_domain(variable, value)
    }

    pub fn is_fixed(&self, variable: DomainId) -> bool {
        self.assignments.is_domain_assigned(variable)
    }
}
