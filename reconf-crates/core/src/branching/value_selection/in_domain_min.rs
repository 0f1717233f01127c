use super::ValueSelector;
use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;
use crate::predicate;

/// [`ValueSelector`] which fixes the variable to its lower bound.
#[derive(Debug, Copy, Clone)]
pub struct InDomainMin;

impl ValueSelector for InDomainMin {
    fn select_value(&mut self, context: &SelectionContext, variable: DomainId) -> Predicate {
        predicate!(variable == context.lower_bound(variable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::State;

    #[test]
    fn selects_the_lower_bound() {
        let mut state = State::default();
        let x = state.new_interval_variable(4, 9, None);
        let _ = state.post(predicate!(x != 4)).expect("the domain has other values");

        let decision = InDomainMin.select_value(&SelectionContext::new(&state.assignments), x);

        assert_eq!(decision, predicate!(x == 5));
    }
}
