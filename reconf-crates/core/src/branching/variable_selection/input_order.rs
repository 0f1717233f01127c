use log::warn;

use super::VariableSelector;
use crate::branching::SelectionContext;
use crate::engine::variables::DomainId;

/// A [`VariableSelector`] which selects the first variable which is not fixed, in the order in
/// which the variables were given.
#[derive(Debug, Clone)]
pub struct InputOrder {
    variables: Vec<DomainId>,
}

impl InputOrder {
    pub fn new(variables: &[DomainId]) -> Self {
        if variables.is_empty() {
            warn!("The InputOrder variable selector was not provided with any variables");
        }
        InputOrder {
            variables: variables.to_vec(),
        }
    }
}

impl VariableSelector for InputOrder {
    fn select_variable(&mut self, context: &SelectionContext) -> Option<DomainId> {
        self.variables
            .iter()
            .find(|&&variable| !context.is_fixed(variable))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate;
    use crate::State;

    #[test]
    fn selects_the_first_unfixed_variable() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 10, None);
        let y = state.new_interval_variable(5, 20, None);
        let mut selector = InputOrder::new(&[x, y]);

        let selected = selector.select_variable(&SelectionContext::new(&state.assignments));
        assert_eq!(selected, Some(x));

        let _ = state.post(predicate!(x == 3)).expect("3 is in the domain");
        let selected = selector.select_variable(&SelectionContext::new(&state.assignments));
        assert_eq!(selected, Some(y));

        let _ = state.post(predicate!(y == 7)).expect("7 is in the domain");
        let selected = selector.select_variable(&SelectionContext::new(&state.assignments));
        assert_eq!(selected, None);
    }
}
