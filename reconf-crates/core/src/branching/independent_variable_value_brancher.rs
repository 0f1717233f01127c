use super::Brancher;
use super::SelectionContext;
use super::ValueSelector;
use super::VariableSelector;
use crate::engine::predicates::Predicate;

/// A [`Brancher`] which uses a [`VariableSelector`] and a [`ValueSelector`] independently of one
/// another.
#[derive(Debug, Clone)]
pub struct IndependentVariableValueBrancher<VariableSelect, ValueSelect> {
    /// Determines which unfixed variable to branch on next.
    variable_selector: VariableSelect,
    /// Determines the value the selected variable is fixed to.
    value_selector: ValueSelect,
}

impl<VariableSelect, ValueSelect> IndependentVariableValueBrancher<VariableSelect, ValueSelect>
where
    VariableSelect: VariableSelector,
    ValueSelect: ValueSelector,
{
    pub fn new(variable_selector: VariableSelect, value_selector: ValueSelect) -> Self {
        IndependentVariableValueBrancher {
            variable_selector,
            value_selector,
        }
    }
}

impl<VariableSelect, ValueSelect> Brancher
    for IndependentVariableValueBrancher<VariableSelect, ValueSelect>
where
    VariableSelect: VariableSelector,
    ValueSelect: ValueSelector,
{
    fn next_decision(&mut self, context: &SelectionContext) -> Option<Predicate> {
        self.variable_selector
            .select_variable(context)
            .map(|variable| self.value_selector.select_value(context, variable))
    }
}
