use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;
use crate::State;

/// A snapshot of the values of all variables at a leaf of the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    values: KeyedVec<DomainId, i32>,
}

impl Solution {
    /// Records the lower bound of every variable; a variable the brancher left unfixed is
    /// reported with its lower bound.
    pub(crate) fn from_state(state: &State) -> Solution {
        Solution {
            values: state
                .variables()
                .map(|variable| state.lower_bound(variable))
                .collect::<Vec<_>>()
                .into(),
        }
    }

    pub fn value(&self, variable: DomainId) -> i32 {
        self.values[variable]
    }

    pub fn num_variables(&self) -> usize {
        self.values.len()
    }
}
