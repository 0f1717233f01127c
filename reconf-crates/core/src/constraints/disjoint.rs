use super::Constraint;
use crate::basic_types::ConfigurationError;
use crate::engine::variables::DomainId;
use crate::propagators::disjoint::DisjointConstructor;
use crate::State;

/// Creates the [`Constraint`] that no value in `[0, nb_values)` is taken by variables of two
/// different groups.
///
/// With two groups this is the disjoint constraint, with more the pairwise disjointness of all
/// groups. Variables of the same group may share values.
pub fn disjoint(groups: Vec<Vec<DomainId>>, nb_values: usize) -> Disjoint {
    Disjoint { groups, nb_values }
}

/// The [`Constraint`] created by [`disjoint`].
#[derive(Clone, Debug)]
pub struct Disjoint {
    groups: Vec<Vec<DomainId>>,
    nb_values: usize,
}

impl Disjoint {
    fn validate(&self, state: &State) -> Result<(), ConfigurationError> {
        if self.groups.len() < 2 {
            return Err(ConfigurationError::NotEnoughGroups(self.groups.len()));
        }

        for (group, members) in self.groups.iter().enumerate() {
            for (variable, &domain) in members.iter().enumerate() {
                let lower_bound = state.lower_bound(domain);
                let upper_bound = state.upper_bound(domain);
                let value = if lower_bound < 0 {
                    lower_bound
                } else if upper_bound as usize >= self.nb_values {
                    upper_bound
                } else {
                    continue;
                };

                return Err(ConfigurationError::ValueOutOfRange {
                    group,
                    variable,
                    value,
                    nb_values: self.nb_values,
                });
            }
        }

        Ok(())
    }
}

impl Constraint for Disjoint {
    fn post(self, state: &mut State) -> Result<(), ConfigurationError> {
        self.validate(state)?;
        DisjointConstructor {
            groups: self.groups,
            nb_values: self.nb_values,
        }
        .post(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_single_group_is_rejected() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 1, None);

        assert_eq!(
            disjoint(vec![vec![x]], 2).post(&mut state),
            Err(ConfigurationError::NotEnoughGroups(1))
        );
    }

    #[test]
    fn values_must_be_in_range() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 1, None);
        let y = state.new_interval_variable(0, 4, None);

        assert_eq!(
            disjoint(vec![vec![x], vec![x, y]], 3).post(&mut state),
            Err(ConfigurationError::ValueOutOfRange {
                group: 1,
                variable: 1,
                value: 4,
                nb_values: 3
            })
        );
    }

    #[test]
    fn posting_adds_one_propagator() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 1, None);
        let y = state.new_interval_variable(1, 1, None);

        disjoint(vec![vec![x], vec![y]], 2)
            .post(&mut state)
            .expect("valid groups");
        state.propagate_to_fixed_point().expect("no conflict");

        assert_eq!(state.num_propagators(), 1);
        assert_eq!(state.fixed_value(x), Some(0));
    }
}
