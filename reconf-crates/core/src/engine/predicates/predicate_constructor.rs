use super::Predicate;
use super::PredicateType;
use crate::engine::variables::DomainId;

/// Creates the four kinds of [`Predicate`] over a variable.
pub trait PredicateConstructor {
    /// Creates `[x >= bound]`.
    fn lower_bound_predicate(&self, bound: i32) -> Predicate;

    /// Creates `[x <= bound]`.
    fn upper_bound_predicate(&self, bound: i32) -> Predicate;

    /// Creates `[x == value]`.
    fn equality_predicate(&self, value: i32) -> Predicate;

    /// Creates `[x != value]`.
    fn disequality_predicate(&self, value: i32) -> Predicate;
}

impl PredicateConstructor for DomainId {
    fn lower_bound_predicate(&self, bound: i32) -> Predicate {
        Predicate::new(*self, PredicateType::LowerBound, bound)
    }

    fn upper_bound_predicate(&self, bound: i32) -> Predicate {
        Predicate::new(*self, PredicateType::UpperBound, bound)
    }

    fn equality_predicate(&self, value: i32) -> Predicate {
        Predicate::new(*self, PredicateType::Equal, value)
    }

    fn disequality_predicate(&self, value: i32) -> Predicate {
        Predicate::new(*self, PredicateType::NotEqual, value)
    }
}

/// Creates a [`Predicate`] from a comparison between a variable and a value.
///
/// # Example
/// ```rust
/// # use reconf_core::predicate;
/// # use reconf_core::State;
/// let mut state = State::default();
/// let x = state.new_interval_variable(0, 10, None);
///
/// let lower_bound_predicate = predicate!(x >= 5);
/// assert_eq!(lower_bound_predicate.get_domain(), x);
/// assert_eq!(lower_bound_predicate.get_right_hand_side(), 5);
///
/// let disequality_predicate = predicate!(x != 5);
/// assert!(disequality_predicate.is_not_equal_predicate());
/// ```
#[macro_export]
macro_rules! predicate {
    ($($var:ident).+$([$index:expr])? >= $bound:expr) => {{
        #[allow(unused, reason = "could be imported at call-site")]
        use $crate::predicates::PredicateConstructor;
        $($var).+$([$index])?.lower_bound_predicate($bound)
    }};
    ($($var:ident).+$([$index:expr])? <= $bound:expr) => {{
        #[allow(unused, reason = "could be imported at call-site")]
        use $crate::predicates::PredicateConstructor;
        $($var).+$([$index])?.upper_bound_predicate($bound)
    }};
    ($($var:ident).+$([$index:expr])? == $value:expr) => {{
        #[allow(unused, reason = "could be imported at call-site")]
        use $crate::predicates::PredicateConstructor;
        $($var).+$([$index])?.equality_predicate($value)
    }};
    ($($var:ident).+$([$index:expr])? != $value:expr) => {{
        #[allow(unused, reason = "could be imported at call-site")]
        use $crate::predicates::PredicateConstructor;
        $($var).+$([$index])?.disequality_predicate($value)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macro_matches_fields_and_indices() {
        struct Holder {
            hosts: Vec<DomainId>,
            start: DomainId,
        }
        let holder = Holder {
            hosts: vec![DomainId::new(1), DomainId::new(2)],
            start: DomainId::new(3),
        };

        assert_eq!(predicate![holder.hosts[1] == 4].get_domain(), DomainId::new(2));
        assert_eq!(predicate![holder.start <= 9].get_right_hand_side(), 9);
        assert_eq!(
            predicate![holder.start >= 2].get_predicate_type(),
            PredicateType::LowerBound
        );
    }
}
