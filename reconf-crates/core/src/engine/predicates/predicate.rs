use std::fmt::Display;
use std::ops::Not;

use crate::engine::variables::DomainId;

/// The kind of atomic constraint a [`Predicate`] states about a domain.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum PredicateType {
    LowerBound,
    UpperBound,
    NotEqual,
    Equal,
}

/// An atomic constraint `[x op v]` over a single domain, where `op` is one of `>=`, `<=`, `==`
/// or `!=`. Predicates are how propagators and the search request domain changes.
///
/// Use the [`predicate!`](crate::predicate) macro to create them.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Predicate {
    domain: DomainId,
    predicate_type: PredicateType,
    value: i32,
}

impl Predicate {
    pub fn new(domain: DomainId, predicate_type: PredicateType, value: i32) -> Self {
        Predicate {
            domain,
            predicate_type,
            value,
        }
    }

    pub fn get_domain(&self) -> DomainId {
        self.domain
    }

    pub fn get_right_hand_side(&self) -> i32 {
        self.value
    }

    pub fn get_predicate_type(&self) -> PredicateType {
        self.predicate_type
    }

    pub fn is_equality_predicate(&self) -> bool {
        self.predicate_type == PredicateType::Equal
    }

    pub fn is_not_equal_predicate(&self) -> bool {
        self.predicate_type == PredicateType::NotEqual
    }
}

impl Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Self::Output {
        let (predicate_type, value) = match self.predicate_type {
            PredicateType::LowerBound => (PredicateType::UpperBound, self.value - 1),
            PredicateType::UpperBound => (PredicateType::LowerBound, self.value + 1),
            PredicateType::NotEqual => (PredicateType::Equal, self.value),
            PredicateType::Equal => (PredicateType::NotEqual, self.value),
        };

        Predicate {
            domain: self.domain,
            predicate_type,
            value,
        }
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self.predicate_type {
            PredicateType::LowerBound => ">=",
            PredicateType::UpperBound => "<=",
            PredicateType::NotEqual => "!=",
            PredicateType::Equal => "==",
        };
        write!(f, "[{} {operator} {}]", self.domain, self.value)
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::variables::DomainId;
    use crate::predicate;

    #[test]
    fn negating_a_bound_flips_it_with_an_offset() {
        let x = DomainId::new(0);

        assert_eq!(!predicate![x >= 3], predicate![x <= 2]);
        assert_eq!(!predicate![x <= 3], predicate![x >= 4]);
        assert_eq!(!predicate![x == 3], predicate![x != 3]);
        assert_eq!(!!predicate![x != 3], predicate![x != 3]);
    }

    #[test]
    fn display_shows_the_atomic_constraint() {
        let x = DomainId::new(4);

        assert_eq!(predicate![x >= 2].to_string(), "[x4 >= 2]");
        assert_eq!(predicate![x != 7].to_string(), "[x4 != 7]");
    }
}
