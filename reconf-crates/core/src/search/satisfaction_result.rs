use super::Solution;

/// The result of [`satisfy`](super::satisfy).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatisfactionResult {
    Satisfiable(Solution),
    /// The search space was exhausted without finding a solution.
    Unsatisfiable,
    /// The [`TerminationCondition`](crate::termination::TerminationCondition) triggered before a
    /// solution was found.
    Unknown,
}

/// The result of [`count_solutions`](super::count_solutions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolutionCount {
    pub count: u64,
    /// Whether every solution has been counted, i.e. the search was not stopped early.
    pub is_complete: bool,
}
