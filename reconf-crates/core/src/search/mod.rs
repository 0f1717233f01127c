//! Depth-first search over a [`State`] with binary branching.
//!
//! At every node the [`Brancher`] chooses a decision `d`; the search first explores `d` and,
//! once that subtree has been exhausted, `!d`. Decisions are kept on an explicit stack, each one
//! associated with the checkpoint created just before it was applied.
//!
//! Every function in this module restores the state to the checkpoint at which it was called
//! before returning. Only what propagation at that checkpoint derives is kept; a search started
//! from a fixed point leaves every domain and trailed value as it found it, so the same state
//! can be searched again.
mod depth_first_search;
mod satisfaction_result;
mod solution;

use std::ops::ControlFlow;

use depth_first_search::DepthFirstSearch;
use depth_first_search::SearchStep;
pub use satisfaction_result::SatisfactionResult;
pub use satisfaction_result::SolutionCount;
pub use solution::Solution;

use crate::branching::Brancher;
use crate::termination::TerminationCondition;
use crate::State;

/// Finds a single solution.
pub fn satisfy(
    state: &mut State,
    brancher: &mut impl Brancher,
    termination: &mut impl TerminationCondition,
) -> SatisfactionResult {
    let mut search = DepthFirstSearch::new(state, brancher, termination);
    let result = match search.next_solution() {
        SearchStep::Found(solution) => SatisfactionResult::Satisfiable(solution),
        SearchStep::Exhausted => SatisfactionResult::Unsatisfiable,
        SearchStep::Stopped => SatisfactionResult::Unknown,
    };
    search.finish();
    result
}

/// Calls `on_solution` for every solution, until it breaks, the search space is exhausted or
/// the termination condition triggers. Returns whether the search space was exhausted.
pub fn for_each_solution(
    state: &mut State,
    brancher: &mut impl Brancher,
    termination: &mut impl TerminationCondition,
    mut on_solution: impl FnMut(&Solution) -> ControlFlow<()>,
) -> bool {
    let mut search = DepthFirstSearch::new(state, brancher, termination);
    let exhausted = loop {
        match search.next_solution() {
            SearchStep::Found(solution) => {
                if on_solution(&solution).is_break() {
                    break false;
                }
            }
            SearchStep::Exhausted => break true,
            SearchStep::Stopped => break false,
        }
    };
    search.finish();
    exhausted
}

pub fn count_solutions(
    state: &mut State,
    brancher: &mut impl Brancher,
    termination: &mut impl TerminationCondition,
) -> SolutionCount {
    let mut count = 0;
    let is_complete = for_each_solution(state, brancher, termination, |_| {
        count += 1;
        ControlFlow::Continue(())
    });
    SolutionCount { count, is_complete }
}
