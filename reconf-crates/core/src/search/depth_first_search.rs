use log::debug;
use log::trace;

use super::Solution;
use crate::branching::Brancher;
use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;
use crate::reconf_asserts::reconf_assert_eq_simple;
use crate::termination::TerminationCondition;
use crate::State;

pub(crate) enum SearchStep {
    Found(Solution),
    Exhausted,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// The root has not been propagated yet.
    Fresh,
    /// The last call returned the solution at the current node.
    AtSolution,
    /// The search space is exhausted or the search was stopped.
    Done,
}

/// Depth-first search with an explicit stack of decisions.
///
/// The root is propagated at the checkpoint the search starts from, after which the search
/// creates its own checkpoint `base = root + 1`. The decision at index `i` of the stack was
/// applied right after checkpoint `base + i + 1` was created, and the refutations of the first
/// decision live at `base`, so restoring to `root` undoes all of them.
pub(crate) struct DepthFirstSearch<'a, B, T> {
    state: &'a mut State,
    brancher: &'a mut B,
    termination: &'a mut T,
    root: usize,
    base: usize,
    decisions: Vec<Predicate>,
    phase: Phase,
    num_solutions: u64,
}

impl<'a, B: Brancher, T: TerminationCondition> DepthFirstSearch<'a, B, T> {
    pub(crate) fn new(state: &'a mut State, brancher: &'a mut B, termination: &'a mut T) -> Self {
        let root = state.get_checkpoint();
        DepthFirstSearch {
            state,
            brancher,
            termination,
            root,
            base: root + 1,
            decisions: Vec::new(),
            phase: Phase::Fresh,
            num_solutions: 0,
        }
    }

    /// Resume the search until the next solution.
    pub(crate) fn next_solution(&mut self) -> SearchStep {
        match self.phase {
            Phase::Done => return SearchStep::Exhausted,
            Phase::Fresh => {
                if let Err(conflict) = self.state.propagate_to_fixed_point() {
                    debug!("propagation at the root failed: {conflict:?}");
                    return self.exhausted();
                }
                self.state.new_checkpoint();
                reconf_assert_eq_simple!(self.state.get_checkpoint(), self.base);
            }
            Phase::AtSolution => {
                if !self.backtrack() {
                    return self.exhausted();
                }
            }
        }

        loop {
            if self.termination.should_stop() {
                debug!(
                    "search stopped after {} decisions and {} solutions",
                    self.decisions.len(),
                    self.num_solutions
                );
                self.phase = Phase::Done;
                return SearchStep::Stopped;
            }

            let decision = self
                .brancher
                .next_decision(&SelectionContext::new(&self.state.assignments));
            let Some(decision) = decision else {
                let solution = Solution::from_state(self.state);
                self.num_solutions += 1;
                debug!("found solution {}", self.num_solutions);
                self.brancher.on_solution(&solution);
                self.phase = Phase::AtSolution;
                return SearchStep::Found(solution);
            };

            self.termination.decision_has_been_made();
            trace!("decision {decision} at depth {}", self.decisions.len());

            self.state.new_checkpoint();
            self.decisions.push(decision);
            if !self.apply(decision) && !self.backtrack() {
                return self.exhausted();
            }
        }
    }

    /// Restore the state to the checkpoint at which the search started, keeping only what the
    /// root propagation derived.
    pub(crate) fn finish(self) {
        self.state.restore_to(self.root);
    }

    fn exhausted(&mut self) -> SearchStep {
        debug!(
            "search space exhausted after {} solutions",
            self.num_solutions
        );
        self.phase = Phase::Done;
        SearchStep::Exhausted
    }

    /// Post the predicate and propagate; returns whether no conflict occurred.
    fn apply(&mut self, predicate: Predicate) -> bool {
        self.state.post(predicate).is_ok() && self.state.propagate_to_fixed_point().is_ok()
    }

    /// Undo the most recent decision which still has an unexplored negation and apply that
    /// negation. Returns `false` when no such decision is left.
    fn backtrack(&mut self) -> bool {
        while let Some(decision) = self.decisions.pop() {
            self.state.restore_to(self.base + self.decisions.len());
            trace!("refuting {decision} at depth {}", self.decisions.len());
            if self.apply(!decision) {
                return true;
            }
        }
        self.state.restore_to(self.base);
        false
    }
}
