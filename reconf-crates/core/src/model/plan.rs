use std::fmt::Display;
use std::fmt::Formatter;

use super::VmId;

/// One action of a [`ReconfigurationPlan`], running from `start` to `end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// The VM is moved between two nodes; it occupies both while the action runs.
    Migrate {
        vm: VmId,
        from: usize,
        to: usize,
        start: i32,
        end: i32,
    },
    /// The VM starts running on `node`.
    Boot {
        vm: VmId,
        node: usize,
        start: i32,
        end: i32,
    },
    /// The VM stops running on `node`.
    Shutdown {
        vm: VmId,
        node: usize,
        start: i32,
        end: i32,
    },
}

impl Action {
    pub fn vm(&self) -> VmId {
        match *self {
            Action::Migrate { vm, .. } | Action::Boot { vm, .. } | Action::Shutdown { vm, .. } => {
                vm
            }
        }
    }

    pub fn start(&self) -> i32 {
        match *self {
            Action::Migrate { start, .. }
            | Action::Boot { start, .. }
            | Action::Shutdown { start, .. } => start,
        }
    }

    pub fn end(&self) -> i32 {
        match *self {
            Action::Migrate { end, .. } | Action::Boot { end, .. } | Action::Shutdown { end, .. } => {
                end
            }
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Action::Migrate {
                vm,
                from,
                to,
                start,
                end,
            } => write!(f, "{start}:{end} migrate {vm} from node {from} to node {to}"),
            Action::Boot {
                vm,
                node,
                start,
                end,
            } => write!(f, "{start}:{end} boot {vm} on node {node}"),
            Action::Shutdown {
                vm,
                node,
                start,
                end,
            } => write!(f, "{start}:{end} shutdown {vm} on node {node}"),
        }
    }
}

/// The actions bringing every VM to its target state, ordered by start time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconfigurationPlan {
    pub actions: Vec<Action>,
    /// The end of the last action, or 0 for an empty plan.
    pub makespan: i32,
}

impl ReconfigurationPlan {
    pub(crate) fn new(mut actions: Vec<Action>) -> ReconfigurationPlan {
        actions.sort_by_key(|action| (action.start(), action.vm()));
        let makespan = actions.iter().map(Action::end).max().unwrap_or(0);
        ReconfigurationPlan { actions, makespan }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_are_ordered_by_start() {
        let plan = ReconfigurationPlan::new(vec![
            Action::Boot {
                vm: VmId(1),
                node: 0,
                start: 3,
                end: 5,
            },
            Action::Shutdown {
                vm: VmId(0),
                node: 0,
                start: 0,
                end: 3,
            },
        ]);

        assert_eq!(plan.actions[0].vm(), VmId(0));
        assert_eq!(plan.makespan, 5);
        assert_eq!(
            plan.actions[1].to_string(),
            "3:5 boot vm#1 on node 0"
        );
    }

    #[test]
    fn empty_plans_take_no_time() {
        let plan = ReconfigurationPlan::new(vec![]);
        assert!(plan.is_empty());
        assert_eq!(plan.makespan, 0);
    }
}
