use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::VecDeque;

use fnv::FnvHashSet;

use crate::propagation::Priority;
use crate::propagation::PropagatorId;
use crate::reconf_asserts::reconf_assert_moderate;

/// The propagators waiting to run, first-in first-out per [`Priority`].
#[derive(Debug)]
pub(crate) struct PropagatorQueue {
    queues: Vec<VecDeque<PropagatorId>>,
    present_propagators: FnvHashSet<PropagatorId>,
    present_priorities: BinaryHeap<Reverse<u8>>,
}

impl Default for PropagatorQueue {
    fn default() -> Self {
        PropagatorQueue::new(4)
    }
}

impl PropagatorQueue {
    pub(crate) fn new(num_priority_levels: u8) -> PropagatorQueue {
        PropagatorQueue {
            queues: vec![VecDeque::new(); num_priority_levels as usize],
            present_propagators: FnvHashSet::default(),
            present_priorities: BinaryHeap::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.present_propagators.is_empty()
    }

    pub(crate) fn is_propagator_present(&self, propagator_id: PropagatorId) -> bool {
        self.present_propagators.contains(&propagator_id)
    }

    /// Enqueue the propagator unless it is already enqueued.
    pub(crate) fn enqueue_propagator(&mut self, propagator_id: PropagatorId, priority: Priority) {
        let priority = priority as u8;
        reconf_assert_moderate!((priority as usize) < self.queues.len());

        if self.is_propagator_present(propagator_id) {
            return;
        }

        if self.queues[priority as usize].is_empty() {
            self.present_priorities.push(Reverse(priority));
        }
        self.queues[priority as usize].push_back(propagator_id);
        let _ = self.present_propagators.insert(propagator_id);
    }

    pub(crate) fn pop(&mut self) -> Option<PropagatorId> {
        let Reverse(top_priority) = *self.present_priorities.peek()?;
        let top_priority = top_priority as usize;

        let next_propagator_id = self.queues[top_priority].pop_front()?;
        let _ = self.present_propagators.remove(&next_propagator_id);

        if self.queues[top_priority].is_empty() {
            let _ = self.present_priorities.pop();
        }

        Some(next_propagator_id)
    }

    pub(crate) fn clear(&mut self) {
        while let Some(Reverse(priority)) = self.present_priorities.pop() {
            self.queues[priority as usize].clear();
        }
        self.present_propagators.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_priorities_are_popped_first() {
        let mut queue = PropagatorQueue::default();
        queue.enqueue_propagator(PropagatorId(0), Priority::Low);
        queue.enqueue_propagator(PropagatorId(1), Priority::High);
        queue.enqueue_propagator(PropagatorId(2), Priority::Low);
        queue.enqueue_propagator(PropagatorId(3), Priority::Medium);

        let popped: Vec<_> = std::iter::from_fn(|| queue.pop()).collect();
        assert_eq!(
            popped,
            vec![
                PropagatorId(1),
                PropagatorId(3),
                PropagatorId(0),
                PropagatorId(2)
            ]
        );
    }

    #[test]
    fn a_propagator_is_enqueued_at_most_once() {
        let mut queue = PropagatorQueue::default();
        queue.enqueue_propagator(PropagatorId(5), Priority::VeryLow);
        queue.enqueue_propagator(PropagatorId(5), Priority::VeryLow);

        assert_eq!(queue.pop(), Some(PropagatorId(5)));
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn cleared_queue_accepts_new_propagators() {
        let mut queue = PropagatorQueue::default();
        queue.enqueue_propagator(PropagatorId(1), Priority::High);
        queue.clear();
        assert!(queue.is_empty());

        queue.enqueue_propagator(PropagatorId(1), Priority::High);
        assert_eq!(queue.pop(), Some(PropagatorId(1)));
    }
}
