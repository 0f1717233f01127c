use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::reconf_asserts::reconf_assert_simple;

/// A stack of entries partitioned by checkpoints. Restoring to a checkpoint hands back every entry
/// pushed after it, most recent first, so that the owner can undo them.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    current_checkpoint: usize,
    /// Entry `i` is the trail length at the moment checkpoint `i + 1` was created.
    trail_delimiter: Vec<usize>,
    trail: Vec<T>,
}

impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            current_checkpoint: 0,
            trail_delimiter: Vec::new(),
            trail: Vec::new(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn new_checkpoint(&mut self) {
        self.current_checkpoint += 1;
        self.trail_delimiter.push(self.trail.len());
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.current_checkpoint
    }

    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) -> Rev<Drain<'_, T>> {
        reconf_assert_simple!(new_checkpoint < self.current_checkpoint);

        let new_trail_len = self.trail_delimiter[new_checkpoint];

        self.current_checkpoint = new_checkpoint;
        self.trail_delimiter.truncate(new_checkpoint);
        self.trail.drain(new_trail_len..).rev()
    }

    pub(crate) fn push(&mut self, elem: T) {
        self.trail.push(elem)
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.trail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restoring_drops_entries_after_the_checkpoint() {
        let mut trail = Trail::default();
        trail.push(1);

        trail.new_checkpoint();
        trail.push(2);
        trail.new_checkpoint();
        trail.push(3);

        let _ = trail.synchronise(1);

        assert_eq!(&[1, 2], trail.deref());
        assert_eq!(trail.get_checkpoint(), 1);
    }

    #[test]
    fn undone_entries_come_back_most_recent_first() {
        let mut trail = Trail::default();

        trail.new_checkpoint();
        trail.push(1);
        trail.push(2);
        trail.new_checkpoint();
        trail.push(3);

        let undone = trail.synchronise(0).collect::<Vec<_>>();

        assert_eq!(vec![3, 2, 1], undone);
        assert!(trail.is_empty());
    }

    #[test]
    fn empty_checkpoints_are_skipped_over() {
        let mut trail = Trail::default();
        trail.push(7);
        trail.new_checkpoint();
        trail.new_checkpoint();
        trail.new_checkpoint();

        assert_eq!(trail.synchronise(0).count(), 0);
        assert_eq!(&[7], trail.deref());
    }
}
