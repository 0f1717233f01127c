use super::TrailedInteger;
use super::TrailedValues;

const WORD_BITS: usize = 64;

/// A fixed-capacity set of indices in `[0, len)` stored in trailed 64-bit words.
///
/// The set itself only holds the handles of its words; all reads and writes go through the
/// [`TrailedValues`] that allocated it.
#[derive(Debug, Clone)]
pub(crate) struct TrailedBitSet {
    words: Box<[TrailedInteger]>,
    len: usize,
}

impl TrailedBitSet {
    /// Allocate a set over `[0, len)` which initially contains every index if `full` is true and
    /// nothing otherwise.
    pub(crate) fn new(trailed_values: &mut TrailedValues, len: usize, full: bool) -> Self {
        let num_words = len.div_ceil(WORD_BITS);
        let words = (0..num_words)
            .map(|word| {
                let initial = if !full {
                    0
                } else if (word + 1) * WORD_BITS <= len {
                    u64::MAX
                } else {
                    (1_u64 << (len - word * WORD_BITS)) - 1
                };
                trailed_values.grow(initial as i64)
            })
            .collect();

        TrailedBitSet { words, len }
    }

    fn word(&self, trailed_values: &TrailedValues, word: usize) -> u64 {
        trailed_values.read(self.words[word]) as u64
    }

    pub(crate) fn contains(&self, trailed_values: &TrailedValues, index: usize) -> bool {
        index < self.len
            && self.word(trailed_values, index / WORD_BITS) & (1_u64 << (index % WORD_BITS)) != 0
    }

    /// Returns whether the index was newly added.
    pub(crate) fn insert(&self, trailed_values: &mut TrailedValues, index: usize) -> bool {
        let word = self.word(trailed_values, index / WORD_BITS);
        let mask = 1_u64 << (index % WORD_BITS);
        if word & mask != 0 {
            return false;
        }
        trailed_values.assign(self.words[index / WORD_BITS], (word | mask) as i64);
        true
    }

    /// Returns whether the index was present.
    pub(crate) fn remove(&self, trailed_values: &mut TrailedValues, index: usize) -> bool {
        let word = self.word(trailed_values, index / WORD_BITS);
        let mask = 1_u64 << (index % WORD_BITS);
        if word & mask == 0 {
            return false;
        }
        trailed_values.assign(self.words[index / WORD_BITS], (word & !mask) as i64);
        true
    }

    /// Iterate over the present indices in increasing order.
    pub(crate) fn iter<'a>(
        &'a self,
        trailed_values: &'a TrailedValues,
    ) -> impl Iterator<Item = usize> + 'a {
        (0..self.words.len()).flat_map(move |word_index| {
            let mut word = self.word(trailed_values, word_index);
            std::iter::from_fn(move || {
                if word == 0 {
                    return None;
                }
                let bit = word.trailing_zeros() as usize;
                word &= word - 1;
                Some(word_index * WORD_BITS + bit)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_set_covers_exactly_the_universe() {
        let mut values = TrailedValues::default();
        let set = TrailedBitSet::new(&mut values, 70, true);

        assert_eq!(set.iter(&values).count(), 70);
        assert!(set.contains(&values, 69));
        assert!(!set.contains(&values, 70));
        assert_eq!(set.iter(&values).last(), Some(69));
    }

    #[test]
    fn insert_and_remove_report_changes() {
        let mut values = TrailedValues::default();
        let set = TrailedBitSet::new(&mut values, 10, false);

        assert!(set.insert(&mut values, 3));
        assert!(!set.insert(&mut values, 3));
        assert!(set.remove(&mut values, 3));
        assert!(!set.remove(&mut values, 3));
        assert_eq!(set.iter(&values).next(), None);
    }

    #[test]
    fn restoring_brings_back_removed_bits() {
        let mut values = TrailedValues::default();
        let set = TrailedBitSet::new(&mut values, 130, true);

        values.new_checkpoint();
        let _ = set.remove(&mut values, 0);
        let _ = set.remove(&mut values, 64);
        let _ = set.remove(&mut values, 129);
        assert_eq!(set.iter(&values).count(), 127);

        values.synchronise(0);

        assert_eq!(set.iter(&values).count(), 130);
        assert_eq!(
            set.iter(&values).collect::<Vec<_>>(),
            (0..130).collect::<Vec<_>>()
        );
    }
}
