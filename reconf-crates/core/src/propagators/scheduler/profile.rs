/// A piece of a [`MandatoryProfile`]: the level holds from `start` up to the start of the next
/// segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Segment {
    start: i32,
    level: i64,
}

/// The usage of a resource dimension which is certain given the current bounds: known c-slices
/// are charged on `[0, lb(end))`, known d-slices on `[ub(start), ∞)`.
///
/// The first segment starts at time 0 and the last segment extends indefinitely.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MandatoryProfile {
    segments: Vec<Segment>,
}

impl MandatoryProfile {
    /// Builds the profile from the level at time 0 and `(time, change)` pairs. Changes at the
    /// same time are merged.
    pub(crate) fn from_changes(base_level: i64, mut changes: Vec<(i32, i64)>) -> MandatoryProfile {
        changes.sort_unstable_by_key(|&(time, _)| time);

        let mut segments = Vec::with_capacity(changes.len() + 1);
        let mut current = Segment {
            start: 0,
            level: base_level,
        };

        for (time, change) in changes {
            let time = time.max(0);
            if time != current.start {
                segments.push(current);
                current = Segment {
                    start: time,
                    level: current.level,
                };
            }
            current.level += change;
        }
        segments.push(current);

        MandatoryProfile { segments }
    }

    fn segment_end(&self, index: usize) -> i32 {
        self.segments
            .get(index + 1)
            .map_or(i32::MAX, |segment| segment.start)
    }

    /// The segments intersecting `[from, to)` with their end.
    fn segments_in(&self, from: i32, to: i32) -> impl Iterator<Item = (i32, i32, i64)> + '_ {
        let is_empty = from >= to;
        self.segments
            .iter()
            .enumerate()
            .map(|(index, segment)| (segment.start, self.segment_end(index), segment.level))
            .skip_while(move |&(_, end, _)| end <= from)
            .take_while(move |&(start, _, _)| !is_empty && start < to)
    }

    /// The first time in `[from, to)` at which the level exceeds `limit`.
    pub(crate) fn first_time_exceeding(&self, from: i32, to: i32, limit: i64) -> Option<i32> {
        self.segments_in(from, to)
            .find(|&(_, _, level)| level > limit)
            .map(|(start, _, _)| start.max(from))
    }

    /// The end, capped at `to`, of the last segment intersecting `[from, to)` whose level
    /// exceeds `limit`.
    pub(crate) fn last_end_exceeding(&self, from: i32, to: i32, limit: i64) -> Option<i32> {
        self.segments_in(from, to)
            .filter(|&(_, _, level)| level > limit)
            .last()
            .map(|(_, end, _)| end.min(to))
    }

    /// The highest level over `[from, to)`, or `i64::MIN` for an empty interval.
    pub(crate) fn max_level_in(&self, from: i32, to: i32) -> i64 {
        self.segments_in(from, to)
            .map(|(_, _, level)| level)
            .max()
            .unwrap_or(i64::MIN)
    }

    /// The `(start, level)` pairs of the segments in increasing time.
    pub(crate) fn levels(&self) -> Vec<(i32, i64)> {
        self.segments
            .iter()
            .map(|segment| (segment.start, segment.level))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> MandatoryProfile {
        // Two consuming slices of 2 and 1 ending at 3 and 5, a demanding slice of 4 from 4.
        MandatoryProfile::from_changes(3, vec![(5, -1), (3, -2), (4, 4)])
    }

    #[test]
    fn changes_are_swept_in_time_order() {
        assert_eq!(example().levels(), vec![(0, 3), (3, 1), (4, 5), (5, 4)]);
    }

    #[test]
    fn changes_at_the_same_time_are_merged() {
        let profile = MandatoryProfile::from_changes(2, vec![(4, -2), (4, 2), (0, 1)]);
        assert_eq!(profile.levels(), vec![(0, 3), (4, 3)]);
    }

    #[test]
    fn first_time_exceeding_is_clipped_to_the_interval() {
        let profile = example();
        assert_eq!(profile.first_time_exceeding(1, 10, 2), Some(1));
        assert_eq!(profile.first_time_exceeding(3, 10, 4), Some(4));
        assert_eq!(profile.first_time_exceeding(3, 4, 4), None);
        assert_eq!(profile.first_time_exceeding(0, 10, 5), None);
    }

    #[test]
    fn last_end_exceeding_is_capped_at_the_interval_end() {
        let profile = example();
        assert_eq!(profile.last_end_exceeding(0, 10, 2), Some(10));
        assert_eq!(profile.last_end_exceeding(0, 4, 2), Some(3));
        assert_eq!(profile.last_end_exceeding(3, 4, 2), None);
    }

    #[test]
    fn max_level_over_intervals() {
        let profile = example();
        assert_eq!(profile.max_level_in(0, 4), 3);
        assert_eq!(profile.max_level_in(4, i32::MAX), 5);
        assert_eq!(profile.max_level_in(5, i32::MAX), 4);
        assert_eq!(profile.max_level_in(2, 2), i64::MIN);
    }
}
