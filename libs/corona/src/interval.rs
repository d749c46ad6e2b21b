//! Sets of merged one-dimensional intervals.

use geometry::span::Span;

/// A sorted set of pairwise disjoint [`Span`]s.
///
/// Spans that overlap or touch are merged on insertion, so no two stored
/// spans share a coordinate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalSet {
    chunks: Vec<Span>,
}

impl IntervalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `[min, max]`, absorbing every stored span it overlaps or touches.
    ///
    /// ```
    /// # use corona::interval::IntervalSet;
    /// # use geometry::span::Span;
    /// let mut set = IntervalSet::new();
    /// set.merge(0, 10);
    /// set.merge(20, 25);
    /// set.merge(10, 20);
    /// assert_eq!(set.chunks(), &[Span::new(0, 25)]);
    /// ```
    pub fn merge(&mut self, min: i64, max: i64) {
        let mut merged = Span::new(min, max);
        // First stored span that reaches the new one.
        let first = self.chunks.partition_point(|c| c.stop() < merged.start());
        let mut last = first;
        while last < self.chunks.len() && self.chunks[last].start() <= merged.stop() {
            merged = merged.union(self.chunks[last]);
            last += 1;
        }
        self.chunks.splice(first..last, std::iter::once(merged));
    }

    /// The merged spans, in increasing order.
    #[inline]
    pub fn chunks(&self) -> &[Span] {
        &self.chunks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Span> {
        self.chunks.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl Extend<Span> for IntervalSet {
    fn extend<T: IntoIterator<Item = Span>>(&mut self, iter: T) {
        for span in iter {
            self.merge(span.start(), span.stop());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn assert_disjoint(set: &IntervalSet) {
        for pair in set.chunks().windows(2) {
            assert!(
                pair[0].stop() < pair[1].start(),
                "{} and {} overlap or touch",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn merges_overlapping_and_keeps_disjoint() {
        let mut set = IntervalSet::new();
        set.merge(0, 10);
        set.merge(5, 15);
        set.merge(20, 25);
        assert_eq!(set.chunks(), &[Span::new(0, 15), Span::new(20, 25)]);
    }

    #[test]
    fn inserts_before_existing() {
        let mut set = IntervalSet::new();
        set.merge(20, 25);
        set.merge(0, 5);
        set.merge(-10, -8);
        assert_eq!(
            set.chunks(),
            &[Span::new(-10, -8), Span::new(0, 5), Span::new(20, 25)]
        );
    }

    #[test]
    fn touching_intervals_merge() {
        let mut set = IntervalSet::new();
        set.merge(0, 10);
        set.merge(10, 20);
        assert_eq!(set.chunks(), &[Span::new(0, 20)]);
    }

    #[test]
    fn absorbs_several_intervals() {
        let mut set = IntervalSet::new();
        for (a, b) in [(0, 1), (3, 4), (6, 7), (9, 10), (20, 21)] {
            set.merge(a, b);
        }
        set.merge(2, 9);
        assert_eq!(set.chunks(), &[Span::new(0, 1), Span::new(2, 10), Span::new(20, 21)]);
    }

    #[test]
    fn merge_is_idempotent() {
        let mut once = IntervalSet::new();
        once.merge(0, 10);
        once.merge(30, 40);
        let mut twice = once.clone();
        twice.merge(30, 40);
        twice.merge(0, 10);
        assert_eq!(once, twice);
    }

    #[test]
    fn stays_disjoint_under_many_merges() {
        let mut set = IntervalSet::new();
        // Deterministic pseudo-random sequence.
        let mut state: i64 = 17;
        for _ in 0..500 {
            state = (state * 1103515245 + 12345) % 2147483648;
            let start = state % 1000;
            let len = (state / 1000) % 25;
            set.merge(start, start + len);
            assert_disjoint(&set);
        }
        assert!(!set.is_empty());
    }

    #[test]
    fn reversed_bounds_are_normalized() {
        let mut set = IntervalSet::new();
        set.merge(10, 0);
        assert_eq!(set.chunks(), &[Span::new(0, 10)]);
    }
}
