//! A closed one-dimensional interval `[start, stop]`.
use serde::{Deserialize, Serialize};

/// A closed interval of coordinates in one dimension.
#[derive(
    Debug, Default, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize, PartialEq, Eq,
)]
pub struct Span {
    start: i64,
    stop: i64,
}

impl Span {
    /// Creates a new [`Span`] between two coordinates, given in any order.
    pub fn new(start: i64, stop: i64) -> Self {
        Self {
            start: std::cmp::min(start, stop),
            stop: std::cmp::max(start, stop),
        }
    }

    /// Creates a span of zero length at `x`.
    pub const fn from_point(x: i64) -> Self {
        Self { start: x, stop: x }
    }

    /// Creates a span of exactly `length` units around `center`.
    ///
    /// Odd lengths place the extra unit above the center.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Span::from_center_length(0, 40), Span::new(-20, 20));
    /// assert_eq!(Span::from_center_length(0, 5), Span::new(-2, 3));
    /// ```
    pub fn from_center_length(center: i64, length: i64) -> Self {
        let start = center - length / 2;
        Self::new(start, start + length)
    }

    /// The lower endpoint.
    #[inline]
    pub const fn start(&self) -> i64 {
        self.start
    }

    /// The upper endpoint.
    #[inline]
    pub const fn stop(&self) -> i64 {
        self.stop
    }

    /// `stop - start`.
    #[inline]
    pub const fn length(&self) -> i64 {
        self.stop - self.start
    }

    /// The midpoint, rounded toward negative infinity for odd lengths.
    #[inline]
    pub const fn center(&self) -> i64 {
        self.start + self.length() / 2
    }

    /// Returns `true` if the spans share at least one coordinate.
    ///
    /// Spans that only touch at an endpoint intersect.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert!(Span::new(0, 10).intersects(&Span::new(10, 20)));
    /// assert!(!Span::new(0, 10).intersects(&Span::new(11, 20)));
    /// ```
    #[inline]
    pub const fn intersects(&self, other: &Self) -> bool {
        !(other.stop < self.start || self.stop < other.start)
    }

    /// Returns `true` if `other` lies entirely within this span.
    #[inline]
    pub const fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.stop <= self.stop
    }

    /// The smallest span containing both `self` and `other`.
    pub fn union(self, other: Self) -> Self {
        Self {
            start: std::cmp::min(self.start, other.start),
            stop: std::cmp::max(self.stop, other.stop),
        }
    }

    /// The smallest span containing `self` and the coordinate `x`.
    pub fn add_point(self, x: i64) -> Self {
        self.union(Self::from_point(x))
    }

    /// Grows the span by `amount` on both ends.
    ///
    /// A negative amount shrinks it; shrinking past the midpoint is the
    /// caller's responsibility.
    pub const fn expand_all(self, amount: i64) -> Self {
        Self {
            start: self.start - amount,
            stop: self.stop + amount,
        }
    }

    /// Moves the span by `amount`.
    pub const fn translate(self, amount: i64) -> Self {
        Self {
            start: self.start + amount,
            stop: self.stop + amount,
        }
    }
}

impl From<(i64, i64)> for Span {
    #[inline]
    fn from(tup: (i64, i64)) -> Self {
        Self::new(tup.0, tup.1)
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} {}]", self.start, self.stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sorts_endpoints() {
        assert_eq!(Span::new(20, -4), Span::new(-4, 20));
        assert_eq!(Span::new(20, -4).length(), 24);
    }

    #[test]
    fn from_center_length_preserves_length() {
        for len in [0, 1, 7, 10, 39] {
            assert_eq!(Span::from_center_length(100, len).length(), len);
        }
    }

    #[test]
    fn containment() {
        let outer = Span::new(0, 100);
        assert!(outer.contains(&Span::new(0, 100)));
        assert!(outer.contains(&Span::new(10, 20)));
        assert!(!outer.contains(&Span::new(-1, 20)));
        assert!(!outer.contains(&Span::new(90, 101)));
    }
}
