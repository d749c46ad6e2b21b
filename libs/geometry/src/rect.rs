//! Axis-aligned rectangles.

use serde::{Deserialize, Serialize};

use crate::corner::Corner;
use crate::dims::Dims;
use crate::dir::Dir;
use crate::point::Point;
use crate::span::Span;

/// An axis-aligned rectangle, stored as its horizontal and vertical spans.
#[derive(Debug, Default, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    hspan: Span,
    vspan: Span,
}

impl Rect {
    /// Creates a rectangle from all 4 sides (left, bottom, right, top).
    ///
    /// # Panics
    ///
    /// Panics if `left > right` or if `bot > top`.
    #[inline]
    pub fn from_sides(left: i64, bot: i64, right: i64, top: i64) -> Self {
        assert!(
            left <= right,
            "Rect::from_sides requires that left ({}) <= right ({})",
            left,
            right
        );
        assert!(
            bot <= top,
            "Rect::from_sides requires that bot ({}) <= top ({})",
            bot,
            top
        );
        Self::from_spans(Span::new(left, right), Span::new(bot, top))
    }

    /// Creates a rectangle from its horizontal and vertical spans.
    #[inline]
    pub const fn from_spans(hspan: Span, vspan: Span) -> Self {
        Self { hspan, vspan }
    }

    /// Creates a rectangle of exactly `dims` centered on `center`.
    ///
    /// See [`Span::from_center_length`] for the rounding of odd dimensions.
    pub fn from_center_dims(center: Point, dims: Dims) -> Self {
        Self::from_spans(
            Span::from_center_length(center.x, dims.w()),
            Span::from_center_length(center.y, dims.h()),
        )
    }

    /// A zero-area rectangle at `p`.
    pub fn from_point(p: Point) -> Self {
        Self::from_spans(Span::from_point(p.x), Span::from_point(p.y))
    }

    /// The left edge.
    #[inline]
    pub const fn left(&self) -> i64 {
        self.hspan.start()
    }

    /// The bottom edge.
    #[inline]
    pub const fn bot(&self) -> i64 {
        self.vspan.start()
    }

    /// The right edge.
    #[inline]
    pub const fn right(&self) -> i64 {
        self.hspan.stop()
    }

    /// The top edge.
    #[inline]
    pub const fn top(&self) -> i64 {
        self.vspan.stop()
    }

    /// The horizontal span.
    #[inline]
    pub const fn hspan(&self) -> Span {
        self.hspan
    }

    /// The vertical span.
    #[inline]
    pub const fn vspan(&self) -> Span {
        self.vspan
    }

    /// The span covered along `dir`.
    #[inline]
    pub const fn span(&self, dir: Dir) -> Span {
        match dir {
            Dir::Horiz => self.hspan,
            Dir::Vert => self.vspan,
        }
    }

    /// The width.
    #[inline]
    pub const fn width(&self) -> i64 {
        self.hspan.length()
    }

    /// The height.
    #[inline]
    pub const fn height(&self) -> i64 {
        self.vspan.length()
    }

    /// The width and height.
    #[inline]
    pub const fn dims(&self) -> Dims {
        Dims::new(self.width(), self.height())
    }

    /// The area.
    #[inline]
    pub const fn area(&self) -> i64 {
        self.width() * self.height()
    }

    /// The center point, rounded down.
    #[inline]
    pub const fn center(&self) -> Point {
        Point::new(self.hspan.center(), self.vspan.center())
    }

    /// The given corner point.
    pub const fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::LowerLeft => Point::new(self.left(), self.bot()),
            Corner::LowerRight => Point::new(self.right(), self.bot()),
            Corner::UpperLeft => Point::new(self.left(), self.top()),
            Corner::UpperRight => Point::new(self.right(), self.top()),
        }
    }

    /// Grows the rectangle by `dx` on the left and right and by `dy` on the bottom and top.
    ///
    /// Negative amounts shrink it.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_sides(0, 0, 100, 50);
    /// assert_eq!(rect.expand(10, -5), Rect::from_sides(-10, 5, 110, 45));
    /// ```
    pub const fn expand(self, dx: i64, dy: i64) -> Self {
        Self {
            hspan: self.hspan.expand_all(dx),
            vspan: self.vspan.expand_all(dy),
        }
    }

    /// Moves the rectangle by `(dx, dy)`.
    pub const fn translate(self, dx: i64, dy: i64) -> Self {
        Self {
            hspan: self.hspan.translate(dx),
            vspan: self.vspan.translate(dy),
        }
    }

    /// The bounding box of `self` and `other`.
    pub fn union(self, other: Self) -> Self {
        Self {
            hspan: self.hspan.union(other.hspan),
            vspan: self.vspan.union(other.vspan),
        }
    }

    /// The bounding box of `self` and `p`.
    pub fn add_point(self, p: Point) -> Self {
        Self {
            hspan: self.hspan.add_point(p.x),
            vspan: self.vspan.add_point(p.y),
        }
    }

    /// Returns `true` if the rectangles share any point, edges included.
    pub const fn intersects(&self, other: &Self) -> bool {
        self.hspan.intersects(&other.hspan) && self.vspan.intersects(&other.vspan)
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<{} {} {} {}>",
            self.left(),
            self.bot(),
            self.right(),
            self.top()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_dims_round_trip() {
        let rect = Rect::from_center_dims(Point::new(10, 20), Dims::new(29, 39));
        assert_eq!(rect.dims(), Dims::new(29, 39));
        assert_eq!(rect.left(), -4);
        assert_eq!(rect.bot(), 1);
    }

    #[test]
    fn touching_rects_intersect() {
        let a = Rect::from_sides(0, 0, 10, 10);
        let b = Rect::from_sides(10, 0, 20, 10);
        let c = Rect::from_sides(11, 0, 20, 10);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn bounding_union_of_points() {
        let r = Rect::from_point(Point::new(5, 5))
            .add_point(Point::new(-5, 20))
            .add_point(Point::new(3, -1));
        assert_eq!(r, Rect::from_sides(-5, -1, 5, 20));
        assert_eq!(r.corner(Corner::UpperLeft), Point::new(-5, 20));
    }
}
