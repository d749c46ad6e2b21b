//! Rectangle dimensions.

use serde::{Deserialize, Serialize};

use crate::dir::Dir;

/// A width and a height.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, Hash, PartialEq, Eq)]
pub struct Dims {
    w: i64,
    h: i64,
}

impl Dims {
    /// Creates dimensions with the given width and height.
    #[inline]
    pub const fn new(w: i64, h: i64) -> Self {
        Self { w, h }
    }

    /// Creates square dimensions.
    #[inline]
    pub const fn square(side: i64) -> Self {
        Self { w: side, h: side }
    }

    /// The width.
    #[inline]
    pub const fn w(&self) -> i64 {
        self.w
    }

    /// The height.
    #[inline]
    pub const fn h(&self) -> i64 {
        self.h
    }

    /// The extent along `dir`: the width for [`Dir::Horiz`], the height for [`Dir::Vert`].
    #[inline]
    pub const fn along(&self, dir: Dir) -> i64 {
        match dir {
            Dir::Horiz => self.w,
            Dir::Vert => self.h,
        }
    }

    /// Returns `w * h`.
    #[inline]
    pub const fn area(&self) -> i64 {
        self.w * self.h
    }

    /// Sets the width.
    #[inline]
    pub fn set_w(&mut self, w: i64) {
        self.w = w;
    }

    /// Sets the height.
    #[inline]
    pub fn set_h(&mut self, h: i64) {
        self.h = h;
    }

    /// Component-wise maximum of `self` and `other`.
    pub fn max(self, other: Self) -> Self {
        Self {
            w: std::cmp::max(self.w, other.w),
            h: std::cmp::max(self.h, other.h),
        }
    }
}
