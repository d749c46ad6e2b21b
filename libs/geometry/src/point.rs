//! 2-D points.

use serde::{Deserialize, Serialize};

use crate::dir::Dir;

/// A point on the integer grid.
#[derive(
    Debug, Copy, Clone, Default, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct Point {
    /// The x-coordinate.
    pub x: i64,
    /// The y-coordinate.
    pub y: i64,
}

impl Point {
    /// Creates a new [`Point`].
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Creates a point from a coordinate along `dir` and a coordinate across it.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Point::from_dir_coords(Dir::Vert, 10, 3), Point::new(3, 10));
    /// ```
    pub const fn from_dir_coords(dir: Dir, along: i64, across: i64) -> Self {
        match dir {
            Dir::Horiz => Self::new(along, across),
            Dir::Vert => Self::new(across, along),
        }
    }

    /// Gets the coordinate associated with direction `dir`.
    pub const fn coord(&self, dir: Dir) -> i64 {
        match dir {
            Dir::Horiz => self.x,
            Dir::Vert => self.y,
        }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {})", self.x, self.y)
    }
}
