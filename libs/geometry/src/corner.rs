//! The four corners of a rectangle.

use array_map::Indexable;
use serde::{Deserialize, Serialize};

/// A corner of an axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
#[derive(Indexable)]
pub enum Corner {
    /// The corner with minimal x and y.
    LowerLeft,
    /// The corner with maximal x and minimal y.
    LowerRight,
    /// The corner with minimal x and maximal y.
    UpperLeft,
    /// The corner with maximal x and y.
    UpperRight,
}

impl Corner {
    /// Every corner, in declaration order.
    pub const ALL: [Corner; 4] = [
        Corner::LowerLeft,
        Corner::LowerRight,
        Corner::UpperLeft,
        Corner::UpperRight,
    ];
}
