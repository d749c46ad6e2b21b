//! Axis-aligned directions.

use array_map::{ArrayMap, Indexable};
use serde::{Deserialize, Serialize};

/// A horizontal or vertical direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
#[derive(Indexable)]
pub enum Dir {
    /// Along the x axis.
    Horiz,
    /// Along the y axis.
    Vert,
}

impl Dir {
    /// Both directions, horizontal first.
    pub const ALL: [Dir; 2] = [Dir::Horiz, Dir::Vert];

    /// The perpendicular direction.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Dir::Vert.other(), Dir::Horiz);
    /// ```
    pub const fn other(&self) -> Self {
        match self {
            Dir::Horiz => Dir::Vert,
            Dir::Vert => Dir::Horiz,
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Dir::Horiz => "horizontal",
            Dir::Vert => "vertical",
        };
        f.write_str(name)
    }
}

/// A value of type `T` for each of the two [`Dir`]s.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq)]
pub struct Dirs<T> {
    inner: ArrayMap<Dir, T, 2>,
}

impl<T: Copy> Dirs<T> {
    /// Associates `value` with both directions.
    pub const fn uniform(value: T) -> Self {
        Self {
            inner: ArrayMap::new([value; 2]),
        }
    }
}

impl<T> Dirs<T> {
    /// Creates a [`Dirs`] from a horizontal and a vertical value.
    pub const fn new(horiz: T, vert: T) -> Self {
        // Element order follows the variant order of [`Dir`].
        Self {
            inner: ArrayMap::new([horiz, vert]),
        }
    }

    /// Maps `f` over both values.
    pub fn map<B>(self, f: impl FnMut(&Dir, T) -> B) -> Dirs<B> {
        Dirs {
            inner: self.inner.map(f),
        }
    }
}

impl<T> std::ops::Index<Dir> for Dirs<T> {
    type Output = T;
    fn index(&self, index: Dir) -> &Self::Output {
        &self.inner[index]
    }
}

impl<T> std::ops::IndexMut<Dir> for Dirs<T> {
    fn index_mut(&mut self, index: Dir) -> &mut Self::Output {
        &mut self.inner[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirs_index_by_direction() {
        let mut widths = Dirs::new(20, 30);
        assert_eq!(widths[Dir::Horiz], 20);
        assert_eq!(widths[Dir::Vert], 30);
        widths[Dir::Vert] += 5;
        let halves = widths.map(|_, w| w / 2);
        assert_eq!(halves, Dirs::new(10, 17));
        assert_eq!(Dirs::uniform(4)[Dir::Vert], 4);
    }
}
