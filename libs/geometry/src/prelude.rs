//! An import prelude that re-exports commonly used items.

pub use crate::corner::Corner;
pub use crate::dims::Dims;
pub use crate::dir::{Dir, Dirs};
pub use crate::point::Point;
pub use crate::rect::Rect;
pub use crate::span::Span;
