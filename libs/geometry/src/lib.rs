//! 2-D integer geometry used to draw power rings and via stacks.
//!
//! All coordinates are in database units.
//!
//! # Examples
//!
//! Create a [rectangle](crate::rect::Rect) centered on a point:
//!
//! ```
//! # use geometry::prelude::*;
//! let rect = Rect::from_center_dims(Point::new(0, 0), Dims::new(20, 10));
//! assert_eq!(rect, Rect::from_sides(-10, -5, 10, 5));
//! ```
#![warn(missing_docs)]

pub mod corner;
pub mod dims;
pub mod dir;
pub mod point;
pub mod prelude;
pub mod rect;
pub mod span;
