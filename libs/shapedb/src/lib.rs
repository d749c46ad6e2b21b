//! A layout shape database.
//!
//! [`LayoutDb`] is the set of capabilities ring synthesis needs from a
//! physical database: creating conductor rectangles, via cuts, wire segments
//! and blockages, and reading shapes back. [`ShapeDb`] is an in-memory
//! implementation.
//!
//! Shapes may only be created inside an update session. Sessions nest;
//! shapes staged in a session become visible to [`ShapeDb::shapes`] when the
//! outermost session closes. Use [`UpdateSession`] to make sure a session is
//! closed on every exit path.

pub mod error;
pub mod id;
pub mod session;

use arcstr::ArcStr;
use geometry::prelude::*;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use crate::error::{Error, Result};
use crate::id::Id;
pub use crate::session::UpdateSession;

/// Identifies a shape owned by a [`LayoutDb`].
pub type ShapeId = Id<Shape>;

/// A layer name.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(ArcStr);

impl LayerId {
    /// Creates a layer identifier with the given name.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self(name.into())
    }

    /// The layer name.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.0
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The electrical role of a net.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetKind {
    /// A positive supply.
    Power,
    /// A ground supply.
    Ground,
    /// A clock distribution net.
    Clock,
    /// Any other signal.
    Signal,
    /// The pseudo-net owning routing blockages.
    Blockage,
}

/// A named net.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    name: ArcStr,
    kind: NetKind,
}

impl Net {
    /// Creates a net.
    pub fn new(name: impl Into<ArcStr>, kind: NetKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Creates a [`NetKind::Power`] net.
    pub fn power(name: impl Into<ArcStr>) -> Self {
        Self::new(name, NetKind::Power)
    }

    /// Creates a [`NetKind::Ground`] net.
    pub fn ground(name: impl Into<ArcStr>) -> Self {
        Self::new(name, NetKind::Ground)
    }

    /// Creates a [`NetKind::Clock`] net.
    pub fn clock(name: impl Into<ArcStr>) -> Self {
        Self::new(name, NetKind::Clock)
    }

    /// Creates a [`NetKind::Signal`] net.
    pub fn signal(name: impl Into<ArcStr>) -> Self {
        Self::new(name, NetKind::Signal)
    }

    /// Creates a [`NetKind::Blockage`] net.
    pub fn blockage(name: impl Into<ArcStr>) -> Self {
        Self::new(name, NetKind::Blockage)
    }

    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> NetKind {
        self.kind
    }

    /// Returns `true` for power and ground nets.
    #[inline]
    pub fn is_supply(&self) -> bool {
        matches!(self.kind, NetKind::Power | NetKind::Ground)
    }

    #[inline]
    pub fn is_clock(&self) -> bool {
        matches!(self.kind, NetKind::Clock)
    }
}

impl std::fmt::Display for Net {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// What a shape was created as.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    /// A conductor rectangle: a via plate, a terminal or a symbolic via.
    Rect,
    /// A square via cut.
    Cut,
    /// A straight wire joining two shapes.
    Wire {
        /// The direction the wire runs in.
        dir: Dir,
        /// The shape at the lower end of the wire.
        from: ShapeId,
        /// The shape at the upper end of the wire.
        to: ShapeId,
    },
    /// A routing blockage.
    Blockage,
}

/// A primitive shape: a rectangle on a layer, owned by a net.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    net: Net,
    layer: LayerId,
    kind: ShapeKind,
    bbox: Rect,
}

impl Shape {
    #[inline]
    pub fn net(&self) -> &Net {
        &self.net
    }

    #[inline]
    pub fn layer(&self) -> &LayerId {
        &self.layer
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[inline]
    pub fn bbox(&self) -> Rect {
        self.bbox
    }
}

/// The capabilities ring synthesis requires from a layout database.
pub trait LayoutDb {
    /// Opens an update session. Sessions may nest.
    fn begin_session(&mut self);

    /// Closes the innermost update session.
    fn end_session(&mut self) -> Result<()>;

    /// Returns `true` while at least one update session is open.
    fn in_session(&self) -> bool;

    /// Creates a conductor rectangle.
    fn create_rect(&mut self, net: &Net, layer: &LayerId, rect: Rect) -> Result<ShapeId>;

    /// Creates a square cut of side `side` centered on `center`.
    fn create_cut(
        &mut self,
        net: &Net,
        layer: &LayerId,
        center: Point,
        side: i64,
    ) -> Result<ShapeId>;

    /// Creates a straight wire of the given `width` running along `dir` at
    /// the cross-axis coordinate `axis`, spanning from the center of `from`
    /// to the center of `to`.
    #[allow(clippy::too_many_arguments)]
    fn create_wire(
        &mut self,
        net: &Net,
        layer: &LayerId,
        dir: Dir,
        axis: i64,
        width: i64,
        from: ShapeId,
        to: ShapeId,
    ) -> Result<ShapeId>;

    /// Creates a routing blockage.
    fn create_blockage(&mut self, net: &Net, layer: &LayerId, rect: Rect) -> Result<ShapeId>;

    /// Looks up a shape.
    fn shape(&self, id: ShapeId) -> Result<&Shape>;
}

/// An in-memory [`LayoutDb`].
#[derive(Debug, Clone, Default)]
pub struct ShapeDb {
    shape_id: ShapeId,
    depth: usize,
    shapes: IndexMap<ShapeId, Shape>,
    staged: IndexMap<ShapeId, Shape>,
    commits: usize,
}

impl ShapeDb {
    pub fn new() -> Self {
        Default::default()
    }

    /// Iterates over committed shapes in creation order.
    pub fn shapes(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.shapes.iter().map(|(id, shape)| (*id, shape))
    }

    /// Iterates over committed shapes on the given layer.
    ///
    /// The iterator borrows only the database, so `layer` may be a temporary.
    pub fn shapes_on<'a>(
        &'a self,
        layer: &LayerId,
    ) -> impl Iterator<Item = (ShapeId, &'a Shape)> + 'a {
        let layer = layer.clone();
        self.shapes().filter(move |(_, s)| *s.layer() == layer)
    }

    /// The number of committed shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// The number of outermost sessions closed so far.
    pub fn commits(&self) -> usize {
        self.commits
    }

    fn insert(&mut self, net: &Net, layer: &LayerId, kind: ShapeKind, bbox: Rect) -> Result<ShapeId> {
        if self.depth == 0 {
            return Err(Error::NoSession);
        }
        let id = self.shape_id.alloc();
        self.staged.insert(
            id,
            Shape {
                net: net.clone(),
                layer: layer.clone(),
                kind,
                bbox,
            },
        );
        Ok(id)
    }
}

impl LayoutDb for ShapeDb {
    fn begin_session(&mut self) {
        self.depth += 1;
    }

    fn end_session(&mut self) -> Result<()> {
        if self.depth == 0 {
            return Err(Error::UnbalancedSession);
        }
        self.depth -= 1;
        if self.depth == 0 {
            tracing::debug!(shapes = self.staged.len(), "committing update session");
            self.shapes.extend(self.staged.drain(..));
            self.commits += 1;
        }
        Ok(())
    }

    fn in_session(&self) -> bool {
        self.depth > 0
    }

    fn create_rect(&mut self, net: &Net, layer: &LayerId, rect: Rect) -> Result<ShapeId> {
        self.insert(net, layer, ShapeKind::Rect, rect)
    }

    fn create_cut(
        &mut self,
        net: &Net,
        layer: &LayerId,
        center: Point,
        side: i64,
    ) -> Result<ShapeId> {
        let bbox = Rect::from_center_dims(center, Dims::square(side));
        self.insert(net, layer, ShapeKind::Cut, bbox)
    }

    fn create_wire(
        &mut self,
        net: &Net,
        layer: &LayerId,
        dir: Dir,
        axis: i64,
        width: i64,
        from: ShapeId,
        to: ShapeId,
    ) -> Result<ShapeId> {
        let a = self.shape(from)?.bbox().center().coord(dir);
        let b = self.shape(to)?.bbox().center().coord(dir);
        let along = Span::new(a, b);
        let across = Span::from_center_length(axis, width);
        let bbox = match dir {
            Dir::Horiz => Rect::from_spans(along, across),
            Dir::Vert => Rect::from_spans(across, along),
        };
        let (from, to) = if a <= b { (from, to) } else { (to, from) };
        self.insert(net, layer, ShapeKind::Wire { dir, from, to }, bbox)
    }

    fn create_blockage(&mut self, net: &Net, layer: &LayerId, rect: Rect) -> Result<ShapeId> {
        self.insert(net, layer, ShapeKind::Blockage, rect)
    }

    fn shape(&self, id: ShapeId) -> Result<&Shape> {
        self.shapes
            .get(&id)
            .or_else(|| self.staged.get(&id))
            .ok_or(Error::UnknownShape(id))
    }
}
