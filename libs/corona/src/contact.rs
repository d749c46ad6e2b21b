//! Terminals and pad pins a ring connects to.

use geometry::prelude::*;
use shapedb::{LayerId, LayoutDb, Net, ShapeId};

use crate::error::Result;

/// A conductor shape, owned by the layout database, that a rail may connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    id: ShapeId,
    net: Net,
    layer: LayerId,
    bbox: Rect,
}

impl Contact {
    /// Reads the contact with the given shape id from `db`.
    pub fn from_db<D: LayoutDb + ?Sized>(db: &D, id: ShapeId) -> Result<Self> {
        let shape = db.shape(id)?;
        Ok(Self {
            id,
            net: shape.net().clone(),
            layer: shape.layer().clone(),
            bbox: shape.bbox(),
        })
    }

    #[inline]
    pub fn id(&self) -> ShapeId {
        self.id
    }

    #[inline]
    pub fn net(&self) -> &Net {
        &self.net
    }

    #[inline]
    pub fn layer(&self) -> &LayerId {
        &self.layer
    }

    #[inline]
    pub fn bbox(&self) -> Rect {
        self.bbox
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.bbox.center()
    }
}

impl std::fmt::Display for Contact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Contact {} {} {}>", self.net, self.layer, self.bbox)
    }
}
