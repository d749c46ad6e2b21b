//! Technology rules consumed by ring synthesis.
//!
//! Layers are addressed by depth: depth 0 is the lowest routing layer.
//! The via layer at depth `d` connects routing layers `d` and `d + 1`.

use geometry::dir::Dir;
use serde::{Deserialize, Serialize};
use shapedb::LayerId;

use crate::error::{ConfigError, Result};

/// Per-layer design rules, indexed by depth.
pub trait Technology {
    /// The routing layer at `depth`.
    fn routing_layer(&self, depth: usize) -> Option<&RoutingLayer>;

    /// The via layer between `depth` and `depth + 1`.
    fn via_layer(&self, depth: usize) -> Option<&ViaLayer>;

    /// The depth of the routing layer named `layer`.
    fn depth_of(&self, layer: &LayerId) -> Option<usize>;

    /// The routing layer at `depth`, or a configuration error if there is none.
    fn require_routing(&self, depth: usize) -> Result<&RoutingLayer> {
        Ok(self
            .routing_layer(depth)
            .ok_or(ConfigError::NoRoutingLayer(depth))?)
    }

    /// The via layer above `depth`, or a configuration error if there is none.
    fn require_via(&self, depth: usize) -> Result<&ViaLayer> {
        Ok(self.via_layer(depth).ok_or(ConfigError::NoViaLayer(depth))?)
    }
}

/// A metal routing layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingLayer {
    pub name: LayerId,
    /// The preferred routing direction.
    pub dir: Dir,
    pub min_width: i64,
    pub min_spacing: i64,
    /// Minimum shape area, in square database units.
    pub min_area: i64,
    pub pitch: i64,
    pub wire_width: i64,
    /// The layer on which blockages for this layer are drawn.
    #[serde(default)]
    pub blockage: Option<LayerId>,
    /// Pin-only layers never receive blockages.
    #[serde(default)]
    pub pin_only: bool,
}

/// Enclosure of a cut by metal, per direction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enclosure {
    pub h: i64,
    pub v: i64,
}

impl Enclosure {
    /// The larger of the two directions.
    #[inline]
    pub fn max(&self) -> i64 {
        std::cmp::max(self.h, self.v)
    }
}

/// Cut rules for a via layer drawn as a matrix of square cuts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutRules {
    pub layer: LayerId,
    pub min_size: i64,
    pub min_spacing: i64,
}

impl CutRules {
    /// Center-to-center distance between adjacent cuts.
    #[inline]
    pub fn pitch(&self) -> i64 {
        self.min_size + self.min_spacing
    }
}

/// A via layer connecting two adjacent routing layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViaLayer {
    pub name: LayerId,
    /// `None` for technologies whose vias are drawn as a single shape.
    #[serde(default)]
    pub cut: Option<CutRules>,
    /// Enclosure by the routing layer above.
    #[serde(default)]
    pub top_enclosure: Enclosure,
    /// Enclosure by the routing layer below.
    #[serde(default)]
    pub bottom_enclosure: Enclosure,
}

impl ViaLayer {
    /// The enclosure applied to every cut: the largest of the top and bottom
    /// enclosures in either direction.
    pub fn enclosure(&self) -> i64 {
        std::cmp::max(self.top_enclosure.max(), self.bottom_enclosure.max())
    }
}

/// A technology described as an ordered stack of layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerStack {
    /// Routing layers, ordered from bottom to top.
    pub routing: Vec<RoutingLayer>,
    /// Via layers, `vias[d]` sitting between `routing[d]` and `routing[d + 1]`.
    #[serde(default)]
    pub vias: Vec<ViaLayer>,
}

impl LayerStack {
    /// Parses and validates a layer stack from TOML.
    pub fn from_toml(s: &str) -> Result<Self> {
        let stack: Self = toml::from_str(s)?;
        stack.validate()?;
        Ok(stack)
    }

    /// Checks that every pair of adjacent routing layers has a via layer.
    pub fn validate(&self) -> Result<()> {
        let expected = self.routing.len().saturating_sub(1);
        if self.vias.len() != expected {
            return Err(ConfigError::ViaCount {
                routing: self.routing.len(),
                vias: self.vias.len(),
            }
            .into());
        }
        Ok(())
    }

    /// The number of routing layers.
    pub fn depths(&self) -> usize {
        self.routing.len()
    }
}

impl Technology for LayerStack {
    fn routing_layer(&self, depth: usize) -> Option<&RoutingLayer> {
        self.routing.get(depth)
    }

    fn via_layer(&self, depth: usize) -> Option<&ViaLayer> {
        self.vias.get(depth)
    }

    fn depth_of(&self, layer: &LayerId) -> Option<usize> {
        self.routing.iter().position(|l| &l.name == layer)
    }
}
