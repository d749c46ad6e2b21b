//! Ring configuration.

use geometry::dir::{Dir, Dirs};
use serde::{Deserialize, Serialize};
use shapedb::Net;

use crate::error::{ConfigError, Result};
use crate::tech::Technology;

fn default_legalize_shrink() -> i64 {
    1
}

/// Geometric parameters of a ring, fixed for the lifetime of a [`Corona`](crate::builder::Corona).
///
/// Per-direction values are keyed by the direction the rails run in:
/// south and north rails run horizontally, west and east rails vertically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RingConfigFile", into = "RingConfigFile")]
pub struct RingConfig {
    /// Number of rails on each side.
    pub rails_count: usize,
    /// Rail width.
    pub rail_width: Dirs<i64>,
    /// Spacing between adjacent rails.
    pub rail_space: Dirs<i64>,
    /// Depth of the layer carrying the rails.
    pub rail_depth: Dirs<usize>,
    /// Highest layer covered by corner blockages.
    pub top_layer_depth: usize,
    /// Dedicate the innermost rail to the clock.
    pub use_clock_tree: bool,
    /// Amount removed from contact footprints when sizing rail via stacks.
    pub legalize_shrink: i64,
}

/// The on-disk layout of a [`RingConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RingConfigFile {
    rails_count: usize,
    h_rail_width: i64,
    h_rail_space: i64,
    v_rail_width: i64,
    v_rail_space: i64,
    horizontal_depth: usize,
    vertical_depth: usize,
    top_layer_depth: usize,
    #[serde(default)]
    use_clock_tree: bool,
    #[serde(default = "default_legalize_shrink")]
    legalize_shrink: i64,
}

impl From<RingConfigFile> for RingConfig {
    fn from(file: RingConfigFile) -> Self {
        Self {
            rails_count: file.rails_count,
            rail_width: Dirs::new(file.h_rail_width, file.v_rail_width),
            rail_space: Dirs::new(file.h_rail_space, file.v_rail_space),
            rail_depth: Dirs::new(file.horizontal_depth, file.vertical_depth),
            top_layer_depth: file.top_layer_depth,
            use_clock_tree: file.use_clock_tree,
            legalize_shrink: file.legalize_shrink,
        }
    }
}

impl From<RingConfig> for RingConfigFile {
    fn from(config: RingConfig) -> Self {
        Self {
            rails_count: config.rails_count,
            h_rail_width: config.rail_width[Dir::Horiz],
            h_rail_space: config.rail_space[Dir::Horiz],
            v_rail_width: config.rail_width[Dir::Vert],
            v_rail_space: config.rail_space[Dir::Vert],
            horizontal_depth: config.rail_depth[Dir::Horiz],
            vertical_depth: config.rail_depth[Dir::Vert],
            top_layer_depth: config.top_layer_depth,
            use_clock_tree: config.use_clock_tree,
            legalize_shrink: config.legalize_shrink,
        }
    }
}

impl RingConfig {
    /// Parses and validates a configuration from TOML.
    pub fn from_toml(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for internal consistency.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(ConfigError::InvalidRing(msg).into()) };
        if self.rails_count == 0 {
            return invalid("a ring needs at least one rail".to_string());
        }
        for dir in Dir::ALL {
            if self.rail_width[dir] <= self.legalize_shrink {
                return invalid(format!(
                    "{} rail width {} must exceed the legalization shrink {}",
                    dir, self.rail_width[dir], self.legalize_shrink
                ));
            }
            if self.rail_space[dir] < 0 {
                return invalid(format!("{} rail spacing is negative", dir));
            }
        }
        let (lo, hi) = self.corner_depths();
        if lo == hi {
            return invalid(format!("horizontal and vertical rails share depth {}", lo));
        }
        if self.top_layer_depth < hi {
            return invalid(format!(
                "top layer depth {} is below the rail layers",
                self.top_layer_depth
            ));
        }
        Ok(())
    }

    /// Checks that every depth the ring draws on exists in `tech`.
    pub fn check_layers<T: Technology + ?Sized>(&self, tech: &T) -> Result<()> {
        for depth in 0..=self.top_layer_depth {
            tech.require_routing(depth)?;
        }
        let (lo, hi) = self.corner_depths();
        for depth in lo..hi {
            tech.require_via(depth)?;
        }
        Ok(())
    }

    /// The depths spanned by corner via stacks, lowest first.
    pub fn corner_depths(&self) -> (usize, usize) {
        let (h, v) = (self.rail_depth[Dir::Horiz], self.rail_depth[Dir::Vert]);
        (h.min(v), h.max(v))
    }
}

/// The nets a ring distributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingNets {
    pub vdd: Net,
    pub vss: Net,
    /// Required when the configuration uses a clock tree.
    pub ck: Option<Net>,
    /// The net owning routing blockages.
    pub blockage: Net,
}

impl RingNets {
    /// The net carried by rails of the given order.
    ///
    /// Order 0 carries the clock when a clock tree is used; otherwise odd
    /// orders carry ground and even orders carry power.
    pub fn rail_net(&self, order: usize, use_clock_tree: bool) -> &Net {
        match (&self.ck, use_clock_tree, order) {
            (Some(ck), true, 0) => ck,
            _ if order % 2 == 1 => &self.vss,
            _ => &self.vdd,
        }
    }

    pub(crate) fn validate(&self, config: &RingConfig) -> Result<()> {
        if config.use_clock_tree && self.ck.is_none() {
            return Err(ConfigError::InvalidRing(
                "a clock tree is used but no clock net was given".to_string(),
            )
            .into());
        }
        Ok(())
    }
}
