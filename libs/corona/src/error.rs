//! Ring synthesis errors.
//!
//! Only conditions that abort work are errors. Rejected connections are
//! reported through [`Connection`](crate::rail::Connection) and undersized
//! geometry through [`RingIssue`](crate::issue::RingIssue)s.

use geometry::dir::Dir;
use shapedb::LayerId;

use crate::side::SideKind;

/// The [`Error`] result type.
pub type Result<T> = std::result::Result<T, Error>;

/// A ring synthesis error.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The technology or ring configuration is self-contradictory.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A via footprint cannot hold a single cut.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// The layout database refused an operation.
    #[error("layout database error: {0}")]
    Db(#[from] shapedb::Error),
    /// A configuration file could not be parsed.
    #[error("could not parse configuration: {0}")]
    Toml(#[from] toml::de::Error),
    /// A rail index is out of range for a side.
    #[error("no rail {index} on the {side} side (only {count})")]
    NoRail {
        side: SideKind,
        index: usize,
        count: usize,
    },
    /// A via stack has no plate on a depth it was expected to cover.
    #[error("via stack has no plate at depth {depth}")]
    MissingPlate { depth: usize },
    /// The ring has already been drawn.
    #[error("ring is already laid out")]
    AlreadyLaidOut,
}

/// Technology or configuration data that cannot be used to build a ring.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("minimal side of cut layer `{0}` is zero")]
    ZeroCutSize(LayerId),
    #[error("cut spacing on layer `{0}` is zero")]
    ZeroCutSpacing(LayerId),
    #[error("no routing layer at depth {0}")]
    NoRoutingLayer(usize),
    #[error("no via layer above depth {0}")]
    NoViaLayer(usize),
    #[error("layer stack has {routing} routing layers but {vias} via layers")]
    ViaCount { routing: usize, vias: usize },
    #[error("invalid ring configuration: {0}")]
    InvalidRing(String),
}

/// A plate too small to fit a single cut when expansion is not allowed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot create cut of `{cut}` in {via}: {dir} extent is too small to fit a single via cut")]
pub struct GeometryError {
    /// The rendered via stack.
    pub via: String,
    /// The cut layer.
    pub cut: LayerId,
    /// The axis along which the plate is too small.
    pub dir: Dir,
}
