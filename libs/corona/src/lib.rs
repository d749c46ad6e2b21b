//! Power, ground and clock rings.
//!
//! A ring (or corona) is a set of concentric rails drawn around the
//! abutment box of a block. Each of the four sides carries the same number
//! of rails; rails of the same order on adjacent sides meet in a corner via
//! stack. Block terminals and pad pins are attached to rails through via
//! stacks synthesized under the cut rules of the technology.
//!
//! The entry point is [`Corona`]. Geometry is drawn into any
//! [`LayoutDb`](shapedb::LayoutDb), and design rules are read from any
//! [`Technology`], such as a [`LayerStack`] loaded from TOML.
//!
//! Conditions that make a ring impossible to build are returned as
//! [`Error`]s. Everything else, from rejected contacts to undersized plates,
//! is collected as [`RingIssue`](issue::RingIssue)s and returned in the
//! [`RingReport`] of [`Corona::do_layout`].

pub mod builder;
pub mod config;
pub mod contact;
pub mod error;
pub mod interval;
pub mod issue;
pub mod rail;
pub mod registry;
pub mod side;
pub mod tech;
pub mod via;
#[cfg(test)]
mod tests;

pub use builder::{Corona, RingReport};
pub use config::{RingConfig, RingNets};
pub use contact::Contact;
pub use error::{Error, Result};
pub use side::{PerSide, SideKind};
pub use tech::{LayerStack, Technology};
pub use via::{Expansion, ViaStack};
