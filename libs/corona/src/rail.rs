//! Ring rails.
//!
//! A [`Rail`] is a straight strap running along one side of a ring. Contacts
//! are attached to it one at a time through [`Rail::connect`]; each accepted
//! contact gets a [`ViaStack`] on the rail axis. Laying out the rail draws
//! those stacks, a connector from each stack to its contact, and the strap
//! segments joining the stacks and the two ring corners.

use std::collections::BTreeMap;
use std::fmt::Display;

use geometry::prelude::*;
use itertools::Itertools;
use shapedb::{LayoutDb, Net, ShapeId};

use crate::contact::Contact;
use crate::error::{Error, Result};
use crate::issue::{Cause, IssueSet, RingIssue, Severity};
use crate::side::SideKind;
use crate::tech::Technology;
use crate::via::{Expansion, ViaStack};

/// The outcome of [`Rail::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connection {
    Accepted,
    Rejected(Rejection),
}

impl Connection {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Why a contact was not attached to a rail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The contact extends beyond the span the rail covers.
    OutsideRing,
    /// A contact is already attached at the same position.
    Duplicate,
    /// The contact touches the previous contact along the rail.
    OverlapsPrevious,
    /// The contact touches the next contact along the rail.
    OverlapsNext,
    /// The contact layer is not a routing layer of the technology.
    UnknownLayer,
}

impl Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::OutsideRing => write!(f, "outside of the ring"),
            Self::Duplicate => write!(f, "duplicate position"),
            Self::OverlapsPrevious => write!(f, "overlaps previous contact"),
            Self::OverlapsNext => write!(f, "overlaps next contact"),
            Self::UnknownLayer => write!(f, "unknown contact layer"),
        }
    }
}

/// A contact attached to a rail, with the via stack joining them.
#[derive(Debug, Clone)]
pub struct RailVia {
    pos: i64,
    via: ViaStack,
    contact: Contact,
    contact_depth: usize,
}

impl RailVia {
    /// The position of the contact center along the rail.
    #[inline]
    pub fn pos(&self) -> i64 {
        self.pos
    }

    #[inline]
    pub fn via(&self) -> &ViaStack {
        &self.via
    }

    #[inline]
    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    #[inline]
    pub fn contact_depth(&self) -> usize {
        self.contact_depth
    }

    /// Returns `true` if the contact carries the net of the via stack.
    ///
    /// Only such vias are drawn.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.via.net() == self.contact.net()
    }
}

/// A shape the strap of a rail passes through, and its position along the rail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinePoint {
    pub pos: i64,
    pub shape: ShapeId,
}

/// Shapes drawn by [`Rail::do_layout`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RailLayout {
    /// Shapes joined by the strap, in increasing position.
    pub spine: Vec<ShapeId>,
    /// Strap segments between consecutive spine shapes.
    pub segments: Vec<ShapeId>,
    /// Wires from each via stack to its contact.
    pub connectors: Vec<ShapeId>,
}

/// One rail of one side of a ring.
#[derive(Debug, Clone)]
pub struct Rail {
    side: SideKind,
    order: usize,
    axis: i64,
    net: Net,
    width: i64,
    depth: usize,
    bounds: Span,
    vias: BTreeMap<i64, RailVia>,
}

impl Rail {
    /// Creates an empty rail.
    ///
    /// `axis` is the cross-axis coordinate of the rail center line and
    /// `bounds` the span along the rail that contacts must lie within.
    pub fn new(
        side: SideKind,
        order: usize,
        axis: i64,
        net: Net,
        width: i64,
        depth: usize,
        bounds: Span,
    ) -> Self {
        Self {
            side,
            order,
            axis,
            net,
            width,
            depth,
            bounds,
            vias: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn side(&self) -> SideKind {
        self.side
    }

    /// The direction the rail runs in.
    #[inline]
    pub fn dir(&self) -> Dir {
        self.side.dir()
    }

    /// The distance rank from the block, 0 being the innermost rail.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    #[inline]
    pub fn axis(&self) -> i64 {
        self.axis
    }

    #[inline]
    pub fn net(&self) -> &Net {
        &self.net
    }

    #[inline]
    pub fn width(&self) -> i64 {
        self.width
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn bounds(&self) -> Span {
        self.bounds
    }

    /// Attached contacts in increasing position.
    pub fn vias(&self) -> impl Iterator<Item = &RailVia> {
        self.vias.values()
    }

    pub fn len(&self) -> usize {
        self.vias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vias.is_empty()
    }

    /// Swaps the via stack of the contact at `pos` for `via`.
    #[cfg(test)]
    pub(crate) fn replace_via(&mut self, pos: i64, via: ViaStack) -> Option<ViaStack> {
        let rv = self.vias.get_mut(&pos)?;
        Some(std::mem::replace(&mut rv.via, via))
    }

    /// Attaches `contact` to the rail.
    ///
    /// The contact is rejected without modifying the rail if it lies outside
    /// the rail bounds, if a contact is already attached at its position, or
    /// if it touches either neighbor along the rail. Otherwise a via stack is
    /// placed on the rail axis, spanning from the rail depth to the contact
    /// depth, with the contact footprint reduced by `shrink` along the rail
    /// and the rail width reduced by `shrink` across it.
    ///
    /// Neighbors are compared by their contact spans, not by their via
    /// stacks. A via stack never extends past its contact along the rail,
    /// so contacts that touch are rejected even when their stacks would not.
    pub fn connect<T: Technology + ?Sized>(
        &mut self,
        tech: &T,
        contact: &Contact,
        shrink: i64,
    ) -> Connection {
        let result = self.try_connect(tech, contact, shrink);
        match result {
            Connection::Accepted => tracing::debug!("{} accepted {}", self, contact),
            Connection::Rejected(reason) => {
                tracing::debug!("{} rejected {}: {}", self, contact, reason)
            }
        }
        result
    }

    fn try_connect<T: Technology + ?Sized>(
        &mut self,
        tech: &T,
        contact: &Contact,
        shrink: i64,
    ) -> Connection {
        let dir = self.dir();
        let span = contact.bbox().span(dir);
        if !self.bounds.contains(&span) {
            return Connection::Rejected(Rejection::OutsideRing);
        }

        let key = contact.center().coord(dir);
        if self.vias.contains_key(&key) {
            return Connection::Rejected(Rejection::Duplicate);
        }
        if let Some((_, next)) = self.vias.range(key..).next() {
            if span.stop() >= next.contact.bbox().span(dir).start() {
                return Connection::Rejected(Rejection::OverlapsNext);
            }
        }
        if let Some((_, prev)) = self.vias.range(..key).next_back() {
            if prev.contact.bbox().span(dir).stop() >= span.start() {
                return Connection::Rejected(Rejection::OverlapsPrevious);
            }
        }

        let Some(contact_depth) = tech.depth_of(contact.layer()) else {
            return Connection::Rejected(Rejection::UnknownLayer);
        };

        let center = Point::from_dir_coords(dir, key, self.axis);
        let along = span.length() - shrink;
        let across = self.width - shrink;
        let dims = match dir {
            Dir::Horiz => Dims::new(along, across),
            Dir::Vert => Dims::new(across, along),
        };
        let mut via = ViaStack::new(self.net.clone(), self.depth, center, dims, Expansion::ALL);
        via.merge_depth(contact_depth);
        self.vias.insert(
            key,
            RailVia {
                pos: key,
                via,
                contact: contact.clone(),
                contact_depth,
            },
        );
        Connection::Accepted
    }

    /// Draws the rail between the two corner shapes in `corners`.
    ///
    /// Via stacks whose contact belongs to another net are skipped. A via
    /// stack that cannot hold a cut is left out of the strap and recorded
    /// in `issues` as an error; configuration errors abort the layout.
    pub fn do_layout<T, D>(
        &mut self,
        tech: &T,
        db: &mut D,
        corners: [SpinePoint; 2],
        issues: &mut IssueSet<RingIssue>,
    ) -> Result<RailLayout>
    where
        T: Technology + ?Sized,
        D: LayoutDb + ?Sized,
    {
        let dir = self.dir();
        let layer = tech.require_routing(self.depth)?.name.clone();
        let mut spine = Vec::from(corners);
        let mut connectors = Vec::new();

        for rv in self.vias.values_mut() {
            if !rv.is_live() {
                continue;
            }
            let laid_out = rv.via.do_layout(tech, db);
            issues.extend(rv.via.take_issues());
            match laid_out {
                Ok(()) => {}
                Err(Error::Geometry(e)) => {
                    issues.add(RingIssue::new_and_log(
                        Cause::ViaGeometry {
                            net: self.net.name().clone(),
                            at: rv.via.center(),
                            message: e.to_string(),
                        },
                        Severity::Error,
                    ));
                    continue;
                }
                Err(e) => return Err(e),
            }

            let lower = rv
                .via
                .plate(rv.contact_depth)
                .ok_or(Error::MissingPlate {
                    depth: rv.contact_depth,
                })?;
            let cbox = rv.contact.bbox();
            connectors.push(db.create_wire(
                rv.contact.net(),
                rv.contact.layer(),
                dir.other(),
                cbox.center().coord(dir),
                cbox.span(dir).length(),
                lower,
                rv.contact.id(),
            )?);

            let upper = rv
                .via
                .plate(self.depth)
                .ok_or(Error::MissingPlate { depth: self.depth })?;
            spine.push(SpinePoint {
                pos: rv.pos,
                shape: upper,
            });
        }

        spine.sort_by_key(|p| p.pos);
        let segments = spine
            .iter()
            .tuple_windows()
            .map(|(a, b)| {
                db.create_wire(
                    &self.net,
                    &layer,
                    dir,
                    self.axis,
                    self.width,
                    a.shape,
                    b.shape,
                )
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        tracing::debug!(
            segments = segments.len(),
            connectors = connectors.len(),
            "laid out {}",
            self
        );
        Ok(RailLayout {
            spine: spine.into_iter().map(|p| p.shape).collect(),
            segments,
            connectors,
        })
    }
}

impl Display for Rail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.dir() {
            Dir::Horiz => "HorizontalRail",
            Dir::Vert => "VerticalRail",
        };
        write!(
            f,
            "<{} \"{}\" ({}) @{}>",
            kind, self.net, self.order, self.axis
        )
    }
}
