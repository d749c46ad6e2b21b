//! The four sides of a ring.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::ops::{AddAssign, Index, IndexMut};

use array_map::{ArrayMap, Indexable};
use geometry::prelude::*;
use serde::{Deserialize, Serialize};
use shapedb::{LayoutDb, Net, ShapeId};

use crate::config::{RingConfig, RingNets};
use crate::contact::Contact;
use crate::error::{Error, Result};
use crate::interval::IntervalSet;
use crate::issue::{Cause, IssueSet, RingIssue, Severity};
use crate::rail::{Connection, Rail, RailLayout, Rejection, SpinePoint};
use crate::tech::Technology;

/// One side of a ring.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Indexable)]
pub enum SideKind {
    South,
    North,
    West,
    East,
}

impl SideKind {
    pub const ALL: [SideKind; 4] = [Self::South, Self::North, Self::West, Self::East];

    /// The direction rails on this side run in.
    pub const fn dir(&self) -> Dir {
        match *self {
            Self::South | Self::North => Dir::Horiz,
            Self::West | Self::East => Dir::Vert,
        }
    }

    /// The corners a rail on this side runs from and to, lowest first.
    pub const fn corners(&self) -> [Corner; 2] {
        match *self {
            Self::South => [Corner::LowerLeft, Corner::LowerRight],
            Self::North => [Corner::UpperLeft, Corner::UpperRight],
            Self::West => [Corner::LowerLeft, Corner::UpperLeft],
            Self::East => [Corner::LowerRight, Corner::UpperRight],
        }
    }

    /// Returns `true` if rails step toward smaller coordinates as their order grows.
    const fn steps_down(&self) -> bool {
        matches!(*self, Self::South | Self::West)
    }

    /// The block edge this side faces.
    const fn edge(&self, inner: &Rect) -> i64 {
        match *self {
            Self::South => inner.bot(),
            Self::North => inner.top(),
            Self::West => inner.left(),
            Self::East => inner.right(),
        }
    }

    /// The axis of the rail of the given order around `inner`.
    ///
    /// ```
    /// # use corona::side::SideKind;
    /// # use geometry::prelude::*;
    /// let inner = Rect::from_sides(0, 0, 1000, 1000);
    /// assert_eq!(SideKind::South.rail_axis(&inner, 0, 20, 10), -20);
    /// assert_eq!(SideKind::South.rail_axis(&inner, 1, 20, 10), -50);
    /// assert_eq!(SideKind::East.rail_axis(&inner, 1, 20, 10), 1050);
    /// ```
    pub const fn rail_axis(&self, inner: &Rect, order: usize, width: i64, space: i64) -> i64 {
        let offset = width / 2 + space + order as i64 * (width + space);
        if self.steps_down() {
            self.edge(inner) - offset
        } else {
            self.edge(inner) + offset
        }
    }
}

impl Display for SideKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::South => write!(f, "south"),
            Self::North => write!(f, "north"),
            Self::West => write!(f, "west"),
            Self::East => write!(f, "east"),
        }
    }
}

/// One value per side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerSide<T> {
    inner: ArrayMap<SideKind, T, 4>,
}

impl<T> PerSide<T> {
    pub fn from_fn(f: impl FnMut(SideKind) -> T) -> Self {
        // [`SideKind::ALL`] lists the variants in declaration order.
        Self {
            inner: ArrayMap::new(SideKind::ALL.map(f)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SideKind, &T)> {
        SideKind::ALL.into_iter().map(move |side| (side, &self.inner[side]))
    }
}

impl<T> Index<SideKind> for PerSide<T> {
    type Output = T;
    fn index(&self, side: SideKind) -> &T {
        &self.inner[side]
    }
}

impl<T> IndexMut<SideKind> for PerSide<T> {
    fn index_mut(&mut self, side: SideKind) -> &mut T {
        &mut self.inner[side]
    }
}

/// Counts of connection attempts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectStats {
    pub accepted: usize,
    pub rejected: usize,
}

impl ConnectStats {
    fn record(&mut self, connection: Connection) {
        match connection {
            Connection::Accepted => self.accepted += 1,
            Connection::Rejected(_) => self.rejected += 1,
        }
    }
}

impl AddAssign for ConnectStats {
    fn add_assign(&mut self, rhs: Self) {
        self.accepted += rhs.accepted;
        self.rejected += rhs.rejected;
    }
}

/// The rails of one side of a ring, innermost first.
#[derive(Debug, Clone)]
pub struct Side {
    kind: SideKind,
    rails: Vec<Rail>,
}

impl Side {
    /// Creates the rails of side `kind` around the box `inner`.
    pub fn new(kind: SideKind, inner: Rect, config: &RingConfig, nets: &RingNets) -> Self {
        let dir = kind.dir();
        let width = config.rail_width[dir];
        let space = config.rail_space[dir];
        let rails = (0..config.rails_count)
            .map(|order| {
                Rail::new(
                    kind,
                    order,
                    kind.rail_axis(&inner, order, width, space),
                    nets.rail_net(order, config.use_clock_tree).clone(),
                    width,
                    config.rail_depth[dir],
                    inner.span(dir),
                )
            })
            .collect();
        Self { kind, rails }
    }

    #[inline]
    pub fn kind(&self) -> SideKind {
        self.kind
    }

    /// The rails, innermost first.
    #[inline]
    pub fn rails(&self) -> &[Rail] {
        &self.rails
    }

    /// The `i`-th rail counted from the block.
    pub fn inner_rail(&self, i: usize) -> Result<&Rail> {
        self.rails.get(i).ok_or(Error::NoRail {
            side: self.kind,
            index: i,
            count: self.rails.len(),
        })
    }

    /// The `i`-th rail counted from the outside of the ring.
    pub fn outer_rail(&self, i: usize) -> Result<&Rail> {
        let count = self.rails.len();
        count
            .checked_sub(i + 1)
            .and_then(|j| self.rails.get(j))
            .ok_or(Error::NoRail {
                side: self.kind,
                index: i,
                count,
            })
    }

    /// The span covered by the rails across the side, widened by one rail
    /// width on each end.
    pub fn cross_span(&self) -> Option<Span> {
        let inner = self.rails.first()?;
        let outer = self.rails.last()?;
        Some(Span::new(inner.axis(), outer.axis()).expand_all(inner.width()))
    }

    /// Offers every contact to every rail.
    pub fn connect<T: Technology + ?Sized>(
        &mut self,
        tech: &T,
        contacts: &[Contact],
        shrink: i64,
        issues: &mut IssueSet<RingIssue>,
    ) -> ConnectStats {
        let all = (0..self.rails.len()).collect::<Vec<_>>();
        let mut stats = ConnectStats::default();
        for contact in contacts {
            stats += self.connect_to(tech, contact, &all, shrink, issues);
        }
        stats
    }

    /// Offers pad contacts to the rails selected by their net.
    ///
    /// Clock contacts go to every rail. Supply contacts go to the outermost
    /// rail and to the inner rails below `(n - 1) / 2`. Other contacts are
    /// ignored.
    pub fn connect_pads<T: Technology + ?Sized>(
        &mut self,
        tech: &T,
        contacts: &[Contact],
        shrink: i64,
        issues: &mut IssueSet<RingIssue>,
    ) -> ConnectStats {
        let mut stats = ConnectStats::default();
        for contact in contacts {
            let rails = pad_rails(contact.net(), self.rails.len());
            if rails.is_empty() {
                tracing::debug!("{} side ignores pad {}", self.kind, contact);
                continue;
            }
            stats += self.connect_to(tech, contact, &rails, shrink, issues);
        }
        stats
    }

    fn connect_to<T: Technology + ?Sized>(
        &mut self,
        tech: &T,
        contact: &Contact,
        rails: &[usize],
        shrink: i64,
        issues: &mut IssueSet<RingIssue>,
    ) -> ConnectStats {
        let mut stats = ConnectStats::default();
        let mut reported = false;
        for &i in rails {
            let Some(rail) = self.rails.get_mut(i) else {
                continue;
            };
            let connection = rail.connect(tech, contact, shrink);
            if connection == Connection::Rejected(Rejection::OutsideRing) && !reported {
                issues.add(RingIssue::new_and_log(
                    Cause::ContactOutsideRing {
                        net: contact.net().name().clone(),
                        side: self.kind,
                        bbox: contact.bbox(),
                        ring: rail.bounds(),
                    },
                    Severity::Error,
                ));
                reported = true;
            }
            stats.record(connection);
        }
        stats
    }

    /// Lays out every rail. `corners[order]` holds the corner shapes of the
    /// rail of that order.
    pub fn do_layout<T, D>(
        &mut self,
        tech: &T,
        db: &mut D,
        corners: &[[SpinePoint; 2]],
        issues: &mut IssueSet<RingIssue>,
    ) -> Result<Vec<RailLayout>>
    where
        T: Technology + ?Sized,
        D: LayoutDb + ?Sized,
    {
        let _guard = tracing::span!(tracing::Level::INFO, "side layout", side = %self.kind).entered();
        let mut layouts = Vec::with_capacity(self.rails.len());
        for (rail, corners) in self.rails.iter_mut().zip(corners) {
            layouts.push(rail.do_layout(tech, db, *corners, issues)?);
        }
        Ok(layouts)
    }

    /// Draws blockages over the via stacks of this side.
    ///
    /// The extents of the drawn via stacks along the side are merged, and
    /// each merged span, widened by two pitches, is blocked across `across`
    /// on every depth the stacks cut through and on the depth below each.
    pub fn add_blockages<T, D>(
        &self,
        tech: &T,
        db: &mut D,
        net: &Net,
        across: Span,
    ) -> Result<Vec<ShapeId>>
    where
        T: Technology + ?Sized,
        D: LayoutDb + ?Sized,
    {
        let dir = self.kind.dir();
        let mut spans = IntervalSet::new();
        let mut depths = BTreeSet::new();
        for rv in self.rails.iter().flat_map(Rail::vias) {
            let via = rv.via();
            if !rv.is_live() || !via.has_layout() {
                continue;
            }
            let span = via.bbox().span(dir);
            spans.merge(span.start(), span.stop());
            for depth in via.bottom_depth()..via.top_depth() {
                depths.insert(depth);
                if let Some(below) = depth.checked_sub(1) {
                    depths.insert(below);
                }
            }
        }

        let mut blockages = Vec::new();
        for depth in depths {
            let layer = tech.require_routing(depth)?;
            let Some(blockage) = layer.blockage.as_ref().filter(|_| !layer.pin_only) else {
                continue;
            };
            for chunk in spans.iter() {
                let along = chunk.expand_all(layer.pitch);
                let rect = match dir {
                    Dir::Horiz => Rect::from_spans(along, across),
                    Dir::Vert => Rect::from_spans(across, along),
                };
                blockages.push(db.create_blockage(net, blockage, rect)?);
            }
        }
        tracing::debug!(
            chunks = spans.len(),
            blockages = blockages.len(),
            "blocked {} side",
            self.kind
        );
        Ok(blockages)
    }
}

/// The rails a pad contact of `net` connects to on a side with `count` rails.
pub fn pad_rails(net: &Net, count: usize) -> Vec<usize> {
    if count == 0 {
        return Vec::new();
    }
    if net.is_clock() {
        (0..count).collect()
    } else if net.is_supply() {
        let mut rails = vec![count - 1];
        rails.extend(0..(count - 1) / 2);
        rails
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn clock_pads_reach_every_rail() {
        assert_eq!(pad_rails(&Net::clock("ck"), 4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn supply_pads_reach_outermost_and_half_the_inner_rails() {
        assert_eq!(pad_rails(&Net::power("vdd"), 4), vec![3, 0]);
        assert_eq!(pad_rails(&Net::ground("vss"), 1), vec![0]);
        assert_eq!(pad_rails(&Net::ground("vss"), 2), vec![1]);
        assert_eq!(pad_rails(&Net::power("vdd"), 6), vec![5, 0, 1]);
    }

    #[test]
    fn signal_pads_are_ignored() {
        assert!(pad_rails(&Net::signal("a"), 4).is_empty());
    }

    #[test]
    fn rail_axes_step_away_from_the_block() {
        let inner = Rect::from_sides(0, 0, 1000, 800);
        for side in SideKind::ALL {
            let a0 = side.rail_axis(&inner, 0, 40, 20);
            let a1 = side.rail_axis(&inner, 1, 40, 20);
            assert_eq!((a1 - a0).abs(), 60, "{side}");
        }
        assert_eq!(SideKind::South.rail_axis(&inner, 0, 40, 20), -40);
        assert_eq!(SideKind::North.rail_axis(&inner, 0, 40, 20), 840);
        assert_eq!(SideKind::West.rail_axis(&inner, 2, 40, 20), -160);
        assert_eq!(SideKind::East.rail_axis(&inner, 2, 40, 20), 1160);
    }

    #[test]
    fn side_corners_follow_the_side() {
        assert_eq!(
            SideKind::South.corners(),
            [Corner::LowerLeft, Corner::LowerRight]
        );
        assert_eq!(SideKind::East.corners(), [Corner::LowerRight, Corner::UpperRight]);
    }

    #[test]
    fn per_side_values_follow_their_side() {
        let mut names = PerSide::from_fn(|side| side.to_string());
        names[SideKind::West].push('!');
        assert_eq!(names[SideKind::North], "north");
        assert_eq!(
            names.iter().map(|(_, name)| name.as_str()).collect::<Vec<_>>(),
            vec!["south", "north", "west!", "east"]
        );
        assert!(names.iter().all(|(side, name)| name.starts_with(&side.to_string())));
    }
}
