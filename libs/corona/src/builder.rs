//! Ring assembly.

use array_map::ArrayMap;
use geometry::prelude::*;
use serde::{Deserialize, Serialize};
use shapedb::{LayoutDb, UpdateSession};
use tracing::Level;

use crate::config::{RingConfig, RingNets};
use crate::contact::Contact;
use crate::error::{Error, Result};
use crate::issue::{IssueSet, RingIssue};
use crate::rail::SpinePoint;
use crate::side::{ConnectStats, PerSide, Side, SideKind};
use crate::tech::Technology;
use crate::via::{Expansion, ViaStack};

/// A summary of a completed ring layout.
#[derive(Debug, Clone, Default)]
pub struct RingReport {
    /// Every issue found since the ring was created.
    pub issues: IssueSet<RingIssue>,
    /// Connection attempts since the ring was created.
    pub stats: ConnectStats,
    /// Counts of drawn shapes.
    pub shapes: ShapeCounts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeCounts {
    pub corner_vias: usize,
    pub segments: usize,
    pub connectors: usize,
    pub blockages: usize,
}

/// A power, ground and clock ring around a rectangular block.
///
/// Build a ring with [`Corona::new`], attach block terminals and pad pins
/// with [`Corona::connect_core`] and [`Corona::connect_pads`], then draw it
/// with [`Corona::do_layout`].
#[derive(Debug, Clone)]
pub struct Corona {
    config: RingConfig,
    nets: RingNets,
    block: Rect,
    inner: Rect,
    sides: PerSide<Side>,
    corners: ArrayMap<Corner, Vec<ViaStack>, 4>,
    issues: IssueSet<RingIssue>,
    stats: ConnectStats,
    has_layout: bool,
}

impl Corona {
    /// Creates the rails of a ring around `block`.
    pub fn new(block: Rect, config: RingConfig, nets: RingNets) -> Result<Self> {
        config.validate()?;
        nets.validate(&config)?;
        let space = config.rail_space.map(|_, space| space / 2);
        let inner = block.expand(space[Dir::Vert], space[Dir::Horiz]);
        let sides = PerSide::from_fn(|kind| Side::new(kind, inner, &config, &nets));
        tracing::info!(
            block = %block,
            rails = config.rails_count,
            "created ring"
        );
        Ok(Self {
            config,
            nets,
            block,
            inner,
            sides,
            corners: Default::default(),
            issues: IssueSet::new(),
            stats: ConnectStats::default(),
            has_layout: false,
        })
    }

    #[inline]
    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    #[inline]
    pub fn nets(&self) -> &RingNets {
        &self.nets
    }

    /// The abutment box of the block the ring surrounds.
    #[inline]
    pub fn block(&self) -> Rect {
        self.block
    }

    /// The block box widened by half the rail spacing.
    #[inline]
    pub fn inner(&self) -> Rect {
        self.inner
    }

    #[inline]
    pub fn side(&self, kind: SideKind) -> &Side {
        &self.sides[kind]
    }

    /// Corner via stacks at `corner`, one per rail order. Empty before layout.
    pub fn corner_vias(&self, corner: Corner) -> &[ViaStack] {
        &self.corners[corner]
    }

    /// Issues found so far.
    pub fn issues(&self) -> &IssueSet<RingIssue> {
        &self.issues
    }

    pub fn stats(&self) -> ConnectStats {
        self.stats
    }

    /// The point where the rails of the given order meet at `corner`.
    pub fn corner_point(&self, corner: Corner, order: usize) -> Result<Point> {
        let (x_side, y_side) = match corner {
            Corner::LowerLeft => (SideKind::West, SideKind::South),
            Corner::LowerRight => (SideKind::East, SideKind::South),
            Corner::UpperLeft => (SideKind::West, SideKind::North),
            Corner::UpperRight => (SideKind::East, SideKind::North),
        };
        Ok(Point::new(
            self.sides[x_side].inner_rail(order)?.axis(),
            self.sides[y_side].inner_rail(order)?.axis(),
        ))
    }

    /// Offers the block terminals facing each side to every rail of that side.
    pub fn connect_core<T: Technology + ?Sized>(
        &mut self,
        tech: &T,
        terminals: &PerSide<Vec<Contact>>,
    ) -> ConnectStats {
        let mut stats = ConnectStats::default();
        for (kind, contacts) in terminals.iter() {
            stats += self.sides[kind].connect(
                tech,
                contacts,
                self.config.legalize_shrink,
                &mut self.issues,
            );
        }
        self.stats += stats;
        stats
    }

    /// Offers pad pins facing each side to the rails selected by their net.
    pub fn connect_pads<T: Technology + ?Sized>(
        &mut self,
        tech: &T,
        pads: &PerSide<Vec<Contact>>,
    ) -> ConnectStats {
        let mut stats = ConnectStats::default();
        for (kind, contacts) in pads.iter() {
            stats += self.sides[kind].connect_pads(
                tech,
                contacts,
                self.config.legalize_shrink,
                &mut self.issues,
            );
        }
        self.stats += stats;
        stats
    }

    /// Draws the ring into `db` inside a single update session.
    ///
    /// Corner via stacks are drawn first, then the rails of every side,
    /// blockages along the west and east sides, and finally one blockage
    /// per corner on every layer up to the top layer. Per-via failures are
    /// collected into the returned report; configuration errors abort.
    pub fn do_layout<T, D>(&mut self, tech: &T, db: &mut D) -> Result<RingReport>
    where
        T: Technology + ?Sized,
        D: LayoutDb + ?Sized,
    {
        if self.has_layout {
            return Err(Error::AlreadyLaidOut);
        }
        let _guard = tracing::span!(Level::INFO, "ring layout", block = %self.block).entered();
        self.config.check_layers(tech)?;
        let mut db = UpdateSession::new(db);
        let mut shapes = ShapeCounts::default();

        let (lo, hi) = self.config.corner_depths();
        let width = self.config.rail_width;
        let dims = Dims::new(width[Dir::Vert], width[Dir::Horiz]);
        let mut corners: ArrayMap<Corner, Vec<ViaStack>, 4> = ArrayMap::default();
        let mut spread: ArrayMap<Corner, Option<Rect>, 4> = ArrayMap::default();
        for order in 0..self.config.rails_count {
            let net = self
                .nets
                .rail_net(order, self.config.use_clock_tree)
                .clone();
            for corner in Corner::ALL {
                let at = self.corner_point(corner, order)?;
                let mut via = ViaStack::new(net.clone(), lo, at, dims, Expansion::ALL);
                via.merge_depth(hi);
                via.do_layout(tech, &mut *db)?;
                self.issues.extend(via.take_issues());
                let box_ = &mut spread[corner];
                *box_ = Some(match *box_ {
                    Some(r) => r.add_point(at),
                    None => Rect::from_point(at),
                });
                corners[corner].push(via);
                shapes.corner_vias += 1;
            }
        }
        self.corners = corners;

        for kind in SideKind::ALL {
            let anchors = self.corner_anchors(kind)?;
            let layouts =
                self.sides[kind].do_layout(tech, &mut *db, &anchors, &mut self.issues)?;
            for layout in layouts {
                shapes.segments += layout.segments.len();
                shapes.connectors += layout.connectors.len();
            }
        }

        for kind in [SideKind::West, SideKind::East] {
            let side = &self.sides[kind];
            let Some(across) = side.cross_span() else {
                continue;
            };
            shapes.blockages += side
                .add_blockages(tech, &mut *db, &self.nets.blockage, across)?
                .len();
        }

        for rect in Corner::ALL.into_iter().filter_map(|corner| spread[corner]) {
            let rect = rect.expand(width[Dir::Vert], width[Dir::Horiz]);
            for depth in 0..=self.config.top_layer_depth {
                let layer = tech.require_routing(depth)?;
                if layer.pin_only {
                    continue;
                }
                let Some(blockage) = &layer.blockage else {
                    continue;
                };
                db.create_blockage(&self.nets.blockage, blockage, rect)?;
                shapes.blockages += 1;
            }
        }

        self.has_layout = true;
        tracing::info!(
            issues = self.issues.len(),
            errors = self.issues.num_errors(),
            "ring layout complete"
        );
        Ok(RingReport {
            issues: self.issues.clone(),
            stats: self.stats,
            shapes,
        })
    }

    /// Corner plates each rail of side `kind` runs between, one pair per order.
    fn corner_anchors(&self, kind: SideKind) -> Result<Vec<[SpinePoint; 2]>> {
        let side = &self.sides[kind];
        let dir = kind.dir();
        side.rails()
            .iter()
            .map(|rail| {
                let anchor = |corner: Corner| -> Result<SpinePoint> {
                    let via = self.corners[corner]
                        .get(rail.order())
                        .ok_or(Error::NoRail {
                            side: kind,
                            index: rail.order(),
                            count: side.rails().len(),
                        })?;
                    let shape = via
                        .plate(rail.depth())
                        .ok_or(Error::MissingPlate { depth: rail.depth() })?;
                    Ok(SpinePoint {
                        pos: via.center().coord(dir),
                        shape,
                    })
                };
                let [a, b] = kind.corners();
                Ok([anchor(a)?, anchor(b)?])
            })
            .collect()
    }
}
