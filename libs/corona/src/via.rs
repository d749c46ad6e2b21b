//! Multi-layer via stacks.
//!
//! A [`ViaStack`] connects a contiguous range of routing depths at one
//! location. Laying it out draws one conductor plate per depth and, between
//! each pair of adjacent depths, either a matrix of cuts or, for technologies
//! without cut rules, a single via shape.

use std::collections::BTreeMap;

use geometry::prelude::*;
use serde::{Deserialize, Serialize};
use shapedb::{LayoutDb, Net, ShapeId};

use crate::error::{ConfigError, Error, GeometryError, Result};
use crate::issue::{Cause, RingIssue, Severity};
use crate::tech::{CutRules, Technology};

/// Shrink applied to symbolic vias relative to the plate below.
const SYMBOLIC_VIA_SHRINK: i64 = 1;

/// Which parts of a via stack may grow to satisfy design rules.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Expansion {
    /// The top plate may be enlarged to reach minimum area.
    pub top: bool,
    /// The bottom plate may be enlarged to reach minimum area.
    pub bottom: bool,
    /// Plates may grow horizontally.
    pub horiz: bool,
    /// Plates may grow vertically.
    pub vert: bool,
}

impl Expansion {
    pub const NONE: Self = Self {
        top: false,
        bottom: false,
        horiz: false,
        vert: false,
    };

    pub const ALL: Self = Self {
        top: true,
        bottom: true,
        horiz: true,
        vert: true,
    };

    /// Whether plates may grow along `dir`.
    #[inline]
    pub fn along(&self, dir: Dir) -> bool {
        match dir {
            Dir::Horiz => self.horiz,
            Dir::Vert => self.vert,
        }
    }
}

/// A via construction spanning the depths `bottom..=top` at a fixed location.
#[derive(Debug, Clone)]
pub struct ViaStack {
    net: Net,
    center: Point,
    bottom: usize,
    top: usize,
    dims: BTreeMap<usize, Dims>,
    expand: Expansion,
    plates: BTreeMap<usize, ShapeId>,
    cuts: BTreeMap<usize, Vec<Vec<ShapeId>>>,
    has_layout: bool,
    issues: Vec<RingIssue>,
}

impl ViaStack {
    /// Creates a single-depth via stack with footprint `dims` centered on `center`.
    pub fn new(net: Net, depth: usize, center: Point, dims: Dims, expand: Expansion) -> Self {
        Self {
            net,
            center,
            bottom: depth,
            top: depth,
            dims: BTreeMap::from([(depth, dims)]),
            expand,
            plates: BTreeMap::new(),
            cuts: BTreeMap::new(),
            has_layout: false,
            issues: Vec::new(),
        }
    }

    #[inline]
    pub fn net(&self) -> &Net {
        &self.net
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    #[inline]
    pub fn bottom_depth(&self) -> usize {
        self.bottom
    }

    #[inline]
    pub fn top_depth(&self) -> usize {
        self.top
    }

    /// Returns `true` once every plate and cut of the stack has been drawn.
    #[inline]
    pub fn has_layout(&self) -> bool {
        self.has_layout
    }

    /// The footprint at `depth`, if the stack covers it.
    pub fn dims(&self, depth: usize) -> Option<Dims> {
        self.dims.get(&depth).copied()
    }

    /// The largest width over all depths.
    pub fn width(&self) -> i64 {
        self.dims.values().map(Dims::w).max().unwrap_or_default()
    }

    /// The largest height over all depths.
    pub fn height(&self) -> i64 {
        self.dims.values().map(Dims::h).max().unwrap_or_default()
    }

    /// The bounding box of the largest footprint.
    pub fn bbox(&self) -> Rect {
        Rect::from_center_dims(self.center, Dims::new(self.width(), self.height()))
    }

    /// The plate drawn at `depth`. `None` before layout.
    pub fn plate(&self, depth: usize) -> Option<ShapeId> {
        self.plates.get(&depth).copied()
    }

    /// Rows of cuts between `depth` and `depth + 1`, bottom row first.
    pub fn cuts(&self, depth: usize) -> &[Vec<ShapeId>] {
        self.cuts.get(&depth).map(Vec::as_slice).unwrap_or_default()
    }

    /// The total number of cuts drawn.
    pub fn num_cuts(&self) -> usize {
        self.cuts.values().flatten().map(Vec::len).sum()
    }

    /// Diagnostics recorded so far.
    pub fn issues(&self) -> &[RingIssue] {
        &self.issues
    }

    /// Removes and returns the diagnostics recorded so far.
    pub fn take_issues(&mut self) -> Vec<RingIssue> {
        std::mem::take(&mut self.issues)
    }

    /// Extends the depth range to include `depth`.
    ///
    /// New depths copy the footprint of the current top depth. The range
    /// never shrinks. Once layout has drawn anything the stack is frozen:
    /// the call records a warning and returns `false`.
    pub fn merge_depth(&mut self, depth: usize) -> bool {
        if self.has_layout || !self.plates.is_empty() {
            self.issues.push(RingIssue::new_and_log(
                Cause::MergeAfterLayout {
                    net: self.net.name().clone(),
                    at: self.center,
                    depth,
                },
                Severity::Warning,
            ));
            return false;
        }
        let template = self.dims[&self.top];
        for d in depth..self.bottom {
            self.dims.insert(d, template);
        }
        for d in self.top + 1..=depth {
            self.dims.insert(d, template);
        }
        self.bottom = self.bottom.min(depth);
        self.top = self.top.max(depth);
        true
    }

    /// Draws the plates and cuts of this stack into `db`.
    ///
    /// A plate too small for a single cut fails with [`GeometryError`]; a
    /// cut layer with zero size or spacing fails with [`ConfigError`].
    /// Plates below minimum area are drawn anyway and recorded as warnings.
    ///
    /// Plates and cut matrices drawn by an earlier call are kept, so calling
    /// again after a failure draws nothing twice and fails the same way.
    /// The stack only counts as laid out once every depth transition has
    /// its cuts.
    pub fn do_layout<T, D>(&mut self, tech: &T, db: &mut D) -> Result<()>
    where
        T: Technology + ?Sized,
        D: LayoutDb + ?Sized,
    {
        if self.has_layout {
            tracing::debug!("{} is already laid out", self);
            return Ok(());
        }

        for (&depth, dims) in self.dims.iter_mut() {
            let min_width = tech.require_routing(depth)?.min_width;
            if dims.w() < min_width && self.expand.horiz {
                dims.set_w(min_width);
            }
            if dims.h() < min_width && self.expand.vert {
                dims.set_h(min_width);
            }
        }

        for depth in self.bottom..=self.top {
            if self.plates.contains_key(&depth) {
                continue;
            }
            let layer = tech.require_routing(depth)?;
            let dims = self.dims[&depth];
            if dims.area() < layer.min_area {
                let frozen = (depth == self.bottom && !self.expand.bottom)
                    || (depth == self.top && !self.expand.top);
                if frozen {
                    self.issues.push(RingIssue::new_and_log(
                        Cause::AreaTooSmall {
                            net: self.net.name().clone(),
                            layer: layer.name.clone(),
                            at: self.center,
                            area: dims.area(),
                            min_area: layer.min_area,
                        },
                        Severity::Warning,
                    ));
                }
            }
            let plate = db.create_rect(
                &self.net,
                &layer.name,
                Rect::from_center_dims(self.center, dims),
            )?;
            self.plates.insert(depth, plate);
        }
        for depth in self.bottom..self.top {
            if self.cuts.contains_key(&depth) {
                continue;
            }
            let via = tech.require_via(depth)?;
            match &via.cut {
                Some(cut) => {
                    let enclosure = via.enclosure();
                    self.draw_cut_matrix(db, depth, cut, enclosure)?;
                }
                None => {
                    let dims = self.dims[&depth];
                    let shrunk = Dims::new(
                        dims.w() - SYMBOLIC_VIA_SHRINK,
                        dims.h() - SYMBOLIC_VIA_SHRINK,
                    );
                    let id = db.create_rect(
                        &self.net,
                        &via.name,
                        Rect::from_center_dims(self.center, shrunk),
                    )?;
                    self.cuts.insert(depth, vec![vec![id]]);
                }
            }
        }
        self.has_layout = true;
        Ok(())
    }

    fn draw_cut_matrix<D: LayoutDb + ?Sized>(
        &mut self,
        db: &mut D,
        depth: usize,
        cut: &CutRules,
        enclosure: i64,
    ) -> Result<()> {
        if cut.min_size == 0 {
            return Err(ConfigError::ZeroCutSize(cut.layer.clone()).into());
        }
        if cut.min_spacing == 0 {
            return Err(ConfigError::ZeroCutSpacing(cut.layer.clone()).into());
        }

        let plate = self
            .plate(depth)
            .ok_or(Error::MissingPlate { depth })?;
        let mut area = db.shape(plate)?.bbox();

        let mut half = [0; 2];
        for (i, dir) in Dir::ALL.into_iter().enumerate() {
            let extent = area.span(dir).length();
            let mut enc = enclosure + cut.min_size / 2;
            if enc * 2 > extent {
                if self.expand.along(dir) {
                    enc = extent / 2;
                } else {
                    return Err(GeometryError {
                        via: self.to_string(),
                        cut: cut.layer.clone(),
                        dir,
                    }
                    .into());
                }
            }
            half[i] = enc;
        }
        area = area.expand(-half[0], -half[1]);

        let pitch = cut.pitch();
        let xoffset = (area.width() % pitch) / 2;
        let yoffset = (area.height() % pitch) / 2;
        area = area.translate(xoffset, yoffset);
        tracing::trace!(
            depth,
            enclosure,
            area = %area,
            "drawing cut matrix for {}", self
        );

        let mut rows = Vec::new();
        let mut y = area.bot();
        while y <= area.top() {
            let mut row = Vec::new();
            let mut x = area.left();
            while x <= area.right() {
                row.push(db.create_cut(&self.net, &cut.layer, Point::new(x, y), cut.min_size)?);
                x += pitch;
            }
            rows.push(row);
            y += pitch;
        }
        self.cuts.insert(depth, rows);
        Ok(())
    }
}

impl std::fmt::Display for ViaStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let top = self.dims[&self.top];
        write!(
            f,
            "<ViaStack {} [{} {}] @{} {} x {}>",
            self.net,
            self.bottom,
            self.top,
            self.center,
            top.w(),
            top.h()
        )
    }
}
