//! Non-fatal diagnostics collected while building a ring.

use std::fmt::Display;

use arcstr::ArcStr;
pub use diagnostics::{Diagnostic, IssueSet, Severity};
use geometry::prelude::*;
use serde::{Deserialize, Serialize};
use shapedb::LayerId;
use tracing::Level;

use crate::side::SideKind;

/// An issue found while connecting or laying out a ring.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingIssue {
    cause: Cause,
    severity: Severity,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cause {
    /// A via plate is below the minimum area of its layer and may not grow.
    AreaTooSmall {
        net: ArcStr,
        layer: LayerId,
        at: Point,
        area: i64,
        min_area: i64,
    },
    /// A depth merge was requested on a via stack that is already laid out.
    MergeAfterLayout { net: ArcStr, at: Point, depth: usize },
    /// A contact extends beyond the span covered by the rails of a side.
    ContactOutsideRing {
        net: ArcStr,
        side: SideKind,
        bbox: Rect,
        ring: Span,
    },
    /// A via stack could not be laid out and was left out of its rail.
    ViaGeometry { net: ArcStr, at: Point, message: String },
}

impl RingIssue {
    pub(crate) fn new(cause: Cause, severity: Severity) -> Self {
        Self { cause, severity }
    }

    /// Creates a new issue and logs it at the level matching `severity`.
    pub(crate) fn new_and_log(cause: Cause, severity: Severity) -> Self {
        let result = Self::new(cause, severity);
        match severity {
            Severity::Info => tracing::event!(Level::INFO, issue = ?result.cause, "{}", result),
            Severity::Warning => tracing::event!(Level::WARN, issue = ?result.cause, "{}", result),
            Severity::Error => tracing::event!(Level::ERROR, issue = ?result.cause, "{}", result),
        }
        result
    }

    #[inline]
    pub fn cause(&self) -> &Cause {
        &self.cause
    }
}

impl Diagnostic for RingIssue {
    fn help(&self) -> Option<Box<dyn Display>> {
        let Cause::ContactOutsideRing { side, .. } = self.cause else {
            return None;
        };
        let hint = match side {
            SideKind::South | SideKind::North => "power pad is likely to be too far off west or east",
            SideKind::West | SideKind::East => "power pad is likely to be too far off north or south",
        };
        Some(Box::new(hint))
    }

    fn severity(&self) -> Severity {
        self.severity
    }
}

impl Display for RingIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity, self.cause)
    }
}

impl Display for Cause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AreaTooSmall {
                net,
                layer,
                at,
                area,
                min_area,
            } => write!(
                f,
                "area too small for `{}` in layer `{}` at {} ({} < {})",
                net, layer, at, area, min_area
            ),
            Self::MergeAfterLayout { net, at, depth } => write!(
                f,
                "cannot merge depth {} into via stack `{}` at {} after layout",
                depth, net, at
            ),
            Self::ContactOutsideRing {
                net,
                side,
                bbox,
                ring,
            } => write!(
                f,
                "contact of `{}` at {} is outside the {} rail range {}",
                net, bbox, side, ring
            ),
            Self::ViaGeometry { net, at, message } => {
                write!(f, "via stack `{}` at {} dropped: {}", net, at, message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn outside(side: SideKind) -> RingIssue {
        RingIssue::new(
            Cause::ContactOutsideRing {
                net: ArcStr::from("vdd"),
                side,
                bbox: Rect::from_sides(0, 0, 10, 10),
                ring: Span::new(20, 40),
            },
            Severity::Error,
        )
    }

    #[test]
    fn ring_issues_count_by_severity() {
        let mut issues = IssueSet::new();
        issues.add(outside(SideKind::West));
        issues.add(RingIssue::new(
            Cause::MergeAfterLayout {
                net: ArcStr::from("vss"),
                at: Point::new(0, 0),
                depth: 3,
            },
            Severity::Warning,
        ));
        assert_eq!((issues.num_errors(), issues.num_warnings()), (1, 1));
        assert!(issues.to_string().starts_with("error: contact of `vdd`"));

        let help = issues.iter().map(|issue| issue.help().map(|h| h.to_string()));
        assert_eq!(
            help.collect::<Vec<_>>(),
            vec![
                Some("power pad is likely to be too far off north or south".to_string()),
                None
            ]
        );
    }
}
