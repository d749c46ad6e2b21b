use geometry::prelude::*;
use shapedb::{LayerId, LayoutDb, Net, ShapeDb, ShapeKind, UpdateSession};
use test_log::test;

use super::{count_on, symbolic_tech, tech};
use crate::error::{ConfigError, Error};
use crate::issue::{Cause, Diagnostic, Severity};
use crate::via::{Expansion, ViaStack};

fn stack(w: i64, h: i64, bottom: usize, top: usize, expand: Expansion) -> ViaStack {
    let mut via = ViaStack::new(
        Net::power("vdd"),
        bottom,
        Point::new(0, 0),
        Dims::new(w, h),
        expand,
    );
    via.merge_depth(top);
    via
}

#[test]
fn full_cut_matrix_on_large_plate() {
    let tech = tech();
    let mut db = ShapeDb::new();
    let mut via = stack(100, 100, 1, 2, Expansion::NONE);
    {
        let mut db = UpdateSession::new(&mut db);
        via.do_layout(&tech, &mut *db).unwrap();
    }
    assert!(via.issues().is_empty());
    assert_eq!(via.cuts(1).len(), 5);
    assert!(via.cuts(1).iter().all(|row| row.len() == 5));
    assert_eq!(count_on(&db, "cut23"), 25);

    // Every cut keeps the enclosure inside the plate.
    let legal = Rect::from_sides(-50, -50, 50, 50).expand(-5, -5);
    for (_, shape) in db.shapes_on(&LayerId::new("cut23")) {
        assert_eq!(shape.kind(), ShapeKind::Cut);
        assert_eq!(shape.bbox().dims(), Dims::square(10));
        let bbox = shape.bbox();
        assert!(legal.hspan().contains(&bbox.hspan()), "{bbox} outside {legal}");
        assert!(legal.vspan().contains(&bbox.vspan()), "{bbox} outside {legal}");
    }
}

#[test]
fn cut_matrix_is_centered() {
    let tech = tech();
    let mut db = ShapeDb::new();
    let mut via = stack(90, 90, 1, 2, Expansion::NONE);
    {
        let mut db = UpdateSession::new(&mut db);
        via.do_layout(&tech, &mut *db).unwrap();
    }
    assert_eq!(via.num_cuts(), 16);
    let xs = via.cuts(1)[0]
        .iter()
        .map(|&id| db.shape(id).unwrap().bbox().center().x)
        .collect::<Vec<_>>();
    assert_eq!(xs, vec![-30, -10, 10, 30]);
}

#[test]
fn undersized_ends_warn_but_are_drawn() {
    let tech = tech();
    let mut db = ShapeDb::new();
    let mut via = stack(20, 20, 1, 3, Expansion::NONE);
    {
        let mut db = UpdateSession::new(&mut db);
        via.do_layout(&tech, &mut *db).unwrap();
    }

    let issues = via.take_issues();
    assert_eq!(issues.len(), 2);
    let layers = issues
        .iter()
        .map(|issue| {
            assert_eq!(issue.severity(), Severity::Warning);
            match issue.cause() {
                Cause::AreaTooSmall { layer, area, .. } => {
                    assert_eq!(*area, 400);
                    layer.clone()
                }
                cause => panic!("unexpected issue: {cause}"),
            }
        })
        .collect::<Vec<_>>();
    assert_eq!(layers, vec![LayerId::new("metal2"), LayerId::new("metal4")]);

    for depth in 1..=3 {
        let plate = via.plate(depth).unwrap();
        assert_eq!(db.shape(plate).unwrap().bbox().dims(), Dims::new(20, 20));
    }
    assert_eq!(count_on(&db, "cut23"), 1);
    assert_eq!(count_on(&db, "cut34"), 1);
    assert!(via.take_issues().is_empty());
}

#[test]
fn plate_too_small_for_a_cut() {
    let tech = tech();
    let mut db = ShapeDb::new();
    let mut via = stack(16, 16, 1, 2, Expansion::NONE);
    let mut session = UpdateSession::new(&mut db);
    let err = via.do_layout(&tech, &mut *session).unwrap_err();
    match err {
        Error::Geometry(e) => assert_eq!(e.cut, LayerId::new("cut23")),
        e => panic!("unexpected error: {e}"),
    }
}

#[test]
fn failed_stack_is_not_laid_out() {
    let tech = tech();
    let mut db = ShapeDb::new();
    let mut via = stack(16, 16, 1, 2, Expansion::NONE);
    {
        let mut session = UpdateSession::new(&mut db);
        for _ in 0..2 {
            let err = via.do_layout(&tech, &mut *session).unwrap_err();
            assert!(matches!(err, Error::Geometry(_)), "{err}");
            assert!(!via.has_layout());
        }
    }
    assert_eq!(via.num_cuts(), 0);
    assert!(via.plate(1).is_some());
    assert_eq!(count_on(&db, "metal2"), 1);
    assert_eq!(count_on(&db, "metal3"), 1);

    assert!(!via.merge_depth(3));
    assert_eq!(via.top_depth(), 2);
}

#[test]
fn expansion_lets_small_plates_hold_one_cut() {
    let tech = tech();
    let mut db = ShapeDb::new();
    let mut via = stack(16, 16, 1, 2, Expansion::ALL);
    {
        let mut db = UpdateSession::new(&mut db);
        via.do_layout(&tech, &mut *db).unwrap();
    }
    assert!(via.issues().is_empty());
    assert_eq!(via.num_cuts(), 1);
    let cut = db.shape(via.cuts(1)[0][0]).unwrap();
    assert_eq!(cut.bbox().center(), Point::new(0, 0));
}

#[test]
fn narrow_plates_grow_to_minimum_width() {
    let tech = tech();
    let mut db = ShapeDb::new();
    let mut via = stack(4, 30, 2, 2, Expansion::ALL);
    {
        let mut db = UpdateSession::new(&mut db);
        via.do_layout(&tech, &mut *db).unwrap();
    }
    assert_eq!(via.dims(2), Some(Dims::new(10, 30)));
    assert_eq!(via.width(), 10);
    assert_eq!(via.num_cuts(), 0);
}

#[test]
fn zero_cut_size_is_a_config_error() {
    let mut tech = tech();
    if let Some(cut) = tech.vias[1].cut.as_mut() {
        cut.min_size = 0;
    }
    let mut db = ShapeDb::new();
    let mut via = stack(100, 100, 1, 2, Expansion::ALL);
    let mut session = UpdateSession::new(&mut db);
    let err = via.do_layout(&tech, &mut *session).unwrap_err();
    assert!(
        matches!(err, Error::Config(ConfigError::ZeroCutSize(ref layer)) if *layer == LayerId::new("cut23")),
        "{err}"
    );
}

#[test]
fn zero_cut_spacing_is_a_config_error() {
    let mut tech = tech();
    if let Some(cut) = tech.vias[1].cut.as_mut() {
        cut.min_spacing = 0;
    }
    let mut db = ShapeDb::new();
    let mut via = stack(100, 100, 1, 2, Expansion::ALL);
    let mut session = UpdateSession::new(&mut db);
    let err = via.do_layout(&tech, &mut *session).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::ZeroCutSpacing(_))));
}

#[test]
fn symbolic_vias_are_single_shapes() {
    let tech = symbolic_tech();
    let mut db = ShapeDb::new();
    let mut via = stack(20, 30, 1, 3, Expansion::NONE);
    {
        let mut db = UpdateSession::new(&mut db);
        via.do_layout(&tech, &mut *db).unwrap();
    }
    assert_eq!(via.num_cuts(), 2);
    for (name, depth) in [("via23", 1), ("via34", 2)] {
        let shapes = db.shapes_on(&LayerId::new(name)).collect::<Vec<_>>();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].0, via.cuts(depth)[0][0]);
        assert_eq!(shapes[0].1.bbox().dims(), Dims::new(19, 29));
    }
}

#[test]
fn depth_range_only_grows() {
    let mut via = ViaStack::new(
        Net::ground("vss"),
        2,
        Point::new(5, 5),
        Dims::new(30, 40),
        Expansion::NONE,
    );
    assert!(via.merge_depth(4));
    assert_eq!((via.bottom_depth(), via.top_depth()), (2, 4));
    assert!(via.merge_depth(3));
    assert_eq!((via.bottom_depth(), via.top_depth()), (2, 4));
    assert!(via.merge_depth(0));
    assert_eq!((via.bottom_depth(), via.top_depth()), (0, 4));
    for depth in 0..=4 {
        assert_eq!(via.dims(depth), Some(Dims::new(30, 40)));
    }
    assert_eq!(via.dims(5), None);
}

#[test]
fn merge_after_layout_warns() {
    let tech = tech();
    let mut db = ShapeDb::new();
    let mut via = stack(40, 40, 2, 2, Expansion::NONE);
    {
        let mut db = UpdateSession::new(&mut db);
        via.do_layout(&tech, &mut *db).unwrap();
    }
    assert!(via.has_layout());
    assert!(!via.merge_depth(3));
    assert_eq!(via.top_depth(), 2);
    assert_eq!(via.issues().len(), 1);
    assert!(matches!(
        via.issues()[0].cause(),
        Cause::MergeAfterLayout { depth: 3, .. }
    ));
}

#[test]
fn layout_outside_a_session_fails() {
    let tech = tech();
    let mut db = ShapeDb::new();
    let mut via = stack(40, 40, 2, 2, Expansion::NONE);
    let err = via.do_layout(&tech, &mut db).unwrap_err();
    assert!(matches!(err, Error::Db(shapedb::Error::NoSession)));
}

#[test]
fn display_names_net_depths_and_footprint() {
    let via = stack(30, 40, 1, 3, Expansion::NONE);
    assert_eq!(via.to_string(), "<ViaStack vdd [1 3] @(0 0) 30 x 40>");
}
