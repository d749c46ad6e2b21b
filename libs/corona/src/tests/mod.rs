use geometry::prelude::*;
use shapedb::{LayerId, LayoutDb, Net, ShapeDb, UpdateSession};

use crate::config::{RingConfig, RingNets};
use crate::contact::Contact;
use crate::tech::LayerStack;

mod via;

pub(crate) const TECH: &str = r#"
[[routing]]
name = "metal1"
dir = "Horiz"
min_width = 10
min_spacing = 10
min_area = 900
pitch = 40
wire_width = 10
blockage = "blockage1"
pin_only = true

[[routing]]
name = "metal2"
dir = "Vert"
min_width = 10
min_spacing = 10
min_area = 900
pitch = 40
wire_width = 10
blockage = "blockage2"

[[routing]]
name = "metal3"
dir = "Horiz"
min_width = 10
min_spacing = 10
min_area = 900
pitch = 40
wire_width = 10
blockage = "blockage3"

[[routing]]
name = "metal4"
dir = "Vert"
min_width = 10
min_spacing = 10
min_area = 900
pitch = 40
wire_width = 10
blockage = "blockage4"

[[routing]]
name = "metal5"
dir = "Horiz"
min_width = 10
min_spacing = 10
min_area = 900
pitch = 40
wire_width = 10
blockage = "blockage5"

[[vias]]
name = "via12"
top_enclosure = { h = 5, v = 5 }
bottom_enclosure = { h = 5, v = 2 }
[vias.cut]
layer = "cut12"
min_size = 10
min_spacing = 10

[[vias]]
name = "via23"
top_enclosure = { h = 5, v = 5 }
bottom_enclosure = { h = 5, v = 5 }
[vias.cut]
layer = "cut23"
min_size = 10
min_spacing = 10

[[vias]]
name = "via34"
top_enclosure = { h = 5, v = 5 }
bottom_enclosure = { h = 5, v = 5 }
[vias.cut]
layer = "cut34"
min_size = 10
min_spacing = 10

[[vias]]
name = "via45"
top_enclosure = { h = 5, v = 5 }
bottom_enclosure = { h = 5, v = 5 }
[vias.cut]
layer = "cut45"
min_size = 10
min_spacing = 10
"#;

pub(crate) const RING: &str = r#"
rails_count = 2
h_rail_width = 20
h_rail_space = 10
v_rail_width = 20
v_rail_space = 10
horizontal_depth = 2
vertical_depth = 3
top_layer_depth = 4
"#;

pub(crate) fn tech() -> LayerStack {
    LayerStack::from_toml(TECH).expect("failed to parse technology")
}

/// The same stack with vias drawn as single shapes.
pub(crate) fn symbolic_tech() -> LayerStack {
    let mut tech = tech();
    for via in tech.vias.iter_mut() {
        via.cut = None;
    }
    tech
}

pub(crate) fn ring_config() -> RingConfig {
    RingConfig::from_toml(RING).expect("failed to parse ring configuration")
}

pub(crate) fn nets() -> RingNets {
    RingNets {
        vdd: Net::power("vdd"),
        vss: Net::ground("vss"),
        ck: None,
        blockage: Net::blockage("blockagenet"),
    }
}

/// Draws a terminal into `db` and reads it back as a contact.
pub(crate) fn contact(db: &mut ShapeDb, net: &Net, layer: &str, rect: Rect) -> Contact {
    let id = {
        let mut db = UpdateSession::new(&mut *db);
        db.create_rect(net, &LayerId::new(layer), rect).unwrap()
    };
    Contact::from_db(db, id).unwrap()
}

pub(crate) fn count_on(db: &ShapeDb, layer: &str) -> usize {
    db.shapes_on(&LayerId::new(layer)).count()
}
