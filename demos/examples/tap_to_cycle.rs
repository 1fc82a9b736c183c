// Copyright 2025 the Canvas Pick Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap-to-cycle on a small map scene.
//!
//! Builds a block of buildings, a road, a junction node, and a background
//! tile on a grid-backed [`Scene`], then taps the same spot repeatedly the
//! way a user would to reach features hidden below the first pick.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p canvas_pick_demos --example tap_to_cycle`

use canvas_pick::backends::Grid;
use canvas_pick::{CircleGeometry, ItemId, Layer, LineGeometry, Scene};
use kurbo::Point;
use log::info;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut scene: Scene<Grid> = Scene::with_backend(Grid::new(32.0));
    scene.set_zoom(2.0);

    scene.insert(
        Layer::Background,
        LineGeometry::polygon(
            [(0.0, 0.0), (256.0, 0.0), (256.0, 256.0), (0.0, 256.0)].map(Point::from),
            0.0,
        ),
    );
    let school = scene.insert(
        Layer::Polygons,
        LineGeometry::polygon(
            [(40.0, 40.0), (120.0, 40.0), (120.0, 100.0), (40.0, 100.0)].map(Point::from),
            1.0,
        ),
    );
    let playground = scene.insert(
        Layer::Polygons,
        LineGeometry::polygon(
            [(60.0, 60.0), (100.0, 60.0), (100.0, 90.0), (60.0, 90.0)].map(Point::from),
            1.0,
        ),
    );
    let road = scene.insert(
        Layer::Ways,
        LineGeometry::polyline([(0.0, 75.0), (80.0, 75.0), (200.0, 130.0)].map(Point::from), 6.0),
    );
    let junction = scene.insert(Layer::Nodes, CircleGeometry::new((80.0, 75.0), 3.0));

    let names = |id: ItemId| match id {
        id if id == school => "school",
        id if id == playground => "playground",
        id if id == road => "road",
        id if id == junction => "junction",
        _ => "?",
    };

    let mut picker = scene.into_picker();
    info!("tolerance at zoom 2: {}", picker.tolerance());

    // Everything that is hit, topmost first.
    let tap = Point::new(70.0, 74.0);
    for hit in picker.hits_at(tap) {
        info!("  {} ({:?}, {:?})", names(hit.handle), hit.layer, hit.kind);
    }

    // Each repeated tap lowers the previous pick within its layer.
    let mut current = picker.item_at(tap);
    for round in 0..4 {
        let Some(id) = current else { break };
        info!("tap {round}: {}", names(id));
        current = picker.next_item_at(tap, id);
    }

    // With the road gone, taps inside the playground alternate between the areas.
    picker.canvas_mut().remove(road);
    let inside = Point::new(70.0, 70.0);
    let mut current = picker.item_at(inside);
    for round in 0..3 {
        let Some(id) = current else { break };
        info!("area tap {round}: {}", names(id));
        current = picker.next_item_at(inside, id);
    }

    if let Some(segment) = picker.segment_at(school, Point::new(121.0, 70.0)) {
        info!("school outline segment {segment} is under the pointer");
    }
}
