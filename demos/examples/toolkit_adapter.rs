// Copyright 2025 the Canvas Pick Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapting a toolkit canvas to `canvas_pick`.
//!
//! A toolkit scene owns its render items and hands out integer handles. To
//! make it pickable it implements [`CanvasBackend`], and each selectable
//! item keeps the [`Registration`] returned by [`Registry::attach`], so the
//! registry entry disappears with the item no matter which code path
//! deletes it.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p canvas_pick_demos --example toolkit_adapter`

use std::collections::BTreeMap;

use canvas_pick::{
    CanvasBackend, CircleGeometry, Geometry, Layer, LineGeometry, PickConfig, Picker,
    Registration, Registry,
};
use canvas_pick_index::overlaps;
use kurbo::{Point, Rect};
use log::info;

/// A render item as a toolkit would store it.
#[derive(Debug)]
struct ToolkitItem {
    bounds: Rect,
    layer: Layer,
    z: i64,
    _selectable: Option<Registration<u64>>,
}

/// Stand-in for a toolkit's retained scene graph.
#[derive(Debug)]
struct ToolkitCanvas {
    items: BTreeMap<u64, ToolkitItem>,
    registry: Registry<u64>,
    next_handle: u64,
    zoom: f64,
}

impl ToolkitCanvas {
    fn new(registry: Registry<u64>) -> Self {
        Self {
            items: BTreeMap::new(),
            registry,
            next_handle: 1,
            zoom: 1.0,
        }
    }

    fn add(&mut self, layer: Layer, geometry: impl Into<Geometry>, selectable: bool) -> u64 {
        let geometry = geometry.into();
        let handle = self.next_handle;
        self.next_handle += 1;
        let top = self.items.values().map(|i| i.z).max().unwrap_or(0) + 1;
        let registration = selectable.then(|| self.registry.attach(handle, geometry.clone(), layer));
        self.items.insert(
            handle,
            ToolkitItem {
                bounds: geometry.bounding_box(),
                layer,
                z: top,
                _selectable: registration,
            },
        );
        handle
    }

    fn delete(&mut self, handle: u64) {
        self.items.remove(&handle);
    }
}

impl CanvasBackend for ToolkitCanvas {
    type Handle = u64;

    fn visit_items_in_box<F: FnMut(u64)>(&self, rect: Rect, mut f: F) {
        for (handle, item) in &self.items {
            if overlaps(&item.bounds, &rect) {
                f(*handle);
            }
        }
    }

    fn lower_to_bottom(&mut self, handle: u64) {
        let bottom = self.items.values().map(|i| i.z).min().unwrap_or(0) - 1;
        if let Some(item) = self.items.get_mut(&handle) {
            info!("toolkit: lowering {handle} in {:?}", item.layer);
            item.z = bottom;
        }
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let registry = Registry::new();
    let mut canvas = ToolkitCanvas::new(registry.clone());
    canvas.zoom = 4.0;

    let bench = canvas.add(Layer::Nodes, CircleGeometry::new((10.0, 10.0), 1.5), true);
    let tree = canvas.add(Layer::Nodes, CircleGeometry::new((11.0, 10.0), 1.5), true);
    let path = canvas.add(
        Layer::Ways,
        LineGeometry::polyline([(0.0, 10.0), (30.0, 10.0)].map(Point::from), 1.0),
        true,
    );
    let arrow = canvas.add(Layer::WaysDirection, CircleGeometry::new((10.5, 10.0), 1.0), false);
    info!("bench={bench} tree={tree} path={path} arrow={arrow}");

    let mut picker = Picker::with_config(canvas, registry, PickConfig::default());
    let tap = Point::new(10.5, 10.2);

    let first = picker.item_at(tap);
    info!("first tap: {first:?}");
    if let Some(first) = first {
        let second = picker.next_item_at(tap, first);
        info!("second tap: {second:?}");
    }

    // Deleting the item drops its registration.
    picker.canvas_mut().delete(tree);
    info!(
        "after deleting the tree: {:?}, {} registered",
        picker.item_at(tap),
        picker.registry().len()
    );

    if let Some(segment) = picker.segment_at(path, Point::new(20.0, 10.3)) {
        info!("path segment {segment} is under the pointer");
    }
}
