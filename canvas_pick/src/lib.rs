// Copyright 2025 the Canvas Pick Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas Pick: select map features on a zoomable canvas.
//!
//! Given a pointer position, Canvas Pick finds the topmost selectable
//! feature under it, and lets repeated taps at the same spot cycle through
//! everything stacked there.
//!
//! - A [`Registry`] maps render-item handles to their hit-test
//!   [`Geometry`] and [`Layer`]. It never owns items; entries are removed
//!   by [`Registry::deregister`] or by dropping a [`Registration`] guard.
//! - A [`CanvasBackend`] supplies the broad phase (items whose bounds touch
//!   a box), paint-order lowering, and the zoom.
//! - A [`Picker`] combines both: it expands the tap by the zoom-dependent
//!   tolerance from [`Fuzziness`], runs the exact geometric test on each
//!   candidate, and returns the hit with the highest [`StackKey`].
//! - [`Scene`] is a ready-made in-memory canvas built on
//!   [`canvas_pick_index`].
//!
//! ## Picking and cycling
//!
//! ```rust
//! use canvas_pick::{CircleGeometry, Layer, LineGeometry, PickKind, Scene};
//! use kurbo::Point;
//!
//! let mut scene = Scene::new();
//! scene.set_zoom(8.0);
//! let road = scene.insert(
//!     Layer::Ways,
//!     LineGeometry::polyline([(0.0, 0.0), (20.0, 0.0)].map(Point::from), 2.0),
//! );
//! let crossing = scene.insert(Layer::Nodes, CircleGeometry::new((10.0, 0.0), 1.0));
//! let mut picker = scene.into_picker();
//!
//! // Nodes are drawn above ways, so they win where both are hit.
//! assert_eq!(picker.item_at(Point::new(10.0, 0.5)), Some(crossing));
//! let pick = picker.pick_at(Point::new(4.0, 0.5)).unwrap();
//! assert_eq!((pick.handle, pick.kind), (road, PickKind::Segment(0)));
//!
//! // Tapping again on the same spot lowers the previous pick. Lowering
//! // stays within a layer, so the node remains above the road.
//! assert_eq!(picker.next_item_at(Point::new(10.0, 0.5), crossing), Some(crossing));
//!
//! // Removing an item deregisters it.
//! picker.canvas_mut().remove(crossing);
//! assert_eq!(picker.item_at(Point::new(10.0, 0.5)), Some(road));
//! ```
//!
//! ## Bringing your own canvas
//!
//! Toolkit scenes implement [`CanvasBackend`] and call
//! [`Registry::attach`] when they create a selectable item, storing the
//! returned guard in the item. Rendering order is owned by the registry:
//! new items go on top of their layer, and [`Picker::next_item_at`] lowers
//! the previous pick in the registry and then asks the canvas to do the
//! same in its paint order.
//!
//! This crate is `no_std` and uses `alloc`. Everything here is meant for a
//! single UI thread.

#![no_std]

extern crate alloc;

mod backend;
mod error;
mod layer;
mod picker;
mod registry;
mod scene;

pub use backend::CanvasBackend;
pub use error::RegistryError;
pub use layer::{Layer, LayerSet};
pub use picker::{Pick, PickConfig, Picker};
pub use registry::{Registration, Registry, RegistryEntry, StackKey};
pub use scene::{ItemId, Scene};

pub use canvas_pick_geometry::{
    CircleGeometry, Fuzziness, Geometry, GeometryError, LineGeometry, PickKind, PickTest,
};
pub use canvas_pick_index::backends;
