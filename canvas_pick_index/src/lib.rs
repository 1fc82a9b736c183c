// Copyright 2025 the Canvas Pick Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas Pick Index: the broad phase of canvas item picking.
//!
//! - Insert, update, and remove axis-aligned bounds with a payload per entry.
//! - Query by point or by intersecting rectangle; edges are inclusive.
//! - Generational [`Key`]s, so a key for a removed entry never aliases a
//!   newer entry that reuses its slot.
//!
//! Bounds are [`kurbo::Rect`]s in canvas coordinates. Higher layers compute
//! a conservative box for each drawn item (a node's disk, a way's stroked
//! outline) and feed it here; the exact geometric test happens later.
//!
//! Backends are pluggable via [`Backend`]. The default backend is a flat
//! vector (linear scan). With the `backend_grid` feature (default) a uniform
//! grid is also available.
//!
//! # Example
//!
//! ```rust
//! use canvas_pick_index::{BoxIndex, square_around};
//! use kurbo::{Point, Rect};
//!
//! let mut idx: BoxIndex<&str> = BoxIndex::new();
//! idx.insert(Rect::new(0.0, 0.0, 10.0, 10.0), "building");
//! idx.insert(Rect::new(40.0, 0.0, 41.0, 1.0), "bench");
//!
//! // Everything whose bounds touch a 4x4 square around the tap.
//! let mut hits = Vec::new();
//! idx.visit_rect(square_around(Point::new(11.0, 5.0), 2.0), |_, name| hits.push(*name));
//! assert_eq!(hits, ["building"]);
//! ```
//!
//! ## Choosing a backend
//!
//! - [`FlatVec`][backends::FlatVec] (default): linear scans. Good for small
//!   scenes and tests.
//! - [`Grid`][backends::Grid] *(feature `backend_grid`)*: uniform grid with a
//!   configurable cell size. A good fit for map canvases, where features are
//!   spread out and a pick square is small compared to the map.
//!
//! Coordinates are assumed to be finite; NaN bounds are never reported.

#![no_std]

extern crate alloc;

mod backend;
pub mod backends;
mod index;
mod rect;

pub use backend::Backend;
pub use index::{BoxIndex, Key};
pub use rect::{contains_point, overlaps, square_around};
