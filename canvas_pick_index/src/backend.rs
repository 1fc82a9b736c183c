// Copyright 2025 the Canvas Pick Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for spatial indexing implementations.

use alloc::vec::Vec;

use kurbo::{Point, Rect};

/// Spatial backend abstraction used by [`BoxIndex`][crate::BoxIndex].
///
/// Backends only know about dense `usize` slots; the index owns keys,
/// generations and payloads. All rectangles are in canvas coordinates and
/// edges are inclusive.
pub trait Backend {
    /// Insert a new slot into the spatial structure.
    fn insert(&mut self, slot: usize, bounds: Rect);

    /// Update an existing slot's bounds.
    fn update(&mut self, slot: usize, bounds: Rect);

    /// Remove a slot from the spatial structure.
    fn remove(&mut self, slot: usize);

    /// Clear all spatial structures.
    fn clear(&mut self);

    /// Visit slots whose bounds contain the point.
    fn visit_point<F: FnMut(usize)>(&self, point: Point, f: F);

    /// Visit slots whose bounds intersect the rectangle.
    fn visit_rect<F: FnMut(usize)>(&self, rect: Rect, f: F);

    /// Collect slots whose bounds intersect the rectangle.
    ///
    /// The default implementation collects [`visit_rect`][Backend::visit_rect].
    fn query_rect(&self, rect: Rect) -> Vec<usize> {
        let mut out = Vec::new();
        self.visit_rect(rect, |i| out.push(i));
        out
    }
}
