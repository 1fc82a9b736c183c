// Copyright 2025 the Canvas Pick Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The contract a canvas implements to be picked from.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use kurbo::Rect;

/// What the picker needs from a canvas toolkit.
///
/// Implementations wrap a toolkit's scene (or [`Scene`](crate::Scene)) and
/// expose three capabilities: a broad-phase box query, lowering an item in
/// paint order, and the current zoom.
pub trait CanvasBackend {
    /// Stable identifier of a render item.
    type Handle: Copy + Eq + Hash + Debug;

    /// Visit every item whose bounds intersect `rect` (edges included).
    ///
    /// Items may be reported in any order. Bounds may be conservative;
    /// the picker runs the exact test afterwards.
    fn visit_items_in_box<F: FnMut(Self::Handle)>(&self, rect: Rect, f: F);

    /// Collect every item whose bounds intersect `rect`.
    fn items_in_box(&self, rect: Rect) -> Vec<Self::Handle> {
        let mut out = Vec::new();
        self.visit_items_in_box(rect, |h| out.push(h));
        out
    }

    /// Move `handle` below its siblings in paint order.
    fn lower_to_bottom(&mut self, handle: Self::Handle);

    /// Current scale in pixels per canvas unit. Always positive.
    fn zoom(&self) -> f64;
}
