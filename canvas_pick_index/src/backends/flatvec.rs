// Copyright 2025 the Canvas Pick Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend: linear scans over every live slot.

use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::backend::Backend;
use crate::rect::{contains_point, overlaps};

/// Flat vector backend.
///
/// Queries are `O(n)` in the number of slots. This is the right choice for
/// small canvases and for tests, where predictability matters more than
/// query cost.
#[derive(Clone, Debug, Default)]
pub struct FlatVec {
    slots: Vec<Option<Rect>>,
}

impl Backend for FlatVec {
    fn insert(&mut self, slot: usize, bounds: Rect) {
        if self.slots.len() <= slot {
            self.slots.resize(slot + 1, None);
        }
        self.slots[slot] = Some(bounds);
    }

    fn update(&mut self, slot: usize, bounds: Rect) {
        self.insert(slot, bounds);
    }

    fn remove(&mut self, slot: usize) {
        if let Some(s) = self.slots.get_mut(slot) {
            *s = None;
        }
    }

    fn clear(&mut self) {
        self.slots.clear();
    }

    fn visit_point<F: FnMut(usize)>(&self, point: Point, mut f: F) {
        for (i, bounds) in self.slots.iter().enumerate() {
            if let Some(b) = bounds
                && contains_point(b, point)
            {
                f(i);
            }
        }
    }

    fn visit_rect<F: FnMut(usize)>(&self, rect: Rect, mut f: F) {
        for (i, bounds) in self.slots.iter().enumerate() {
            if let Some(b) = bounds
                && overlaps(b, &rect)
            {
                f(i);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn removed_slot_is_not_visited() {
        let mut flat = FlatVec::default();
        flat.insert(0, Rect::new(0.0, 0.0, 10.0, 10.0));
        flat.insert(3, Rect::new(0.0, 0.0, 5.0, 5.0));
        assert_eq!(flat.query_rect(Rect::new(1.0, 1.0, 2.0, 2.0)), vec![0, 3]);

        flat.remove(0);
        assert_eq!(flat.query_rect(Rect::new(1.0, 1.0, 2.0, 2.0)), vec![3]);

        // Removing an out-of-range slot is ignored.
        flat.remove(42);
    }

    #[test]
    fn point_on_edge_is_visited() {
        let mut flat = FlatVec::default();
        flat.insert(0, Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut hits = vec![];
        flat.visit_point(Point::new(10.0, 0.0), |s| hits.push(s));
        assert_eq!(hits, vec![0]);
    }
}
