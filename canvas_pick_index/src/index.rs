// Copyright 2025 the Canvas Pick Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `BoxIndex` API over a pluggable backend.

use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::backend::Backend;
use crate::backends::FlatVec;

/// Generational handle for index entries.
///
/// A key stays valid until its entry is removed. Slots are recycled, but a
/// recycled slot gets a new generation, so stale keys never alias a newer
/// entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key(u32, u32);

impl Key {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Index keys are intentionally 32-bit."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Entry<P> {
    generation: u32,
    bounds: Rect,
    payload: P,
}

/// An index of axis-aligned bounds with a payload per entry.
///
/// Changes are applied to the backend immediately, so a query issued right
/// after [`insert`][Self::insert] or [`remove`][Self::remove] already sees
/// the change.
#[derive(Debug)]
pub struct BoxIndex<P, B: Backend = FlatVec> {
    entries: Vec<Option<Entry<P>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    backend: B,
}

impl<P, B: Backend + Default> Default for BoxIndex<P, B> {
    fn default() -> Self {
        Self::with_backend(B::default())
    }
}

impl<P> BoxIndex<P> {
    /// Create an empty index using the flat vector backend.
    pub fn new() -> Self {
        Self::with_backend(FlatVec::default())
    }
}

impl<P, B: Backend> BoxIndex<P, B> {
    /// Create an empty index using an explicit backend instance.
    pub fn with_backend(backend: B) -> Self {
        Self {
            entries: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            backend,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len() - self.free_list.len()
    }

    /// Whether the index holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert bounds with a payload. Returns a stable [`Key`].
    pub fn insert(&mut self, bounds: Rect, payload: P) -> Key {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].wrapping_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.entries.push(None);
            self.generations.push(1);
            (self.entries.len() - 1, 1)
        };
        self.entries[idx] = Some(Entry {
            generation,
            bounds,
            payload,
        });
        self.backend.insert(idx, bounds);
        Key::new(idx, generation)
    }

    /// Replace the bounds of a live entry. Stale keys are ignored.
    pub fn update(&mut self, key: Key, bounds: Rect) {
        if let Some(e) = self.entry_mut(key) {
            e.bounds = bounds;
            self.backend.update(key.idx(), bounds);
        }
    }

    /// Remove a live entry and return its payload.
    ///
    /// Returns `None` for stale keys.
    pub fn remove(&mut self, key: Key) -> Option<P> {
        self.entry_mut(key)?;
        let entry = self.entries[key.idx()].take()?;
        self.backend.remove(key.idx());
        self.free_list.push(key.idx());
        Some(entry.payload)
    }

    /// Remove every entry.
    ///
    /// Generations survive the clear, so keys handed out before it stay
    /// stale.
    pub fn clear(&mut self) {
        self.free_list.clear();
        for (idx, slot) in self.entries.iter_mut().enumerate() {
            *slot = None;
            self.free_list.push(idx);
        }
        self.backend.clear();
    }

    /// Bounds and payload of a live entry.
    pub fn get(&self, key: Key) -> Option<(Rect, &P)> {
        let e = self.entries.get(key.idx())?.as_ref()?;
        (e.generation == key.1).then_some((e.bounds, &e.payload))
    }

    /// Visit entries whose bounds contain the point (edges included).
    ///
    /// The order is backend-dependent.
    pub fn visit_point<F: FnMut(Key, &P)>(&self, point: Point, mut f: F) {
        self.backend.visit_point(point, |i| {
            if let Some(Some(e)) = self.entries.get(i) {
                f(Key::new(i, e.generation), &e.payload);
            }
        });
    }

    /// Visit entries whose bounds intersect the rectangle (edges included).
    ///
    /// The order is backend-dependent.
    pub fn visit_rect<F: FnMut(Key, &P)>(&self, rect: Rect, mut f: F) {
        self.backend.visit_rect(rect, |i| {
            if let Some(Some(e)) = self.entries.get(i) {
                f(Key::new(i, e.generation), &e.payload);
            }
        });
    }

    /// Collect keys of entries whose bounds intersect the rectangle.
    pub fn query_rect(&self, rect: Rect) -> Vec<Key> {
        let mut out = Vec::new();
        self.visit_rect(rect, |k, _| out.push(k));
        out
    }

    fn entry_mut(&mut self, key: Key) -> Option<&mut Entry<P>> {
        let e = self.entries.get_mut(key.idx())?.as_mut()?;
        (e.generation == key.1).then_some(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn insert_query_remove() {
        let mut idx: BoxIndex<u32> = BoxIndex::new();
        let k1 = idx.insert(Rect::new(0.0, 0.0, 10.0, 10.0), 1);
        let k2 = idx.insert(Rect::new(5.0, 5.0, 15.0, 15.0), 2);
        assert_eq!(idx.len(), 2);

        let mut hits = vec![];
        idx.visit_point(Point::new(6.0, 6.0), |_, p| hits.push(*p));
        assert_eq!(hits, vec![1, 2]);

        assert_eq!(idx.remove(k1), Some(1));
        assert_eq!(idx.query_rect(Rect::new(0.0, 0.0, 20.0, 20.0)), vec![k2]);
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn stale_key_is_ignored_after_slot_reuse() {
        let mut idx: BoxIndex<&str> = BoxIndex::new();
        let old = idx.insert(Rect::new(0.0, 0.0, 1.0, 1.0), "old");
        idx.remove(old);
        let new = idx.insert(Rect::new(0.0, 0.0, 1.0, 1.0), "new");
        assert_ne!(old, new, "recycled slot must get a new generation");

        assert_eq!(idx.remove(old), None);
        idx.update(old, Rect::new(50.0, 50.0, 60.0, 60.0));
        assert_eq!(idx.get(new).map(|(_, p)| *p), Some("new"));
        assert_eq!(
            idx.get(new).map(|(r, _)| r),
            Some(Rect::new(0.0, 0.0, 1.0, 1.0))
        );
    }

    #[test]
    fn update_moves_entry() {
        let mut idx: BoxIndex<u8> = BoxIndex::new();
        let k = idx.insert(Rect::new(0.0, 0.0, 10.0, 10.0), 7);
        idx.update(k, Rect::new(100.0, 100.0, 110.0, 110.0));
        assert!(idx.query_rect(Rect::new(0.0, 0.0, 10.0, 10.0)).is_empty());
        assert_eq!(idx.query_rect(Rect::new(105.0, 105.0, 106.0, 106.0)), vec![k]);
    }

    #[test]
    fn clear_keeps_old_keys_stale() {
        let mut idx: BoxIndex<u8> = BoxIndex::new();
        let k = idx.insert(Rect::new(0.0, 0.0, 10.0, 10.0), 7);
        idx.clear();
        assert!(idx.is_empty());
        assert!(idx.get(k).is_none());
        let k2 = idx.insert(Rect::new(0.0, 0.0, 10.0, 10.0), 8);
        assert_ne!(k, k2);
        assert!(idx.get(k).is_none());
    }

    #[cfg(feature = "backend_grid")]
    #[test]
    fn grid_backend_matches_flat_backend() {
        use crate::backends::Grid;

        let rects = [
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(-40.0, 3.0, -20.0, 80.0),
            Rect::new(300.0, 300.0, 301.0, 301.0),
            Rect::new(9.0, -5.0, 12.0, 2.0),
        ];
        let mut flat: BoxIndex<usize> = BoxIndex::new();
        let mut grid: BoxIndex<usize, Grid> = BoxIndex::with_backend(Grid::new(16.0));
        for (i, r) in rects.iter().enumerate() {
            flat.insert(*r, i);
            grid.insert(*r, i);
        }

        for query in [
            Rect::new(5.0, 0.0, 11.0, 1.0),
            Rect::new(-30.0, 50.0, -29.0, 51.0),
            Rect::new(1000.0, 1000.0, 1001.0, 1001.0),
        ] {
            let mut a = flat.query_rect(query);
            let mut b = grid.query_rect(query);
            a.sort_by_key(|k| k.idx());
            b.sort_by_key(|k| k.idx());
            assert_eq!(a, b, "backends disagree for {query:?}");
        }
    }
}
