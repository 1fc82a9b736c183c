// Copyright 2025 the Canvas Pick Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid backend tuned for picking.
//!
//! Bounds are bucketed into square cells. Pick squares are usually a few
//! cells wide, so a query walks the cells it covers. When zoomed far out
//! the pick square can cover far more cells than the map occupies; the
//! query then walks the occupied cells instead. Items that would span many
//! cells (backgrounds, frisket masks, long tracks) are kept in a separate
//! list and tested on every query.

use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::HashMap;
use kurbo::{Point, Rect};
use smallvec::SmallVec;

use crate::backend::Backend;
use crate::rect::{contains_point, overlaps};

type CellCoord = (i32, i32);

/// Slots whose bounds cover more cells than this are not bucketed.
const MAX_SLOT_CELLS: u64 = 64;

/// Cell index along one axis, rounding toward -∞ and saturating.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Grid cell indices are i32; out-of-range values saturate."
)]
#[inline]
fn cell_coord(value: f64, origin: f64, cell_size: f64) -> i32 {
    let t = (value - origin) / cell_size;
    let coord = t as i32;
    if t < 0.0 && f64::from(coord) > t {
        coord.saturating_sub(1)
    } else {
        coord
    }
}

/// Inclusive block of cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct CellSpan {
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
}

impl CellSpan {
    fn count(self) -> u64 {
        let w = u64::from(self.x1.abs_diff(self.x0)) + 1;
        let h = u64::from(self.y1.abs_diff(self.y0)) + 1;
        w.saturating_mul(h)
    }

    fn contains(self, (x, y): CellCoord) -> bool {
        (self.x0..=self.x1).contains(&x) && (self.y0..=self.y1).contains(&y)
    }

    /// Lowest cell shared with `other`, when both spans meet.
    fn first_shared(self, other: Self) -> CellCoord {
        (self.x0.max(other.x0), self.y0.max(other.y0))
    }

    fn cells(self) -> impl Iterator<Item = CellCoord> {
        (self.x0..=self.x1).flat_map(move |x| (self.y0..=self.y1).map(move |y| (x, y)))
    }
}

#[derive(Clone, Debug)]
struct SlotEntry {
    bounds: Rect,
    span: CellSpan,
}

impl SlotEntry {
    fn is_wide(&self) -> bool {
        self.span.count() > MAX_SLOT_CELLS
    }
}

/// Uniform grid backend with a fixed cell size.
pub struct Grid {
    cell_size: f64,
    origin: Point,
    cells: HashMap<CellCoord, SmallVec<[usize; 8]>>,
    wide: Vec<usize>,
    slots: Vec<Option<SlotEntry>>,
}

impl Debug for Grid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Grid")
            .field("cell_size", &self.cell_size)
            .field("origin", &self.origin)
            .field("live_slots", &self.slots.iter().flatten().count())
            .field("occupied_cells", &self.cells.len())
            .field("wide_slots", &self.wide.len())
            .finish_non_exhaustive()
    }
}

impl Default for Grid {
    /// A grid with 256-unit cells, a reasonable size for projected map
    /// coordinates in meters.
    fn default() -> Self {
        Self::new(256.0)
    }
}

impl Grid {
    /// Create a grid with the given cell size and origin at (0, 0).
    pub fn new(cell_size: f64) -> Self {
        Self::with_origin(cell_size, Point::ORIGIN)
    }

    /// Create a grid with the given cell size and origin.
    pub fn with_origin(cell_size: f64, origin: Point) -> Self {
        debug_assert!(cell_size > 0.0, "grid cell_size must be strictly positive");
        Self {
            cell_size,
            origin,
            cells: HashMap::new(),
            wide: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Cell size in canvas units.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    fn span(&self, rect: &Rect) -> CellSpan {
        let x0 = cell_coord(rect.x0, self.origin.x, self.cell_size);
        let x1 = cell_coord(rect.x1, self.origin.x, self.cell_size);
        let y0 = cell_coord(rect.y0, self.origin.y, self.cell_size);
        let y1 = cell_coord(rect.y1, self.origin.y, self.cell_size);
        CellSpan {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    fn slot_entry(&self, slot: usize) -> &SlotEntry {
        self.slots
            .get(slot)
            .and_then(Option::as_ref)
            .expect("grid invariant violated: cell references a vacant slot")
    }

    fn take(&mut self, slot: usize) {
        let Some(entry) = self.slots.get_mut(slot).and_then(Option::take) else {
            return;
        };
        if entry.is_wide() {
            self.wide.retain(|&s| s != slot);
            return;
        }
        for coord in entry.span.cells() {
            let Some(cell) = self.cells.get_mut(&coord) else {
                continue;
            };
            cell.retain(|s| *s != slot);
            if cell.is_empty() {
                self.cells.remove(&coord);
            }
        }
    }

    fn place(&mut self, slot: usize, bounds: Rect) {
        let entry = SlotEntry {
            bounds,
            span: self.span(&bounds),
        };
        if entry.is_wide() {
            self.wide.push(slot);
        } else {
            for coord in entry.span.cells() {
                self.cells.entry(coord).or_default().push(slot);
            }
        }
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, || None);
        }
        self.slots[slot] = Some(entry);
    }

    // A slot bucketed in several cells is reported only from the first
    // cell it shares with the query.
    fn visit_cell<F: FnMut(usize)>(
        &self,
        coord: CellCoord,
        slots: &[usize],
        query: CellSpan,
        rect: &Rect,
        f: &mut F,
    ) {
        for &slot in slots {
            let entry = self.slot_entry(slot);
            if entry.span.first_shared(query) == coord && overlaps(&entry.bounds, rect) {
                f(slot);
            }
        }
    }
}

impl Backend for Grid {
    fn insert(&mut self, slot: usize, bounds: Rect) {
        self.take(slot);
        self.place(slot, bounds);
    }

    fn update(&mut self, slot: usize, bounds: Rect) {
        let unchanged = self
            .slots
            .get(slot)
            .and_then(Option::as_ref)
            .is_some_and(|entry| entry.bounds == bounds);
        if !unchanged {
            self.insert(slot, bounds);
        }
    }

    fn remove(&mut self, slot: usize) {
        self.take(slot);
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.wide.clear();
        self.slots.clear();
    }

    fn visit_point<F: FnMut(usize)>(&self, point: Point, mut f: F) {
        let coord = (
            cell_coord(point.x, self.origin.x, self.cell_size),
            cell_coord(point.y, self.origin.y, self.cell_size),
        );
        let bucketed = self.cells.get(&coord).map(SmallVec::as_slice).unwrap_or_default();
        for &slot in self.wide.iter().chain(bucketed) {
            if contains_point(&self.slot_entry(slot).bounds, point) {
                f(slot);
            }
        }
    }

    fn visit_rect<F: FnMut(usize)>(&self, rect: Rect, mut f: F) {
        for &slot in &self.wide {
            if overlaps(&self.slot_entry(slot).bounds, &rect) {
                f(slot);
            }
        }
        let query = self.span(&rect);
        if query.count() > self.cells.len() as u64 {
            for (&coord, slots) in &self.cells {
                if query.contains(coord) {
                    self.visit_cell(coord, slots, query, &rect, &mut f);
                }
            }
        } else {
            for coord in query.cells() {
                if let Some(slots) = self.cells.get(&coord) {
                    self.visit_cell(coord, slots, query, &rect, &mut f);
                }
            }
        }
    }
}
