// Copyright 2025 the Canvas Pick Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selection queries: the topmost item under a point, and cycling through
//! the items stacked beneath it.

use alloc::vec::Vec;

use canvas_pick_geometry::{Fuzziness, Geometry, PickKind, PickTest};
use canvas_pick_index::square_around;
use kurbo::Point;
use log::{debug, trace};

use crate::backend::CanvasBackend;
use crate::error::RegistryError;
use crate::layer::{Layer, LayerSet};
use crate::registry::{Registry, StackKey};

/// Tunables for a [`Picker`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickConfig {
    /// How far off a tap may land and still select a feature.
    pub fuzziness: Fuzziness,
    /// Layers that are searched. Items in other layers are never picked.
    pub layers: LayerSet,
}

impl Default for PickConfig {
    fn default() -> Self {
        Self {
            fuzziness: Fuzziness::default(),
            layers: LayerSet::SELECTABLE,
        }
    }
}

/// A hit returned by [`Picker::pick_at`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pick<H> {
    /// The picked item.
    pub handle: H,
    /// Its rendering layer.
    pub layer: Layer,
    /// Which part of its geometry was hit.
    pub kind: PickKind,
}

/// Answers "what is under this point" for a canvas.
///
/// Candidates come from the canvas's broad phase, are filtered through the
/// [`Registry`], tested exactly against their geometry, and ranked by
/// [`StackKey`]. The highest key wins, so for a fixed canvas state the
/// result is deterministic.
#[derive(Debug)]
pub struct Picker<C: CanvasBackend> {
    canvas: C,
    registry: Registry<C::Handle>,
    config: PickConfig,
}

impl<C: CanvasBackend> Picker<C> {
    /// Create a picker over `canvas` using `registry` and default settings.
    pub fn new(canvas: C, registry: Registry<C::Handle>) -> Self {
        Self::with_config(canvas, registry, PickConfig::default())
    }

    /// Create a picker with explicit settings.
    pub fn with_config(canvas: C, registry: Registry<C::Handle>, config: PickConfig) -> Self {
        Self {
            canvas,
            registry,
            config,
        }
    }

    /// The canvas.
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Mutable access to the canvas, e.g. to add items or change zoom.
    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    /// The registry.
    pub fn registry(&self) -> &Registry<C::Handle> {
        &self.registry
    }

    /// The current settings.
    pub fn config(&self) -> &PickConfig {
        &self.config
    }

    /// Replace the settings.
    pub fn set_config(&mut self, config: PickConfig) {
        self.config = config;
    }

    /// Split into the canvas and the registry.
    pub fn into_parts(self) -> (C, Registry<C::Handle>) {
        (self.canvas, self.registry)
    }

    /// Tolerance for the canvas's current zoom.
    pub fn tolerance(&self) -> f64 {
        self.config.fuzziness.tolerance(self.canvas.zoom())
    }

    /// Register `handle` as selectable. See [`Registry::register`].
    pub fn register_item(&self, handle: C::Handle, geometry: impl Into<Geometry>, layer: Layer) {
        self.registry.register(handle, geometry, layer);
    }

    /// Make `handle` unselectable. See [`Registry::deregister`].
    pub fn deregister_item(&self, handle: C::Handle) {
        self.registry.deregister(handle);
    }

    /// The topmost item hit at `point`, with what was hit.
    pub fn pick_at(&self, point: Point) -> Option<Pick<C::Handle>> {
        let mut best: Option<(StackKey, Pick<C::Handle>)> = None;
        self.visit_hits(point, |key, pick| {
            if best.as_ref().is_none_or(|(top, _)| key > *top) {
                best = Some((key, pick));
            }
        });
        let pick = best.map(|(_, pick)| pick);
        debug!("pick at {point:?}: {pick:?}");
        pick
    }

    /// The topmost item hit at `point`.
    pub fn item_at(&self, point: Point) -> Option<C::Handle> {
        self.pick_at(point).map(|pick| pick.handle)
    }

    /// Every item hit at `point`, topmost first.
    pub fn hits_at(&self, point: Point) -> Vec<Pick<C::Handle>> {
        let mut hits = Vec::new();
        self.visit_hits(point, |key, pick| hits.push((key, pick)));
        hits.sort_unstable_by(|(a, _), (b, _)| b.cmp(a));
        hits.into_iter().map(|(_, pick)| pick).collect()
    }

    /// Select the next item under `point`, after `previous`.
    ///
    /// This permanently moves `previous` to the bottom of its layer, both in
    /// the registry and on the canvas, and then returns
    /// [`item_at`](Self::item_at). Repeating it at the same point cycles
    /// through all overlapping items of a layer.
    ///
    /// # Panics
    ///
    /// Panics if `previous` is not registered.
    pub fn next_item_at(&mut self, point: Point, previous: C::Handle) -> Option<C::Handle> {
        match self.try_next_item_at(point, previous) {
            Ok(next) => next,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`next_item_at`](Self::next_item_at), but reports an unregistered
    /// `previous` instead of panicking. Nothing is reordered in that case.
    pub fn try_next_item_at(
        &mut self,
        point: Point,
        previous: C::Handle,
    ) -> Result<Option<C::Handle>, RegistryError<C::Handle>> {
        self.registry.try_lower_to_bottom(previous)?;
        self.canvas.lower_to_bottom(previous);
        debug!("lowered {previous:?}");
        Ok(self.item_at(point))
    }

    /// Index of the segment of `handle`'s line geometry nearest to `point`.
    ///
    /// `None` if the item is not registered, is not a line, or no segment
    /// is within reach.
    pub fn segment_at(&self, handle: C::Handle, point: Point) -> Option<usize> {
        let tolerance = self.tolerance();
        let entry = self.registry.lookup(handle)?;
        entry.geometry().as_line()?.nearest_segment(point, tolerance)
    }

    fn visit_hits(&self, point: Point, mut f: impl FnMut(StackKey, Pick<C::Handle>)) {
        let tolerance = self.tolerance();
        let query = square_around(point, tolerance);
        self.canvas.visit_items_in_box(query, |handle| {
            let Some(entry) = self.registry.lookup(handle) else {
                trace!("{handle:?}: not selectable");
                return;
            };
            if !self.config.layers.contains_layer(entry.layer()) {
                trace!("{handle:?}: layer {:?} filtered", entry.layer());
                return;
            }
            let Some(kind) = entry.geometry().pick_test(point, tolerance) else {
                trace!("{handle:?}: miss");
                return;
            };
            trace!("{handle:?}: {kind:?}");
            let pick = Pick {
                handle,
                layer: entry.layer(),
                kind,
            };
            let key = entry.stack_key();
            drop(entry);
            f(key, pick);
        });
    }
}
