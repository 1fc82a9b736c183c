// Copyright 2025 the Canvas Pick Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory canvas: items, paint order, broad phase, and zoom.

use alloc::vec::Vec;
use core::fmt::Debug;

use canvas_pick_geometry::Geometry;
use canvas_pick_index::backends::FlatVec;
use canvas_pick_index::{Backend, BoxIndex, Key as BoxKey};
use kurbo::Rect;
use log::debug;

use crate::backend::CanvasBackend;
use crate::layer::{Layer, LayerSet};
use crate::picker::Picker;
use crate::registry::{Registration, Registry};

/// Identifier for an item in a [`Scene`] (generational).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u32, u32);

impl ItemId {
    const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct Item {
    generation: u32,
    layer: Layer,
    geometry: Geometry,
    // Paint position for items the registry does not know. Registered
    // items are ordered by their registry entry.
    stack: i64,
    index_key: BoxKey,
    // Dropped together with the item, which deregisters it.
    registration: Option<Registration<ItemId>>,
}

/// A self-contained canvas for tools, tests, and headless use.
///
/// Items live in an arena with generational [`ItemId`]s, their bounds in a
/// [`BoxIndex`]. Inserting an item into one of the scene's selectable
/// layers registers its geometry in the scene's [`Registry`]; removing the
/// item deregisters it again.
///
/// Every scene owns its registry, since item ids are only unique within
/// one scene. The registry also holds the paint order: lowering an item
/// through [`Scene::registry`] is visible in [`Scene::paint_order`].
///
/// The type parameter `B` selects the broad-phase backend. It defaults to
/// [`FlatVec`]; large maps should use the grid backend.
///
/// ## Example
///
/// ```rust
/// use canvas_pick::{CircleGeometry, Layer, Scene};
/// use kurbo::Point;
///
/// let mut scene = Scene::new();
/// let lower = scene.insert(Layer::Nodes, CircleGeometry::new((0.0, 0.0), 3.0));
/// let upper = scene.insert(Layer::Nodes, CircleGeometry::new((1.0, 0.0), 3.0));
/// assert_eq!(scene.paint_order(Layer::Nodes), [lower, upper]);
///
/// let mut picker = scene.into_picker();
/// let tap = Point::new(0.5, 0.0);
/// assert_eq!(picker.item_at(tap), Some(upper));
/// assert_eq!(picker.next_item_at(tap, upper), Some(lower));
/// assert_eq!(picker.canvas().paint_order(Layer::Nodes), [upper, lower]);
/// ```
pub struct Scene<B: Backend = FlatVec> {
    items: Vec<Option<Item>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    index: BoxIndex<ItemId, B>,
    registry: Registry<ItemId>,
    selectable: LayerSet,
    zoom: f64,
}

impl<B: Backend + Debug> Debug for Scene<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scene")
            .field("items_total", &self.items.len())
            .field("items_alive", &self.len())
            .field("zoom", &self.zoom)
            .field("selectable", &self.selectable)
            .field("registry", &self.registry)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl<B: Backend + Default> Default for Scene<B> {
    fn default() -> Self {
        Self::with_backend(B::default())
    }
}

impl Scene {
    /// Create an empty scene with the flat vector backend.
    pub fn new() -> Self {
        Self::with_backend(FlatVec::default())
    }
}

impl<B: Backend> Scene<B> {
    /// Smallest zoom a scene accepts. Keeps the pick tolerance finite.
    pub const MIN_ZOOM: f64 = 1.0e-4;

    /// Create an empty scene with a specific backend and its own registry.
    pub fn with_backend(backend: B) -> Self {
        Self {
            items: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            index: BoxIndex::with_backend(backend),
            registry: Registry::new(),
            selectable: LayerSet::SELECTABLE,
            zoom: 1.0,
        }
    }

    /// Change which layers get their items registered.
    ///
    /// Only affects items inserted afterwards.
    pub fn with_selectable_layers(mut self, layers: LayerSet) -> Self {
        self.selectable = layers;
        self
    }

    /// The scene's registry, shared with its pickers.
    pub fn registry(&self) -> &Registry<ItemId> {
        &self.registry
    }

    /// Wrap the scene in a [`Picker`] that uses the scene's registry.
    pub fn into_picker(self) -> Picker<Self> {
        let registry = self.registry.clone();
        Picker::new(self, registry)
    }

    /// Number of live items.
    pub fn len(&self) -> usize {
        self.items.len() - self.free_list.len()
    }

    /// Whether the scene has no live items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current zoom.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom, clamped to at least [`MIN_ZOOM`](Self::MIN_ZOOM).
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.max(Self::MIN_ZOOM);
    }

    /// Add an item on top of its layer.
    pub fn insert(&mut self, layer: Layer, geometry: impl Into<Geometry>) -> ItemId {
        let geometry = geometry.into();
        let idx = if let Some(idx) = self.free_list.pop() {
            self.generations[idx] = self.generations[idx].wrapping_add(1);
            idx
        } else {
            self.items.push(None);
            self.generations.push(1);
            self.items.len() - 1
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ItemId uses 32-bit indices by design."
        )]
        let id = ItemId::new(idx as u32, self.generations[idx]);

        let index_key = self.index.insert(geometry.bounding_box(), id);
        let registration = self
            .selectable
            .contains_layer(layer)
            .then(|| self.registry.attach(id, geometry.clone(), layer));
        let stack = match self.registry.stack_key(id) {
            Some(key) if registration.is_some() => key.stack,
            _ => self.registry.reserve_top(),
        };
        self.items[idx] = Some(Item {
            generation: id.1,
            layer,
            geometry,
            stack,
            index_key,
            registration,
        });
        id
    }

    /// Remove an item. Stale identifiers are ignored.
    pub fn remove(&mut self, id: ItemId) -> Option<Geometry> {
        self.item(id)?;
        let item = self.items[id.idx()].take()?;
        self.index.remove(item.index_key);
        self.free_list.push(id.idx());
        Some(item.geometry)
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.free_list.clear();
        for (idx, slot) in self.items.iter_mut().enumerate() {
            *slot = None;
            self.free_list.push(idx);
        }
        self.index.clear();
    }

    /// Whether `id` refers to a live item.
    pub fn is_alive(&self, id: ItemId) -> bool {
        self.item(id).is_some()
    }

    /// Layer of a live item.
    pub fn layer_of(&self, id: ItemId) -> Option<Layer> {
        self.item(id).map(|item| item.layer)
    }

    /// Geometry of a live item.
    pub fn geometry(&self, id: ItemId) -> Option<&Geometry> {
        self.item(id).map(|item| &item.geometry)
    }

    /// Whether a live item is registered as selectable.
    pub fn is_selectable(&self, id: ItemId) -> bool {
        self.item(id).is_some_and(Self::is_registered)
    }

    /// Items of `layer` in paint order, bottom first.
    pub fn paint_order(&self, layer: Layer) -> Vec<ItemId> {
        let mut items: Vec<(i64, ItemId)> = self
            .items
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                let item = slot.as_ref()?;
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "ItemId uses 32-bit indices by design."
                )]
                let id = ItemId::new(idx as u32, item.generation);
                (item.layer == layer).then(|| (self.stack_of(id, item), id))
            })
            .collect();
        items.sort_unstable_by_key(|(stack, _)| *stack);
        items.into_iter().map(|(_, id)| id).collect()
    }

    fn stack_of(&self, id: ItemId, item: &Item) -> i64 {
        if Self::is_registered(item)
            && let Some(key) = self.registry.stack_key(id)
        {
            return key.stack;
        }
        item.stack
    }

    fn is_registered(item: &Item) -> bool {
        item.registration
            .as_ref()
            .is_some_and(Registration::is_registered)
    }

    fn item(&self, id: ItemId) -> Option<&Item> {
        let item = self.items.get(id.idx())?.as_ref()?;
        (item.generation == id.1).then_some(item)
    }

    fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        let item = self.items.get_mut(id.idx())?.as_mut()?;
        (item.generation == id.1).then_some(item)
    }
}

impl<B: Backend> CanvasBackend for Scene<B> {
    type Handle = ItemId;

    fn visit_items_in_box<F: FnMut(ItemId)>(&self, rect: Rect, mut f: F) {
        self.index.visit_rect(rect, |_, id| f(*id));
    }

    fn lower_to_bottom(&mut self, handle: ItemId) {
        let Some(registered) = self.item(handle).map(Self::is_registered) else {
            debug!("lower_to_bottom: {handle:?} is not in the scene");
            return;
        };
        let bottom = if registered {
            // Lowering twice in a row keeps the item at the bottom.
            self.registry.lower_to_bottom(handle);
            self.registry
                .stack_key(handle)
                .map_or_else(|| self.registry.reserve_bottom(), |key| key.stack)
        } else {
            self.registry.reserve_bottom()
        };
        if let Some(item) = self.item_mut(handle) {
            item.stack = bottom;
        }
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use canvas_pick_geometry::{CircleGeometry, LineGeometry};
    use kurbo::Point;

    fn dot(x: f64, y: f64) -> CircleGeometry {
        CircleGeometry::new((x, y), 2.0)
    }

    #[test]
    fn insert_registers_selectable_items_only() {
        let mut scene = Scene::new();
        let node = scene.insert(Layer::Nodes, dot(0.0, 0.0));
        let track = scene.insert(Layer::Track, dot(0.0, 0.0));
        assert_eq!(scene.len(), 2);
        assert!(scene.is_selectable(node));
        assert!(!scene.is_selectable(track));
        assert!(scene.registry().contains(node));
        assert!(!scene.registry().contains(track));
        assert_eq!(scene.layer_of(track), Some(Layer::Track));
    }

    #[test]
    fn remove_deregisters() {
        let mut scene = Scene::new();
        let id = scene.insert(Layer::Nodes, dot(0.0, 0.0));
        assert_eq!(scene.remove(id), Some(Geometry::Circle(dot(0.0, 0.0))));
        assert!(!scene.is_alive(id));
        assert!(scene.registry().is_empty());
        assert!(scene.items_in_box(Rect::new(-1.0, -1.0, 1.0, 1.0)).is_empty());
        assert_eq!(scene.remove(id), None, "stale ids are ignored");
    }

    #[test]
    fn clear_deregisters_everything() {
        let mut scene = Scene::new();
        let old = scene.insert(Layer::Nodes, dot(0.0, 0.0));
        scene.insert(Layer::Ways, dot(5.0, 0.0));
        scene.clear();
        assert!(scene.is_empty());
        assert!(scene.registry().is_empty());

        let new = scene.insert(Layer::Nodes, dot(0.0, 0.0));
        assert_ne!(old, new);
        assert!(!scene.is_alive(old));
    }

    #[test]
    fn recycled_slot_gets_new_id() {
        let mut scene = Scene::new();
        let old = scene.insert(Layer::Nodes, dot(0.0, 0.0));
        scene.remove(old);
        let new = scene.insert(Layer::Nodes, dot(9.0, 9.0));
        assert_eq!(old.idx(), new.idx());
        assert_ne!(old, new);
        assert!(!scene.registry().contains(old));
        assert!(scene.registry().contains(new));
    }

    #[test]
    fn broad_phase_reports_overlapping_items() {
        let mut scene = Scene::new();
        let a = scene.insert(Layer::Nodes, dot(0.0, 0.0));
        let b = scene.insert(Layer::Background, dot(3.0, 0.0));
        scene.insert(Layer::Nodes, dot(50.0, 0.0));
        let mut hits = scene.items_in_box(Rect::new(1.0, -1.0, 1.5, 1.0));
        hits.sort();
        assert_eq!(hits, vec![a, b]);
    }

    #[test]
    fn lowering_reorders_paint() {
        let mut scene = Scene::new();
        let a = scene.insert(Layer::Ways, dot(0.0, 0.0));
        let b = scene.insert(Layer::Ways, dot(0.0, 0.0));
        let c = scene.insert(Layer::Ways, dot(0.0, 0.0));
        assert_eq!(scene.paint_order(Layer::Ways), vec![a, b, c]);
        scene.lower_to_bottom(c);
        assert_eq!(scene.paint_order(Layer::Ways), vec![c, a, b]);
        assert!(scene.paint_order(Layer::Nodes).is_empty());
    }

    #[test]
    fn zoom_is_clamped() {
        let mut scene = Scene::new();
        scene.set_zoom(0.0);
        assert_eq!(scene.zoom(), <Scene>::MIN_ZOOM);
        scene.set_zoom(-3.0);
        assert_eq!(scene.zoom(), <Scene>::MIN_ZOOM);
        scene.set_zoom(f64::NAN);
        assert_eq!(scene.zoom(), <Scene>::MIN_ZOOM);
        scene.set_zoom(2.5);
        assert_eq!(CanvasBackend::zoom(&scene), 2.5);
    }

    #[test]
    fn overlapping_circles_cycle() {
        let mut scene = Scene::new();
        let b = scene.insert(Layer::Nodes, dot(0.0, 0.0));
        let a = scene.insert(Layer::Nodes, dot(0.5, 0.0));
        let mut picker = scene.into_picker();
        let p = Point::new(0.2, 0.0);
        assert_eq!(picker.item_at(p), Some(a));
        assert_eq!(picker.next_item_at(p, a), Some(b));
        assert_eq!(picker.next_item_at(p, b), Some(a));
        assert_eq!(picker.canvas().paint_order(Layer::Nodes), vec![b, a]);
    }

    #[test]
    fn removed_item_is_not_picked() {
        let mut scene = Scene::new();
        let node = scene.insert(Layer::Nodes, dot(0.0, 0.0));
        let mut picker = scene.into_picker();
        let p = Point::new(0.0, 0.0);
        assert_eq!(picker.item_at(p), Some(node));

        picker.canvas_mut().remove(node);
        assert_eq!(picker.item_at(p), None);

        let replacement = picker.canvas_mut().insert(Layer::Nodes, dot(40.0, 0.0));
        assert_eq!(picker.item_at(p), None);
        assert_eq!(picker.item_at(Point::new(40.0, 0.0)), Some(replacement));
    }

    #[test]
    fn background_and_decoration_are_not_picked() {
        let mut scene = Scene::new();
        scene.insert(
            Layer::Background,
            LineGeometry::polygon(
                [(-100.0, -100.0), (100.0, -100.0), (100.0, 100.0), (-100.0, 100.0)]
                    .map(Point::from),
                0.0,
            ),
        );
        scene.insert(Layer::WaysDirection, dot(0.0, 0.0));
        let way = scene.insert(
            Layer::Ways,
            LineGeometry::polyline([(0.0, 10.0), (10.0, 10.0)].map(Point::from), 2.0),
        );
        let picker = scene.into_picker();
        assert_eq!(picker.item_at(Point::new(0.0, 0.0)), None);
        assert_eq!(picker.item_at(Point::new(5.0, 10.0)), Some(way));
    }

    #[test]
    fn zoom_widens_the_pick_radius() {
        let mut scene = Scene::new();
        let node = scene.insert(Layer::Nodes, CircleGeometry::new((0.0, 0.0), 1.0));
        scene.set_zoom(1.0);
        let mut picker = scene.into_picker();
        // Tolerance is 0.5 + 8 / zoom.
        let tap = Point::new(5.0, 0.0);
        assert_eq!(picker.item_at(tap), Some(node));
        picker.canvas_mut().set_zoom(4.0);
        assert_eq!(picker.tolerance(), 2.5);
        assert_eq!(picker.item_at(tap), None);
        assert_eq!(picker.item_at(Point::new(3.4, 0.0)), Some(node));
    }

    #[test]
    fn scenes_keep_separate_registries() {
        let mut first = Scene::new();
        let mut second = Scene::new();
        let a = first.insert(Layer::Polygons, dot(0.0, 0.0));
        let b = second.insert(Layer::Nodes, dot(30.0, 0.0));
        assert_eq!(a, b, "ids are per scene");
        assert_eq!((first.registry().len(), second.registry().len()), (1, 1));

        let registry = first.registry().clone();
        let first = first.into_picker();
        let second = second.into_picker();
        assert_eq!(first.item_at(Point::new(0.0, 0.0)), Some(a));
        assert_eq!(first.item_at(Point::new(30.0, 0.0)), None);
        assert_eq!(second.item_at(Point::new(30.0, 0.0)), Some(b));
        assert_eq!(second.item_at(Point::new(0.0, 0.0)), None);

        drop(first);
        assert!(registry.is_empty());
        assert_eq!(second.registry().len(), 1);
    }

    #[test]
    fn registry_lowering_shows_in_paint_order() {
        let mut scene = Scene::new();
        let a = scene.insert(Layer::Ways, dot(0.0, 0.0));
        let b = scene.insert(Layer::Ways, dot(0.0, 0.0));
        let c = scene.insert(Layer::Ways, dot(0.0, 0.0));
        scene.registry().lower_to_bottom(c);
        assert_eq!(scene.paint_order(Layer::Ways), vec![c, a, b]);
        scene.registry().lower_to_bottom(b);
        assert_eq!(scene.paint_order(Layer::Ways), vec![b, c, a]);
    }

    #[test]
    fn unregistered_items_share_the_stack() {
        let mut scene = Scene::new().with_selectable_layers(LayerSet::NODES);
        let hidden = scene.insert(Layer::Nodes, dot(0.0, 0.0));
        scene.registry().deregister(hidden);
        let shown = scene.insert(Layer::Nodes, dot(0.0, 0.0));
        assert!(!scene.is_selectable(hidden));
        assert_eq!(scene.paint_order(Layer::Nodes), vec![hidden, shown]);
        scene.lower_to_bottom(shown);
        assert_eq!(scene.paint_order(Layer::Nodes), vec![shown, hidden]);
        scene.lower_to_bottom(hidden);
        assert_eq!(scene.paint_order(Layer::Nodes), vec![hidden, shown]);
    }

    #[test]
    fn selectable_layers_are_configurable() {
        let mut scene = Scene::new().with_selectable_layers(LayerSet::TRACK);
        let track = scene.insert(Layer::Track, dot(0.0, 0.0));
        let node = scene.insert(Layer::Nodes, dot(0.0, 0.0));
        assert!(scene.is_selectable(track));
        assert!(!scene.is_selectable(node));
    }

    #[cfg(feature = "backend_grid")]
    #[test]
    fn grid_backed_scene_picks_like_flat() {
        use canvas_pick_index::backends::Grid;

        let mut flat = Scene::new();
        let mut grid: Scene<Grid> = Scene::with_backend(Grid::new(8.0));
        for i in 0..20 {
            let x = f64::from(i) * 3.0;
            let geometry = LineGeometry::polyline([(x, -4.0), (x + 1.0, 4.0)].map(Point::from), 1.0);
            flat.insert(Layer::Ways, geometry.clone());
            grid.insert(Layer::Ways, geometry);
        }
        let flat = flat.into_picker();
        let grid = grid.into_picker();
        for i in -10..70 {
            let p = Point::new(f64::from(i) * 0.9, 0.3);
            assert_eq!(flat.item_at(p), grid.item_at(p), "at {p:?}");
        }
    }

    #[cfg(feature = "backend_grid")]
    #[test]
    fn grid_backed_scene_picks_at_min_zoom() {
        use canvas_pick_index::backends::Grid;

        let mut scene: Scene<Grid> = Scene::with_backend(Grid::new(8.0));
        let node = scene.insert(Layer::Nodes, dot(3.0, -2.0));
        scene.set_zoom(0.0);
        let picker = scene.into_picker();
        assert!(picker.tolerance() > 50_000.0);
        assert_eq!(picker.item_at(Point::new(60_000.0, 0.0)), Some(node));
    }
}
