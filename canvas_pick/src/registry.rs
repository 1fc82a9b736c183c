// Copyright 2025 the Canvas Pick Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry registry: which render items are selectable, and how.

use alloc::rc::{Rc, Weak};
use core::cell::{Ref, RefCell};
use core::fmt::Debug;
use core::hash::Hash;

use canvas_pick_geometry::Geometry;
use hashbrown::HashMap;
use log::trace;

use crate::error::RegistryError;
use crate::layer::Layer;

/// Rendering order of a registered item.
///
/// Items compare by layer first, then by their position in the layer's
/// stack. The greater key is drawn on top.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StackKey {
    /// The item's rendering layer.
    pub layer: Layer,
    /// Position within the layer. Higher is on top.
    pub stack: i64,
}

/// Geometry and placement of one registered item.
#[derive(Clone, Debug)]
pub struct RegistryEntry {
    geometry: Geometry,
    layer: Layer,
    stack: i64,
    serial: u64,
}

impl RegistryEntry {
    /// The item's hit-test geometry.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// The item's rendering layer.
    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// The item's rendering order.
    pub fn stack_key(&self) -> StackKey {
        StackKey {
            layer: self.layer,
            stack: self.stack,
        }
    }
}

struct Entries<H> {
    map: HashMap<H, RegistryEntry>,
    top: i64,
    bottom: i64,
    next_serial: u64,
}

/// Maps render-item handles to their geometry and rendering order.
///
/// The registry never owns render items. It is a shared index: cloning a
/// `Registry` yields another handle to the same entries, so a canvas and a
/// [`Picker`](crate::Picker) can both hold it.
///
/// Each newly registered item is stacked above every item registered
/// before it. [`lower_to_bottom`](Self::lower_to_bottom) moves an item
/// below every other item; since [`StackKey`] compares the layer first,
/// this only reorders the item within its own layer.
///
/// Entries must not outlive their items. Either call
/// [`deregister`](Self::deregister) from the item's destruction path, or
/// use [`attach`](Self::attach) and keep the returned [`Registration`]
/// inside the item.
///
/// Do not hold a borrow returned by [`lookup`](Self::lookup) while mutating
/// the registry; that is a `RefCell` borrow conflict and panics.
pub struct Registry<H> {
    inner: Rc<RefCell<Entries<H>>>,
}

impl<H> Clone for Registry<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<H> Debug for Registry<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut s = f.debug_struct("Registry");
        if let Ok(entries) = self.inner.try_borrow() {
            s.field("entries", &entries.map.len())
                .field("top", &entries.top)
                .field("bottom", &entries.bottom);
        }
        s.finish_non_exhaustive()
    }
}

impl<H: Copy + Eq + Hash + Debug> Default for Registry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Copy + Eq + Hash + Debug> Registry<H> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Entries {
                map: HashMap::new(),
                top: 0,
                bottom: 0,
                next_serial: 0,
            })),
        }
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.inner.borrow().map.len()
    }

    /// Whether no item is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `handle` is registered.
    pub fn contains(&self, handle: H) -> bool {
        self.inner.borrow().map.contains_key(&handle)
    }

    /// Register `handle` on top of its layer.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is already registered.
    pub fn register(&self, handle: H, geometry: impl Into<Geometry>, layer: Layer) {
        if let Err(err) = self.try_register(handle, geometry, layer) {
            panic!("{err}");
        }
    }

    /// Register `handle` on top of its layer, or report a double registration.
    pub fn try_register(
        &self,
        handle: H,
        geometry: impl Into<Geometry>,
        layer: Layer,
    ) -> Result<(), RegistryError<H>> {
        self.insert(handle, geometry.into(), layer).map(drop)
    }

    /// Remove `handle`.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is not registered.
    pub fn deregister(&self, handle: H) {
        if let Err(err) = self.try_deregister(handle) {
            panic!("{err}");
        }
    }

    /// Remove `handle` and return its entry, or report that it was unknown.
    pub fn try_deregister(&self, handle: H) -> Result<RegistryEntry, RegistryError<H>> {
        let removed = self.inner.borrow_mut().map.remove(&handle);
        trace!("deregister {handle:?}: {}", removed.is_some());
        removed.ok_or(RegistryError::NotRegistered(handle))
    }

    /// The entry for `handle`, if it is registered.
    ///
    /// An unknown handle is a normal outcome: canvases hold items that are
    /// not selectable.
    pub fn lookup(&self, handle: H) -> Option<Ref<'_, RegistryEntry>> {
        Ref::filter_map(self.inner.borrow(), |entries| entries.map.get(&handle)).ok()
    }

    /// Rendering order of `handle`, if it is registered.
    pub fn stack_key(&self, handle: H) -> Option<StackKey> {
        self.inner
            .borrow()
            .map
            .get(&handle)
            .map(RegistryEntry::stack_key)
    }

    /// Move `handle` below every other item of its layer.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is not registered.
    pub fn lower_to_bottom(&self, handle: H) {
        if let Err(err) = self.try_lower_to_bottom(handle) {
            panic!("{err}");
        }
    }

    /// Move `handle` below every other item of its layer, or report that it
    /// is unknown.
    pub fn try_lower_to_bottom(&self, handle: H) -> Result<(), RegistryError<H>> {
        let mut entries = self.inner.borrow_mut();
        let entries = &mut *entries;
        let entry = entries
            .map
            .get_mut(&handle)
            .ok_or(RegistryError::NotRegistered(handle))?;
        entries.bottom -= 1;
        entry.stack = entries.bottom;
        trace!("lower {handle:?} to {}", entry.stack);
        Ok(())
    }

    /// Take the next position above everything stacked so far, without
    /// registering anything. Used for unregistered items that share the
    /// same paint order.
    pub(crate) fn reserve_top(&self) -> i64 {
        let mut entries = self.inner.borrow_mut();
        entries.top += 1;
        entries.top
    }

    /// Take the next position below everything stacked so far.
    pub(crate) fn reserve_bottom(&self) -> i64 {
        let mut entries = self.inner.borrow_mut();
        entries.bottom -= 1;
        entries.bottom
    }

    /// Register `handle` and tie the entry's lifetime to the returned guard.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is already registered.
    pub fn attach(&self, handle: H, geometry: impl Into<Geometry>, layer: Layer) -> Registration<H> {
        match self.try_attach(handle, geometry, layer) {
            Ok(registration) => registration,
            Err(err) => panic!("{err}"),
        }
    }

    /// Register `handle` and tie the entry's lifetime to the returned guard,
    /// or report a double registration.
    pub fn try_attach(
        &self,
        handle: H,
        geometry: impl Into<Geometry>,
        layer: Layer,
    ) -> Result<Registration<H>, RegistryError<H>> {
        let serial = self.insert(handle, geometry.into(), layer)?;
        Ok(Registration {
            registry: Rc::downgrade(&self.inner),
            handle,
            serial,
        })
    }

    fn insert(&self, handle: H, geometry: Geometry, layer: Layer) -> Result<u64, RegistryError<H>> {
        let mut entries = self.inner.borrow_mut();
        if entries.map.contains_key(&handle) {
            return Err(RegistryError::AlreadyRegistered(handle));
        }
        entries.top += 1;
        entries.next_serial += 1;
        let entry = RegistryEntry {
            geometry,
            layer,
            stack: entries.top,
            serial: entries.next_serial,
        };
        trace!("register {handle:?} in {layer:?} at {}", entry.stack);
        let serial = entry.serial;
        entries.map.insert(handle, entry);
        Ok(serial)
    }
}

/// Keeps a registry entry alive for as long as its render item.
///
/// Store the guard inside the render item. Dropping it removes the entry,
/// unless the entry was already removed (and possibly re-registered under
/// the same handle) or the registry itself is gone.
#[must_use = "dropping a Registration deregisters its item"]
#[derive(Debug)]
pub struct Registration<H: Copy + Eq + Hash + Debug> {
    registry: Weak<RefCell<Entries<H>>>,
    handle: H,
    serial: u64,
}

impl<H: Copy + Eq + Hash + Debug> Registration<H> {
    /// The registered handle.
    pub fn handle(&self) -> H {
        self.handle
    }

    /// Whether the registry still holds this registration's entry.
    pub fn is_registered(&self) -> bool {
        self.registry.upgrade().is_some_and(|inner| {
            inner
                .borrow()
                .map
                .get(&self.handle)
                .is_some_and(|entry| entry.serial == self.serial)
        })
    }

    /// Deregister now. Returns whether an entry was removed.
    pub fn detach(mut self) -> bool {
        self.release()
    }

    fn release(&mut self) -> bool {
        let Some(inner) = self.registry.upgrade() else {
            return false;
        };
        let mut entries = inner.borrow_mut();
        if entries
            .map
            .get(&self.handle)
            .is_some_and(|entry| entry.serial == self.serial)
        {
            entries.map.remove(&self.handle);
            trace!("released {:?}", self.handle);
            true
        } else {
            false
        }
    }
}

impl<H: Copy + Eq + Hash + Debug> Drop for Registration<H> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use canvas_pick_geometry::CircleGeometry;

    fn dot() -> CircleGeometry {
        CircleGeometry::new((0.0, 0.0), 1.0)
    }

    #[test]
    fn register_lookup_deregister() {
        let registry: Registry<u32> = Registry::new();
        registry.register(1, dot(), Layer::Nodes);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(1));
        assert_eq!(registry.lookup(1).map(|e| e.layer()), Some(Layer::Nodes));
        assert!(registry.lookup(2).is_none());

        let entry = registry.try_deregister(1).unwrap();
        assert_eq!(entry.geometry(), &Geometry::Circle(dot()));
        assert!(registry.is_empty());
    }

    #[test]
    fn double_registration_is_reported() {
        let registry: Registry<u32> = Registry::new();
        registry.register(1, dot(), Layer::Nodes);
        assert_eq!(
            registry.try_register(1, dot(), Layer::Ways),
            Err(RegistryError::AlreadyRegistered(1))
        );
        assert_eq!(registry.lookup(1).map(|e| e.layer()), Some(Layer::Nodes));
        assert!(registry.try_attach(1, dot(), Layer::Ways).is_err());
    }

    #[test]
    #[should_panic(expected = "item 1 is already registered")]
    fn double_registration_panics() {
        let registry: Registry<u32> = Registry::new();
        registry.register(1, dot(), Layer::Nodes);
        registry.register(1, dot(), Layer::Nodes);
    }

    #[test]
    fn unknown_deregistration_is_reported() {
        let registry: Registry<u32> = Registry::new();
        registry.register(1, dot(), Layer::Nodes);
        registry.deregister(1);
        let err = registry.try_deregister(1).unwrap_err();
        assert_eq!(err, RegistryError::NotRegistered(1));
        assert_eq!(err.to_string(), "item 1 is not registered");
    }

    #[test]
    #[should_panic(expected = "item 5 is not registered")]
    fn unknown_deregistration_panics() {
        let registry: Registry<u32> = Registry::new();
        registry.deregister(5);
    }

    #[test]
    fn new_items_stack_on_top() {
        let registry: Registry<u32> = Registry::new();
        registry.register(1, dot(), Layer::Ways);
        registry.register(2, dot(), Layer::Ways);
        registry.register(3, dot(), Layer::Nodes);
        let key = |h| registry.stack_key(h).unwrap();
        assert!(key(2) > key(1));
        assert!(key(3) > key(2));
    }

    #[test]
    fn lowering_stays_within_layer() {
        let registry: Registry<u32> = Registry::new();
        registry.register(1, dot(), Layer::Ways);
        registry.register(2, dot(), Layer::Nodes);
        registry.register(3, dot(), Layer::Nodes);

        registry.lower_to_bottom(3);
        let key = |h| registry.stack_key(h).unwrap();
        assert!(key(3) < key(2), "lowered below its sibling");
        assert!(key(3) > key(1), "still above the lower layer");

        registry.lower_to_bottom(2);
        assert!(key(2) < key(3));
        assert_eq!(
            registry.try_lower_to_bottom(9),
            Err(RegistryError::NotRegistered(9))
        );
    }

    #[test]
    fn registration_drop_deregisters() {
        let registry: Registry<u32> = Registry::new();
        let guard = registry.attach(4, dot(), Layer::Nodes);
        assert_eq!(guard.handle(), 4);
        assert!(guard.is_registered());
        drop(guard);
        assert!(!registry.contains(4));
    }

    #[test]
    fn detach_reports_removal() {
        let registry: Registry<u32> = Registry::new();
        let guard = registry.attach(4, dot(), Layer::Nodes);
        assert!(guard.detach());
        assert!(registry.is_empty());

        let guard = registry.attach(4, dot(), Layer::Nodes);
        registry.deregister(4);
        assert!(!guard.is_registered());
        assert!(!guard.detach());
    }

    #[test]
    fn stale_registration_keeps_reused_handle() {
        let registry: Registry<u32> = Registry::new();
        let old = registry.attach(4, dot(), Layer::Nodes);
        registry.deregister(4);
        let new = registry.attach(4, dot(), Layer::Ways);

        drop(old);
        assert!(new.is_registered());
        assert_eq!(registry.lookup(4).map(|e| e.layer()), Some(Layer::Ways));
    }

    #[test]
    fn registration_outliving_registry_is_inert() {
        let registry: Registry<u32> = Registry::new();
        let guard = registry.attach(4, dot(), Layer::Nodes);
        drop(registry);
        assert!(!guard.is_registered());
        drop(guard);
    }

    #[test]
    fn clones_share_entries() {
        let registry: Registry<u32> = Registry::new();
        let other = registry.clone();
        other.register(1, dot(), Layer::Nodes);
        assert!(registry.contains(1));
    }
}
