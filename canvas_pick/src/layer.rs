// Copyright 2025 the Canvas Pick Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendering layers and layer sets.

/// A rendering group on the map canvas.
///
/// Variants are listed bottom to top: every item in a layer is drawn above
/// every item in the layers before it, and picking follows the same order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Layer {
    /// Background imagery.
    Background,
    /// Filled areas.
    Polygons,
    /// Highlight drawn below ways.
    WaysHighlight,
    /// Way outlines, e.g. the casing of a road.
    WaysOutline,
    /// Way strokes.
    Ways,
    /// Interior strokes of ways, e.g. the center line of a bridge.
    WaysInterior,
    /// Direction arrows on ways.
    WaysDirection,
    /// Highlight drawn below nodes.
    NodesHighlight,
    /// Nodes and icon markers.
    Nodes,
    /// Invisible nodes that become visible while highlighted.
    NodesInvisibleHighlight,
    /// Recorded GPS track.
    Track,
    /// Current GPS position.
    Gps,
    /// Dimming mask over the area outside the working bounds.
    Frisket,
    /// Shapes being drawn by an active edit tool.
    Draw,
}

impl Layer {
    /// All layers, bottom to top.
    pub const ALL: [Self; 14] = [
        Self::Background,
        Self::Polygons,
        Self::WaysHighlight,
        Self::WaysOutline,
        Self::Ways,
        Self::WaysInterior,
        Self::WaysDirection,
        Self::NodesHighlight,
        Self::Nodes,
        Self::NodesInvisibleHighlight,
        Self::Track,
        Self::Gps,
        Self::Frisket,
        Self::Draw,
    ];

    /// The single-layer set for this layer.
    pub const fn bit(self) -> LayerSet {
        LayerSet::from_bits_retain(1 << (self as u16))
    }
}

bitflags::bitflags! {
    /// A set of [`Layer`]s.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct LayerSet: u16 {
        /// [`Layer::Background`].
        const BACKGROUND                = 1 << 0;
        /// [`Layer::Polygons`].
        const POLYGONS                  = 1 << 1;
        /// [`Layer::WaysHighlight`].
        const WAYS_HIGHLIGHT            = 1 << 2;
        /// [`Layer::WaysOutline`].
        const WAYS_OUTLINE              = 1 << 3;
        /// [`Layer::Ways`].
        const WAYS                      = 1 << 4;
        /// [`Layer::WaysInterior`].
        const WAYS_INTERIOR             = 1 << 5;
        /// [`Layer::WaysDirection`].
        const WAYS_DIRECTION            = 1 << 6;
        /// [`Layer::NodesHighlight`].
        const NODES_HIGHLIGHT           = 1 << 7;
        /// [`Layer::Nodes`].
        const NODES                     = 1 << 8;
        /// [`Layer::NodesInvisibleHighlight`].
        const NODES_INVISIBLE_HIGHLIGHT = 1 << 9;
        /// [`Layer::Track`].
        const TRACK                     = 1 << 10;
        /// [`Layer::Gps`].
        const GPS                       = 1 << 11;
        /// [`Layer::Frisket`].
        const FRISKET                   = 1 << 12;
        /// [`Layer::Draw`].
        const DRAW                      = 1 << 13;

        /// Layers holding map features a user can select.
        const SELECTABLE = Self::POLYGONS.bits()
            | Self::WAYS_OUTLINE.bits()
            | Self::WAYS.bits()
            | Self::WAYS_INTERIOR.bits()
            | Self::NODES.bits()
            | Self::NODES_INVISIBLE_HIGHLIGHT.bits();
    }
}

impl LayerSet {
    /// Whether `layer` is in the set.
    pub const fn contains_layer(self, layer: Layer) -> bool {
        self.bits() & layer.bit().bits() != 0
    }
}

impl Default for LayerSet {
    fn default() -> Self {
        Self::SELECTABLE
    }
}

impl From<Layer> for LayerSet {
    fn from(layer: Layer) -> Self {
        layer.bit()
    }
}
