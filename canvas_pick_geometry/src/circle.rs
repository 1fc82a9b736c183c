// Copyright 2025 the Canvas Pick Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circular pick geometry for nodes and icon markers.

use kurbo::{Point, Rect};

use crate::{PickKind, PickTest};

/// A filled disk.
///
/// `radius` already includes the drawn border, so a tap on the border of
/// a node counts as a tap on the node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleGeometry {
    /// Center in canvas coordinates.
    pub center: Point,
    /// Radius in canvas units, border included.
    pub radius: f64,
}

impl CircleGeometry {
    /// Create a circle geometry.
    pub fn new(center: impl Into<Point>, radius: f64) -> Self {
        debug_assert!(radius >= 0.0, "circle radius must not be negative");
        Self {
            center: center.into(),
            radius,
        }
    }

    /// Axis-aligned bounds of the disk.
    pub fn bounding_box(&self) -> Rect {
        Rect::from_center_size(self.center, (2.0 * self.radius, 2.0 * self.radius))
    }
}

impl PickTest for CircleGeometry {
    /// Hit when the point is within `radius + tolerance` of the center.
    ///
    /// Compares squared distances; the boundary itself counts as a hit.
    fn pick_test(&self, pt: Point, tolerance: f64) -> Option<PickKind> {
        let reach = self.radius + tolerance;
        ((pt - self.center).hypot2() <= reach * reach).then_some(PickKind::Disk)
    }
}
