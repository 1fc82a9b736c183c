// Copyright 2025 the Canvas Pick Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Narrow-phase geometry for picking map features on a canvas.
//!
//! A rendered map feature is described for hit testing by a small,
//! immutable [`Geometry`] that is independent of how the feature is drawn:
//!
//! - [`CircleGeometry`]: a node or an icon marker, a disk whose radius
//!   already includes the drawn border.
//! - [`LineGeometry`]: a way, either an open polyline or a closed outline
//!   that also has an interior.
//!
//! All tests take a `tolerance` in canvas units, an additive radius that
//! widens every feature to make up for imprecise pointer input. Use
//! [`Fuzziness::tolerance`] to derive it from the current zoom.
//!
//! # Example
//!
//! ```rust
//! use canvas_pick_geometry::{Fuzziness, Geometry, LineGeometry, PickKind, PickTest};
//! use kurbo::Point;
//!
//! let building = Geometry::from(LineGeometry::polygon(
//!     [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)].map(Point::from),
//!     1.0,
//! ));
//! let tolerance = Fuzziness::default().tolerance(4.0);
//!
//! assert_eq!(building.pick_test(Point::new(5.0, 5.0), tolerance), Some(PickKind::Interior));
//! assert_eq!(building.pick_test(Point::new(5.0, 0.2), tolerance), Some(PickKind::Segment(0)));
//! assert!(!building.hits(Point::new(20.0, 20.0), tolerance));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod circle;
mod error;
mod fuzziness;
pub mod line;

use kurbo::{Point, Rect};

pub use circle::CircleGeometry;
pub use error::GeometryError;
pub use fuzziness::Fuzziness;
pub use line::LineGeometry;

/// Which part of a feature a point hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PickKind {
    /// The disk of a circle.
    Disk,
    /// The stroke of a line, at the given segment index.
    Segment(usize),
    /// The interior of a closed line.
    Interior,
}

/// Precise hit testing against a point in canvas coordinates.
pub trait PickTest {
    /// Test `pt` against the shape, widened by `tolerance`.
    ///
    /// Returns what was hit, or `None` on a miss.
    fn pick_test(&self, pt: Point, tolerance: f64) -> Option<PickKind>;

    /// Whether `pt` hits the shape.
    fn hits(&self, pt: Point, tolerance: f64) -> bool {
        self.pick_test(pt, tolerance).is_some()
    }
}

/// Hit-test geometry of one render item.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// A node or marker.
    Circle(CircleGeometry),
    /// A way or area outline.
    Line(LineGeometry),
}

impl Geometry {
    /// Conservative axis-aligned bounds, suitable for broad-phase culling.
    ///
    /// Any point that can hit with tolerance `t` lies within these bounds
    /// inflated by `t`.
    pub fn bounding_box(&self) -> Rect {
        match self {
            Self::Circle(c) => c.bounding_box(),
            Self::Line(l) => l.bounding_box(),
        }
    }

    /// The line geometry, if this is one.
    pub fn as_line(&self) -> Option<&LineGeometry> {
        match self {
            Self::Line(l) => Some(l),
            Self::Circle(_) => None,
        }
    }
}

impl PickTest for Geometry {
    fn pick_test(&self, pt: Point, tolerance: f64) -> Option<PickKind> {
        match self {
            Self::Circle(c) => c.pick_test(pt, tolerance),
            Self::Line(l) => l.pick_test(pt, tolerance),
        }
    }
}

impl From<CircleGeometry> for Geometry {
    fn from(c: CircleGeometry) -> Self {
        Self::Circle(c)
    }
}

impl From<LineGeometry> for Geometry {
    fn from(l: LineGeometry) -> Self {
        Self::Line(l)
    }
}

/// Whether `pt` hits `shape` with the given tolerance.
#[inline]
pub fn evaluate<S: PickTest + ?Sized>(shape: &S, pt: Point, tolerance: f64) -> bool {
    shape.hits(pt, tolerance)
}
