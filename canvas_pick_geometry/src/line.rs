// Copyright 2025 the Canvas Pick Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polyline and polygon pick geometry for ways and areas.
//!
//! A line is tested in two stages:
//!
//! 1. Segment test, for every line: the point is within `width / 2 +
//!    tolerance` of one of its segments. Distance is measured to the
//!    segment, not the infinite line, so a point beyond an end is measured
//!    against the nearer endpoint.
//! 2. Area test, only for closed lines with at least three points: a
//!    crossing-number point-in-polygon test, relaxed so that a point within
//!    `tolerance` of any vertex also counts as inside. Ray crossing is
//!    unstable exactly at vertices, and without the relaxation the corners
//!    of thin or acute areas are hard to hit.
//!
//! A closed line with fewer than three points has no area and only takes
//! part in the segment test.

use alloc::vec::Vec;

use kurbo::{Line, Point, Rect};

use crate::{GeometryError, PickKind, PickTest};

/// An open polyline or a closed polygon outline.
#[derive(Clone, Debug, PartialEq)]
pub struct LineGeometry {
    points: Vec<Point>,
    width: f64,
    closed: bool,
}

impl LineGeometry {
    /// Create a line geometry.
    ///
    /// # Panics
    ///
    /// Panics if `points` has fewer than two entries; use
    /// [`try_new`][Self::try_new] to handle that case.
    pub fn new(points: impl Into<Vec<Point>>, width: f64, closed: bool) -> Self {
        match Self::try_new(points, width, closed) {
            Ok(line) => line,
            Err(e) => panic!("{e}"),
        }
    }

    /// Create a line geometry, failing when there are fewer than two points.
    pub fn try_new(
        points: impl Into<Vec<Point>>,
        width: f64,
        closed: bool,
    ) -> Result<Self, GeometryError> {
        let points = points.into();
        if points.len() < 2 {
            return Err(GeometryError::TooFewPoints(points.len()));
        }
        debug_assert!(width >= 0.0, "line width must not be negative");
        Ok(Self {
            points,
            width,
            closed,
        })
    }

    /// An open polyline, e.g. a road.
    pub fn polyline(points: impl Into<Vec<Point>>, width: f64) -> Self {
        Self::new(points, width, false)
    }

    /// A closed outline, e.g. a building.
    pub fn polygon(points: impl Into<Vec<Point>>, width: f64) -> Self {
        Self::new(points, width, true)
    }

    /// Vertices in drawing order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Stroke width in canvas units.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Whether the line is closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether the area test applies: closed with at least three points.
    pub fn has_area(&self) -> bool {
        self.closed && self.points.len() >= 3
    }

    /// Number of segments, including the closing one for areas.
    pub fn segment_count(&self) -> usize {
        self.points.len() - 1 + usize::from(self.has_area())
    }

    /// The segment at `index`.
    ///
    /// For areas the last index is the closing segment from the last point
    /// back to the first.
    pub fn segment(&self, index: usize) -> Option<Line> {
        let n = self.points.len();
        if index + 1 < n {
            Some(Line::new(self.points[index], self.points[index + 1]))
        } else if index + 1 == n && self.has_area() {
            Some(Line::new(self.points[n - 1], self.points[0]))
        } else {
            None
        }
    }

    /// Iterate segments in order.
    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        (0..self.segment_count()).filter_map(|i| self.segment(i))
    }

    /// Axis-aligned bounds of the stroked line.
    pub fn bounding_box(&self) -> Rect {
        let first = self.points[0];
        let hull = self.points[1..]
            .iter()
            .fold(Rect::from_points(first, first), |r, p| r.union_pt(*p));
        let half = self.width / 2.0;
        hull.inflate(half, half)
    }

    /// Index of the closest segment within `width / 2 + tolerance` of `pt`.
    ///
    /// On equal distance the lower index wins.
    pub fn nearest_segment(&self, pt: Point, tolerance: f64) -> Option<usize> {
        let reach = self.width / 2.0 + tolerance;
        let limit = reach * reach;
        let mut best: Option<(usize, f64)> = None;
        for (i, seg) in self.segments().enumerate() {
            let d2 = distance_sq_to_segment(pt, seg);
            if d2 <= limit && best.is_none_or(|(_, b)| d2 < b) {
                best = Some((i, d2));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Area test: inside by crossing number, or within `tolerance` of a
    /// vertex.
    ///
    /// Always `false` for lines without an area.
    pub fn area_contains(&self, pt: Point, tolerance: f64) -> bool {
        if !self.has_area() {
            return false;
        }
        let limit = tolerance * tolerance;
        if self.points.iter().any(|v| (pt - *v).hypot2() <= limit) {
            return true;
        }
        crossing_inside(&self.points, pt)
    }
}

impl PickTest for LineGeometry {
    fn pick_test(&self, pt: Point, tolerance: f64) -> Option<PickKind> {
        if let Some(i) = self.nearest_segment(pt, tolerance) {
            return Some(PickKind::Segment(i));
        }
        self.area_contains(pt, tolerance)
            .then_some(PickKind::Interior)
    }
}

/// Squared distance from `pt` to the closed segment `seg`.
///
/// The projection parameter is clamped to the segment, so points past
/// either end are measured against that endpoint. Zero-length segments
/// degrade to a point distance.
pub fn distance_sq_to_segment(pt: Point, seg: Line) -> f64 {
    let v = seg.p1 - seg.p0;
    let w = pt - seg.p0;
    let len2 = v.hypot2();
    let t = if len2 > 0.0 {
        (w.dot(v) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (pt - (seg.p0 + v * t)).hypot2()
}

/// Crossing-number test over the closed vertex loop.
///
/// Each edge is ordered so that `p1.x <= p2.x`. An edge toggles the result
/// when `pt.x` lies in its x-range, half-open so that a shared vertex is
/// counted once, and `pt` lies below the edge's line.
fn crossing_inside(points: &[Point], pt: Point) -> bool {
    let mut inside = false;
    let mut old = points[points.len() - 1];
    for &new in points {
        let (p1, p2) = if new.x > old.x { (old, new) } else { (new, old) };
        if (new.x < pt.x) == (pt.x <= old.x)
            && (pt.y - p1.y) * (p2.x - p1.x) < (p2.y - p1.y) * (pt.x - p1.x)
        {
            inside = !inside;
        }
        old = new;
    }
    inside
}
