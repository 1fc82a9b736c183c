// Copyright 2025 the Canvas Pick Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inclusive rectangle predicates.
//!
//! `kurbo::Rect::contains` treats the maximum edges as exclusive. Picking
//! needs a point lying exactly on an item's bounds to count, so the index
//! uses these closed-interval versions instead.

use kurbo::{Point, Rect};

/// Whether `rect` contains `point`, edges included.
#[inline]
pub fn contains_point(rect: &Rect, point: Point) -> bool {
    rect.x0 <= point.x && rect.y0 <= point.y && point.x <= rect.x1 && point.y <= rect.y1
}

/// Whether two rectangles overlap, edges included.
///
/// Two rectangles that share only an edge or a corner are considered to
/// overlap.
///
/// ```
/// use canvas_pick_index::overlaps;
/// use kurbo::Rect;
///
/// let a = Rect::new(0.0, 0.0, 10.0, 10.0);
/// assert!(overlaps(&a, &Rect::new(10.0, 0.0, 20.0, 10.0)));
/// assert!(!overlaps(&a, &Rect::new(11.0, 0.0, 20.0, 10.0)));
/// ```
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x0 <= b.x1 && a.x1 >= b.x0 && a.y0 <= b.y1 && a.y1 >= b.y0
}

/// The square of side `2 * radius` centered on `center`.
#[inline]
pub fn square_around(center: Point, radius: f64) -> Rect {
    Rect::new(
        center.x - radius,
        center.y - radius,
        center.x + radius,
        center.y + radius,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_edges_are_inclusive() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(contains_point(&r, Point::new(10.0, 10.0)));
        assert!(contains_point(&r, Point::new(0.0, 10.0)));
        assert!(!contains_point(&r, Point::new(10.0, 10.5)));
    }

    #[test]
    fn corner_touch_overlaps() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 10.0, 12.0, 12.0);
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn square_around_is_centered() {
        let sq = square_around(Point::new(5.0, -5.0), 2.0);
        assert_eq!(sq, Rect::new(3.0, -7.0, 7.0, -3.0));
    }
}
