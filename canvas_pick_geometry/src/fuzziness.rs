// Copyright 2025 the Canvas Pick Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer fuzziness: how far beside a feature a tap may land and still
//! select it.

/// Parameters for turning the current zoom into a pick tolerance.
///
/// The tolerance has two parts that are added together: a floor given in
/// canvas units (meters on a projected map) and a pixel allowance that is
/// converted to canvas units with the current zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fuzziness {
    /// Tolerance in canvas units that applies at every zoom level.
    ///
    /// Must be positive so that selection never becomes zero-width.
    pub meter_floor: f64,
    /// Tolerance in screen pixels.
    pub pixel_tolerance: f64,
}

impl Default for Fuzziness {
    fn default() -> Self {
        Self {
            meter_floor: 0.5,
            pixel_tolerance: 8.0,
        }
    }
}

impl Fuzziness {
    /// Tolerance in canvas units for a zoom given in pixels per canvas unit.
    ///
    /// The result never increases as `zoom` grows and never drops below
    /// [`meter_floor`][Self::meter_floor].
    ///
    /// `zoom` must be positive; backends clamp their zoom to a positive
    /// minimum before it gets here.
    ///
    /// ```
    /// use canvas_pick_geometry::Fuzziness;
    ///
    /// let f = Fuzziness { meter_floor: 1.0, pixel_tolerance: 8.0 };
    /// assert_eq!(f.tolerance(2.0), 5.0);
    /// assert_eq!(f.tolerance(8.0), 2.0);
    /// ```
    #[inline]
    pub fn tolerance(&self, zoom: f64) -> f64 {
        debug_assert!(zoom > 0.0, "zoom must be positive, got {zoom}");
        self.meter_floor + self.pixel_tolerance / zoom
    }
}
