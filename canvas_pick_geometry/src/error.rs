// Copyright 2025 the Canvas Pick Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Errors from building a geometry descriptor.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    /// A line needs at least two points.
    #[error("line geometry needs at least 2 points, got {0}")]
    TooFewPoints(usize),
}
