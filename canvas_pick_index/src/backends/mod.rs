// Copyright 2025 the Canvas Pick Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations for different spatial strategies.
//!
//! - `flatvec`: flat vector with linear scans (small, simple).
//! - `grid` (feature `backend_grid`): uniform grid with configurable cell size.

pub(crate) mod flatvec;
#[cfg(feature = "backend_grid")]
pub(crate) mod grid;

pub use flatvec::FlatVec;
#[cfg(feature = "backend_grid")]
pub use grid::Grid;
