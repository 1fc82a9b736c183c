// Copyright 2025 the Canvas Pick Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt::Debug;

use thiserror::Error;

/// Lifecycle errors reported by the registry.
///
/// These indicate a bug in the caller's item bookkeeping. The panicking
/// forms of the registry and picker operations panic with this message.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum RegistryError<H: Debug> {
    /// The item already has a geometry registered.
    #[error("item {0:?} is already registered")]
    AlreadyRegistered(H),
    /// The item has no geometry registered.
    #[error("item {0:?} is not registered")]
    NotRegistered(H),
}

impl<H: Debug + Copy> RegistryError<H> {
    /// The item the error is about.
    pub fn handle(&self) -> H {
        match *self {
            Self::AlreadyRegistered(h) | Self::NotRegistered(h) => h,
        }
    }
}
