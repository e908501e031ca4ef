// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in spatial backends.

mod flatvec;
#[cfg(feature = "backend_grid")]
mod grid;

pub use flatvec::FlatVec;
#[cfg(feature = "backend_grid")]
pub use grid::GridF64;
