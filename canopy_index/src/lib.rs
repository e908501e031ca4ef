// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Index: a small 2D AABB index with point and rectangle queries.
//!
//! The index is the coarse first stage of a feature hit test: it answers
//! "which features have a bounding box touching this search rectangle?" so that
//! exact geometry tests only run on a handful of candidates.
//!
//! - [`Aabb2D`]: inclusive axis-aligned box, generic over the scalar.
//! - [`IndexGeneric`]: entries of `(box, payload)` addressed by generational [`Key`]s.
//! - [`Backend`]: the spatial structure behind an index. [`backends::FlatVec`]
//!   scans linearly; [`backends::GridF64`] buckets boxes into a uniform grid
//!   (feature `backend_grid`, on by default).
//!
//! Boxes are inclusive: a zero-area query box (a click with no tolerance) still
//! intersects every box that contains the clicked point.
//!
//! ```rust
//! use canopy_index::{Aabb2D, Index};
//!
//! let mut idx = Index::<f64, &str>::new();
//! idx.insert(Aabb2D::new(0.0, 0.0, 10.0, 10.0), "parcel");
//! idx.insert(Aabb2D::new(50.0, 50.0, 60.0, 60.0), "pond");
//!
//! let hits: Vec<&str> = idx
//!     .query_rect(Aabb2D::around(5.0, 5.0, 0.0))
//!     .into_iter()
//!     .map(|(_, p)| *p)
//!     .collect();
//! assert_eq!(hits, ["parcel"]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod backend;
pub mod backends;
mod index;
mod types;

pub use backend::Backend;
pub use index::{Index, IndexGeneric};
pub use types::{Aabb2D, Key};
