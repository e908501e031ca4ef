// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Feature: feature snapshots and the store interface hit tests query.
//!
//! A [`Feature`] is an owned snapshot of one record: an id, an optional
//! [`Geometry`](canopy_precise_hit::Geometry), and ordered [`Attributes`].
//! A [`FeatureStore`] answers [`FeatureRequest`]s for a layer with a lazy
//! [`FeatureIter`]. Requests filter by a rectangle and, unless told otherwise
//! through [`RequestFlags`], test the exact geometry rather than its bounds.
//!
//! [`MemoryFeatureStore`] is a ready-made store backed by a
//! [`canopy_index`] index per layer.
//!
//! ```rust
//! use canopy_feature::{Feature, FeatureId, FeatureRequest, FeatureStore, LayerId, MemoryFeatureStore};
//! use canopy_precise_hit::Polygon;
//! use kurbo::Rect;
//!
//! let parcels = LayerId(7);
//! let mut store = MemoryFeatureStore::new();
//! store.insert(
//!     parcels,
//!     Feature::new(FeatureId(1))
//!         .with_geometry(Polygon::from_rect(Rect::new(0.0, 0.0, 10.0, 10.0)))
//!         .with_attribute("owner", "Ada"),
//! );
//!
//! // A zero-size search rectangle at (5, 5) is inside the parcel.
//! let request = FeatureRequest::new().with_filter_rect(Rect::new(5.0, 5.0, 5.0, 5.0));
//! let hits: Vec<_> = store.query(parcels, &request).collect();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].attribute("owner").map(ToString::to_string).as_deref(), Some("Ada"));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod feature;
mod memory;
mod request;
mod store;
mod value;

pub use feature::{Feature, FeatureId};
pub use memory::MemoryFeatureStore;
pub use request::{FeatureRequest, RequestFlags};
pub use store::{FeatureIter, FeatureStore, LayerId};
pub use value::{Attributes, Value};
