// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy CRS: the map-to-layer half of a click transform.
//!
//! A map canvas draws every layer in one destination [`Crs`]; each layer keeps
//! its features in its own. Before a layer can be queried with a search
//! rectangle built in map coordinates, the rectangle has to be projected into
//! the layer's system with a [`CoordinateTransform`].
//!
//! Projection is not total. A point off the edge of the globe on an azimuthal
//! map has no geographic location, and Mercator diverges at the poles. Those
//! inputs produce [`TransformUndefined`] rather than garbage coordinates, and
//! callers decide how to recover.
//!
//! ```rust
//! use kurbo::Rect;
//! use canopy_crs::{CoordinateTransform, Crs, UndefinedReason, AUTHALIC_SPHERE_RADIUS};
//!
//! // A map in US National Atlas Equal Area, a layer in longitude/latitude.
//! let to_layer = CoordinateTransform::new(Crs::US_NATIONAL_ATLAS, Crs::Geographic);
//!
//! // Near the projection center the search rectangle is well defined.
//! let near = to_layer.transform_rect(Rect::new(-500.0, -500.0, 500.0, 500.0)).unwrap();
//! assert!(near.contains(kurbo::Point::new(-100.0, 45.0)));
//!
//! // Beyond the projected disc of the globe it is not.
//! let r = 2.0 * AUTHALIC_SPHERE_RADIUS + 1_000.0;
//! let err = to_layer.transform_rect(Rect::new(r, 0.0, r + 10.0, 10.0)).unwrap_err();
//! assert_eq!(err.reason, UndefinedReason::OutsideProjectionDomain);
//! ```
//!
//! All earth models are spheres; datum shifts are out of scope.

mod crs;
mod error;
mod transform;

pub use crs::{AUTHALIC_SPHERE_RADIUS, Crs, WEB_MERCATOR_RADIUS};
pub use error::{TransformUndefined, UndefinedReason};
pub use transform::{CoordinateTransform, DEFAULT_DENSIFY_POINTS};
