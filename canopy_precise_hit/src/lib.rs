// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Precise Hit: exact geometry-level intersection tests for map features.
//!
//! A spatial index narrows a click down to features whose *bounding boxes*
//! touch the search rectangle. This crate answers the second question: does the
//! feature's actual geometry touch it? Concave polygons, holes, and diagonal
//! lines are where the two answers differ.
//!
//! - [`Geometry`]: points, line strings, polygons with holes, and their multi forms.
//! - [`RectIntersect`]: bounding box plus exact closed-rectangle intersection.
//! - [`predicates`]: the segment and rectangle predicates underneath.
//!
//! All tests use closed sets. A zero-area rectangle is a point query, so a click
//! with zero tolerance still hits the polygon under it, and a click exactly on a
//! boundary counts as a hit.
//!
//! ```rust
//! use canopy_precise_hit::{Geometry, Polygon, RectIntersect};
//! use kurbo::Rect;
//!
//! let parcel = Geometry::from(Polygon::from_rect(Rect::new(0.0, 0.0, 10.0, 10.0)));
//! assert!(parcel.intersects_rect(Rect::new(5.0, 5.0, 5.0, 5.0)));
//! assert!(!parcel.intersects_rect(Rect::new(99.0, 99.0, 101.0, 101.0)));
//! ```
//!
//! This crate is `no_std` and uses `alloc`. Enable `std` (default) or `libm`
//! for kurbo's float support.

#![no_std]

extern crate alloc;

mod geometry;
pub mod predicates;

use kurbo::Rect;

pub use geometry::{Geometry, LineString, Polygon, Ring};

/// Geometry that can be tested against an axis-aligned search rectangle.
pub trait RectIntersect {
    /// Axis-aligned bounds, or `None` for empty geometry.
    fn bounding_box(&self) -> Option<Rect>;

    /// Exact test: does the geometry share at least one point with the closed `rect`?
    fn intersects_rect(&self, rect: Rect) -> bool;

    /// Approximate test on bounding boxes only.
    ///
    /// Never reports a miss where [`intersects_rect`](Self::intersects_rect)
    /// reports a hit, but may report hits the exact test rejects.
    fn bbox_intersects_rect(&self, rect: Rect) -> bool {
        self.bounding_box()
            .is_some_and(|b| predicates::rects_overlap_inclusive(b, rect))
    }
}
