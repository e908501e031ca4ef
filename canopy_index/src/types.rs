// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned bounding boxes and index handles.

use core::fmt::Debug;

/// Axis-aligned bounding box with inclusive edges.
///
/// A box is empty when `min > max` on either axis. Zero-area boxes (a point or
/// a segment) are *not* empty: a degenerate query box built from a click with
/// zero tolerance still intersects the features under it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2D<T> {
    /// Minimum x (inclusive).
    pub min_x: T,
    /// Minimum y (inclusive).
    pub min_y: T,
    /// Maximum x (inclusive).
    pub max_x: T,
    /// Maximum y (inclusive).
    pub max_y: T,
}

impl<T: Copy + PartialOrd + Debug> Aabb2D<T> {
    /// Creates a box from its corners without normalizing them.
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates a box from two arbitrary corners, ordering each axis.
    pub fn from_corners(ax: T, ay: T, bx: T, by: T) -> Self {
        Self {
            min_x: min(ax, bx),
            min_y: min(ay, by),
            max_x: max(ax, bx),
            max_y: max(ay, by),
        }
    }

    /// Returns `true` if the box has no extent on some axis (`min > max`).
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Returns `true` if the point lies inside or on the edge of the box.
    pub fn contains_point(&self, x: T, y: T) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Intersection of two boxes. The result may be empty.
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            min_x: max(self.min_x, other.min_x),
            min_y: max(self.min_y, other.min_y),
            max_x: min(self.max_x, other.max_x),
            max_y: min(self.max_y, other.max_y),
        }
    }

    /// Returns `true` if the boxes share at least one point.
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.is_empty() && !other.is_empty() && !self.intersect(other).is_empty()
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: min(self.min_x, other.min_x),
            min_y: min(self.min_y, other.min_y),
            max_x: max(self.max_x, other.max_x),
            max_y: max(self.max_y, other.max_y),
        }
    }
}

impl Aabb2D<f64> {
    /// Creates a box from an origin and a size.
    pub fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::new(x, y, x + w, y + h)
    }

    /// Creates a square box of half-size `radius` around a point.
    pub fn around(x: f64, y: f64, radius: f64) -> Self {
        let r = radius.abs();
        Self::new(x - r, y - r, x + r, y + r)
    }
}

#[inline]
fn min<T: PartialOrd>(a: T, b: T) -> T {
    if b < a { b } else { a }
}

#[inline]
fn max<T: PartialOrd>(a: T, b: T) -> T {
    if b > a { b } else { a }
}

/// Generational handle for an entry in an [`IndexGeneric`](crate::IndexGeneric).
///
/// Removing an entry frees its slot. When the slot is reused its generation is
/// bumped, so stale keys never alias a newer entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key(pub(crate) u32, pub(crate) u32);

impl Key {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Generation of the slot this key refers to.
    pub const fn generation(self) -> u32 {
        self.1
    }
}
