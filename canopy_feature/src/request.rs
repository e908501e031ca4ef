// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_precise_hit::{Geometry, RectIntersect};
use kurbo::Rect;

bitflags::bitflags! {
    /// Options controlling how a [`FeatureRequest`] is evaluated.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RequestFlags: u8 {
        /// Test the filter rectangle against the exact geometry instead of its
        /// bounding box.
        const EXACT_INTERSECT = 0b0000_0001;
        /// Return features without their geometry.
        const NO_GEOMETRY     = 0b0000_0010;
    }
}

impl Default for RequestFlags {
    fn default() -> Self {
        Self::EXACT_INTERSECT
    }
}

/// Which features a query should return.
///
/// The default request returns every feature, and filters exactly once a
/// rectangle is set.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FeatureRequest {
    filter_rect: Option<Rect>,
    flags: RequestFlags,
}

impl FeatureRequest {
    /// Request for all features with default flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request for features intersecting `rect` (edges inclusive).
    pub fn with_filter_rect(mut self, rect: Rect) -> Self {
        self.filter_rect = Some(rect.abs());
        self
    }

    /// Replaces the flags.
    pub fn with_flags(mut self, flags: RequestFlags) -> Self {
        self.flags = flags;
        self
    }

    /// The filter rectangle, if any.
    pub fn filter_rect(&self) -> Option<Rect> {
        self.filter_rect
    }

    /// The request flags.
    pub fn flags(&self) -> RequestFlags {
        self.flags
    }

    /// Returns `true` if a feature with this geometry passes the spatial filter.
    ///
    /// Without a filter rectangle everything passes. With one, features that
    /// have no geometry never pass.
    pub fn accepts(&self, geometry: Option<&Geometry>) -> bool {
        let Some(rect) = self.filter_rect else {
            return true;
        };
        let Some(geometry) = geometry else {
            return false;
        };
        if self.flags.contains(RequestFlags::EXACT_INTERSECT) {
            geometry.intersects_rect(rect)
        } else {
            geometry.bbox_intersects_rect(rect)
        }
    }
}
