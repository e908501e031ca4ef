// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_feature::RequestFlags;

use crate::view::MapView;

const MILLIMETERS_PER_INCH: f64 = 25.4;

/// Scope name used for canvas clicks.
pub const CANVAS_SCOPE: &str = "Canvas";

/// Click tolerance around the pointer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SearchRadius {
    /// A fixed distance in map units.
    MapUnits(f64),
    /// A number of device pixels.
    Pixels(f64),
    /// A physical distance on screen, converted through the view's DPI.
    Millimeters(f64),
}

impl Default for SearchRadius {
    fn default() -> Self {
        Self::Millimeters(2.0)
    }
}

impl SearchRadius {
    /// The radius in map units for `view`. Negative radii count as their magnitude.
    pub fn to_map_units(self, view: &MapView) -> f64 {
        let vp = view.viewport();
        let r = match self {
            Self::MapUnits(mu) => mu,
            Self::Pixels(px) => vp.pixels_to_map_units(px),
            Self::Millimeters(mm) => {
                vp.pixels_to_map_units(mm / MILLIMETERS_PER_INCH * view.output_dpi())
            }
        };
        r.abs()
    }
}

/// Settings for a [`FeatureActionDispatcher`](crate::FeatureActionDispatcher).
#[derive(Clone, Debug, PartialEq)]
pub struct DispatchConfig {
    scope: String,
    search_radius: SearchRadius,
    request_flags: RequestFlags,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            scope: CANVAS_SCOPE.into(),
            search_radius: SearchRadius::default(),
            request_flags: RequestFlags::EXACT_INTERSECT,
        }
    }
}

impl DispatchConfig {
    /// Canvas scope, a 2 mm radius, and exact intersection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the scope actions are resolved in.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Sets the click tolerance.
    #[must_use]
    pub fn with_search_radius(mut self, radius: SearchRadius) -> Self {
        self.search_radius = radius;
        self
    }

    /// Sets the feature request flags.
    #[must_use]
    pub fn with_request_flags(mut self, flags: RequestFlags) -> Self {
        self.request_flags = flags;
        self
    }

    /// Scope actions are resolved in.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Click tolerance.
    pub fn search_radius(&self) -> SearchRadius {
        self.search_radius
    }

    /// Feature request flags.
    pub fn request_flags(&self) -> RequestFlags {
        self.request_flags
    }
}
