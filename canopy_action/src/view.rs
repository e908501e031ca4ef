// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_crs::{CoordinateTransform, Crs, TransformUndefined};
use canopy_feature::Value;
use canopy_view2d::MapViewport;
use kurbo::{Point, Rect};

use crate::context::Scope;

/// Output resolution assumed when none is given.
pub const DEFAULT_OUTPUT_DPI: f64 = 96.0;

/// A map canvas as the dispatcher needs it: where it looks, in which
/// coordinate system, and at what output resolution.
#[derive(Clone, Debug)]
pub struct MapView {
    viewport: MapViewport,
    destination_crs: Crs,
    output_dpi: f64,
    map_id: String,
}

impl MapView {
    /// Creates a view drawing in `destination_crs`.
    pub fn new(viewport: MapViewport, destination_crs: Crs) -> Self {
        Self {
            viewport,
            destination_crs,
            output_dpi: DEFAULT_OUTPUT_DPI,
            map_id: "canvas".into(),
        }
    }

    /// Sets the output resolution. Non-finite or non-positive values are ignored.
    #[must_use]
    pub fn with_output_dpi(mut self, dpi: f64) -> Self {
        if dpi.is_finite() && dpi > 0.0 {
            self.output_dpi = dpi;
        }
        self
    }

    /// Sets the identifier exposed as the `map_id` variable.
    #[must_use]
    pub fn with_map_id(mut self, id: impl Into<String>) -> Self {
        self.map_id = id.into();
        self
    }

    /// The device/map viewport.
    pub fn viewport(&self) -> &MapViewport {
        &self.viewport
    }

    /// Mutable viewport, for panning and zooming.
    pub fn viewport_mut(&mut self) -> &mut MapViewport {
        &mut self.viewport
    }

    /// The system the map is drawn in.
    pub fn destination_crs(&self) -> Crs {
        self.destination_crs
    }

    /// Output resolution in dots per inch.
    pub fn output_dpi(&self) -> f64 {
        self.output_dpi
    }

    /// Map identifier.
    pub fn map_id(&self) -> &str {
        &self.map_id
    }

    /// Map coordinate under a device point.
    pub fn to_map_point(&self, device: Point) -> Point {
        self.viewport.device_to_map_point(device)
    }

    /// Transform from map coordinates into a layer's coordinates.
    pub fn layer_transform(&self, layer_crs: Crs) -> CoordinateTransform {
        CoordinateTransform::new(self.destination_crs, layer_crs)
    }

    /// Projects a map rectangle into a layer's coordinates.
    pub fn to_layer_rect(&self, rect: Rect, layer_crs: Crs) -> Result<Rect, TransformUndefined> {
        self.layer_transform(layer_crs).transform_rect(rect)
    }

    /// Variables describing this view, for action contexts.
    pub fn settings_scope(&self) -> Scope {
        let extent = self.viewport.visible_extent();
        Scope::new("Map Settings")
            .with_variable("map_id", self.map_id.as_str())
            .with_variable("map_rotation", 0.0)
            .with_variable("map_scale", self.viewport.scale_denominator(self.output_dpi))
            .with_variable("map_extent_width", extent.width())
            .with_variable("map_extent_height", extent.height())
            .with_variable("map_extent_center", Value::Point(extent.center()))
            .with_variable("map_crs", self.destination_crs.authid())
            .with_variable("map_units", self.destination_crs.units())
            .with_variable("map_units_per_pixel", self.viewport.map_units_per_pixel())
    }
}
