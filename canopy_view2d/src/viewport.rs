// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Vec2};

use crate::modes::YAxis;

const METERS_PER_INCH: f64 = 0.0254;

/// A map view: a device rectangle looking at a region of the map plane.
///
/// The view is described by the map coordinate shown at the center of the
/// device rectangle and a uniform resolution in map units per device pixel.
/// From that it derives:
/// - Conversion of points and rectangles between device and map space.
/// - Pan and zoom around a device anchor.
/// - Fitting a map extent into the device rectangle.
#[derive(Clone, Debug)]
pub struct MapViewport {
    view_rect: Rect,
    center: Point,
    map_units_per_pixel: f64,
    min_resolution: f64,
    max_resolution: f64,
    y_axis: YAxis,
    device_to_map: Affine,
    map_to_device: Affine,
}

impl MapViewport {
    /// Creates a viewport covering `view_rect`, centered on the map origin at
    /// one map unit per pixel, north up.
    ///
    /// Resolution is clamped to `[1e-9, 1e9]` map units per pixel by default.
    #[must_use]
    pub fn new(view_rect: Rect) -> Self {
        let mut vp = Self {
            view_rect,
            center: Point::ORIGIN,
            map_units_per_pixel: 1.0,
            min_resolution: 1e-9,
            max_resolution: 1e9,
            y_axis: YAxis::default(),
            device_to_map: Affine::IDENTITY,
            map_to_device: Affine::IDENTITY,
        };
        vp.rebuild_transforms();
        vp
    }

    /// Builder form of [`set_center`](Self::set_center).
    #[must_use]
    pub fn with_center(mut self, center: Point) -> Self {
        self.set_center(center);
        self
    }

    /// Builder form of [`set_map_units_per_pixel`](Self::set_map_units_per_pixel).
    #[must_use]
    pub fn with_map_units_per_pixel(mut self, mupp: f64) -> Self {
        self.set_map_units_per_pixel(mupp);
        self
    }

    /// Builder form of [`set_y_axis`](Self::set_y_axis).
    #[must_use]
    pub fn with_y_axis(mut self, y_axis: YAxis) -> Self {
        self.set_y_axis(y_axis);
        self
    }

    /// Returns the device rectangle.
    #[must_use]
    pub fn view_rect(&self) -> Rect {
        self.view_rect
    }

    /// Sets the device rectangle, keeping the map center and resolution.
    pub fn set_view_rect(&mut self, rect: Rect) {
        if self.view_rect != rect {
            self.view_rect = rect;
            self.rebuild_transforms();
        }
    }

    /// Map coordinate shown at the center of the device rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        self.center
    }

    /// Moves the view so that `center` is shown at the device center.
    pub fn set_center(&mut self, center: Point) {
        if self.center != center {
            self.center = center;
            self.rebuild_transforms();
        }
    }

    /// Current resolution in map units per device pixel.
    #[must_use]
    pub fn map_units_per_pixel(&self) -> f64 {
        self.map_units_per_pixel
    }

    /// Sets the resolution, clamped into the configured range.
    ///
    /// Non-finite or non-positive values are ignored.
    pub fn set_map_units_per_pixel(&mut self, mupp: f64) {
        if !mupp.is_finite() || mupp <= 0.0 {
            return;
        }
        let clamped = mupp.clamp(self.min_resolution, self.max_resolution);
        if (self.map_units_per_pixel - clamped).abs() < f64::EPSILON * clamped {
            return;
        }
        self.map_units_per_pixel = clamped;
        self.rebuild_transforms();
    }

    /// Sets the resolution limits. The range is normalized so that `min <= max`.
    pub fn set_resolution_limits(&mut self, min: f64, max: f64) {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.min_resolution = min;
        self.max_resolution = max;
        let current = self.map_units_per_pixel.clamp(min, max);
        if current != self.map_units_per_pixel {
            self.map_units_per_pixel = current;
            self.rebuild_transforms();
        }
    }

    /// Orientation of the map y axis.
    #[must_use]
    pub fn y_axis(&self) -> YAxis {
        self.y_axis
    }

    /// Sets the orientation of the map y axis.
    pub fn set_y_axis(&mut self, y_axis: YAxis) {
        if self.y_axis != y_axis {
            self.y_axis = y_axis;
            self.rebuild_transforms();
        }
    }

    /// Pans by a delta in device pixels. Content follows the pointer.
    pub fn pan_by_device(&mut self, delta: Vec2) {
        if delta == Vec2::ZERO {
            return;
        }
        let shift = Vec2::new(
            -delta.x * self.map_units_per_pixel,
            -delta.y * self.map_units_per_pixel * self.y_axis.sign(),
        );
        self.set_center(self.center + shift);
    }

    /// Zooms in by `factor` (> 1 zooms in) keeping `anchor` fixed on screen.
    pub fn zoom_about_device_point(&mut self, anchor: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let anchored_map = self.device_to_map_point(anchor);
        self.set_map_units_per_pixel(self.map_units_per_pixel / factor);
        let drift = anchored_map - self.device_to_map_point(anchor);
        self.set_center(self.center + drift);
    }

    /// Fits the map `extent` into the device rectangle, preserving aspect ratio.
    ///
    /// Degenerate extents or an empty device rectangle leave the view unchanged.
    pub fn fit_extent(&mut self, extent: Rect) {
        let extent = extent.abs();
        if extent.width() <= 0.0 || extent.height() <= 0.0 {
            return;
        }
        let size = self.view_rect.size();
        if size.width <= 0.0 || size.height <= 0.0 {
            return;
        }
        let mupp = (extent.width() / size.width).max(extent.height() / size.height);
        self.center = extent.center();
        self.map_units_per_pixel = mupp.clamp(self.min_resolution, self.max_resolution);
        self.rebuild_transforms();
    }

    /// The map extent visible through the device rectangle.
    #[must_use]
    pub fn visible_extent(&self) -> Rect {
        self.device_to_map_rect(self.view_rect)
    }

    /// Converts a device point into map coordinates.
    #[must_use]
    pub fn device_to_map_point(&self, pt: Point) -> Point {
        self.device_to_map * pt
    }

    /// Converts a map point into device coordinates.
    #[must_use]
    pub fn map_to_device_point(&self, pt: Point) -> Point {
        self.map_to_device * pt
    }

    /// Converts a device rectangle into a normalized map rectangle.
    #[must_use]
    pub fn device_to_map_rect(&self, rect: Rect) -> Rect {
        bounding_rect_of_corners(self.device_to_map, rect)
    }

    /// Converts a map rectangle into a normalized device rectangle.
    #[must_use]
    pub fn map_to_device_rect(&self, rect: Rect) -> Rect {
        bounding_rect_of_corners(self.map_to_device, rect)
    }

    /// Converts a length in device pixels into map units.
    #[must_use]
    pub fn pixels_to_map_units(&self, pixels: f64) -> f64 {
        pixels * self.map_units_per_pixel
    }

    /// Scale denominator (1:N) for metric map units at the given output DPI.
    #[must_use]
    pub fn scale_denominator(&self, dpi: f64) -> f64 {
        self.map_units_per_pixel * dpi / METERS_PER_INCH
    }

    /// Square map-space rectangle of half-size `radius` (map units) around a map point.
    #[must_use]
    pub fn search_rect(map_pt: Point, radius: f64) -> Rect {
        let r = radius.abs();
        Rect::new(map_pt.x - r, map_pt.y - r, map_pt.x + r, map_pt.y + r)
    }

    fn rebuild_transforms(&mut self) {
        let view_center = self.view_rect.center().to_vec2();
        let s = self.map_units_per_pixel;
        // Device → map: recentre on the view, scale (flipping y for north-up), move to the map center.
        self.device_to_map = Affine::translate(self.center.to_vec2())
            * Affine::scale_non_uniform(s, s * self.y_axis.sign())
            * Affine::translate(-view_center);
        self.map_to_device = self.device_to_map.inverse();
    }
}

fn bounding_rect_of_corners(xf: Affine, rect: Rect) -> Rect {
    // The transform is axis aligned, so two opposite corners suffice.
    let a = xf * Point::new(rect.x0, rect.y0);
    let b = xf * Point::new(rect.x1, rect.y1);
    Rect::from_points(a, b)
}
