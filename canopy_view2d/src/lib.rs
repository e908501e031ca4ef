// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy View 2D: the device-to-map half of a click transform.
//!
//! A [`MapViewport`] models what a map canvas shows: a device rectangle in
//! pixels, the map coordinate at its center, and a uniform resolution in map
//! units per pixel. It converts clicks into map coordinates and pixel
//! tolerances into map-unit radii, which is everything a hit test needs before
//! the map-to-layer projection step.
//!
//! It does **not** render anything or own a scene. Callers wire input events
//! into [`MapViewport::pan_by_device`] and
//! [`MapViewport::zoom_about_device_point`] at a higher layer.
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use canopy_view2d::MapViewport;
//!
//! let mut view = MapViewport::new(Rect::new(0.0, 0.0, 800.0, 600.0));
//! view.fit_extent(Rect::new(0.0, 0.0, 100.0, 100.0));
//!
//! // The center of the window shows the center of the extent.
//! let map_pt = view.device_to_map_point(Point::new(400.0, 300.0));
//! assert!((map_pt.x - 50.0).abs() < 1e-9 && (map_pt.y - 50.0).abs() < 1e-9);
//!
//! // Two pixels of tolerance, in map units, around the click.
//! let search = MapViewport::search_rect(map_pt, view.pixels_to_map_units(2.0));
//! assert!(search.width() > 0.0);
//! ```
//!
//! ## Design notes
//!
//! - Axis aligned with a **uniform** resolution; rotation is not modelled.
//! - North up by default ([`YAxis::Up`]): device y grows downwards while map y
//!   grows upwards.
//!
//! This crate is `no_std`.

#![no_std]

mod modes;
mod viewport;

pub use modes::YAxis;
pub use viewport::MapViewport;
