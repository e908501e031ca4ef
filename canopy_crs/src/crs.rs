// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate reference systems and their projection formulas.
//!
//! All earth-based systems here are spherical. Geographic coordinates are
//! `(longitude, latitude)` in degrees, stored as `Point { x: lon, y: lat }`.

use std::f64::consts::FRAC_PI_2;

use kurbo::Point;

use crate::error::{TransformUndefined, UndefinedReason};

/// Sphere radius used by EPSG:3857, in meters.
pub const WEB_MERCATOR_RADIUS: f64 = 6_378_137.0;

/// Sphere radius used by the Clarke 1866 authalic sphere (EPSG:2163), in meters.
pub const AUTHALIC_SPHERE_RADIUS: f64 = 6_370_997.0;

const EPSILON: f64 = 1e-12;

/// A coordinate reference system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Crs {
    /// A local or unknown engineering system. It has no relationship to the
    /// earth, so transforms involving it pass coordinates through unchanged.
    Local,
    /// Longitude/latitude in degrees (EPSG:4326).
    Geographic,
    /// Spherical "web" Mercator in meters (EPSG:3857).
    WebMercator,
    /// Spherical Lambert azimuthal equal-area, in meters.
    LambertAzimuthal {
        /// Longitude of the projection center, degrees.
        lon0: f64,
        /// Latitude of the projection center, degrees.
        lat0: f64,
        /// Sphere radius, meters.
        radius: f64,
    },
}

impl Crs {
    /// US National Atlas Equal Area (EPSG:2163): Lambert azimuthal equal-area
    /// centered on 100°W 45°N.
    pub const US_NATIONAL_ATLAS: Self = Self::LambertAzimuthal {
        lon0: -100.0,
        lat0: 45.0,
        radius: AUTHALIC_SPHERE_RADIUS,
    };

    /// Authority identifier, or a proj-style definition for custom systems.
    pub fn authid(&self) -> String {
        match *self {
            Self::Local => String::new(),
            Self::Geographic => "EPSG:4326".into(),
            Self::WebMercator => "EPSG:3857".into(),
            laea if laea == Self::US_NATIONAL_ATLAS => "EPSG:2163".into(),
            Self::LambertAzimuthal { lon0, lat0, radius } => {
                format!("+proj=laea +lat_0={lat0} +lon_0={lon0} +R={radius}")
            }
        }
    }

    /// Name of the coordinate units.
    pub fn units(&self) -> &'static str {
        match self {
            Self::Local => "unknown",
            Self::Geographic => "degrees",
            Self::WebMercator | Self::LambertAzimuthal { .. } => "meters",
        }
    }

    /// Returns `true` if the system is tied to the earth.
    pub fn is_earth_based(&self) -> bool {
        !matches!(self, Self::Local)
    }

    /// Converts a coordinate in this system into geographic degrees.
    pub fn to_geographic(&self, p: Point) -> Result<Point, TransformUndefined> {
        if !p.is_finite() {
            return Err(TransformUndefined::new(p, UndefinedReason::NonFinite));
        }
        match *self {
            Self::Local => Ok(p),
            Self::Geographic => check_latitude(p),
            Self::WebMercator => {
                let lon = (p.x / WEB_MERCATOR_RADIUS).to_degrees();
                let lat = (p.y / WEB_MERCATOR_RADIUS).sinh().atan().to_degrees();
                Ok(Point::new(lon, lat))
            }
            Self::LambertAzimuthal { lon0, lat0, radius } => {
                laea_inverse(p, lon0.to_radians(), lat0.to_radians(), radius)
            }
        }
    }

    /// Converts a geographic coordinate (degrees) into this system.
    pub fn from_geographic(&self, geo: Point) -> Result<Point, TransformUndefined> {
        if !geo.is_finite() {
            return Err(TransformUndefined::new(geo, UndefinedReason::NonFinite));
        }
        match *self {
            Self::Local => Ok(geo),
            Self::Geographic => check_latitude(geo),
            Self::WebMercator => {
                let geo = check_latitude(geo)?;
                let phi = geo.y.to_radians();
                if FRAC_PI_2 - phi.abs() < EPSILON {
                    return Err(TransformUndefined::new(geo, UndefinedReason::Singular));
                }
                let x = WEB_MERCATOR_RADIUS * geo.x.to_radians();
                let y = WEB_MERCATOR_RADIUS * (phi / 2.0 + FRAC_PI_2 / 2.0).tan().ln();
                Ok(Point::new(x, y))
            }
            Self::LambertAzimuthal { lon0, lat0, radius } => {
                let geo = check_latitude(geo)?;
                laea_forward(geo, lon0.to_radians(), lat0.to_radians(), radius)
            }
        }
    }
}

fn check_latitude(p: Point) -> Result<Point, TransformUndefined> {
    if p.y.abs() > 90.0 {
        Err(TransformUndefined::new(p, UndefinedReason::LatitudeOutOfRange))
    } else {
        Ok(p)
    }
}

fn laea_forward(
    geo: Point,
    lam0: f64,
    phi1: f64,
    radius: f64,
) -> Result<Point, TransformUndefined> {
    let (lam, phi) = (geo.x.to_radians(), geo.y.to_radians());
    let dlam = lam - lam0;
    let denom = 1.0 + phi1.sin() * phi.sin() + phi1.cos() * phi.cos() * dlam.cos();
    // The antipode of the center maps onto the whole boundary circle.
    if denom <= EPSILON {
        return Err(TransformUndefined::new(geo, UndefinedReason::Singular));
    }
    let k = (2.0 / denom).sqrt();
    let x = radius * k * phi.cos() * dlam.sin();
    let y = radius * k * (phi1.cos() * phi.sin() - phi1.sin() * phi.cos() * dlam.cos());
    Ok(Point::new(x, y))
}

fn laea_inverse(
    p: Point,
    lam0: f64,
    phi1: f64,
    radius: f64,
) -> Result<Point, TransformUndefined> {
    let rho = p.x.hypot(p.y);
    // The whole sphere projects into a disc of radius 2R.
    if rho > 2.0 * radius * (1.0 + EPSILON) {
        return Err(TransformUndefined::new(
            p,
            UndefinedReason::OutsideProjectionDomain,
        ));
    }
    if rho < EPSILON {
        return Ok(Point::new(lam0.to_degrees(), phi1.to_degrees()));
    }
    let c = 2.0 * (rho / (2.0 * radius)).min(1.0).asin();
    let (sin_c, cos_c) = c.sin_cos();
    let phi = (cos_c * phi1.sin() + p.y * sin_c * phi1.cos() / rho)
        .clamp(-1.0, 1.0)
        .asin();
    let lam = lam0
        + (p.x * sin_c).atan2(rho * phi1.cos() * cos_c - p.y * phi1.sin() * sin_c);
    Ok(Point::new(normalize_lon(lam.to_degrees()), phi.to_degrees()))
}

fn normalize_lon(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // Keep +180 rather than folding it onto -180.
    if wrapped == -180.0 && lon > 0.0 { 180.0 } else { wrapped }
}
