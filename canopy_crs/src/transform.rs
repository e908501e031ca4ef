// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};

use crate::crs::Crs;
use crate::error::TransformUndefined;

/// Number of samples taken along each rectangle edge by default.
pub const DEFAULT_DENSIFY_POINTS: usize = 21;

/// Transform between two coordinate reference systems.
///
/// Earth-based systems are related through geographic coordinates. If either
/// side is [`Crs::Local`], or both sides are equal, the transform is the
/// identity and never fails.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateTransform {
    source: Crs,
    destination: Crs,
    densify_points: usize,
}

impl CoordinateTransform {
    /// Creates a transform from `source` to `destination`.
    pub fn new(source: Crs, destination: Crs) -> Self {
        Self {
            source,
            destination,
            densify_points: DEFAULT_DENSIFY_POINTS,
        }
    }

    /// Sets how many points are sampled per edge by [`transform_rect`](Self::transform_rect).
    ///
    /// Values below 2 are raised to 2 (the edge end points).
    #[must_use]
    pub fn with_densify_points(mut self, n: usize) -> Self {
        self.densify_points = n.max(2);
        self
    }

    /// Source system.
    pub fn source(&self) -> Crs {
        self.source
    }

    /// Destination system.
    pub fn destination(&self) -> Crs {
        self.destination
    }

    /// The inverse transform.
    pub fn inverse(&self) -> Self {
        Self {
            source: self.destination,
            destination: self.source,
            densify_points: self.densify_points,
        }
    }

    /// Returns `true` if coordinates pass through unchanged.
    pub fn is_identity(&self) -> bool {
        self.source == self.destination
            || !self.source.is_earth_based()
            || !self.destination.is_earth_based()
    }

    /// Transforms a single point.
    pub fn transform_point(&self, p: Point) -> Result<Point, TransformUndefined> {
        if self.is_identity() {
            return Ok(p);
        }
        let geo = self.source.to_geographic(p)?;
        self.destination.from_geographic(geo)
    }

    /// Transforms a rectangle and returns the bounds of the result.
    ///
    /// Each edge is densified before projecting, so curved images of straight
    /// edges are bounded reasonably. The transform is undefined if *any* sample
    /// is undefined: a partially valid search region is not trusted.
    pub fn transform_rect(&self, rect: Rect) -> Result<Rect, TransformUndefined> {
        if self.is_identity() {
            return Ok(rect.abs());
        }
        let r = rect.abs();
        let mut bounds: Option<Rect> = None;
        let mut add = |p: Point| -> Result<(), TransformUndefined> {
            let q = self.transform_point(p)?;
            bounds = Some(match bounds {
                Some(b) => b.union_pt(q),
                None => Rect::from_points(q, q),
            });
            Ok(())
        };

        if r.width() == 0.0 && r.height() == 0.0 {
            add(r.origin())?;
        } else {
            let steps = self.densify_points - 1;
            for i in 0..=steps {
                let t = i as f64 / steps as f64;
                let x = r.x0 + (r.x1 - r.x0) * t;
                let y = r.y0 + (r.y1 - r.y0) * t;
                add(Point::new(x, r.y0))?;
                add(Point::new(x, r.y1))?;
                add(Point::new(r.x0, y))?;
                add(Point::new(r.x1, y))?;
            }
        }
        // At least one sample was added above, and every sample succeeded.
        Ok(bounds.unwrap_or(r))
    }
}
