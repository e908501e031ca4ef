// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::Point;

/// Why a coordinate could not be transformed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UndefinedReason {
    /// The input had a NaN or infinite component.
    NonFinite,
    /// Latitude outside `[-90, 90]` degrees.
    LatitudeOutOfRange,
    /// The projection diverges here (e.g. Mercator at a pole).
    Singular,
    /// A projected coordinate lies outside the area the projection maps onto
    /// (e.g. off the disc of an azimuthal projection).
    OutsideProjectionDomain,
}

impl UndefinedReason {
    fn describe(self) -> &'static str {
        match self {
            Self::NonFinite => "coordinate is not finite",
            Self::LatitudeOutOfRange => "latitude outside [-90, 90]",
            Self::Singular => "projection is singular at this location",
            Self::OutsideProjectionDomain => "coordinate lies outside the projection domain",
        }
    }
}

/// A coordinate transform is mathematically undefined for the given input.
///
/// This is a recoverable condition, not a bug: clicking off the edge of the
/// globe on an azimuthal map legitimately has no geographic location.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransformUndefined {
    /// The input coordinate, in the space it was given in.
    pub point: Point,
    /// What went wrong.
    pub reason: UndefinedReason,
}

impl TransformUndefined {
    pub(crate) fn new(point: Point, reason: UndefinedReason) -> Self {
        Self { point, reason }
    }
}

impl fmt::Display for TransformUndefined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transform undefined at ({}, {}): {}",
            self.point.x,
            self.point.y,
            self.reason.describe()
        )
    }
}

impl core::error::Error for TransformUndefined {}
