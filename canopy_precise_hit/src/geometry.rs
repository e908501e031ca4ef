// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simple-feature geometry types with exact rectangle intersection.

use alloc::vec::Vec;

use kurbo::{BezPath, Line, Point, Rect, Shape};

use crate::RectIntersect;
use crate::predicates::{rect_contains_inclusive, rects_overlap_inclusive, segment_intersects_rect};

fn bounds_of(points: &[Point]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    Some(rest.iter().fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p)))
}

fn union_bounds(a: Option<Rect>, b: Option<Rect>) -> Option<Rect> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.union(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// An open polyline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineString {
    points: Vec<Point>,
}

impl LineString {
    /// Creates a polyline through the given vertices.
    pub fn new(points: impl IntoIterator<Item = impl Into<Point>>) -> Self {
        Self {
            points: points.into_iter().map(Into::into).collect(),
        }
    }

    /// The vertices.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Iterates the segments between consecutive vertices.
    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        self.points.windows(2).map(|w| Line::new(w[0], w[1]))
    }
}

impl RectIntersect for LineString {
    fn bounding_box(&self) -> Option<Rect> {
        bounds_of(&self.points)
    }

    fn intersects_rect(&self, rect: Rect) -> bool {
        match self.points.as_slice() {
            [] => false,
            [only] => rect_contains_inclusive(rect, *only),
            _ => self.segments().any(|s| segment_intersects_rect(s, rect)),
        }
    }
}

/// A closed ring. The closing edge from the last vertex back to the first is implied.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ring {
    points: Vec<Point>,
}

impl Ring {
    /// Creates a ring from its vertices. A repeated closing vertex is dropped.
    pub fn new(points: impl IntoIterator<Item = impl Into<Point>>) -> Self {
        let mut points: Vec<Point> = points.into_iter().map(Into::into).collect();
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        Self { points }
    }

    /// The vertices, without the closing repeat.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Iterates every edge, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = Line> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| Line::new(self.points[i], self.points[(i + 1) % n]))
    }

    /// The ring as a closed kurbo path.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut pts = self.points.iter();
        if let Some(first) = pts.next() {
            path.move_to(*first);
            for p in pts {
                path.line_to(*p);
            }
            path.close_path();
        }
        path
    }

    /// Returns `true` if `pt` is in the ring's interior.
    ///
    /// Uses the nonzero winding rule. Points exactly on an edge may report
    /// either way; callers that need closed semantics test edges separately.
    pub fn contains(&self, pt: Point) -> bool {
        self.points.len() >= 3 && self.to_path().winding(pt) != 0
    }
}

/// A polygon: one exterior ring with zero or more holes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    exterior: Ring,
    interiors: Vec<Ring>,
}

impl Polygon {
    /// Creates a polygon without holes.
    pub fn new(exterior: Ring) -> Self {
        Self {
            exterior,
            interiors: Vec::new(),
        }
    }

    /// Creates an axis-aligned rectangular polygon.
    pub fn from_rect(rect: Rect) -> Self {
        let r = rect.abs();
        Self::new(Ring::new([
            (r.x0, r.y0),
            (r.x1, r.y0),
            (r.x1, r.y1),
            (r.x0, r.y1),
        ]))
    }

    /// Adds a hole.
    #[must_use]
    pub fn with_hole(mut self, hole: Ring) -> Self {
        self.interiors.push(hole);
        self
    }

    /// The exterior ring.
    pub fn exterior(&self) -> &Ring {
        &self.exterior
    }

    /// The holes.
    pub fn interiors(&self) -> &[Ring] {
        &self.interiors
    }

    fn rings(&self) -> impl Iterator<Item = &Ring> {
        core::iter::once(&self.exterior).chain(&self.interiors)
    }

    /// Returns `true` if `pt` is inside the exterior and outside every hole.
    pub fn contains(&self, pt: Point) -> bool {
        self.exterior.contains(pt) && !self.interiors.iter().any(|h| h.contains(pt))
    }
}

impl RectIntersect for Polygon {
    fn bounding_box(&self) -> Option<Rect> {
        bounds_of(&self.exterior.points)
    }

    fn intersects_rect(&self, rect: Rect) -> bool {
        let Some(bbox) = self.bounding_box() else {
            return false;
        };
        if !rects_overlap_inclusive(bbox, rect) {
            return false;
        }
        // Any boundary crossing, touching, or vertex inside the rect.
        if self
            .rings()
            .flat_map(Ring::edges)
            .any(|e| segment_intersects_rect(e, rect))
        {
            return true;
        }
        // No boundary touches the rect: it is wholly inside the polygon area,
        // wholly in a hole, or wholly outside. One probe point decides.
        let r = rect.abs();
        self.contains(Point::new(r.x0, r.y0))
    }
}

/// A feature geometry.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// A single position.
    Point(Point),
    /// An open polyline.
    LineString(LineString),
    /// A polygon with optional holes.
    Polygon(Polygon),
    /// A set of positions.
    MultiPoint(Vec<Point>),
    /// A set of polylines.
    MultiLineString(Vec<LineString>),
    /// A set of polygons.
    MultiPolygon(Vec<Polygon>),
}

impl RectIntersect for Geometry {
    fn bounding_box(&self) -> Option<Rect> {
        match self {
            Self::Point(p) => Some(Rect::from_points(*p, *p)),
            Self::LineString(l) => l.bounding_box(),
            Self::Polygon(p) => p.bounding_box(),
            Self::MultiPoint(pts) => bounds_of(pts),
            Self::MultiLineString(ls) => ls
                .iter()
                .fold(None, |acc, l| union_bounds(acc, l.bounding_box())),
            Self::MultiPolygon(ps) => ps
                .iter()
                .fold(None, |acc, p| union_bounds(acc, p.bounding_box())),
        }
    }

    fn intersects_rect(&self, rect: Rect) -> bool {
        match self {
            Self::Point(p) => rect_contains_inclusive(rect, *p),
            Self::LineString(l) => l.intersects_rect(rect),
            Self::Polygon(p) => p.intersects_rect(rect),
            Self::MultiPoint(pts) => pts.iter().any(|p| rect_contains_inclusive(rect, *p)),
            Self::MultiLineString(ls) => ls.iter().any(|l| l.intersects_rect(rect)),
            Self::MultiPolygon(ps) => ps.iter().any(|p| p.intersects_rect(rect)),
        }
    }
}

impl From<Point> for Geometry {
    fn from(p: Point) -> Self {
        Self::Point(p)
    }
}

impl From<LineString> for Geometry {
    fn from(l: LineString) -> Self {
        Self::LineString(l)
    }
}

impl From<Polygon> for Geometry {
    fn from(p: Polygon) -> Self {
        Self::Polygon(p)
    }
}
