// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Low-level predicates shared by the geometry types.
//!
//! Rectangles are treated as closed sets: edges and corners count as inside.
//! Kurbo's own `Rect::contains` is half-open, so it is not used here.

use kurbo::{Line, Point, Rect};

/// Returns `true` if `pt` lies inside or on the boundary of `rect`.
///
/// `rect` may have negative width or height; it is normalized first.
pub fn rect_contains_inclusive(rect: Rect, pt: Point) -> bool {
    let r = rect.abs();
    pt.x >= r.x0 && pt.x <= r.x1 && pt.y >= r.y0 && pt.y <= r.y1
}

/// Returns `true` if two closed rectangles share at least one point.
pub fn rects_overlap_inclusive(a: Rect, b: Rect) -> bool {
    let (a, b) = (a.abs(), b.abs());
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Sign of the cross product `(b - a) x (c - a)`: `1` counter-clockwise,
/// `-1` clockwise, `0` collinear.
fn orientation(a: Point, b: Point, c: Point) -> i8 {
    let v = (b - a).cross(c - a);
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// `q` is collinear with `p`-`r`; is it within their bounding box?
fn on_segment(p: Point, q: Point, r: Point) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// Closed segment intersection, including touching and collinear overlap.
///
/// Zero-length segments are handled, so this also answers "does this point lie
/// on that segment".
pub fn segments_intersect(a: Line, b: Line) -> bool {
    let (p1, q1, p2, q2) = (a.p0, a.p1, b.p0, b.p1);
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }
    (o1 == 0 && on_segment(p1, p2, q1))
        || (o2 == 0 && on_segment(p1, q2, q1))
        || (o3 == 0 && on_segment(p2, p1, q2))
        || (o4 == 0 && on_segment(p2, q1, q2))
}

/// Returns `true` if the closed segment touches the closed rectangle.
pub fn segment_intersects_rect(seg: Line, rect: Rect) -> bool {
    let r = rect.abs();
    if rect_contains_inclusive(r, seg.p0) || rect_contains_inclusive(r, seg.p1) {
        return true;
    }
    if seg.p0.x.max(seg.p1.x) < r.x0
        || seg.p0.x.min(seg.p1.x) > r.x1
        || seg.p0.y.max(seg.p1.y) < r.y0
        || seg.p0.y.min(seg.p1.y) > r.y1
    {
        return false;
    }
    let c = [
        Point::new(r.x0, r.y0),
        Point::new(r.x1, r.y0),
        Point::new(r.x1, r.y1),
        Point::new(r.x0, r.y1),
    ];
    (0..4).any(|i| segments_intersect(seg, Line::new(c[i], c[(i + 1) % 4])))
}
