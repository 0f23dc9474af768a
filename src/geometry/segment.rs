//! Segment predicates.

use super::{Point, Rect};

/// Turn direction of an ordered point triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
    Collinear,
}

/// Orientation of `(a, b, c)` from the sign of the cross product.
#[must_use]
pub fn orientation(a: Point, b: Point, c: Point) -> Orientation {
    let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    if cross > 0.0 {
        Orientation::CounterClockwise
    } else if cross < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// `p` lies within the bounding box of segment `a`-`b`.
///
/// Only meaningful when `p` is already known to be collinear with the segment.
pub(crate) fn within_span(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// `p` lies on the closed segment `a`-`b`.
#[must_use]
pub fn point_on_segment(a: Point, b: Point, p: Point) -> bool {
    orientation(a, b, p) == Orientation::Collinear && within_span(a, b, p)
}

/// Closed segments `p1`-`p2` and `q1`-`q2` share at least one point.
///
/// Touching endpoints and collinear overlap count as intersection.
#[must_use]
pub fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    let o1 = orientation(p1, p2, q1);
    let o2 = orientation(p1, p2, q2);
    let o3 = orientation(q1, q2, p1);
    let o4 = orientation(q1, q2, p2);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::Collinear && within_span(p1, p2, q1))
        || (o2 == Orientation::Collinear && within_span(p1, p2, q2))
        || (o3 == Orientation::Collinear && within_span(q1, q2, p1))
        || (o4 == Orientation::Collinear && within_span(q1, q2, p2))
}

/// Segment `a`-`b` touches the closed rectangle.
#[must_use]
pub fn segment_intersects_rect(a: Point, b: Point, rect: &Rect) -> bool {
    if rect.contains(a) || rect.contains(b) {
        return true;
    }
    let corners = rect.corners();
    (0..4).any(|i| segments_intersect(a, b, corners[i], corners[(i + 1) % 4]))
}
