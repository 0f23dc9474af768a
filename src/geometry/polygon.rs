//! Rectangles and simple polygons.

use super::segment::{point_on_segment, segments_intersect};
use super::Point;
use crate::error::{Result, SpatialError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned rectangle, closed on all sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Rect {
    /// Build a rectangle from two opposite corners in any order.
    #[must_use]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x_min: x1.min(x2),
            y_min: y1.min(y2),
            x_max: x1.max(x2),
            y_max: y1.max(y2),
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    #[must_use]
    pub fn perimeter(&self) -> f64 {
        2.0 * (self.width() + self.height())
    }

    /// Point lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }

    /// `other` lies entirely within `self` (shared edges allowed).
    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x_min >= self.x_min
            && other.x_max <= self.x_max
            && other.y_min >= self.y_min
            && other.y_max <= self.y_max
    }

    /// Closed rectangles share at least one point.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x_min <= other.x_max
            && other.x_min <= self.x_max
            && self.y_min <= other.y_max
            && other.y_min <= self.y_max
    }

    /// Corners in counter-clockwise order starting at the lower-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x_min, self.y_min),
            Point::new(self.x_max, self.y_min),
            Point::new(self.x_max, self.y_max),
            Point::new(self.x_min, self.y_max),
        ]
    }

    /// Euclidean distance from a point to the rectangle (0 inside).
    #[must_use]
    pub fn distance_to(&self, p: Point) -> f64 {
        self.distance_squared_to(p).sqrt()
    }

    /// Squared distance; exact for integer coordinates.
    #[must_use]
    pub fn distance_squared_to(&self, p: Point) -> f64 {
        let dx = (self.x_min - p.x).max(0.0).max(p.x - self.x_max);
        let dy = (self.y_min - p.y).max(0.0).max(p.y - self.y_max);
        dx * dx + dy * dy
    }

    /// Relationship of `other` with respect to `self`.
    #[must_use]
    pub fn relation(&self, other: &Rect) -> RectRelation {
        if self.contains_rect(other) {
            RectRelation::Inside
        } else if other.contains_rect(self) {
            RectRelation::Contains
        } else if !self.intersects(other) {
            RectRelation::Outside
        } else if self.x_min.max(other.x_min) == self.x_max.min(other.x_max)
            || self.y_min.max(other.y_min) == self.y_max.min(other.y_max)
        {
            RectRelation::Adjacent
        } else {
            RectRelation::Overlapping
        }
    }

    #[must_use]
    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(self.corners().to_vec())
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        [self.x_min, self.y_min, self.x_max, self.y_max]
            .iter()
            .all(|v| v.is_finite())
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            Point::new(self.x_min, self.y_min),
            Point::new(self.x_max, self.y_max)
        )
    }
}

/// How a second rectangle sits relative to a first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RectRelation {
    /// Second rectangle lies within the first.
    Inside,
    /// Second rectangle encloses the first.
    Contains,
    /// No shared points.
    Outside,
    /// Boundaries touch with zero-area intersection.
    Adjacent,
    /// Interiors overlap, neither encloses the other.
    Overlapping,
}

impl RectRelation {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Inside => "inside",
            Self::Contains => "contains",
            Self::Outside => "outside",
            Self::Adjacent => "adjacent",
            Self::Overlapping => "overlapping",
        }
    }

    #[must_use]
    pub fn all() -> &'static [RectRelation] {
        &[
            Self::Inside,
            Self::Contains,
            Self::Outside,
            Self::Adjacent,
            Self::Overlapping,
        ]
    }
}

/// Polygon given by its vertices in order (either winding).
///
/// Serialized as a plain array of `[x, y]` vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    #[must_use]
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    #[must_use]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Shoelace signed area (positive for counter-clockwise winding).
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        if self.vertices.len() < 3 {
            return 0.0;
        }
        self.edges().map(|(a, b)| a.x * b.y - b.x * a.y).sum::<f64>() / 2.0
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    #[must_use]
    pub fn perimeter(&self) -> f64 {
        self.edges().map(|(a, b)| a.distance_to(b)).sum()
    }

    /// Ray-casting containment; points on the boundary count as inside.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }
        if self.on_boundary(p) {
            return true;
        }
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    #[must_use]
    pub fn on_boundary(&self, p: Point) -> bool {
        self.edges().any(|(a, b)| point_on_segment(a, b, p))
    }

    /// No two non-adjacent edges meet and no vertex repeats.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        for i in 0..n {
            for j in (i + 1)..n {
                if self.vertices[i] == self.vertices[j] {
                    return false;
                }
            }
        }
        let edges: Vec<(Point, Point)> = self.edges().collect();
        for i in 0..n {
            for j in (i + 1)..n {
                let adjacent = j == i + 1 || (i == 0 && j == n - 1);
                if adjacent {
                    continue;
                }
                let (a1, a2) = edges[i];
                let (b1, b2) = edges[j];
                if segments_intersect(a1, a2, b1, b2) {
                    return false;
                }
            }
        }
        true
    }

    /// Reject polygons that cannot carry a well-defined area or containment
    /// answer.
    pub fn validate(&self) -> Result<()> {
        if self.vertices.len() < 3 {
            return Err(SpatialError::unsolvable("polygon needs at least 3 vertices"));
        }
        if !self.vertices.iter().all(|v| v.is_finite()) {
            return Err(SpatialError::unsolvable("polygon has non-finite vertex"));
        }
        if self.area() == 0.0 {
            return Err(SpatialError::unsolvable("zero-area polygon"));
        }
        if !self.is_simple() {
            return Err(SpatialError::unsolvable("self-intersecting polygon"));
        }
        Ok(())
    }

    /// Tight bounding rectangle, `None` when empty.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Rect> {
        let first = self.vertices.first()?;
        let init = Rect::new(first.x, first.y, first.x, first.y);
        Some(self.vertices.iter().fold(init, |r, v| Rect {
            x_min: r.x_min.min(v.x),
            y_min: r.y_min.min(v.y),
            x_max: r.x_max.max(v.x),
            y_max: r.y_max.max(v.y),
        }))
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.vertices.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(", "))
    }
}
