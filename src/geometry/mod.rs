//! Planar and geodesic geometry primitives.
//!
//! Everything here is a pure function of its inputs. Generators sample
//! integer coordinates, so the predicates in this module (orientation,
//! containment, intersection) are exact for the scenarios they see.
//!
//! # Examples
//!
//! ```
//! use spatial_eval::geometry::{manhattan, Point, Quadrant};
//!
//! let p = Point::new(3.0, -4.0);
//! assert_eq!(p.quadrant(), Some(Quadrant::IV));
//! assert_eq!(manhattan(Point::new(1.0, 1.0), Point::new(5.0, 4.0)), 7.0);
//! ```

mod distance;
mod polygon;
mod segment;

pub use distance::{euclidean, haversine_km, manhattan, DistanceMetric, GeoPoint, EARTH_RADIUS_KM};
pub use polygon::{Polygon, Rect, RectRelation};
pub use segment::{orientation, segment_intersects_rect, segments_intersect, Orientation};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point (or displacement vector) in the plane.
///
/// Serialized as a two-element array `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by a displacement vector.
    #[must_use]
    pub fn translate(self, by: Point) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }

    /// Rotate counter-clockwise about the origin by a multiple of 90°.
    ///
    /// Quarter-turn rotation only swaps and negates coordinates, so the
    /// result is exact.
    #[must_use]
    pub fn rotate_quarter_turns(self, turns: u32) -> Self {
        match turns % 4 {
            0 => self,
            1 => Self::new(-self.y, self.x),
            2 => Self::new(-self.x, -self.y),
            _ => Self::new(self.y, -self.x),
        }
    }

    /// Quadrant containing the point, or `None` if it lies on an axis.
    #[must_use]
    pub fn quadrant(self) -> Option<Quadrant> {
        match (self.x, self.y) {
            (x, y) if x > 0.0 && y > 0.0 => Some(Quadrant::I),
            (x, y) if x < 0.0 && y > 0.0 => Some(Quadrant::II),
            (x, y) if x < 0.0 && y < 0.0 => Some(Quadrant::III),
            (x, y) if x > 0.0 && y < 0.0 => Some(Quadrant::IV),
            _ => None,
        }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        euclidean(self, other)
    }

    /// Squared Euclidean distance; exact for integer coordinates.
    #[must_use]
    pub fn distance_squared(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", format_number(self.x), format_number(self.y))
    }
}

/// Cartesian quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    I,
    II,
    III,
    IV,
}

impl Quadrant {
    /// Roman-numeral label used in prompts and answers.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::I => "I",
            Self::II => "II",
            Self::III => "III",
            Self::IV => "IV",
        }
    }

    #[must_use]
    pub fn all() -> &'static [Quadrant] {
        &[Self::I, Self::II, Self::III, Self::IV]
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Arithmetic mean of a point set, `None` when empty.
#[must_use]
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// True when every point lies on one line (trivially true for < 3 points).
#[must_use]
pub fn collinear(points: &[Point]) -> bool {
    let Some(&first) = points.first() else {
        return true;
    };
    let Some(&second) = points.iter().find(|p| **p != first) else {
        return true;
    };
    points
        .iter()
        .all(|&p| orientation(first, second, p) == Orientation::Collinear)
}

/// Render a number for prompts and exact answers.
///
/// Negative zero prints as `0`; integral values print without a fraction.
#[must_use]
pub fn format_number(v: f64) -> String {
    let v = if v == 0.0 { 0.0 } else { v };
    format!("{v}")
}

/// Round to `places` decimal places (half away from zero).
#[must_use]
pub fn round_to(v: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    let rounded = (v * scale).round() / scale;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadrants() {
        assert_eq!(Point::new(3.0, -4.0).quadrant(), Some(Quadrant::IV));
        assert_eq!(Point::new(1.0, 1.0).quadrant(), Some(Quadrant::I));
        assert_eq!(Point::new(-1.0, 2.0).quadrant(), Some(Quadrant::II));
        assert_eq!(Point::new(-1.0, -2.0).quadrant(), Some(Quadrant::III));
        assert_eq!(Point::new(0.0, 5.0).quadrant(), None);
        assert_eq!(Point::new(-3.0, 0.0).quadrant(), None);
    }

    #[test]
    fn test_rotation_is_exact() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(p.rotate_quarter_turns(1), Point::new(-4.0, 3.0));
        assert_eq!(p.rotate_quarter_turns(2), Point::new(-3.0, -4.0));
        assert_eq!(p.rotate_quarter_turns(3), Point::new(4.0, -3.0));
        assert_eq!(p.rotate_quarter_turns(4), p);
    }

    #[test]
    fn test_translate() {
        let p = Point::new(2.0, -1.0).translate(Point::new(-5.0, 3.0));
        assert_eq!(p, Point::new(-3.0, 2.0));
    }

    #[test]
    fn test_display_normalizes_negative_zero() {
        let p = Point::new(0.0, 5.0).rotate_quarter_turns(2);
        assert_eq!(p.to_string(), "(0, -5)");
        assert_eq!(Point::new(1.5, -2.0).to_string(), "(1.5, -2)");
    }

    #[test]
    fn test_centroid() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 2.0),
            Point::new(0.0, 2.0),
        ];
        assert_eq!(centroid(&pts), Some(Point::new(2.0, 1.0)));
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn test_collinear() {
        let line = [Point::new(0.0, 0.0), Point::new(1.0, 2.0), Point::new(3.0, 6.0)];
        assert!(collinear(&line));
        let bent = [Point::new(0.0, 0.0), Point::new(1.0, 2.0), Point::new(3.0, 5.0)];
        assert!(!collinear(&bent));
        assert!(collinear(&[Point::new(1.0, 1.0), Point::new(1.0, 1.0)]));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3.14159, 2), 3.14);
        assert_eq!(round_to(-0.001, 2), 0.0);
        assert_eq!(round_to(2.5, 0), 3.0);
    }

    #[test]
    fn test_point_serde_as_array() {
        let json = serde_json::to_string(&Point::new(1.0, -2.5)).expect("serialize");
        assert_eq!(json, "[1.0,-2.5]");
        let back: Point = serde_json::from_str("[3,4]").expect("deserialize");
        assert_eq!(back, Point::new(3.0, 4.0));
    }
}
