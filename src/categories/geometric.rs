//! Geometric reasoning: rectangle measures, rectangle relations, polygon area.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{
    check_point, check_positive, count_in, int_in, pick, sample_star_polygon, SpatialScenario,
    TaskRng,
};
use crate::difficulty::GenerationParameters;
use crate::error::Result;
use crate::geometry::{round_to, Point, Polygon, Rect, RectRelation};
use crate::task::{AnswerType, Difficulty, GroundTruth};

/// Quantity asked about a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Area,
    Perimeter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeometricScenario {
    RectangleMeasure {
        width: f64,
        height: f64,
        measure: Measure,
    },
    RectangleRelation {
        first: Rect,
        second: Rect,
    },
    PolygonArea {
        polygon: Polygon,
    },
}

fn sample_relation_pair(rng: &mut TaskRng, range: i64) -> (Rect, Rect) {
    let half = (range / 2).max(4);
    let x0 = int_in(rng, 0, half);
    let y0 = int_in(rng, 0, half);
    let w = int_in(rng, 4, half);
    let h = int_in(rng, 4, half);
    let first = Rect::new(x0, y0, x0 + w, y0 + h);

    let target = RectRelation::all()[rng.gen_range(0..RectRelation::all().len())];
    let second = match target {
        RectRelation::Inside => {
            let dx = int_in(rng, 0, (w as i64 - 2).max(0));
            let dy = int_in(rng, 0, (h as i64 - 2).max(0));
            let iw = int_in(rng, 1, (w - dx) as i64);
            let ih = int_in(rng, 1, (h - dy) as i64);
            Rect::new(x0 + dx, y0 + dy, x0 + dx + iw, y0 + dy + ih)
        }
        RectRelation::Contains => Rect::new(
            x0 - int_in(rng, 1, 3),
            y0 - int_in(rng, 1, 3),
            x0 + w + int_in(rng, 1, 3),
            y0 + h + int_in(rng, 1, 3),
        ),
        RectRelation::Outside => {
            let gap = int_in(rng, 1, 3);
            let sy = y0 + int_in(rng, -3, h as i64);
            Rect::new(
                x0 + w + gap,
                sy,
                x0 + w + gap + int_in(rng, 2, 6),
                sy + int_in(rng, 2, 6),
            )
        }
        RectRelation::Adjacent => {
            let sy = y0 + int_in(rng, 0, (h as i64 - 1).max(0));
            Rect::new(
                x0 + w,
                sy,
                x0 + w + int_in(rng, 2, 6),
                sy + int_in(rng, 1, 4),
            )
        }
        RectRelation::Overlapping => {
            let sx = x0 + int_in(rng, 1, (w as i64 - 1).max(1));
            let sy = y0 + int_in(rng, 1, (h as i64 - 1).max(1));
            Rect::new(sx, sy, x0 + w + int_in(rng, 1, 4), y0 + h + int_in(rng, 1, 4))
        }
    };
    (first, second)
}

impl SpatialScenario for GeometricScenario {
    fn sample(tier: Difficulty, params: &GenerationParameters, rng: &mut TaskRng) -> Result<Self> {
        let range = params.coordinate_range as i64;
        match tier {
            Difficulty::Easy => Ok(Self::RectangleMeasure {
                width: int_in(rng, 2, range),
                height: int_in(rng, 2, range),
                measure: pick(rng, &[Measure::Area, Measure::Perimeter])?,
            }),
            Difficulty::Medium => {
                let (first, second) = sample_relation_pair(rng, range);
                Ok(Self::RectangleRelation { first, second })
            }
            Difficulty::Hard => {
                let n = count_in(rng, 5, params.vertex_count);
                let center = Point::new((range / 2) as f64, (range / 2) as f64);
                let max_radius = (range / 2).max(4) as u32;
                let polygon = sample_star_polygon(rng, center, 3, max_radius, n);
                polygon.validate()?;
                Ok(Self::PolygonArea { polygon })
            }
        }
    }

    fn solve(&self) -> Result<GroundTruth> {
        match self {
            Self::RectangleMeasure {
                width,
                height,
                measure,
            } => {
                let rect = Rect::new(0.0, 0.0, *width, *height);
                let value = match measure {
                    Measure::Area => rect.area(),
                    Measure::Perimeter => rect.perimeter(),
                };
                Ok(GroundTruth::Numerical(round_to(value, 2)))
            }
            Self::RectangleRelation { first, second } => Ok(GroundTruth::Exact(
                first.relation(second).name().to_string(),
            )),
            Self::PolygonArea { polygon } => {
                polygon.validate()?;
                Ok(GroundTruth::Numerical(round_to(polygon.area(), 2)))
            }
        }
    }

    fn answer_type(&self) -> AnswerType {
        match self {
            Self::RectangleRelation { .. } => AnswerType::Exact,
            Self::RectangleMeasure { .. } | Self::PolygonArea { .. } => AnswerType::Numerical,
        }
    }

    fn prompt(&self) -> String {
        match self {
            Self::RectangleMeasure {
                width,
                height,
                measure,
            } => {
                let quantity = match measure {
                    Measure::Area => "area",
                    Measure::Perimeter => "perimeter",
                };
                format!(
                    "A rectangle has width {width} units and height {height} units. \
                     What is its {quantity}?"
                )
            }
            Self::RectangleRelation { first, second } => format!(
                "Rectangle A spans from {} to {}. Rectangle B spans from {} to {}. \
                 How is B positioned relative to A? Answer with one word: inside (B lies within A), \
                 contains (B encloses A), outside (no shared points), adjacent (they touch only \
                 along an edge or corner), or overlapping.",
                Point::new(first.x_min, first.y_min),
                Point::new(first.x_max, first.y_max),
                Point::new(second.x_min, second.y_min),
                Point::new(second.x_max, second.y_max),
            ),
            Self::PolygonArea { polygon } => format!(
                "A polygon has the following vertices, listed in order around its boundary: \
                 {polygon}. What is its area? Round to 2 decimal places if needed."
            ),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::RectangleMeasure { .. } => "rectangle_measure",
            Self::RectangleRelation { .. } => "rectangle_relation",
            Self::PolygonArea { .. } => "polygon_area",
        }
    }

    fn check_bounds(&self) -> std::result::Result<(), String> {
        match self {
            Self::RectangleMeasure { width, height, .. } => {
                check_positive(*width, "width")?;
                check_positive(*height, "height")
            }
            Self::RectangleRelation { first, second } => {
                for (name, r) in [("first", first), ("second", second)] {
                    check_point(Point::new(r.x_min, r.y_min), name)?;
                    check_point(Point::new(r.x_max, r.y_max), name)?;
                    if r.area() <= 0.0 {
                        return Err(format!("{name} rectangle has no area"));
                    }
                }
                Ok(())
            }
            Self::PolygonArea { polygon } => {
                if polygon.len() < 3 {
                    return Err(format!("polygon has {} vertices", polygon.len()));
                }
                polygon
                    .vertices()
                    .iter()
                    .try_for_each(|v| check_point(*v, "vertex"))
            }
        }
    }
}
