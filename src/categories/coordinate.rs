//! Coordinate understanding: quadrants, translations, rotations.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{check_point, int_in, sample_point, SpatialScenario, TaskRng};
use crate::difficulty::GenerationParameters;
use crate::error::{Result, SpatialError};
use crate::geometry::Point;
use crate::task::{AnswerType, Difficulty, GroundTruth};

/// Quadrant answer for points on either axis, the origin included.
pub const ON_AXIS: &str = "on an axis";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoordinateScenario {
    QuadrantIdentification { point: Point },
    VectorTranslation { point: Point, vector: Point },
    Rotation { point: Point, degrees: u32 },
}

impl SpatialScenario for CoordinateScenario {
    fn sample(tier: Difficulty, params: &GenerationParameters, rng: &mut TaskRng) -> Result<Self> {
        let range = params.coordinate_range as i64;
        match tier {
            Difficulty::Easy => Ok(Self::QuadrantIdentification {
                point: sample_point(rng, -range, range),
            }),
            Difficulty::Medium => {
                let point = sample_point(rng, -range, range);
                let half = (range / 2).max(1);
                let vector = Point::new(int_in(rng, -half, half), int_in(rng, -half, half));
                if vector == Point::new(0.0, 0.0) {
                    return Err(SpatialError::unsolvable("zero translation"));
                }
                Ok(Self::VectorTranslation { point, vector })
            }
            Difficulty::Hard => {
                let point = sample_point(rng, -range, range);
                if point == Point::new(0.0, 0.0) {
                    return Err(SpatialError::unsolvable("rotation of the origin"));
                }
                let degrees = 90 * rng.gen_range(1..=3);
                Ok(Self::Rotation { point, degrees })
            }
        }
    }

    fn solve(&self) -> Result<GroundTruth> {
        match self {
            Self::QuadrantIdentification { point } => Ok(GroundTruth::Exact(
                point
                    .quadrant()
                    .map_or(ON_AXIS, |q| q.label())
                    .to_string(),
            )),
            Self::VectorTranslation { point, vector } => {
                Ok(GroundTruth::Exact(point.translate(*vector).to_string()))
            }
            Self::Rotation { point, degrees } => {
                if degrees % 90 != 0 {
                    return Err(SpatialError::unsolvable("rotation is not a quarter turn"));
                }
                Ok(GroundTruth::Exact(
                    point.rotate_quarter_turns(degrees / 90).to_string(),
                ))
            }
        }
    }

    fn answer_type(&self) -> AnswerType {
        AnswerType::Exact
    }

    fn prompt(&self) -> String {
        match self {
            Self::QuadrantIdentification { point } => format!(
                "In which quadrant of the Cartesian plane does the point {point} lie? \
                 Answer with I, II, III, IV, or '{ON_AXIS}'."
            ),
            Self::VectorTranslation { point, vector } => format!(
                "The point {point} is translated by the vector {vector}. \
                 What are the coordinates of the resulting point? Answer in the form (x, y)."
            ),
            Self::Rotation { point, degrees } => format!(
                "The point {point} is rotated {degrees} degrees counter-clockwise about the origin. \
                 What are its new coordinates? Answer in the form (x, y)."
            ),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::QuadrantIdentification { .. } => "quadrant_identification",
            Self::VectorTranslation { .. } => "vector_translation",
            Self::Rotation { .. } => "rotation",
        }
    }

    fn check_bounds(&self) -> std::result::Result<(), String> {
        match self {
            Self::QuadrantIdentification { point } => check_point(*point, "point"),
            Self::VectorTranslation { point, vector } => {
                check_point(*point, "point")?;
                check_point(*vector, "vector")
            }
            Self::Rotation { point, degrees } => {
                check_point(*point, "point")?;
                if !matches!(degrees, 90 | 180 | 270) {
                    return Err(format!("degrees={degrees} must be 90, 180 or 270"));
                }
                Ok(())
            }
        }
    }
}
