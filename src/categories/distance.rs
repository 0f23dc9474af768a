//! Distance computation: planar metrics, nearest labelled point, great-circle routes.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{check_point, count_in, distinct_points, letter_labels, pick, SpatialScenario, TaskRng};
use crate::difficulty::GenerationParameters;
use crate::error::{Result, SpatialError};
use crate::geometry::{haversine_km, round_to, DistanceMetric, GeoPoint, Point};
use crate::task::{AnswerType, Difficulty, GroundTruth};

/// Point with a display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledPoint {
    pub label: String,
    pub point: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistanceScenario {
    PairwiseDistance {
        from: Point,
        to: Point,
        metric: DistanceMetric,
    },
    ClosestPoint {
        reference: Point,
        candidates: Vec<LabeledPoint>,
    },
    GreatCircleRoute {
        waypoints: Vec<GeoPoint>,
    },
}

// Continental-US bounding box, in ten-thousandths of a degree.
const LAT_RANGE: (i64, i64) = (250_000, 480_000);
const LON_RANGE: (i64, i64) = (-1_240_000, -700_000);

fn sample_geo(rng: &mut TaskRng) -> GeoPoint {
    let lat = rng.gen_range(LAT_RANGE.0..=LAT_RANGE.1) as f64 / 10_000.0;
    let lon = rng.gen_range(LON_RANGE.0..=LON_RANGE.1) as f64 / 10_000.0;
    GeoPoint::new(lat, lon)
}

/// Index of the unique nearest candidate, `None` on a tie.
fn nearest(reference: Point, candidates: &[LabeledPoint]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    let mut tied = false;
    for (i, c) in candidates.iter().enumerate() {
        let d = reference.distance_squared(c.point);
        match best {
            Some((_, bd)) if d == bd => tied = true,
            Some((_, bd)) if d > bd => {}
            _ => {
                best = Some((i, d));
                tied = false;
            }
        }
    }
    if tied {
        None
    } else {
        best.map(|(i, _)| i)
    }
}

impl SpatialScenario for DistanceScenario {
    fn sample(tier: Difficulty, params: &GenerationParameters, rng: &mut TaskRng) -> Result<Self> {
        let range = params.coordinate_range as i64;
        match tier {
            Difficulty::Easy => {
                let pts = distinct_points(rng, 2, -range, range)?;
                Ok(Self::PairwiseDistance {
                    from: pts[0],
                    to: pts[1],
                    metric: pick(rng, DistanceMetric::all())?,
                })
            }
            Difficulty::Medium => {
                let n = count_in(rng, 3, params.point_count);
                let pts = distinct_points(rng, n + 1, -range, range)?;
                let candidates = letter_labels(n)
                    .into_iter()
                    .zip(pts[1..].iter().copied())
                    .map(|(label, point)| LabeledPoint { label, point })
                    .collect();
                Ok(Self::ClosestPoint {
                    reference: pts[0],
                    candidates,
                })
            }
            Difficulty::Hard => {
                let n = count_in(rng, 3, params.point_count);
                let waypoints = (0..n).map(|_| sample_geo(rng)).collect();
                Ok(Self::GreatCircleRoute { waypoints })
            }
        }
    }

    fn solve(&self) -> Result<GroundTruth> {
        match self {
            Self::PairwiseDistance { from, to, metric } => {
                Ok(GroundTruth::Numerical(round_to(metric.measure(*from, *to), 2)))
            }
            Self::ClosestPoint {
                reference,
                candidates,
            } => nearest(*reference, candidates)
                .map(|i| GroundTruth::Exact(candidates[i].label.clone()))
                .ok_or_else(|| SpatialError::unsolvable("closest point is tied")),
            Self::GreatCircleRoute { waypoints } => {
                if waypoints.len() < 2 {
                    return Err(SpatialError::unsolvable("route needs two waypoints"));
                }
                let total: f64 = waypoints
                    .windows(2)
                    .map(|leg| haversine_km(leg[0], leg[1]))
                    .sum();
                Ok(GroundTruth::Numerical(round_to(total, 2)))
            }
        }
    }

    fn answer_type(&self) -> AnswerType {
        match self {
            Self::ClosestPoint { .. } => AnswerType::Exact,
            Self::PairwiseDistance { .. } | Self::GreatCircleRoute { .. } => AnswerType::Numerical,
        }
    }

    fn prompt(&self) -> String {
        match self {
            Self::PairwiseDistance {
                from,
                to,
                metric: DistanceMetric::Manhattan,
            } => format!("What is the Manhattan distance between the points {from} and {to}?"),
            Self::PairwiseDistance { from, to, .. } => format!(
                "What is the Euclidean distance between the points {from} and {to}? \
                 Round to 2 decimal places."
            ),
            Self::ClosestPoint {
                reference,
                candidates,
            } => {
                let listed: Vec<String> = candidates
                    .iter()
                    .map(|c| format!("{} {}", c.label, c.point))
                    .collect();
                format!(
                    "Consider the points {}. Which point is closest to {reference} by \
                     straight-line distance? Answer with the point's label.",
                    listed.join(", ")
                )
            }
            Self::GreatCircleRoute { waypoints } => {
                let listed: Vec<String> = waypoints
                    .iter()
                    .enumerate()
                    .map(|(i, w)| format!("stop {}: {w}", i + 1))
                    .collect();
                format!(
                    "A delivery flight visits the following stops in order, given as \
                     (latitude, longitude) in decimal degrees: {}. Using the Haversine formula \
                     with an Earth radius of 6371 km, what is the total great-circle distance \
                     flown in kilometres? Round to 2 decimal places.",
                    listed.join("; ")
                )
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::PairwiseDistance { .. } => "pairwise_distance",
            Self::ClosestPoint { .. } => "closest_point",
            Self::GreatCircleRoute { .. } => "great_circle_route",
        }
    }

    fn check_bounds(&self) -> std::result::Result<(), String> {
        match self {
            Self::PairwiseDistance { from, to, .. } => {
                check_point(*from, "from")?;
                check_point(*to, "to")
            }
            Self::ClosestPoint {
                reference,
                candidates,
            } => {
                check_point(*reference, "reference")?;
                if candidates.len() < 2 {
                    return Err("closest_point needs at least two candidates".to_string());
                }
                for (i, c) in candidates.iter().enumerate() {
                    check_point(c.point, &c.label)?;
                    if candidates[..i].iter().any(|o| o.label == c.label) {
                        return Err(format!("duplicate label {}", c.label));
                    }
                }
                Ok(())
            }
            Self::GreatCircleRoute { waypoints } => {
                for w in waypoints {
                    if !(-90.0..=90.0).contains(&w.latitude)
                        || !(-180.0..=180.0).contains(&w.longitude)
                    {
                        return Err(format!("waypoint {w} outside valid lat/lon"));
                    }
                }
                Ok(())
            }
        }
    }
}
