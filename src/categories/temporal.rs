//! Temporal-spatial reasoning about objects in uniform straight-line motion.

use serde::{Deserialize, Serialize};

use super::{check_point, check_positive, int_in, sample_point, SpatialScenario, TaskRng};
use crate::difficulty::GenerationParameters;
use crate::error::{Result, SpatialError};
use crate::geometry::{format_number, round_to, Point};
use crate::task::{AnswerType, Difficulty, GroundTruth};

/// Distances closer than this to a decision threshold are treated as ties.
const BOUNDARY_EPSILON: f64 = 1e-6;

/// Object moving from `start` with constant `velocity` (units per second).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingObject {
    pub start: Point,
    pub velocity: Point,
}

impl MovingObject {
    #[must_use]
    pub fn position_at(&self, t: f64) -> Point {
        Point::new(self.start.x + self.velocity.x * t, self.start.y + self.velocity.y * t)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TemporalScenario {
    PositionAfterTime {
        object: MovingObject,
        time: f64,
    },
    ProximityCheck {
        first: MovingObject,
        second: MovingObject,
        threshold: f64,
        horizon: f64,
    },
    CollisionTime {
        first: MovingObject,
        second: MovingObject,
        collision_radius: f64,
        horizon: f64,
    },
}

/// Relative position and velocity of `b` as seen from `a`.
fn relative(a: &MovingObject, b: &MovingObject) -> (Point, Point) {
    (
        Point::new(b.start.x - a.start.x, b.start.y - a.start.y),
        Point::new(b.velocity.x - a.velocity.x, b.velocity.y - a.velocity.y),
    )
}

/// Smallest separation of the two objects over `[0, horizon]`.
#[must_use]
pub fn closest_approach(a: &MovingObject, b: &MovingObject, horizon: f64) -> f64 {
    let (p, v) = relative(a, b);
    let speed_sq = v.x * v.x + v.y * v.y;
    let t = if speed_sq == 0.0 {
        0.0
    } else {
        (-(p.x * v.x + p.y * v.y) / speed_sq).clamp(0.0, horizon)
    };
    a.position_at(t).distance_to(b.position_at(t))
}

/// Earliest `t` in `[0, horizon]` at which the objects are within `radius`.
#[must_use]
pub fn first_contact(a: &MovingObject, b: &MovingObject, radius: f64, horizon: f64) -> Option<f64> {
    let (p, v) = relative(a, b);
    let c = p.x * p.x + p.y * p.y - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    let qa = v.x * v.x + v.y * v.y;
    if qa == 0.0 {
        return None;
    }
    let qb = 2.0 * (p.x * v.x + p.y * v.y);
    let disc = qb * qb - 4.0 * qa * c;
    if disc < 0.0 {
        return None;
    }
    let t = (-qb - disc.sqrt()) / (2.0 * qa);
    (0.0..=horizon).contains(&t).then_some(t)
}

fn sample_velocity(rng: &mut TaskRng, max: i64) -> Point {
    Point::new(int_in(rng, -max, max), int_in(rng, -max, max))
}

fn describe(name: &str, o: &MovingObject) -> String {
    format!(
        "{name} starts at {} with velocity {} units per second",
        o.start, o.velocity
    )
}

impl SpatialScenario for TemporalScenario {
    fn sample(tier: Difficulty, params: &GenerationParameters, rng: &mut TaskRng) -> Result<Self> {
        let range = params.coordinate_range as i64;
        let horizon = params.time_horizon.max(2) as i64;
        match tier {
            Difficulty::Easy => {
                let object = MovingObject {
                    start: sample_point(rng, -range, range),
                    velocity: sample_velocity(rng, 3),
                };
                if object.velocity == Point::new(0.0, 0.0) {
                    return Err(SpatialError::unsolvable("stationary object"));
                }
                Ok(Self::PositionAfterTime {
                    object,
                    time: int_in(rng, 1, horizon),
                })
            }
            Difficulty::Medium => Ok(Self::ProximityCheck {
                first: MovingObject {
                    start: sample_point(rng, -range, range),
                    velocity: sample_velocity(rng, 2),
                },
                second: MovingObject {
                    start: sample_point(rng, -range, range),
                    velocity: sample_velocity(rng, 2),
                },
                threshold: int_in(rng, 1, 4),
                horizon: horizon as f64,
            }),
            Difficulty::Hard => {
                // Aim both objects at a shared point, then nudge one start so
                // the meeting is near rather than exact.
                let half = (range / 2).max(1);
                let meet = sample_point(rng, -half, half);
                let at = int_in(rng, 2, (horizon - 1).max(2));
                let build = |rng: &mut TaskRng, jitter: i64| {
                    let velocity = sample_velocity(rng, 2);
                    let start = Point::new(
                        meet.x - velocity.x * at + int_in(rng, -jitter, jitter),
                        meet.y - velocity.y * at + int_in(rng, -jitter, jitter),
                    );
                    MovingObject { start, velocity }
                };
                let first = build(rng, 0);
                let second = build(rng, 1);
                Ok(Self::CollisionTime {
                    first,
                    second,
                    collision_radius: int_in(rng, 1, 2),
                    horizon: horizon as f64,
                })
            }
        }
    }

    fn solve(&self) -> Result<GroundTruth> {
        match self {
            Self::PositionAfterTime { object, time } => {
                Ok(GroundTruth::Exact(object.position_at(*time).to_string()))
            }
            Self::ProximityCheck {
                first,
                second,
                threshold,
                horizon,
            } => {
                let closest = closest_approach(first, second, *horizon);
                if (closest - threshold).abs() < BOUNDARY_EPSILON {
                    return Err(SpatialError::unsolvable("closest approach equals threshold"));
                }
                Ok(GroundTruth::Boolean(closest < *threshold))
            }
            Self::CollisionTime {
                first,
                second,
                collision_radius,
                horizon,
            } => {
                let t = first_contact(first, second, *collision_radius, *horizon)
                    .ok_or_else(|| SpatialError::unsolvable("no contact within the horizon"))?;
                if t == 0.0 {
                    return Err(SpatialError::unsolvable("objects start in contact"));
                }
                Ok(GroundTruth::Numerical(round_to(t, 2)))
            }
        }
    }

    fn answer_type(&self) -> AnswerType {
        match self {
            Self::PositionAfterTime { .. } => AnswerType::Exact,
            Self::ProximityCheck { .. } => AnswerType::Boolean,
            Self::CollisionTime { .. } => AnswerType::Numerical,
        }
    }

    fn prompt(&self) -> String {
        match self {
            Self::PositionAfterTime { object, time } => format!(
                "A drone starts at {} and moves with constant velocity {} units per second. \
                 Where is it after {} seconds? Answer in the form (x, y).",
                object.start,
                object.velocity,
                format_number(*time)
            ),
            Self::ProximityCheck {
                first,
                second,
                threshold,
                horizon,
            } => format!(
                "{}. {}. Both move in straight lines at constant velocity. During the first {} \
                 seconds, do they ever come within {} units of each other? Answer true or false.",
                describe("Vehicle A", first),
                describe("Vehicle B", second),
                format_number(*horizon),
                format_number(*threshold)
            ),
            Self::CollisionTime {
                first,
                second,
                collision_radius,
                horizon,
            } => format!(
                "{}. {}. Both move in straight lines at constant velocity. They are on a \
                 collision course if their centres come within {} units of each other. At what \
                 time, in seconds within the first {} seconds, do they first come that close? \
                 Round to 2 decimal places.",
                describe("Ship A", first),
                describe("Ship B", second),
                format_number(*collision_radius),
                format_number(*horizon)
            ),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::PositionAfterTime { .. } => "position_after_time",
            Self::ProximityCheck { .. } => "proximity_check",
            Self::CollisionTime { .. } => "collision_time",
        }
    }

    fn check_bounds(&self) -> std::result::Result<(), String> {
        let check_object = |o: &MovingObject, name: &str| -> std::result::Result<(), String> {
            check_point(o.start, name)?;
            check_point(o.velocity, name)
        };
        match self {
            Self::PositionAfterTime { object, time } => {
                check_object(object, "object")?;
                check_positive(*time, "time")
            }
            Self::ProximityCheck {
                first,
                second,
                threshold,
                horizon,
            } => {
                check_object(first, "first")?;
                check_object(second, "second")?;
                check_positive(*threshold, "threshold")?;
                check_positive(*horizon, "horizon")
            }
            Self::CollisionTime {
                first,
                second,
                collision_radius,
                horizon,
            } => {
                check_object(first, "first")?;
                check_object(second, "second")?;
                check_positive(*collision_radius, "collision_radius")?;
                check_positive(*horizon, "horizon")
            }
        }
    }
}
