//! Constraint-based placement inside rectangular rooms.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{check_point, check_positive, count_in, int_in, join_display, SpatialScenario, TaskRng};
use crate::difficulty::GenerationParameters;
use crate::error::{Result, SpatialError};
use crate::geometry::{format_number, Point, Rect};
use crate::task::{AnswerType, Difficulty, GroundTruth};

/// Largest side length of a feasibility site.
pub const MAX_ROOM_SIZE: u32 = 64;
/// Largest node budget a feasibility search may declare.
pub const MAX_SEARCH_BUDGET: usize = 1_000_000;
/// Most keep-out zones a feasibility site may carry.
pub const MAX_KEEP_OUT_ZONES: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementScenario {
    WallClearance {
        room_width: f64,
        room_height: f64,
        position: Point,
        clearance: f64,
    },
    PlacementCheck {
        room_width: f64,
        room_height: f64,
        objects: Vec<Point>,
        min_separation: f64,
        keep_out: Option<Rect>,
    },
    PlacementFeasibility {
        room_size: u32,
        object_count: usize,
        min_separation: f64,
        keep_out: Vec<Rect>,
        search_budget: usize,
    },
}

/// Outcome of a bounded placement search.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementSearch {
    /// First feasible placement in candidate order, if any.
    pub placement: Option<Vec<Point>>,
    /// Search nodes expanded.
    pub nodes: usize,
}

/// Integer grid points of `[0, size]²` outside every closed keep-out zone,
/// in row-major `(y, x)` order.
#[must_use]
pub fn placement_candidates(size: u32, keep_out: &[Rect]) -> Vec<Point> {
    let mut out = Vec::new();
    for y in 0..=size {
        for x in 0..=size {
            let p = Point::new(f64::from(x), f64::from(y));
            if !keep_out.iter().any(|r| r.contains(p)) {
                out.push(p);
            }
        }
    }
    out
}

/// Backtracking search for `count` candidates pairwise at least
/// `min_separation` apart.
///
/// # Errors
///
/// `UnsolvableScenario` when more than `budget` nodes are expanded before
/// the search is decided.
pub fn search_placement(
    candidates: &[Point],
    count: usize,
    min_separation: f64,
    budget: usize,
) -> Result<PlacementSearch> {
    struct Search<'a> {
        candidates: &'a [Point],
        count: usize,
        limit: f64,
        budget: usize,
        nodes: usize,
        chosen: Vec<usize>,
    }

    impl Search<'_> {
        fn extend(&mut self, from: usize) -> Result<bool> {
            if self.chosen.len() == self.count {
                return Ok(true);
            }
            let needed = self.count - self.chosen.len();
            for i in from..self.candidates.len() {
                if self.candidates.len() - i < needed {
                    break;
                }
                self.nodes += 1;
                if self.nodes > self.budget {
                    return Err(SpatialError::unsolvable("search budget exhausted"));
                }
                let p = self.candidates[i];
                let fits = self
                    .chosen
                    .iter()
                    .all(|&j| self.candidates[j].distance_squared(p) >= self.limit);
                if fits {
                    self.chosen.push(i);
                    if self.extend(i + 1)? {
                        return Ok(true);
                    }
                    self.chosen.pop();
                }
            }
            Ok(false)
        }
    }

    let mut search = Search {
        candidates,
        count,
        limit: min_separation * min_separation,
        budget,
        nodes: 0,
        chosen: Vec::with_capacity(count),
    };
    let found = search.extend(0)?;
    Ok(PlacementSearch {
        placement: found.then(|| search.chosen.iter().map(|&i| candidates[i]).collect()),
        nodes: search.nodes,
    })
}

fn wall_margin(width: f64, height: f64, p: Point) -> f64 {
    p.x.min(width - p.x).min(p.y).min(height - p.y)
}

fn describe_zone(r: &Rect) -> String {
    format!("the rectangle from {r}")
}

impl SpatialScenario for PlacementScenario {
    fn sample(tier: Difficulty, params: &GenerationParameters, rng: &mut TaskRng) -> Result<Self> {
        let range = params.coordinate_range as i64;
        match tier {
            Difficulty::Easy => {
                let (w, h) = (int_in(rng, 5, range), int_in(rng, 5, range));
                Ok(Self::WallClearance {
                    room_width: w,
                    room_height: h,
                    position: Point::new(int_in(rng, 0, w as i64), int_in(rng, 0, h as i64)),
                    clearance: int_in(rng, 1, 3),
                })
            }
            Difficulty::Medium => {
                let (w, h) = (int_in(rng, 6, range), int_in(rng, 6, range));
                let n = count_in(rng, 2, params.object_count);
                let objects = (0..n)
                    .map(|_| Point::new(int_in(rng, 0, w as i64), int_in(rng, 0, h as i64)))
                    .collect();
                let keep_out = (params.constraint_count >= 2 && rng.gen_bool(0.5)).then(|| {
                    let x = int_in(rng, 0, w as i64 - 2);
                    let y = int_in(rng, 0, h as i64 - 2);
                    Rect::new(x, y, x + 2.0, y + 2.0)
                });
                Ok(Self::PlacementCheck {
                    room_width: w,
                    room_height: h,
                    objects,
                    min_separation: int_in(rng, 2, 4),
                    keep_out,
                })
            }
            Difficulty::Hard => {
                let size = count_in(rng, 8, params.coordinate_range.max(8)) as u32;
                let object_count = count_in(rng, 3, params.object_count);
                let min_separation = int_in(rng, 3, i64::from(size) / 2 + 2);
                let zones = params.constraint_count.saturating_sub(1);
                let keep_out = (0..zones)
                    .map(|_| {
                        let (w, h) = (int_in(rng, 2, 4), int_in(rng, 2, 4));
                        let x = int_in(rng, 0, i64::from(size) - w as i64);
                        let y = int_in(rng, 0, i64::from(size) - h as i64);
                        Rect::new(x, y, x + w, y + h)
                    })
                    .collect();
                Ok(Self::PlacementFeasibility {
                    room_size: size,
                    object_count,
                    min_separation,
                    keep_out,
                    search_budget: params.search_budget,
                })
            }
        }
    }

    fn solve(&self) -> Result<GroundTruth> {
        match self {
            Self::WallClearance {
                room_width,
                room_height,
                position,
                clearance,
            } => {
                let room = Rect::new(0.0, 0.0, *room_width, *room_height);
                if !room.contains(*position) {
                    return Err(SpatialError::unsolvable("position outside the room"));
                }
                Ok(GroundTruth::Boolean(
                    wall_margin(*room_width, *room_height, *position) >= *clearance,
                ))
            }
            Self::PlacementCheck {
                room_width,
                room_height,
                objects,
                min_separation,
                keep_out,
            } => {
                let room = Rect::new(0.0, 0.0, *room_width, *room_height);
                let limit = min_separation * min_separation;
                let inside = objects.iter().all(|p| room.contains(*p));
                let clear = keep_out
                    .as_ref()
                    .map_or(true, |zone| objects.iter().all(|p| !zone.contains(*p)));
                let spaced = objects.iter().enumerate().all(|(i, p)| {
                    objects[..i]
                        .iter()
                        .all(|q| q.distance_squared(*p) >= limit)
                });
                Ok(GroundTruth::Boolean(inside && clear && spaced))
            }
            Self::PlacementFeasibility {
                room_size,
                object_count,
                min_separation,
                keep_out,
                search_budget,
            } => {
                let candidates = placement_candidates(*room_size, keep_out);
                let search =
                    search_placement(&candidates, *object_count, *min_separation, *search_budget)?;
                Ok(GroundTruth::Boolean(search.placement.is_some()))
            }
        }
    }

    fn answer_type(&self) -> AnswerType {
        AnswerType::Boolean
    }

    fn prompt(&self) -> String {
        match self {
            Self::WallClearance {
                room_width,
                room_height,
                position,
                clearance,
            } => format!(
                "A room spans from (0, 0) to ({}, {}). A machine is installed at {position} and \
                 must be at least {} units from every wall. Does this position satisfy the \
                 clearance requirement? Answer true or false.",
                format_number(*room_width),
                format_number(*room_height),
                format_number(*clearance)
            ),
            Self::PlacementCheck {
                room_width,
                room_height,
                objects,
                min_separation,
                keep_out,
            } => {
                let zone = keep_out.as_ref().map_or(String::new(), |r| {
                    format!(" No object may be inside or on the edge of {}.", describe_zone(r))
                });
                format!(
                    "A room spans from (0, 0) to ({}, {}). Objects are placed at {}. Every object \
                     must be inside the room and at least {} units from every other object.{zone} \
                     Is this placement valid? Answer true or false.",
                    format_number(*room_width),
                    format_number(*room_height),
                    join_display(objects),
                    format_number(*min_separation)
                )
            }
            Self::PlacementFeasibility {
                room_size,
                object_count,
                min_separation,
                keep_out,
                ..
            } => {
                let zones: Vec<String> = keep_out.iter().map(describe_zone).collect();
                let zones = if zones.is_empty() {
                    "none".to_string()
                } else {
                    zones.join("; ")
                };
                format!(
                    "A square site spans from (0, 0) to ({room_size}, {room_size}). {object_count} \
                     sensors must be placed at integer coordinates inside the site, each at least \
                     {} units from every other sensor, and none inside or on the edge of these \
                     restricted zones: {zones}. Is such a placement possible? Answer true or false.",
                    format_number(*min_separation)
                )
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::WallClearance { .. } => "wall_clearance",
            Self::PlacementCheck { .. } => "placement_check",
            Self::PlacementFeasibility { .. } => "placement_feasibility",
        }
    }

    fn check_bounds(&self) -> std::result::Result<(), String> {
        match self {
            Self::WallClearance {
                room_width,
                room_height,
                position,
                clearance,
            } => {
                check_positive(*room_width, "room_width")?;
                check_positive(*room_height, "room_height")?;
                check_positive(*clearance, "clearance")?;
                check_point(*position, "position")
            }
            Self::PlacementCheck {
                room_width,
                room_height,
                objects,
                min_separation,
                keep_out,
            } => {
                check_positive(*room_width, "room_width")?;
                check_positive(*room_height, "room_height")?;
                check_positive(*min_separation, "min_separation")?;
                if objects.is_empty() {
                    return Err("placement_check needs at least one object".to_string());
                }
                objects.iter().try_for_each(|p| check_point(*p, "object"))?;
                if let Some(r) = keep_out {
                    check_point(Point::new(r.x_min, r.y_min), "keep_out")?;
                    check_point(Point::new(r.x_max, r.y_max), "keep_out")?;
                }
                Ok(())
            }
            Self::PlacementFeasibility {
                room_size,
                object_count,
                min_separation,
                keep_out,
                search_budget,
            } => {
                if !(1..=MAX_ROOM_SIZE).contains(room_size) {
                    return Err(format!("room_size={room_size} outside [1, {MAX_ROOM_SIZE}]"));
                }
                check_positive(*min_separation, "min_separation")?;
                if *object_count == 0 {
                    return Err("object_count must be positive".to_string());
                }
                if !(1..=MAX_SEARCH_BUDGET).contains(search_budget) {
                    return Err(format!(
                        "search_budget={search_budget} outside [1, {MAX_SEARCH_BUDGET}]"
                    ));
                }
                if keep_out.len() > MAX_KEEP_OUT_ZONES {
                    return Err(format!(
                        "{} keep-out zones exceed {MAX_KEEP_OUT_ZONES}",
                        keep_out.len()
                    ));
                }
                for r in keep_out {
                    check_point(Point::new(r.x_min, r.y_min), "keep_out")?;
                    check_point(Point::new(r.x_max, r.y_max), "keep_out")?;
                }
                Ok(())
            }
        }
    }
}
