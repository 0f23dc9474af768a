//! Viewpoint and visibility analysis.
//!
//! Sight lines are closed segments; an obstacle blocks a line when the
//! segment touches it anywhere, including a grazed corner.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{check_point, count_in, distinct_points, int_in, SpatialScenario, TaskRng};
use crate::difficulty::GenerationParameters;
use crate::error::{Result, SpatialError};
use crate::geometry::{segment_intersects_rect, Point, Rect};
use crate::graph::Cell;
use crate::task::{AnswerType, Difficulty, GroundTruth};

/// Grid cell with a target label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledCell {
    pub label: String,
    pub cell: Cell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisibilityScenario {
    LineOfSight {
        observer: Point,
        target: Point,
        obstacles: Vec<Rect>,
    },
    VisibleCells {
        grid_size: usize,
        obstacles: Vec<Cell>,
        observer: Cell,
        targets: Vec<LabeledCell>,
    },
}

fn cell_center(c: Cell) -> Point {
    Point::new(c.col as f64 + 0.5, c.row as f64 + 0.5)
}

fn cell_square(c: Cell) -> Rect {
    Rect::new(c.col as f64, c.row as f64, c.col as f64 + 1.0, c.row as f64 + 1.0)
}

/// Closed segment `from`-`to` misses every obstacle.
#[must_use]
pub fn has_line_of_sight(from: Point, to: Point, obstacles: &[Rect]) -> bool {
    !obstacles
        .iter()
        .any(|r| segment_intersects_rect(from, to, r))
}

fn sample_wall(rng: &mut TaskRng, observer: Point, target: Point, range: i64) -> Rect {
    let (x, y) = if rng.gen_bool(0.5) {
        let mid_x = ((observer.x + target.x) / 2.0).round() as i64;
        let mid_y = ((observer.y + target.y) / 2.0).round() as i64;
        (int_in(rng, mid_x - 2, mid_x), int_in(rng, mid_y - 2, mid_y))
    } else {
        (int_in(rng, 0, range - 1), int_in(rng, 0, range - 1))
    };
    Rect::new(x, y, x + int_in(rng, 1, 3), y + int_in(rng, 1, 3))
}

fn random_cell(rng: &mut TaskRng, n: usize) -> Cell {
    Cell::new(rng.gen_range(0..n), rng.gen_range(0..n))
}

impl SpatialScenario for VisibilityScenario {
    fn sample(tier: Difficulty, params: &GenerationParameters, rng: &mut TaskRng) -> Result<Self> {
        match tier {
            Difficulty::Easy | Difficulty::Medium => {
                let range = params.coordinate_range as i64;
                let pts = distinct_points(rng, 2, 0, range)?;
                let walls = count_in(rng, params.obstacle_count.min(2), params.obstacle_count);
                let obstacles = (0..walls)
                    .map(|_| sample_wall(rng, pts[0], pts[1], range))
                    .collect();
                Ok(Self::LineOfSight {
                    observer: pts[0],
                    target: pts[1],
                    obstacles,
                })
            }
            Difficulty::Hard => {
                let n = params.grid_size.max(3);
                let observer = random_cell(rng, n);
                let wanted = count_in(rng, 3, params.obstacle_count);
                let mut obstacles = BTreeSet::new();
                let mut tries = 0;
                while obstacles.len() < wanted && tries < 200 {
                    tries += 1;
                    let c = random_cell(rng, n);
                    if c != observer {
                        obstacles.insert(c);
                    }
                }
                let k = count_in(rng, 3, params.point_count);
                let mut cells: Vec<Cell> = Vec::with_capacity(k);
                tries = 0;
                while cells.len() < k && tries < 200 {
                    tries += 1;
                    let c = random_cell(rng, n);
                    if c != observer && !obstacles.contains(&c) && !cells.contains(&c) {
                        cells.push(c);
                    }
                }
                if cells.len() < k {
                    return Err(SpatialError::unsolvable("could not place targets"));
                }
                let targets = cells
                    .into_iter()
                    .enumerate()
                    .map(|(i, cell)| LabeledCell {
                        label: format!("T{}", i + 1),
                        cell,
                    })
                    .collect();
                Ok(Self::VisibleCells {
                    grid_size: n,
                    obstacles: obstacles.into_iter().collect(),
                    observer,
                    targets,
                })
            }
        }
    }

    fn solve(&self) -> Result<GroundTruth> {
        match self {
            Self::LineOfSight {
                observer,
                target,
                obstacles,
            } => {
                if obstacles
                    .iter()
                    .any(|r| r.contains(*observer) || r.contains(*target))
                {
                    return Err(SpatialError::unsolvable("endpoint inside an obstacle"));
                }
                Ok(GroundTruth::Boolean(has_line_of_sight(
                    *observer, *target, obstacles,
                )))
            }
            Self::VisibleCells {
                obstacles,
                observer,
                targets,
                ..
            } => {
                if obstacles.contains(observer) {
                    return Err(SpatialError::unsolvable("observer stands on an obstacle"));
                }
                let walls: Vec<Rect> = obstacles.iter().map(|&c| cell_square(c)).collect();
                let eye = cell_center(*observer);
                let visible: Vec<&str> = targets
                    .iter()
                    .filter(|t| has_line_of_sight(eye, cell_center(t.cell), &walls))
                    .map(|t| t.label.as_str())
                    .collect();
                if visible.is_empty() {
                    Ok(GroundTruth::Exact("none".to_string()))
                } else {
                    Ok(GroundTruth::Exact(visible.join(", ")))
                }
            }
        }
    }

    fn answer_type(&self) -> AnswerType {
        match self {
            Self::LineOfSight { .. } => AnswerType::Boolean,
            Self::VisibleCells { .. } => AnswerType::Exact,
        }
    }

    fn prompt(&self) -> String {
        match self {
            Self::LineOfSight {
                observer,
                target,
                obstacles,
            } => {
                let walls: Vec<String> = obstacles
                    .iter()
                    .map(|r| format!("rectangle from {r}"))
                    .collect();
                format!(
                    "An observer stands at {observer} and a target is at {target}. Solid \
                     obstacles occupy the following closed regions: {}. Can the observer see the \
                     target along a straight line? A line that touches an obstacle, even at a \
                     corner, is blocked. Answer true or false.",
                    walls.join("; ")
                )
            }
            Self::VisibleCells {
                grid_size,
                obstacles,
                observer,
                targets,
            } => {
                let blocked: Vec<String> = obstacles.iter().map(ToString::to_string).collect();
                let listed: Vec<String> = targets
                    .iter()
                    .map(|t| format!("{} at {}", t.label, t.cell))
                    .collect();
                format!(
                    "On a {n}x{n} grid with cells written as (row,col), the cells {} are solid \
                     walls filling the whole cell. An observer stands at the centre of cell \
                     {observer}. Targets: {}. A target is visible if the straight line between \
                     cell centres does not touch any wall cell, including its corners. Which \
                     targets are visible? List their labels in the order given, separated by \
                     commas, or answer \"none\".",
                    blocked.join(", "),
                    listed.join(", "),
                    n = grid_size,
                )
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::LineOfSight { .. } => "line_of_sight",
            Self::VisibleCells { .. } => "visible_cells",
        }
    }

    fn check_bounds(&self) -> std::result::Result<(), String> {
        match self {
            Self::LineOfSight {
                observer,
                target,
                obstacles,
            } => {
                check_point(*observer, "observer")?;
                check_point(*target, "target")?;
                if obstacles.is_empty() {
                    return Err("line_of_sight needs at least one obstacle".to_string());
                }
                for r in obstacles {
                    check_point(Point::new(r.x_min, r.y_min), "obstacle")?;
                    check_point(Point::new(r.x_max, r.y_max), "obstacle")?;
                }
                Ok(())
            }
            Self::VisibleCells {
                grid_size,
                obstacles,
                observer,
                targets,
            } => {
                let inside = |c: &Cell| c.row < *grid_size && c.col < *grid_size;
                if !inside(observer) {
                    return Err(format!("observer {observer} outside the grid"));
                }
                if let Some(c) = obstacles.iter().find(|c| !inside(c)) {
                    return Err(format!("obstacle {c} outside the grid"));
                }
                for t in targets {
                    if !inside(&t.cell) {
                        return Err(format!("target {} outside the grid", t.label));
                    }
                    if obstacles.contains(&t.cell) {
                        return Err(format!("target {} is a wall cell", t.label));
                    }
                }
                Ok(())
            }
        }
    }
}
