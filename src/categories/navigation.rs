//! Navigation and pathfinding on obstacle grids.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{count_in, pick, SpatialScenario, TaskRng};
use crate::difficulty::GenerationParameters;
use crate::error::{Result, SpatialError};
use crate::geometry::round_to;
use crate::graph::{find_path, Cell, Grid, SearchAlgorithm};
use crate::task::{AnswerType, Difficulty, GroundTruth};

/// Largest grid side a navigation scenario may declare.
pub const MAX_GRID_SIZE: usize = 64;

/// Grid, blocked cells, endpoints and the search the prompt names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRoute {
    pub grid_size: usize,
    pub obstacles: Vec<Cell>,
    pub start_pos: Cell,
    pub end_pos: Cell,
    pub algorithm: SearchAlgorithm,
}

impl GridRoute {
    #[must_use]
    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_size, &self.obstacles)
    }

    fn describe(&self) -> String {
        let obstacles = if self.obstacles.is_empty() {
            "none".to_string()
        } else {
            self.obstacles
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "A robot moves on a {n}x{n} grid with rows and columns numbered from 0. \
             Cells are written as (row,col). It can move one cell up, down, left or right \
             per step and cannot enter blocked cells. Blocked cells: {obstacles}. \
             The robot starts at {} and must reach {}.",
            self.start_pos,
            self.end_pos,
            n = self.grid_size,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavigationScenario {
    ShortestPathLength(GridRoute),
    ShortestPath(GridRoute),
}

impl NavigationScenario {
    #[must_use]
    pub fn route(&self) -> &GridRoute {
        match self {
            Self::ShortestPathLength(r) | Self::ShortestPath(r) => r,
        }
    }
}

fn random_cell(rng: &mut TaskRng, n: usize) -> Cell {
    Cell::new(rng.gen_range(0..n), rng.gen_range(0..n))
}

fn sample_route(rng: &mut TaskRng, params: &GenerationParameters) -> Result<GridRoute> {
    let n = params.grid_size.max(2);
    let min_separation = n - 1;

    let mut endpoints = None;
    for _ in 0..50 {
        let (a, b) = (random_cell(rng, n), random_cell(rng, n));
        if a.manhattan(b) >= min_separation {
            endpoints = Some((a, b));
            break;
        }
    }
    let (start_pos, end_pos) =
        endpoints.ok_or_else(|| SpatialError::unsolvable("endpoints too close"))?;

    let target = count_in(rng, (params.obstacle_count / 2).max(1), params.obstacle_count);
    let mut obstacles = BTreeSet::new();
    let mut tries = 0;
    while obstacles.len() < target && tries < target * 20 {
        tries += 1;
        let c = random_cell(rng, n);
        if c != start_pos && c != end_pos {
            obstacles.insert(c);
        }
    }

    Ok(GridRoute {
        grid_size: n,
        obstacles: obstacles.into_iter().collect(),
        start_pos,
        end_pos,
        algorithm: pick(rng, SearchAlgorithm::all())?,
    })
}

impl SpatialScenario for NavigationScenario {
    fn sample(tier: Difficulty, params: &GenerationParameters, rng: &mut TaskRng) -> Result<Self> {
        let route = sample_route(rng, params)?;
        Ok(match tier {
            Difficulty::Easy => Self::ShortestPathLength(route),
            Difficulty::Medium | Difficulty::Hard => Self::ShortestPath(route),
        })
    }

    fn solve(&self) -> Result<GroundTruth> {
        let route = self.route();
        let path = find_path(&route.grid(), route.start_pos, route.end_pos, route.algorithm)
            .ok_or_else(|| SpatialError::unsolvable("no path between endpoints"))?;
        if path.cost == 0 {
            return Err(SpatialError::unsolvable("start equals end"));
        }
        Ok(match self {
            Self::ShortestPathLength(_) => GroundTruth::Numerical(round_to(path.cost as f64, 2)),
            Self::ShortestPath(_) => GroundTruth::Sequence(path.cells),
        })
    }

    fn answer_type(&self) -> AnswerType {
        match self {
            Self::ShortestPathLength(_) => AnswerType::Numerical,
            Self::ShortestPath(_) => AnswerType::Sequence,
        }
    }

    fn prompt(&self) -> String {
        match self {
            Self::ShortestPathLength(r) => format!(
                "{} Using {}, what is the minimum number of steps needed?",
                r.describe(),
                r.algorithm.label()
            ),
            Self::ShortestPath(r) => format!(
                "{} Using {}, give a shortest path as the ordered list of cells visited, \
                 from the start cell to the goal cell inclusive.",
                r.describe(),
                r.algorithm.label()
            ),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::ShortestPathLength(_) => "shortest_path_length",
            Self::ShortestPath(_) => "shortest_path",
        }
    }

    fn check_bounds(&self) -> std::result::Result<(), String> {
        let route = self.route();
        if !(2..=MAX_GRID_SIZE).contains(&route.grid_size) {
            return Err(format!(
                "grid_size={} outside [2, {MAX_GRID_SIZE}]",
                route.grid_size
            ));
        }
        let grid = route.grid();
        for (name, c) in [("start_pos", route.start_pos), ("end_pos", route.end_pos)] {
            if !grid.in_bounds(c) {
                return Err(format!("{name} {c} outside the grid"));
            }
            if grid.is_blocked(c) {
                return Err(format!("{name} {c} is an obstacle"));
            }
        }
        if let Some(c) = route.obstacles.iter().find(|c| !grid.in_bounds(**c)) {
            return Err(format!("obstacle {c} outside the grid"));
        }
        Ok(())
    }
}
