//! Four-connected obstacle grids.
//!
//! A [`Grid`] is lowered onto a [`Graph`] whose node ids are row-major cell
//! indices, so ascending node order is lexicographic `(row, col)` order and
//! every search inherits the graph's tie-breaking.

use super::{Graph, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Grid cell `(row, col)`, serialized as `[row, col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub fn manhattan(self, other: Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    #[must_use]
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<[usize; 2]> for Cell {
    fn from([row, col]: [usize; 2]) -> Self {
        Self::new(row, col)
    }
}

impl From<Cell> for [usize; 2] {
    fn from(c: Cell) -> Self {
        [c.row, c.col]
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Search strategy named in navigation tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchAlgorithm {
    AStar,
    Dijkstra,
    Bfs,
}

impl SearchAlgorithm {
    /// Label used in prompts.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::AStar => "A*",
            Self::Dijkstra => "Dijkstra's algorithm",
            Self::Bfs => "breadth-first search",
        }
    }

    #[must_use]
    pub fn all() -> &'static [SearchAlgorithm] {
        &[Self::AStar, Self::Dijkstra, Self::Bfs]
    }
}

/// Optimal route through a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPath {
    /// Number of unit moves.
    pub cost: usize,
    /// Visited cells from start to end inclusive.
    pub cells: Vec<Cell>,
}

/// Square grid with blocked cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    obstacles: BTreeSet<Cell>,
}

impl Grid {
    #[must_use]
    pub fn new(size: usize, obstacles: &[Cell]) -> Self {
        Self {
            size,
            obstacles: obstacles.iter().copied().collect(),
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    #[must_use]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.size && cell.col < self.size
    }

    #[must_use]
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.obstacles.contains(&cell)
    }

    /// In bounds and not an obstacle.
    #[must_use]
    pub fn is_open(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.is_blocked(cell)
    }

    fn node(&self, cell: Cell) -> NodeId {
        cell.row * self.size + cell.col
    }

    fn cell(&self, node: NodeId) -> Cell {
        Cell::new(node / self.size, node % self.size)
    }

    /// Open-cell adjacency graph (row-major node ids).
    #[must_use]
    pub fn to_graph(&self) -> Graph {
        let mut edges = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                let here = Cell::new(row, col);
                if !self.is_open(here) {
                    continue;
                }
                for next in [Cell::new(row + 1, col), Cell::new(row, col + 1)] {
                    if self.is_open(next) {
                        edges.push((self.node(here), self.node(next)));
                    }
                }
            }
        }
        Graph::with_nodes(self.size * self.size, &edges, false)
    }

    /// Path starts at `start`, ends at `end`, moves one orthogonal step at a
    /// time and only visits open cells.
    #[must_use]
    pub fn is_valid_path(&self, path: &[Cell], start: Cell, end: Cell) -> bool {
        path.first() == Some(&start)
            && path.last() == Some(&end)
            && path.iter().all(|&c| self.is_open(c))
            && path.windows(2).all(|w| w[0].is_adjacent(w[1]))
    }
}

/// Find an optimal 4-connected path with the requested algorithm.
///
/// All three algorithms return a minimum-length path; they differ only in
/// which optimal path wins ties. Returns `None` when an endpoint is blocked
/// or out of bounds, or no path exists.
///
/// # Examples
///
/// ```
/// use spatial_eval::graph::{find_path, Cell, Grid, SearchAlgorithm};
///
/// let grid = Grid::new(4, &[Cell::new(0, 2), Cell::new(1, 1), Cell::new(3, 2)]);
/// let path = find_path(&grid, Cell::new(0, 0), Cell::new(3, 3), SearchAlgorithm::AStar).unwrap();
/// assert_eq!(path.cost, 6);
/// assert_eq!(path.cells.len(), 7);
/// ```
#[must_use]
pub fn find_path(grid: &Grid, start: Cell, end: Cell, algorithm: SearchAlgorithm) -> Option<GridPath> {
    if !grid.is_open(start) || !grid.is_open(end) {
        return None;
    }
    let graph = grid.to_graph();
    let (source, target) = (grid.node(start), grid.node(end));

    let nodes = match algorithm {
        SearchAlgorithm::Bfs => graph.shortest_path(source, target)?,
        SearchAlgorithm::Dijkstra => graph.dijkstra(source, target)?.0,
        SearchAlgorithm::AStar => {
            graph
                .a_star(source, target, |n| grid.cell(n).manhattan(end) as f64)?
                .0
        }
    };

    let cells: Vec<Cell> = nodes.into_iter().map(|n| grid.cell(n)).collect();
    Some(GridPath {
        cost: cells.len() - 1,
        cells,
    })
}
