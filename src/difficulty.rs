//! Difficulty controller.
//!
//! Maps `(category, tier)` to the complexity knobs a generator samples
//! from. Knobs are enum keys rather than strings, and every knob is
//! non-decreasing from easy to medium to hard for every category.
//!
//! # Example
//!
//! ```
//! use spatial_eval::difficulty::{ComplexityParam, DifficultyController};
//! use spatial_eval::task::{Category, Difficulty};
//!
//! let easy = DifficultyController::parameters(Category::NavigationPathfinding, Difficulty::Easy);
//! let hard = DifficultyController::parameters(Category::NavigationPathfinding, Difficulty::Hard);
//! assert!(hard.get(ComplexityParam::GridSize) > easy.get(ComplexityParam::GridSize));
//! assert!(DifficultyController::violations().is_empty());
//! ```

use serde::Serialize;
use std::fmt;

use crate::task::{Category, Difficulty};

/// Complexity knob consumed by the generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityParam {
    /// Bound on sampled coordinates (or room/plot side length).
    CoordinateRange,
    /// Side length of navigation/visibility grids.
    GridSize,
    /// Maximum number of obstacles.
    ObstacleCount,
    /// Maximum number of points in a point set.
    PointCount,
    /// Maximum polygon vertex count.
    VertexCount,
    /// Maximum number of regions.
    RegionCount,
    /// Maximum network node count.
    NodeCount,
    /// Links added beyond a spanning tree.
    ExtraEdgeCount,
    /// Maximum number of failed links or nodes.
    FailureCount,
    /// Maximum number of placed or moving objects.
    ObjectCount,
    /// Number of simultaneous constraints.
    ConstraintCount,
    /// Maximum number of demand points.
    DemandCount,
    /// Maximum number of candidate facility sites.
    CandidateCount,
    /// Maximum number of resources to place.
    ResourceCount,
    /// Length of the simulated time window.
    TimeHorizon,
    /// Node budget for exhaustive placement search.
    SearchBudget,
}

impl ComplexityParam {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CoordinateRange => "coordinate_range",
            Self::GridSize => "grid_size",
            Self::ObstacleCount => "obstacle_count",
            Self::PointCount => "point_count",
            Self::VertexCount => "vertex_count",
            Self::RegionCount => "region_count",
            Self::NodeCount => "node_count",
            Self::ExtraEdgeCount => "extra_edge_count",
            Self::FailureCount => "failure_count",
            Self::ObjectCount => "object_count",
            Self::ConstraintCount => "constraint_count",
            Self::DemandCount => "demand_count",
            Self::CandidateCount => "candidate_count",
            Self::ResourceCount => "resource_count",
            Self::TimeHorizon => "time_horizon",
            Self::SearchBudget => "search_budget",
        }
    }

    #[must_use]
    pub fn all() -> &'static [ComplexityParam] {
        &[
            Self::CoordinateRange,
            Self::GridSize,
            Self::ObstacleCount,
            Self::PointCount,
            Self::VertexCount,
            Self::RegionCount,
            Self::NodeCount,
            Self::ExtraEdgeCount,
            Self::FailureCount,
            Self::ObjectCount,
            Self::ConstraintCount,
            Self::DemandCount,
            Self::CandidateCount,
            Self::ResourceCount,
            Self::TimeHorizon,
            Self::SearchBudget,
        ]
    }
}

impl fmt::Display for ComplexityParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Generation parameters for one `(category, tier)` cell.
///
/// Knobs a category does not use stay at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerationParameters {
    pub coordinate_range: usize,
    pub grid_size: usize,
    pub obstacle_count: usize,
    pub point_count: usize,
    pub vertex_count: usize,
    pub region_count: usize,
    pub node_count: usize,
    pub extra_edge_count: usize,
    pub failure_count: usize,
    pub object_count: usize,
    pub constraint_count: usize,
    pub demand_count: usize,
    pub candidate_count: usize,
    pub resource_count: usize,
    pub time_horizon: usize,
    pub search_budget: usize,
}

impl GenerationParameters {
    #[must_use]
    pub fn get(&self, param: ComplexityParam) -> usize {
        match param {
            ComplexityParam::CoordinateRange => self.coordinate_range,
            ComplexityParam::GridSize => self.grid_size,
            ComplexityParam::ObstacleCount => self.obstacle_count,
            ComplexityParam::PointCount => self.point_count,
            ComplexityParam::VertexCount => self.vertex_count,
            ComplexityParam::RegionCount => self.region_count,
            ComplexityParam::NodeCount => self.node_count,
            ComplexityParam::ExtraEdgeCount => self.extra_edge_count,
            ComplexityParam::FailureCount => self.failure_count,
            ComplexityParam::ObjectCount => self.object_count,
            ComplexityParam::ConstraintCount => self.constraint_count,
            ComplexityParam::DemandCount => self.demand_count,
            ComplexityParam::CandidateCount => self.candidate_count,
            ComplexityParam::ResourceCount => self.resource_count,
            ComplexityParam::TimeHorizon => self.time_horizon,
            ComplexityParam::SearchBudget => self.search_budget,
        }
    }

    /// Every knob is at least as large as in `easier`.
    #[must_use]
    pub fn dominates(&self, easier: &GenerationParameters) -> bool {
        ComplexityParam::all()
            .iter()
            .all(|&p| self.get(p) >= easier.get(p))
    }
}

/// Pure `(category, tier) -> parameters` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct DifficultyController;

impl DifficultyController {
    #[must_use]
    pub fn parameters(category: Category, tier: Difficulty) -> GenerationParameters {
        let pick = |easy: usize, medium: usize, hard: usize| match tier {
            Difficulty::Easy => easy,
            Difficulty::Medium => medium,
            Difficulty::Hard => hard,
        };
        let base = GenerationParameters::default();

        match category {
            Category::CoordinateUnderstanding => GenerationParameters {
                coordinate_range: pick(10, 10, 20),
                ..base
            },
            Category::GeometricReasoning => GenerationParameters {
                coordinate_range: pick(20, 20, 20),
                vertex_count: pick(4, 4, 7),
                ..base
            },
            Category::DistanceComputation => GenerationParameters {
                coordinate_range: pick(10, 20, 20),
                point_count: pick(2, 6, 6),
                ..base
            },
            Category::TopologicalReasoning => GenerationParameters {
                coordinate_range: pick(10, 20, 20),
                region_count: pick(5, 5, 8),
                ..base
            },
            Category::NavigationPathfinding => GenerationParameters {
                grid_size: pick(5, 7, 10),
                obstacle_count: pick(3, 8, 18),
                ..base
            },
            Category::ViewpointVisibility => GenerationParameters {
                coordinate_range: pick(10, 15, 15),
                obstacle_count: pick(1, 3, 6),
                grid_size: pick(0, 0, 8),
                point_count: pick(0, 0, 5),
                ..base
            },
            Category::PatternRecognition => GenerationParameters {
                coordinate_range: pick(10, 20, 20),
                point_count: pick(8, 8, 12),
                ..base
            },
            Category::NetworkInfrastructure => GenerationParameters {
                node_count: pick(5, 7, 10),
                extra_edge_count: pick(1, 2, 4),
                failure_count: pick(0, 2, 3),
                ..base
            },
            Category::ConstraintBasedPlacement => GenerationParameters {
                coordinate_range: pick(10, 10, 12),
                object_count: pick(1, 3, 4),
                constraint_count: pick(1, 2, 3),
                search_budget: pick(0, 0, 200_000),
                ..base
            },
            Category::ResourceAllocation => GenerationParameters {
                coordinate_range: pick(10, 10, 20),
                resource_count: pick(1, 3, 3),
                demand_count: pick(1, 12, 16),
                candidate_count: pick(0, 0, 8),
                ..base
            },
            Category::TemporalSpatialReasoning => GenerationParameters {
                coordinate_range: pick(5, 15, 20),
                object_count: pick(1, 2, 2),
                time_horizon: pick(5, 10, 20),
                ..base
            },
            Category::RealEstateGeospatial => GenerationParameters {
                coordinate_range: pick(12, 20, 20),
                vertex_count: pick(4, 4, 6),
                point_count: pick(1, 5, 5),
                constraint_count: pick(1, 1, 3),
                ..base
            },
        }
    }

    /// Categories and knobs that shrink from one tier to the next.
    #[must_use]
    pub fn violations() -> Vec<(Category, ComplexityParam)> {
        let mut out = Vec::new();
        for &category in Category::all() {
            let tiers: Vec<GenerationParameters> = Difficulty::all()
                .iter()
                .map(|&t| Self::parameters(category, t))
                .collect();
            for pair in tiers.windows(2) {
                for &param in ComplexityParam::all() {
                    if pair[1].get(param) < pair[0].get(param) {
                        out.push((category, param));
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_names_unique() {
        let mut names: Vec<&str> = ComplexityParam::all().iter().map(|p| p.name()).collect();
        let n = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), n);
    }

    #[test]
    fn test_monotonic_for_every_category() {
        assert!(
            DifficultyController::violations().is_empty(),
            "shrinking knobs: {:?}",
            DifficultyController::violations()
        );
        for &category in Category::all() {
            let easy = DifficultyController::parameters(category, Difficulty::Easy);
            let medium = DifficultyController::parameters(category, Difficulty::Medium);
            let hard = DifficultyController::parameters(category, Difficulty::Hard);
            assert!(medium.dominates(&easy), "{category}");
            assert!(hard.dominates(&medium), "{category}");
        }
    }

    #[test]
    fn test_every_category_uses_some_knob() {
        for &category in Category::all() {
            let p = DifficultyController::parameters(category, Difficulty::Hard);
            assert_ne!(p, GenerationParameters::default(), "{category}");
        }
    }

    #[test]
    fn test_get_matches_fields() {
        let p = DifficultyController::parameters(Category::NetworkInfrastructure, Difficulty::Medium);
        assert_eq!(p.get(ComplexityParam::NodeCount), p.node_count);
        assert_eq!(p.get(ComplexityParam::FailureCount), 2);
        assert_eq!(p.get(ComplexityParam::GridSize), 0);
    }
}
