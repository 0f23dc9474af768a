//! Closed set of category scenarios.

use serde::{Deserialize, Serialize};

use super::{AnswerType, Category, Difficulty, GroundTruth};
use crate::categories::allocation::AllocationScenario;
use crate::categories::coordinate::CoordinateScenario;
use crate::categories::distance::DistanceScenario;
use crate::categories::geometric::GeometricScenario;
use crate::categories::geospatial::GeospatialScenario;
use crate::categories::navigation::NavigationScenario;
use crate::categories::network::NetworkScenario;
use crate::categories::pattern::PatternScenario;
use crate::categories::placement::PlacementScenario;
use crate::categories::temporal::TemporalScenario;
use crate::categories::topology::TopologyScenario;
use crate::categories::visibility::VisibilityScenario;
use crate::categories::{SpatialScenario, TaskRng};
use crate::difficulty::GenerationParameters;
use crate::error::Result;

/// Structured scenario a task was rendered from, tagged by category.
///
/// Serialized as the task's `metadata` object: a `category` tag, the
/// category's `kind` tag, then the scenario fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum Scenario {
    CoordinateUnderstanding(CoordinateScenario),
    GeometricReasoning(GeometricScenario),
    DistanceComputation(DistanceScenario),
    TopologicalReasoning(TopologyScenario),
    NavigationPathfinding(NavigationScenario),
    ViewpointVisibility(VisibilityScenario),
    PatternRecognition(PatternScenario),
    NetworkInfrastructure(NetworkScenario),
    ConstraintBasedPlacement(PlacementScenario),
    ResourceAllocation(AllocationScenario),
    TemporalSpatialReasoning(TemporalScenario),
    RealEstateGeospatial(GeospatialScenario),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Scenario::CoordinateUnderstanding($s) => $body,
            Scenario::GeometricReasoning($s) => $body,
            Scenario::DistanceComputation($s) => $body,
            Scenario::TopologicalReasoning($s) => $body,
            Scenario::NavigationPathfinding($s) => $body,
            Scenario::ViewpointVisibility($s) => $body,
            Scenario::PatternRecognition($s) => $body,
            Scenario::NetworkInfrastructure($s) => $body,
            Scenario::ConstraintBasedPlacement($s) => $body,
            Scenario::ResourceAllocation($s) => $body,
            Scenario::TemporalSpatialReasoning($s) => $body,
            Scenario::RealEstateGeospatial($s) => $body,
        }
    };
}

impl Scenario {
    /// Sample a scenario of `category` for `tier`.
    pub fn sample(
        category: Category,
        tier: Difficulty,
        params: &GenerationParameters,
        rng: &mut TaskRng,
    ) -> Result<Self> {
        Ok(match category {
            Category::CoordinateUnderstanding => {
                Self::CoordinateUnderstanding(CoordinateScenario::sample(tier, params, rng)?)
            }
            Category::GeometricReasoning => {
                Self::GeometricReasoning(GeometricScenario::sample(tier, params, rng)?)
            }
            Category::DistanceComputation => {
                Self::DistanceComputation(DistanceScenario::sample(tier, params, rng)?)
            }
            Category::TopologicalReasoning => {
                Self::TopologicalReasoning(TopologyScenario::sample(tier, params, rng)?)
            }
            Category::NavigationPathfinding => {
                Self::NavigationPathfinding(NavigationScenario::sample(tier, params, rng)?)
            }
            Category::ViewpointVisibility => {
                Self::ViewpointVisibility(VisibilityScenario::sample(tier, params, rng)?)
            }
            Category::PatternRecognition => {
                Self::PatternRecognition(PatternScenario::sample(tier, params, rng)?)
            }
            Category::NetworkInfrastructure => {
                Self::NetworkInfrastructure(NetworkScenario::sample(tier, params, rng)?)
            }
            Category::ConstraintBasedPlacement => {
                Self::ConstraintBasedPlacement(PlacementScenario::sample(tier, params, rng)?)
            }
            Category::ResourceAllocation => {
                Self::ResourceAllocation(AllocationScenario::sample(tier, params, rng)?)
            }
            Category::TemporalSpatialReasoning => {
                Self::TemporalSpatialReasoning(TemporalScenario::sample(tier, params, rng)?)
            }
            Category::RealEstateGeospatial => {
                Self::RealEstateGeospatial(GeospatialScenario::sample(tier, params, rng)?)
            }
        })
    }

    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            Self::CoordinateUnderstanding(_) => Category::CoordinateUnderstanding,
            Self::GeometricReasoning(_) => Category::GeometricReasoning,
            Self::DistanceComputation(_) => Category::DistanceComputation,
            Self::TopologicalReasoning(_) => Category::TopologicalReasoning,
            Self::NavigationPathfinding(_) => Category::NavigationPathfinding,
            Self::ViewpointVisibility(_) => Category::ViewpointVisibility,
            Self::PatternRecognition(_) => Category::PatternRecognition,
            Self::NetworkInfrastructure(_) => Category::NetworkInfrastructure,
            Self::ConstraintBasedPlacement(_) => Category::ConstraintBasedPlacement,
            Self::ResourceAllocation(_) => Category::ResourceAllocation,
            Self::TemporalSpatialReasoning(_) => Category::TemporalSpatialReasoning,
            Self::RealEstateGeospatial(_) => Category::RealEstateGeospatial,
        }
    }

    /// Run the category's solver.
    pub fn solve(&self) -> Result<GroundTruth> {
        dispatch!(self, s => s.solve())
    }

    #[must_use]
    pub fn answer_type(&self) -> AnswerType {
        dispatch!(self, s => s.answer_type())
    }

    #[must_use]
    pub fn prompt(&self) -> String {
        dispatch!(self, s => s.prompt())
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        dispatch!(self, s => s.kind())
    }

    /// Declared field bounds hold; `Err` names the violated bound.
    pub fn check_bounds(&self) -> std::result::Result<(), String> {
        dispatch!(self, s => s.check_bounds())
    }
}
