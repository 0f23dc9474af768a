//! The twelve task categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SpatialError;

/// Spatial-reasoning category.
///
/// Serialized by its snake_case name (e.g. `"navigation_pathfinding"`);
/// task ids use the short [`Category::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    CoordinateUnderstanding,
    GeometricReasoning,
    DistanceComputation,
    TopologicalReasoning,
    NavigationPathfinding,
    ViewpointVisibility,
    PatternRecognition,
    NetworkInfrastructure,
    ConstraintBasedPlacement,
    ResourceAllocation,
    TemporalSpatialReasoning,
    RealEstateGeospatial,
}

/// Grouping of categories by the kind of reasoning they exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// Coordinates, shapes, distances, region relations.
    Foundational,
    /// Navigation, visibility, patterns, networks.
    CorePlanning,
    /// Placement, allocation, motion, geospatial compliance.
    Advanced,
}

impl Family {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Foundational => "foundational",
            Self::CorePlanning => "core_planning",
            Self::Advanced => "advanced",
        }
    }

    #[must_use]
    pub fn all() -> &'static [Family] {
        &[Self::Foundational, Self::CorePlanning, Self::Advanced]
    }

    /// Categories belonging to this family, in catalogue order.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        Category::all()
            .iter()
            .copied()
            .filter(|c| c.family() == *self)
            .collect()
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Category {
    /// Short code used as the task id prefix.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::CoordinateUnderstanding => "CU",
            Self::GeometricReasoning => "GR",
            Self::DistanceComputation => "DC",
            Self::TopologicalReasoning => "TR",
            Self::NavigationPathfinding => "NP",
            Self::ViewpointVisibility => "VVA",
            Self::PatternRecognition => "PRA",
            Self::NetworkInfrastructure => "NI",
            Self::ConstraintBasedPlacement => "CBP",
            Self::ResourceAllocation => "RAO",
            Self::TemporalSpatialReasoning => "TSR",
            Self::RealEstateGeospatial => "RE",
        }
    }

    /// Snake-case name used in file paths and JSON.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CoordinateUnderstanding => "coordinate_understanding",
            Self::GeometricReasoning => "geometric_reasoning",
            Self::DistanceComputation => "distance_computation",
            Self::TopologicalReasoning => "topological_reasoning",
            Self::NavigationPathfinding => "navigation_pathfinding",
            Self::ViewpointVisibility => "viewpoint_visibility",
            Self::PatternRecognition => "pattern_recognition",
            Self::NetworkInfrastructure => "network_infrastructure",
            Self::ConstraintBasedPlacement => "constraint_based_placement",
            Self::ResourceAllocation => "resource_allocation",
            Self::TemporalSpatialReasoning => "temporal_spatial_reasoning",
            Self::RealEstateGeospatial => "real_estate_geospatial",
        }
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::CoordinateUnderstanding => "Quadrants, translations and rotations of points",
            Self::GeometricReasoning => "Areas, perimeters and rectangle relationships",
            Self::DistanceComputation => "Planar metrics, nearest points and great-circle routes",
            Self::TopologicalReasoning => "Region adjacency, containment and connectivity",
            Self::NavigationPathfinding => "Shortest paths on obstacle grids",
            Self::ViewpointVisibility => "Line of sight past obstacles",
            Self::PatternRecognition => "Point-set structure: quadrants, centroids, clusters",
            Self::NetworkInfrastructure => "Connectivity and failure propagation in networks",
            Self::ConstraintBasedPlacement => "Object placement under spacing and zone constraints",
            Self::ResourceAllocation => "Coverage and facility location",
            Self::TemporalSpatialReasoning => "Moving objects, proximity and collision timing",
            Self::RealEstateGeospatial => "Zoning, amenities and composite site predicates",
        }
    }

    #[must_use]
    pub fn family(&self) -> Family {
        match self {
            Self::CoordinateUnderstanding
            | Self::GeometricReasoning
            | Self::DistanceComputation
            | Self::TopologicalReasoning => Family::Foundational,
            Self::NavigationPathfinding
            | Self::ViewpointVisibility
            | Self::PatternRecognition
            | Self::NetworkInfrastructure => Family::CorePlanning,
            Self::ConstraintBasedPlacement
            | Self::ResourceAllocation
            | Self::TemporalSpatialReasoning
            | Self::RealEstateGeospatial => Family::Advanced,
        }
    }

    /// All categories in catalogue order.
    #[must_use]
    pub fn all() -> &'static [Category] {
        &[
            Self::CoordinateUnderstanding,
            Self::GeometricReasoning,
            Self::DistanceComputation,
            Self::TopologicalReasoning,
            Self::NavigationPathfinding,
            Self::ViewpointVisibility,
            Self::PatternRecognition,
            Self::NetworkInfrastructure,
            Self::ConstraintBasedPlacement,
            Self::ResourceAllocation,
            Self::TemporalSpatialReasoning,
            Self::RealEstateGeospatial,
        ]
    }

    /// Look up a category by its short code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Category> {
        Self::all().iter().copied().find(|c| c.code() == code)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = SpatialError;

    /// Accepts either the snake_case name or the short code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.name() == s || c.code() == s)
            .ok_or_else(|| SpatialError::invalid_parameter("category", s, "unknown category"))
    }
}
