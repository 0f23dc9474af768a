//! Resource allocation and facility siting.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{
    check_point, check_positive, count_in, distinct_points, int_in, join_display, sample_point,
    SpatialScenario, TaskRng,
};
use crate::difficulty::GenerationParameters;
use crate::error::{Result, SpatialError};
use crate::geometry::{format_number, round_to, Point};
use crate::task::{AnswerType, Difficulty, GroundTruth};

/// Most candidate sites a facility-location scenario may list.
pub const MAX_CANDIDATES: usize = 16;
/// Most demand points any allocation scenario may list.
pub const MAX_DEMAND: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AllocationScenario {
    SingleCoverage {
        station: Point,
        radius: f64,
        site: Point,
    },
    CoverageCount {
        stations: Vec<Point>,
        radius: f64,
        demand: Vec<Point>,
    },
    FacilityLocation {
        candidates: Vec<Point>,
        demand: Vec<Point>,
        facilities: usize,
        coverage_radius: f64,
    },
}

fn covered(site: Point, stations: &[Point], radius: f64) -> bool {
    let limit = radius * radius;
    stations.iter().any(|s| s.distance_squared(site) <= limit)
}

fn check_demand(demand: &[Point]) -> std::result::Result<(), String> {
    if demand.len() > MAX_DEMAND {
        return Err(format!("{} demand points exceed {MAX_DEMAND}", demand.len()));
    }
    Ok(())
}

/// Largest distance from any demand point to its nearest chosen site.
#[must_use]
pub fn service_distance(sites: &[Point], demand: &[Point]) -> f64 {
    demand
        .iter()
        .map(|d| {
            sites
                .iter()
                .map(|s| s.distance_to(*d))
                .fold(f64::INFINITY, f64::min)
        })
        .fold(0.0, f64::max)
}

/// Best `k`-subset of `candidates` under the minimax service distance.
///
/// Subsets are visited in lexicographic index order and the incumbent is
/// replaced only on strict improvement, so the first optimal subset wins.
/// Returns `None` when `k` is zero, exceeds the candidate count, or there
/// is no demand.
#[must_use]
pub fn optimal_sites(candidates: &[Point], demand: &[Point], k: usize) -> Option<(Vec<usize>, f64)> {
    let m = candidates.len();
    if k == 0 || k > m || demand.is_empty() {
        return None;
    }

    let mut combo: Vec<usize> = (0..k).collect();
    let mut best: Option<(Vec<usize>, f64)> = None;
    loop {
        let sites: Vec<Point> = combo.iter().map(|&i| candidates[i]).collect();
        let cost = service_distance(&sites, demand);
        if best.as_ref().map_or(true, |(_, b)| cost < *b) {
            best = Some((combo.clone(), cost));
        }

        // Advance to the next combination in lexicographic order.
        let Some(i) = (0..k).rev().find(|&i| combo[i] != i + m - k) else {
            break;
        };
        combo[i] += 1;
        for j in (i + 1)..k {
            combo[j] = combo[j - 1] + 1;
        }
    }
    best
}

impl SpatialScenario for AllocationScenario {
    fn sample(tier: Difficulty, params: &GenerationParameters, rng: &mut TaskRng) -> Result<Self> {
        let range = params.coordinate_range as i64;
        match tier {
            Difficulty::Easy => {
                let pts = distinct_points(rng, 2, 0, range)?;
                Ok(Self::SingleCoverage {
                    station: pts[0],
                    radius: int_in(rng, 2, (range / 2).max(2)),
                    site: pts[1],
                })
            }
            Difficulty::Medium => {
                let k = count_in(rng, 2, params.resource_count);
                let n = count_in(rng, 6, params.demand_count);
                let stations = distinct_points(rng, k, 0, range)?;
                let demand = (0..n).map(|_| sample_point(rng, 0, range)).collect();
                Ok(Self::CoverageCount {
                    stations,
                    radius: int_in(rng, 2, 4),
                    demand,
                })
            }
            Difficulty::Hard => {
                let m = count_in(rng, 5, params.candidate_count);
                let n = count_in(rng, 8, params.demand_count);
                let facilities = count_in(rng, 2, params.resource_count);
                let candidates = distinct_points(rng, m, 0, range)?;
                let demand = (0..n)
                    .map(|_| {
                        let c = candidates[rng.gen_range(0..candidates.len())];
                        Point::new(
                            (c.x + int_in(rng, -4, 4)).clamp(0.0, range as f64),
                            (c.y + int_in(rng, -4, 4)).clamp(0.0, range as f64),
                        )
                    })
                    .collect();
                Ok(Self::FacilityLocation {
                    candidates,
                    demand,
                    facilities,
                    coverage_radius: int_in(rng, 6, 10),
                })
            }
        }
    }

    fn solve(&self) -> Result<GroundTruth> {
        match self {
            Self::SingleCoverage {
                station,
                radius,
                site,
            } => Ok(GroundTruth::Boolean(covered(*site, &[*station], *radius))),
            Self::CoverageCount {
                stations,
                radius,
                demand,
            } => {
                if stations.is_empty() {
                    return Err(SpatialError::unsolvable("no stations"));
                }
                let count = demand
                    .iter()
                    .filter(|d| covered(**d, stations, *radius))
                    .count();
                Ok(GroundTruth::Numerical(count as f64))
            }
            Self::FacilityLocation {
                candidates,
                demand,
                facilities,
                coverage_radius,
            } => {
                let (_, cost) = optimal_sites(candidates, demand, *facilities)
                    .ok_or_else(|| SpatialError::unsolvable("no feasible site selection"))?;
                if cost > *coverage_radius {
                    return Err(SpatialError::unsolvable(
                        "full coverage is not achievable within the radius",
                    ));
                }
                Ok(GroundTruth::Numerical(round_to(cost, 2)))
            }
        }
    }

    fn answer_type(&self) -> AnswerType {
        match self {
            Self::SingleCoverage { .. } => AnswerType::Boolean,
            Self::CoverageCount { .. } | Self::FacilityLocation { .. } => AnswerType::Numerical,
        }
    }

    fn prompt(&self) -> String {
        match self {
            Self::SingleCoverage {
                station,
                radius,
                site,
            } => format!(
                "A cell tower at {station} covers every point within {} units (inclusive). Is the \
                 house at {site} covered? Answer true or false.",
                format_number(*radius)
            ),
            Self::CoverageCount {
                stations,
                radius,
                demand,
            } => format!(
                "Fire stations are located at {}. Each station covers every point within {} \
                 units (inclusive). Buildings are located at {}. How many buildings are \
                 covered by at least one station?",
                join_display(stations),
                format_number(*radius),
                join_display(demand)
            ),
            Self::FacilityLocation {
                candidates,
                demand,
                facilities,
                coverage_radius,
            } => format!(
                "A city will open {facilities} warehouses, chosen from the candidate sites {}. \
                 Customers are located at {}. Each customer is served by its nearest open \
                 warehouse, and every customer must be within {} units of one. Choose the sites \
                 that minimize the largest customer-to-warehouse distance. What is that \
                 distance? Round to 2 decimal places.",
                join_display(candidates),
                join_display(demand),
                format_number(*coverage_radius)
            ),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::SingleCoverage { .. } => "single_coverage",
            Self::CoverageCount { .. } => "coverage_count",
            Self::FacilityLocation { .. } => "facility_location",
        }
    }

    fn check_bounds(&self) -> std::result::Result<(), String> {
        match self {
            Self::SingleCoverage {
                station,
                radius,
                site,
            } => {
                check_positive(*radius, "radius")?;
                check_point(*station, "station")?;
                check_point(*site, "site")
            }
            Self::CoverageCount {
                stations,
                radius,
                demand,
            } => {
                check_positive(*radius, "radius")?;
                check_demand(demand)?;
                if stations.len() > MAX_CANDIDATES {
                    return Err(format!("{} stations exceed {MAX_CANDIDATES}", stations.len()));
                }
                stations.iter().try_for_each(|p| check_point(*p, "station"))?;
                demand.iter().try_for_each(|p| check_point(*p, "demand"))
            }
            Self::FacilityLocation {
                candidates,
                demand,
                facilities,
                coverage_radius,
            } => {
                check_positive(*coverage_radius, "coverage_radius")?;
                if candidates.len() > MAX_CANDIDATES {
                    return Err(format!(
                        "{} candidates exceed {MAX_CANDIDATES}",
                        candidates.len()
                    ));
                }
                check_demand(demand)?;
                if *facilities == 0 || *facilities > candidates.len() {
                    return Err(format!(
                        "facilities={facilities} must be in 1..={}",
                        candidates.len()
                    ));
                }
                candidates
                    .iter()
                    .try_for_each(|p| check_point(*p, "candidate"))?;
                demand.iter().try_for_each(|p| check_point(*p, "demand"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_single_coverage_boundary_inclusive() {
        let s = AllocationScenario::SingleCoverage {
            station: Point::new(0.0, 0.0),
            radius: 5.0,
            site: Point::new(3.0, 4.0),
        };
        assert_eq!(s.solve().unwrap(), GroundTruth::Boolean(true));
    }

    #[test]
    fn test_coverage_count() {
        let s = AllocationScenario::CoverageCount {
            stations: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
            radius: 2.0,
            demand: vec![
                Point::new(1.0, 1.0),
                Point::new(5.0, 0.0),
                Point::new(10.0, 2.0),
            ],
        };
        assert_eq!(s.solve().unwrap(), GroundTruth::Numerical(2.0));
    }

    #[test]
    fn test_optimal_sites_prefers_first_optimum() {
        let candidates = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 0.0),
        ];
        let demand = vec![Point::new(1.0, 0.0), Point::new(9.0, 0.0)];
        let (sites, cost) = optimal_sites(&candidates, &demand, 2).unwrap();
        assert_eq!(sites, vec![0, 1]);
        assert_eq!(cost, 1.0);
        assert!(optimal_sites(&candidates, &demand, 4).is_none());
    }

    #[test]
    fn test_facility_location_requires_full_coverage() {
        let s = AllocationScenario::FacilityLocation {
            candidates: vec![Point::new(0.0, 0.0), Point::new(20.0, 20.0)],
            demand: vec![Point::new(10.0, 10.0)],
            facilities: 1,
            coverage_radius: 6.0,
        };
        assert!(s.solve().unwrap_err().is_redraw());
    }

    #[test]
    fn test_sampled_facility_answers_respect_radius() {
        let params = GenerationParameters {
            coordinate_range: 20,
            resource_count: 3,
            demand_count: 16,
            candidate_count: 8,
            ..GenerationParameters::default()
        };
        let mut rng = TaskRng::seed_from_u64(30);
        let mut solved = 0;
        for _ in 0..60 {
            let s = AllocationScenario::sample(Difficulty::Hard, &params, &mut rng).unwrap();
            if let (Ok(truth), AllocationScenario::FacilityLocation { coverage_radius, .. }) =
                (s.solve(), &s)
            {
                solved += 1;
                assert!(truth.as_f64().unwrap() <= *coverage_radius);
            }
        }
        assert!(solved > 0);
    }

    fn grid_points(count: usize) -> Vec<Point> {
        (0..count)
            .map(|i| Point::new((i % 20) as f64, (i / 20) as f64))
            .collect()
    }

    #[test]
    fn test_facility_location_size_caps() {
        let scenario = |candidates: usize, demand: usize, facilities: usize| {
            AllocationScenario::FacilityLocation {
                candidates: grid_points(candidates),
                demand: grid_points(demand),
                facilities,
                coverage_radius: 6.0,
            }
        };
        assert!(scenario(MAX_CANDIDATES, MAX_DEMAND, 8).check_bounds().is_ok());

        let wide = scenario(200, 10, 100).check_bounds().unwrap_err();
        assert!(wide.contains("candidates"), "{wide}");
        assert!(scenario(MAX_CANDIDATES + 1, 10, 2).check_bounds().is_err());

        let dense = scenario(8, MAX_DEMAND + 1, 2).check_bounds().unwrap_err();
        assert!(dense.contains("demand"), "{dense}");

        assert!(scenario(8, 10, 9).check_bounds().is_err());
        assert!(scenario(8, 10, 0).check_bounds().is_err());
    }

    #[test]
    fn test_coverage_count_size_caps() {
        let scenario = |stations: usize, demand: usize| AllocationScenario::CoverageCount {
            stations: grid_points(stations),
            radius: 2.0,
            demand: grid_points(demand),
        };
        assert!(scenario(4, 40).check_bounds().is_ok());
        assert!(scenario(MAX_CANDIDATES + 1, 40).check_bounds().is_err());
        assert!(scenario(4, MAX_DEMAND + 1).check_bounds().is_err());
    }
}
