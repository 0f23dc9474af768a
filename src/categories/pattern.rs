//! Pattern recognition over point sets.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{
    check_point, check_positive, count_in, distinct_points, int_in, join_display, pick,
    SpatialScenario, TaskRng,
};
use crate::difficulty::GenerationParameters;
use crate::error::{Result, SpatialError};
use crate::geometry::{centroid, collinear, format_number, Point, Quadrant};
use crate::graph::Graph;
use crate::task::{AnswerType, Difficulty, GroundTruth};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternScenario {
    DominantQuadrant { points: Vec<Point> },
    Centroid { points: Vec<Point> },
    Collinearity { points: Vec<Point> },
    ClusterCount { points: Vec<Point>, link_distance: f64 },
}

/// Number of single-linkage clusters: points within `link_distance` of each
/// other (inclusive) share a cluster, transitively.
#[must_use]
pub fn cluster_count(points: &[Point], link_distance: f64) -> usize {
    let limit = link_distance * link_distance;
    let mut edges = Vec::new();
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            if points[i].distance_squared(points[j]) <= limit {
                edges.push((i, j));
            }
        }
    }
    Graph::with_nodes(points.len(), &edges, false).component_count()
}

fn signed_in(rng: &mut TaskRng, bound: i64, positive: bool) -> f64 {
    let magnitude = int_in(rng, 1, bound.max(1));
    if positive {
        magnitude
    } else {
        -magnitude
    }
}

fn sample_biased_quadrant_points(rng: &mut TaskRng, n: usize, range: i64) -> Result<Vec<Point>> {
    let dominant = pick(rng, Quadrant::all())?;
    let (px, py) = match dominant {
        Quadrant::I => (true, true),
        Quadrant::II => (false, true),
        Quadrant::III => (false, false),
        Quadrant::IV => (true, false),
    };
    let mut points: Vec<Point> = Vec::with_capacity(n);
    let mut tries = 0;
    while points.len() < n {
        tries += 1;
        if tries > n * 50 {
            return Err(SpatialError::unsolvable("could not place distinct points"));
        }
        let (sx, sy) = if rng.gen_bool(0.6) {
            (px, py)
        } else {
            (rng.gen_bool(0.5), rng.gen_bool(0.5))
        };
        let p = Point::new(signed_in(rng, range, sx), signed_in(rng, range, sy));
        if !points.contains(&p) {
            points.push(p);
        }
    }
    Ok(points)
}

fn sample_collinear_points(rng: &mut TaskRng, n: usize, range: i64) -> Result<Vec<Point>> {
    let half = (range / 2).max(1);
    let origin = Point::new(int_in(rng, -half, half), int_in(rng, -half, half));
    let (dx, dy) = (int_in(rng, -2, 2), int_in(rng, -2, 2));
    if dx == 0.0 && dy == 0.0 {
        return Err(SpatialError::unsolvable("zero direction"));
    }
    let mut steps: Vec<i64> = (-4..=4).collect();
    let mut chosen = Vec::with_capacity(n);
    while chosen.len() < n && !steps.is_empty() {
        chosen.push(steps.remove(rng.gen_range(0..steps.len())));
    }
    Ok(chosen
        .into_iter()
        .map(|t| Point::new(origin.x + t as f64 * dx, origin.y + t as f64 * dy))
        .collect())
}

fn sample_clusters(rng: &mut TaskRng, n: usize, range: i64) -> Result<Vec<Point>> {
    let k = count_in(rng, 2, 4);
    let centers = distinct_points(rng, k, -range, range)?;
    let mut points: Vec<Point> = Vec::with_capacity(n);
    let mut tries = 0;
    while points.len() < n {
        tries += 1;
        if tries > n * 50 {
            return Err(SpatialError::unsolvable("could not place distinct points"));
        }
        let c = centers[rng.gen_range(0..centers.len())];
        let p = Point::new(c.x + int_in(rng, -2, 2), c.y + int_in(rng, -2, 2));
        if !points.contains(&p) {
            points.push(p);
        }
    }
    Ok(points)
}

fn has_duplicates(points: &[Point]) -> bool {
    points
        .iter()
        .enumerate()
        .any(|(i, p)| points[..i].contains(p))
}

impl SpatialScenario for PatternScenario {
    fn sample(tier: Difficulty, params: &GenerationParameters, rng: &mut TaskRng) -> Result<Self> {
        let range = params.coordinate_range as i64;
        match tier {
            Difficulty::Easy => {
                let n = count_in(rng, 5, params.point_count);
                Ok(Self::DominantQuadrant {
                    points: sample_biased_quadrant_points(rng, n, range)?,
                })
            }
            Difficulty::Medium => {
                if rng.gen_bool(0.5) {
                    let n = pick(rng, &[4, 5, 8])?.min(params.point_count.max(4));
                    Ok(Self::Centroid {
                        points: distinct_points(rng, n, -range, range)?,
                    })
                } else {
                    let n = count_in(rng, 4, 5);
                    let points = if rng.gen_bool(0.5) {
                        sample_collinear_points(rng, n, range)?
                    } else {
                        distinct_points(rng, n, -range, range)?
                    };
                    Ok(Self::Collinearity { points })
                }
            }
            Difficulty::Hard => {
                let n = count_in(rng, 8, params.point_count);
                Ok(Self::ClusterCount {
                    points: sample_clusters(rng, n, range)?,
                    link_distance: int_in(rng, 3, 6),
                })
            }
        }
    }

    fn solve(&self) -> Result<GroundTruth> {
        match self {
            Self::DominantQuadrant { points } => {
                let mut counts = [0usize; 4];
                for p in points {
                    let q = p
                        .quadrant()
                        .ok_or_else(|| SpatialError::unsolvable("point lies on an axis"))?;
                    counts[q as usize] += 1;
                }
                let max = counts.iter().copied().max().unwrap_or(0);
                let mut leaders = Quadrant::all()
                    .iter()
                    .zip(counts)
                    .filter(|(_, c)| *c == max);
                match (leaders.next(), leaders.next()) {
                    (Some((q, _)), None) => Ok(GroundTruth::Exact(q.label().to_string())),
                    _ => Err(SpatialError::unsolvable("quadrant counts are tied")),
                }
            }
            Self::Centroid { points } => centroid(points)
                .map(|c| GroundTruth::Exact(c.to_string()))
                .ok_or_else(|| SpatialError::unsolvable("empty point set")),
            Self::Collinearity { points } => {
                if points.len() < 3 {
                    return Err(SpatialError::unsolvable("collinearity needs three points"));
                }
                Ok(GroundTruth::Boolean(collinear(points)))
            }
            Self::ClusterCount {
                points,
                link_distance,
            } => {
                if points.is_empty() {
                    return Err(SpatialError::unsolvable("empty point set"));
                }
                Ok(GroundTruth::Numerical(
                    cluster_count(points, *link_distance) as f64,
                ))
            }
        }
    }

    fn answer_type(&self) -> AnswerType {
        match self {
            Self::DominantQuadrant { .. } | Self::Centroid { .. } => AnswerType::Exact,
            Self::Collinearity { .. } => AnswerType::Boolean,
            Self::ClusterCount { .. } => AnswerType::Numerical,
        }
    }

    fn prompt(&self) -> String {
        match self {
            Self::DominantQuadrant { points } => format!(
                "Consider the points {}. Which quadrant contains the most points? \
                 Answer with a Roman numeral (I, II, III, or IV).",
                join_display(points)
            ),
            Self::Centroid { points } => format!(
                "What is the centroid (average position) of the points {}? \
                 Answer in the form (x, y) using exact decimals.",
                join_display(points)
            ),
            Self::Collinearity { points } => format!(
                "Do all of the points {} lie on a single straight line? Answer true or false.",
                join_display(points)
            ),
            Self::ClusterCount {
                points,
                link_distance,
            } => format!(
                "Consider the points {}. Two points belong to the same cluster if they are \
                 within a distance of {} of each other, directly or through a chain of such \
                 points. How many clusters are there?",
                join_display(points),
                format_number(*link_distance)
            ),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::DominantQuadrant { .. } => "dominant_quadrant",
            Self::Centroid { .. } => "centroid",
            Self::Collinearity { .. } => "collinearity",
            Self::ClusterCount { .. } => "cluster_count",
        }
    }

    fn check_bounds(&self) -> std::result::Result<(), String> {
        let points = match self {
            Self::DominantQuadrant { points }
            | Self::Centroid { points }
            | Self::Collinearity { points } => points,
            Self::ClusterCount {
                points,
                link_distance,
            } => {
                check_positive(*link_distance, "link_distance")?;
                points
            }
        };
        points.iter().try_for_each(|p| check_point(*p, "point"))?;
        if has_duplicates(points) {
            return Err("point set contains duplicates".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_dominant_quadrant() {
        let s = PatternScenario::DominantQuadrant {
            points: pts(&[(1.0, 1.0), (2.0, 3.0), (-1.0, 2.0), (4.0, 4.0), (3.0, -1.0)]),
        };
        assert_eq!(s.solve().unwrap(), GroundTruth::Exact("I".to_string()));

        let tied = PatternScenario::DominantQuadrant {
            points: pts(&[(1.0, 1.0), (-1.0, -1.0)]),
        };
        assert!(tied.solve().unwrap_err().is_redraw());
    }

    #[test]
    fn test_centroid_exact_decimal() {
        let s = PatternScenario::Centroid {
            points: pts(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (2.0, 0.0)]),
        };
        assert_eq!(s.solve().unwrap(), GroundTruth::Exact("(0.75, 0.25)".to_string()));
    }

    #[test]
    fn test_collinearity() {
        let line = PatternScenario::Collinearity {
            points: pts(&[(0.0, 1.0), (2.0, 5.0), (-1.0, -1.0)]),
        };
        let bent = PatternScenario::Collinearity {
            points: pts(&[(0.0, 1.0), (2.0, 5.0), (1.0, 1.0)]),
        };
        assert_eq!(line.solve().unwrap(), GroundTruth::Boolean(true));
        assert_eq!(bent.solve().unwrap(), GroundTruth::Boolean(false));
    }

    #[test]
    fn test_cluster_count_is_transitive_and_inclusive() {
        let points = pts(&[(0.0, 0.0), (3.0, 0.0), (6.0, 0.0), (20.0, 20.0)]);
        assert_eq!(cluster_count(&points, 3.0), 2);
        assert_eq!(cluster_count(&points, 2.9), 4);
    }

    #[test]
    fn test_sampled_sets_are_distinct_and_bounded() {
        let params = GenerationParameters {
            coordinate_range: 20,
            point_count: 12,
            ..GenerationParameters::default()
        };
        let mut rng = TaskRng::seed_from_u64(17);
        for tier in Difficulty::all() {
            for _ in 0..30 {
                if let Ok(s) = PatternScenario::sample(*tier, &params, &mut rng) {
                    assert!(s.check_bounds().is_ok(), "{s:?}");
                }
            }
        }
    }

    #[test]
    fn test_constructed_collinear_sets() {
        let mut rng = TaskRng::seed_from_u64(4);
        for _ in 0..30 {
            if let Ok(points) = sample_collinear_points(&mut rng, 5, 20) {
                assert!(collinear(&points));
                assert!(!has_duplicates(&points));
            }
        }
    }
}
