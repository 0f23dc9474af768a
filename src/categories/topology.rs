//! Topological reasoning over labelled regions.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{check_point, count_in, int_in, letter_labels, sample_point, SpatialScenario, TaskRng};
use crate::difficulty::GenerationParameters;
use crate::error::{Result, SpatialError};
use crate::geometry::{Point, Rect};
use crate::graph::Graph;
use crate::task::{AnswerType, Difficulty, GroundTruth};

/// Rectangular zone with a name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRegion {
    pub name: String,
    pub bounds: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopologyScenario {
    RegionAdjacency {
        regions: Vec<String>,
        borders: Vec<(String, String)>,
        query: String,
    },
    RegionContainment {
        regions: Vec<NamedRegion>,
        point: Point,
    },
    RegionConnectivity {
        regions: Vec<String>,
        borders: Vec<(String, String)>,
        from: String,
        to: String,
    },
}

fn sample_borders(rng: &mut TaskRng, regions: &[String], density: f64) -> Vec<(String, String)> {
    let mut borders = Vec::new();
    for i in 0..regions.len() {
        for j in (i + 1)..regions.len() {
            if rng.gen_bool(density) {
                borders.push((regions[i].clone(), regions[j].clone()));
            }
        }
    }
    borders
}

fn index_of(regions: &[String], name: &str) -> Result<usize> {
    regions
        .iter()
        .position(|r| r == name)
        .ok_or_else(|| SpatialError::unsolvable(format!("unknown region {name}")))
}

fn region_graph(regions: &[String], borders: &[(String, String)]) -> Result<Graph> {
    let edges = borders
        .iter()
        .map(|(a, b)| Ok((index_of(regions, a)?, index_of(regions, b)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Graph::with_nodes(regions.len(), &edges, false))
}

fn format_borders(borders: &[(String, String)]) -> String {
    if borders.is_empty() {
        return "none".to_string();
    }
    borders
        .iter()
        .map(|(a, b)| format!("{a}-{b}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn check_border_labels(
    regions: &[String],
    borders: &[(String, String)],
) -> std::result::Result<(), String> {
    for (a, b) in borders {
        if a == b {
            return Err(format!("region {a} borders itself"));
        }
        for name in [a, b] {
            if !regions.contains(name) {
                return Err(format!("border references unknown region {name}"));
            }
        }
    }
    Ok(())
}

impl SpatialScenario for TopologyScenario {
    fn sample(tier: Difficulty, params: &GenerationParameters, rng: &mut TaskRng) -> Result<Self> {
        match tier {
            Difficulty::Easy => {
                let regions = letter_labels(count_in(rng, 4, params.region_count));
                let borders = sample_borders(rng, &regions, 0.4);
                let query = regions[rng.gen_range(0..regions.len())].clone();
                Ok(Self::RegionAdjacency {
                    regions,
                    borders,
                    query,
                })
            }
            Difficulty::Medium => {
                let range = params.coordinate_range as i64;
                let n = count_in(rng, 3, params.region_count);
                let side = (range / 2).max(3);
                let regions = (1..=n)
                    .map(|i| {
                        let x = int_in(rng, 0, range - side);
                        let y = int_in(rng, 0, range - side);
                        let w = int_in(rng, 3, side);
                        let h = int_in(rng, 3, side);
                        NamedRegion {
                            name: format!("Z{i}"),
                            bounds: Rect::new(x, y, x + w, y + h),
                        }
                    })
                    .collect();
                Ok(Self::RegionContainment {
                    regions,
                    point: sample_point(rng, 0, range),
                })
            }
            Difficulty::Hard => {
                let regions = letter_labels(count_in(rng, 6, params.region_count));
                let borders = sample_borders(rng, &regions, 0.25);
                let from = rng.gen_range(0..regions.len());
                let mut to = rng.gen_range(0..regions.len() - 1);
                if to >= from {
                    to += 1;
                }
                Ok(Self::RegionConnectivity {
                    from: regions[from].clone(),
                    to: regions[to].clone(),
                    regions,
                    borders,
                })
            }
        }
    }

    fn solve(&self) -> Result<GroundTruth> {
        match self {
            Self::RegionAdjacency {
                regions,
                borders,
                query,
            } => {
                let graph = region_graph(regions, borders)?;
                let q = index_of(regions, query)?;
                let mut neighbours: Vec<&str> = graph
                    .neighbors(q)
                    .iter()
                    .map(|&i| regions[i].as_str())
                    .collect();
                if neighbours.is_empty() {
                    return Err(SpatialError::unsolvable("query region has no neighbours"));
                }
                neighbours.sort_unstable();
                Ok(GroundTruth::Exact(neighbours.join(", ")))
            }
            Self::RegionContainment { regions, point } => {
                let inside: Vec<&str> = regions
                    .iter()
                    .filter(|r| r.bounds.contains(*point))
                    .map(|r| r.name.as_str())
                    .collect();
                if inside.is_empty() {
                    Ok(GroundTruth::Exact("none".to_string()))
                } else {
                    Ok(GroundTruth::Exact(inside.join(", ")))
                }
            }
            Self::RegionConnectivity {
                regions,
                borders,
                from,
                to,
            } => {
                let graph = region_graph(regions, borders)?;
                let (s, t) = (index_of(regions, from)?, index_of(regions, to)?);
                Ok(GroundTruth::Boolean(graph.is_reachable(s, t)))
            }
        }
    }

    fn answer_type(&self) -> AnswerType {
        match self {
            Self::RegionAdjacency { .. } | Self::RegionContainment { .. } => AnswerType::Exact,
            Self::RegionConnectivity { .. } => AnswerType::Boolean,
        }
    }

    fn prompt(&self) -> String {
        match self {
            Self::RegionAdjacency {
                regions,
                borders,
                query,
            } => format!(
                "A map is divided into regions {}. The following pairs of regions share a \
                 border: {}. Which regions border region {query}? List them in alphabetical \
                 order, separated by commas.",
                regions.join(", "),
                format_borders(borders)
            ),
            Self::RegionContainment { regions, point } => {
                let listed: Vec<String> = regions
                    .iter()
                    .map(|r| format!("{} spans {}", r.name, r.bounds))
                    .collect();
                format!(
                    "Rectangular zones are defined as follows: {}. Which zones contain the point \
                     {point}? A point on a zone's boundary counts as inside. List the zone names \
                     in the order given, separated by commas, or answer \"none\".",
                    listed.join("; ")
                )
            }
            Self::RegionConnectivity {
                regions,
                borders,
                from,
                to,
            } => format!(
                "A map has regions {}. Regions sharing a border are directly connected; the \
                 shared borders are: {}. Can you travel from region {from} to region {to} \
                 crossing only shared borders? Answer true or false.",
                regions.join(", "),
                format_borders(borders)
            ),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::RegionAdjacency { .. } => "region_adjacency",
            Self::RegionContainment { .. } => "region_containment",
            Self::RegionConnectivity { .. } => "region_connectivity",
        }
    }

    fn check_bounds(&self) -> std::result::Result<(), String> {
        match self {
            Self::RegionAdjacency {
                regions,
                borders,
                query,
            } => {
                check_border_labels(regions, borders)?;
                if !regions.contains(query) {
                    return Err(format!("query region {query} not on the map"));
                }
                Ok(())
            }
            Self::RegionContainment { regions, point } => {
                check_point(*point, "point")?;
                for r in regions {
                    check_point(Point::new(r.bounds.x_min, r.bounds.y_min), &r.name)?;
                    check_point(Point::new(r.bounds.x_max, r.bounds.y_max), &r.name)?;
                }
                Ok(())
            }
            Self::RegionConnectivity {
                regions,
                borders,
                from,
                to,
            } => {
                check_border_labels(regions, borders)?;
                if !regions.contains(from) || !regions.contains(to) {
                    return Err("endpoint region not on the map".to_string());
                }
                if from == to {
                    return Err("endpoints must differ".to_string());
                }
                Ok(())
            }
        }
    }
}
