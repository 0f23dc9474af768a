//! Network infrastructure: connectivity, link failures, outage cascades and
//! cable routing.
//!
//! Scenario nodes are numbered from 1 as they appear in prompts; the graph
//! layer works with 0-based ids.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{count_in, SpatialScenario, TaskRng};
use crate::difficulty::GenerationParameters;
use crate::error::{Result, SpatialError};
use crate::geometry::{format_number, round_to};
use crate::graph::{Graph, NodeId};
use crate::task::{AnswerType, Difficulty, GroundTruth};

/// Largest network a scenario may declare.
pub const MAX_NODES: u32 = 64;

/// Undirected link between two 1-based nodes.
pub type Link = (u32, u32);

/// Weighted cable between two 1-based nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cable {
    pub from: u32,
    pub to: u32,
    pub length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NetworkScenario {
    Connectivity {
        node_count: u32,
        links: Vec<Link>,
        source: u32,
        target: u32,
    },
    LinkFailure {
        node_count: u32,
        links: Vec<Link>,
        failed_links: Vec<Link>,
        source: u32,
        target: u32,
    },
    FailureCascade {
        node_count: u32,
        links: Vec<Link>,
        substation: u32,
        /// Customers served at each node, indexed by node number minus one.
        customers: Vec<u32>,
        failed_nodes: Vec<u32>,
    },
    CableRoute {
        node_count: u32,
        cables: Vec<Cable>,
        failed_links: Vec<Link>,
        source: u32,
        target: u32,
    },
}

fn node_id(n: u32) -> NodeId {
    (n as NodeId).saturating_sub(1)
}

fn as_edges(links: &[Link]) -> Vec<(NodeId, NodeId)> {
    links.iter().map(|&(a, b)| (node_id(a), node_id(b))).collect()
}

fn link_graph(node_count: u32, links: &[Link]) -> Graph {
    Graph::with_nodes(node_count as usize, &as_edges(links), false)
}

/// Random spanning tree over `1..=n` plus up to `extra` additional links,
/// normalized to `(low, high)` and sorted.
fn sample_links(rng: &mut TaskRng, n: u32, extra: usize) -> Vec<Link> {
    let mut links: Vec<Link> = (2..=n).map(|v| (rng.gen_range(1..v), v)).collect();
    let mut tries = 0;
    let mut added = 0;
    while added < extra && tries < extra * 20 {
        tries += 1;
        let (a, b) = (rng.gen_range(1..=n), rng.gen_range(1..=n));
        let link = (a.min(b), a.max(b));
        if a != b && !links.contains(&link) {
            links.push(link);
            added += 1;
        }
    }
    links.sort_unstable();
    links
}

fn choose_links(rng: &mut TaskRng, links: &[Link], k: usize) -> Vec<Link> {
    let mut pool = links.to_vec();
    let mut chosen = Vec::with_capacity(k);
    while chosen.len() < k && !pool.is_empty() {
        chosen.push(pool.remove(rng.gen_range(0..pool.len())));
    }
    chosen.sort_unstable();
    chosen
}

fn distinct_pair(rng: &mut TaskRng, n: u32) -> (u32, u32) {
    let a = rng.gen_range(1..=n);
    let mut b = rng.gen_range(1..n);
    if b >= a {
        b += 1;
    }
    (a, b)
}

fn format_links(links: &[Link]) -> String {
    if links.is_empty() {
        return "none".to_string();
    }
    links
        .iter()
        .map(|(a, b)| format!("{a}-{b}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn check_node(node: u32, node_count: u32, field: &str) -> std::result::Result<(), String> {
    if node == 0 || node > node_count {
        return Err(format!("{field}={node} outside 1..={node_count}"));
    }
    Ok(())
}

fn check_links(links: &[Link], node_count: u32) -> std::result::Result<(), String> {
    for &(a, b) in links {
        check_node(a, node_count, "link endpoint")?;
        check_node(b, node_count, "link endpoint")?;
        if a == b {
            return Err(format!("self-loop at node {a}"));
        }
    }
    Ok(())
}

fn check_failed(failed: &[Link], links: &[Link]) -> std::result::Result<(), String> {
    for &(a, b) in failed {
        if !links.contains(&(a, b)) && !links.contains(&(b, a)) {
            return Err(format!("failed link {a}-{b} is not in the network"));
        }
    }
    Ok(())
}

fn check_size(node_count: u32) -> std::result::Result<(), String> {
    if !(2..=MAX_NODES).contains(&node_count) {
        return Err(format!("node_count={node_count} outside [2, {MAX_NODES}]"));
    }
    Ok(())
}

fn sample_cascade(
    rng: &mut TaskRng,
    n: u32,
    links: Vec<Link>,
    params: &GenerationParameters,
) -> NetworkScenario {
    let mut customers: Vec<u32> = (0..n).map(|_| rng.gen_range(10..=500)).collect();
    customers[0] = 0;
    let k = count_in(rng, 1, params.failure_count.max(1));
    let mut candidates: Vec<u32> = (2..=n).collect();
    let mut failed_nodes = Vec::with_capacity(k);
    while failed_nodes.len() < k && !candidates.is_empty() {
        failed_nodes.push(candidates.remove(rng.gen_range(0..candidates.len())));
    }
    failed_nodes.sort_unstable();
    NetworkScenario::FailureCascade {
        node_count: n,
        links,
        substation: 1,
        customers,
        failed_nodes,
    }
}

fn sample_cable_route(
    rng: &mut TaskRng,
    n: u32,
    links: &[Link],
    params: &GenerationParameters,
    (source, target): (u32, u32),
) -> NetworkScenario {
    let cables = links
        .iter()
        .map(|&(from, to)| Cable {
            from,
            to,
            length: f64::from(rng.gen_range(1..=20u32)),
        })
        .collect();
    let k = count_in(rng, 1, params.failure_count.max(1));
    NetworkScenario::CableRoute {
        node_count: n,
        cables,
        failed_links: choose_links(rng, links, k),
        source,
        target,
    }
}

impl SpatialScenario for NetworkScenario {
    fn sample(tier: Difficulty, params: &GenerationParameters, rng: &mut TaskRng) -> Result<Self> {
        let n = params.node_count.max(3) as u32;
        let mut links = sample_links(rng, n, params.extra_edge_count);
        let (source, target) = distinct_pair(rng, n);

        match tier {
            Difficulty::Easy => {
                if rng.gen_bool(0.5) {
                    links.remove(rng.gen_range(0..links.len()));
                }
                Ok(Self::Connectivity {
                    node_count: n,
                    links,
                    source,
                    target,
                })
            }
            Difficulty::Medium => {
                let k = count_in(rng, 1, params.failure_count.max(1));
                let failed_links = choose_links(rng, &links, k);
                Ok(Self::LinkFailure {
                    node_count: n,
                    links,
                    failed_links,
                    source,
                    target,
                })
            }
            Difficulty::Hard => {
                if rng.gen_bool(0.5) {
                    Ok(sample_cascade(rng, n, links, params))
                } else {
                    Ok(sample_cable_route(rng, n, &links, params, (source, target)))
                }
            }
        }
    }

    fn solve(&self) -> Result<GroundTruth> {
        match self {
            Self::Connectivity {
                node_count,
                links,
                source,
                target,
            } => {
                let graph = link_graph(*node_count, links);
                Ok(GroundTruth::Boolean(
                    graph.is_reachable(node_id(*source), node_id(*target)),
                ))
            }
            Self::LinkFailure {
                node_count,
                links,
                failed_links,
                source,
                target,
            } => {
                let graph = link_graph(*node_count, links).without_edges(&as_edges(failed_links));
                Ok(GroundTruth::Boolean(
                    graph.is_reachable(node_id(*source), node_id(*target)),
                ))
            }
            Self::FailureCascade {
                node_count,
                links,
                substation,
                customers,
                failed_nodes,
            } => {
                if failed_nodes.contains(substation) {
                    return Err(SpatialError::unsolvable("substation itself failed"));
                }
                let failed: Vec<NodeId> = failed_nodes.iter().map(|&v| node_id(v)).collect();
                let graph = link_graph(*node_count, links).without_nodes(&failed);
                let powered = graph.reachable_from(node_id(*substation));
                let affected: u64 = customers
                    .iter()
                    .zip(&powered)
                    .filter(|(_, on)| !**on)
                    .map(|(c, _)| u64::from(*c))
                    .sum();
                Ok(GroundTruth::Numerical(affected as f64))
            }
            Self::CableRoute {
                node_count,
                cables,
                failed_links,
                source,
                target,
            } => {
                let edges: Vec<(NodeId, NodeId, f64)> = cables
                    .iter()
                    .map(|c| (node_id(c.from), node_id(c.to), c.length))
                    .collect();
                let graph = Graph::with_weighted_nodes(*node_count as usize, &edges, false)
                    .without_edges(&as_edges(failed_links));
                let (_, length) = graph
                    .dijkstra(node_id(*source), node_id(*target))
                    .ok_or_else(|| SpatialError::unsolvable("no surviving cable route"))?;
                Ok(GroundTruth::Numerical(round_to(length, 2)))
            }
        }
    }

    fn answer_type(&self) -> AnswerType {
        match self {
            Self::Connectivity { .. } | Self::LinkFailure { .. } => AnswerType::Boolean,
            Self::FailureCascade { .. } | Self::CableRoute { .. } => AnswerType::Numerical,
        }
    }

    fn prompt(&self) -> String {
        match self {
            Self::Connectivity {
                node_count,
                links,
                source,
                target,
            } => format!(
                "A communication network has nodes 1 to {node_count} and the following \
                 bidirectional links: {}. Can node {source} reach node {target}? Answer true \
                 or false.",
                format_links(links)
            ),
            Self::LinkFailure {
                node_count,
                links,
                failed_links,
                source,
                target,
            } => format!(
                "A communication network has nodes 1 to {node_count} and the following \
                 bidirectional links: {}. The links {} have failed. Can node {source} still \
                 reach node {target}? Answer true or false.",
                format_links(links),
                format_links(failed_links)
            ),
            Self::FailureCascade {
                node_count,
                links,
                substation,
                customers,
                failed_nodes,
            } => {
                let served: Vec<String> = customers
                    .iter()
                    .enumerate()
                    .map(|(i, c)| format!("node {}: {c}", i + 1))
                    .collect();
                let failed: Vec<String> = failed_nodes.iter().map(ToString::to_string).collect();
                format!(
                    "A power grid has nodes 1 to {node_count}, fed from the substation at node \
                     {substation}, with lines {}. Customers served per node: {}. Nodes {} fail. \
                     A node keeps power only if it has not failed and is still connected to the \
                     substation through working nodes. How many customers lose power?",
                    format_links(links),
                    served.join(", "),
                    failed.join(", ")
                )
            }
            Self::CableRoute {
                node_count,
                cables,
                failed_links,
                source,
                target,
            } => {
                let listed: Vec<String> = cables
                    .iter()
                    .map(|c| format!("{}-{} ({} km)", c.from, c.to, format_number(c.length)))
                    .collect();
                format!(
                    "A fibre network has nodes 1 to {node_count} joined by cables: {}. The \
                     cables {} are cut. What is the length in km of the shortest surviving route \
                     from node {source} to node {target}?",
                    listed.join(", "),
                    format_links(failed_links)
                )
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Connectivity { .. } => "connectivity",
            Self::LinkFailure { .. } => "link_failure",
            Self::FailureCascade { .. } => "failure_cascade",
            Self::CableRoute { .. } => "cable_route",
        }
    }

    fn check_bounds(&self) -> std::result::Result<(), String> {
        match self {
            Self::Connectivity {
                node_count,
                links,
                source,
                target,
            } => {
                check_size(*node_count)?;
                check_links(links, *node_count)?;
                check_node(*source, *node_count, "source")?;
                check_node(*target, *node_count, "target")
            }
            Self::LinkFailure {
                node_count,
                links,
                failed_links,
                source,
                target,
            } => {
                check_size(*node_count)?;
                check_links(links, *node_count)?;
                check_failed(failed_links, links)?;
                check_node(*source, *node_count, "source")?;
                check_node(*target, *node_count, "target")
            }
            Self::FailureCascade {
                node_count,
                links,
                substation,
                customers,
                failed_nodes,
            } => {
                check_size(*node_count)?;
                check_links(links, *node_count)?;
                check_node(*substation, *node_count, "substation")?;
                if customers.len() != *node_count as usize {
                    return Err(format!(
                        "customers has {} entries for {node_count} nodes",
                        customers.len()
                    ));
                }
                failed_nodes
                    .iter()
                    .try_for_each(|&v| check_node(v, *node_count, "failed node"))
            }
            Self::CableRoute {
                node_count,
                cables,
                failed_links,
                source,
                target,
            } => {
                check_size(*node_count)?;
                let links: Vec<Link> = cables.iter().map(|c| (c.from, c.to)).collect();
                check_links(&links, *node_count)?;
                check_failed(failed_links, &links)?;
                if let Some(c) = cables.iter().find(|c| !(c.length.is_finite() && c.length > 0.0)) {
                    return Err(format!("cable {}-{} has length {}", c.from, c.to, c.length));
                }
                check_node(*source, *node_count, "source")?;
                check_node(*target, *node_count, "target")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn ring_with_tail() -> Vec<Link> {
        vec![(1, 2), (2, 3), (3, 4), (4, 1), (3, 5), (5, 6), (6, 7)]
    }

    #[test]
    fn test_connectivity_and_link_failure() {
        let connected = NetworkScenario::Connectivity {
            node_count: 7,
            links: ring_with_tail(),
            source: 1,
            target: 7,
        };
        assert_eq!(connected.solve().unwrap(), GroundTruth::Boolean(true));

        let cut = NetworkScenario::LinkFailure {
            node_count: 7,
            links: ring_with_tail(),
            failed_links: vec![(5, 3)],
            source: 1,
            target: 7,
        };
        assert_eq!(cut.solve().unwrap(), GroundTruth::Boolean(false));

        let redundant = NetworkScenario::LinkFailure {
            node_count: 7,
            links: ring_with_tail(),
            failed_links: vec![(1, 2)],
            source: 1,
            target: 3,
        };
        assert_eq!(redundant.solve().unwrap(), GroundTruth::Boolean(true));
    }

    #[test]
    fn test_failure_cascade_counts_downstream_customers() {
        let s = NetworkScenario::FailureCascade {
            node_count: 7,
            links: ring_with_tail(),
            substation: 1,
            customers: vec![0, 10, 20, 30, 40, 50, 60],
            failed_nodes: vec![5],
        };
        // node 5 fails; 6 and 7 are cut off with it.
        assert_eq!(s.solve().unwrap(), GroundTruth::Numerical(150.0));
    }

    #[test]
    fn test_cable_route_after_cut() {
        let cables = vec![
            Cable { from: 1, to: 2, length: 4.0 },
            Cable { from: 2, to: 4, length: 4.0 },
            Cable { from: 1, to: 3, length: 1.0 },
            Cable { from: 3, to: 4, length: 2.0 },
        ];
        let intact = NetworkScenario::CableRoute {
            node_count: 4,
            cables: cables.clone(),
            failed_links: vec![],
            source: 1,
            target: 4,
        };
        assert_eq!(intact.solve().unwrap(), GroundTruth::Numerical(3.0));

        let cut = NetworkScenario::CableRoute {
            node_count: 4,
            cables: cables.clone(),
            failed_links: vec![(3, 4)],
            source: 1,
            target: 4,
        };
        assert_eq!(cut.solve().unwrap(), GroundTruth::Numerical(8.0));

        let isolated = NetworkScenario::CableRoute {
            node_count: 4,
            cables,
            failed_links: vec![(2, 4), (3, 4)],
            source: 1,
            target: 4,
        };
        assert!(isolated.solve().unwrap_err().is_redraw());
    }

    #[test]
    fn test_failed_link_must_exist() {
        let s = NetworkScenario::LinkFailure {
            node_count: 7,
            links: ring_with_tail(),
            failed_links: vec![(1, 7)],
            source: 1,
            target: 7,
        };
        assert!(s.check_bounds().is_err());
    }

    #[test]
    fn test_sampled_networks_respect_bounds() {
        let params = GenerationParameters {
            node_count: 10,
            extra_edge_count: 4,
            failure_count: 3,
            ..GenerationParameters::default()
        };
        let mut rng = TaskRng::seed_from_u64(8);
        for tier in Difficulty::all() {
            for _ in 0..30 {
                let s = NetworkScenario::sample(*tier, &params, &mut rng).unwrap();
                assert!(s.check_bounds().is_ok(), "{s:?}");
            }
        }
    }
}
