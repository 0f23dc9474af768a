//! Graph construction and search with a cache-friendly CSR representation.
//!
//! Networks (power grids, region adjacency, proximity links) and obstacle
//! grids are both lowered onto the same [`Graph`], so every search in the
//! crate shares one set of tie-breaking rules:
//!
//! - neighbours are stored sorted by node id and expanded in that order
//! - best-first frontiers pop the lowest `(f, h, node)` triple
//! - a predecessor is only replaced on a strict cost improvement
//!
//! # Examples
//!
//! ```
//! use spatial_eval::graph::Graph;
//!
//! let g = Graph::from_edges(&[(0, 1), (1, 2), (2, 3)], false);
//! assert!(g.is_reachable(0, 3));
//!
//! let cut = g.without_edges(&[(1, 2)]);
//! assert!(!cut.is_reachable(0, 3));
//! ```

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

pub mod grid;

pub use grid::{find_path, Cell, Grid, GridPath, SearchAlgorithm};

/// Graph node identifier (contiguous integers for cache efficiency).
pub type NodeId = usize;

/// Graph structure using CSR (Compressed Sparse Row) adjacency.
#[derive(Debug, Clone)]
pub struct Graph {
    row_ptr: Vec<usize>,      // Offset into col_indices (length = n_nodes + 1)
    col_indices: Vec<NodeId>, // Flattened sorted neighbor lists
    edge_weights: Vec<f64>,   // Parallel to col_indices (empty if unweighted)
    is_directed: bool,
    n_nodes: usize,
    n_edges: usize,
}

/// Frontier entry for best-first search: min-heap on `(f, h, node)`.
#[derive(Copy, Clone, PartialEq)]
struct State {
    f_score: f64,
    h_score: f64,
    g_score: f64,
    node: NodeId,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .partial_cmp(&self.f_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                other
                    .h_score
                    .partial_cmp(&self.h_score)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Graph {
    /// Number of nodes, isolated ones included.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.n_nodes
    }

    /// Distinct edges; an undirected edge counts once.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.n_edges
    }

    /// Whether edges carry explicit weights.
    #[must_use]
    pub fn is_weighted(&self) -> bool {
        !self.edge_weights.is_empty()
    }

    /// Sorted neighbors of `v`; empty for unknown nodes.
    ///
    /// # Examples
    /// ```
    /// use spatial_eval::graph::Graph;
    ///
    /// let g = Graph::from_edges(&[(0, 1), (1, 2)], false);
    /// assert_eq!(g.neighbors(1), &[0, 2]);
    /// ```
    #[must_use]
    pub fn neighbors(&self, v: NodeId) -> &[NodeId] {
        if v >= self.n_nodes {
            return &[];
        }
        &self.col_indices[self.row_ptr[v]..self.row_ptr[v + 1]]
    }

    #[must_use]
    pub fn degree(&self, v: NodeId) -> usize {
        self.neighbors(v).len()
    }

    /// Build graph from edge list, inferring the node count.
    ///
    /// # Examples
    /// ```
    /// use spatial_eval::graph::Graph;
    ///
    /// let g = Graph::from_edges(&[(0, 1), (1, 2), (2, 0)], true);
    /// assert_eq!(g.num_nodes(), 3);
    /// assert_eq!(g.num_edges(), 3);
    /// ```
    #[must_use]
    pub fn from_edges(edges: &[(NodeId, NodeId)], is_directed: bool) -> Self {
        Self::with_nodes(0, edges, is_directed)
    }

    /// Build graph with at least `n_nodes` nodes; isolated nodes are kept.
    #[must_use]
    pub fn with_nodes(n_nodes: usize, edges: &[(NodeId, NodeId)], is_directed: bool) -> Self {
        let adj = Self::adjacency(n_nodes, edges.iter().map(|&(s, t)| (s, t, 1.0)), is_directed);
        Self::from_adjacency(adj, false, is_directed)
    }

    /// Build weighted graph from edge list, inferring the node count.
    ///
    /// # Examples
    /// ```
    /// use spatial_eval::graph::Graph;
    ///
    /// let g = Graph::from_weighted_edges(&[(0, 1, 1.0), (1, 2, 2.5)], false);
    /// assert_eq!(g.num_nodes(), 3);
    /// assert_eq!(g.num_edges(), 2);
    /// ```
    #[must_use]
    pub fn from_weighted_edges(edges: &[(NodeId, NodeId, f64)], is_directed: bool) -> Self {
        Self::with_weighted_nodes(0, edges, is_directed)
    }

    /// Weighted variant of [`Graph::with_nodes`].
    #[must_use]
    pub fn with_weighted_nodes(
        n_nodes: usize,
        edges: &[(NodeId, NodeId, f64)],
        is_directed: bool,
    ) -> Self {
        let adj = Self::adjacency(n_nodes, edges.iter().copied(), is_directed);
        Self::from_adjacency(adj, true, is_directed)
    }

    fn adjacency(
        n_nodes: usize,
        edges: impl Iterator<Item = (NodeId, NodeId, f64)> + Clone,
        is_directed: bool,
    ) -> Vec<Vec<(NodeId, f64)>> {
        let max_node = edges
            .clone()
            .flat_map(|(s, t, _)| [s + 1, t + 1])
            .max()
            .unwrap_or(0);
        let n = n_nodes.max(max_node);

        let mut adj_list: Vec<Vec<(NodeId, f64)>> = vec![Vec::new(); n];
        for (source, target, weight) in edges {
            adj_list[source].push((target, weight));
            if !is_directed && source != target {
                adj_list[target].push((source, weight));
            }
        }

        // Sort and deduplicate (keep first weight for duplicates)
        for neighbors in &mut adj_list {
            neighbors.sort_by_key(|&(id, _)| id);
            neighbors.dedup_by_key(|&mut (id, _)| id);
        }
        adj_list
    }

    fn from_adjacency(adj_list: Vec<Vec<(NodeId, f64)>>, weighted: bool, is_directed: bool) -> Self {
        let n_nodes = adj_list.len();
        let mut row_ptr = Vec::with_capacity(n_nodes + 1);
        let mut col_indices = Vec::new();
        let mut edge_weights = Vec::new();

        row_ptr.push(0);
        for neighbors in &adj_list {
            for &(neighbor, weight) in neighbors {
                col_indices.push(neighbor);
                if weighted {
                    edge_weights.push(weight);
                }
            }
            row_ptr.push(col_indices.len());
        }

        let n_edges = if is_directed {
            col_indices.len()
        } else {
            adj_list
                .iter()
                .enumerate()
                .map(|(u, ns)| ns.iter().filter(|&&(v, _)| v >= u).count())
                .sum()
        };

        Self {
            row_ptr,
            col_indices,
            edge_weights,
            is_directed,
            n_nodes,
            n_edges,
        }
    }

    /// Weight of edge `source -> target` (1.0 for unweighted graphs).
    #[must_use]
    pub fn edge_weight(&self, source: NodeId, target: NodeId) -> Option<f64> {
        if source >= self.n_nodes {
            return None;
        }
        let start = self.row_ptr[source];
        let pos = self.neighbors(source).binary_search(&target).ok()?;
        if self.edge_weights.is_empty() {
            Some(1.0)
        } else {
            Some(self.edge_weights[start + pos])
        }
    }

    /// Distinct edges as `(source, target, weight)`; undirected edges are
    /// listed once with `source <= target`.
    #[must_use]
    pub fn edges(&self) -> Vec<(NodeId, NodeId, f64)> {
        let mut out = Vec::with_capacity(self.n_edges);
        for u in 0..self.n_nodes {
            for i in self.row_ptr[u]..self.row_ptr[u + 1] {
                let v = self.col_indices[i];
                if self.is_directed || v >= u {
                    let w = if self.edge_weights.is_empty() {
                        1.0
                    } else {
                        self.edge_weights[i]
                    };
                    out.push((u, v, w));
                }
            }
        }
        out
    }

    /// Copy of the graph with the listed edges removed.
    ///
    /// For undirected graphs either orientation of a pair matches.
    #[must_use]
    pub fn without_edges(&self, removed: &[(NodeId, NodeId)]) -> Self {
        let is_removed = |u: NodeId, v: NodeId| {
            removed
                .iter()
                .any(|&(a, b)| (a == u && b == v) || (!self.is_directed && a == v && b == u))
        };
        let kept: Vec<(NodeId, NodeId, f64)> = self
            .edges()
            .into_iter()
            .filter(|&(u, v, _)| !is_removed(u, v))
            .collect();
        self.rebuild(&kept)
    }

    /// Copy of the graph with every edge touching the listed nodes removed.
    /// Node ids are preserved.
    #[must_use]
    pub fn without_nodes(&self, removed: &[NodeId]) -> Self {
        let kept: Vec<(NodeId, NodeId, f64)> = self
            .edges()
            .into_iter()
            .filter(|(u, v, _)| !removed.contains(u) && !removed.contains(v))
            .collect();
        self.rebuild(&kept)
    }

    fn rebuild(&self, edges: &[(NodeId, NodeId, f64)]) -> Self {
        if self.is_weighted() {
            Self::with_weighted_nodes(self.n_nodes, edges, self.is_directed)
        } else {
            let plain: Vec<(NodeId, NodeId)> = edges.iter().map(|&(u, v, _)| (u, v)).collect();
            Self::with_nodes(self.n_nodes, &plain, self.is_directed)
        }
    }

    /// Hop counts from `source` (`usize::MAX` for unreachable nodes).
    #[must_use]
    pub fn bfs_distances(&self, source: NodeId) -> Vec<usize> {
        let mut distances = vec![usize::MAX; self.n_nodes];
        if source >= self.n_nodes {
            return distances;
        }
        distances[source] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(source);

        while let Some(v) = queue.pop_front() {
            for &w in self.neighbors(v) {
                if distances[w] == usize::MAX {
                    distances[w] = distances[v] + 1;
                    queue.push_back(w);
                }
            }
        }

        distances
    }

    /// Reachability mask from `source`.
    #[must_use]
    pub fn reachable_from(&self, source: NodeId) -> Vec<bool> {
        self.bfs_distances(source)
            .into_iter()
            .map(|d| d != usize::MAX)
            .collect()
    }

    #[must_use]
    pub fn is_reachable(&self, source: NodeId, target: NodeId) -> bool {
        target < self.n_nodes && self.bfs_distances(source)[target] != usize::MAX
    }

    /// Shortest unweighted path using BFS.
    ///
    /// Neighbours are discovered in ascending id order, so the returned path
    /// is the lexicographically earliest-discovered shortest path.
    ///
    /// # Examples
    /// ```
    /// use spatial_eval::graph::Graph;
    ///
    /// let g = Graph::from_edges(&[(0, 1), (1, 2), (2, 3), (0, 3)], false);
    /// assert_eq!(g.shortest_path(0, 3), Some(vec![0, 3]));
    /// assert_eq!(g.shortest_path(0, 2), Some(vec![0, 1, 2]));
    /// ```
    #[must_use]
    pub fn shortest_path(&self, source: NodeId, target: NodeId) -> Option<Vec<NodeId>> {
        if source >= self.n_nodes || target >= self.n_nodes {
            return None;
        }
        if source == target {
            return Some(vec![source]);
        }

        let mut visited = vec![false; self.n_nodes];
        let mut predecessor = vec![None; self.n_nodes];
        let mut queue = VecDeque::new();

        visited[source] = true;
        queue.push_back(source);

        while let Some(v) = queue.pop_front() {
            if v == target {
                break;
            }
            for &w in self.neighbors(v) {
                if !visited[w] {
                    visited[w] = true;
                    predecessor[w] = Some(v);
                    queue.push_back(w);
                }
            }
        }

        if !visited[target] {
            return None;
        }
        Some(Self::reconstruct(&predecessor, target))
    }

    /// Shortest weighted path using Dijkstra's algorithm.
    ///
    /// Returns `None` if the target is unreachable or any traversed edge has
    /// a negative or non-finite weight.
    ///
    /// # Examples
    /// ```
    /// use spatial_eval::graph::Graph;
    ///
    /// let g = Graph::from_weighted_edges(&[(0, 1, 1.0), (1, 2, 2.0), (0, 2, 5.0)], false);
    /// let (path, dist) = g.dijkstra(0, 2).unwrap();
    /// assert_eq!(path, vec![0, 1, 2]);
    /// assert_eq!(dist, 3.0);
    /// ```
    #[must_use]
    pub fn dijkstra(&self, source: NodeId, target: NodeId) -> Option<(Vec<NodeId>, f64)> {
        self.a_star(source, target, |_| 0.0)
    }

    /// Best-first search with an admissible heuristic.
    ///
    /// Returns the path and its cost. With a consistent heuristic the path
    /// is optimal; ties are broken by lower heuristic, then lower node id.
    pub fn a_star<F>(
        &self,
        source: NodeId,
        target: NodeId,
        heuristic: F,
    ) -> Option<(Vec<NodeId>, f64)>
    where
        F: Fn(NodeId) -> f64,
    {
        if source >= self.n_nodes || target >= self.n_nodes {
            return None;
        }
        if source == target {
            return Some((vec![source], 0.0));
        }

        let mut g_scores = vec![f64::INFINITY; self.n_nodes];
        let mut closed = vec![false; self.n_nodes];
        let mut predecessor = vec![None; self.n_nodes];
        let mut heap = BinaryHeap::new();

        g_scores[source] = 0.0;
        let h = heuristic(source);
        heap.push(State {
            f_score: h,
            h_score: h,
            g_score: 0.0,
            node: source,
        });

        while let Some(State { g_score, node, .. }) = heap.pop() {
            if node == target {
                break;
            }
            if closed[node] || g_score > g_scores[node] {
                continue;
            }
            closed[node] = true;

            for i in self.row_ptr[node]..self.row_ptr[node + 1] {
                let neighbor = self.col_indices[i];
                let edge_weight = if self.edge_weights.is_empty() {
                    1.0
                } else {
                    self.edge_weights[i]
                };
                if !(edge_weight >= 0.0 && edge_weight.is_finite()) {
                    return None;
                }

                let tentative_g = g_score + edge_weight;
                if tentative_g < g_scores[neighbor] {
                    g_scores[neighbor] = tentative_g;
                    predecessor[neighbor] = Some(node);
                    let h = heuristic(neighbor);
                    heap.push(State {
                        f_score: tentative_g + h,
                        h_score: h,
                        g_score: tentative_g,
                        node: neighbor,
                    });
                }
            }
        }

        if g_scores[target].is_infinite() {
            return None;
        }
        Some((Self::reconstruct(&predecessor, target), g_scores[target]))
    }

    fn reconstruct(predecessor: &[Option<NodeId>], target: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = Some(target);
        while let Some(node) = current {
            path.push(node);
            current = predecessor[node];
        }
        path.reverse();
        path
    }

    /// Component label per node, numbered in order of each component's
    /// lowest node. Edge direction is ignored.
    ///
    /// # Examples
    /// ```
    /// use spatial_eval::graph::Graph;
    ///
    /// let g = Graph::from_edges(&[(0, 1), (2, 3)], false);
    /// let components = g.connected_components();
    /// assert_eq!(components[0], components[1]);
    /// assert_ne!(components[0], components[2]);
    /// ```
    #[must_use]
    pub fn connected_components(&self) -> Vec<usize> {
        let undirected = if self.is_directed {
            let plain: Vec<(NodeId, NodeId)> = self.edges().into_iter().map(|(u, v, _)| (u, v)).collect();
            Self::with_nodes(self.n_nodes, &plain, false)
        } else {
            self.clone()
        };

        let mut labels = vec![usize::MAX; self.n_nodes];
        let mut next = 0;
        for seed in 0..self.n_nodes {
            if labels[seed] != usize::MAX {
                continue;
            }
            for (node, hops) in undirected.bfs_distances(seed).into_iter().enumerate() {
                if hops != usize::MAX {
                    labels[node] = next;
                }
            }
            next += 1;
        }
        labels
    }

    /// Number of connected components (weak components when directed).
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.connected_components()
            .iter()
            .copied()
            .max()
            .map_or(0, |m| m + 1)
    }
}


#[cfg(test)]
mod tests_search_contract;
