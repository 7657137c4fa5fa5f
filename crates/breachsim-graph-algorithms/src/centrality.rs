//! Centrality algorithms
//!
//! Degree, closeness and betweenness centrality over the directed topology.
//! All scores are normalized and keyed by NodeId.

use super::common::{GraphView, NodeId};
use super::pathfinding::{hop_distances, Direction};
use rayon::prelude::*;
use std::collections::{HashMap, VecDeque};

/// Degree centrality: (in-degree + out-degree) / (n - 1).
///
/// Graphs with a single node score it 1.0.
pub fn degree_centrality(view: &GraphView) -> HashMap<NodeId, f64> {
    let n = view.node_count;
    if n <= 1 {
        return view.index_to_node.iter().map(|&id| (id, 1.0)).collect();
    }

    let scale = 1.0 / (n - 1) as f64;
    (0..n)
        .map(|idx| {
            let degree = view.in_degree(idx) + view.out_degree(idx);
            (view.index_to_node[idx], degree as f64 * scale)
        })
        .collect()
}

/// Closeness centrality using incoming distances.
///
/// For node `u`, with `r` the number of nodes that can reach `u` (including
/// itself) and `s` the sum of their hop distances to `u`:
/// `c(u) = ((r - 1) / s) * ((r - 1) / (n - 1))`. Nodes nothing reaches score 0.
pub fn closeness_centrality(view: &GraphView) -> HashMap<NodeId, f64> {
    let n = view.node_count;

    (0..n)
        .map(|idx| {
            let dist = hop_distances(view, idx, Direction::Incoming);
            let (reachable, total) = dist
                .iter()
                .flatten()
                .fold((0usize, 0usize), |(r, s), &d| (r + 1, s + d));

            let score = if total > 0 && n > 1 {
                let reached = (reachable - 1) as f64;
                (reached / total as f64) * (reached / (n - 1) as f64)
            } else {
                0.0
            };
            (view.index_to_node[idx], score)
        })
        .collect()
}

/// Betweenness centrality (Brandes, unweighted).
///
/// Scores are normalized by `1 / ((n - 1)(n - 2))` when `n > 2`. Sources are
/// processed in parallel; per-source contributions are summed in index order
/// so the result does not depend on scheduling.
pub fn betweenness_centrality(view: &GraphView) -> HashMap<NodeId, f64> {
    let n = view.node_count;

    let contributions: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|source| single_source_dependencies(view, source))
        .collect();

    let mut betweenness = vec![0.0; n];
    for delta in &contributions {
        for (idx, value) in delta.iter().enumerate() {
            betweenness[idx] += value;
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        for value in &mut betweenness {
            *value *= scale;
        }
    }

    betweenness
        .into_iter()
        .enumerate()
        .map(|(idx, score)| (view.index_to_node[idx], score))
        .collect()
}

/// Brandes' dependency accumulation for one source
fn single_source_dependencies(view: &GraphView, source: usize) -> Vec<f64> {
    let n = view.node_count;
    let mut stack = Vec::with_capacity(n);
    let mut parents: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0f64; n];
    let mut dist: Vec<Option<usize>> = vec![None; n];
    let mut queue = VecDeque::new();

    sigma[source] = 1.0;
    dist[source] = Some(0);
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        stack.push(v);
        let dv = dist[v].unwrap_or(0);
        for &w in view.successors(v) {
            if dist[w].is_none() {
                dist[w] = Some(dv + 1);
                queue.push_back(w);
            }
            if dist[w] == Some(dv + 1) {
                sigma[w] += sigma[v];
                parents[w].push(v);
            }
        }
    }

    let mut delta = vec![0.0f64; n];
    while let Some(w) = stack.pop() {
        for &v in &parents[w] {
            delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
        }
    }
    delta[source] = 0.0;
    delta
}
