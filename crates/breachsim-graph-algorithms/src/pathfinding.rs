//! Pathfinding algorithms
//!
//! Unweighted (hop-count) shortest paths: single-pair BFS with path
//! reconstruction and single-source BFS distances in either edge direction.

use super::common::{GraphView, NodeId};
use std::collections::{HashMap, VecDeque};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of a pathfinding algorithm
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathResult {
    pub source: NodeId,
    pub target: NodeId,
    pub path: Vec<NodeId>,
    pub cost: f64,
}

/// Which adjacency to follow during traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Follow edges source -> target
    Outgoing,
    /// Follow edges target -> source
    Incoming,
}

/// Breadth-First Search (Unweighted Shortest Path)
///
/// Neighbors are expanded in adjacency order, so the returned path is the
/// first shortest path in that order.
pub fn bfs(
    view: &GraphView,
    source: NodeId,
    target: NodeId,
) -> Option<PathResult> {
    let source_idx = *view.node_to_index.get(&source)?;
    let target_idx = *view.node_to_index.get(&target)?;

    let mut queue = VecDeque::new();
    let mut visited = HashMap::new(); // index -> parent_index

    queue.push_back(source_idx);
    visited.insert(source_idx, None);

    while let Some(current_idx) = queue.pop_front() {
        if current_idx == target_idx {
            // Reconstruct path
            let mut path = Vec::new();
            let mut curr = Some(target_idx);
            while let Some(idx) = curr {
                path.push(view.index_to_node[idx]);
                curr = visited.get(&idx).copied().flatten();
            }
            path.reverse();
            return Some(PathResult {
                source,
                target,
                cost: (path.len() - 1) as f64,
                path,
            });
        }

        for &next_idx in view.successors(current_idx) {
            if !visited.contains_key(&next_idx) {
                visited.insert(next_idx, Some(current_idx));
                queue.push_back(next_idx);
            }
        }
    }

    None
}

/// Single-source hop distances by dense index.
///
/// Entry `i` is `None` when node `i` is unreachable from `source_idx`.
pub fn hop_distances(
    view: &GraphView,
    source_idx: usize,
    direction: Direction,
) -> Vec<Option<usize>> {
    let mut dist = vec![None; view.node_count];
    if source_idx >= view.node_count {
        return dist;
    }

    let mut queue = VecDeque::new();
    dist[source_idx] = Some(0);
    queue.push_back(source_idx);

    while let Some(current) = queue.pop_front() {
        let d = dist[current].unwrap_or(0);
        let neighbors = match direction {
            Direction::Outgoing => view.successors(current),
            Direction::Incoming => view.predecessors(current),
        };
        for &next in neighbors {
            if dist[next].is_none() {
                dist[next] = Some(d + 1);
                queue.push_back(next);
            }
        }
    }

    dist
}
