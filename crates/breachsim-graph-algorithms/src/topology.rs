//! Graph topology analysis algorithms
//!
//! Clustering coefficients over the undirected projection of the graph.

use super::common::GraphView;
use std::collections::BTreeSet;

/// Undirected neighbor sets, self-loops removed
fn undirected_neighbors(view: &GraphView) -> Vec<BTreeSet<usize>> {
    (0..view.node_count)
        .map(|u| {
            view.successors(u)
                .iter()
                .chain(view.predecessors(u).iter())
                .copied()
                .filter(|&v| v != u)
                .collect()
        })
        .collect()
}

/// Average local clustering coefficient of the undirected projection.
///
/// Nodes with fewer than two neighbors contribute 0. Empty graphs yield 0.
pub fn average_clustering(view: &GraphView) -> f64 {
    let n = view.node_count;
    if n == 0 {
        return 0.0;
    }

    let neighbors = undirected_neighbors(view);
    let mut total = 0.0;

    for u in 0..n {
        let degree = neighbors[u].len();
        if degree < 2 {
            continue;
        }

        let mut links = 0usize;
        for &v in &neighbors[u] {
            for &w in neighbors[v].range(v + 1..) {
                if neighbors[u].contains(&w) {
                    links += 1;
                }
            }
        }

        total += (2 * links) as f64 / (degree * (degree - 1)) as f64;
    }

    total / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_graph(n: usize) -> GraphView {
        let mut outgoing = vec![vec![]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                outgoing[i].push(j);
            }
        }
        GraphView::from_adjacency_list((0..n as u64).collect(), outgoing)
    }

    #[test]
    fn test_clustering_complete_graph() {
        assert!((average_clustering(&complete_graph(4)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_clustering_path_and_star() {
        // Path 0->1->2: no triangles
        let path = GraphView::from_adjacency_list(
            vec![0, 1, 2],
            vec![vec![1], vec![2], vec![]],
        );
        assert_eq!(average_clustering(&path), 0.0);

        // Triangle plus pendant: 0-1-2 triangle, 2-3
        // c(0)=1, c(1)=1, c(2)=1/3, c(3)=0 -> 7/12
        let view = GraphView::from_adjacency_list(
            vec![0, 1, 2, 3],
            vec![vec![1], vec![2], vec![0, 3], vec![]],
        );
        assert!((average_clustering(&view) - 7.0 / 12.0).abs() < 1e-12);
    }
}
