//! Vulnerability and topology analysis
//!
//! Read-only analytics over a [`Network`]. Algorithms are implemented in the
//! `breachsim-graph-algorithms` crate; this module builds the dense view and
//! maps results back to device names.

use crate::config::AnalysisConfig;
use crate::network::{DeviceName, Network};
use breachsim_graph_algorithms::{Direction, GraphView, NodeId as AlgoNodeId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

// Re-export algorithms
pub use breachsim_graph_algorithms::{
    average_clustering, betweenness_centrality, bfs, closeness_centrality, degree_centrality,
    hop_distances, weakly_connected_components, PathResult, WccResult,
};

/// Build a GraphView from the network for algorithm execution.
///
/// NodeIds are device indices. Dependency weights are not carried over.
pub fn build_view(network: &Network) -> GraphView {
    let index_to_node: Vec<AlgoNodeId> = (0..network.device_count() as AlgoNodeId).collect();

    let outgoing = (0..network.device_count())
        .map(|idx| network.out_edges(idx).iter().map(|&(to, _)| to).collect())
        .collect();

    GraphView::from_adjacency_list(index_to_node, outgoing)
}

/// Per-device centrality scores, in device definition order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentralityReport {
    pub betweenness: IndexMap<DeviceName, f64>,
    pub closeness: IndexMap<DeviceName, f64>,
    pub degree: IndexMap<DeviceName, f64>,
}

/// Structural vulnerability assessment of a network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulnerabilityReport {
    /// Devices above the high-risk threshold, in definition order
    pub high_risk_devices: Vec<DeviceName>,
    pub centrality_analysis: CentralityReport,
    /// Shortest paths of more than two devices between high-risk devices
    pub critical_paths: Vec<Vec<DeviceName>>,
    /// Highest risk score; ties go to the lexicographically smallest name
    pub most_vulnerable: Option<DeviceName>,
    /// Highest betweenness; ties go to the lexicographically smallest name
    pub most_central: Option<DeviceName>,
}

/// Topology summary of a network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub average_clustering: f64,
    pub is_weakly_connected: bool,
    /// Longest shortest path in hops; only defined for strongly connected networks
    pub diameter: Option<usize>,
    /// Mean hop distance over ordered pairs; only defined for strongly connected networks
    pub average_shortest_path: Option<f64>,
}

fn by_name(network: &Network, scores: &HashMap<AlgoNodeId, f64>) -> IndexMap<DeviceName, f64> {
    network
        .devices()
        .iter()
        .enumerate()
        .map(|(idx, d)| {
            let score = scores.get(&(idx as AlgoNodeId)).copied().unwrap_or(0.0);
            (d.name().clone(), score)
        })
        .collect()
}

/// Maximum by score, smallest name on ties
fn arg_max<'a>(scores: impl Iterator<Item = (&'a DeviceName, f64)>) -> Option<DeviceName> {
    scores
        .fold(None, |best: Option<(&DeviceName, f64)>, (name, score)| match best {
            Some((best_name, best_score))
                if best_score > score || (best_score == score && best_name <= name) =>
            {
                Some((best_name, best_score))
            }
            _ => Some((name, score)),
        })
        .map(|(name, _)| name.clone())
}

/// Centrality, high-risk devices and critical paths
pub fn vulnerability_analysis(network: &Network, config: &AnalysisConfig) -> VulnerabilityReport {
    let view = build_view(network);

    let centrality_analysis = CentralityReport {
        betweenness: by_name(network, &betweenness_centrality(&view)),
        closeness: by_name(network, &closeness_centrality(&view)),
        degree: by_name(network, &degree_centrality(&view)),
    };

    let high_risk_devices: Vec<DeviceName> = network
        .devices()
        .iter()
        .filter(|d| d.risk_score() > config.high_risk_threshold)
        .map(|d| d.name().clone())
        .collect();

    let critical_paths = critical_paths(network, &view, &high_risk_devices, config.max_critical_paths);
    debug!("Found {} critical paths among {} high-risk devices", critical_paths.len(), high_risk_devices.len());

    let most_vulnerable = arg_max(network.devices().iter().map(|d| (d.name(), d.risk_score())));
    let most_central = arg_max(
        centrality_analysis
            .betweenness
            .iter()
            .map(|(name, &score)| (name, score)),
    );

    VulnerabilityReport {
        high_risk_devices,
        centrality_analysis,
        critical_paths,
        most_vulnerable,
        most_central,
    }
}

/// Enumerate pairs of high-risk devices lexicographically (source, then
/// target) and keep the first `limit` shortest paths longer than two devices.
fn critical_paths(
    network: &Network,
    view: &GraphView,
    high_risk: &[DeviceName],
    limit: usize,
) -> Vec<Vec<DeviceName>> {
    let mut ordered: Vec<&DeviceName> = high_risk.iter().collect();
    ordered.sort();

    let mut paths = Vec::new();
    for &source in &ordered {
        for &target in &ordered {
            if paths.len() >= limit {
                return paths;
            }
            if source == target {
                continue;
            }
            let (Some(s), Some(t)) = (network.index_of(source.as_str()), network.index_of(target.as_str())) else {
                continue;
            };
            if let Some(found) = bfs(view, s as AlgoNodeId, t as AlgoNodeId) {
                if found.path.len() > 2 {
                    paths.push(
                        found
                            .path
                            .iter()
                            .map(|&id| network.device_at(id as usize).name().clone())
                            .collect(),
                    );
                }
            }
        }
    }
    paths
}

/// Density, clustering, connectivity and distance statistics
pub fn network_metrics(network: &Network) -> NetworkMetrics {
    let view = build_view(network);
    let n = view.node_count;
    let m = view.edge_count();

    let density = if n > 1 {
        m as f64 / (n * (n - 1)) as f64
    } else {
        0.0
    };

    let is_weakly_connected = n > 0 && weakly_connected_components(&view).is_connected();

    // All-pairs hop distances; bail out on the first unreachable pair
    let mut diameter = Some(0usize);
    let mut total_distance = 0usize;
    if n == 0 {
        diameter = None;
    }
    for source in 0..n {
        if diameter.is_none() {
            break;
        }
        for d in hop_distances(&view, source, Direction::Outgoing) {
            match d {
                Some(d) => {
                    total_distance += d;
                    diameter = diameter.map(|current| current.max(d));
                }
                None => {
                    diameter = None;
                    break;
                }
            }
        }
    }

    let average_shortest_path = diameter.map(|_| {
        if n > 1 {
            total_distance as f64 / (n * (n - 1)) as f64
        } else {
            0.0
        }
    });

    NetworkMetrics {
        node_count: n,
        edge_count: m,
        density,
        average_clustering: average_clustering(&view),
        is_weakly_connected,
        diameter,
        average_shortest_path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Dependency;

    #[test]
    fn test_build_view_matches_network() {
        let network = Network::build(
            [("A", 0.1), ("B", 0.2), ("C", 0.3)],
            [Dependency::with_weight("A", "B", 2.0), Dependency::new("A", "C")],
        )
        .unwrap();
        let view = build_view(&network);

        assert_eq!(view.node_count, 3);
        assert_eq!(view.successors(0), &[1, 2]);
        assert_eq!(view.predecessors(2), &[0]);
        assert_eq!(view.edge_count(), 2);
    }

    #[test]
    fn test_arg_max_breaks_ties_by_name() {
        let names = [DeviceName::new("Zeta"), DeviceName::new("Alpha"), DeviceName::new("Mid")];
        let scores = [0.9, 0.9, 0.1];
        let best = arg_max(names.iter().zip(scores.iter().copied()));
        assert_eq!(best, Some(DeviceName::new("Alpha")));

        assert_eq!(arg_max(std::iter::empty()), None);
    }

    #[test]
    fn test_metrics_cycle() {
        // A -> B -> C -> A
        let network = Network::build(
            [("A", 0.5), ("B", 0.5), ("C", 0.5)],
            [Dependency::new("A", "B"), Dependency::new("B", "C"), Dependency::new("C", "A")],
        )
        .unwrap();
        let metrics = network_metrics(&network);

        assert_eq!(metrics.node_count, 3);
        assert_eq!(metrics.edge_count, 3);
        assert!((metrics.density - 0.5).abs() < 1e-12);
        assert!(metrics.is_weakly_connected);
        assert_eq!(metrics.diameter, Some(2));
        // distances: 1,2 from each node -> 9 / 6
        assert_eq!(metrics.average_shortest_path, Some(1.5));
        assert!((metrics.average_clustering - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_metrics_not_strongly_connected() {
        let network = Network::build([("A", 0.5), ("B", 0.5)], [Dependency::new("A", "B")]).unwrap();
        let metrics = network_metrics(&network);
        assert!(metrics.is_weakly_connected);
        assert_eq!(metrics.diameter, None);
        assert_eq!(metrics.average_shortest_path, None);
    }

    #[test]
    fn test_metrics_empty_network() {
        let network = Network::build(Vec::<(&str, f64)>::new(), Vec::<Dependency>::new()).unwrap();
        let metrics = network_metrics(&network);
        assert_eq!(metrics.node_count, 0);
        assert_eq!(metrics.density, 0.0);
        assert!(!metrics.is_weakly_connected);
        assert_eq!(metrics.diameter, None);
    }
}
