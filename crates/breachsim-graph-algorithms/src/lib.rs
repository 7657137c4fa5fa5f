pub mod common;
pub mod centrality;
pub mod community;
pub mod pathfinding;
pub mod topology;

pub use common::{GraphView, NodeId};
pub use centrality::{betweenness_centrality, closeness_centrality, degree_centrality};
pub use community::{weakly_connected_components, WccResult};
pub use pathfinding::{bfs, hop_distances, Direction, PathResult};
pub use topology::average_clustering;
