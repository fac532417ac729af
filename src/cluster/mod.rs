//! Cluster analysis module

pub mod detection;
pub mod metrics;

use serde::{Serialize, Deserialize};
use crate::graph::{NodeIdx, NodePair};

pub use detection::{find_connected_components, girvan_newman};
pub use metrics::calculate_cluster_metrics;

/// One element of a partition of the stop network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Position of this cluster in discovery order
    pub id: u32,

    /// Members of this cluster (node indices), in discovery order
    pub members: Vec<NodeIdx>,

    /// Size of the cluster
    pub size: usize,

    /// Structural metrics, filled in by `calculate_cluster_metrics`
    pub metrics: Option<ClusterMetrics>,
}

impl Cluster {
    pub fn new(id: u32, members: Vec<NodeIdx>) -> Self {
        Self {
            id,
            size: members.len(),
            members,
            metrics: None,
        }
    }
}

/// Structural metrics of a cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterMetrics {
    /// Directed edges with both endpoints inside the cluster
    pub internal_edges: usize,

    /// Density: internal edges / potential directed edges
    pub density: f32,

    /// Members with the highest in-cluster degree, highest first
    pub central_nodes: Vec<NodeIdx>,
}

/// An edge removed by the clustering loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RemovedEdge {
    pub pair: NodePair,

    /// Betweenness of the edge when it was removed
    pub betweenness: u32,
}

/// Result of a clustering run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterOutcome {
    /// Final partition, in discovery order
    pub clusters: Vec<Cluster>,

    /// Removed edges, in removal order
    pub removed_edges: Vec<RemovedEdge>,
}

impl ClusterOutcome {
    /// Cluster id for every node, indexed by `NodeIdx`
    pub fn assignments(&self, node_count: usize) -> Vec<Option<u32>> {
        let mut assignments = vec![None; node_count];
        for cluster in &self.clusters {
            for &member in &cluster.members {
                if let Some(slot) = assignments.get_mut(member as usize) {
                    *slot = Some(cluster.id);
                }
            }
        }
        assignments
    }
}
