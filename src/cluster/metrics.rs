//! Cluster statistics and metrics

use std::collections::{HashMap, HashSet};
use rayon::prelude::*;
use crate::cluster::{Cluster, ClusterMetrics};
use crate::graph::{NodeIdx, StopGraph};

/// Number of central nodes reported per cluster
const CENTRAL_NODE_COUNT: usize = 5;

/// Fill in metrics for every cluster, one cluster per rayon task
pub fn calculate_cluster_metrics(clusters: &mut [Cluster], graph: &StopGraph) {
    log::debug!("Calculating metrics for {} clusters", clusters.len());

    clusters.par_iter_mut().for_each(|cluster| {
        cluster.metrics = Some(cluster_metrics(graph, &cluster.members));
    });
}

/// Compute density and central nodes for one member set
pub fn cluster_metrics(graph: &StopGraph, members: &[NodeIdx]) -> ClusterMetrics {
    let member_set: HashSet<NodeIdx> = members.iter().copied().collect();
    let internal_edges = count_internal_edges(graph, members, &member_set);

    ClusterMetrics {
        internal_edges,
        density: density(members.len(), internal_edges),
        central_nodes: identify_central_nodes(graph, members, &member_set),
    }
}

/// Calculate density (actual edges / potential edges)
pub fn calculate_density(graph: &StopGraph, members: &[NodeIdx]) -> f32 {
    let member_set: HashSet<NodeIdx> = members.iter().copied().collect();
    density(members.len(), count_internal_edges(graph, members, &member_set))
}

fn density(n: usize, internal_edges: usize) -> f32 {
    if n <= 1 {
        return 1.0; // By convention, singleton clusters have density 1
    }

    // Potential edges = n * (n - 1) for directed graph
    let potential_edges = n * (n - 1);
    internal_edges as f32 / potential_edges as f32
}

fn count_internal_edges(
    graph: &StopGraph,
    members: &[NodeIdx],
    member_set: &HashSet<NodeIdx>,
) -> usize {
    members
        .iter()
        .map(|&src| graph.neighbors(src).filter(|dst| member_set.contains(dst)).count())
        .sum()
}

/// Members ranked by in-cluster degree (in + out); ties go to the lower index
fn identify_central_nodes(
    graph: &StopGraph,
    members: &[NodeIdx],
    member_set: &HashSet<NodeIdx>,
) -> Vec<NodeIdx> {
    let mut degrees: HashMap<NodeIdx, usize> = members.iter().map(|&m| (m, 0)).collect();

    for &src in members {
        for dst in graph.neighbors(src) {
            if src != dst && member_set.contains(&dst) {
                *degrees.entry(src).or_default() += 1;
                *degrees.entry(dst).or_default() += 1;
            }
        }
    }

    let mut nodes_by_degree: Vec<(NodeIdx, usize)> = degrees.into_iter().collect();
    nodes_by_degree.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    nodes_by_degree
        .into_iter()
        .take(CENTRAL_NODE_COUNT)
        .map(|(node, _)| node)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;

    fn star(leaves: usize) -> StopGraph {
        let mut graph = StopGraph::new();
        graph.add_node(Node::new("hub", 0.0, 0.0));
        for i in 1..=leaves {
            let leaf = graph.add_node(Node::new(format!("L{}", i), 0.0, 0.0));
            graph.add_edge(0, leaf, 0.0);
            graph.add_edge(leaf, 0, 0.0);
        }
        graph
    }

    #[test]
    fn singleton_density_is_one() {
        let graph = star(2);
        assert_eq!(calculate_density(&graph, &[1]), 1.0);
    }

    #[test]
    fn star_density_and_hub() {
        let graph = star(3);
        let metrics = cluster_metrics(&graph, &[0, 1, 2, 3]);

        assert_eq!(metrics.internal_edges, 6);
        assert_eq!(metrics.density, 0.5);
        assert_eq!(metrics.central_nodes[0], 0);
        assert_eq!(metrics.central_nodes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn central_nodes_are_capped() {
        let graph = star(8);
        let members: Vec<NodeIdx> = graph.node_indices().collect();
        let metrics = cluster_metrics(&graph, &members);

        assert_eq!(metrics.central_nodes.len(), CENTRAL_NODE_COUNT);
    }

    #[test]
    fn edges_leaving_the_cluster_are_ignored() {
        let graph = star(3);
        let metrics = cluster_metrics(&graph, &[1, 2]);

        assert_eq!(metrics.internal_edges, 0);
        assert_eq!(metrics.density, 0.0);
    }

    #[test]
    fn metrics_are_filled_for_every_cluster() {
        let graph = star(2);
        let mut clusters = vec![Cluster::new(0, vec![0, 1]), Cluster::new(1, vec![2])];
        calculate_cluster_metrics(&mut clusters, &graph);

        assert!(clusters.iter().all(|c| c.metrics.is_some()));
        assert_eq!(clusters[0].metrics.as_ref().map(|m| m.density), Some(1.0));
    }
}
