//! Cluster detection algorithms

use crate::cluster::{Cluster, ClusterOutcome, RemovedEdge};
use crate::error::GraphResult;
use crate::graph::{edge_betweenness, Bfs, NodeIdx, PathFinder, PathStrategy, StopGraph};
use log;

/// Partition the graph by reachability.
///
/// Nodes are visited in insertion order; each still-unassigned node seeds a
/// breadth-first search, and the reached nodes that are not yet assigned form
/// one cluster. On a symmetric graph these are the connected components.
pub fn find_connected_components(graph: &StopGraph) -> GraphResult<Vec<Cluster>> {
    let mut assigned = vec![false; graph.node_count()];
    let mut clusters = Vec::new();

    for seed in graph.node_indices() {
        if assigned[seed as usize] {
            continue;
        }

        let reached = Bfs.run(graph, seed)?;
        let members: Vec<NodeIdx> = reached
            .reached_nodes()
            .filter(|&node| !assigned[node as usize])
            .collect();

        for &member in &members {
            assigned[member as usize] = true;
        }

        clusters.push(Cluster::new(clusters.len() as u32, members));
    }

    Ok(clusters)
}

/// Split the graph into `target_count` clusters by repeatedly deleting the
/// edge with the highest betweenness.
///
/// The graph is mutated in place: every removed edge is gone afterwards, in
/// both directions. Clone the graph first to keep the original topology.
///
/// The loop stops once the partition reaches `target_count` clusters, or when
/// at most one undirected link is left (a reciprocal pair counts once). A
/// `target_count` of 0 returns the current partition without removing
/// anything.
pub fn girvan_newman(
    graph: &mut StopGraph,
    target_count: usize,
    strategy: PathStrategy,
) -> GraphResult<ClusterOutcome> {
    log::info!(
        "Clustering {} nodes into {} clusters ({:?} shortest paths)",
        graph.node_count(),
        target_count,
        strategy
    );

    let mut clusters = find_connected_components(graph)?;
    let mut removed_edges = Vec::new();

    while clusters.len() < target_count && graph.undirected_edge_count() > 1 {
        let betweenness = edge_betweenness(graph, strategy)?;
        let Some((pair, count)) = betweenness.highest() else {
            log::debug!("No edges left to remove");
            break;
        };

        graph.delete_edge(pair);
        removed_edges.push(RemovedEdge { pair, betweenness: count });

        clusters = find_connected_components(graph)?;

        log::debug!(
            "Removed edge {} (betweenness {}), {} clusters",
            graph.pair_label(pair),
            count,
            clusters.len()
        );
    }

    log::info!(
        "Found {} clusters after removing {} edges",
        clusters.len(),
        removed_edges.len()
    );

    Ok(ClusterOutcome { clusters, removed_edges })
}
