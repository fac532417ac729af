//! Visualization generation module

use anyhow::Result;
use crate::cluster::ClusterOutcome;
use crate::graph::{NodePair, StopGraph};
use petgraph::dot::Dot;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Generate visualizations from analysis results.
///
/// `graph` should be the network before clustering, so removed edges can be
/// shown alongside the ones that survived.
pub fn generate_visualizations(
    outcome: &ClusterOutcome,
    graph: &StopGraph,
    output_dir: &Path,
) -> Result<()> {
    log::info!("Generating visualizations for {} clusters", outcome.clusters.len());

    let viz_dir = output_dir.join("visualizations");
    fs::create_dir_all(&viz_dir)?;

    generate_network_dot(outcome, graph, &viz_dir)?;
    generate_node_table(outcome, graph, &viz_dir)?;
    generate_stats_table(outcome, &viz_dir)?;

    log::info!("Visualizations generated successfully");

    Ok(())
}

/// Build an undirected petgraph view of the network.
///
/// Nodes are labelled `id [cN]` with their cluster; each undirected edge
/// appears once, labelled with its weight or with the step it was removed at.
pub fn to_labelled_graph(outcome: &ClusterOutcome, graph: &StopGraph) -> UnGraph<String, String> {
    let assignments = outcome.assignments(graph.node_count());
    let removal_steps: HashMap<NodePair, usize> = outcome
        .removed_edges
        .iter()
        .enumerate()
        .map(|(step, edge)| (edge.pair, step + 1))
        .collect();

    let mut network: UnGraph<String, String> =
        UnGraph::with_capacity(graph.node_count(), graph.edge_count() / 2);
    let indices: Vec<NodeIndex> = graph
        .nodes()
        .iter()
        .zip(&assignments)
        .map(|(node, cluster)| {
            let label = match cluster {
                Some(id) => format!("{} [c{}]", node.id, id),
                None => node.id.clone(),
            };
            network.add_node(label)
        })
        .collect();

    let mut seen: HashSet<NodePair> = HashSet::new();
    for (from, edge) in graph.edges() {
        if from == edge.to {
            continue;
        }
        let pair = NodePair::new(from, edge.to);
        if !seen.insert(pair) {
            continue;
        }

        let label = match removal_steps.get(&pair) {
            Some(step) => format!("removed #{}", step),
            None => format!("{:.4}", edge.weight),
        };
        network.add_edge(indices[from as usize], indices[edge.to as usize], label);
    }

    network
}

/// Write the network as a Graphviz DOT file
fn generate_network_dot(outcome: &ClusterOutcome, graph: &StopGraph, viz_dir: &Path) -> Result<()> {
    log::info!("Generating network DOT file");

    let network = to_labelled_graph(outcome, graph);
    let mut file = File::create(viz_dir.join("network.dot"))?;
    write!(file, "{}", Dot::with_config(&network, &[]))?;

    Ok(())
}

/// Write a CSV with coordinates and cluster assignment per stop
fn generate_node_table(outcome: &ClusterOutcome, graph: &StopGraph, viz_dir: &Path) -> Result<()> {
    let mut file = File::create(viz_dir.join("nodes.csv"))?;
    let assignments = outcome.assignments(graph.node_count());

    writeln!(file, "id,lat,lon,cluster_id")?;
    for (node, cluster) in graph.nodes().iter().zip(assignments) {
        let cluster = cluster.map(|id| id.to_string()).unwrap_or_default();
        writeln!(file, "{},{},{},{}", node.id, node.lat, node.lon, cluster)?;
    }

    Ok(())
}

/// Write a CSV with per-cluster statistics
fn generate_stats_table(outcome: &ClusterOutcome, viz_dir: &Path) -> Result<()> {
    log::info!("Generating statistical visualizations");

    let mut file = File::create(viz_dir.join("cluster_stats.csv"))?;
    writeln!(file, "cluster_id,size,density,internal_edges,central_nodes_count")?;

    for cluster in &outcome.clusters {
        match &cluster.metrics {
            Some(metrics) => writeln!(
                file,
                "{},{},{:.6},{},{}",
                cluster.id,
                cluster.size,
                metrics.density,
                metrics.internal_edges,
                metrics.central_nodes.len()
            )?,
            None => writeln!(file, "{},{},,,", cluster.id, cluster.size)?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::girvan_newman;
    use crate::graph::{Node, PathStrategy};

    #[test]
    fn labelled_graph_marks_clusters_and_removed_edges() {
        let mut graph = StopGraph::new();
        for id in ["A", "B", "C", "D"] {
            graph.add_node(Node::new(id, 0.0, 0.0));
        }
        for (a, b) in [(0, 1), (1, 2), (2, 3)] {
            graph.add_edge(a, b, 1.0);
            graph.add_edge(b, a, 1.0);
        }
        let original = graph.clone();
        let outcome = girvan_newman(&mut graph, 2, PathStrategy::Unweighted).unwrap();

        let network = to_labelled_graph(&outcome, &original);

        assert_eq!(network.node_count(), 4);
        assert_eq!(network.edge_count(), 3);
        assert_eq!(network[NodeIndex::new(0)], "A [c0]");
        assert_eq!(network[NodeIndex::new(3)], "D [c1]");
        assert!(network.edge_weights().any(|label| label == "removed #1"));
    }
}
