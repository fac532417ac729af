//! Results persistence module

use anyhow::Result;
use crate::cluster::ClusterOutcome;
use crate::graph::{NodeIdx, StopGraph};
use serde::Serialize;
use serde_json::{json, to_string_pretty};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// A shortest-path query and its answer, as stop ids
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    /// Algorithm that answered the query
    pub algorithm: String,
    pub from: String,
    pub to: String,

    /// Stop ids from `from` to `to`, or `None` when no path exists
    pub path: Option<Vec<String>>,

    /// Hops or cumulative weight, `None` when no path exists
    pub distance: Option<f64>,
}

/// Save analysis results to the specified directory
pub fn save_results(
    outcome: &ClusterOutcome,
    graph: &StopGraph,
    routes: &[RouteSummary],
    output_dir: &Path,
) -> Result<()> {
    log::info!("Saving {} clusters to {}", outcome.clusters.len(), output_dir.display());

    // Ensure output directory exists
    fs::create_dir_all(output_dir)?;

    save_summary(outcome, graph, output_dir)?;
    save_clusters(outcome, graph, output_dir)?;
    save_removed_edges(outcome, graph, output_dir)?;
    write_json(&output_dir.join("paths.json"), &json!({ "routes": routes }))?;

    log::info!("Results saved successfully");

    Ok(())
}

fn write_json(path: &Path, value: &serde_json::Value) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(value)?.as_bytes())?;
    Ok(())
}

/// Resolve node indices to stop ids
fn stop_ids(graph: &StopGraph, nodes: &[NodeIdx]) -> Vec<String> {
    nodes.iter().map(|&node| graph.node_id(node).to_string()).collect()
}

/// Save summary information
fn save_summary(outcome: &ClusterOutcome, graph: &StopGraph, output_dir: &Path) -> Result<()> {
    log::info!("Saving summary information");

    let sizes: Vec<f64> = outcome.clusters.iter().map(|c| c.size as f64).collect();
    let (mean_size, size_std_dev) = mean_and_std_dev(&sizes);

    let densities: Vec<f64> = outcome
        .clusters
        .iter()
        .filter_map(|c| c.metrics.as_ref().map(|m| m.density as f64))
        .collect();
    let (avg_density, _) = mean_and_std_dev(&densities);

    let summary = json!({
        "graph_stats": {
            "node_count": graph.node_count(),
            "edge_count": graph.edge_count(),
            "avg_degree": graph.edge_count() as f64 / graph.node_count().max(1) as f64,
        },
        "cluster_stats": {
            "cluster_count": outcome.clusters.len(),
            "removed_edge_count": outcome.removed_edges.len(),
            "total_clustered_nodes": outcome.clusters.iter().map(|c| c.size).sum::<usize>(),
            "largest_cluster_size": outcome.clusters.iter().map(|c| c.size).max().unwrap_or(0),
            "smallest_cluster_size": outcome.clusters.iter().map(|c| c.size).min().unwrap_or(0),
            "avg_cluster_size": mean_size,
            "cluster_size_std_dev": size_std_dev,
            "avg_density": avg_density,
        }
    });

    write_json(&output_dir.join("summary.json"), &summary)
}

/// Sample mean and standard deviation, 0 where undefined
fn mean_and_std_dev(values: &[f64]) -> (f64, f64) {
    use statrs::statistics::Statistics;

    match values.len() {
        0 => (0.0, 0.0),
        1 => (values[0], 0.0),
        _ => (values.iter().mean(), values.iter().std_dev()),
    }
}

/// Save individual cluster information
fn save_clusters(outcome: &ClusterOutcome, graph: &StopGraph, output_dir: &Path) -> Result<()> {
    log::info!("Saving individual cluster information");

    let clusters_dir = output_dir.join("clusters");
    fs::create_dir_all(&clusters_dir)?;

    for cluster in &outcome.clusters {
        let (density, internal_edges, central_nodes) = match &cluster.metrics {
            Some(metrics) => (
                Some(metrics.density),
                Some(metrics.internal_edges),
                stop_ids(graph, &metrics.central_nodes),
            ),
            None => (None, None, Vec::new()),
        };

        let cluster_json = json!({
            "id": cluster.id,
            "size": cluster.size,
            "density": density,
            "internal_edges": internal_edges,
            "central_nodes": central_nodes,
            "members": stop_ids(graph, &cluster.members),
        });

        write_json(&clusters_dir.join(format!("cluster_{}.json", cluster.id)), &cluster_json)?;
    }

    let clusters_json = json!({
        "clusters": outcome.clusters.iter().map(|c| {
            json!({
                "id": c.id,
                "size": c.size,
                "density": c.metrics.as_ref().map(|m| m.density),
            })
        }).collect::<Vec<_>>()
    });

    write_json(&output_dir.join("all_clusters.json"), &clusters_json)
}

/// Save the removed-edge trace in removal order
fn save_removed_edges(outcome: &ClusterOutcome, graph: &StopGraph, output_dir: &Path) -> Result<()> {
    let removed = json!({
        "removed_edges": outcome.removed_edges.iter().enumerate().map(|(step, edge)| {
            json!({
                "step": step + 1,
                "from": graph.node_id(edge.pair.first()),
                "to": graph.node_id(edge.pair.second()),
                "betweenness": edge.betweenness,
            })
        }).collect::<Vec<_>>()
    });

    write_json(&output_dir.join("removed_edges.json"), &removed)
}
