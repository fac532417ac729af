//! Configuration management for the stop network analyzer

use std::path::PathBuf;
use crate::graph::PathStrategy;

/// A start/target pair of stop ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub from: String,
    pub to: String,
}

impl Route {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self { from: from.into(), to: to.into() }
    }
}

/// Default configuration for the stop network analyzer
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `stops.txt` and `stop_times.txt`
    pub feed_dir: PathBuf,

    /// Output directory for results
    pub output_dir: PathBuf,

    /// Route answered with breadth-first search on the unweighted graph
    pub bfs_route: Route,

    /// Route answered with Dijkstra on the weighted graph
    pub weighted_route: Route,

    /// Number of clusters to split the network into
    pub cluster_count: usize,

    /// Use weighted shortest paths for betweenness while clustering
    pub weighted_clustering: bool,

    /// Print graph renderings to stdout
    pub print_graph: bool,

    /// Skip visualizations
    pub skip_viz: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_dir: PathBuf::from("resources"),
            output_dir: PathBuf::from("cluster_results"),
            bfs_route: Route::new("M03", "M27"),
            weighted_route: Route::new("M13", "M21"),
            cluster_count: 3,
            weighted_clustering: false,
            print_graph: false,
            skip_viz: false,
        }
    }
}

impl Config {
    /// Create a new configuration with custom values
    pub fn new(
        feed_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        cluster_count: usize,
        weighted_clustering: bool,
    ) -> Self {
        Self {
            feed_dir: feed_dir.into(),
            output_dir: output_dir.into(),
            cluster_count,
            weighted_clustering,
            ..Self::default()
        }
    }

    /// Path strategy used for betweenness while clustering
    pub fn clustering_strategy(&self) -> PathStrategy {
        PathStrategy::from_weighted(self.weighted_clustering)
    }
}
