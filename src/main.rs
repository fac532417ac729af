use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;

use stop_network_analyzer::cluster::{self, ClusterOutcome};
use stop_network_analyzer::config::{Config, Route};
use stop_network_analyzer::data;
use stop_network_analyzer::graph::{PathStrategy, StopGraph};
use stop_network_analyzer::storage::{self, RouteSummary};
use stop_network_analyzer::viz;

#[derive(Parser, Debug)]
#[clap(
    name = "stop-network-analyzer",
    about = "Shortest paths and betweenness clustering over a GTFS stop network"
)]
struct Cli {
    /// Directory containing stops.txt and stop_times.txt
    #[clap(long)]
    feed: String,

    /// Output directory for results
    #[clap(long, default_value = "cluster_results")]
    output_dir: String,

    /// Start stop for the breadth-first route
    #[clap(long, default_value = "M03")]
    bfs_from: String,

    /// Target stop for the breadth-first route
    #[clap(long, default_value = "M27")]
    bfs_to: String,

    /// Start stop for the weighted route
    #[clap(long, default_value = "M13")]
    dijkstra_from: String,

    /// Target stop for the weighted route
    #[clap(long, default_value = "M21")]
    dijkstra_to: String,

    /// Number of clusters to split the network into
    #[clap(long, default_value = "3")]
    clusters: usize,

    /// Cluster using weighted shortest paths
    #[clap(long)]
    weighted: bool,

    /// Print both graphs
    #[clap(long)]
    print_graph: bool,

    /// Skip visualizations
    #[clap(long)]
    skip_viz: bool,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            bfs_route: Route::new(self.bfs_from, self.bfs_to),
            weighted_route: Route::new(self.dijkstra_from, self.dijkstra_to),
            print_graph: self.print_graph,
            skip_viz: self.skip_viz,
            ..Config::new(self.feed, self.output_dir, self.clusters, self.weighted)
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let config = args.into_config();
    run(&config)
}

fn run(config: &Config) -> Result<()> {
    log::info!("Starting stop network analysis");
    log::info!("Feed: {}", config.feed_dir.display());
    log::info!("Output: {}", config.output_dir.display());

    // 1. Read the feed once and link both views of the network
    let builder = data::read_feed(&config.feed_dir)?;
    let graph = builder.clone().build(false)?;
    let weighted_graph = builder.build(true)?;

    if config.print_graph {
        println!("========== UNWEIGHTED GRAPH ==========\n\n{}", graph.render());
        println!("========== WEIGHTED GRAPH ==========\n\n{}", weighted_graph.render());
    }

    // 2. Shortest routes
    let bfs_route = route(&graph, &config.bfs_route, PathStrategy::Unweighted)?;
    print_route(&bfs_route);

    let weighted_route = route(&weighted_graph, &config.weighted_route, PathStrategy::Weighted)?;
    print_route(&weighted_route);

    // 3. Clustering works on a copy; edges are removed from it
    let strategy = config.clustering_strategy();
    let base = match strategy {
        PathStrategy::Unweighted => &graph,
        PathStrategy::Weighted => &weighted_graph,
    };
    let mut working = base.clone();
    let mut outcome = cluster::girvan_newman(&mut working, config.cluster_count, strategy)?;
    cluster::calculate_cluster_metrics(&mut outcome.clusters, base);

    print_clusters(&outcome, base);

    // 4. Save results
    storage::save_results(
        &outcome,
        base,
        &[bfs_route, weighted_route],
        &config.output_dir,
    )?;

    // 5. Generate visualizations if requested
    if !config.skip_viz {
        viz::generate_visualizations(&outcome, base, &config.output_dir)?;
    }

    log::info!("Analysis complete. Results saved to {}", config.output_dir.display());

    Ok(())
}

/// Answer one route query on `graph`
fn route(graph: &StopGraph, route: &Route, strategy: PathStrategy) -> Result<RouteSummary> {
    let from = graph
        .node_by_id(&route.from)
        .with_context(|| format!("unknown start stop {}", route.from))?;
    let to = graph
        .node_by_id(&route.to)
        .with_context(|| format!("unknown target stop {}", route.to))?;

    let result = strategy.run(graph, from)?;
    let path = result.path_to(to)?.map(|path| {
        path.iter()
            .map(|&node| graph.node_id(node).to_string())
            .collect::<Vec<_>>()
    });

    let algorithm = match strategy {
        PathStrategy::Unweighted => "bfs",
        PathStrategy::Weighted => "dijkstra",
    };

    Ok(RouteSummary {
        algorithm: algorithm.to_string(),
        from: route.from.clone(),
        to: route.to.clone(),
        path,
        distance: result.distance_to(to),
    })
}

fn print_route(route: &RouteSummary) {
    println!(
        "========== {} SHORTEST PATH ==========\n",
        route.algorithm.to_uppercase()
    );
    match (&route.path, route.distance) {
        (Some(path), Some(distance)) => {
            println!("{} -> {}: {}", route.from, route.to, path.join(" "));
            println!("Distance: {}\n", distance);
        }
        _ => println!("No path between {} and {}\n", route.from, route.to),
    }
}

fn print_clusters(outcome: &ClusterOutcome, graph: &StopGraph) {
    println!("========== CLUSTERING ==========\n");
    println!(
        "Removed {} edges: {}\n",
        outcome.removed_edges.len(),
        outcome
            .removed_edges
            .iter()
            .map(|edge| graph.pair_label(edge.pair))
            .join(" ")
    );

    for cluster in &outcome.clusters {
        println!(
            "CLUSTER {} : {}",
            cluster.id + 1,
            cluster.members.iter().map(|&node| graph.node_id(node)).join(" ")
        );
        println!("Size = {}", cluster.size);
    }
}
