use stop_network_analyzer::cluster::{calculate_cluster_metrics, girvan_newman};
use stop_network_analyzer::graph::{
    edge_betweenness, Bfs, Dijkstra, Node, NodePair, PathFinder, PathStrategy, StopGraph,
};

fn undirected(ids: &[&str], edges: &[(&str, &str, f64)]) -> StopGraph {
    let mut graph = StopGraph::new();
    for id in ids {
        graph.add_node(Node::new(*id, 0.0, 0.0));
    }
    for &(a, b, w) in edges {
        let a = graph.find_node_by_id(a).unwrap();
        let b = graph.find_node_by_id(b).unwrap();
        graph.add_edge(a, b, w);
        graph.add_edge(b, a, w);
    }
    graph
}

fn ids(graph: &StopGraph, nodes: &[u32]) -> Vec<String> {
    nodes.iter().map(|&n| graph.node_id(n).to_string()).collect()
}

#[test]
fn path_graph_end_to_end() {
    let mut graph = undirected(
        &["A", "B", "C", "D"],
        &[("A", "B", 0.0), ("B", "C", 0.0), ("C", "D", 0.0)],
    );
    let a = graph.node_by_id("A").unwrap();

    let result = Bfs.run(&graph, a).unwrap();
    for (id, hops) in [("A", 0.0), ("B", 1.0), ("C", 2.0), ("D", 3.0)] {
        let node = graph.node_by_id(id).unwrap();
        assert_eq!(result.distance_to(node), Some(hops), "distance to {}", id);
    }

    let betweenness = edge_betweenness(&graph, PathStrategy::Unweighted).unwrap();
    let b = graph.node_by_id("B").unwrap();
    let c = graph.node_by_id("C").unwrap();
    assert_eq!(betweenness.highest().map(|(pair, _)| pair), Some(NodePair::new(c, b)));

    let original = graph.clone();
    let outcome = girvan_newman(&mut graph, 2, PathStrategy::Unweighted).unwrap();

    let groups: Vec<_> = outcome.clusters.iter().map(|c| ids(&graph, &c.members)).collect();
    assert_eq!(groups, vec![vec!["A", "B"], vec!["C", "D"]]);
    assert_eq!(outcome.removed_edges.len(), 1);
    assert_eq!(graph.pair_label(outcome.removed_edges[0].pair), "B-C");

    // The clone kept the original topology
    assert!(original.has_edge(b, c));
    assert!(!graph.has_edge(b, c));
}

#[test]
fn weighted_triangle_prefers_two_short_hops() {
    let graph = undirected(
        &["A", "B", "C"],
        &[("A", "B", 1.0), ("B", "C", 1.0), ("A", "C", 5.0)],
    );
    let a = graph.node_by_id("A").unwrap();
    let c = graph.node_by_id("C").unwrap();

    let result = Dijkstra.run(&graph, a).unwrap();
    assert_eq!(result.distance_to(c), Some(2.0));

    let path = result.path_to(c).unwrap().unwrap();
    assert_eq!(ids(&graph, &path), vec!["A", "B", "C"]);
    assert_eq!(graph.path_weight(&path), Some(2.0));
}

#[test]
fn clusters_partition_every_node() {
    let mut graph = undirected(
        &["A", "B", "C", "D", "E", "F", "G"],
        &[
            ("A", "B", 0.0),
            ("B", "C", 0.0),
            ("A", "C", 0.0),
            ("C", "D", 0.0),
            ("D", "E", 0.0),
            ("E", "F", 0.0),
            ("F", "G", 0.0),
            ("E", "G", 0.0),
        ],
    );
    let original = graph.clone();
    let mut outcome = girvan_newman(&mut graph, 3, PathStrategy::Unweighted).unwrap();
    calculate_cluster_metrics(&mut outcome.clusters, &original);

    assert_eq!(outcome.clusters.len(), 3);

    let mut seen: Vec<u32> = outcome.clusters.iter().flat_map(|c| c.members.clone()).collect();
    seen.sort_unstable();
    assert_eq!(seen, original.node_indices().collect::<Vec<_>>());

    for cluster in &outcome.clusters {
        let metrics = cluster.metrics.as_ref().unwrap();
        assert!(metrics.density > 0.0 && metrics.density <= 1.0);
    }
}
