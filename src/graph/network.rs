//! Adjacency-list representation of a transit stop network

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::hash::{Hash, Hasher};
use serde::{Serialize, Deserialize};
use crate::error::{GraphError, GraphResult};

/// Index of a node inside a [`StopGraph`], assigned in insertion order
pub type NodeIdx = u32;

/// A transit stop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Stop identifier, unique within a graph
    pub id: String,

    /// Latitude
    pub lat: f64,

    /// Longitude
    pub lon: f64,
}

impl Node {
    pub fn new(id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self { id: id.into(), lat, lon }
    }
}

// Identity is the stop id; coordinates do not take part.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Directed arc stored in its source node's adjacency list
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Destination node
    pub to: NodeIdx,

    /// Non-negative weight (0 in unweighted graphs)
    pub weight: f64,
}

/// Two distinct nodes without direction.
///
/// Stored as `(min, max)` so `(a, b)` and `(b, a)` compare and hash the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodePair {
    first: NodeIdx,
    second: NodeIdx,
}

impl NodePair {
    pub fn new(a: NodeIdx, b: NodeIdx) -> Self {
        debug_assert_ne!(a, b, "a node pair needs two distinct nodes");
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> NodeIdx {
        self.first
    }

    pub fn second(&self) -> NodeIdx {
        self.second
    }
}

/// Mutable stop network: nodes plus one ordered list of outgoing edges per node.
///
/// Symmetry is not enforced; undirected networks are built by adding both
/// directions. Cloning gives a fully independent deep copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StopGraph {
    /// Nodes in insertion order, indexed by `NodeIdx`
    nodes: Vec<Node>,

    /// Mapping from stop ids to node indices
    id_to_index: HashMap<String, NodeIdx>,

    /// Outgoing edges per node, in insertion order
    adjacency: Vec<Vec<Edge>>,

    /// Edge operation counter: +1 per appended edge, -1 per removed direction.
    /// Use `edge_count()` for a verified recount.
    edge_counter: usize,
}

impl StopGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with room for `node_count` nodes
    pub fn with_capacity(node_count: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(node_count),
            id_to_index: HashMap::with_capacity(node_count),
            adjacency: Vec::with_capacity(node_count),
            edge_counter: 0,
        }
    }

    /// Insert a node, or return the index of the node already holding this id
    pub fn add_node(&mut self, node: Node) -> NodeIdx {
        if let Some(&idx) = self.id_to_index.get(&node.id) {
            return idx;
        }

        let idx = self.nodes.len() as NodeIdx;
        self.id_to_index.insert(node.id.clone(), idx);
        self.nodes.push(node);
        self.adjacency.push(Vec::new());

        idx
    }

    /// Append the edge `from -> to`.
    ///
    /// Returns `false` without touching the graph when either endpoint is
    /// unknown or the edge already exists. The reverse edge is never added.
    pub fn add_edge(&mut self, from: NodeIdx, to: NodeIdx, weight: f64) -> bool {
        if !self.contains(from) || !self.contains(to) {
            return false;
        }

        let edges = &mut self.adjacency[from as usize];
        if edges.iter().any(|edge| edge.to == to) {
            return false;
        }

        edges.push(Edge { to, weight });
        self.edge_counter += 1;
        true
    }

    /// Remove the edge between the pair in both directions.
    ///
    /// Returns how many directed edges were actually removed (0, 1 or 2).
    pub fn delete_edge(&mut self, pair: NodePair) -> usize {
        let mut removed = 0;

        for (from, to) in [(pair.first(), pair.second()), (pair.second(), pair.first())] {
            if let Some(edges) = self.adjacency.get_mut(from as usize) {
                let before = edges.len();
                edges.retain(|edge| edge.to != to);
                removed += before - edges.len();
            }
        }

        self.edge_counter = self.edge_counter.saturating_sub(removed);
        removed
    }

    /// Look up a stop by id
    pub fn find_node_by_id(&self, id: &str) -> Option<NodeIdx> {
        self.id_to_index.get(id).copied()
    }

    /// Like `find_node_by_id`, but reports a missing stop as an error
    pub fn node_by_id(&self, id: &str) -> GraphResult<NodeIdx> {
        self.find_node_by_id(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))
    }

    /// Get a node by index
    pub fn node(&self, idx: NodeIdx) -> Option<&Node> {
        self.nodes.get(idx as usize)
    }

    /// Stop id of a node, or `"?"` for an index outside the graph
    pub fn node_id(&self, idx: NodeIdx) -> &str {
        self.node(idx).map_or("?", |node| node.id.as_str())
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node indices in insertion order
    pub fn node_indices(&self) -> std::ops::Range<NodeIdx> {
        0..self.nodes.len() as NodeIdx
    }

    pub fn contains(&self, idx: NodeIdx) -> bool {
        (idx as usize) < self.nodes.len()
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Edge operation counter (see field docs)
    pub fn edge_counter(&self) -> usize {
        self.edge_counter
    }

    /// Number of directed edges actually stored
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Number of distinct undirected links: a reciprocal pair counts once,
    /// a one-way edge counts once, self-loops are ignored
    pub fn undirected_edge_count(&self) -> usize {
        self.edges()
            .filter(|(from, edge)| *from != edge.to)
            .map(|(from, edge)| NodePair::new(from, edge.to))
            .collect::<HashSet<_>>()
            .len()
    }

    /// Outgoing edges of a node, in insertion order
    pub fn outgoing_edges(&self, node: NodeIdx) -> &[Edge] {
        self.adjacency
            .get(node as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every stored edge as `(source, edge)`, by node then adjacency order
    pub fn edges(&self) -> impl Iterator<Item = (NodeIdx, &Edge)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(from, edges)| edges.iter().map(move |edge| (from as NodeIdx, edge)))
    }

    /// Destinations of a node's outgoing edges, in insertion order
    pub fn neighbors(&self, node: NodeIdx) -> impl Iterator<Item = NodeIdx> + '_ {
        self.outgoing_edges(node).iter().map(|edge| edge.to)
    }

    /// Destinations with their weights, stable-sorted by ascending weight
    pub fn neighbors_with_weights(&self, node: NodeIdx) -> Vec<(NodeIdx, f64)> {
        let mut neighbors: Vec<(NodeIdx, f64)> = self.outgoing_edges(node)
            .iter()
            .map(|edge| (edge.to, edge.weight))
            .collect();
        neighbors.sort_by(|a, b| a.1.total_cmp(&b.1));
        neighbors
    }

    /// Check if there's an edge from src to dst
    pub fn has_edge(&self, src: NodeIdx, dst: NodeIdx) -> bool {
        self.outgoing_edges(src).iter().any(|edge| edge.to == dst)
    }

    /// Weight of the edge `src -> dst`, if present
    pub fn edge_weight(&self, src: NodeIdx, dst: NodeIdx) -> Option<f64> {
        self.outgoing_edges(src)
            .iter()
            .find(|edge| edge.to == dst)
            .map(|edge| edge.weight)
    }

    /// Total weight along a node path, or `None` when some hop has no edge
    pub fn path_weight(&self, path: &[NodeIdx]) -> Option<f64> {
        path.windows(2)
            .map(|hop| self.edge_weight(hop[0], hop[1]))
            .sum()
    }

    /// Human-readable `A-B` label for a pair
    pub fn pair_label(&self, pair: NodePair) -> String {
        format!("{}-{}", self.node_id(pair.first()), self.node_id(pair.second()))
    }

    /// One line per node listing `destination (weight)` in adjacency order
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (node, edges) in self.nodes.iter().zip(&self.adjacency) {
            let _ = write!(out, "{} (head): ", node.id);
            for edge in edges {
                let _ = write!(out, "{} ({:?}), ", self.node_id(edge.to), edge.weight);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(ids: &[&str]) -> StopGraph {
        let mut graph = StopGraph::new();
        for id in ids {
            graph.add_node(Node::new(*id, 0.0, 0.0));
        }
        graph
    }

    #[test]
    fn add_node_is_idempotent() {
        let mut graph = StopGraph::new();
        let a = graph.add_node(Node::new("A", 1.0, 2.0));
        let again = graph.add_node(Node::new("A", 9.0, 9.0));

        assert_eq!(a, again);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.node(a).map(|n| n.lat), Some(1.0));
    }

    #[test]
    fn nodes_compare_by_id_only() {
        assert_eq!(Node::new("A", 1.0, 2.0), Node::new("A", 3.0, 4.0));
        assert_ne!(Node::new("A", 1.0, 2.0), Node::new("B", 1.0, 2.0));
    }

    #[test]
    fn add_edge_rejects_duplicates_and_unknown_nodes() {
        let mut graph = graph_with(&["A", "B"]);

        assert!(graph.add_edge(0, 1, 1.5));
        assert!(!graph.add_edge(0, 1, 7.0));
        assert!(!graph.add_edge(0, 5, 1.0));
        assert!(!graph.add_edge(5, 0, 1.0));

        assert_eq!(graph.edge_counter(), 1);
        assert_eq!(graph.edge_weight(0, 1), Some(1.5));
        assert!(!graph.has_edge(1, 0));
    }

    #[test]
    fn neighbors_keep_insertion_order_and_weighted_view_sorts() {
        let mut graph = graph_with(&["A", "B", "C", "D"]);
        graph.add_edge(0, 1, 3.0);
        graph.add_edge(0, 2, 1.0);
        graph.add_edge(0, 3, 1.0);

        assert_eq!(graph.neighbors(0).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(
            graph.neighbors_with_weights(0),
            vec![(2, 1.0), (3, 1.0), (1, 3.0)]
        );
    }

    #[test]
    fn delete_edge_restores_previous_adjacency() {
        let mut graph = graph_with(&["A", "B", "C"]);
        graph.add_edge(0, 2, 1.0);
        graph.add_edge(2, 0, 1.0);
        let before = graph.clone();

        graph.add_edge(0, 1, 2.0);
        graph.add_edge(1, 0, 2.0);
        let removed = graph.delete_edge(NodePair::new(1, 0));

        assert_eq!(removed, 2);
        assert_eq!(graph.outgoing_edges(0), before.outgoing_edges(0));
        assert_eq!(graph.outgoing_edges(1), before.outgoing_edges(1));
        assert_eq!(graph.edge_counter(), before.edge_counter());
    }

    #[test]
    fn delete_edge_counts_only_present_directions() {
        let mut graph = graph_with(&["A", "B"]);
        graph.add_edge(0, 1, 0.0);

        assert_eq!(graph.delete_edge(NodePair::new(0, 1)), 1);
        assert_eq!(graph.delete_edge(NodePair::new(0, 1)), 0);
        assert_eq!(graph.edge_counter(), 0);
    }

    #[test]
    fn node_pair_is_canonical() {
        assert_eq!(NodePair::new(3, 1), NodePair::new(1, 3));
        let pair = NodePair::new(3, 1);
        assert_eq!((pair.first(), pair.second()), (1, 3));
    }

    #[test]
    fn find_node_by_id_reports_missing_stops() {
        let graph = graph_with(&["A"]);
        assert_eq!(graph.find_node_by_id("A"), Some(0));
        assert_eq!(graph.find_node_by_id("Z"), None);
        assert_eq!(
            graph.node_by_id("Z"),
            Err(GraphError::NodeNotFound("Z".to_string()))
        );
    }

    #[test]
    fn path_weight_sums_hops() {
        let mut graph = graph_with(&["A", "B", "C"]);
        graph.add_edge(0, 1, 1.5);
        graph.add_edge(1, 2, 2.0);

        assert_eq!(graph.path_weight(&[0, 1, 2]), Some(3.5));
        assert_eq!(graph.path_weight(&[0]), Some(0.0));
        assert_eq!(graph.path_weight(&[0, 2]), None);
    }

    #[test]
    fn render_lists_edges_per_node() {
        let mut graph = graph_with(&["A", "B"]);
        graph.add_edge(0, 1, 0.5);
        graph.add_edge(1, 0, 0.5);

        assert_eq!(graph.render(), "A (head): B (0.5), \nB (head): A (0.5), \n");
    }

    #[test]
    fn render_keeps_the_decimal_point_on_whole_weights() {
        let mut graph = graph_with(&["A", "B"]);
        graph.add_edge(0, 1, 0.0);
        graph.add_edge(1, 0, 2.0);

        assert_eq!(graph.render(), "A (head): B (0.0), \nB (head): A (2.0), \n");
    }

    #[test]
    fn undirected_edge_count_merges_reciprocal_edges() {
        let mut graph = graph_with(&["A", "B", "C"]);
        graph.add_edge(0, 1, 0.0);
        graph.add_edge(1, 0, 0.0);
        assert_eq!(graph.edge_counter(), 2);
        assert_eq!(graph.undirected_edge_count(), 1);

        graph.add_edge(1, 2, 0.0);
        graph.add_edge(2, 2, 0.0);
        assert_eq!(graph.undirected_edge_count(), 2);
    }
}
