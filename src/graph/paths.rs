//! Single-source shortest paths: breadth-first (hop count) and Dijkstra (weighted)

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use serde::{Serialize, Deserialize};
use crate::error::{GraphError, GraphResult};
use crate::graph::{NodeIdx, StopGraph};

/// Single-source traversal over a graph snapshot
pub trait PathFinder {
    /// Compute reachability, predecessors and distances from `source`
    fn run(&self, graph: &StopGraph, source: NodeIdx) -> GraphResult<PathResult>;
}

/// Which path finder to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathStrategy {
    /// Hop count, via [`Bfs`]
    Unweighted,
    /// Cumulative edge weight, via [`Dijkstra`]
    Weighted,
}

impl PathStrategy {
    pub fn from_weighted(weighted: bool) -> Self {
        if weighted {
            PathStrategy::Weighted
        } else {
            PathStrategy::Unweighted
        }
    }

    pub fn finder(self) -> &'static dyn PathFinder {
        match self {
            PathStrategy::Unweighted => &Bfs,
            PathStrategy::Weighted => &Dijkstra,
        }
    }

    pub fn run(self, graph: &StopGraph, source: NodeIdx) -> GraphResult<PathResult> {
        self.finder().run(graph, source)
    }
}

/// Per-source snapshot of reachability, predecessors and distances
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    source: NodeIdx,
    reached: Vec<bool>,
    predecessor: Vec<Option<NodeIdx>>,
    distance: Vec<f64>,
}

impl PathResult {
    fn new(node_count: usize, source: NodeIdx) -> Self {
        let mut result = Self {
            source,
            reached: vec![false; node_count],
            predecessor: vec![None; node_count],
            distance: vec![f64::INFINITY; node_count],
        };
        result.reached[source as usize] = true;
        result.distance[source as usize] = 0.0;
        result
    }

    pub fn source(&self) -> NodeIdx {
        self.source
    }

    pub fn is_reached(&self, node: NodeIdx) -> bool {
        self.reached.get(node as usize).copied().unwrap_or(false)
    }

    /// Reached nodes in index order
    pub fn reached_nodes(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        self.reached
            .iter()
            .enumerate()
            .filter(|(_, &reached)| reached)
            .map(|(idx, _)| idx as NodeIdx)
    }

    pub fn predecessor(&self, node: NodeIdx) -> Option<NodeIdx> {
        self.predecessor.get(node as usize).copied().flatten()
    }

    /// Distance from the source, or `None` when `target` was not reached
    pub fn distance_to(&self, target: NodeIdx) -> Option<f64> {
        if self.is_reached(target) {
            Some(self.distance[target as usize])
        } else {
            None
        }
    }

    /// Path from the source to `target`, or `Ok(None)` when unreachable.
    ///
    /// A predecessor chain that is broken or longer than the node count is
    /// reported as `MalformedPredecessorChain`.
    pub fn path_to(&self, target: NodeIdx) -> GraphResult<Option<Vec<NodeIdx>>> {
        if !self.is_reached(target) {
            return Ok(None);
        }

        let malformed = GraphError::MalformedPredecessorChain { target };
        let mut path = vec![target];
        let mut node = target;

        while node != self.source {
            if path.len() > self.reached.len() {
                return Err(malformed);
            }
            node = match self.predecessor(node) {
                Some(prev) => prev,
                None => return Err(malformed),
            };
            path.push(node);
        }

        path.reverse();
        Ok(Some(path))
    }
}

fn check_source(graph: &StopGraph, source: NodeIdx) -> GraphResult<()> {
    if graph.contains(source) {
        Ok(())
    } else {
        Err(GraphError::UnknownNode(source))
    }
}

/// Breadth-first search: distance is the minimum number of hops.
///
/// Neighbors are expanded in insertion order from a FIFO queue; a node's
/// predecessor is whichever node discovered it first.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bfs;

impl PathFinder for Bfs {
    fn run(&self, graph: &StopGraph, source: NodeIdx) -> GraphResult<PathResult> {
        check_source(graph, source)?;

        let mut result = PathResult::new(graph.node_count(), source);
        let mut queue = VecDeque::new();
        queue.push_back(source);

        while let Some(node) = queue.pop_front() {
            let next_distance = result.distance[node as usize] + 1.0;
            for neighbor in graph.neighbors(node) {
                let n = neighbor as usize;
                if !result.reached[n] {
                    result.reached[n] = true;
                    result.predecessor[n] = Some(node);
                    result.distance[n] = next_distance;
                    queue.push_back(neighbor);
                }
            }
        }

        Ok(result)
    }
}

/// Dijkstra over cumulative edge weight. Weights must be non-negative.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dijkstra;

/// Min-heap entry: lowest distance first, then earliest push.
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    distance: f64,
    order: u64,
    node: NodeIdx,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the minimum
        other.distance
            .total_cmp(&self.distance)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PathFinder for Dijkstra {
    fn run(&self, graph: &StopGraph, source: NodeIdx) -> GraphResult<PathResult> {
        check_source(graph, source)?;

        let mut result = PathResult::new(graph.node_count(), source);
        let mut settled = vec![false; graph.node_count()];
        let mut heap = BinaryHeap::new();
        let mut order = 0u64;
        heap.push(FrontierEntry { distance: 0.0, order, node: source });

        while let Some(entry) = heap.pop() {
            let node = entry.node as usize;
            if settled[node] || entry.distance > result.distance[node] {
                continue; // Outdated entry
            }
            settled[node] = true;

            for (neighbor, weight) in graph.neighbors_with_weights(entry.node) {
                let n = neighbor as usize;
                if settled[n] {
                    continue;
                }
                let candidate = entry.distance + weight;
                if candidate < result.distance[n] {
                    result.reached[n] = true;
                    result.distance[n] = candidate;
                    result.predecessor[n] = Some(entry.node);
                    order += 1;
                    heap.push(FrontierEntry { distance: candidate, order, node: neighbor });
                }
            }
        }

        Ok(result)
    }
}
