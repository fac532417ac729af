//! Graph algorithms for analysis

use std::collections::HashMap;
use itertools::Itertools;
use serde::Serialize;
use crate::error::GraphResult;
use crate::graph::{NodeIdx, NodePair, PathResult, PathStrategy, StopGraph};

/// Edge betweenness counts, ranked from highest to lowest.
///
/// Ties keep the order in which edges were first seen while enumerating the
/// graph (node insertion order, then adjacency order).
#[derive(Debug, Clone, Default, Serialize)]
pub struct EdgeBetweenness {
    ranked: Vec<(NodePair, u32)>,

    #[serde(skip)]
    positions: HashMap<NodePair, usize>,
}

impl EdgeBetweenness {
    /// All edges with their counts, highest first
    pub fn ranked(&self) -> &[(NodePair, u32)] {
        &self.ranked
    }

    /// The edge with the highest count
    pub fn highest(&self) -> Option<(NodePair, u32)> {
        self.ranked.first().copied()
    }

    pub fn get(&self, pair: NodePair) -> Option<u32> {
        self.positions.get(&pair).map(|&pos| self.ranked[pos].1)
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.ranked.iter().map(|&(_, count)| count as u64).sum()
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Count, for every edge, how many pairwise shortest paths cross it.
///
/// Every unordered pair of distinct nodes contributes its one shortest path
/// (taken from the lower-indexed node). Edges no path uses are reported with
/// a count of 0. The finder runs once per source node.
pub fn edge_betweenness(graph: &StopGraph, strategy: PathStrategy) -> GraphResult<EdgeBetweenness> {
    log::debug!(
        "Computing edge betweenness over {} nodes ({:?})",
        graph.node_count(),
        strategy
    );

    // Seed every stored edge so unused ones are reported and ties stay stable
    let mut counts: Vec<(NodePair, u32)> = Vec::with_capacity(graph.edge_count());
    let mut positions: HashMap<NodePair, usize> = HashMap::with_capacity(graph.edge_count());
    for (from, edge) in graph.edges() {
        if from == edge.to {
            continue;
        }
        let pair = NodePair::new(from, edge.to);
        positions.entry(pair).or_insert_with(|| {
            counts.push((pair, 0));
            counts.len() - 1
        });
    }

    let mut current: Option<PathResult> = None;
    for (source, target) in graph.node_indices().tuple_combinations::<(NodeIdx, NodeIdx)>() {
        if current.as_ref().map_or(true, |result| result.source() != source) {
            current = Some(strategy.run(graph, source)?);
        }
        let Some(result) = current.as_ref() else {
            continue;
        };

        let Some(path) = result.path_to(target)? else {
            continue;
        };

        for hop in path.windows(2) {
            let pair = NodePair::new(hop[0], hop[1]);
            let pos = *positions.entry(pair).or_insert_with(|| {
                counts.push((pair, 0));
                counts.len() - 1
            });
            counts[pos].1 += 1;
        }
    }

    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    let positions = counts
        .iter()
        .enumerate()
        .map(|(pos, &(pair, _))| (pair, pos))
        .collect();

    Ok(EdgeBetweenness { ranked: counts, positions })
}
