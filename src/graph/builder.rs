//! Graph construction module

use std::collections::HashSet;
use anyhow::Result;
use crate::graph::{Node, StopGraph};

/// Straight-line distance between two stops in coordinate space
pub fn stop_distance(from: &Node, to: &Node) -> f64 {
    let dx = to.lon - from.lon;
    let dy = to.lat - from.lat;
    (dx * dx + dy * dy).sqrt()
}

/// One row of a trip's stop sequence
#[derive(Debug, Clone, PartialEq)]
pub struct StopTime {
    pub trip_id: String,
    pub stop_sequence: i64,
    pub stop_id: String,
}

/// Builder for a StopGraph from stops and trip stop sequences
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    /// Stops in registration order
    stops: Vec<Node>,

    /// Ids already registered
    stop_ids: HashSet<String>,

    /// Raw stop times, in any order
    stop_times: Vec<StopTime>,
}

impl GraphBuilder {
    /// Create a new graph builder with the given capacity
    pub fn with_capacity(stop_capacity: usize, stop_time_capacity: usize) -> Self {
        Self {
            stops: Vec::with_capacity(stop_capacity),
            stop_ids: HashSet::with_capacity(stop_capacity),
            stop_times: Vec::with_capacity(stop_time_capacity),
        }
    }

    /// Register a stop; repeated ids keep the first registration
    pub fn add_stop(&mut self, stop: Node) {
        if self.stop_ids.insert(stop.id.clone()) {
            self.stops.push(stop);
        }
    }

    /// Record that `stop_id` is visited at position `stop_sequence` of `trip_id`
    pub fn add_stop_time(&mut self, trip_id: &str, stop_sequence: i64, stop_id: &str) {
        self.stop_times.push(StopTime {
            trip_id: trip_id.to_string(),
            stop_sequence,
            stop_id: stop_id.to_string(),
        });
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Build the graph.
    ///
    /// Stop times are grouped by trip and ordered by sequence; each pair of
    /// consecutive stops becomes a reciprocal edge pair. Edge weights are the
    /// stop distance when `weighted`, 0 otherwise.
    pub fn build(mut self, weighted: bool) -> Result<StopGraph> {
        let mut graph = StopGraph::with_capacity(self.stops.len());
        for stop in self.stops {
            graph.add_node(stop);
        }

        self.stop_times.sort_by(|a, b| {
            a.trip_id
                .cmp(&b.trip_id)
                .then(a.stop_sequence.cmp(&b.stop_sequence))
        });

        let mut unknown_stops: HashSet<&str> = HashSet::new();
        let mut links = 0usize;

        for window in self.stop_times.windows(2) {
            let (current, next) = (&window[0], &window[1]);
            if current.trip_id != next.trip_id || current.stop_id == next.stop_id {
                continue;
            }

            let (from, to) = match (
                graph.find_node_by_id(&current.stop_id),
                graph.find_node_by_id(&next.stop_id),
            ) {
                (Some(from), Some(to)) => (from, to),
                (from, _) => {
                    let missing = if from.is_none() { &current.stop_id } else { &next.stop_id };
                    if unknown_stops.insert(missing.as_str()) {
                        log::warn!("Trip {} references unknown stop {}", current.trip_id, missing);
                    }
                    continue;
                }
            };

            let weight = match (weighted, graph.node(from), graph.node(to)) {
                (true, Some(a), Some(b)) => stop_distance(a, b),
                _ => 0.0,
            };

            graph.add_edge(from, to, weight);
            graph.add_edge(to, from, weight);
            links += 1;
        }

        log::info!(
            "Built stop graph with {} nodes and {} directed edges from {} trip links",
            graph.node_count(),
            graph.edge_count(),
            links
        );

        Ok(graph)
    }
}
