//! Graph representation and algorithms module

pub mod network;
pub mod builder;
pub mod paths;
pub mod algorithms;

pub use network::{Edge, Node, NodeIdx, NodePair, StopGraph};
pub use paths::{Bfs, Dijkstra, PathFinder, PathResult, PathStrategy};
pub use algorithms::{edge_betweenness, EdgeBetweenness};
