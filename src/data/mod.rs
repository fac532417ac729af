//! Input data loading

pub mod gtfs;

pub use gtfs::{load_feed, read_feed};
