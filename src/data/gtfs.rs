//! GTFS feed loading for stop graphs

use std::path::Path;
use std::sync::Arc;
use anyhow::{Context, Result};
use polars::prelude::*;
use crate::graph::builder::GraphBuilder;
use crate::graph::{Node, StopGraph};
use log;

/// File listing stops with their coordinates
pub const STOPS_FILE: &str = "stops.txt";

/// File listing the ordered stops of every trip
pub const STOP_TIMES_FILE: &str = "stop_times.txt";

/// Load a stop graph from the GTFS feed in `feed_dir`.
///
/// Consecutive stops of a trip are linked in both directions; when
/// `weighted` is set the edge weight is the coordinate distance between the
/// stops, otherwise 0.
pub fn load_feed(feed_dir: impl AsRef<Path>, weighted: bool) -> Result<StopGraph> {
    read_feed(feed_dir)?.build(weighted)
}

/// Read a GTFS feed into a [`GraphBuilder`] without linking it yet.
///
/// Reads `stop_id`, `stop_lat`, `stop_lon` from `stops.txt` and `trip_id`,
/// `stop_id`, `stop_sequence` from `stop_times.txt`. Ids are read as text,
/// so zero-padded numeric ids keep their padding.
pub fn read_feed(feed_dir: impl AsRef<Path>) -> Result<GraphBuilder> {
    let feed_dir = feed_dir.as_ref();
    log::info!("Reading GTFS feed from {}", feed_dir.display());

    let stops = read_csv(
        &feed_dir.join(STOPS_FILE),
        &["stop_id"],
        [
            col("stop_id"),
            col("stop_lat").cast(DataType::Float64),
            col("stop_lon").cast(DataType::Float64),
        ],
    )?;

    let stop_times = read_csv(
        &feed_dir.join(STOP_TIMES_FILE),
        &["trip_id", "stop_id"],
        [
            col("trip_id"),
            col("stop_id"),
            col("stop_sequence").cast(DataType::Int64),
        ],
    )?;

    log::info!(
        "Loaded {} stops and {} stop times",
        stops.height(),
        stop_times.height()
    );

    let mut builder = GraphBuilder::with_capacity(stops.height(), stop_times.height());

    let stop_ids = stops.column("stop_id")?.str()?;
    let lats = stops.column("stop_lat")?.f64()?;
    let lons = stops.column("stop_lon")?.f64()?;

    for i in 0..stops.height() {
        match (stop_ids.get(i), lats.get(i), lons.get(i)) {
            (Some(id), Some(lat), Some(lon)) => {
                builder.add_stop(Node::new(id.trim(), lat, lon));
            }
            _ => log::warn!("Skipping incomplete stop row {}", i + 1),
        }
    }

    let trip_ids = stop_times.column("trip_id")?.str()?;
    let time_stop_ids = stop_times.column("stop_id")?.str()?;
    let sequences = stop_times.column("stop_sequence")?.i64()?;

    for i in 0..stop_times.height() {
        match (trip_ids.get(i), sequences.get(i), time_stop_ids.get(i)) {
            (Some(trip), Some(sequence), Some(stop)) => {
                builder.add_stop_time(trip.trim(), sequence, stop.trim());
            }
            _ => log::warn!("Skipping incomplete stop time row {}", i + 1),
        }
    }

    Ok(builder)
}

/// Read selected columns of a headed CSV file, forcing `text_columns` to strings
fn read_csv<E: AsRef<[Expr]>>(path: &Path, text_columns: &[&str], columns: E) -> Result<DataFrame> {
    if !path.exists() {
        return Err(anyhow::anyhow!("File not found: {}", path.display()));
    }

    let text_schema = Schema::from_iter(
        text_columns
            .iter()
            .map(|&name| Field::new(name.into(), DataType::String)),
    );

    LazyCsvReader::new(path)
        .with_has_header(true)
        .with_dtype_overwrite(Some(Arc::new(text_schema)))
        .finish()
        .with_context(|| format!("failed to open {}", path.display()))?
        .select(columns)
        .collect()
        .with_context(|| format!("failed to read columns from {}", path.display()))
}
