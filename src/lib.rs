//! Core library functions for the stop network analyzer

pub mod config;
pub mod error;
pub mod data;
pub mod graph;
pub mod cluster;
pub mod storage;
pub mod viz;

pub use anyhow::{Result, anyhow};
pub use error::{GraphError, GraphResult};
