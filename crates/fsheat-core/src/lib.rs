//! Core types for fsheat.
//!
//! This crate provides the data model shared by the loader and the
//! analyzer: inodes, the id-keyed snapshot tables, temperature buckets,
//! configuration and errors.

mod config;
mod error;
mod node;
mod snapshot;
mod temperature;

pub use config::{
    AnalyzeConfig, AnalyzeConfigBuilder, TemperatureThresholds, TemperatureThresholdsBuilder,
    TemperatureThresholdsBuilderError,
};
pub use error::{HeatError, Result};
pub use node::{Inode, InodeId, InodeKind};
pub use snapshot::{DirectoryIndex, InodeTable, Snapshot, SnapshotStats};
pub use temperature::{COLD_MS, HOT_MS, ONE_DAY_MS, Temperature, TimestampKind, WARM_MS};
