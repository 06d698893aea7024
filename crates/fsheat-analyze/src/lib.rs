//! Temperature analysis for fsheat.
//!
//! This crate provides the analysis half of the pipeline:
//!
//! - **Path resolution** - walk a slash-separated path down the directory index
//! - **Classification** - bucket timestamps into hot, warm and cold by age
//! - **Traversal** - visit every inode under the resolved start once and
//!   aggregate per-directory summaries
//! - **Reporting** - fold all summaries into one subtree-wide report
//!
//! ```rust,ignore
//! use fsheat_analyze::{Classifier, TemperatureAnalyzer, normalize_path, resolve, split_path};
//! use fsheat_image::SnapshotLoader;
//!
//! let snapshot = SnapshotLoader::new().load_file("/tmp/fsimage.xml")?;
//! let segments = split_path("/user/hive/warehouse")?;
//! let start = resolve(snapshot.root, &segments, &snapshot)?;
//!
//! let analyzer = TemperatureAnalyzer::new(Classifier::new(now_millis));
//! let traversal = analyzer.traverse_with(&snapshot, start, &normalize_path(&segments), |visit| {
//!     println!("|-{}", visit.path);
//! })?;
//!
//! let report = traversal.report("/user/hive/warehouse")?;
//! println!("{} files, {} cold by access", report.files, report.a_cold_share);
//! ```

mod report;
mod resolve;
mod summary;
mod temperature;
mod traverse;

pub use report::{TemperatureReport, build_report};
pub use resolve::{normalize_path, resolve, resolve_path, split_path};
pub use summary::{DirectorySummary, Rounded};
pub use temperature::{Classifier, classify};
pub use traverse::{DirectoryVisit, TemperatureAnalyzer, Traversal, TraversalStats};

// Re-export core types
pub use fsheat_core::{HeatError, InodeId, Snapshot, Temperature, TimestampKind};
