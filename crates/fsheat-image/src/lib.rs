//! Snapshot loading for fsheat.
//!
//! This crate turns an HDFS namespace image, dumped to XML by
//! `hdfs oiv -p XML`, into the id-keyed tables of [`Snapshot`].
//!
//! # Overview
//!
//! Loading happens in two steps:
//!
//! - **Parsing** streams the XML dump into a [`SnapshotDocument`],
//!   keeping only the inode and directory sections
//! - **Indexing** validates every entry and builds the inode table and
//!   the directory index
//!
//! Callers with their own converter can build a [`SnapshotDocument`]
//! directly and skip the XML step.
//!
//! # Example
//!
//! ```rust,no_run
//! use fsheat_image::SnapshotLoader;
//!
//! let loader = SnapshotLoader::new();
//! let snapshot = loader.load_file("/tmp/fsimage_0000000000000001234.xml").unwrap();
//!
//! println!("Root inode: {}", snapshot.root);
//! println!("Total files: {}", snapshot.stats.total_files);
//! ```
//!
//! # Progress Monitoring
//!
//! ```rust,no_run
//! use fsheat_image::SnapshotLoader;
//!
//! let loader = SnapshotLoader::new();
//! let mut progress_rx = loader.subscribe();
//!
//! std::thread::spawn(move || {
//!     while let Ok(progress) = progress_rx.blocking_recv() {
//!         println!("Indexed {} inodes", progress.inodes_loaded);
//!     }
//! });
//! ```

mod document;
mod loader;
mod progress;
mod xml;

pub use document::{BlockEntry, DirectoryEntry, InodeEntry, SnapshotDocument};
pub use loader::SnapshotLoader;
pub use progress::LoadProgress;
pub use xml::{read_xml, read_xml_file, read_xml_str};

// Re-export core types for convenience
pub use fsheat_core::{
    DirectoryIndex, HeatError, Inode, InodeId, InodeKind, InodeTable, Snapshot, SnapshotStats,
};
