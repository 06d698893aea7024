//! Builds the inode table and directory index from a snapshot document.

use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

use compact_str::CompactString;
use tokio::sync::broadcast;
use tracing::{info, trace};

use fsheat_core::{DirectoryIndex, HeatError, Inode, InodeId, InodeTable, Result, Snapshot};

use crate::document::{DirectoryEntry, InodeEntry, SnapshotDocument};
use crate::progress::{LoadProgress, ProgressTracker};
use crate::xml;

/// Entries between two progress updates.
const PROGRESS_INTERVAL: u64 = 10_000;

/// Loads namespace snapshots into id-keyed tables.
pub struct SnapshotLoader {
    progress_tx: broadcast::Sender<LoadProgress>,
}

impl SnapshotLoader {
    /// Create a new loader.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self { progress_tx }
    }

    /// Subscribe to load progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<LoadProgress> {
        self.progress_tx.subscribe()
    }

    /// Parse and load an `oiv` XML dump from a file.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Snapshot> {
        let path = path.as_ref();
        info!("Parsing {} ...", path.display());
        let document = xml::read_xml_file(path)?;
        self.load_document(document)
    }

    /// Parse and load an `oiv` XML dump from a reader.
    pub fn load_xml<R: BufRead>(&self, source: R) -> Result<Snapshot> {
        let document = xml::read_xml(source)?;
        self.load_document(document)
    }

    /// Build the snapshot tables from an already parsed document.
    ///
    /// The first inode is the namespace root. Any invalid entry aborts
    /// the whole load.
    pub fn load_document(&self, document: SnapshotDocument) -> Result<Snapshot> {
        let SnapshotDocument {
            inodes: inode_entries,
            directories: directory_entries,
        } = document;

        let mut tracker = ProgressTracker::new(inode_entries.len(), directory_entries.len());
        let mut inodes = InodeTable::with_capacity(inode_entries.len());
        let mut directories = DirectoryIndex::new();
        let mut root = None;

        for entry in &inode_entries {
            let inode = parse_inode(entry)?;
            root.get_or_insert(inode.id);
            inodes.insert(inode)?;
            tracker.record_inode();
            self.maybe_report(&tracker);
        }

        let root = root.ok_or_else(|| HeatError::malformed("snapshot contains no inodes"))?;

        for entry in &directory_entries {
            let (parent, children) = parse_directory(entry)?;
            directories.insert(parent, children)?;
            tracker.record_directory();
            self.maybe_report(&tracker);
        }

        let _ = self.progress_tx.send(tracker.snapshot());

        let snapshot = Snapshot::new(root, inodes, directories)?;
        info!("Total number of inodes: {}.", snapshot.stats.total_inodes);
        info!(
            "{} directories, {} files, {} symlinks.",
            snapshot.stats.total_dirs, snapshot.stats.total_files, snapshot.stats.total_symlinks
        );
        info!("Root inode id: {}", snapshot.root);

        Ok(snapshot)
    }

    fn maybe_report(&self, tracker: &ProgressTracker) {
        if tracker.processed() % PROGRESS_INTERVAL == 0 {
            let progress = tracker.snapshot();
            trace!(
                inodes = progress.inodes_loaded,
                directories = progress.directories_loaded,
                "indexing snapshot"
            );
            let _ = self.progress_tx.send(progress);
        }
    }
}

impl Default for SnapshotLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a required numeric field of an inode entry.
fn required<T: FromStr>(owner: &str, field: &str, value: Option<&str>) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    let text = value.ok_or_else(|| HeatError::malformed_field(owner, field, "is missing"))?;
    text.trim()
        .parse()
        .map_err(|e| HeatError::malformed_field(owner, field, format!("{text:?}: {e}")))
}

fn parse_inode(entry: &InodeEntry) -> Result<Inode> {
    let raw_id = entry.id.as_deref().unwrap_or("?");
    let id = InodeId::new(required(raw_id, "id", entry.id.as_deref())?);
    let owner = id.to_string();

    let kind = entry
        .kind
        .as_deref()
        .ok_or_else(|| HeatError::malformed_field(&owner, "type", "is missing"))?;
    let name = CompactString::from(entry.name.as_deref().unwrap_or_default());
    let modified: i64 = required(&owner, "mtime", entry.mtime.as_deref())?;

    match kind.trim() {
        "FILE" => {
            let accessed: i64 = required(&owner, "atime", entry.atime.as_deref())?;
            let mut size: u64 = 0;
            for block in &entry.blocks {
                let bytes: u64 = required(&owner, "numBytes", block.num_bytes.as_deref())?;
                size = size.checked_add(bytes).ok_or_else(|| {
                    HeatError::malformed_field(&owner, "numBytes", "overflows total file size")
                })?;
            }
            Ok(Inode::new_file(id, name, modified, accessed, size))
        }
        "DIRECTORY" => Ok(Inode::new_directory(id, name, modified)),
        "SYMLINK" => Ok(Inode::new_symlink(
            id,
            name,
            entry.symlink.as_deref().unwrap_or_default(),
            modified,
        )),
        other => Err(HeatError::malformed_field(
            &owner,
            "type",
            format!("has unknown value {other:?}"),
        )),
    }
}

fn parse_directory(entry: &DirectoryEntry) -> Result<(InodeId, Vec<InodeId>)> {
    let raw_parent = entry.parent.as_deref().unwrap_or("?");
    let parent = InodeId::new(required(raw_parent, "parent", entry.parent.as_deref())?);
    let owner = format!("directory {parent}");

    let children = entry
        .children
        .iter()
        .map(|child| required(&owner, "child", Some(child.as_str())).map(InodeId::new))
        .collect::<Result<Vec<_>>>()?;

    Ok((parent, children))
}
