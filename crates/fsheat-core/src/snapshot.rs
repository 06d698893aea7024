//! Snapshot container: inode table, directory index and statistics.
//!
//! The namespace is kept as two id-keyed tables rather than a tree of
//! nodes. Parent→child order is reconstructed on demand from the
//! directory index.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::{Deserialize, Serialize};

use crate::error::{HeatError, Result};
use crate::node::{Inode, InodeId, InodeKind};

/// All inodes of a snapshot, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct InodeTable {
    inodes: HashMap<InodeId, Inode>,
}

impl InodeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with room for `capacity` inodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inodes: HashMap::with_capacity(capacity),
        }
    }

    /// Insert an inode. A second inode with the same id is rejected.
    pub fn insert(&mut self, inode: Inode) -> Result<()> {
        match self.inodes.entry(inode.id) {
            Entry::Occupied(_) => Err(HeatError::malformed(format!(
                "duplicate inode id {}",
                inode.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(inode);
                Ok(())
            }
        }
    }

    /// Look up an inode.
    pub fn get(&self, id: InodeId) -> Option<&Inode> {
        self.inodes.get(&id)
    }

    /// Check whether an id is present.
    pub fn contains(&self, id: InodeId) -> bool {
        self.inodes.contains_key(&id)
    }

    /// Number of inodes.
    pub fn len(&self) -> usize {
        self.inodes.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.inodes.is_empty()
    }

    /// Iterate over all inodes in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Inode> {
        self.inodes.values()
    }
}

/// Parent id → ordered child ids.
///
/// Directories without children may be absent; [`DirectoryIndex::children`]
/// returns an empty slice for them.
#[derive(Debug, Clone, Default)]
pub struct DirectoryIndex {
    entries: HashMap<InodeId, Vec<InodeId>>,
}

impl DirectoryIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the children of `parent`, in snapshot order.
    pub fn insert(&mut self, parent: InodeId, children: Vec<InodeId>) -> Result<()> {
        match self.entries.entry(parent) {
            Entry::Occupied(_) => Err(HeatError::malformed(format!(
                "duplicate directory entry for parent {parent}"
            ))),
            Entry::Vacant(slot) => {
                slot.insert(children);
                Ok(())
            }
        }
    }

    /// Children of a directory. Empty if it has no entry.
    pub fn children(&self, parent: InodeId) -> &[InodeId] {
        self.entries.get(&parent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check whether `parent` has an entry.
    pub fn contains(&self, parent: InodeId) -> bool {
        self.entries.contains_key(&parent)
    }

    /// Number of directory entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Counts gathered over a loaded snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotStats {
    /// Total number of inodes.
    pub total_inodes: u64,
    /// Number of file inodes.
    pub total_files: u64,
    /// Number of directory inodes.
    pub total_dirs: u64,
    /// Number of symlink inodes.
    pub total_symlinks: u64,
    /// Number of directory index entries.
    pub directory_entries: u64,
    /// Sum of file sizes.
    pub total_size: u64,
}

impl SnapshotStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update stats with one inode.
    pub fn record_inode(&mut self, inode: &Inode) {
        self.total_inodes += 1;
        match inode.kind {
            InodeKind::File => {
                self.total_files += 1;
                self.total_size += inode.size;
            }
            InodeKind::Directory => self.total_dirs += 1,
            InodeKind::Symlink { .. } => self.total_symlinks += 1,
        }
    }
}

/// A loaded, read-only namespace snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Id of the namespace root (the first inode listed).
    pub root: InodeId,

    /// Inode table.
    pub inodes: InodeTable,

    /// Directory index.
    pub directories: DirectoryIndex,

    /// Summary statistics.
    pub stats: SnapshotStats,
}

impl Snapshot {
    /// Assemble a snapshot from its tables. The root must be in the table.
    pub fn new(root: InodeId, inodes: InodeTable, directories: DirectoryIndex) -> Result<Self> {
        if !inodes.contains(root) {
            return Err(HeatError::malformed(format!(
                "root inode {root} is not in the inode table"
            )));
        }

        let mut stats = SnapshotStats::new();
        for inode in inodes.iter() {
            stats.record_inode(inode);
        }
        stats.directory_entries = directories.len() as u64;

        Ok(Self {
            root,
            inodes,
            directories,
            stats,
        })
    }

    /// Look up an inode.
    pub fn inode(&self, id: InodeId) -> Option<&Inode> {
        self.inodes.get(id)
    }

    /// Children of a directory, in snapshot order.
    pub fn children(&self, parent: InodeId) -> &[InodeId] {
        self.directories.children(parent)
    }

    /// Look up a child inode listed under `parent`.
    ///
    /// A listed id missing from the table breaks referential integrity.
    pub fn child(&self, parent: InodeId, id: InodeId) -> Result<&Inode> {
        self.inodes
            .get(id)
            .ok_or_else(|| HeatError::dangling_child(id, parent))
    }
}
