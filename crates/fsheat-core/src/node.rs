//! Inode types parsed from a namespace snapshot.

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Identifier of an inode within a snapshot.
///
/// fsimage ids are allocated by the NameNode and are only used as a join
/// key between the inode table and the directory index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InodeId(pub u64);

impl InodeId {
    /// Create a new InodeId from a u64.
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for InodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type of namespace entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InodeKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink {
        /// Link target path.
        target: CompactString,
    },
}

impl InodeKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, InodeKind::Directory)
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, InodeKind::File)
    }

    /// Check if this is a symlink.
    pub fn is_symlink(&self) -> bool {
        matches!(self, InodeKind::Symlink { .. })
    }

    /// The type name used by fsimage dumps.
    pub fn as_str(&self) -> &'static str {
        match self {
            InodeKind::File => "FILE",
            InodeKind::Directory => "DIRECTORY",
            InodeKind::Symlink { .. } => "SYMLINK",
        }
    }
}

/// A single file, directory or symlink in the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inode {
    /// Unique identifier for this inode.
    pub id: InodeId,

    /// Own name (not full path). Empty for the namespace root.
    pub name: CompactString,

    /// Entry type.
    pub kind: InodeKind,

    /// Modification time in epoch milliseconds.
    pub modified: i64,

    /// Access time in epoch milliseconds. Only files carry one.
    pub accessed: Option<i64>,

    /// Sum of block sizes in bytes. Zero for directories and symlinks.
    pub size: u64,
}

impl Inode {
    /// Create a new file inode.
    pub fn new_file(
        id: InodeId,
        name: impl Into<CompactString>,
        modified: i64,
        accessed: i64,
        size: u64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind: InodeKind::File,
            modified,
            accessed: Some(accessed),
            size,
        }
    }

    /// Create a new directory inode.
    pub fn new_directory(id: InodeId, name: impl Into<CompactString>, modified: i64) -> Self {
        Self {
            id,
            name: name.into(),
            kind: InodeKind::Directory,
            modified,
            accessed: None,
            size: 0,
        }
    }

    /// Create a new symlink inode.
    pub fn new_symlink(
        id: InodeId,
        name: impl Into<CompactString>,
        target: impl Into<CompactString>,
        modified: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind: InodeKind::Symlink {
                target: target.into(),
            },
            modified,
            accessed: None,
            size: 0,
        }
    }

    /// Check if this inode is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this inode is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }
}
