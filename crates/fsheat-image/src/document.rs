//! Raw snapshot document, as produced by a converter.
//!
//! Fields are kept as the text found in the dump; validation and numeric
//! parsing happen in the loader so every converter gets the same checks.

use serde::{Deserialize, Serialize};

/// One `<inode>` of the inode section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InodeEntry {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    pub mtime: Option<String>,
    pub atime: Option<String>,
    /// Link target, present on `SYMLINK` inodes.
    pub symlink: Option<String>,
    #[serde(default)]
    pub blocks: Vec<BlockEntry>,
}

/// One `<block>` of a file inode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEntry {
    #[serde(rename = "numBytes")]
    pub num_bytes: Option<String>,
}

/// One `<directory>` of the directory section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub parent: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
}

/// The two collections the loader consumes, in snapshot order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub inodes: Vec<InodeEntry>,
    pub directories: Vec<DirectoryEntry>,
}

impl InodeEntry {
    /// Entry for a directory.
    pub fn directory(id: u64, name: &str, mtime: i64) -> Self {
        Self {
            id: Some(id.to_string()),
            kind: Some("DIRECTORY".to_string()),
            name: Some(name.to_string()),
            mtime: Some(mtime.to_string()),
            ..Self::default()
        }
    }

    /// Entry for a file stored in blocks of the given sizes.
    pub fn file(id: u64, name: &str, mtime: i64, atime: i64, block_sizes: &[u64]) -> Self {
        Self {
            id: Some(id.to_string()),
            kind: Some("FILE".to_string()),
            name: Some(name.to_string()),
            mtime: Some(mtime.to_string()),
            atime: Some(atime.to_string()),
            blocks: block_sizes
                .iter()
                .map(|size| BlockEntry {
                    num_bytes: Some(size.to_string()),
                })
                .collect(),
            ..Self::default()
        }
    }
}

impl DirectoryEntry {
    /// Entry listing `children` under `parent`.
    pub fn new(parent: u64, children: &[u64]) -> Self {
        Self {
            parent: Some(parent.to_string()),
            children: children.iter().map(u64::to_string).collect(),
        }
    }
}
