//! Error types for loading and analyzing snapshots.

use std::path::PathBuf;

use thiserror::Error;

use crate::node::InodeId;

/// Errors that can occur while loading or analyzing a snapshot.
///
/// Every variant is terminal for the current run.
#[derive(Debug, Error)]
pub enum HeatError {
    /// The snapshot is structurally invalid.
    #[error("Malformed snapshot: {message}")]
    MalformedSnapshot { message: String },

    /// Reading the snapshot failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The requested path is empty or the namespace root.
    #[error("Invalid path: {path:?} (analyzing the root path is not supported)")]
    InvalidPath { path: String },

    /// A path segment has no matching child.
    #[error("{path}: No such file or directory")]
    PathNotFound { path: String },

    /// A child reference points at an inode missing from the table.
    #[error("Inconsistent snapshot: {message}")]
    InconsistentSnapshot { message: String },

    /// No files were found in the requested subtree.
    #[error("No files found under {path}")]
    EmptyResult { path: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl HeatError {
    /// Create a malformed-snapshot error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedSnapshot {
            message: message.into(),
        }
    }

    /// Create a malformed-snapshot error for a field of a specific inode.
    pub fn malformed_field(
        id: impl std::fmt::Display,
        field: &str,
        detail: impl std::fmt::Display,
    ) -> Self {
        Self::MalformedSnapshot {
            message: format!("inode {id}: field `{field}` {detail}"),
        }
    }

    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// A child id listed under `parent` that the inode table does not contain.
    pub fn dangling_child(id: InodeId, parent: InodeId) -> Self {
        Self::InconsistentSnapshot {
            message: format!("inode {id} listed as child of {parent} but missing from inode table"),
        }
    }

    /// An inode reached a second time during traversal.
    pub fn revisited(id: InodeId, path: &str) -> Self {
        Self::InconsistentSnapshot {
            message: format!("inode {id} reached twice (again under {path})"),
        }
    }

    /// Create a path-not-found error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::PathNotFound { path: path.into() }
    }

    /// Create an invalid-path error.
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath { path: path.into() }
    }
}

/// Result alias used across fsheat crates.
pub type Result<T, E = HeatError> = std::result::Result<T, E>;
