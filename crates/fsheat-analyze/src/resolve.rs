//! Path resolution against the directory index.

use tracing::debug;

use fsheat_core::{HeatError, InodeId, Result, Snapshot};

/// Split a slash-delimited path into its segments.
///
/// Empty segments are discarded. A path with no segments left (the
/// namespace root) is rejected.
pub fn split_path(path: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Err(HeatError::invalid_path(path));
    }
    Ok(segments)
}

/// Canonical `/a/b` form of a segment list.
pub fn normalize_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut path = String::new();
    for segment in segments {
        path.push('/');
        path.push_str(segment.as_ref());
    }
    path
}

/// Walk `segments` down from `root`, one child-name lookup per segment.
///
/// The first child whose name matches wins. The target may be a file or
/// a directory.
pub fn resolve<S: AsRef<str>>(
    root: InodeId,
    segments: &[S],
    snapshot: &Snapshot,
) -> Result<InodeId> {
    if segments.is_empty() {
        return Err(HeatError::invalid_path("/"));
    }

    let mut current = root;
    for segment in segments {
        let segment = segment.as_ref();
        let mut found = None;
        for &child_id in snapshot.children(current) {
            let child = snapshot.child(current, child_id)?;
            if child.name.as_str() == segment {
                found = Some(child_id);
                break;
            }
        }

        match found {
            Some(id) => {
                debug!(segment, inode = %id, "resolved path segment");
                current = id;
            }
            None => return Err(HeatError::not_found(normalize_path(segments))),
        }
    }

    Ok(current)
}

/// Split and resolve a path from the snapshot's root.
pub fn resolve_path(path: &str, snapshot: &Snapshot) -> Result<InodeId> {
    let segments = split_path(path)?;
    resolve(snapshot.root, &segments, snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsheat_core::{DirectoryIndex, Inode, InodeTable};

    fn snapshot() -> Snapshot {
        let mut inodes = InodeTable::new();
        inodes.insert(Inode::new_directory(InodeId::new(1), "", 0)).unwrap();
        inodes.insert(Inode::new_directory(InodeId::new(2), "user", 0)).unwrap();
        inodes.insert(Inode::new_directory(InodeId::new(3), "hive", 0)).unwrap();
        inodes.insert(Inode::new_file(InodeId::new(4), "log.txt", 0, 0, 1)).unwrap();
        let mut directories = DirectoryIndex::new();
        directories.insert(InodeId::new(1), vec![InodeId::new(2)]).unwrap();
        directories
            .insert(InodeId::new(2), vec![InodeId::new(4), InodeId::new(3)])
            .unwrap();
        Snapshot::new(InodeId::new(1), inodes, directories).unwrap()
    }

    #[test]
    fn test_split_discards_empty_segments() {
        assert_eq!(split_path("/user//hive/").unwrap(), vec!["user", "hive"]);
        assert_eq!(split_path("user").unwrap(), vec!["user"]);
    }

    #[test]
    fn test_split_rejects_root() {
        for path in ["", "/", "///"] {
            let err = split_path(path).unwrap_err();
            assert!(matches!(err, HeatError::InvalidPath { .. }), "{path:?}");
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_path(&["user", "hive"]), "/user/hive");
    }

    #[test]
    fn test_resolve_directory_and_file() {
        let snapshot = snapshot();
        assert_eq!(resolve_path("/user/hive", &snapshot).unwrap(), InodeId::new(3));
        assert_eq!(resolve_path("/user/log.txt", &snapshot).unwrap(), InodeId::new(4));
    }

    #[test]
    fn test_resolve_empty_segments_is_invalid() {
        let snapshot = snapshot();
        let none: [&str; 0] = [];
        let err = resolve(snapshot.root, &none, &snapshot).unwrap_err();
        assert!(matches!(err, HeatError::InvalidPath { .. }));
    }

    #[test]
    fn test_missing_intermediate_segment_reports_full_path() {
        let snapshot = snapshot();
        let err = resolve_path("/usr/hive", &snapshot).unwrap_err();
        match err {
            HeatError::PathNotFound { path } => assert_eq!(path, "/usr/hive"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cannot_descend_through_file() {
        let snapshot = snapshot();
        let err = resolve_path("/user/log.txt/x", &snapshot).unwrap_err();
        assert!(matches!(err, HeatError::PathNotFound { .. }));
    }
}
