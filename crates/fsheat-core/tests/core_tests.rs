use fsheat_core::{
    AnalyzeConfig, DirectoryIndex, HeatError, Inode, InodeId, InodeKind, InodeTable, Snapshot,
    Temperature, TemperatureThresholds,
};

fn small_snapshot() -> Snapshot {
    let mut inodes = InodeTable::new();
    inodes.insert(Inode::new_directory(InodeId::new(16385), "", 0)).unwrap();
    inodes.insert(Inode::new_directory(InodeId::new(16386), "user", 0)).unwrap();
    inodes
        .insert(Inode::new_file(InodeId::new(16387), "data.csv", 0, 0, 4096))
        .unwrap();
    inodes
        .insert(Inode::new_symlink(InodeId::new(16388), "current", "/user", 0))
        .unwrap();

    let mut directories = DirectoryIndex::new();
    directories
        .insert(InodeId::new(16385), vec![InodeId::new(16386), InodeId::new(16388)])
        .unwrap();
    directories
        .insert(InodeId::new(16386), vec![InodeId::new(16387)])
        .unwrap();

    Snapshot::new(InodeId::new(16385), inodes, directories).unwrap()
}

#[test]
fn test_inode_id_operations() {
    let id1 = InodeId::new(42);
    let id2 = InodeId::new(42);

    assert_eq!(id1, id2);
    assert_eq!(id1.0, 42);
    assert!(InodeId::new(1) < InodeId::new(2));
}

#[test]
fn test_inode_kind_discrimination() {
    assert!(InodeKind::File.is_file());
    assert!(!InodeKind::File.is_dir());
    assert!(InodeKind::Directory.is_dir());

    let link = InodeKind::Symlink {
        target: "/tmp".into(),
    };
    assert!(link.is_symlink());
    assert!(!link.is_file());
}

#[test]
fn test_snapshot_stats() {
    let snapshot = small_snapshot();

    assert_eq!(snapshot.stats.total_inodes, 4);
    assert_eq!(snapshot.stats.total_dirs, 2);
    assert_eq!(snapshot.stats.total_files, 1);
    assert_eq!(snapshot.stats.total_symlinks, 1);
    assert_eq!(snapshot.stats.directory_entries, 2);
    assert_eq!(snapshot.stats.total_size, 4096);
}

#[test]
fn test_children_keep_snapshot_order() {
    let snapshot = small_snapshot();
    assert_eq!(
        snapshot.children(InodeId::new(16385)),
        &[InodeId::new(16386), InodeId::new(16388)]
    );
    // Files have no directory entry.
    assert!(snapshot.children(InodeId::new(16387)).is_empty());
}

#[test]
fn test_child_lookup_detects_dangling_reference() {
    let snapshot = small_snapshot();

    let child = snapshot.child(InodeId::new(16386), InodeId::new(16387)).unwrap();
    assert_eq!(child.name.as_str(), "data.csv");

    let err = snapshot
        .child(InodeId::new(16386), InodeId::new(99999))
        .unwrap_err();
    assert!(matches!(err, HeatError::InconsistentSnapshot { .. }));
}

#[test]
fn test_duplicate_directory_entry_rejected() {
    let mut directories = DirectoryIndex::new();
    directories.insert(InodeId::new(1), vec![InodeId::new(2)]).unwrap();
    let err = directories
        .insert(InodeId::new(1), vec![InodeId::new(3)])
        .unwrap_err();
    assert!(matches!(err, HeatError::MalformedSnapshot { .. }));
}

#[test]
fn test_config_serialization() {
    let config = AnalyzeConfig::builder()
        .dfs_path("/data")
        .now_millis(1_700_000_000_000i64)
        .build()
        .unwrap();

    let json = serde_json::to_string(&config).unwrap();
    let back: AnalyzeConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.dfs_path, "/data");
    assert_eq!(back.now_millis, 1_700_000_000_000);
    assert_eq!(back.thresholds, TemperatureThresholds::default());
}

#[test]
fn test_temperature_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Temperature::Hot).unwrap(), "\"hot\"");
}
