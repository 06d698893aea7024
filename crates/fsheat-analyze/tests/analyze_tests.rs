//! End-to-end analysis over loaded snapshots.

use fsheat_analyze::{
    Classifier, HeatError, TemperatureAnalyzer, Traversal, normalize_path, resolve, resolve_path,
    split_path,
};
use fsheat_core::{ONE_DAY_MS, Snapshot, Temperature, TimestampKind};
use fsheat_image::{DirectoryEntry, InodeEntry, SnapshotDocument, SnapshotLoader};

const NOW: i64 = 1_700_000_000_000;

fn days_ago(days: i64) -> i64 {
    NOW - days * ONE_DAY_MS
}

fn load(document: SnapshotDocument) -> Snapshot {
    SnapshotLoader::new().load_document(document).unwrap()
}

fn analyze(snapshot: &Snapshot, path: &str) -> fsheat_core::Result<Traversal> {
    let segments = split_path(path)?;
    let start = resolve(snapshot.root, &segments, snapshot)?;
    TemperatureAnalyzer::new(Classifier::new(NOW)).traverse(
        snapshot,
        start,
        &normalize_path(&segments),
    )
}

/// `/a` holding a single file with both timestamps `days` old.
fn single_file(days: i64) -> SnapshotDocument {
    SnapshotDocument {
        inodes: vec![
            InodeEntry::directory(1, "", days_ago(0)),
            InodeEntry::directory(2, "a", days_ago(0)),
            InodeEntry::file(3, "f1", days_ago(days), days_ago(days), &[100]),
        ],
        directories: vec![DirectoryEntry::new(1, &[2]), DirectoryEntry::new(2, &[3])],
    }
}

/// A small warehouse tree:
///
/// ```text
/// /user
///   /hive
///     t1 (hot, 1 KiB)      t2 (cold)
///     /part
///       p1 (warm)  p2 (hot mtime, cold atime)
///   /tmp   (empty)
///   /spark
///     s1 (cold)
/// ```
fn warehouse() -> SnapshotDocument {
    SnapshotDocument {
        inodes: vec![
            InodeEntry::directory(16385, "", days_ago(0)),
            InodeEntry::directory(16386, "user", days_ago(0)),
            InodeEntry::directory(16387, "hive", days_ago(0)),
            InodeEntry::file(16388, "t1", days_ago(1), days_ago(1), &[1024]),
            InodeEntry::file(16389, "t2", days_ago(90), days_ago(45), &[512, 512]),
            InodeEntry::directory(16390, "part", days_ago(0)),
            InodeEntry::file(16391, "p1", days_ago(10), days_ago(8), &[1]),
            InodeEntry::file(16392, "p2", days_ago(2), days_ago(31), &[]),
            InodeEntry::directory(16393, "tmp", days_ago(0)),
            InodeEntry::directory(16394, "spark", days_ago(0)),
            InodeEntry::file(16395, "s1", days_ago(60), days_ago(60), &[2048]),
        ],
        directories: vec![
            DirectoryEntry::new(16385, &[16386]),
            DirectoryEntry::new(16386, &[16387, 16393, 16394]),
            DirectoryEntry::new(16387, &[16388, 16389, 16390]),
            DirectoryEntry::new(16390, &[16391, 16392]),
            DirectoryEntry::new(16394, &[16395]),
        ],
    }
}

#[test]
fn test_recent_file_is_hot() {
    let snapshot = load(single_file(1));
    let traversal = analyze(&snapshot, "/a").unwrap();

    let summary = &traversal.summaries["/a"];
    assert_eq!(summary.files, 1);
    assert_eq!(summary.bytes, 100);
    assert_eq!(summary.count(TimestampKind::Modified, Temperature::Hot), 1);
    assert_eq!(summary.count(TimestampKind::Accessed, Temperature::Hot), 1);
    assert_eq!(
        summary.share(TimestampKind::Modified, Temperature::Hot).unwrap().to_string(),
        "1.00"
    );

    let report = traversal.report("/a").unwrap();
    assert_eq!(report.files, 1);
    assert_eq!(report.m_hot, 1);
    assert_eq!(report.m_hot_share.to_string(), "1.00");
    assert_eq!(report.a_hot_share.to_string(), "1.00");
}

#[test]
fn test_old_file_is_cold() {
    let snapshot = load(single_file(40));
    let traversal = analyze(&snapshot, "/a").unwrap();

    let summary = &traversal.summaries["/a"];
    assert!(!summary.has_bucket(TimestampKind::Modified, Temperature::Warm));
    assert_eq!(summary.count(TimestampKind::Modified, Temperature::Cold), 1);

    let report = traversal.report("/a").unwrap();
    assert_eq!(report.m_warm, 0);
    assert_eq!(report.m_cold, 1);
    assert_eq!(report.m_cold_share.to_string(), "1.00");
}

#[test]
fn test_empty_directory_yields_no_summary_and_no_report() {
    let snapshot = load(warehouse());
    let traversal = analyze(&snapshot, "/user/tmp").unwrap();

    assert!(traversal.summaries.is_empty());
    let err = traversal.report("/user/tmp").unwrap_err();
    assert!(matches!(err, HeatError::EmptyResult { .. }));
}

#[test]
fn test_root_path_is_rejected() {
    let snapshot = load(warehouse());
    let err = resolve_path("/", &snapshot).unwrap_err();
    assert!(matches!(err, HeatError::InvalidPath { .. }));
}

#[test]
fn test_unknown_path_is_not_found() {
    let snapshot = load(warehouse());
    let err = analyze(&snapshot, "/user/presto").unwrap_err();
    assert_eq!(err.to_string(), "/user/presto: No such file or directory");
}

#[test]
fn test_report_totals_match_summaries() {
    let snapshot = load(warehouse());
    let traversal = analyze(&snapshot, "/user").unwrap();

    let keys: Vec<&str> = traversal.summaries.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["/user/hive", "/user/spark", "/user/hive/part"]);

    let report = traversal.report("/user").unwrap();
    assert_eq!(report.files, 5);
    assert_eq!(report.files, traversal.total_files());
    assert_eq!(report.bytes, 1024 + 1024 + 1 + 2048);
    assert_eq!(report.m_hot + report.m_warm + report.m_cold, report.files);
    assert_eq!(report.a_hot + report.a_warm + report.a_cold, report.files);

    assert_eq!(report.m_hot, 2);
    assert_eq!(report.m_warm, 1);
    assert_eq!(report.m_cold, 2);
    assert_eq!(report.a_hot, 1);
    assert_eq!(report.a_warm, 1);
    assert_eq!(report.a_cold, 3);
    assert_eq!(report.a_cold_share.to_string(), "0.60");
}

#[test]
fn test_shares_are_within_bounds() {
    let snapshot = load(warehouse());
    let traversal = analyze(&snapshot, "/user").unwrap();

    for summary in traversal.summaries.values() {
        for kind in [TimestampKind::Modified, TimestampKind::Accessed] {
            for bucket in [Temperature::Hot, Temperature::Warm, Temperature::Cold] {
                if let Some(share) = summary.share(kind, bucket) {
                    assert!((0.0..=1.0).contains(&share.value()));
                }
            }
        }
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let snapshot = load(warehouse());
    let start = resolve_path("/user", &snapshot).unwrap();
    let analyzer = TemperatureAnalyzer::new(Classifier::new(NOW));

    let sequential = analyzer.traverse(&snapshot, start, "/user").unwrap();
    let parallel = analyzer.traverse_parallel(&snapshot, start, "/user", 2).unwrap();

    assert_eq!(parallel.stats, sequential.stats);
    assert_eq!(parallel.summaries.len(), sequential.summaries.len());
    for (path, summary) in &sequential.summaries {
        assert_eq!(&parallel.summaries[path], summary, "{path}");
    }
    assert_eq!(
        parallel.report("/user").unwrap(),
        sequential.report("/user").unwrap()
    );
}

#[test]
fn test_file_start_reports_single_file() {
    let snapshot = load(warehouse());
    let traversal = analyze(&snapshot, "/user/hive/t2").unwrap();

    let report = traversal.report("/user/hive/t2").unwrap();
    assert_eq!(report.files, 1);
    assert_eq!(report.bytes, 1024);
    assert_eq!(report.m_cold, 1);
    assert_eq!(report.a_cold, 1);
}

#[test]
fn test_dangling_child_is_inconsistent() {
    let mut document = warehouse();
    document.directories[3] = DirectoryEntry::new(16390, &[16391, 99999]);
    let snapshot = load(document);

    let err = analyze(&snapshot, "/user").unwrap_err();
    assert!(matches!(err, HeatError::InconsistentSnapshot { .. }));
}

#[test]
fn test_visit_callback_sees_every_directory() {
    let snapshot = load(warehouse());
    let start = resolve_path("/user", &snapshot).unwrap();

    let mut lines = Vec::new();
    TemperatureAnalyzer::new(Classifier::new(NOW))
        .traverse_with(&snapshot, start, "/user", |visit| {
            lines.push((visit.path.to_string(), visit.summary.map(|s| s.files)));
        })
        .unwrap();

    assert_eq!(
        lines,
        vec![
            ("/user".to_string(), None),
            ("/user/hive".to_string(), Some(2)),
            ("/user/tmp".to_string(), None),
            ("/user/spark".to_string(), Some(1)),
            ("/user/hive/part".to_string(), Some(2)),
        ]
    );
}

#[test]
fn test_file_under_two_directories_is_inconsistent() {
    let mut document = warehouse();
    document.directories[4] = DirectoryEntry::new(16394, &[16395, 16388]);
    let snapshot = load(document);

    let err = analyze(&snapshot, "/user").unwrap_err();
    assert!(matches!(err, HeatError::InconsistentSnapshot { .. }));

    let start = resolve_path("/user", &snapshot).unwrap();
    let err = TemperatureAnalyzer::new(Classifier::new(NOW))
        .traverse_parallel(&snapshot, start, "/user", 2)
        .unwrap_err();
    assert!(matches!(err, HeatError::InconsistentSnapshot { .. }));
}
