//! Work-list traversal and per-directory aggregation.
//!
//! Directories are visited breadth-first from an explicit queue, so deep
//! namespaces never grow the call stack. Files are folded into the
//! summary of their direct parent directory only; subtree-wide totals
//! come from the report.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, info};

use fsheat_core::{AnalyzeConfig, HeatError, Inode, InodeId, InodeKind, Result, Snapshot};

use crate::report::{TemperatureReport, build_report};
use crate::summary::DirectorySummary;
use crate::temperature::Classifier;

/// One directory whose direct children have all been processed.
#[derive(Debug, Clone, Copy)]
pub struct DirectoryVisit<'a> {
    /// Directory inode.
    pub id: InodeId,
    /// Full path of the directory.
    pub path: &'a str,
    /// Finalized summary, if the directory holds at least one file.
    pub summary: Option<&'a DirectorySummary>,
}

/// Counters gathered during a traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Directories dequeued and processed.
    pub directories_visited: u64,
    /// Files folded into summaries.
    pub files_folded: u64,
    /// Symlinks seen and skipped.
    pub symlinks_skipped: u64,
}

impl TraversalStats {
    fn merge(&mut self, other: &TraversalStats) {
        self.directories_visited += other.directories_visited;
        self.files_folded += other.files_folded;
        self.symlinks_skipped += other.symlinks_skipped;
    }
}

/// Result of a traversal: path → summary in visit order.
#[derive(Debug, Clone, Default)]
pub struct Traversal {
    /// Summaries keyed by directory path. Directories without files are absent.
    pub summaries: IndexMap<String, DirectorySummary>,
    /// Traversal counters.
    pub stats: TraversalStats,
}

impl Traversal {
    /// Total files across all summaries.
    pub fn total_files(&self) -> u64 {
        self.summaries.values().map(|s| s.files).sum()
    }

    /// Fold every summary into one report labelled `path`.
    pub fn report(&self, path: &str) -> Result<TemperatureReport> {
        build_report(self.summaries.values(), path)
    }
}

/// Traverses a subtree and aggregates file temperatures.
pub struct TemperatureAnalyzer {
    classifier: Classifier,
}

impl TemperatureAnalyzer {
    /// Create an analyzer with a fixed classifier.
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    /// Create an analyzer from a run configuration.
    pub fn from_config(config: &AnalyzeConfig) -> Self {
        Self::new(Classifier::with_thresholds(config.now_millis, config.thresholds))
    }

    /// The classifier in use.
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Traverse everything reachable from `start`.
    pub fn traverse(
        &self,
        snapshot: &Snapshot,
        start: InodeId,
        start_path: &str,
    ) -> Result<Traversal> {
        self.traverse_with(snapshot, start, start_path, |_| {})
    }

    /// Traverse everything reachable from `start`, reporting each directory
    /// to `on_visit` as soon as its direct children are processed.
    pub fn traverse_with<F>(
        &self,
        snapshot: &Snapshot,
        start: InodeId,
        start_path: &str,
        mut on_visit: F,
    ) -> Result<Traversal>
    where
        F: FnMut(DirectoryVisit<'_>),
    {
        let mut traversal = Traversal::default();
        let inode = start_inode(snapshot, start)?;

        match inode.kind {
            InodeKind::Directory => {
                let mut queue = VecDeque::from([(start, start_path.to_string())]);
                let mut visited = HashSet::from([start]);
                self.drain(snapshot, &mut queue, &mut traversal, &mut visited, &mut on_visit)?;
            }
            InodeKind::File => {
                self.fold_file(&mut traversal, start_path, inode)?;
                finalize(&mut traversal, start_path);
            }
            InodeKind::Symlink { .. } => traversal.stats.symlinks_skipped += 1,
        }

        info!(
            directories = traversal.stats.directories_visited,
            files = traversal.stats.files_folded,
            "traversal finished"
        );
        Ok(traversal)
    }

    /// Traverse with the start directory's subdirectories spread over a
    /// rayon pool.
    ///
    /// Each worker owns one top-level subtree and its own partial result;
    /// partials are merged in child order. `threads == 0` uses the global
    /// pool.
    pub fn traverse_parallel(
        &self,
        snapshot: &Snapshot,
        start: InodeId,
        start_path: &str,
        threads: usize,
    ) -> Result<Traversal> {
        let inode = start_inode(snapshot, start)?;
        if !inode.is_dir() {
            return self.traverse(snapshot, start, start_path);
        }

        let mut traversal = Traversal::default();
        let mut visited = HashSet::from([start]);
        traversal.stats.directories_visited += 1;

        let mut subdirs = Vec::new();
        self.process_children(
            snapshot,
            start,
            start_path,
            &mut traversal,
            &mut visited,
            &mut |id, path| subdirs.push((id, path)),
        )?;
        finalize(&mut traversal, start_path);

        let run = || {
            subdirs
                .par_iter()
                .map(|(id, path)| {
                    let mut partial = Traversal::default();
                    let mut partial_visited = HashSet::new();
                    let mut queue = VecDeque::from([(*id, path.clone())]);
                    self.drain(
                        snapshot,
                        &mut queue,
                        &mut partial,
                        &mut partial_visited,
                        &mut |_| {},
                    )?;
                    Ok((partial, partial_visited))
                })
                .collect::<Vec<Result<(Traversal, HashSet<InodeId>)>>>()
        };

        let partials = if threads == 0 {
            run()
        } else {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| HeatError::InvalidConfig {
                    message: format!("cannot build thread pool: {e}"),
                })?
                .install(run)
        };

        for partial in partials {
            let (partial, partial_visited) = partial?;
            for id in partial_visited {
                if !visited.insert(id) {
                    return Err(HeatError::revisited(id, start_path));
                }
            }
            traversal.stats.merge(&partial.stats);
            for (path, summary) in partial.summaries {
                match traversal.summaries.get_mut(&path) {
                    Some(existing) => {
                        existing.merge(&summary);
                        existing.finalize();
                    }
                    None => {
                        traversal.summaries.insert(path, summary);
                    }
                }
            }
        }

        info!(
            directories = traversal.stats.directories_visited,
            files = traversal.stats.files_folded,
            partitions = subdirs.len(),
            "parallel traversal finished"
        );
        Ok(traversal)
    }

    fn drain(
        &self,
        snapshot: &Snapshot,
        queue: &mut VecDeque<(InodeId, String)>,
        traversal: &mut Traversal,
        visited: &mut HashSet<InodeId>,
        on_visit: &mut dyn FnMut(DirectoryVisit<'_>),
    ) -> Result<()> {
        while let Some((id, path)) = queue.pop_front() {
            traversal.stats.directories_visited += 1;

            self.process_children(
                snapshot,
                id,
                &path,
                traversal,
                visited,
                &mut |child, child_path| queue.push_back((child, child_path)),
            )?;

            let summary = traversal.summaries.get_mut(path.as_str()).map(|summary| {
                summary.finalize();
                &*summary
            });
            debug!(path = %path, files = summary.map_or(0, |s| s.files), "visited directory");
            on_visit(DirectoryVisit {
                id,
                path: &path,
                summary,
            });
        }
        Ok(())
    }

    /// Fold the direct file children of `parent` and hand every
    /// subdirectory with its full path to `enqueue`.
    ///
    /// Every child id is recorded in `visited`; an id seen before breaks
    /// the tree property.
    fn process_children(
        &self,
        snapshot: &Snapshot,
        parent: InodeId,
        path: &str,
        traversal: &mut Traversal,
        visited: &mut HashSet<InodeId>,
        enqueue: &mut dyn FnMut(InodeId, String),
    ) -> Result<()> {
        for &child_id in snapshot.children(parent) {
            let child = snapshot.child(parent, child_id)?;
            if !visited.insert(child_id) {
                return Err(HeatError::revisited(child_id, path));
            }
            match child.kind {
                InodeKind::Directory => enqueue(child_id, join_path(path, &child.name)),
                InodeKind::File => self.fold_file(traversal, path, child)?,
                InodeKind::Symlink { .. } => traversal.stats.symlinks_skipped += 1,
            }
        }
        Ok(())
    }

    fn fold_file(&self, traversal: &mut Traversal, dir_path: &str, file: &Inode) -> Result<()> {
        let accessed = file
            .accessed
            .ok_or_else(|| HeatError::malformed_field(file.id, "atime", "is missing"))?;
        let modified = self.classifier.classify(file.modified);
        let accessed = self.classifier.classify(accessed);

        match traversal.summaries.get_mut(dir_path) {
            Some(summary) => summary.record_file(file.size, modified, accessed),
            None => {
                let mut summary = DirectorySummary::new();
                summary.record_file(file.size, modified, accessed);
                traversal.summaries.insert(dir_path.to_string(), summary);
            }
        }
        traversal.stats.files_folded += 1;
        Ok(())
    }
}

fn start_inode(snapshot: &Snapshot, start: InodeId) -> Result<&Inode> {
    snapshot.inode(start).ok_or_else(|| HeatError::InconsistentSnapshot {
        message: format!("start inode {start} missing from inode table"),
    })
}

fn finalize(traversal: &mut Traversal, path: &str) {
    if let Some(summary) = traversal.summaries.get_mut(path) {
        summary.finalize();
    }
}

/// `parent/name`, without doubling a trailing slash.
fn join_path(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{parent}{name}")
    } else {
        format!("{parent}/{name}")
    }
}
