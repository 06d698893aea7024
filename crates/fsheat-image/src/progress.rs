//! Load progress reporting.

use std::time::{Duration, Instant};

/// Progress information while a snapshot is indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadProgress {
    /// Inode entries indexed so far.
    pub inodes_loaded: u64,
    /// Directory entries indexed so far.
    pub directories_loaded: u64,
    /// Total inode entries in the document.
    pub total_inodes: u64,
    /// Total directory entries in the document.
    pub total_directories: u64,
    /// Time elapsed since indexing started.
    pub elapsed: Duration,
}

impl LoadProgress {
    /// Fraction of entries indexed, between 0 and 1.
    pub fn fraction(&self) -> f64 {
        let total = self.total_inodes + self.total_directories;
        if total == 0 {
            1.0
        } else {
            (self.inodes_loaded + self.directories_loaded) as f64 / total as f64
        }
    }

    /// Check whether every entry has been indexed.
    pub fn is_complete(&self) -> bool {
        self.inodes_loaded == self.total_inodes && self.directories_loaded == self.total_directories
    }
}

/// Internal progress tracker with timing.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    inodes_loaded: u64,
    directories_loaded: u64,
    total_inodes: u64,
    total_directories: u64,
}

impl ProgressTracker {
    pub fn new(total_inodes: usize, total_directories: usize) -> Self {
        Self {
            start_time: Instant::now(),
            inodes_loaded: 0,
            directories_loaded: 0,
            total_inodes: total_inodes as u64,
            total_directories: total_directories as u64,
        }
    }

    pub fn record_inode(&mut self) {
        self.inodes_loaded += 1;
    }

    pub fn record_directory(&mut self) {
        self.directories_loaded += 1;
    }

    pub fn processed(&self) -> u64 {
        self.inodes_loaded + self.directories_loaded
    }

    pub fn snapshot(&self) -> LoadProgress {
        LoadProgress {
            inodes_loaded: self.inodes_loaded,
            directories_loaded: self.directories_loaded,
            total_inodes: self.total_inodes,
            total_directories: self.total_directories,
            elapsed: self.start_time.elapsed(),
        }
    }
}
