//! Per-directory temperature summaries.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use strum::IntoEnumIterator;

use fsheat_core::{Temperature, TimestampKind};

/// A value shown with two decimal places.
///
/// The exact value is kept; rounding happens once, when formatting.
/// Serialized as a fixed two-decimal string, e.g. `"0.25"`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Rounded(f64);

impl Rounded {
    /// Wrap a value.
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// `part / whole`. `whole` must be non-zero.
    pub fn ratio(part: u64, whole: u64) -> Self {
        debug_assert!(whole > 0);
        Self::new(part as f64 / whole as f64)
    }

    /// The unrounded value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Rounded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Rounded {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Bucket counts and derived shares for the files directly inside one
/// directory.
///
/// Buckets are absent until a file falls into them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectorySummary {
    /// Number of files.
    pub files: u64,
    /// Total bytes across those files.
    pub bytes: u64,
    modified: BTreeMap<Temperature, u64>,
    accessed: BTreeMap<Temperature, u64>,
    modified_shares: BTreeMap<Temperature, Rounded>,
    accessed_shares: BTreeMap<Temperature, Rounded>,
}

impl DirectorySummary {
    /// Create an empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one classified file in.
    pub fn record_file(&mut self, size: u64, modified: Temperature, accessed: Temperature) {
        self.files += 1;
        self.bytes += size;
        *self.modified.entry(modified).or_insert(0) += 1;
        *self.accessed.entry(accessed).or_insert(0) += 1;
    }

    /// Add another summary's counts to this one.
    ///
    /// Shares are cleared; call [`DirectorySummary::finalize`] again.
    pub fn merge(&mut self, other: &DirectorySummary) {
        self.files += other.files;
        self.bytes += other.bytes;
        for (bucket, count) in &other.modified {
            *self.modified.entry(*bucket).or_insert(0) += count;
        }
        for (bucket, count) in &other.accessed {
            *self.accessed.entry(*bucket).or_insert(0) += count;
        }
        self.modified_shares.clear();
        self.accessed_shares.clear();
    }

    /// Compute the share of files in every present bucket.
    pub fn finalize(&mut self) {
        if self.files == 0 {
            return;
        }
        let files = self.files;
        self.modified_shares = self
            .modified
            .iter()
            .map(|(bucket, count)| (*bucket, Rounded::ratio(*count, files)))
            .collect();
        self.accessed_shares = self
            .accessed
            .iter()
            .map(|(bucket, count)| (*bucket, Rounded::ratio(*count, files)))
            .collect();
    }

    /// Check whether shares have been computed.
    pub fn is_finalized(&self) -> bool {
        self.files > 0 && !self.modified_shares.is_empty()
    }

    /// Count of files in a bucket. Absent buckets count as zero.
    pub fn count(&self, kind: TimestampKind, bucket: Temperature) -> u64 {
        self.counts(kind).get(&bucket).copied().unwrap_or(0)
    }

    /// Whether any file has fallen into a bucket.
    pub fn has_bucket(&self, kind: TimestampKind, bucket: Temperature) -> bool {
        self.counts(kind).contains_key(&bucket)
    }

    /// Share of files in a bucket, once finalized and if present.
    pub fn share(&self, kind: TimestampKind, bucket: Temperature) -> Option<Rounded> {
        let shares = match kind {
            TimestampKind::Modified => &self.modified_shares,
            TimestampKind::Accessed => &self.accessed_shares,
        };
        shares.get(&bucket).copied()
    }

    fn counts(&self, kind: TimestampKind) -> &BTreeMap<Temperature, u64> {
        match kind {
            TimestampKind::Modified => &self.modified,
            TimestampKind::Accessed => &self.accessed,
        }
    }
}

const KINDS: [TimestampKind; 2] = [TimestampKind::Modified, TimestampKind::Accessed];

impl Serialize for DirectorySummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("files", &self.files)?;
        map.serialize_entry("bytes", &self.bytes)?;
        for kind in KINDS {
            for bucket in Temperature::iter() {
                if let Some(count) = self.counts(kind).get(&bucket) {
                    map.serialize_entry(kind.count_key(bucket), count)?;
                }
            }
        }
        for kind in KINDS {
            for bucket in Temperature::iter() {
                if let Some(share) = self.share(kind, bucket) {
                    map.serialize_entry(kind.share_key(bucket), &share)?;
                }
            }
        }
        map.end()
    }
}

impl fmt::Display for DirectorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "files={} bytes={}", self.files, self.bytes)?;
        for kind in KINDS {
            for bucket in Temperature::iter() {
                if let Some(count) = self.counts(kind).get(&bucket) {
                    write!(f, " {}={count}", kind.count_key(bucket))?;
                    if let Some(share) = self.share(kind, bucket) {
                        write!(f, " ({share})")?;
                    }
                }
            }
        }
        Ok(())
    }
}
