//! Subtree-wide temperature report.

use serde::Serialize;

use fsheat_core::{HeatError, Result, Temperature, TimestampKind};

use crate::summary::{DirectorySummary, Rounded};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Aggregate over every directory summary of one traversal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureReport {
    pub path: String,
    pub files: u64,
    pub bytes: u64,
    #[serde(rename = "bytes_GB")]
    pub bytes_gib: Rounded,
    pub m_hot: u64,
    #[serde(rename = "%m_hot")]
    pub m_hot_share: Rounded,
    pub m_warm: u64,
    #[serde(rename = "%m_warm")]
    pub m_warm_share: Rounded,
    pub m_cold: u64,
    #[serde(rename = "%m_cold")]
    pub m_cold_share: Rounded,
    pub a_hot: u64,
    #[serde(rename = "%a_hot")]
    pub a_hot_share: Rounded,
    pub a_warm: u64,
    #[serde(rename = "%a_warm")]
    pub a_warm_share: Rounded,
    pub a_cold: u64,
    #[serde(rename = "%a_cold")]
    pub a_cold_share: Rounded,
}

impl TemperatureReport {
    /// Total count for one bucket.
    pub fn count(&self, kind: TimestampKind, bucket: Temperature) -> u64 {
        match (kind, bucket) {
            (TimestampKind::Modified, Temperature::Hot) => self.m_hot,
            (TimestampKind::Modified, Temperature::Warm) => self.m_warm,
            (TimestampKind::Modified, Temperature::Cold) => self.m_cold,
            (TimestampKind::Accessed, Temperature::Hot) => self.a_hot,
            (TimestampKind::Accessed, Temperature::Warm) => self.a_warm,
            (TimestampKind::Accessed, Temperature::Cold) => self.a_cold,
        }
    }

    /// Share of files for one bucket.
    pub fn share(&self, kind: TimestampKind, bucket: Temperature) -> Rounded {
        match (kind, bucket) {
            (TimestampKind::Modified, Temperature::Hot) => self.m_hot_share,
            (TimestampKind::Modified, Temperature::Warm) => self.m_warm_share,
            (TimestampKind::Modified, Temperature::Cold) => self.m_cold_share,
            (TimestampKind::Accessed, Temperature::Hot) => self.a_hot_share,
            (TimestampKind::Accessed, Temperature::Warm) => self.a_warm_share,
            (TimestampKind::Accessed, Temperature::Cold) => self.a_cold_share,
        }
    }
}

/// Sum every summary into one report labelled `path`.
///
/// Fails with [`HeatError::EmptyResult`] when no files were counted, since
/// the shares would be undefined.
pub fn build_report<'a, I>(summaries: I, path: &str) -> Result<TemperatureReport>
where
    I: IntoIterator<Item = &'a DirectorySummary>,
{
    let mut files = 0u64;
    let mut bytes = 0u64;
    let mut counts = [[0u64; 3]; 2];

    for summary in summaries {
        files += summary.files;
        bytes += summary.bytes;
        for (k, kind) in [TimestampKind::Modified, TimestampKind::Accessed]
            .into_iter()
            .enumerate()
        {
            for (b, bucket) in [Temperature::Hot, Temperature::Warm, Temperature::Cold]
                .into_iter()
                .enumerate()
            {
                counts[k][b] += summary.count(kind, bucket);
            }
        }
    }

    if files == 0 {
        return Err(HeatError::EmptyResult {
            path: path.to_string(),
        });
    }

    let share = |count: u64| Rounded::ratio(count, files);
    let [[m_hot, m_warm, m_cold], [a_hot, a_warm, a_cold]] = counts;

    Ok(TemperatureReport {
        path: path.to_string(),
        files,
        bytes,
        bytes_gib: Rounded::new(bytes as f64 / GIB),
        m_hot,
        m_hot_share: share(m_hot),
        m_warm,
        m_warm_share: share(m_warm),
        m_cold,
        m_cold_share: share(m_cold),
        a_hot,
        a_hot_share: share(a_hot),
        a_warm,
        a_warm_share: share(a_warm),
        a_cold,
        a_cold_share: share(a_cold),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selection_fails() {
        let none: Vec<DirectorySummary> = Vec::new();
        let err = build_report(&none, "/empty").unwrap_err();
        assert!(matches!(err, HeatError::EmptyResult { .. }));
    }

    #[test]
    fn test_sums_across_summaries() {
        let mut first = DirectorySummary::new();
        first.record_file(GIB as u64, Temperature::Hot, Temperature::Cold);
        let mut second = DirectorySummary::new();
        second.record_file(GIB as u64, Temperature::Cold, Temperature::Cold);
        second.record_file(0, Temperature::Cold, Temperature::Warm);
        second.record_file(0, Temperature::Warm, Temperature::Cold);

        let report = build_report([&first, &second], "/data").unwrap();

        assert_eq!(report.files, 4);
        assert_eq!(report.bytes, 2 * GIB as u64);
        assert_eq!(report.bytes_gib.to_string(), "2.00");
        assert_eq!(report.m_hot, 1);
        assert_eq!(report.m_warm, 1);
        assert_eq!(report.m_cold, 2);
        assert_eq!(report.m_cold_share.to_string(), "0.50");
        assert_eq!(report.a_cold, 3);
        assert_eq!(report.a_cold_share.to_string(), "0.75");
        assert_eq!(report.a_hot_share.to_string(), "0.00");
    }

    #[test]
    fn test_json_keys() {
        let mut summary = DirectorySummary::new();
        summary.record_file(512, Temperature::Hot, Temperature::Hot);
        let report = build_report([&summary], "/a").unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["path"], "/a");
        assert_eq!(json["bytes_GB"], "0.00");
        assert_eq!(json["m_hot"], 1);
        assert_eq!(json["%m_hot"], "1.00");
        assert_eq!(json["m_warm"], 0);
        assert_eq!(json["%a_cold"], "0.00");
    }
}
