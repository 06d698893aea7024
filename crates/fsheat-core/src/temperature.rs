//! Temperature buckets.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

/// One day in milliseconds.
pub const ONE_DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Files younger than this are hot.
pub const HOT_MS: i64 = 7 * ONE_DAY_MS;

/// Files younger than this (and not hot) are warm.
pub const WARM_MS: i64 = 30 * ONE_DAY_MS;

/// Nominal cold threshold. Never yields a fourth bucket: anything at or
/// past [`WARM_MS`] is already cold.
pub const COLD_MS: i64 = 90 * ONE_DAY_MS;

/// Age bucket of a timestamp.
///
/// Ordered from hottest to coldest.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Temperature {
    Hot,
    Warm,
    Cold,
}

/// Which timestamp a bucket count refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimestampKind {
    /// Modification time, reported with an `m_` prefix.
    Modified,
    /// Access time, reported with an `a_` prefix.
    Accessed,
}

impl TimestampKind {
    /// Report key for a bucket count, e.g. `m_hot`.
    pub fn count_key(self, temperature: Temperature) -> &'static str {
        match (self, temperature) {
            (TimestampKind::Modified, Temperature::Hot) => "m_hot",
            (TimestampKind::Modified, Temperature::Warm) => "m_warm",
            (TimestampKind::Modified, Temperature::Cold) => "m_cold",
            (TimestampKind::Accessed, Temperature::Hot) => "a_hot",
            (TimestampKind::Accessed, Temperature::Warm) => "a_warm",
            (TimestampKind::Accessed, Temperature::Cold) => "a_cold",
        }
    }

    /// Report key for a bucket share, e.g. `%m_hot`.
    pub fn share_key(self, temperature: Temperature) -> &'static str {
        match (self, temperature) {
            (TimestampKind::Modified, Temperature::Hot) => "%m_hot",
            (TimestampKind::Modified, Temperature::Warm) => "%m_warm",
            (TimestampKind::Modified, Temperature::Cold) => "%m_cold",
            (TimestampKind::Accessed, Temperature::Hot) => "%a_hot",
            (TimestampKind::Accessed, Temperature::Warm) => "%a_warm",
            (TimestampKind::Accessed, Temperature::Cold) => "%a_cold",
        }
    }
}
