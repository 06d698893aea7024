//! Age-based temperature classification.

use fsheat_core::{Temperature, TemperatureThresholds};

/// Classify a timestamp against `now` using the default 7/30 day thresholds.
///
/// Both values are epoch milliseconds.
pub fn classify(now: i64, timestamp: i64) -> Temperature {
    Classifier::new(now).classify(timestamp)
}

/// Classifies timestamps relative to a fixed instant.
///
/// `now` is captured once per run so every file is compared against the
/// same instant.
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    now: i64,
    thresholds: TemperatureThresholds,
}

impl Classifier {
    /// Create a classifier with the default thresholds.
    pub fn new(now: i64) -> Self {
        Self::with_thresholds(now, TemperatureThresholds::default())
    }

    /// Create a classifier with custom thresholds.
    pub fn with_thresholds(now: i64, thresholds: TemperatureThresholds) -> Self {
        Self { now, thresholds }
    }

    /// The reference instant.
    pub fn now(&self) -> i64 {
        self.now
    }

    /// The thresholds in use.
    pub fn thresholds(&self) -> &TemperatureThresholds {
        &self.thresholds
    }

    /// Age of a timestamp in milliseconds. Negative for future timestamps.
    pub fn age(&self, timestamp: i64) -> i64 {
        self.now.saturating_sub(timestamp)
    }

    /// Bucket a timestamp falls into.
    pub fn classify(&self, timestamp: i64) -> Temperature {
        let age = self.age(timestamp);
        if age < self.thresholds.hot_ms {
            Temperature::Hot
        } else if age < self.thresholds.warm_ms {
            Temperature::Warm
        } else {
            Temperature::Cold
        }
    }
}
