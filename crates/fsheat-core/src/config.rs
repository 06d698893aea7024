//! Analysis configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::temperature::{COLD_MS, HOT_MS, ONE_DAY_MS, WARM_MS};

/// Age thresholds separating the temperature buckets, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct TemperatureThresholds {
    /// Ages below this are hot.
    #[builder(default = "HOT_MS")]
    pub hot_ms: i64,

    /// Ages below this (and not hot) are warm; everything else is cold.
    #[builder(default = "WARM_MS")]
    pub warm_ms: i64,

    /// Nominal cold threshold, kept for reporting only.
    #[builder(default = "COLD_MS")]
    pub cold_ms: i64,
}

impl TemperatureThresholdsBuilder {
    fn validate(&self) -> Result<(), String> {
        let hot = self.hot_ms.unwrap_or(HOT_MS);
        let warm = self.warm_ms.unwrap_or(WARM_MS);
        if hot <= 0 {
            return Err("Hot threshold must be positive".to_string());
        }
        if warm <= hot {
            return Err(format!(
                "Warm threshold ({warm} ms) must be greater than hot threshold ({hot} ms)"
            ));
        }
        Ok(())
    }
}

impl TemperatureThresholds {
    /// Create a new thresholds builder.
    pub fn builder() -> TemperatureThresholdsBuilder {
        TemperatureThresholdsBuilder::default()
    }

    /// Thresholds expressed in whole days.
    pub fn from_days(
        hot_days: u32,
        warm_days: u32,
    ) -> Result<Self, TemperatureThresholdsBuilderError> {
        Self::builder()
            .hot_ms(i64::from(hot_days) * ONE_DAY_MS)
            .warm_ms(i64::from(warm_days) * ONE_DAY_MS)
            .build()
    }
}

impl Default for TemperatureThresholds {
    fn default() -> Self {
        Self {
            hot_ms: HOT_MS,
            warm_ms: WARM_MS,
            cold_ms: COLD_MS,
        }
    }
}

/// Configuration for one analysis run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct AnalyzeConfig {
    /// DFS path of the subtree to analyze.
    pub dfs_path: String,

    /// The instant every file is compared against, in epoch milliseconds.
    #[builder(default = "chrono::Utc::now().timestamp_millis()")]
    pub now_millis: i64,

    /// Bucket thresholds.
    #[builder(default)]
    #[serde(default)]
    pub thresholds: TemperatureThresholds,

    /// Traverse top-level subdirectories in parallel.
    #[builder(default = "false")]
    #[serde(default)]
    pub parallel: bool,

    /// Worker threads for parallel traversal (0 = auto-detect).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,
}

impl AnalyzeConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.dfs_path {
            Some(ref path) if path.trim().is_empty() => Err("DFS path cannot be empty".to_string()),
            Some(_) => Ok(()),
            None => Err("DFS path is required".to_string()),
        }
    }
}

impl AnalyzeConfig {
    /// Create a new config builder.
    pub fn builder() -> AnalyzeConfigBuilder {
        AnalyzeConfigBuilder::default()
    }

    /// Create a simple config for analyzing a path as of now.
    pub fn new(dfs_path: impl Into<String>) -> Self {
        Self {
            dfs_path: dfs_path.into(),
            now_millis: chrono::Utc::now().timestamp_millis(),
            thresholds: TemperatureThresholds::default(),
            parallel: false,
            threads: 0,
        }
    }
}
