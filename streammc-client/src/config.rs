use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use streammc_proto::LevelHeight;

/// Client stream settings. Every field has a default, so a config file only
/// needs the values it changes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub level: LevelHeight,
    pub storage: StorageConfig,
    pub rate: RateConfig,
    pub light_queue: LightQueueConfig,
}

/// How a server view distance becomes a ring radius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub initial_view_distance: i32,
    pub min_view_distance: i32,
    /// Extra columns kept around the view so edge chunks are not thrown away.
    pub margin: i32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            initial_view_distance: 2,
            min_view_distance: 2,
            margin: 3,
        }
    }
}

impl StorageConfig {
    pub fn ring_radius(&self, view_distance: i32) -> i32 {
        view_distance.max(self.min_view_distance) + self.margin
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    pub initial_nanos_per_chunk: f64,
    pub max_sample_weight: u32,
    /// A single batch can move the estimate by at most this factor.
    pub outlier_factor: f64,
    pub tick_budget_nanos: f64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            initial_nanos_per_chunk: 2_000_000.0,
            max_sample_weight: 49,
            outlier_factor: 3.0,
            tick_budget_nanos: 7_000_000.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightQueueConfig {
    pub min_batch: usize,
    pub divisor: usize,
    /// At or above this backlog the whole queue is drained in one tick.
    pub backlog_threshold: usize,
}

impl Default for LightQueueConfig {
    fn default() -> Self {
        Self {
            min_batch: 10,
            divisor: 10,
            backlog_threshold: 1000,
        }
    }
}

impl StreamConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("Failed to parse stream config")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the rate controller cannot work with.
    pub fn validate(&self) -> Result<()> {
        let rate = &self.rate;
        ensure!(
            rate.outlier_factor.is_finite() && rate.outlier_factor >= 1.0,
            "rate.outlier_factor must be a finite number >= 1, got {}",
            rate.outlier_factor
        );
        ensure!(rate.max_sample_weight > 0, "rate.max_sample_weight must be at least 1");
        ensure!(
            rate.initial_nanos_per_chunk.is_finite() && rate.initial_nanos_per_chunk > 0.0,
            "rate.initial_nanos_per_chunk must be positive, got {}",
            rate.initial_nanos_per_chunk
        );
        ensure!(
            rate.tick_budget_nanos.is_finite() && rate.tick_budget_nanos > 0.0,
            "rate.tick_budget_nanos must be positive, got {}",
            rate.tick_budget_nanos
        );
        Ok(())
    }

    pub fn summary(&self) -> String {
        format!(
            "sections={}..{} view={} margin={} seed_ns={} budget_ns={}",
            self.level.min_section,
            self.level.max_section(),
            self.storage.initial_view_distance,
            self.storage.margin,
            self.rate.initial_nanos_per_chunk,
            self.rate.tick_budget_nanos,
        )
    }
}
