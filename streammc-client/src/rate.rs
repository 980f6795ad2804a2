use std::time::{Duration, Instant};

use crate::config::RateConfig;

/// Estimates how long one chunk takes to process and turns that into the
/// chunks-per-tick figure sent back to the server after every batch.
///
/// The estimate is a weighted running mean: a plain average for the first
/// `max_sample_weight` batches, then an exponential moving average with
/// factor `1 / (max_sample_weight + 1)`.
#[derive(Clone, Debug)]
pub struct ChunkBatchRateController {
    config: RateConfig,
    avg_nanos_per_chunk: f64,
    sample_weight: u32,
    batch_start: Instant,
}

impl ChunkBatchRateController {
    pub fn new(config: RateConfig) -> Self {
        Self {
            config,
            avg_nanos_per_chunk: config.initial_nanos_per_chunk,
            sample_weight: 1,
            batch_start: Instant::now(),
        }
    }

    pub fn on_batch_start(&mut self) {
        self.batch_start = Instant::now();
    }

    /// Folds the batch that just finished into the estimate.
    ///
    /// Returns the measured batch duration, or `None` for an empty batch.
    pub fn on_batch_finished(&mut self, chunk_count: i32) -> Option<Duration> {
        let elapsed = self.batch_start.elapsed();
        self.record_batch(elapsed, chunk_count).then_some(elapsed)
    }

    /// Same as [`Self::on_batch_finished`] with an explicit duration.
    pub fn record_batch(&mut self, elapsed: Duration, chunk_count: i32) -> bool {
        if chunk_count <= 0 {
            return false;
        }

        let avg = self.avg_nanos_per_chunk;
        let per_chunk = elapsed.as_nanos() as f64 / chunk_count as f64;
        let factor = self.config.outlier_factor.max(1.0);
        let clamped = per_chunk.clamp(avg / factor, avg * factor);

        let weight = self.sample_weight as f64;
        self.avg_nanos_per_chunk = (avg * weight + clamped) / (weight + 1.0);
        self.sample_weight = (self.sample_weight + 1).min(self.config.max_sample_weight);
        true
    }

    pub fn desired_chunks_per_tick(&self) -> f32 {
        (self.config.tick_budget_nanos / self.avg_nanos_per_chunk) as f32
    }

    pub fn avg_nanos_per_chunk(&self) -> f64 {
        self.avg_nanos_per_chunk
    }

    pub fn sample_weight(&self) -> u32 {
        self.sample_weight
    }
}

impl Default for ChunkBatchRateController {
    fn default() -> Self {
        Self::new(RateConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_estimate() {
        let rate = ChunkBatchRateController::default();
        assert_eq!(rate.avg_nanos_per_chunk(), 2_000_000.0);
        assert_eq!(rate.sample_weight(), 1);
        assert_eq!(rate.desired_chunks_per_tick(), 3.5);
    }

    #[test]
    fn test_empty_batch_is_ignored() {
        let mut rate = ChunkBatchRateController::default();
        rate.on_batch_start();
        assert_eq!(rate.on_batch_finished(0), None);
        assert!(!rate.record_batch(Duration::from_secs(5), -3));
        assert_eq!(rate.avg_nanos_per_chunk(), 2_000_000.0);
        assert_eq!(rate.sample_weight(), 1);
    }

    #[test]
    fn test_converges_monotonically() {
        // 100 chunks in 100ms -> 1ms per chunk, inside the clamp window
        let mut rate = ChunkBatchRateController::default();
        let mut previous = rate.avg_nanos_per_chunk();
        for _ in 0..1000 {
            rate.record_batch(Duration::from_millis(100), 100);
            let avg = rate.avg_nanos_per_chunk();
            assert!(avg <= previous);
            assert!(avg >= 1_000_000.0);
            previous = avg;
        }

        assert!((rate.avg_nanos_per_chunk() - 1_000_000.0).abs() < 1.0);
        assert!((rate.desired_chunks_per_tick() - 7.0).abs() < 1e-3);
        assert_eq!(rate.sample_weight(), 49);
    }

    #[test]
    fn test_plain_average_before_weight_cap() {
        let mut rate = ChunkBatchRateController::default();
        rate.record_batch(Duration::from_millis(4), 1);
        // (2ms * 1 + 4ms) / 2
        assert_eq!(rate.avg_nanos_per_chunk(), 3_000_000.0);
        assert_eq!(rate.sample_weight(), 2);
    }

    #[test]
    fn test_outlier_moves_estimate_at_most_three_times() {
        let mut rate = ChunkBatchRateController::default();
        let before = rate.avg_nanos_per_chunk();
        // 1000x the running average
        rate.record_batch(Duration::from_secs(2), 1);
        let after = rate.avg_nanos_per_chunk();
        assert!(after <= before * 3.0);
        assert_eq!(after, 4_000_000.0);

        let mut rate = ChunkBatchRateController::default();
        rate.record_batch(Duration::from_nanos(1), 1000);
        assert!(rate.avg_nanos_per_chunk() >= before / 3.0);
    }

    #[test]
    fn test_factor_below_one_clamps_to_the_average() {
        let mut rate = ChunkBatchRateController::new(RateConfig {
            outlier_factor: 0.5,
            ..Default::default()
        });
        rate.record_batch(Duration::from_millis(4), 4);
        assert_eq!(rate.avg_nanos_per_chunk(), 2_000_000.0);
    }

    #[test]
    fn test_on_batch_finished_measures_wall_time() {
        let mut rate = ChunkBatchRateController::default();
        rate.on_batch_start();
        std::thread::sleep(Duration::from_millis(2));
        let elapsed = rate.on_batch_finished(4).expect("non-empty batch");
        assert!(elapsed >= Duration::from_millis(2));
        assert_eq!(rate.sample_weight(), 2);
    }
}
