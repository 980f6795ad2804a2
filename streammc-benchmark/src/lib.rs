use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct StreamMetrics {
    // Chunk Stats
    pub total_chunks_installed: AtomicUsize,
    pub total_chunks_refreshed: AtomicUsize,
    pub total_chunks_ignored: AtomicUsize,
    pub total_chunks_dropped: AtomicUsize,
    pub total_decode_failures: AtomicUsize,
    pub total_decode_time_us: AtomicU64,
    pub total_payload_bytes: AtomicUsize,

    // Partial Updates
    pub total_biome_replacements: AtomicUsize,
    pub total_block_updates: AtomicUsize,

    // Light Queue
    pub total_light_tasks_queued: AtomicUsize,
    pub total_light_tasks_run: AtomicUsize,
    pub max_light_backlog: AtomicUsize,

    // Batches
    pub total_batches: AtomicUsize,
    pub total_batch_chunks: AtomicUsize,
    pub total_batch_time_us: AtomicU64,

    // Session
    pub start_time: Option<Instant>,
    pub config_summary: String,
}

impl StreamMetrics {
    pub fn new(config_summary: String) -> Self {
        Self {
            start_time: Some(Instant::now()),
            config_summary,
            ..Default::default()
        }
    }

    pub fn record_install(&self) {
        self.total_chunks_installed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_refresh(&self) {
        self.total_chunks_refreshed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ignored(&self) {
        self.total_chunks_ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_drop(&self) {
        self.total_chunks_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decode(&self, duration: Duration, payload_bytes: usize) {
        self.total_decode_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.total_payload_bytes.fetch_add(payload_bytes, Ordering::Relaxed);
    }

    pub fn record_decode_failure(&self) {
        self.total_decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_biome_replacement(&self) {
        self.total_biome_replacements.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_block_update(&self) {
        self.total_block_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_light_queued(&self, backlog: usize) {
        self.total_light_tasks_queued.fetch_add(1, Ordering::Relaxed);
        self.max_light_backlog.fetch_max(backlog, Ordering::Relaxed);
    }

    pub fn record_light_run(&self, count: usize) {
        self.total_light_tasks_run.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_batch(&self, duration: Duration, chunks: usize) {
        self.total_batches.fetch_add(1, Ordering::Relaxed);
        self.total_batch_chunks.fetch_add(chunks, Ordering::Relaxed);
        self.total_batch_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn generate_report(&self) -> String {
        let uptime = self.start_time.unwrap_or_else(Instant::now).elapsed();

        let installed = self.total_chunks_installed.load(Ordering::Relaxed);
        let refreshed = self.total_chunks_refreshed.load(Ordering::Relaxed);
        let ignored = self.total_chunks_ignored.load(Ordering::Relaxed);
        let dropped = self.total_chunks_dropped.load(Ordering::Relaxed);
        let failures = self.total_decode_failures.load(Ordering::Relaxed);

        let decoded = installed + refreshed;
        let decode_time = self.total_decode_time_us.load(Ordering::Relaxed) as f64 / 1000.0; // ms
        let decode_avg = if decoded > 0 { decode_time / decoded as f64 } else { 0.0 };
        let payload_kb = self.total_payload_bytes.load(Ordering::Relaxed) as f64 / 1024.0;
        let payload_avg_kb = if decoded > 0 { payload_kb / decoded as f64 } else { 0.0 };

        let biomes = self.total_biome_replacements.load(Ordering::Relaxed);
        let blocks = self.total_block_updates.load(Ordering::Relaxed);

        let light_queued = self.total_light_tasks_queued.load(Ordering::Relaxed);
        let light_run = self.total_light_tasks_run.load(Ordering::Relaxed);
        let light_backlog = self.max_light_backlog.load(Ordering::Relaxed);

        let batches = self.total_batches.load(Ordering::Relaxed);
        let batch_chunks = self.total_batch_chunks.load(Ordering::Relaxed);
        let batch_time = self.total_batch_time_us.load(Ordering::Relaxed) as f64 / 1000.0; // ms
        let batch_avg = if batches > 0 { batch_time / batches as f64 } else { 0.0 };
        let per_chunk = if batch_chunks > 0 { batch_time / batch_chunks as f64 } else { 0.0 };

        let throughput = if uptime.as_secs_f64() > 0.0 {
            decoded as f64 / uptime.as_secs_f64()
        } else {
            0.0
        };

        format!(
            "StreamMC Client Report\n\
             ======================\n\
             Configuration: {}\n\
             Session Duration: {:.2?}\n\n\
             [Chunks]\n\
             Installed: {}\n\
             Refreshed In Place: {}\n\
             Ignored (Out Of Range): {}\n\
             Dropped: {}\n\
             Decode Failures: {}\n\
             Avg Decode: {:.3} ms/chunk\n\
             Avg Payload: {:.1} KB\n\
             Throughput: {:.1} chunks/s\n\n\
             [Partial Updates]\n\
             Biome Replacements: {}\n\
             Block Updates: {}\n\n\
             [Light Queue]\n\
             Queued: {}\n\
             Applied: {}\n\
             Peak Backlog: {}\n\n\
             [Batches]\n\
             Batches: {}\n\
             Chunks: {}\n\
             Avg Batch: {:.2} ms\n\
             Avg Cost: {:.3} ms/chunk\n",
            self.config_summary,
            uptime,
            installed, refreshed, ignored, dropped, failures,
            decode_avg, payload_avg_kb, throughput,
            biomes, blocks,
            light_queued, light_run, light_backlog,
            batches, batch_chunks, batch_avg, per_chunk
        )
    }
}
