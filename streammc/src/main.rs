use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;
use tokio::sync::mpsc;

use streammc_benchmark::StreamMetrics;
use streammc_cache::{ClientEvent, EventSink, Observers};
use streammc_client::{ChunkStreamCoordinator, StreamConfig};
use streammc_gen::ChunkSource;
use streammc_gen::flat::FlatSource;
use streammc_gen::hills::HillsSource;

mod server;

use server::SimulatedServer;

#[derive(Parser)]
#[command(name = "streammc", about = "Client-side chunk streaming cache driven by a simulated server")]
pub struct Args {
    /// Server view distance in chunks
    #[arg(short = 'r', long, env = "STREAMMC_VIEW_DISTANCE", default_value = "4")]
    pub view_distance: i32,

    /// Client ticks to run (50 ms each)
    #[arg(short, long, env = "STREAMMC_TICKS", default_value = "200")]
    pub ticks: u64,

    /// Chunk source: "flat" or "hills"
    #[arg(short = 'g', long, env = "STREAMMC_SOURCE", default_value = "flat")]
    pub source: String,

    /// World seed (for the hills source and simulated edits)
    #[arg(short, long, env = "STREAMMC_SEED", default_value = "0")]
    pub seed: u64,

    /// Upper bound on columns per server batch
    #[arg(short = 'b', long, env = "STREAMMC_CHUNKS_PER_BATCH", default_value = "64")]
    pub chunks_per_batch: usize,

    /// Ticks between view center moves, 0 to stand still
    #[arg(short, long, env = "STREAMMC_WALK_EVERY", default_value = "40")]
    pub walk_every: u64,

    /// JSON stream config; missing fields keep their defaults
    #[arg(short, long, env = "STREAMMC_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Running totals of what the cache reported.
#[derive(Debug, Default)]
struct EventTally {
    loaded: usize,
    unloaded: usize,
    became_non_empty: usize,
    dirty: usize,
    light_queued: usize,
    light_toggled: usize,
    status_updates: usize,
}

impl EventTally {
    fn record(&mut self, event: &ClientEvent) {
        match event {
            ClientEvent::ChunkLoaded(_) => self.loaded += 1,
            ClientEvent::ChunkUnloaded(_) => self.unloaded += 1,
            ClientEvent::SectionBecameNonEmpty(_) => self.became_non_empty += 1,
            ClientEvent::SectionDirty(_) => self.dirty += 1,
            ClientEvent::LightQueued { .. } => self.light_queued += 1,
            ClientEvent::LightEnabled { .. } => self.light_toggled += 1,
            ClientEvent::SectionStatus { .. } => self.status_updates += 1,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => StreamConfig::load(path)?,
        None => StreamConfig::default(),
    };
    config.storage.initial_view_distance = args.view_distance;

    let source: Arc<dyn ChunkSource> = match args.source.as_str() {
        "flat" => Arc::new(FlatSource),
        "hills" => Arc::new(HillsSource::new(args.seed)),
        other => bail!("Unknown chunk source {:?}, expected \"flat\" or \"hills\"", other),
    };

    println!("StreamMC: {} source, view distance {}, {} ticks", args.source, args.view_distance, args.ticks);
    log::info!("Config: {}", config.summary());

    let metrics = Arc::new(StreamMetrics::new(config.summary()));
    let (sink, mut events) = EventSink::channel();
    let mut coordinator = ChunkStreamCoordinator::new(
        config.clone(),
        Observers::shared(sink.clone()),
        sink,
        metrics.clone(),
    );

    let (server_tx, mut inbound) = mpsc::unbounded_channel();
    let (ack_tx, ack_rx) = mpsc::unbounded_channel();
    let server = SimulatedServer::new(source, config.level, args.view_distance, args.seed)
        .with_max_batch(args.chunks_per_batch)
        .with_walk_every(args.walk_every);
    let server_task = tokio::spawn(server.run(server_tx, ack_rx, args.ticks));

    let mut tally = EventTally::default();
    let mut interval = tokio::time::interval(Duration::from_millis(50));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    for tick in 0..args.ticks {
        tokio::select! {
            _ = &mut shutdown => {
                println!("Interrupted at tick {}", tick);
                break;
            }
            _ = interval.tick() => {}
        }

        while let Ok(message) = inbound.try_recv() {
            if let Some(reply) = coordinator.handle(message) {
                if ack_tx.send(reply).is_err() {
                    log::debug!("Server gone, dropping batch ack");
                }
            }
        }

        let ran = coordinator.tick();
        while let Ok(event) = events.try_recv() {
            tally.record(&event);
        }

        if tick % 20 == 0 {
            log::info!(
                "Tick {}: ring {} | light ran {}, pending {} | {:.2} chunks/tick",
                tick,
                coordinator.gather_stats(),
                ran,
                coordinator.pending_light_tasks(),
                coordinator.rate().desired_chunks_per_tick(),
            );
        }
    }

    server_task.abort();
    match server_task.await {
        Ok(Err(e)) => log::warn!("Simulated server stopped: {:#}", e),
        Ok(Ok(())) => {}
        Err(e) if e.is_cancelled() => {}
        Err(e) => log::warn!("Simulated server panicked: {}", e),
    }

    println!("Chunk ring (capacity, resident): {}", coordinator.gather_stats());
    println!("Events: {:?}", tally);
    println!("{}", metrics.generate_report());
    Ok(())
}
