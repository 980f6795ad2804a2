//! A stand-in for the game server's chunk sender.
//!
//! Streams columns around a slowly walking view center in acknowledged
//! batches, drops columns that leave the view and sprinkles in block and
//! biome edits.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use streammc_gen::{ChunkSource, generate_batch};
use streammc_proto::codec;
use streammc_proto::message::{
    BiomeReplaceMessage, BlockUpdateMessage, ClientboundMessage, ServerboundMessage,
};
use streammc_proto::nbt::Biomes;
use streammc_proto::{BlockPos, ChunkPos, LevelHeight};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

const START_CHUNKS_PER_TICK: f32 = 9.0;
const MIN_CHUNKS_PER_TICK: f32 = 0.01;
const MAX_CHUNKS_PER_TICK: f32 = 64.0;

const EDIT_BLOCKS: [&str; 3] = ["minecraft:stone", "minecraft:glass", "minecraft:air"];

pub struct SimulatedServer {
    source: Arc<dyn ChunkSource>,
    height: LevelHeight,
    view_distance: i32,
    max_batch: usize,
    walk_every: u64,
    tick_period: Duration,
    rng: StdRng,

    center: ChunkPos,
    chunks_per_tick: f32,
    batch_quota: f32,
    pending: VecDeque<ChunkPos>,
    sent: HashSet<ChunkPos>,
    awaiting_ack: bool,
}

impl SimulatedServer {
    pub fn new(source: Arc<dyn ChunkSource>, height: LevelHeight, view_distance: i32, seed: u64) -> Self {
        Self {
            source,
            height,
            view_distance: view_distance.max(0),
            max_batch: MAX_CHUNKS_PER_TICK as usize,
            walk_every: 40,
            tick_period: Duration::from_millis(50),
            rng: StdRng::seed_from_u64(seed),
            center: ChunkPos::default(),
            chunks_per_tick: START_CHUNKS_PER_TICK,
            batch_quota: 0.0,
            pending: VecDeque::new(),
            sent: HashSet::new(),
            awaiting_ack: false,
        }
    }

    pub fn with_max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch.max(1);
        self
    }

    /// Moves the view center one column east every `ticks` ticks. Zero disables walking.
    pub fn with_walk_every(mut self, ticks: u64) -> Self {
        self.walk_every = ticks;
        self
    }

    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    pub fn chunks_per_tick(&self) -> f32 {
        self.chunks_per_tick
    }

    pub async fn run(
        mut self,
        tx: UnboundedSender<ClientboundMessage>,
        mut acks: UnboundedReceiver<ServerboundMessage>,
        ticks: u64,
    ) -> Result<()> {
        send(&tx, ClientboundMessage::SetViewRadius(self.view_distance))?;
        send(&tx, ClientboundMessage::SetViewCenter(self.center))?;
        self.track_view(&tx)?;

        let mut interval = tokio::time::interval(self.tick_period);
        for tick in 0..ticks {
            interval.tick().await;

            while let Ok(ack) = acks.try_recv() {
                self.on_ack(ack);
            }

            if tick > 0 && self.walk_every > 0 && tick % self.walk_every == 0 {
                self.center = ChunkPos::new(self.center.x + 1, self.center.z);
                log::debug!("View center moved to {}", self.center);
                send(&tx, ClientboundMessage::SetViewCenter(self.center))?;
                self.track_view(&tx)?;
            }

            self.send_batch(&tx).await?;
            self.send_edits(&tx)?;
        }

        log::info!("Simulated server finished after {} ticks, {} columns in view", ticks, self.sent.len());
        Ok(())
    }

    pub fn on_ack(&mut self, ack: ServerboundMessage) {
        let ServerboundMessage::ChunkBatchReceived { desired_chunks_per_tick } = ack;
        self.chunks_per_tick = if desired_chunks_per_tick.is_nan() {
            MIN_CHUNKS_PER_TICK
        } else {
            desired_chunks_per_tick.clamp(MIN_CHUNKS_PER_TICK, MAX_CHUNKS_PER_TICK)
        };
        self.awaiting_ack = false;
    }

    fn in_view(&self, pos: ChunkPos) -> bool {
        pos.x.abs_diff(self.center.x) <= self.view_distance as u32
            && pos.z.abs_diff(self.center.z) <= self.view_distance as u32
    }

    /// Drops columns that left the view and queues the ones that entered it, nearest first.
    fn track_view(&mut self, tx: &UnboundedSender<ClientboundMessage>) -> Result<()> {
        let mut left: Vec<ChunkPos> = self.sent.iter().copied().filter(|&pos| !self.in_view(pos)).collect();
        left.sort_by_key(|pos| (pos.x, pos.z));
        for pos in left {
            self.sent.remove(&pos);
            send(tx, ClientboundMessage::ChunkDrop(pos))?;
        }

        let center = self.center;
        let r = self.view_distance;
        self.pending
            .retain(|pos| pos.x.abs_diff(center.x) <= r as u32 && pos.z.abs_diff(center.z) <= r as u32);

        let mut entered = Vec::new();
        for dz in -r..=r {
            for dx in -r..=r {
                let pos = ChunkPos::new(center.x + dx, center.z + dz);
                if !self.sent.contains(&pos) && !self.pending.contains(&pos) {
                    entered.push(pos);
                }
            }
        }
        entered.sort_by_key(|pos| {
            let dx = (pos.x - center.x) as i64;
            let dz = (pos.z - center.z) as i64;
            dx * dx + dz * dz
        });
        self.pending.extend(entered);
        Ok(())
    }

    async fn send_batch(&mut self, tx: &UnboundedSender<ClientboundMessage>) -> Result<()> {
        if self.awaiting_ack {
            return Ok(());
        }

        self.batch_quota = (self.batch_quota + self.chunks_per_tick).min(self.max_batch as f32);
        let count = (self.batch_quota.floor() as usize).min(self.pending.len());
        if count == 0 {
            return Ok(());
        }

        let positions: Vec<ChunkPos> = self.pending.drain(..count).collect();
        self.sent.extend(positions.iter().copied());
        self.batch_quota -= count as f32;

        let source = self.source.clone();
        let height = self.height;
        let batch = tokio::task::spawn_blocking(move || generate_batch(source.as_ref(), &positions, height))
            .await
            .context("Chunk generation task failed")??;

        send(tx, ClientboundMessage::ChunkBatchStart)?;
        for message in batch {
            send(tx, ClientboundMessage::ChunkWithLight(message))?;
        }
        send(tx, ClientboundMessage::ChunkBatchFinished { batch_size: count as i32 })?;
        self.awaiting_ack = true;

        log::debug!("Sent batch of {} columns, {} pending", count, self.pending.len());
        Ok(())
    }

    fn send_edits(&mut self, tx: &UnboundedSender<ClientboundMessage>) -> Result<()> {
        if self.sent.is_empty() {
            return Ok(());
        }

        if self.rng.gen_bool(0.2) {
            let chunk = self.random_sent_chunk();
            let pos = BlockPos::new(
                chunk.x * 16 + self.rng.gen_range(0..16),
                self.rng.gen_range(60..80),
                chunk.z * 16 + self.rng.gen_range(0..16),
            );
            let block = EDIT_BLOCKS[self.rng.gen_range(0..EDIT_BLOCKS.len())];
            send(tx, ClientboundMessage::BlockUpdate(BlockUpdateMessage { pos, block: block.to_string() }))?;
        }

        if self.rng.gen_bool(0.02) {
            let pos = self.random_sent_chunk();
            let biomes = vec![Biomes::uniform("minecraft:desert"); self.height.section_count as usize];
            let biome_payload = codec::encode_biomes(&biomes)?;
            send(tx, ClientboundMessage::BiomeReplace(BiomeReplaceMessage { pos, biome_payload }))?;
        }

        Ok(())
    }

    fn random_sent_chunk(&mut self) -> ChunkPos {
        let mut sent: Vec<ChunkPos> = self.sent.iter().copied().collect();
        sent.sort_by_key(|pos| (pos.x, pos.z));
        sent[self.rng.gen_range(0..sent.len())]
    }
}

fn send(tx: &UnboundedSender<ClientboundMessage>, message: ClientboundMessage) -> Result<()> {
    tx.send(message).map_err(|_| anyhow!("Client disconnected"))
}
