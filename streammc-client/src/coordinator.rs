//! Chunk stream coordination.
//!
//! Chunk data is applied as soon as it arrives; light data always goes
//! through the FIFO light queue so it lands after the chunk it belongs to.

use std::sync::Arc;
use std::time::Instant;

use streammc_benchmark::StreamMetrics;
use streammc_cache::{ChunkColumn, ChunkEntry, ChunkRingStore, LightEngine, LightLayer, Observers};
use streammc_proto::codec;
use streammc_proto::message::{
    BiomeReplaceMessage, BlockUpdateMessage, ChunkDataMessage, ChunkWithLightMessage,
    ClientboundMessage, LightDataMessage, SectionMask, ServerboundMessage,
};
use streammc_proto::{ChunkPos, SectionPos};

use crate::config::StreamConfig;
use crate::light_queue::LightUpdateQueue;
use crate::rate::ChunkBatchRateController;

const LIGHT_ARRAY_BYTES: usize = 2048;

/// Deferred light work, run from [`ChunkStreamCoordinator::tick`].
#[derive(Debug)]
enum LightTask {
    Apply {
        light: LightDataMessage,
        mark_dirty: bool,
        enable_chunk: bool,
    },
    Release {
        pos: ChunkPos,
    },
}

pub struct ChunkStreamCoordinator {
    config: StreamConfig,
    store: Arc<ChunkRingStore>,
    observers: Observers,
    light: Arc<dyn LightEngine>,
    light_queue: LightUpdateQueue<LightTask>,
    rate: ChunkBatchRateController,
    metrics: Arc<StreamMetrics>,
}

impl ChunkStreamCoordinator {
    pub fn new(
        config: StreamConfig,
        observers: Observers,
        light: Arc<dyn LightEngine>,
        metrics: Arc<StreamMetrics>,
    ) -> Self {
        let radius = config.storage.ring_radius(config.storage.initial_view_distance);
        let store = ChunkRingStore::configure(radius, config.level, observers.clone());

        Self {
            store: Arc::new(store),
            observers,
            light,
            light_queue: LightUpdateQueue::new(config.light_queue),
            rate: ChunkBatchRateController::new(config.rate),
            metrics,
            config,
        }
    }

    /// The current ring. Replaced wholesale when the view radius changes.
    pub fn store(&self) -> &Arc<ChunkRingStore> {
        &self.store
    }

    pub fn rate(&self) -> &ChunkBatchRateController {
        &self.rate
    }

    pub fn pending_light_tasks(&self) -> usize {
        self.light_queue.len()
    }

    /// Applies one inbound message. Returns the reply to send, if any.
    pub fn handle(&mut self, message: ClientboundMessage) -> Option<ServerboundMessage> {
        match message {
            ClientboundMessage::ChunkData(msg) => self.on_chunk_data(msg),
            ClientboundMessage::ChunkWithLight(msg) => self.on_chunk_with_light(msg),
            ClientboundMessage::ChunkDrop(pos) => self.on_chunk_drop(pos),
            ClientboundMessage::LightData(light) => self.on_light_data(light),
            ClientboundMessage::BiomeReplace(msg) => self.on_biome_replace(msg),
            ClientboundMessage::BlockUpdate(msg) => self.on_block_update(msg),
            ClientboundMessage::SetViewCenter(pos) => self.set_view_center(pos),
            ClientboundMessage::SetViewRadius(radius) => self.set_view_radius(radius),
            ClientboundMessage::ChunkBatchStart => self.on_batch_start(),
            ClientboundMessage::ChunkBatchFinished { batch_size } => {
                return Some(self.on_batch_finished(batch_size));
            }
        }
        None
    }

    pub fn on_chunk_data(&mut self, msg: ChunkDataMessage) {
        let pos = msg.pos;
        if !self.store.in_range(pos) {
            log::warn!("Ignoring chunk {} outside of view around {}", pos, self.store.center());
            self.metrics.record_ignored();
            return;
        }

        let start = Instant::now();
        let sections = match codec::decode_sections(&msg.section_payload) {
            Ok(sections) => sections,
            Err(e) => {
                log::warn!("Dropping chunk {}: {:#}", pos, e);
                self.metrics.record_decode_failure();
                return;
            }
        };
        self.metrics.record_decode(start.elapsed(), msg.section_payload.len());

        let column = ChunkColumn::new(self.config.level, sections, msg.heightmaps, msg.block_entities);
        match self.store.get(pos) {
            None => {
                let entry = Arc::new(ChunkEntry::new(pos, self.config.level, column));
                self.store.install(pos, Some(entry));
                self.metrics.record_install();
            }
            Some(entry) => {
                entry.replace_column(column);
                self.store.refresh_sections(&entry);
                self.metrics.record_refresh();
            }
        }

        self.observers.lifecycle.on_chunk_loaded(pos);
    }

    pub fn on_chunk_with_light(&mut self, msg: ChunkWithLightMessage) {
        self.on_chunk_data(msg.chunk);
        self.queue_light(LightTask::Apply {
            light: msg.light,
            mark_dirty: false,
            enable_chunk: true,
        });
    }

    pub fn on_chunk_drop(&mut self, pos: ChunkPos) {
        if let Some(entry) = self.store.get(pos) {
            self.store.drop_if_current(pos, &entry);
            self.metrics.record_drop();
        }
        self.queue_light(LightTask::Release { pos });
    }

    /// Light is never applied inline; see [`Self::tick`].
    pub fn on_light_data(&mut self, light: LightDataMessage) {
        self.queue_light(LightTask::Apply {
            light,
            mark_dirty: true,
            enable_chunk: false,
        });
    }

    pub fn on_biome_replace(&mut self, msg: BiomeReplaceMessage) {
        let pos = msg.pos;
        if !self.store.in_range(pos) {
            log::warn!("Ignoring biomes for chunk {} outside of view", pos);
            return;
        }
        let Some(entry) = self.store.get(pos) else {
            log::warn!("Ignoring biomes for chunk {} that is not loaded", pos);
            return;
        };

        match codec::decode_biomes(&msg.biome_payload) {
            Ok(biomes) => {
                entry.replace_biomes(biomes);
                self.metrics.record_biome_replacement();
                for section_y in self.config.level.sections() {
                    self.observers.sections.on_section_dirty(pos.section(section_y));
                }
            }
            Err(e) => {
                log::warn!("Dropping biomes for chunk {}: {:#}", pos, e);
                self.metrics.record_decode_failure();
            }
        }
    }

    pub fn on_block_update(&mut self, msg: BlockUpdateMessage) {
        let pos = msg.pos.chunk();
        let Some(entry) = self.store.get(pos) else {
            log::debug!("Ignoring block update at {:?}, chunk {} not loaded", msg.pos, pos);
            return;
        };
        let Some(change) = entry.set_block(msg.pos, &msg.block) else {
            log::warn!("Ignoring block update at {:?} outside of the level", msg.pos);
            return;
        };
        self.metrics.record_block_update();

        let section = pos.section(change.section_y);
        if change.was_air_only != change.is_air_only {
            self.store
                .on_section_emptiness_changed(pos.x, change.section_y, pos.z, change.is_air_only);
            self.light.update_section_status(section, change.is_air_only);
        }
        self.observers.sections.on_section_dirty(section);
    }

    pub fn set_view_center(&mut self, center: ChunkPos) {
        self.store.update_center(center);
    }

    /// Rebuilds the ring for a new server view distance.
    pub fn set_view_radius(&mut self, view_distance: i32) {
        let radius = self.config.storage.ring_radius(view_distance);
        if radius == self.store.radius() {
            return;
        }

        log::debug!("Resizing chunk ring from {} to {}", self.store.radius(), radius);
        let resized = self.store.resized(radius);
        self.store = Arc::new(resized);
    }

    pub fn on_batch_start(&mut self) {
        self.rate.on_batch_start();
    }

    pub fn on_batch_finished(&mut self, batch_size: i32) -> ServerboundMessage {
        if let Some(elapsed) = self.rate.on_batch_finished(batch_size) {
            self.metrics.record_batch(elapsed, batch_size as usize);
        }
        ServerboundMessage::ChunkBatchReceived {
            desired_chunks_per_tick: self.rate.desired_chunks_per_tick(),
        }
    }

    /// Runs this tick's share of deferred light work. Returns how many tasks ran.
    pub fn tick(&mut self) -> usize {
        let tasks = self.light_queue.drain_tick();
        let count = tasks.len();
        for task in tasks {
            match task {
                LightTask::Apply { light, mark_dirty, enable_chunk } => {
                    self.apply_light_data(&light, mark_dirty);
                    if enable_chunk {
                        self.enable_chunk_light(light.pos);
                    }
                }
                LightTask::Release { pos } => self.release_light(pos),
            }
        }
        self.metrics.record_light_run(count);
        count
    }

    pub fn gather_stats(&self) -> String {
        format!("{}, {}", self.store.capacity(), self.store.resident_count())
    }

    fn queue_light(&mut self, task: LightTask) {
        self.light_queue.push(task);
        self.metrics.record_light_queued(self.light_queue.len());
    }

    fn apply_light_data(&self, light: &LightDataMessage, mark_dirty: bool) {
        let pos = light.pos;
        self.apply_layer(pos, LightLayer::Sky, light.sky_y_mask, light.empty_sky_y_mask, &light.sky_updates, mark_dirty);
        self.apply_layer(pos, LightLayer::Block, light.block_y_mask, light.empty_block_y_mask, &light.block_updates, mark_dirty);
        self.light.set_light_enabled(pos, true);
    }

    fn apply_layer(
        &self,
        pos: ChunkPos,
        layer: LightLayer,
        mask: SectionMask,
        empty_mask: SectionMask,
        updates: &[Vec<u8>],
        mark_dirty: bool,
    ) {
        let dark = [0u8; LIGHT_ARRAY_BYTES];
        let mut updates = updates.iter();

        for (index, section_y) in self.config.level.light_sections().enumerate() {
            let has_data = mask.get(index);
            if !has_data && !empty_mask.get(index) {
                continue;
            }

            let data = if has_data {
                match updates.next() {
                    Some(bytes) if bytes.len() == LIGHT_ARRAY_BYTES => bytes.as_slice(),
                    Some(bytes) => {
                        log::warn!("Light array for {} has {} bytes, expected {}", pos, bytes.len(), LIGHT_ARRAY_BYTES);
                        continue;
                    }
                    None => {
                        log::warn!("Light mask for {} promises more arrays than were sent", pos);
                        break;
                    }
                }
            } else {
                &dark[..]
            };

            let section = pos.section(section_y);
            self.light.queue_section_data(layer, section, Some(data));
            if mark_dirty {
                self.observers.sections.on_section_dirty(section);
            }
        }
    }

    /// Tells the light engine which sections of a freshly loaded column hold blocks.
    fn enable_chunk_light(&self, pos: ChunkPos) {
        let Some(entry) = self.store.get(pos) else {
            return;
        };

        for (section_y, air_only) in entry.section_emptiness() {
            self.light.update_section_status(pos.section(section_y), air_only);
        }

        // Neighbors share faces with this column, so their meshes go stale too.
        for dz in -1..=1 {
            for dx in -1..=1 {
                for section_y in self.config.level.sections() {
                    let section = SectionPos::new(pos.x + dx, section_y, pos.z + dz);
                    self.observers.sections.on_section_dirty(section);
                }
            }
        }
    }

    fn release_light(&self, pos: ChunkPos) {
        self.light.set_light_enabled(pos, false);
        for section_y in self.config.level.light_sections() {
            let section = pos.section(section_y);
            self.light.queue_section_data(LightLayer::Block, section, None);
            self.light.queue_section_data(LightLayer::Sky, section, None);
        }
        for section_y in self.config.level.sections() {
            self.light.update_section_status(pos.section(section_y), true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use std::collections::HashMap;
    use streammc_cache::observer::drain_events;
    use streammc_cache::{ClientEvent, EventSink};
    use streammc_gen::flat::FlatSource;
    use streammc_gen::{ChunkSource, open_sky_light};
    use streammc_proto::nbt::{Biomes, BlockState, BlockStates, Section};
    use streammc_proto::{BlockPos, LevelHeight};
    use tokio::sync::mpsc::UnboundedReceiver;

    /// Ring radius equal to the view distance, 2 by default.
    fn coordinator() -> (ChunkStreamCoordinator, UnboundedReceiver<ClientEvent>) {
        let config = StreamConfig {
            storage: StorageConfig {
                initial_view_distance: 2,
                min_view_distance: 0,
                margin: 0,
            },
            ..Default::default()
        };
        let (sink, rx) = EventSink::channel();
        let coordinator = ChunkStreamCoordinator::new(
            config,
            Observers::shared(sink.clone()),
            sink,
            Arc::new(StreamMetrics::default()),
        );
        (coordinator, rx)
    }

    fn flat_chunk(x: i32, z: i32) -> ChunkDataMessage {
        FlatSource
            .chunk_message(ChunkPos::new(x, z), LevelHeight::default())
            .expect("flat chunk")
    }

    #[test]
    fn test_chunk_data_installs_and_notifies() {
        let (mut coordinator, mut rx) = coordinator();
        coordinator.on_chunk_data(flat_chunk(1, -1));

        let entry = coordinator.store().get(ChunkPos::new(1, -1)).expect("installed");
        assert_eq!(entry.air_only_sections().len(), 21);
        assert!(coordinator.store().is_section_empty(SectionPos::new(1, 5, -1)));
        assert_eq!(drain_events(&mut rx), vec![ClientEvent::ChunkLoaded(ChunkPos::new(1, -1))]);
        assert_eq!(coordinator.gather_stats(), "25, 1");
    }

    #[test]
    fn test_out_of_range_chunk_is_ignored() {
        let (mut coordinator, mut rx) = coordinator();
        coordinator.on_chunk_data(flat_chunk(3, 0));
        assert_eq!(coordinator.store().resident_count(), 0);
        assert!(drain_events(&mut rx).is_empty());
    }

    #[test]
    fn test_corrupt_payload_is_ignored() {
        let (mut coordinator, mut rx) = coordinator();
        let mut msg = flat_chunk(0, 0);
        msg.section_payload.truncate(3);
        coordinator.on_chunk_data(msg);
        assert_eq!(coordinator.store().resident_count(), 0);
        assert!(drain_events(&mut rx).is_empty());
    }

    #[test]
    fn test_resent_chunk_refreshes_in_place() {
        let (mut coordinator, mut rx) = coordinator();
        coordinator.on_chunk_data(flat_chunk(0, 0));
        let first = coordinator.store().get(ChunkPos::new(0, 0)).expect("installed");

        // Same column, now with a block high up in section 10
        let mut builder = FlatSource.build_column(ChunkPos::new(0, 0), LevelHeight::default()).expect("builder");
        builder.set_block(0, 165, 0, "minecraft:glowstone");
        let mut msg = flat_chunk(0, 0);
        msg.section_payload = codec::encode_sections(&builder.build(LevelHeight::default())).expect("encode");
        drain_events(&mut rx);

        coordinator.on_chunk_data(msg);
        let second = coordinator.store().get(ChunkPos::new(0, 0)).expect("still resident");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            drain_events(&mut rx),
            vec![
                ClientEvent::SectionBecameNonEmpty(SectionPos::new(0, 10, 0)),
                ClientEvent::ChunkLoaded(ChunkPos::new(0, 0)),
            ]
        );
        assert_eq!(coordinator.store().resident_count(), 1);
    }

    #[test]
    fn test_light_waits_for_tick() {
        let (mut coordinator, mut rx) = coordinator();
        coordinator.on_chunk_data(flat_chunk(0, 0));
        coordinator.on_light_data(open_sky_light(ChunkPos::new(0, 0), LevelHeight::default()));
        assert_eq!(drain_events(&mut rx), vec![ClientEvent::ChunkLoaded(ChunkPos::new(0, 0))]);
        assert_eq!(coordinator.pending_light_tasks(), 1);

        assert_eq!(coordinator.tick(), 1);
        let events = drain_events(&mut rx);
        let sky = events
            .iter()
            .filter(|e| matches!(e, ClientEvent::LightQueued { layer: LightLayer::Sky, present: true, .. }))
            .count();
        let block = events
            .iter()
            .filter(|e| matches!(e, ClientEvent::LightQueued { layer: LightLayer::Block, present: true, .. }))
            .count();
        let dirty = events.iter().filter(|e| matches!(e, ClientEvent::SectionDirty(_))).count();
        assert_eq!(sky, 26);
        assert_eq!(block, 26);
        assert_eq!(dirty, 52);
        assert_eq!(
            events.last(),
            Some(&ClientEvent::LightEnabled { pos: ChunkPos::new(0, 0), enabled: true })
        );
    }

    #[test]
    fn test_chunk_with_light_sees_installed_chunk() {
        let (mut coordinator, mut rx) = coordinator();
        let pos = ChunkPos::new(-2, 2);
        coordinator.on_chunk_with_light(ChunkWithLightMessage {
            chunk: flat_chunk(pos.x, pos.z),
            light: open_sky_light(pos, LevelHeight::default()),
        });
        coordinator.tick();

        let statuses: Vec<(SectionPos, bool)> = drain_events(&mut rx)
            .into_iter()
            .filter_map(|e| match e {
                ClientEvent::SectionStatus { section, is_empty } => Some((section, is_empty)),
                _ => None,
            })
            .collect();
        assert_eq!(statuses.len(), 24);
        assert!(statuses.contains(&(SectionPos::new(-2, 0, 2), false)));
        assert!(statuses.contains(&(SectionPos::new(-2, 1, 2), true)));
    }

    #[test]
    fn test_light_after_drop_sees_no_chunk() {
        let (mut coordinator, mut rx) = coordinator();
        let pos = ChunkPos::new(0, 1);
        coordinator.on_chunk_with_light(ChunkWithLightMessage {
            chunk: flat_chunk(pos.x, pos.z),
            light: open_sky_light(pos, LevelHeight::default()),
        });
        coordinator.on_chunk_drop(pos);
        assert_eq!(coordinator.store().resident_count(), 0);

        assert_eq!(coordinator.tick(), 2);
        let events = drain_events(&mut rx);
        assert!(events.contains(&ClientEvent::ChunkUnloaded(pos)));
        // Enabling chunk light found nothing resident, only the release reports status
        let statuses = events
            .iter()
            .filter(|e| matches!(e, ClientEvent::SectionStatus { is_empty: false, .. }))
            .count();
        assert_eq!(statuses, 0);
        assert_eq!(
            events.iter().filter(|e| matches!(e, ClientEvent::LightQueued { present: false, .. })).count(),
            52
        );
        assert!(events.contains(&ClientEvent::LightEnabled { pos, enabled: false }));
    }

    #[test]
    fn test_drop_of_absent_chunk_still_releases_light() {
        let (mut coordinator, mut rx) = coordinator();
        coordinator.on_chunk_drop(ChunkPos::new(40, 40));
        assert_eq!(coordinator.pending_light_tasks(), 1);
        coordinator.tick();
        let events = drain_events(&mut rx);
        assert!(!events.iter().any(|e| matches!(e, ClientEvent::ChunkUnloaded(_))));
        assert!(events.contains(&ClientEvent::LightEnabled { pos: ChunkPos::new(40, 40), enabled: false }));
    }

    #[test]
    fn test_block_update_transitions_section() {
        let (mut coordinator, mut rx) = coordinator();
        coordinator.on_chunk_data(flat_chunk(0, 0));
        drain_events(&mut rx);

        let pos = BlockPos::new(4, 100, 4);
        coordinator.on_block_update(BlockUpdateMessage { pos, block: "minecraft:stone".to_string() });
        assert!(!coordinator.store().is_section_empty(SectionPos::new(0, 6, 0)));
        assert_eq!(
            drain_events(&mut rx),
            vec![
                ClientEvent::SectionBecameNonEmpty(SectionPos::new(0, 6, 0)),
                ClientEvent::SectionStatus { section: SectionPos::new(0, 6, 0), is_empty: false },
                ClientEvent::SectionDirty(SectionPos::new(0, 6, 0)),
            ]
        );

        coordinator.on_block_update(BlockUpdateMessage { pos, block: "minecraft:air".to_string() });
        assert!(coordinator.store().is_section_empty(SectionPos::new(0, 6, 0)));
    }

    #[test]
    fn test_block_update_survives_out_of_palette_data() {
        let (mut coordinator, mut rx) = coordinator();
        let section = Section {
            y: 0,
            block_states: Some(BlockStates {
                palette: vec![
                    BlockState { name: "minecraft:air".to_string() },
                    BlockState { name: "minecraft:stone".to_string() },
                ],
                data: Some(fastnbt::LongArray::new(vec![-1i64; 256])),
            }),
            biomes: None,
        };
        coordinator.on_chunk_data(ChunkDataMessage {
            pos: ChunkPos::new(0, 0),
            section_payload: codec::encode_sections(&[section]).expect("encode"),
            heightmaps: HashMap::new(),
            block_entities: Vec::new(),
        });
        assert!(coordinator.store().is_section_empty(SectionPos::new(0, 0, 0)));
        drain_events(&mut rx);

        let pos = BlockPos::new(1, 1, 1);
        coordinator.on_block_update(BlockUpdateMessage { pos, block: "minecraft:dirt".to_string() });

        let entry = coordinator.store().get(ChunkPos::new(0, 0)).expect("resident");
        assert_eq!(entry.block(pos).as_deref(), Some("minecraft:dirt"));
        assert!(!coordinator.store().is_section_empty(SectionPos::new(0, 0, 0)));
        assert!(drain_events(&mut rx).contains(&ClientEvent::SectionBecameNonEmpty(SectionPos::new(0, 0, 0))));
    }

    #[test]
    fn test_biome_replace_updates_resident_chunk() {
        let (mut coordinator, mut rx) = coordinator();
        coordinator.on_chunk_data(flat_chunk(1, 1));
        drain_events(&mut rx);

        let biomes = vec![Biomes::uniform("minecraft:desert"); 24];
        coordinator.on_biome_replace(BiomeReplaceMessage {
            pos: ChunkPos::new(1, 1),
            biome_payload: codec::encode_biomes(&biomes).expect("encode"),
        });

        let entry = coordinator.store().get(ChunkPos::new(1, 1)).expect("resident");
        let column = entry.read();
        assert!(column.sections.iter().all(|s| s.biomes.as_ref() == Some(&biomes[0])));
        drop(column);
        assert_eq!(drain_events(&mut rx).len(), 24);
    }

    #[test]
    fn test_view_center_moves_range() {
        let (mut coordinator, _rx) = coordinator();
        coordinator.handle(ClientboundMessage::SetViewCenter(ChunkPos::new(10, 10)));
        coordinator.on_chunk_data(flat_chunk(0, 0));
        assert_eq!(coordinator.store().resident_count(), 0);
        coordinator.on_chunk_data(flat_chunk(12, 8));
        assert!(coordinator.store().get(ChunkPos::new(12, 8)).is_some());
    }

    #[test]
    fn test_view_radius_rebuilds_ring() {
        let (mut coordinator, mut rx) = coordinator();
        for x in -2..=2 {
            coordinator.on_chunk_data(flat_chunk(x, 0));
        }
        drain_events(&mut rx);

        coordinator.handle(ClientboundMessage::SetViewRadius(1));
        assert_eq!(coordinator.gather_stats(), "9, 3");
        let unloaded: Vec<ClientEvent> = drain_events(&mut rx);
        assert_eq!(unloaded.len(), 2);

        coordinator.handle(ClientboundMessage::SetViewRadius(4));
        assert_eq!(coordinator.gather_stats(), "81, 3");
        assert!(coordinator.store().get(ChunkPos::new(-1, 0)).is_some());
    }

    #[test]
    fn test_batch_finished_replies_with_rate() {
        let (mut coordinator, _rx) = coordinator();
        assert_eq!(coordinator.handle(ClientboundMessage::ChunkBatchStart), None);
        let reply = coordinator.handle(ClientboundMessage::ChunkBatchFinished { batch_size: 0 });
        assert_eq!(
            reply,
            Some(ServerboundMessage::ChunkBatchReceived { desired_chunks_per_tick: 3.5 })
        );
        assert_eq!(coordinator.rate().sample_weight(), 1);

        coordinator.handle(ClientboundMessage::ChunkBatchStart);
        coordinator.handle(ClientboundMessage::ChunkBatchFinished { batch_size: 16 });
        assert_eq!(coordinator.rate().sample_weight(), 2);
    }

    #[test]
    fn test_light_queue_drains_over_ticks() {
        let (mut coordinator, _rx) = coordinator();
        for _ in 0..25 {
            coordinator.on_chunk_drop(ChunkPos::new(0, 0));
        }
        assert_eq!(coordinator.tick(), 10);
        assert_eq!(coordinator.tick(), 10);
        assert_eq!(coordinator.tick(), 5);
        assert_eq!(coordinator.tick(), 0);
    }
}
