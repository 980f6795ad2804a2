//! Deterministic chunk sources for driving a chunk stream without a real server.

use std::collections::HashMap;

use anyhow::Result;
use rayon::prelude::*;
use streammc_proto::codec;
use streammc_proto::message::{
    BlockEntityInfo, ChunkDataMessage, ChunkWithLightMessage, HeightmapKind, LightDataMessage,
    SectionMask,
};
use streammc_proto::nbt::Section;
use streammc_proto::{ChunkPos, LevelHeight};

pub mod builder;
pub mod flat;
pub mod hills;

use builder::SectionBuilder;

/// Bytes in one light nibble array (4 bits x 4096 blocks).
pub const LIGHT_ARRAY_BYTES: usize = 2048;

pub trait ChunkSource: Send + Sync {
    fn build_column(&self, pos: ChunkPos, height: LevelHeight) -> Result<SectionBuilder>;

    fn generate_column(&self, pos: ChunkPos, height: LevelHeight) -> Result<Vec<Section>> {
        Ok(self.build_column(pos, height)?.build(height))
    }

    /// A ready-to-send chunk message for `pos`.
    fn chunk_message(&self, pos: ChunkPos, height: LevelHeight) -> Result<ChunkDataMessage> {
        let builder = self.build_column(pos, height)?;
        let surface = builder.surface_heightmap(height);
        let section_payload = codec::encode_sections(&builder.build(height))?;

        let mut heightmaps = HashMap::new();
        heightmaps.insert(HeightmapKind::WorldSurface, surface.clone());
        heightmaps.insert(HeightmapKind::MotionBlocking, surface);

        Ok(ChunkDataMessage {
            pos,
            section_payload,
            heightmaps,
            block_entities: Vec::<BlockEntityInfo>::new(),
        })
    }
}

/// Full sky light everywhere and no block light.
pub fn open_sky_light(pos: ChunkPos, height: LevelHeight) -> LightDataMessage {
    let count = height.light_section_count() as usize;
    let sky_y_mask: SectionMask = (0..count).collect();
    let empty_block_y_mask: SectionMask = (0..count).collect();

    LightDataMessage {
        pos,
        sky_y_mask,
        sky_updates: vec![vec![0xFF; LIGHT_ARRAY_BYTES]; count],
        empty_block_y_mask,
        ..Default::default()
    }
}

/// Builds chunk-with-light messages for a batch of columns in parallel.
pub fn generate_batch(
    source: &dyn ChunkSource,
    positions: &[ChunkPos],
    height: LevelHeight,
) -> Result<Vec<ChunkWithLightMessage>> {
    positions
        .par_iter()
        .map(|&pos| {
            Ok(ChunkWithLightMessage {
                chunk: source.chunk_message(pos, height)?,
                light: open_sky_light(pos, height),
            })
        })
        .collect()
}
