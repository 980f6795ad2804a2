//! Messages exchanged with the server over the chunk stream.

use std::collections::HashMap;

use crate::pos::{BlockPos, ChunkPos};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeightmapKind {
    WorldSurface,
    MotionBlocking,
    MotionBlockingNoLeaves,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockEntityInfo {
    /// Local x in the high nibble, local z in the low nibble.
    pub packed_xz: u8,
    pub y: i16,
    pub kind: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChunkDataMessage {
    pub pos: ChunkPos,
    /// zlib-compressed NBT, see [`crate::codec::decode_sections`].
    pub section_payload: Vec<u8>,
    pub heightmaps: HashMap<HeightmapKind, Vec<i64>>,
    pub block_entities: Vec<BlockEntityInfo>,
}

/// One bit per light section, lowest light section at bit 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectionMask(pub u64);

impl SectionMask {
    pub fn get(self, index: usize) -> bool {
        index < 64 && self.0 & (1 << index) != 0
    }

    pub fn set(&mut self, index: usize) {
        if index < 64 {
            self.0 |= 1 << index;
        }
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..64).filter(move |&i| self.get(i))
    }
}

impl FromIterator<usize> for SectionMask {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut mask = Self::default();
        for index in iter {
            mask.set(index);
        }
        mask
    }
}

/// Sky and block light for one column. `*_updates` hold one 2048-byte nibble
/// array per set bit of the matching mask, in ascending bit order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightDataMessage {
    pub pos: ChunkPos,
    pub sky_y_mask: SectionMask,
    pub empty_sky_y_mask: SectionMask,
    pub sky_updates: Vec<Vec<u8>>,
    pub block_y_mask: SectionMask,
    pub empty_block_y_mask: SectionMask,
    pub block_updates: Vec<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChunkWithLightMessage {
    pub chunk: ChunkDataMessage,
    pub light: LightDataMessage,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BiomeReplaceMessage {
    pub pos: ChunkPos,
    /// zlib-compressed NBT, see [`crate::codec::decode_biomes`].
    pub biome_payload: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockUpdateMessage {
    pub pos: BlockPos,
    pub block: String,
}

/// Server -> client.
#[derive(Clone, Debug, PartialEq)]
pub enum ClientboundMessage {
    ChunkData(ChunkDataMessage),
    ChunkWithLight(ChunkWithLightMessage),
    ChunkDrop(ChunkPos),
    LightData(LightDataMessage),
    BiomeReplace(BiomeReplaceMessage),
    BlockUpdate(BlockUpdateMessage),
    SetViewCenter(ChunkPos),
    SetViewRadius(i32),
    ChunkBatchStart,
    ChunkBatchFinished { batch_size: i32 },
}

/// Client -> server.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ServerboundMessage {
    ChunkBatchReceived { desired_chunks_per_tick: f32 },
}
