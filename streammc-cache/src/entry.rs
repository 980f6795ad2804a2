use std::collections::HashMap;

use parking_lot::{RwLock, RwLockReadGuard};
use streammc_proto::message::{BlockEntityInfo, HeightmapKind};
use streammc_proto::nbt::{Biomes, Section};
use streammc_proto::{BlockPos, ChunkPos, LevelHeight};

/// Decoded contents of one chunk column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkColumn {
    /// One section per level section, bottom first.
    pub sections: Vec<Section>,
    pub heightmaps: HashMap<HeightmapKind, Vec<i64>>,
    pub block_entities: Vec<BlockEntityInfo>,
}

impl ChunkColumn {
    /// Lays `sections` out bottom-to-top over `height`.
    ///
    /// Sections missing from the payload are implicit air; sections outside
    /// the level are discarded.
    pub fn new(
        height: LevelHeight,
        sections: Vec<Section>,
        heightmaps: HashMap<HeightmapKind, Vec<i64>>,
        block_entities: Vec<BlockEntityInfo>,
    ) -> Self {
        let mut laid_out: Vec<Section> = height.sections().map(|y| Section::empty(y as i8)).collect();
        for section in sections {
            if let Some(index) = height.section_index(section.y as i32) {
                laid_out[index] = section;
            }
        }

        Self {
            sections: laid_out,
            heightmaps,
            block_entities,
        }
    }

    pub fn empty(height: LevelHeight) -> Self {
        Self::new(height, Vec::new(), HashMap::new(), Vec::new())
    }
}

/// Result of a single-block edit inside a resident column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockChange {
    pub section_y: i32,
    pub was_air_only: bool,
    pub is_air_only: bool,
}

/// A chunk column owned by the ring store.
///
/// The position is fixed for the life of the entry. Contents change only
/// through the mutation methods below, each of which holds the column's
/// write lock for the whole edit.
#[derive(Debug)]
pub struct ChunkEntry {
    pos: ChunkPos,
    height: LevelHeight,
    column: RwLock<ChunkColumn>,
}

impl ChunkEntry {
    pub fn new(pos: ChunkPos, height: LevelHeight, column: ChunkColumn) -> Self {
        Self {
            pos,
            height,
            column: RwLock::new(column),
        }
    }

    /// Placeholder handed out when a caller needs a column that is not loaded.
    pub fn empty(pos: ChunkPos, height: LevelHeight) -> Self {
        Self::new(pos, height, ChunkColumn::empty(height))
    }

    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    pub fn height(&self) -> LevelHeight {
        self.height
    }

    pub fn read(&self) -> RwLockReadGuard<'_, ChunkColumn> {
        self.column.read()
    }

    /// `(section_y, air_only)` for every section, bottom first.
    pub fn section_emptiness(&self) -> Vec<(i32, bool)> {
        let column = self.column.read();
        self.height
            .sections()
            .zip(column.sections.iter())
            .map(|(y, section)| (y, section.has_only_air()))
            .collect()
    }

    pub fn air_only_sections(&self) -> Vec<i32> {
        self.section_emptiness()
            .into_iter()
            .filter_map(|(y, empty)| empty.then_some(y))
            .collect()
    }

    pub fn block(&self, pos: BlockPos) -> Option<String> {
        let index = self.height.section_index(pos.y >> 4)?;
        let column = self.column.read();
        Some(column.sections[index].block(pos.index_in_section()).to_string())
    }

    /// Replaces the whole column with freshly received data.
    pub fn replace_column(&self, column: ChunkColumn) {
        *self.column.write() = column;
    }

    /// Replaces per-section biomes, bottom first. Extra entries are ignored.
    pub fn replace_biomes(&self, biomes: Vec<Biomes>) {
        let mut column = self.column.write();
        for (section, biome) in column.sections.iter_mut().zip(biomes) {
            section.biomes = Some(biome);
        }
    }

    /// Sets one block. Returns `None` when `pos` is outside the column.
    pub fn set_block(&self, pos: BlockPos, name: &str) -> Option<BlockChange> {
        if pos.chunk() != self.pos {
            return None;
        }
        let section_y = pos.y >> 4;
        let index = self.height.section_index(section_y)?;

        let mut column = self.column.write();
        let section = &mut column.sections[index];
        let was_air_only = section.has_only_air();
        section.set_block(pos.index_in_section(), name);

        Some(BlockChange {
            section_y,
            was_air_only,
            is_air_only: section.has_only_air(),
        })
    }
}
