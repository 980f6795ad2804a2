//! NBT (Named Binary Tag) structures carried in chunk payloads.
//!
//! Sections use Minecraft's paletted storage: a list of unique block
//! states plus a packed long array of palette indices.

use serde::{Deserialize, Serialize};

pub const SECTION_VOLUME: usize = 16 * 16 * 16;
pub const AIR: &str = "minecraft:air";
pub const DEFAULT_BIOME: &str = "minecraft:plains";

/// Block names that count as "nothing" for emptiness tracking.
pub fn is_air(name: &str) -> bool {
    matches!(name, "minecraft:air" | "minecraft:cave_air" | "minecraft:void_air")
}

/// Root compound of a section payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct SectionPayload {
    pub sections: Vec<Section>,
}

/// Root compound of a biome replacement payload, one entry per section.
#[derive(Debug, Serialize, Deserialize)]
pub struct BiomePayload {
    pub biomes: Vec<Biomes>,
}

// --- Section (16x16x16 Cube) ---
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    // Vertical index of this section (e.g., -4 for the bottom, up to 19)
    #[serde(rename = "Y")]
    pub y: i8,

    // Absent means implicit air.
    #[serde(rename = "block_states", alias = "BlockStates", default, skip_serializing_if = "Option::is_none")]
    pub block_states: Option<BlockStates>,

    #[serde(rename = "biomes", alias = "Biomes", default, skip_serializing_if = "Option::is_none")]
    pub biomes: Option<Biomes>,
}

impl Section {
    pub fn empty(y: i8) -> Self {
        Self {
            y,
            block_states: None,
            biomes: Some(Biomes::uniform(DEFAULT_BIOME)),
        }
    }

    pub fn has_only_air(&self) -> bool {
        self.block_states.as_ref().is_none_or(BlockStates::has_only_air)
    }

    pub fn block(&self, index: usize) -> &str {
        match &self.block_states {
            Some(states) => states.get(index),
            None => AIR,
        }
    }

    pub fn set_block(&mut self, index: usize, name: &str) {
        self.block_states
            .get_or_insert_with(|| BlockStates::uniform(AIR))
            .set(index, name);
    }
}

// --- Block Palette ---
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockStates {
    pub palette: Vec<BlockState>,
    // Indices into the palette. Required if palette length > 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<fastnbt::LongArray>,
}

impl BlockStates {
    pub fn uniform(name: &str) -> Self {
        Self {
            palette: vec![BlockState { name: name.to_string() }],
            data: None,
        }
    }

    /// Packs one palette index per block into a compact long array.
    ///
    /// Bits per block = ceil(log2(palette_len)), min 4. Entries never span two longs.
    pub fn from_indices(palette: Vec<BlockState>, indices: &[usize]) -> Self {
        if palette.len() <= 1 {
            return Self { palette, data: None };
        }

        let bits = bits_per_block(palette.len());
        let blocks_per_long = 64 / bits;
        let mask = (1u64 << bits) - 1;
        let mut packed = vec![0i64; SECTION_VOLUME.div_ceil(blocks_per_long)];

        for (i, &index) in indices.iter().enumerate() {
            let long_index = i / blocks_per_long;
            let bit_offset = (i % blocks_per_long) * bits;
            let current = packed[long_index] as u64;
            packed[long_index] = (current | (((index as u64) & mask) << bit_offset)) as i64;
        }

        Self {
            palette,
            data: Some(fastnbt::LongArray::new(packed)),
        }
    }

    /// Unpacks the palette index of every block in the section.
    ///
    /// Indices past the end of the palette read as entry 0.
    pub fn indices(&self) -> Vec<usize> {
        let Some(data) = &self.data else {
            return vec![0; SECTION_VOLUME];
        };

        let bits = bits_per_block(self.palette.len());
        let blocks_per_long = 64 / bits;
        let mask = (1u64 << bits) - 1;
        let palette_len = self.palette.len();

        (0..SECTION_VOLUME)
            .map(|i| {
                let long = data.get(i / blocks_per_long).copied().unwrap_or(0) as u64;
                let index = ((long >> ((i % blocks_per_long) * bits)) & mask) as usize;
                if index < palette_len { index } else { 0 }
            })
            .collect()
    }

    pub fn get(&self, index: usize) -> &str {
        let palette_index = match &self.data {
            None => 0,
            Some(_) => self.indices().get(index).copied().unwrap_or(0),
        };
        self.palette
            .get(palette_index)
            .map(|state| state.name.as_str())
            .unwrap_or(AIR)
    }

    /// Replaces one block, then rebuilds a palette holding only referenced states.
    pub fn set(&mut self, index: usize, name: &str) {
        if index >= SECTION_VOLUME {
            return;
        }

        let mut indices = self.indices();
        let palette_index = match self.palette.iter().position(|s| s.name == name) {
            Some(i) => i,
            None => {
                self.palette.push(BlockState { name: name.to_string() });
                self.palette.len() - 1
            }
        };
        indices[index] = palette_index;

        let mut remap: Vec<Option<usize>> = vec![None; self.palette.len()];
        let mut palette = Vec::new();
        for slot in indices.iter_mut() {
            let old = *slot;
            *slot = *remap[old].get_or_insert_with(|| {
                palette.push(self.palette[old].clone());
                palette.len() - 1
            });
        }

        *self = Self::from_indices(palette, &indices);
    }

    pub fn has_only_air(&self) -> bool {
        if self.palette.iter().all(|s| is_air(&s.name)) {
            return true;
        }
        match &self.data {
            None => self.palette.first().is_none_or(|s| is_air(&s.name)),
            // Non-compact palettes may list states no block refers to.
            Some(_) => self.indices().into_iter().all(|i| {
                self.palette.get(i).is_none_or(|s| is_air(&s.name))
            }),
        }
    }
}

fn bits_per_block(palette_len: usize) -> usize {
    let needed = (usize::BITS - palette_len.saturating_sub(1).leading_zeros()) as usize;
    needed.max(4)
}

// --- Biome Palette ---
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Biomes {
    pub palette: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<fastnbt::LongArray>,
}

impl Biomes {
    pub fn uniform(name: &str) -> Self {
        Self {
            palette: vec![name.to_string()],
            data: None,
        }
    }
}

// --- Single Block ---
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockState {
    #[serde(rename = "Name")]
    pub name: String,
}
