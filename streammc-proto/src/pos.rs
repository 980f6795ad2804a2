use serde::{Deserialize, Serialize};
use std::fmt;

// Section key layout (64 bits):
// Bits 42..63: X (22 bits)
// Bits 20..41: Z (22 bits)
// Bits 0..19:  Y (20 bits)
const PACKED_XZ_BITS: u32 = 22;
const PACKED_Y_BITS: u32 = 20;
const PACKED_XZ_MASK: i64 = (1 << PACKED_XZ_BITS) - 1;
const PACKED_Y_MASK: i64 = (1 << PACKED_Y_BITS) - 1;
const Z_OFFSET: u32 = PACKED_Y_BITS;
const X_OFFSET: u32 = PACKED_Y_BITS + PACKED_XZ_BITS;

/// Column coordinates of a chunk (16x16 blocks).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn section(self, y: i32) -> SectionPos {
        SectionPos::new(self.x, y, self.z)
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}

/// A 16x16x16 cube inside a chunk column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SectionPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl SectionPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn chunk(self) -> ChunkPos {
        ChunkPos::new(self.x, self.z)
    }

    /// Packs the position into the key used by the empty-section set.
    pub fn as_long(self) -> i64 {
        ((self.x as i64 & PACKED_XZ_MASK) << X_OFFSET)
            | ((self.z as i64 & PACKED_XZ_MASK) << Z_OFFSET)
            | (self.y as i64 & PACKED_Y_MASK)
    }

    pub fn from_long(key: i64) -> Self {
        // Shift the field to the top of the word, then arithmetic-shift back to sign-extend.
        let x = (key << (64 - X_OFFSET - PACKED_XZ_BITS)) >> (64 - PACKED_XZ_BITS);
        let z = (key << (64 - Z_OFFSET - PACKED_XZ_BITS)) >> (64 - PACKED_XZ_BITS);
        let y = (key << (64 - PACKED_Y_BITS)) >> (64 - PACKED_Y_BITS);
        Self::new(x as i32, y as i32, z as i32)
    }
}

/// Absolute block coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn chunk(self) -> ChunkPos {
        ChunkPos::new(self.x >> 4, self.z >> 4)
    }

    pub fn section(self) -> SectionPos {
        SectionPos::new(self.x >> 4, self.y >> 4, self.z >> 4)
    }

    /// Index inside the section's 4096 block array: Y -> Z -> X.
    pub fn index_in_section(self) -> usize {
        (((self.y & 15) * 16 + (self.z & 15)) * 16 + (self.x & 15)) as usize
    }
}

/// Vertical extent of a column in sections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelHeight {
    pub min_section: i32,
    pub section_count: i32,
}

impl Default for LevelHeight {
    fn default() -> Self {
        // -64..320
        Self {
            min_section: -4,
            section_count: 24,
        }
    }
}

impl LevelHeight {
    pub fn max_section(&self) -> i32 {
        self.min_section + self.section_count
    }

    pub fn sections(&self) -> std::ops::Range<i32> {
        self.min_section..self.max_section()
    }

    /// Light data covers one extra section below and above the column.
    pub fn light_section_count(&self) -> i32 {
        self.section_count + 2
    }

    pub fn min_light_section(&self) -> i32 {
        self.min_section - 1
    }

    pub fn light_sections(&self) -> std::ops::Range<i32> {
        self.min_light_section()..self.min_light_section() + self.light_section_count()
    }

    pub fn section_index(&self, section_y: i32) -> Option<usize> {
        self.sections()
            .contains(&section_y)
            .then(|| (section_y - self.min_section) as usize)
    }
}
