use std::collections::HashMap;

use streammc_proto::LevelHeight;
use streammc_proto::nbt::{AIR, BlockState, BlockStates, SECTION_VOLUME, Section, is_air};

#[derive(Default)]
pub struct SectionBuilder {
    // Sparse single blocks. Key: (x, y, z), Value: Block Name
    custom_blocks: HashMap<(u8, i32, u8), String>,

    // Whole Y-layers. Key: y, Value: Block Name
    full_layers: HashMap<i32, String>,
}

impl SectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single block at chunk-local coordinates (x: 0..15, z: 0..15)
    pub fn set_block(&mut self, x: u8, y: i32, z: u8, name: &str) {
        if x < 16 && z < 16 {
            self.custom_blocks.insert((x, y, z), name.to_string());
        }
    }

    /// Fill an entire Y-layer with a block
    pub fn fill_layer(&mut self, y: i32, name: &str) {
        self.full_layers.insert(y, name.to_string());
        // Single blocks on this layer are overwritten
        self.custom_blocks.retain(|(_, by, _), _| *by != y);
    }

    fn block_at(&self, x: u8, y: i32, z: u8) -> &str {
        if let Some(name) = self.custom_blocks.get(&(x, y, z)) {
            name.as_str()
        } else if let Some(name) = self.full_layers.get(&y) {
            name.as_str()
        } else {
            AIR
        }
    }

    /// Every section of the column, bottom first.
    pub fn build(&self, height: LevelHeight) -> Vec<Section> {
        height.sections().map(|y| self.build_section(y)).collect()
    }

    /// Highest non-air block + 1 per (x, z), indexed `z * 16 + x`.
    pub fn surface_heightmap(&self, height: LevelHeight) -> Vec<i64> {
        let bottom = height.min_section * 16;
        let top = height.max_section() * 16;
        let mut heights = Vec::with_capacity(256);
        for z in 0..16u8 {
            for x in 0..16u8 {
                let surface = (bottom..top)
                    .rev()
                    .find(|&y| !is_air(self.block_at(x, y, z)))
                    .map_or(bottom, |y| y + 1);
                heights.push(surface as i64);
            }
        }
        heights
    }

    fn build_section(&self, sec_y: i32) -> Section {
        let start_y = sec_y * 16;
        let end_y = start_y + 16;

        let has_layers = (start_y..end_y).any(|y| self.full_layers.contains_key(&y));
        let has_blocks = self.custom_blocks.keys().any(|(_, y, _)| (start_y..end_y).contains(y));
        if !has_layers && !has_blocks {
            return Section::empty(sec_y as i8);
        }

        let mut palette: Vec<BlockState> = Vec::new();
        let mut name_to_index: HashMap<&str, usize> = HashMap::new();
        let mut indices = Vec::with_capacity(SECTION_VOLUME);

        // Y -> Z -> X, matching BlockPos::index_in_section
        for y in start_y..end_y {
            for z in 0..16u8 {
                for x in 0..16u8 {
                    let name = self.block_at(x, y, z);
                    let index = *name_to_index.entry(name).or_insert_with(|| {
                        palette.push(BlockState { name: name.to_string() });
                        palette.len() - 1
                    });
                    indices.push(index);
                }
            }
        }

        let mut section = Section::empty(sec_y as i8);
        section.block_states = Some(BlockStates::from_indices(palette, &indices));
        section
    }
}
