use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use streammc_proto::{ChunkPos, LevelHeight};

use crate::ChunkSource;
use crate::builder::SectionBuilder;

const BASE_HEIGHT: i32 = 64;
const HEIGHT_VARIATION: i32 = 10;

/// Seeded rolling terrain. Each column gets its own surface level derived
/// from the seed and its coordinates, so repeated requests are identical.
pub struct HillsSource {
    seed: u64,
}

impl HillsSource {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn column_rng(&self, pos: ChunkPos) -> StdRng {
        let mixed = self.seed
            ^ (pos.x as u32 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (pos.z as u32 as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F).rotate_left(32);
        StdRng::seed_from_u64(mixed)
    }
}

impl ChunkSource for HillsSource {
    fn build_column(&self, pos: ChunkPos, height: LevelHeight) -> Result<SectionBuilder> {
        let mut rng = self.column_rng(pos);
        let surface_y = BASE_HEIGHT + rng.gen_range(-HEIGHT_VARIATION..=HEIGHT_VARIATION);
        let bottom = height.min_section * 16;

        let mut builder = SectionBuilder::new();
        builder.fill_layer(bottom, "minecraft:bedrock");
        for y in bottom + 1..surface_y - 3 {
            builder.fill_layer(y, "minecraft:stone");
        }
        for y in surface_y - 3..surface_y {
            builder.fill_layer(y, "minecraft:dirt");
        }
        builder.fill_layer(surface_y, "minecraft:grass_block");

        // A few trunks sticking out of the surface
        for _ in 0..rng.gen_range(0..3) {
            let x = rng.gen_range(0..16u8);
            let z = rng.gen_range(0..16u8);
            for y in surface_y + 1..surface_y + 5 {
                builder.set_block(x, y, z, "minecraft:oak_log");
            }
        }

        Ok(builder)
    }
}
