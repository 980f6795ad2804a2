use anyhow::Result;
use streammc_proto::{ChunkPos, LevelHeight};

use crate::ChunkSource;
use crate::builder::SectionBuilder;

/// Bedrock floor, a few dirt layers, grass at Y=0 and a stone pillar in every column.
pub struct FlatSource;

impl ChunkSource for FlatSource {
    fn build_column(&self, _pos: ChunkPos, _height: LevelHeight) -> Result<SectionBuilder> {
        let mut builder = SectionBuilder::new();

        builder.fill_layer(-64, "minecraft:bedrock");
        for y in -4..0 {
            builder.fill_layer(y, "minecraft:dirt");
        }
        builder.fill_layer(0, "minecraft:grass_block");

        // Makes the column visibly 3D
        for y in 1..10 {
            builder.set_block(8, y, 8, "minecraft:stone");
        }

        Ok(builder)
    }
}
