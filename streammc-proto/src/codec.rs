//! Payload codec: NBT serialized with fastnbt, wrapped in zlib.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::nbt::{BiomePayload, Biomes, Section, SectionPayload};

pub fn encode_sections(sections: &[Section]) -> Result<Vec<u8>> {
    let payload = SectionPayload { sections: sections.to_vec() };
    let nbt = fastnbt::to_bytes(&payload).context("Failed to serialize section payload")?;
    compress(&nbt)
}

pub fn decode_sections(bytes: &[u8]) -> Result<Vec<Section>> {
    let nbt = decompress(bytes)?;
    let payload: SectionPayload =
        fastnbt::from_bytes(&nbt).context("Failed to parse section payload NBT")?;
    Ok(payload.sections)
}

pub fn encode_biomes(biomes: &[Biomes]) -> Result<Vec<u8>> {
    let payload = BiomePayload { biomes: biomes.to_vec() };
    let nbt = fastnbt::to_bytes(&payload).context("Failed to serialize biome payload")?;
    compress(&nbt)
}

pub fn decode_biomes(bytes: &[u8]) -> Result<Vec<Biomes>> {
    let nbt = decompress(bytes)?;
    let payload: BiomePayload =
        fastnbt::from_bytes(&nbt).context("Failed to parse biome payload NBT")?;
    Ok(payload.biomes)
}

fn compress(nbt: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(nbt).context("Failed to compress payload")?;
    encoder.finish().context("Failed to finish compression")
}

fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(bytes);
    let mut nbt = Vec::new();
    decoder.read_to_end(&mut nbt).context("Failed to inflate payload")?;
    Ok(nbt)
}
