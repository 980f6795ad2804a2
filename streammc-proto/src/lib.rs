//! Wire-level data model for the client chunk stream.
//!
//! This crate holds:
//! - Chunk, section and block coordinates (and the packed section key)
//! - The NBT section model carried inside chunk payloads
//! - The zlib + NBT payload codec
//! - Inbound and outbound stream messages

pub mod codec;
pub mod message;
pub mod nbt;
pub mod pos;

pub use pos::{BlockPos, ChunkPos, LevelHeight, SectionPos};
