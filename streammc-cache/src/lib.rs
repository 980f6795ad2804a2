//! Client-side chunk cache.
//!
//! A fixed-capacity 2D ring of chunk columns addressed by wrapped chunk
//! coordinates, plus tracking of air-only sections for the renderer and
//! the lighting engine.

pub mod empty_sections;
pub mod entry;
pub mod observer;
pub mod ring;

pub use entry::{BlockChange, ChunkColumn, ChunkEntry};
pub use observer::{
    ChunkLifecycleObserver, ClientEvent, EventSink, LightEngine, LightLayer, Observers,
    SectionObserver,
};
pub use ring::ChunkRingStore;
