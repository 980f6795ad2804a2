//! Client side of the chunk stream.
//!
//! The [`ChunkStreamCoordinator`] turns inbound messages into ring store
//! operations, defers light application through a bounded per-tick queue
//! and paces the server with a [`ChunkBatchRateController`].

pub mod config;
pub mod coordinator;
pub mod light_queue;
pub mod rate;

pub use config::StreamConfig;
pub use coordinator::ChunkStreamCoordinator;
pub use rate::ChunkBatchRateController;
