//! Collaborators notified by the cache: renderer, lighting, entity tracking.

use std::sync::Arc;

use streammc_proto::{ChunkPos, SectionPos};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::entry::ChunkEntry;

pub trait ChunkLifecycleObserver: Send + Sync {
    fn on_chunk_loaded(&self, pos: ChunkPos);
    fn on_chunk_unloaded(&self, entry: &ChunkEntry);
}

pub trait SectionObserver: Send + Sync {
    /// A section previously tracked as air-only now has blocks in it.
    fn on_section_became_non_empty(&self, key: i64);
    fn on_section_dirty(&self, section: SectionPos);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightLayer {
    Sky,
    Block,
}

/// The lighting engine's intake. Propagation itself happens elsewhere.
pub trait LightEngine: Send + Sync {
    /// `None` clears whatever was queued for the section.
    fn queue_section_data(&self, layer: LightLayer, section: SectionPos, data: Option<&[u8]>);
    fn set_light_enabled(&self, pos: ChunkPos, enabled: bool);
    fn update_section_status(&self, section: SectionPos, is_empty: bool);
}

/// Observers handed to every ring store built for a stream.
#[derive(Clone)]
pub struct Observers {
    pub lifecycle: Arc<dyn ChunkLifecycleObserver>,
    pub sections: Arc<dyn SectionObserver>,
}

impl Observers {
    pub fn shared<T>(observer: Arc<T>) -> Self
    where
        T: ChunkLifecycleObserver + SectionObserver + 'static,
    {
        Self {
            lifecycle: observer.clone(),
            sections: observer,
        }
    }
}

/// Everything the cache reports to the outside world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientEvent {
    ChunkLoaded(ChunkPos),
    ChunkUnloaded(ChunkPos),
    SectionBecameNonEmpty(SectionPos),
    SectionDirty(SectionPos),
    LightQueued {
        layer: LightLayer,
        section: SectionPos,
        present: bool,
    },
    LightEnabled {
        pos: ChunkPos,
        enabled: bool,
    },
    SectionStatus {
        section: SectionPos,
        is_empty: bool,
    },
}

/// Forwards every notification as a [`ClientEvent`] over a channel.
///
/// Sends never block; events are discarded once the receiver is gone.
pub struct EventSink {
    tx: UnboundedSender<ClientEvent>,
}

impl EventSink {
    pub fn channel() -> (Arc<Self>, UnboundedReceiver<ClientEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }

    fn emit(&self, event: ClientEvent) {
        if self.tx.send(event).is_err() {
            log::trace!("Event receiver dropped");
        }
    }
}

impl ChunkLifecycleObserver for EventSink {
    fn on_chunk_loaded(&self, pos: ChunkPos) {
        self.emit(ClientEvent::ChunkLoaded(pos));
    }

    fn on_chunk_unloaded(&self, entry: &ChunkEntry) {
        self.emit(ClientEvent::ChunkUnloaded(entry.pos()));
    }
}

impl SectionObserver for EventSink {
    fn on_section_became_non_empty(&self, key: i64) {
        self.emit(ClientEvent::SectionBecameNonEmpty(SectionPos::from_long(key)));
    }

    fn on_section_dirty(&self, section: SectionPos) {
        self.emit(ClientEvent::SectionDirty(section));
    }
}

impl LightEngine for EventSink {
    fn queue_section_data(&self, layer: LightLayer, section: SectionPos, data: Option<&[u8]>) {
        self.emit(ClientEvent::LightQueued {
            layer,
            section,
            present: data.is_some(),
        });
    }

    fn set_light_enabled(&self, pos: ChunkPos, enabled: bool) {
        self.emit(ClientEvent::LightEnabled { pos, enabled });
    }

    fn update_section_status(&self, section: SectionPos, is_empty: bool) {
        self.emit(ClientEvent::SectionStatus { section, is_empty });
    }
}

/// Drains everything currently buffered in `rx`.
pub fn drain_events(rx: &mut UnboundedReceiver<ClientEvent>) -> Vec<ClientEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
