//! Re-centerable 2D ring of chunk columns.
//!
//! The ring is a square of `2 * radius + 1` slots per side. A column at
//! `(x, z)` lives in slot `wrap(z) * side + wrap(x)`, where `wrap` is a
//! floor modulo, so moving the view center never moves data. Columns that
//! scroll out of view stay in their slot until something else claims it,
//! which is why every lookup compares the stored position to the requested
//! one.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

use parking_lot::RwLock;
use streammc_proto::{ChunkPos, LevelHeight, SectionPos};

use crate::empty_sections::EmptySections;
use crate::entry::ChunkEntry;
use crate::observer::Observers;

type Slot = RwLock<Option<Arc<ChunkEntry>>>;

pub struct ChunkRingStore {
    radius: i32,
    side: i32,
    height: LevelHeight,
    center_x: AtomicI32,
    center_z: AtomicI32,
    slots: Box<[Slot]>,
    resident: AtomicUsize,
    empty_sections: EmptySections,
    observers: Observers,
}

impl ChunkRingStore {
    /// Builds an empty ring centered on the origin. Negative radii are treated as zero.
    pub fn configure(radius: i32, height: LevelHeight, observers: Observers) -> Self {
        Self::centered(radius, ChunkPos::default(), height, observers)
    }

    fn centered(radius: i32, center: ChunkPos, height: LevelHeight, observers: Observers) -> Self {
        let radius = radius.max(0);
        let side = 2 * radius + 1;
        let capacity = (side as usize) * (side as usize);

        Self {
            radius,
            side,
            height,
            center_x: AtomicI32::new(center.x),
            center_z: AtomicI32::new(center.z),
            slots: (0..capacity).map(|_| RwLock::new(None)).collect(),
            resident: AtomicUsize::new(0),
            empty_sections: EmptySections::default(),
            observers,
        }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn height(&self) -> LevelHeight {
        self.height
    }

    pub fn center(&self) -> ChunkPos {
        ChunkPos::new(
            self.center_x.load(Ordering::Relaxed),
            self.center_z.load(Ordering::Relaxed),
        )
    }

    /// Moves the view. Ring contents are untouched.
    pub fn update_center(&self, center: ChunkPos) {
        self.center_x.store(center.x, Ordering::Relaxed);
        self.center_z.store(center.z, Ordering::Relaxed);
    }

    pub fn compute_index(&self, pos: ChunkPos) -> usize {
        (pos.z.rem_euclid(self.side) * self.side + pos.x.rem_euclid(self.side)) as usize
    }

    pub fn in_range(&self, pos: ChunkPos) -> bool {
        let center = self.center();
        let radius = self.radius as u32;
        pos.x.abs_diff(center.x) <= radius && pos.z.abs_diff(center.z) <= radius
    }

    /// The resident column at `pos`, if `pos` is in view and its slot really holds it.
    pub fn get(&self, pos: ChunkPos) -> Option<Arc<ChunkEntry>> {
        if !self.in_range(pos) {
            return None;
        }
        let slot = self.slots[self.compute_index(pos)].read();
        (*slot).as_ref().filter(|entry| entry.pos() == pos).cloned()
    }

    /// Like [`Self::get`], substituting an empty column when nothing valid is resident.
    pub fn get_or_empty(&self, pos: ChunkPos) -> Arc<ChunkEntry> {
        self.get(pos)
            .unwrap_or_else(|| Arc::new(ChunkEntry::empty(pos, self.height)))
    }

    /// Swaps the slot for `pos` to `entry` and returns whatever it evicted.
    pub fn install(&self, pos: ChunkPos, entry: Option<Arc<ChunkEntry>>) -> Option<Arc<ChunkEntry>> {
        debug_assert!(entry.as_ref().is_none_or(|e| e.pos() == pos));

        let index = self.compute_index(pos);
        let previous = {
            // Count and section keys change under the slot lock, by the net
            // change of this one slot.
            let mut slot = self.slots[index].write();
            let previous = std::mem::replace(&mut *slot, entry);
            match (previous.is_some(), slot.is_some()) {
                (false, true) => {
                    self.resident.fetch_add(1, Ordering::AcqRel);
                }
                (true, false) => {
                    self.resident.fetch_sub(1, Ordering::AcqRel);
                }
                _ => {}
            }
            if let Some(previous) = &previous {
                self.drop_empty_sections(previous);
            }
            if let Some(entry) = &*slot {
                self.add_empty_sections(entry);
            }
            previous
        };

        if let Some(previous) = &previous {
            self.observers.lifecycle.on_chunk_unloaded(previous);
        }

        previous
    }

    /// Clears the slot for `pos` only if it still holds `expected`.
    ///
    /// The unload notification fires for `expected` even when the slot had
    /// already moved on to another column.
    pub fn drop_if_current(&self, pos: ChunkPos, expected: &Arc<ChunkEntry>) -> bool {
        let index = self.compute_index(pos);
        let cleared = {
            let mut slot = self.slots[index].write();
            if (*slot).as_ref().is_some_and(|current| Arc::ptr_eq(current, expected)) {
                *slot = None;
                self.resident.fetch_sub(1, Ordering::AcqRel);
                self.drop_empty_sections(expected);
                true
            } else {
                false
            }
        };

        if !cleared {
            log::debug!("Drop of {} lost a race, slot {} holds a newer column", pos, index);
        }
        self.observers.lifecycle.on_chunk_unloaded(expected);

        cleared
    }

    /// Re-derives air-only status after `entry` was modified in place.
    pub fn refresh_sections(&self, entry: &ChunkEntry) {
        let pos = entry.pos();
        if !self.in_range(pos) {
            return;
        }

        for (section_y, air_only) in entry.section_emptiness() {
            let key = pos.section(section_y).as_long();
            if air_only {
                self.empty_sections.insert(key);
            } else if self.empty_sections.remove(key) {
                self.observers.sections.on_section_became_non_empty(key);
            }
        }
    }

    /// Emptiness learned outside of a full column refresh.
    pub fn on_section_emptiness_changed(&self, x: i32, section_y: i32, z: i32, is_empty: bool) {
        if !self.in_range(ChunkPos::new(x, z)) {
            return;
        }

        let key = SectionPos::new(x, section_y, z).as_long();
        if is_empty {
            self.empty_sections.insert(key);
        } else if self.empty_sections.remove(key) {
            self.observers.sections.on_section_became_non_empty(key);
        }
    }

    pub fn is_section_empty(&self, section: SectionPos) -> bool {
        self.empty_sections.contains(section.as_long())
    }

    pub fn empty_sections(&self) -> HashSet<i64> {
        self.empty_sections.snapshot()
    }

    /// Occupied slots. Only changes when a slot goes from empty to full or back,
    /// so it never exceeds [`Self::capacity`].
    pub fn resident_count(&self) -> usize {
        self.resident.load(Ordering::Acquire)
    }

    /// Counts occupied slots directly.
    pub fn recount(&self) -> usize {
        self.slots.iter().filter(|slot| slot.read().is_some()).count()
    }

    /// Builds a ring with a new radius around the same center.
    ///
    /// Columns that fall inside the new range move over; the rest are unloaded.
    pub fn resized(&self, radius: i32) -> Self {
        let resized = Self::centered(radius, self.center(), self.height, self.observers.clone());

        for slot in self.slots.iter() {
            let Some(entry) = slot.read().clone() else {
                continue;
            };

            let pos = entry.pos();
            if resized.in_range(pos) {
                resized.install(pos, Some(entry));
            } else {
                self.observers.lifecycle.on_chunk_unloaded(&entry);
            }
        }

        resized
    }

    fn add_empty_sections(&self, entry: &ChunkEntry) {
        let pos = entry.pos();
        for section_y in entry.air_only_sections() {
            self.empty_sections.insert(pos.section(section_y).as_long());
        }
    }

    fn drop_empty_sections(&self, entry: &ChunkEntry) {
        let pos = entry.pos();
        for section_y in entry.air_only_sections() {
            self.empty_sections.remove(pos.section(section_y).as_long());
        }
    }
}
