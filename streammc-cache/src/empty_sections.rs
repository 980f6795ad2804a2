use std::collections::HashSet;

use parking_lot::Mutex;

/// Section keys (see [`streammc_proto::SectionPos::as_long`]) known to hold only air.
#[derive(Debug, Default)]
pub struct EmptySections {
    keys: Mutex<HashSet<i64>>,
}

impl EmptySections {
    /// Returns `true` if the key was not tracked before.
    pub fn insert(&self, key: i64) -> bool {
        self.keys.lock().insert(key)
    }

    /// Returns `true` if the key was tracked.
    pub fn remove(&self, key: i64) -> bool {
        self.keys.lock().remove(&key)
    }

    pub fn contains(&self, key: i64) -> bool {
        self.keys.lock().contains(&key)
    }

    pub fn snapshot(&self) -> HashSet<i64> {
        self.keys.lock().clone()
    }
}
