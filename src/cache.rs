//! Bounded, concurrent memoization for ancestor walks and TM-key encoding.
//!
//! Every cached value is cheaply re-derivable from its key, so correctness
//! never depends on an entry surviving eviction — only on cached entries
//! being correct when present.

use dashmap::DashMap;

use crate::key::Key;
use crate::tet::{Tet, TetType};

const KINDS: usize = 4;

/// Memoizes TM-keys, parents, ancestor types, and raw-index levels, keyed
/// by `Tet` identity (or, for the last, by the raw index itself). Backed by
/// `dashmap::DashMap`, safe for concurrent reads and inserts; write-once per
/// key (a racing duplicate insert is harmless since the value is
/// deterministic).
pub struct LevelCache {
    keys: DashMap<Tet, Key>,
    parents: DashMap<Tet, Tet>,
    ancestor_types: DashMap<(Tet, u8), TetType>,
    levels_from_raw: DashMap<u64, u8>,
    capacity_per_kind: usize,
}

impl LevelCache {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: DashMap::new(),
            parents: DashMap::new(),
            ancestor_types: DashMap::new(),
            levels_from_raw: DashMap::new(),
            capacity_per_kind: (capacity / KINDS).max(1),
        }
    }

    #[must_use]
    pub fn get_key(&self, tet: Tet) -> Option<Key> {
        self.keys.get(&tet).map(|v| *v)
    }

    pub fn put_key(&self, tet: Tet, key: Key) {
        self.trim_if_full(&self.keys);
        self.keys.insert(tet, key);
    }

    #[must_use]
    pub fn get_parent(&self, tet: Tet) -> Option<Tet> {
        self.parents.get(&tet).map(|v| *v)
    }

    pub fn put_parent(&self, tet: Tet, parent: Tet) {
        self.trim_if_full(&self.parents);
        self.parents.insert(tet, parent);
    }

    #[must_use]
    pub fn get_ancestor_type(&self, tet: Tet, level: u8) -> Option<TetType> {
        self.ancestor_types.get(&(tet, level)).map(|v| *v)
    }

    pub fn put_ancestor_type(&self, tet: Tet, level: u8, kind: TetType) {
        self.trim_if_full(&self.ancestor_types);
        self.ancestor_types.insert((tet, level), kind);
    }

    #[must_use]
    pub fn get_level_from_raw(&self, index: u64) -> Option<u8> {
        self.levels_from_raw.get(&index).map(|v| *v)
    }

    pub fn put_level_from_raw(&self, index: u64, level: u8) {
        self.trim_if_full(&self.levels_from_raw);
        self.levels_from_raw.insert(index, level);
    }

    pub fn clear(&self) {
        self.keys.clear();
        self.parents.clear();
        self.ancestor_types.clear();
        self.levels_from_raw.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len() + self.parents.len() + self.ancestor_types.len() + self.levels_from_raw.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears one shard's worth of entries once a map exceeds its capacity
    /// share. Not a precise LRU: correctness only requires eviction be safe,
    /// not that it pick the least-valuable entry.
    fn trim_if_full<K: Eq + std::hash::Hash + Clone, V: Clone>(&self, map: &DashMap<K, V>) {
        if map.len() < self.capacity_per_kind {
            return;
        }
        if let Some(shard_key) = map.iter().next().map(|entry| entry.key().clone()) {
            map.remove(&shard_key);
        }
    }
}

impl Default for LevelCache {
    fn default() -> Self {
        Self::with_capacity(4096)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_roundtrips_a_key() {
        let cache = LevelCache::default();
        let tet = Tet::new_unchecked(0, 0, 0, 0, TetType::S0);
        let key = Key::root();
        cache.put_key(tet, key);
        assert_eq!(cache.get_key(tet), Some(key));
    }

    #[test]
    fn eviction_never_exceeds_capacity_for_long() {
        let cache = LevelCache::with_capacity(8);
        let length = 1u32 << (crate::types::L_MAX - 1);
        for i in 0..100u32 {
            let tet = Tet::new_unchecked((i % 2) * length, 0, 0, 1, TetType::S0);
            let key = Key::compact(1, i as u64);
            cache.put_key(tet, key);
        }
        assert!(cache.keys.len() <= 2);
    }
}
