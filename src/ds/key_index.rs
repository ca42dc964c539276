//! Key → locator index shared by both top-K stores.
//!
//! The array store maps keys to slot positions (`usize`), the list store maps
//! keys to arena node ids ([`SlotId`](crate::ds::SlotId)). Both keep the index
//! a bijection between live keys and their locator.

use rustc_hash::FxHashMap;

/// Owned-key hash index from key to a copyable locator.
#[derive(Debug, Clone)]
pub struct KeyIndex<L> {
    map: FxHashMap<String, L>,
}

impl<L: Copy> KeyIndex<L> {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }

    /// Creates an empty index with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Returns the locator for `key`, if present.
    #[inline]
    pub fn get(&self, key: &str) -> Option<L> {
        self.map.get(key).copied()
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Inserts a new key; returns the previous locator if the key was present.
    #[inline]
    pub fn insert(&mut self, key: String, locator: L) -> Option<L> {
        self.map.insert(key, locator)
    }

    /// Repoints an existing key without reallocating it.
    ///
    /// Returns `false` if `key` is not indexed.
    #[inline]
    pub fn set(&mut self, key: &str, locator: L) -> bool {
        match self.map.get_mut(key) {
            Some(slot) => {
                *slot = locator;
                true
            },
            None => false,
        }
    }

    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<L> {
        self.map.remove(key)
    }

    /// Grows the index so it can hold `capacity` keys without rehashing.
    pub fn reserve_to(&mut self, capacity: usize) {
        let additional = capacity.saturating_sub(self.map.len());
        self.map.reserve(additional);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Iterates `(key, locator)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, L)> + '_ {
        self.map.iter().map(|(k, l)| (k.as_str(), *l))
    }
}

impl<L: Copy> Default for KeyIndex<L> {
    fn default() -> Self {
        Self::new()
    }
}
