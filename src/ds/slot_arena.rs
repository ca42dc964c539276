//! Append-only node arena addressed by [`SlotId`].
//!
//! Backs the sentinel-bounded list in [`ListTopK`](crate::store::list::ListTopK).
//! Nodes are never freed individually: an evicted key's node is reused in
//! place, so ids stay stable for the lifetime of the table. The first
//! `pinned` slots (the sentinels) survive [`SlotArena::truncate_to_pinned`].

use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct SlotArena<T> {
    slots: Vec<T>,
    pinned: usize,
}

impl<T> SlotArena<T> {
    /// Creates an arena whose first slots are the given permanent values.
    pub fn with_pinned(pinned: impl IntoIterator<Item = T>) -> Self {
        let slots: Vec<T> = pinned.into_iter().collect();
        let pinned = slots.len();
        Self { slots, pinned }
    }

    pub fn insert(&mut self, value: T) -> SlotId {
        self.slots.push(value);
        SlotId(self.slots.len() - 1)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0)
    }

    pub fn contains(&self, id: SlotId) -> bool {
        id.0 < self.slots.len()
    }

    /// Number of slots including pinned ones.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of non-pinned slots that can be stored without reallocating.
    pub fn capacity(&self) -> usize {
        self.slots.capacity().saturating_sub(self.pinned)
    }

    /// Ensures room for `capacity` non-pinned slots.
    pub fn reserve_to(&mut self, capacity: usize) {
        let wanted = capacity.saturating_add(self.pinned);
        self.slots.reserve(wanted.saturating_sub(self.slots.len()));
    }

    /// Drops every non-pinned slot, keeping the allocation.
    pub fn truncate_to_pinned(&mut self) {
        self.slots.truncate(self.pinned);
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(idx, value)| (SlotId(idx), value))
    }
}

impl<T> Index<SlotId> for SlotArena<T> {
    type Output = T;

    #[inline]
    fn index(&self, id: SlotId) -> &T {
        &self.slots[id.0]
    }
}

impl<T> IndexMut<SlotId> for SlotArena<T> {
    #[inline]
    fn index_mut(&mut self, id: SlotId) -> &mut T {
        &mut self.slots[id.0]
    }
}
