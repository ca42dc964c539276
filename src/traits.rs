//! # Top-K Trait Hierarchy
//!
//! One contract, two stores. Both [`ArrayTopK`](crate::store::array::ArrayTopK)
//! and [`ListTopK`](crate::store::list::ListTopK) implement these traits and
//! run the same behavioural test suite, so either can back a
//! [`TopKTable`](crate::builder::TopKTable).
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────┐
//!   │              ReadOnlyTopK                 │
//!   │                                           │
//!   │  get(&str) → Option<u64>                  │
//!   │  contains(&str) → bool                    │
//!   │  len() / is_empty() / capacity()          │
//!   │  min_count() → Option<u64>                │
//!   │  iter() → (&str, u64) descending          │
//!   │  sorted_entries() → Vec<Entry>            │
//!   └─────────────────────┬─────────────────────┘
//!                         │
//!                         ▼
//!   ┌───────────────────────────────────────────┐
//!   │                  TopK                     │
//!   │                                           │
//!   │  increment(&str, maxsize)                 │
//!   │  increment_by(&str, weight, maxsize)      │
//!   │  increment_existing(&str) → bool          │
//!   │  update(&str, count, maxsize)             │
//!   │  clear() / load(SortedEntries)            │
//!   │                                           │
//!   │  provided: encode / decode / import_legacy│
//!   └───────────────────────────────────────────┘
//! ```
//!
//! ## Return conventions
//!
//! | Call            | `Ok(None)` / `Accepted`       | `Some(k)` / `Evicted(k)` | `Rejected(k)`   |
//! |-----------------|-------------------------------|--------------------------|-----------------|
//! | `increment_by`  | counted or inserted           | `k` was dropped          | n/a             |
//! | `update`        | overwritten or inserted       | `k` was dropped          | offered key `k` |
//!
//! A `maxsize` of zero is a usage error on every mutating call and is
//! reported before the table is touched.

use rustc_hash::FxHashSet;

use crate::codec::{self, LegacyRecord};
use crate::error::{ConfigError, DecodeError, InvariantError};

/// A live `(key, count)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry {
    pub key: String,
    pub count: u64,
}

impl Entry {
    #[inline]
    pub fn new(key: impl Into<String>, count: u64) -> Self {
        Self {
            key: key.into(),
            count,
        }
    }
}

impl<K: Into<String>> From<(K, u64)> for Entry {
    fn from((key, count): (K, u64)) -> Self {
        Self::new(key, count)
    }
}

/// Entries with unique keys, ordered by count descending.
///
/// The only input [`TopK::load`] accepts. Built by [`SortedEntries::new`],
/// which checks both properties, or internally from a decoded payload or a
/// legacy record, which already guarantee them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortedEntries(Vec<Entry>);

impl SortedEntries {
    /// Validates `entries`, rejecting duplicate keys and ascending steps.
    ///
    /// # Example
    ///
    /// ```
    /// use topkit::traits::{Entry, SortedEntries};
    ///
    /// assert!(SortedEntries::new(vec![Entry::new("a", 2), Entry::new("b", 2)]).is_ok());
    /// assert!(SortedEntries::new(vec![Entry::new("a", 2), Entry::new("a", 1)]).is_err());
    /// assert!(SortedEntries::new(vec![Entry::new("a", 1), Entry::new("b", 2)]).is_err());
    /// ```
    pub fn new(entries: Vec<Entry>) -> Result<Self, InvariantError> {
        if let Some(pos) = entries.windows(2).position(|w| w[1].count > w[0].count) {
            return Err(InvariantError::new(format!(
                "entries not sorted by count descending at position {}",
                pos + 1
            )));
        }
        let mut seen = FxHashSet::with_capacity_and_hasher(entries.len(), Default::default());
        for entry in &entries {
            if !seen.insert(entry.key.as_str()) {
                return Err(InvariantError::new(format!(
                    "duplicate key {:?} in entries",
                    entry.key
                )));
            }
        }
        Ok(Self(entries))
    }

    /// Wraps entries whose producer already guarantees order and uniqueness.
    pub(crate) fn trusted(entries: Vec<Entry>) -> Self {
        debug_assert!(Self::new(entries.clone()).is_ok());
        Self(entries)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Entry] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Entry> {
        self.0
    }
}

impl TryFrom<Vec<Entry>> for SortedEntries {
    type Error = InvariantError;

    fn try_from(entries: Vec<Entry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl IntoIterator for SortedEntries {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Result of [`TopK::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The key was overwritten in place or inserted into a free slot.
    Accepted,
    /// The key replaced the contained key, which is no longer tracked.
    Evicted(String),
    /// The table was full and the offered count did not beat the minimum.
    Rejected(String),
}

impl UpdateOutcome {
    /// Collapses to the historical "evicted-or-rejected-key-or-none" form.
    pub fn into_key(self) -> Option<String> {
        match self {
            UpdateOutcome::Accepted => None,
            UpdateOutcome::Evicted(key) | UpdateOutcome::Rejected(key) => Some(key),
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, UpdateOutcome::Rejected(_))
    }
}

/// Read-only view of a top-K table.
pub trait ReadOnlyTopK {
    /// Returns the estimated count for `key`, or `None` if not tracked.
    fn get(&self, key: &str) -> Option<u64>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of live entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocated capacity; grows to the largest `maxsize` seen, never shrinks.
    fn capacity(&self) -> usize;

    /// The current eviction floor, or `None` when empty.
    fn min_count(&self) -> Option<u64>;

    /// Iterates live entries from largest to smallest count.
    fn iter(&self) -> impl ExactSizeIterator<Item = (&str, u64)> + '_;

    /// Returns all live entries from largest to smallest count.
    fn sorted_entries(&self) -> Vec<Entry> {
        self.iter().map(|(key, count)| Entry::new(key, count)).collect()
    }
}

/// Mutable top-K contract shared by every store.
pub trait TopK: ReadOnlyTopK {
    /// Counts one occurrence of `key`. See [`TopK::increment_by`].
    fn increment(&mut self, key: &str, maxsize: usize) -> Result<Option<String>, ConfigError> {
        self.increment_by(key, 1, maxsize)
    }

    /// Adds `weight` to `key`, inserting it if absent.
    ///
    /// When the table is full the new key takes over the minimum entry's
    /// count plus `weight`; the evicted key is returned.
    fn increment_by(
        &mut self,
        key: &str,
        weight: u64,
        maxsize: usize,
    ) -> Result<Option<String>, ConfigError>;

    /// Adds one to `key` only if it is already tracked.
    fn increment_existing(&mut self, key: &str) -> bool;

    /// Sets `key` to the literal `count`.
    ///
    /// A new key is admitted into a full table only if `count` exceeds the
    /// current minimum; otherwise the offered key is handed back as
    /// [`UpdateOutcome::Rejected`].
    fn update(
        &mut self,
        key: &str,
        count: u64,
        maxsize: usize,
    ) -> Result<UpdateOutcome, ConfigError>;

    /// Removes every entry. Allocated capacity is kept.
    fn clear(&mut self);

    /// Replaces the table contents with `entries`.
    ///
    /// Capacity grows to `entries.len()` if needed.
    fn load(&mut self, entries: SortedEntries);

    /// Validates `entries` and replaces the table contents with them.
    ///
    /// On error the table is left exactly as it was.
    fn load_sorted(&mut self, entries: Vec<Entry>) -> Result<(), InvariantError> {
        self.load(SortedEntries::new(entries)?);
        Ok(())
    }

    /// Serializes the table in the ordered wire layout.
    fn encode(&self) -> Vec<u8> {
        codec::encode(self.iter())
    }

    /// Replaces the table contents with a decoded payload.
    ///
    /// Accepts both the ordered and the legacy unordered layouts. On error the
    /// table is left exactly as it was.
    fn decode(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        let entries = codec::decode(bytes)?;
        self.load(SortedEntries::trusted(entries));
        Ok(())
    }

    /// Replaces the table contents with an upgraded legacy record.
    fn import_legacy(&mut self, record: LegacyRecord) {
        self.load(SortedEntries::trusted(record.into_sorted_entries()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_outcome_into_key() {
        assert_eq!(UpdateOutcome::Accepted.into_key(), None);
        assert_eq!(
            UpdateOutcome::Evicted("a".into()).into_key(),
            Some("a".to_string())
        );
        let rejected = UpdateOutcome::Rejected("b".into());
        assert!(rejected.is_rejected());
        assert_eq!(rejected.into_key(), Some("b".to_string()));
    }

    #[test]
    fn sorted_entries_accepts_ties_and_empty() {
        assert!(SortedEntries::new(Vec::new()).unwrap().is_empty());
        let entries = SortedEntries::try_from(vec![
            Entry::new("a", 3),
            Entry::new("b", 3),
            Entry::new("c", 0),
        ])
        .unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries.as_slice()[1], Entry::new("b", 3));
    }

    #[test]
    fn sorted_entries_rejects_duplicates_and_disorder() {
        let dup = SortedEntries::new(vec![Entry::new("a", 2), Entry::new("a", 1)]).unwrap_err();
        assert!(dup.message().contains("duplicate key \"a\""));

        let unsorted =
            SortedEntries::new(vec![Entry::new("a", 1), Entry::new("b", 5)]).unwrap_err();
        assert!(unsorted.message().contains("position 1"));
    }

    #[test]
    fn entry_from_tuple() {
        let e: Entry = ("k", 4).into();
        assert_eq!(e, Entry::new("k", 4));
    }
}
