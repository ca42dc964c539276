//! Array-backed top-K store.
//!
//! Keeps live entries in two parallel vectors sorted by count descending and
//! a hash index from key to slot. Increments restore order by shifting the
//! run of smaller neighbours one slot right; eviction picks uniformly among
//! the slots tied at the floor count.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          ArrayTopK Layout                               │
//! │                                                                         │
//! │   index: KeyIndex<usize>         keys / counts (descending)             │
//! │   ┌────────┬──────┐              ┌─────┬─────┬─────┬─────┬─────┐        │
//! │   │ "home" │  0   │──────────►   │home │cart │ faq │ tos │ 404 │ keys   │
//! │   │ "cart" │  1   │              ├─────┼─────┼─────┼─────┼─────┤        │
//! │   │ "faq"  │  2   │              │  9  │  7  │  3  │  3  │  3  │ counts │
//! │   │  ...   │ ...  │              └─────┴─────┴─────┴─────┴─────┘        │
//! │   └────────┴──────┘                 0     1     2     3     4           │
//! │                                                 └── tied floor ──┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//!
//! Reindex (after counts[3] += 5 → 8)
//! ──────────────────────────────────
//!
//!   before: [home:9, cart:7, faq:3, tos:8, 404:3]
//!   scan left while left neighbour < 8: stops at slot 1
//!   rotate run 1..=3 right by one:
//!   after:  [home:9, tos:8, cart:7, faq:3, 404:3]
//!   reindex slots 1, 2, 3
//!
//! Replace (table full, new key "blog", additive weight 1)
//! ────────────────────────────────────────────────────────
//!
//!   1. victim = uniform slot in tied floor run {2, 3, 4}, say 2 ("faq")
//!   2. move last key ("404") into slot 2, fix its index
//!   3. write "blog" into slot 4 with count 3 + 1
//!   4. reindex slot 4
//! ```
//!
//! ## Operations
//!
//! | Operation            | Time                 | Notes                              |
//! |----------------------|----------------------|------------------------------------|
//! | `get`                | O(1)                 | Hash lookup                        |
//! | `increment_by`       | O(d) / O(d + r)      | d = slots moved, r = tied run scan |
//! | `increment_existing` | O(d)                 | No insertion                       |
//! | `update`             | O(1) / O(d + r)      | Present keys are not reindexed     |
//! | `iter`               | O(n)                 | Already in order                   |
//!
//! ## Capacity
//!
//! Storage grows lazily to the largest `maxsize` seen and never shrinks.
//! Growth only happens once the current allocation is full, so a call with a
//! smaller `maxsize` than a previous one still fills free slots. `len()` never
//! exceeds the largest `maxsize` passed so far.
//!
//! ## Update of a present key
//!
//! [`TopK::update`] overwrites a present key's count without reindexing. This
//! matches long-standing behaviour of the array store and means the order may
//! be left unsorted until a later increment touches the key. Insertions and
//! replacements through `update` are always reindexed.
//!
//! ## Example
//!
//! ```
//! use topkit::store::array::ArrayTopK;
//! use topkit::traits::{ReadOnlyTopK, TopK};
//!
//! let mut top = ArrayTopK::with_seed(3);
//! for word in ["a", "b", "a", "c", "a", "b"] {
//!     top.increment(word, 2).unwrap();
//! }
//!
//! assert_eq!(top.len(), 2);
//! assert_eq!(top.get("a"), Some(3));
//! let order: Vec<_> = top.iter().map(|(k, _)| k).collect();
//! assert_eq!(order[0], "a");
//! ```

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::codec::LegacyRecord;
use crate::ds::eviction::select_min_element;
use crate::ds::key_index::KeyIndex;
use crate::error::{ConfigError, InvariantError, check_maxsize};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::TopKMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::TopKMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{MetricsReset, MetricsSnapshotProvider, TopKMetricsRecorder};
use crate::traits::{Entry, ReadOnlyTopK, SortedEntries, TopK, UpdateOutcome};

/// Top-K counter over parallel sorted arrays.
///
/// `R` is the random source used to break ties at the eviction floor.
#[derive(Debug)]
pub struct ArrayTopK<R = SmallRng> {
    keys: Vec<String>,
    counts: Vec<u64>,
    index: KeyIndex<usize>,
    /// Admission bound; the largest `maxsize` grown to so far.
    capacity: usize,
    rng: R,
    #[cfg(feature = "metrics")]
    metrics: TopKMetrics,
}

impl ArrayTopK<SmallRng> {
    /// Creates an empty table with an entropy-seeded tie-breaker.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_os_rng())
    }

    /// Creates an empty table whose tie-breaks are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    /// Builds a table from an upgraded legacy record.
    pub fn from_legacy(record: LegacyRecord) -> Self {
        let mut table = Self::new();
        table.import_legacy(record);
        table
    }
}

impl Default for ArrayTopK<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> ArrayTopK<R> {
    /// Creates an empty table with an injected random source.
    pub fn with_rng(rng: R) -> Self {
        Self {
            keys: Vec::new(),
            counts: Vec::new(),
            index: KeyIndex::new(),
            capacity: 0,
            rng,
            #[cfg(feature = "metrics")]
            metrics: TopKMetrics::default(),
        }
    }

    /// Reserves memory for `additional` more entries without raising the
    /// admission bound.
    pub fn preallocate(&mut self, additional: usize) {
        self.keys.reserve(additional);
        self.counts.reserve(additional);
        self.index.reserve_to(self.keys.len() + additional);
    }

    /// Grows storage to `new_capacity` once the current allocation is full.
    fn resize(&mut self, new_capacity: usize) {
        if self.keys.len() < self.capacity || new_capacity <= self.capacity {
            return;
        }
        let additional = new_capacity - self.keys.len();
        self.keys.reserve_exact(additional);
        self.counts.reserve_exact(additional);
        self.index.reserve_to(new_capacity);
        self.capacity = new_capacity;
    }

    /// Moves the entry at `target` left past every smaller neighbour.
    ///
    /// Returns the entry's new slot.
    fn reindex(&mut self, target: usize) -> usize {
        let value = self.counts[target];
        let mut position = target;
        while position > 0 && value > self.counts[position - 1] {
            position -= 1;
        }
        if position != target {
            self.keys[position..=target].rotate_right(1);
            self.counts[position..=target].rotate_right(1);
            for slot in position..=target {
                self.index.set(&self.keys[slot], slot);
            }
            #[cfg(feature = "metrics")]
            self.metrics.record_reorder_steps((target - position) as u64);
        }
        position
    }

    /// Appends a new key in the next free slot and reorders it.
    fn push(&mut self, key: &str, count: u64) {
        let slot = self.keys.len();
        self.keys.push(key.to_owned());
        self.counts.push(count);
        self.index.insert(key.to_owned(), slot);
        self.reindex(slot);
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();
    }

    /// Evicts a floor entry and installs `key` in its place.
    ///
    /// The new count is `weight` plus the evicted floor count when `additive`,
    /// otherwise `weight` verbatim.
    fn replace(&mut self, key: &str, weight: u64, additive: bool) -> String {
        let last = self.keys.len() - 1;
        let position = select_min_element(&self.counts, &mut self.rng).unwrap_or(last);

        // Keep the live region contiguous: the last key fills the victim's slot.
        let moved = std::mem::replace(&mut self.keys[last], key.to_owned());
        let evicted = if position == last {
            moved
        } else {
            let evicted = std::mem::replace(&mut self.keys[position], moved);
            self.index.set(&self.keys[position], position);
            evicted
        };
        self.index.remove(&evicted);
        self.index.insert(key.to_owned(), last);

        let base = if additive { self.counts[last] } else { 0 };
        self.counts[last] = base.saturating_add(weight);
        self.reindex(last);

        tracing::trace!(evicted = %evicted, key, additive, "evicted floor entry");
        #[cfg(feature = "metrics")]
        self.metrics.record_eviction();
        evicted
    }

    /// Verifies ordering and index bookkeeping.
    ///
    /// Ordering can legitimately fail after [`TopK::update`] overwrote a
    /// present key with a larger count.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.keys.len() != self.counts.len() {
            return Err(InvariantError::new(format!(
                "keys/counts length mismatch: {} vs {}",
                self.keys.len(),
                self.counts.len()
            )));
        }
        if self.index.len() != self.keys.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys, table holds {}",
                self.index.len(),
                self.keys.len()
            )));
        }
        if self.keys.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.keys.len(),
                self.capacity
            )));
        }
        for (slot, key) in self.keys.iter().enumerate() {
            if self.index.get(key) != Some(slot) {
                return Err(InvariantError::new(format!(
                    "key {key:?} in slot {slot} indexed at {:?}",
                    self.index.get(key)
                )));
            }
        }
        if let Some(slot) = self.counts.windows(2).position(|w| w[1] > w[0]) {
            return Err(InvariantError::new(format!(
                "slot {} count {} exceeds slot {} count {}",
                slot + 1,
                self.counts[slot + 1],
                slot,
                self.counts[slot]
            )));
        }
        Ok(())
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> TopKMetricsSnapshot {
        self.metrics.snapshot(self.keys.len(), self.capacity)
    }
}

impl<R: Rng> ReadOnlyTopK for ArrayTopK<R> {
    #[inline]
    fn get(&self, key: &str) -> Option<u64> {
        self.index.get(key).map(|slot| self.counts[slot])
    }

    #[inline]
    fn contains(&self, key: &str) -> bool {
        self.index.contains(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    fn min_count(&self) -> Option<u64> {
        self.counts.last().copied()
    }

    fn iter(&self) -> impl ExactSizeIterator<Item = (&str, u64)> + '_ {
        self.keys
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().copied())
    }
}

impl<R: Rng> TopK for ArrayTopK<R> {
    fn increment_by(
        &mut self,
        key: &str,
        weight: u64,
        maxsize: usize,
    ) -> Result<Option<String>, ConfigError> {
        check_maxsize(maxsize)?;
        #[cfg(feature = "metrics")]
        self.metrics.record_increment_call();

        if let Some(position) = self.index.get(key) {
            self.counts[position] = self.counts[position].saturating_add(weight);
            self.reindex(position);
            #[cfg(feature = "metrics")]
            self.metrics.record_increment_hit();
            return Ok(None);
        }

        self.resize(maxsize);
        if self.keys.len() < self.capacity {
            self.push(key, weight);
            return Ok(None);
        }
        Ok(Some(self.replace(key, weight, true)))
    }

    fn increment_existing(&mut self, key: &str) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_increment_existing_call();

        match self.index.get(key) {
            Some(position) => {
                self.counts[position] = self.counts[position].saturating_add(1);
                self.reindex(position);
                #[cfg(feature = "metrics")]
                self.metrics.record_increment_existing_hit();
                true
            },
            None => false,
        }
    }

    fn update(
        &mut self,
        key: &str,
        count: u64,
        maxsize: usize,
    ) -> Result<UpdateOutcome, ConfigError> {
        check_maxsize(maxsize)?;
        #[cfg(feature = "metrics")]
        self.metrics.record_update_call();

        if let Some(position) = self.index.get(key) {
            // Overwrite in place, no reindex.
            self.counts[position] = count;
            return Ok(UpdateOutcome::Accepted);
        }

        self.resize(maxsize);
        if self.keys.len() < self.capacity {
            self.push(key, count);
            return Ok(UpdateOutcome::Accepted);
        }

        let floor = self.counts[self.keys.len() - 1];
        if count <= floor {
            tracing::trace!(key, count, floor, "update rejected below floor");
            #[cfg(feature = "metrics")]
            self.metrics.record_update_rejected();
            return Ok(UpdateOutcome::Rejected(key.to_owned()));
        }
        Ok(UpdateOutcome::Evicted(self.replace(key, count, false)))
    }

    fn clear(&mut self) {
        self.keys.clear();
        self.counts.clear();
        self.index.clear();
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    fn load(&mut self, entries: SortedEntries) {
        self.clear();
        let n = entries.len();
        if n > self.capacity {
            self.capacity = n;
        }
        self.preallocate(self.capacity);
        for (slot, Entry { key, count }) in entries.into_iter().enumerate() {
            self.index.insert(key.clone(), slot);
            self.keys.push(key);
            self.counts.push(count);
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_load();
    }
}

#[cfg(feature = "metrics")]
impl<R: Rng> MetricsSnapshotProvider<TopKMetricsSnapshot> for ArrayTopK<R> {
    fn snapshot(&self) -> TopKMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<R: Rng> MetricsReset for ArrayTopK<R> {
    fn reset_metrics(&mut self) {
        self.metrics = TopKMetrics::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: usize, maxsize: usize) -> ArrayTopK {
        let mut table = ArrayTopK::with_seed(17);
        for i in 0..n {
            assert_eq!(table.increment(&i.to_string(), maxsize).unwrap(), None);
        }
        table
    }

    fn counts(table: &ArrayTopK) -> Vec<u64> {
        table.iter().map(|(_, c)| c).collect()
    }

    mod basic_behavior {
        use super::*;

        #[test]
        fn starts_empty_without_allocation() {
            let table = ArrayTopK::with_seed(0);
            assert_eq!(table.len(), 0);
            assert_eq!(table.capacity(), 0);
            assert_eq!(table.min_count(), None);
            assert!(table.sorted_entries().is_empty());
        }

        #[test]
        fn zero_maxsize_is_rejected_before_mutation() {
            let mut table = filled(3, 3);
            assert!(table.increment("x", 0).is_err());
            assert!(table.increment_by("0", 5, 0).is_err());
            assert!(table.update("y", 10, 0).is_err());
            assert_eq!(table.len(), 3);
            assert_eq!(table.get("0"), Some(1));
            assert_eq!(table.get("x"), None);
        }

        #[test]
        fn increment_existing_only_touches_present_keys() {
            let mut table = filled(2, 4);
            assert!(table.increment_existing("1"));
            assert!(!table.increment_existing("nope"));
            assert_eq!(table.len(), 2);
            assert_eq!(table.get("1"), Some(2));
            assert_eq!(table.iter().next(), Some(("1", 2)));
        }

        #[test]
        fn weights_saturate() {
            let mut table = ArrayTopK::with_seed(0);
            table.increment_by("a", u64::MAX - 1, 1).unwrap();
            table.increment_by("a", 10, 1).unwrap();
            assert_eq!(table.get("a"), Some(u64::MAX));
        }

        #[test]
        fn clear_keeps_capacity() {
            let mut table = filled(4, 4);
            table.clear();
            assert!(table.is_empty());
            assert_eq!(table.capacity(), 4);
            assert_eq!(table.get("0"), None);
        }
    }

    mod ordering {
        use super::*;

        #[test]
        fn reindex_shifts_run_and_fixes_index() {
            let mut table = filled(5, 5);
            table.increment_by("3", 4, 5).unwrap();
            table.increment_by("1", 2, 5).unwrap();
            assert_eq!(counts(&table), vec![5, 3, 1, 1, 1]);
            assert_eq!(table.iter().next(), Some(("3", 5)));
            table.check_invariants().unwrap();
        }

        #[test]
        fn ties_do_not_move() {
            let mut table = filled(3, 3);
            let before: Vec<_> = table.iter().map(|(k, _)| k.to_string()).collect();
            table.increment_by("2", 0, 3).unwrap();
            let after: Vec<_> = table.iter().map(|(k, _)| k.to_string()).collect();
            assert_eq!(before, after);
        }

        #[test]
        fn new_heavy_key_is_placed_in_order() {
            let mut table = filled(3, 5);
            table.increment_by("heavy", 10, 5).unwrap();
            assert_eq!(table.iter().next(), Some(("heavy", 10)));
            table.check_invariants().unwrap();
        }
    }

    mod eviction {
        use super::*;

        #[test]
        fn additive_replace_inherits_floor() {
            let mut table = filled(100, 100);
            let evicted = table.increment_by("101", 2, 100).unwrap().unwrap();
            assert_eq!(table.get(&evicted), None);
            assert_eq!(table.get("101"), Some(3));
            assert_eq!(table.len(), 100);
            table.check_invariants().unwrap();
        }

        #[test]
        fn unique_floor_is_always_evicted() {
            let mut table = ArrayTopK::with_seed(5);
            table.increment_by("big", 9, 3).unwrap();
            table.increment_by("mid", 5, 3).unwrap();
            table.increment_by("small", 1, 3).unwrap();
            assert_eq!(table.increment("new", 3).unwrap(), Some("small".into()));
            assert_eq!(table.get("new"), Some(2));
        }

        #[test]
        fn tie_break_reaches_every_slot_in_run() {
            let mut hits = std::collections::HashSet::new();
            for seed in 0..200 {
                let mut table = ArrayTopK::with_seed(seed);
                table.increment_by("top", 50, 4).unwrap();
                for key in ["a", "b", "c"] {
                    table.increment(key, 4).unwrap();
                }
                hits.insert(table.increment("new", 4).unwrap().unwrap());
            }
            let expected: std::collections::HashSet<String> =
                ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
            assert_eq!(hits, expected);
        }

        #[test]
        fn seeded_tables_evict_identically() {
            let run = |seed| {
                let mut table = filled(10, 10);
                table.rng = SmallRng::seed_from_u64(seed);
                (0..20)
                    .map(|i| table.increment(&format!("n{i}"), 10).unwrap())
                    .collect::<Vec<_>>()
            };
            assert_eq!(run(9), run(9));
        }
    }

    mod update {
        use super::*;

        #[test]
        fn rejected_below_or_at_floor() {
            let mut table = filled(3, 3);
            let before = table.sorted_entries();
            assert_eq!(
                table.update("z", 1, 3).unwrap(),
                UpdateOutcome::Rejected("z".into())
            );
            assert_eq!(table.sorted_entries(), before);
        }

        #[test]
        fn absolute_replace_above_floor() {
            let mut table = filled(3, 3);
            let outcome = table.update("z", 7, 3).unwrap();
            let UpdateOutcome::Evicted(evicted) = outcome else {
                panic!("expected eviction, got {outcome:?}");
            };
            assert_eq!(table.get(&evicted), None);
            assert_eq!(table.get("z"), Some(7));
            assert_eq!(table.iter().next(), Some(("z", 7)));
            table.check_invariants().unwrap();
        }

        #[test]
        fn present_key_is_overwritten_without_reindex() {
            let mut table = filled(3, 3);
            let last = table.iter().last().unwrap().0.to_string();
            assert_eq!(table.update(&last, 50, 3).unwrap(), UpdateOutcome::Accepted);
            assert_eq!(table.get(&last), Some(50));
            // Still in the last slot: ordering is not restored here.
            assert_eq!(table.iter().last(), Some((last.as_str(), 50)));
            assert!(table.check_invariants().is_err());

            // The next increment of that key repairs its position.
            table.increment_by(&last, 0, 3).unwrap();
            assert_eq!(table.iter().next(), Some((last.as_str(), 50)));
            table.check_invariants().unwrap();
        }
    }

    mod capacity {
        use super::*;

        #[test]
        fn grows_to_largest_maxsize_and_never_shrinks() {
            let mut table = filled(2, 2);
            assert_eq!(table.capacity(), 2);
            table.increment("x", 5).unwrap();
            assert_eq!(table.capacity(), 5);
            // A smaller bound still fills free slots of the existing allocation.
            assert_eq!(table.increment("y", 2).unwrap(), None);
            assert_eq!(table.len(), 4);
            assert_eq!(table.capacity(), 5);
        }

        #[test]
        fn preallocate_does_not_raise_bound() {
            let mut table = ArrayTopK::with_seed(1);
            table.preallocate(64);
            assert_eq!(table.capacity(), 0);
            table.increment("a", 1).unwrap();
            assert!(table.increment("b", 1).unwrap().is_some());
        }
    }

    mod codec {
        use super::*;

        #[test]
        fn decode_replaces_contents_and_grows_capacity() {
            let mut source = ArrayTopK::with_seed(2);
            for (key, count) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
                source.update(key, count, 5).unwrap();
            }
            let bytes = source.encode();

            let mut target = filled(2, 2);
            target.decode(&bytes).unwrap();
            assert_eq!(target.sorted_entries(), source.sorted_entries());
            assert_eq!(target.capacity(), 4);
            assert_eq!(target.get("0"), None);
            target.check_invariants().unwrap();
        }

        #[test]
        fn failed_decode_leaves_table_untouched() {
            let mut table = filled(3, 3);
            let before = table.sorted_entries();
            let mut bytes = table.encode();
            bytes.truncate(bytes.len() - 1);
            assert!(table.decode(&bytes).is_err());
            assert_eq!(table.sorted_entries(), before);
        }

        #[test]
        fn legacy_record_import() {
            let record = LegacyRecord::from_counts([("x", 2), ("y", 8), ("z", 5)]);
            let table = ArrayTopK::from_legacy(record);
            assert_eq!(
                table.sorted_entries(),
                vec![Entry::new("y", 8), Entry::new("z", 5), Entry::new("x", 2)]
            );
            table.check_invariants().unwrap();
        }
    }

    #[cfg(feature = "metrics")]
    mod metrics {
        use super::*;

        #[test]
        fn counters_follow_operations() {
            let mut table = filled(2, 2);
            table.increment("0", 2).unwrap();
            table.increment("new", 2).unwrap();
            table.update("low", 0, 2).unwrap();
            table.increment_existing("missing");

            let snap = table.metrics_snapshot();
            assert_eq!(snap.increment_calls, 4);
            assert_eq!(snap.increment_hits, 1);
            assert_eq!(snap.inserts, 2);
            assert_eq!(snap.evictions, 1);
            assert_eq!(snap.update_calls, 1);
            assert_eq!(snap.update_rejections, 1);
            assert_eq!(snap.increment_existing_calls, 1);
            assert_eq!(snap.increment_existing_hits, 0);
            assert_eq!(snap.len, 2);
            assert_eq!(snap.capacity, 2);

            table.reset_metrics();
            assert_eq!(table.snapshot().increment_calls, 0);
        }
    }
}
