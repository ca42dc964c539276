//! Sentinel-bounded linked-list top-K store.
//!
//! Live entries form a doubly linked chain between two permanent sentinel
//! nodes. Walking `next` from the floor sentinel visits counts ascending;
//! walking `prev` from the ceiling visits them descending. Nodes live in a
//! [`SlotArena`] and link to each other by [`SlotId`], so there are no raw
//! pointers and no `Rc<RefCell<_>>` cycles.
//!
//! ## Architecture
//!
//! ```text
//!   index: KeyIndex<SlotId>
//!   ┌────────┬────┐
//!   │ "faq"  │ #4 │──┐
//!   │ "home" │ #2 │──┼───────────────────────────────┐
//!   │ "cart" │ #3 │──┼──────────────┐                │
//!   └────────┴────┘  │              │                │
//!                    ▼              ▼                ▼
//!   ┌───────┐    ┌───────┐     ┌────────┐      ┌────────┐    ┌─────────┐
//!   │ floor │───►│ faq:3 │────►│ cart:7 │─────►│ home:9 │───►│ ceiling │
//!   │  -∞   │◄───│  #4   │◄────│   #3   │◄─────│   #2   │◄───│   +∞    │
//!   └───────┘    └───────┘     └────────┘      └────────┘    └─────────┘
//!     #0           ▲ evicted next                               #1
//! ```
//!
//! ## Moves
//!
//! After a node's count rises above its successor's, it is unlinked and
//! re-inserted by walking toward the ceiling from its old successor until the
//! next node's count is at least its own. A node that catches up with a run
//! of equal counts lands below that run, so among ties the most recently
//! moved key is evicted first.
//!
//! ## Eviction
//!
//! Always the node next to the floor. Its node is reused in place for the
//! incoming key, so eviction never allocates. There is no random tie-break.
//!
//! ## Operations
//!
//! | Operation            | Time             | Notes                        |
//! |----------------------|------------------|------------------------------|
//! | `get`                | O(1)             | Hash lookup                  |
//! | `increment_by`       | O(d)             | d = nodes walked past        |
//! | `update` (present)   | O(n)             | Re-inserted from the floor   |
//! | `iter`               | O(n)             | Ceiling to floor             |
//!
//! ## Example
//!
//! ```
//! use topkit::store::list::ListTopK;
//! use topkit::traits::{ReadOnlyTopK, TopK};
//!
//! let mut top = ListTopK::new();
//! top.increment_by("x", 4, 2).unwrap();
//! top.increment_by("y", 2, 2).unwrap();
//! assert_eq!(top.increment("z", 2).unwrap(), Some("y".to_string()));
//! assert_eq!(top.get("z"), Some(3));
//! ```

use crate::codec::LegacyRecord;
use crate::ds::key_index::KeyIndex;
use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::{ConfigError, InvariantError, check_maxsize};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::TopKMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::TopKMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{MetricsReset, MetricsSnapshotProvider, TopKMetricsRecorder};
use crate::traits::{Entry, ReadOnlyTopK, SortedEntries, TopK, UpdateOutcome};

const FLOOR: SlotId = SlotId(0);
const CEILING: SlotId = SlotId(1);

/// Node ordering key; sentinels compare below and above every count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Weight {
    Floor,
    Count(u64),
    Ceiling,
}

impl Weight {
    /// Count of a live node. Sentinels map to the ends of the `u64` range.
    #[inline]
    fn value(self) -> u64 {
        match self {
            Weight::Floor => 0,
            Weight::Count(count) => count,
            Weight::Ceiling => u64::MAX,
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    key: String,
    weight: Weight,
    prev: SlotId,
    next: SlotId,
}

impl Node {
    fn sentinel(weight: Weight) -> Self {
        Self {
            key: String::new(),
            weight,
            prev: FLOOR,
            next: CEILING,
        }
    }
}

/// Top-K counter over a sentinel-bounded linked list.
#[derive(Debug, Clone)]
pub struct ListTopK {
    nodes: SlotArena<Node>,
    index: KeyIndex<SlotId>,
    /// Largest `maxsize` seen.
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: TopKMetrics,
}

impl ListTopK {
    pub fn new() -> Self {
        Self {
            nodes: SlotArena::with_pinned([
                Node::sentinel(Weight::Floor),
                Node::sentinel(Weight::Ceiling),
            ]),
            index: KeyIndex::new(),
            capacity: 0,
            #[cfg(feature = "metrics")]
            metrics: TopKMetrics::default(),
        }
    }

    /// Builds a table from an upgraded legacy record.
    pub fn from_legacy(record: LegacyRecord) -> Self {
        let mut table = Self::new();
        table.import_legacy(record);
        table
    }

    /// Reserves memory for `additional` more entries without raising the
    /// recorded capacity.
    pub fn preallocate(&mut self, additional: usize) {
        let target = self.index.len() + additional;
        self.nodes.reserve_to(target);
        self.index.reserve_to(target);
    }

    fn grow(&mut self, maxsize: usize) {
        if maxsize > self.capacity {
            self.nodes.reserve_to(maxsize);
            self.index.reserve_to(maxsize);
            self.capacity = maxsize;
        }
    }

    fn unlink(&mut self, id: SlotId) {
        let (prev, next) = (self.nodes[id].prev, self.nodes[id].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    fn insert_after(&mut self, anchor: SlotId, id: SlotId) {
        let next = self.nodes[anchor].next;
        self.nodes[id].prev = anchor;
        self.nodes[id].next = next;
        self.nodes[anchor].next = id;
        self.nodes[next].prev = id;
    }

    /// Splices `id` in after the last node, walking up from `start`, whose
    /// count is below its own. The ceiling stops every walk.
    fn find_and_insert(&mut self, id: SlotId, start: SlotId) {
        let weight = self.nodes[id].weight;
        let mut anchor = start;
        let mut steps = 0u64;
        loop {
            let next = self.nodes[anchor].next;
            if self.nodes[next].weight >= weight {
                break;
            }
            anchor = next;
            steps += 1;
        }
        self.insert_after(anchor, id);
        #[cfg(feature = "metrics")]
        self.metrics.record_reorder_steps(steps);
        #[cfg(not(feature = "metrics"))]
        let _ = steps;
    }

    /// Restores order after `id`'s count went up.
    fn move_up(&mut self, id: SlotId) {
        let hint = self.nodes[id].next;
        if self.nodes[id].weight > self.nodes[hint].weight {
            self.unlink(id);
            self.find_and_insert(id, hint);
        }
    }

    /// Allocates a node for a new key and links it into place.
    fn push(&mut self, key: &str, count: u64) {
        let id = self.nodes.insert(Node {
            key: key.to_owned(),
            weight: Weight::Count(count),
            prev: FLOOR,
            next: CEILING,
        });
        self.index.insert(key.to_owned(), id);
        self.find_and_insert(id, FLOOR);
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();
    }

    /// Reuses the minimum node for `key`.
    ///
    /// The new count is `weight` plus the evicted count when `additive`,
    /// otherwise `weight` verbatim.
    fn replace_min(&mut self, key: &str, weight: u64, additive: bool) -> String {
        let victim = self.nodes[FLOOR].next;
        let node = &mut self.nodes[victim];
        let evicted = std::mem::replace(&mut node.key, key.to_owned());
        let base = if additive { node.weight.value() } else { 0 };
        node.weight = Weight::Count(base.saturating_add(weight));

        self.index.remove(&evicted);
        self.index.insert(key.to_owned(), victim);
        self.move_up(victim);

        tracing::trace!(evicted = %evicted, key, additive, "evicted floor entry");
        #[cfg(feature = "metrics")]
        self.metrics.record_eviction();
        evicted
    }

    /// Walks the chain and checks links, ordering and index bookkeeping.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.nodes.len() != self.index.len() + 2 {
            return Err(InvariantError::new(format!(
                "arena holds {} nodes for {} keys",
                self.nodes.len(),
                self.index.len()
            )));
        }
        if self.index.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.index.len(),
                self.capacity
            )));
        }

        let mut seen = 0usize;
        let mut current = FLOOR;
        loop {
            let next = self.nodes[current].next;
            if self.nodes[next].prev != current {
                return Err(InvariantError::new(format!(
                    "broken back link between #{} and #{}",
                    current.index(),
                    next.index()
                )));
            }
            if self.nodes[next].weight < self.nodes[current].weight {
                return Err(InvariantError::new(format!(
                    "#{} ({:?}) precedes smaller #{} ({:?})",
                    current.index(),
                    self.nodes[current].weight,
                    next.index(),
                    self.nodes[next].weight
                )));
            }
            if next == CEILING {
                break;
            }
            let node = &self.nodes[next];
            if !matches!(node.weight, Weight::Count(_)) {
                return Err(InvariantError::new(format!(
                    "sentinel weight on live node #{}",
                    next.index()
                )));
            }
            if self.index.get(&node.key) != Some(next) {
                return Err(InvariantError::new(format!(
                    "key {:?} at #{} indexed at {:?}",
                    node.key,
                    next.index(),
                    self.index.get(&node.key)
                )));
            }
            seen += 1;
            if seen > self.index.len() {
                return Err(InvariantError::new("chain longer than index"));
            }
            current = next;
        }
        if seen != self.index.len() {
            return Err(InvariantError::new(format!(
                "chain holds {} nodes, index {}",
                seen,
                self.index.len()
            )));
        }
        Ok(())
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> TopKMetricsSnapshot {
        self.metrics.snapshot(self.index.len(), self.capacity)
    }
}

impl Default for ListTopK {
    fn default() -> Self {
        Self::new()
    }
}

/// Descending iterator over a [`ListTopK`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    nodes: &'a SlotArena<Node>,
    cursor: SlotId,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, u64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == FLOOR {
            return None;
        }
        let node = &self.nodes[self.cursor];
        self.cursor = node.prev;
        self.remaining -= 1;
        Some((node.key.as_str(), node.weight.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl ReadOnlyTopK for ListTopK {
    #[inline]
    fn get(&self, key: &str) -> Option<u64> {
        self.index.get(key).map(|id| self.nodes[id].weight.value())
    }

    #[inline]
    fn contains(&self, key: &str) -> bool {
        self.index.contains(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn min_count(&self) -> Option<u64> {
        match self.nodes[FLOOR].next {
            CEILING => None,
            id => Some(self.nodes[id].weight.value()),
        }
    }

    fn iter(&self) -> impl ExactSizeIterator<Item = (&str, u64)> + '_ {
        Iter {
            nodes: &self.nodes,
            cursor: self.nodes[CEILING].prev,
            remaining: self.index.len(),
        }
    }
}

impl TopK for ListTopK {
    fn increment_by(
        &mut self,
        key: &str,
        weight: u64,
        maxsize: usize,
    ) -> Result<Option<String>, ConfigError> {
        check_maxsize(maxsize)?;
        #[cfg(feature = "metrics")]
        self.metrics.record_increment_call();

        if let Some(id) = self.index.get(key) {
            let node = &mut self.nodes[id];
            node.weight = Weight::Count(node.weight.value().saturating_add(weight));
            self.move_up(id);
            #[cfg(feature = "metrics")]
            self.metrics.record_increment_hit();
            return Ok(None);
        }

        self.grow(maxsize);
        if self.index.len() < maxsize {
            self.push(key, weight);
            return Ok(None);
        }
        Ok(Some(self.replace_min(key, weight, true)))
    }

    fn increment_existing(&mut self, key: &str) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_increment_existing_call();

        let Some(id) = self.index.get(key) else {
            return false;
        };
        let node = &mut self.nodes[id];
        node.weight = Weight::Count(node.weight.value().saturating_add(1));
        self.move_up(id);
        #[cfg(feature = "metrics")]
        self.metrics.record_increment_existing_hit();
        true
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

        if let Some(id) = self.index.get(key) {
            // The count may go down, so re-insert from the floor.
            self.nodes[id].weight = Weight::Count(count);
            self.unlink(id);
            self.find_and_insert(id, FLOOR);
            return Ok(UpdateOutcome::Accepted);
        }

        self.grow(maxsize);
        if self.index.len() < maxsize {
            self.push(key, count);
            return Ok(UpdateOutcome::Accepted);
        }

        let floor = self.nodes[self.nodes[FLOOR].next].weight.value();
        if count <= floor {
            tracing::trace!(key, count, floor, "update rejected below floor");
            #[cfg(feature = "metrics")]
            self.metrics.record_update_rejected();
            return Ok(UpdateOutcome::Rejected(key.to_owned()));
        }
        Ok(UpdateOutcome::Evicted(self.replace_min(key, count, false)))
    }

    fn clear(&mut self) {
        self.nodes.truncate_to_pinned();
        self.nodes[FLOOR].next = CEILING;
        self.nodes[CEILING].prev = FLOOR;
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
        // Largest first, each pushed down against the floor.
        for Entry { key, count } in entries {
            let id = self.nodes.insert(Node {
                key: key.clone(),
                weight: Weight::Count(count),
                prev: FLOOR,
                next: CEILING,
            });
            self.index.insert(key, id);
            self.insert_after(FLOOR, id);
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_load();
    }
}

#[cfg(feature = "metrics")]
impl MetricsSnapshotProvider<TopKMetricsSnapshot> for ListTopK {
    fn snapshot(&self) -> TopKMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl MetricsReset for ListTopK {
    fn reset_metrics(&mut self) {
        self.metrics = TopKMetrics::default();
    }
}
