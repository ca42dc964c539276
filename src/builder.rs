//! Unified top-K builder for both store representations.
//!
//! Provides one table type whose storage is picked at construction time, so
//! callers can switch between the array and the list store without touching
//! the code that counts.
//!
//! ## Example
//!
//! ```rust
//! use topkit::builder::{Representation, TopKBuilder};
//! use topkit::traits::{ReadOnlyTopK, TopK};
//!
//! let mut table = TopKBuilder::new().seed(42).build(Representation::Array);
//! table.increment("hello", 10).unwrap();
//! assert_eq!(table.get("hello"), Some(1));
//! ```

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::TopKMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{MetricsReset, MetricsSnapshotProvider};
use crate::store::array::ArrayTopK;
use crate::store::list::ListTopK;
use crate::traits::{ReadOnlyTopK, SortedEntries, TopK, UpdateOutcome};

/// Largest accepted preallocation hint.
pub const MAX_INITIAL_CAPACITY: usize = 1 << 24;

/// Available storage layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Representation {
    /// Parallel sorted arrays with random tie-break at the floor.
    #[default]
    Array,
    /// Sentinel-bounded linked list; evicts the floor neighbour.
    List,
}

/// Unified top-K table that provides a consistent API regardless of layout.
#[derive(Debug)]
pub struct TopKTable {
    inner: TableInner,
}

#[derive(Debug)]
enum TableInner {
    Array(ArrayTopK<SmallRng>),
    List(ListTopK),
}

impl TopKTable {
    pub fn representation(&self) -> Representation {
        match &self.inner {
            TableInner::Array(_) => Representation::Array,
            TableInner::List(_) => Representation::List,
        }
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        match &self.inner {
            TableInner::Array(array) => array.check_invariants(),
            TableInner::List(list) => list.check_invariants(),
        }
    }
}

impl From<ArrayTopK<SmallRng>> for TopKTable {
    fn from(array: ArrayTopK<SmallRng>) -> Self {
        Self {
            inner: TableInner::Array(array),
        }
    }
}

impl From<ListTopK> for TopKTable {
    fn from(list: ListTopK) -> Self {
        Self {
            inner: TableInner::List(list),
        }
    }
}

impl ReadOnlyTopK for TopKTable {
    fn get(&self, key: &str) -> Option<u64> {
        match &self.inner {
            TableInner::Array(array) => array.get(key),
            TableInner::List(list) => list.get(key),
        }
    }

    fn contains(&self, key: &str) -> bool {
        match &self.inner {
            TableInner::Array(array) => array.contains(key),
            TableInner::List(list) => list.contains(key),
        }
    }

    fn len(&self) -> usize {
        match &self.inner {
            TableInner::Array(array) => array.len(),
            TableInner::List(list) => list.len(),
        }
    }

    fn capacity(&self) -> usize {
        match &self.inner {
            TableInner::Array(array) => array.capacity(),
            TableInner::List(list) => list.capacity(),
        }
    }

    fn min_count(&self) -> Option<u64> {
        match &self.inner {
            TableInner::Array(array) => array.min_count(),
            TableInner::List(list) => list.min_count(),
        }
    }

    fn iter(&self) -> impl ExactSizeIterator<Item = (&str, u64)> + '_ {
        match &self.inner {
            TableInner::Array(array) => TableIter::Array(array.iter()),
            TableInner::List(list) => TableIter::List(list.iter()),
        }
    }
}

impl TopK for TopKTable {
    fn increment_by(
        &mut self,
        key: &str,
        weight: u64,
        maxsize: usize,
    ) -> Result<Option<String>, ConfigError> {
        match &mut self.inner {
            TableInner::Array(array) => array.increment_by(key, weight, maxsize),
            TableInner::List(list) => list.increment_by(key, weight, maxsize),
        }
    }

    fn increment_existing(&mut self, key: &str) -> bool {
        match &mut self.inner {
            TableInner::Array(array) => array.increment_existing(key),
            TableInner::List(list) => list.increment_existing(key),
        }
    }

    fn update(
        &mut self,
        key: &str,
        count: u64,
        maxsize: usize,
    ) -> Result<UpdateOutcome, ConfigError> {
        match &mut self.inner {
            TableInner::Array(array) => array.update(key, count, maxsize),
            TableInner::List(list) => list.update(key, count, maxsize),
        }
    }

    fn clear(&mut self) {
        match &mut self.inner {
            TableInner::Array(array) => array.clear(),
            TableInner::List(list) => list.clear(),
        }
    }

    fn load(&mut self, entries: SortedEntries) {
        match &mut self.inner {
            TableInner::Array(array) => array.load(entries),
            TableInner::List(list) => list.load(entries),
        }
    }
}

/// Dispatches iteration to whichever store backs the table.
enum TableIter<A, L> {
    Array(A),
    List(L),
}

impl<T, A, L> Iterator for TableIter<A, L>
where
    A: Iterator<Item = T>,
    L: Iterator<Item = T>,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        match self {
            TableIter::Array(iter) => iter.next(),
            TableIter::List(iter) => iter.next(),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            TableIter::Array(iter) => iter.size_hint(),
            TableIter::List(iter) => iter.size_hint(),
        }
    }
}

impl<T, A, L> ExactSizeIterator for TableIter<A, L>
where
    A: ExactSizeIterator<Item = T>,
    L: ExactSizeIterator<Item = T>,
{
}

#[cfg(feature = "metrics")]
impl MetricsSnapshotProvider<TopKMetricsSnapshot> for TopKTable {
    fn snapshot(&self) -> TopKMetricsSnapshot {
        match &self.inner {
            TableInner::Array(array) => array.metrics_snapshot(),
            TableInner::List(list) => list.metrics_snapshot(),
        }
    }
}

#[cfg(feature = "metrics")]
impl MetricsReset for TopKTable {
    fn reset_metrics(&mut self) {
        match &mut self.inner {
            TableInner::Array(array) => array.reset_metrics(),
            TableInner::List(list) => list.reset_metrics(),
        }
    }
}

/// Builder for creating top-K tables.
#[derive(Debug, Clone, Default)]
pub struct TopKBuilder {
    seed: Option<u64>,
    initial_capacity: usize,
}

impl TopKBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the array store's tie-breaker. Ignored by the list store.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preallocates room for `capacity` entries.
    ///
    /// This is a memory hint only; admission is still governed by the
    /// `maxsize` passed to each call.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Build a table, rejecting a preallocation hint above
    /// [`MAX_INITIAL_CAPACITY`].
    pub fn try_build(self, representation: Representation) -> Result<TopKTable, ConfigError> {
        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(ConfigError::new(format!(
                "initial capacity {} exceeds limit {}",
                self.initial_capacity, MAX_INITIAL_CAPACITY
            )));
        }
        Ok(self.build(representation))
    }

    /// Build a table. An oversized preallocation hint is clamped.
    ///
    /// # Example
    ///
    /// ```rust
    /// use topkit::builder::{Representation, TopKBuilder};
    /// use topkit::traits::ReadOnlyTopK;
    ///
    /// let array = TopKBuilder::new().seed(7).build(Representation::Array);
    /// let list = TopKBuilder::new().initial_capacity(1024).build(Representation::List);
    /// assert!(array.is_empty() && list.is_empty());
    /// ```
    pub fn build(self, representation: Representation) -> TopKTable {
        let reserve = self.initial_capacity.min(MAX_INITIAL_CAPACITY);
        match representation {
            Representation::Array => {
                let mut array = match self.seed {
                    Some(seed) => ArrayTopK::with_rng(SmallRng::seed_from_u64(seed)),
                    None => ArrayTopK::new(),
                };
                array.preallocate(reserve);
                TopKTable::from(array)
            },
            Representation::List => {
                let mut list = ListTopK::new();
                list.preallocate(reserve);
                TopKTable::from(list)
            },
        }
    }
}
