//! Thread-safe wrapper over any [`TopK`] store.
//!
//! Writers take the write lock for the whole operation; readers and
//! [`ConcurrentTopK::encode`] share the read lock, so an encoded snapshot
//! never observes a half-applied reorder. Each mutating call has a `try_*`
//! twin that returns `None` instead of blocking.

use parking_lot::RwLock;

use crate::codec::LegacyRecord;
use crate::error::{ConfigError, DecodeError};
use crate::traits::{Entry, ReadOnlyTopK, TopK, UpdateOutcome};

#[derive(Debug, Default)]
/// Thread-safe wrapper around a top-K store using a `parking_lot::RwLock`.
pub struct ConcurrentTopK<T> {
    inner: RwLock<T>,
}

impl<T: TopK> ConcurrentTopK<T> {
    pub fn new(table: T) -> Self {
        Self {
            inner: RwLock::new(table),
        }
    }

    /// Consumes the wrapper and returns the store.
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }

    pub fn increment(&self, key: &str, maxsize: usize) -> Result<Option<String>, ConfigError> {
        let mut table = self.inner.write();
        table.increment(key, maxsize)
    }

    /// Tries to count `key` without blocking.
    pub fn try_increment(
        &self,
        key: &str,
        maxsize: usize,
    ) -> Option<Result<Option<String>, ConfigError>> {
        let mut table = self.inner.try_write()?;
        Some(table.increment(key, maxsize))
    }

    pub fn increment_by(
        &self,
        key: &str,
        weight: u64,
        maxsize: usize,
    ) -> Result<Option<String>, ConfigError> {
        let mut table = self.inner.write();
        table.increment_by(key, weight, maxsize)
    }

    /// Tries to add `weight` to `key` without blocking.
    pub fn try_increment_by(
        &self,
        key: &str,
        weight: u64,
        maxsize: usize,
    ) -> Option<Result<Option<String>, ConfigError>> {
        let mut table = self.inner.try_write()?;
        Some(table.increment_by(key, weight, maxsize))
    }

    pub fn increment_existing(&self, key: &str) -> bool {
        let mut table = self.inner.write();
        table.increment_existing(key)
    }

    /// Tries to count a tracked `key` without blocking.
    pub fn try_increment_existing(&self, key: &str) -> Option<bool> {
        let mut table = self.inner.try_write()?;
        Some(table.increment_existing(key))
    }

    pub fn update(
        &self,
        key: &str,
        count: u64,
        maxsize: usize,
    ) -> Result<UpdateOutcome, ConfigError> {
        let mut table = self.inner.write();
        table.update(key, count, maxsize)
    }

    /// Tries to set `key` to `count` without blocking.
    pub fn try_update(
        &self,
        key: &str,
        count: u64,
        maxsize: usize,
    ) -> Option<Result<UpdateOutcome, ConfigError>> {
        let mut table = self.inner.try_write()?;
        Some(table.update(key, count, maxsize))
    }

    pub fn clear(&self) {
        let mut table = self.inner.write();
        table.clear();
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<(), DecodeError> {
        let mut table = self.inner.write();
        table.decode(bytes)
    }

    pub fn import_legacy(&self, record: LegacyRecord) {
        let mut table = self.inner.write();
        table.import_legacy(record);
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        let table = self.inner.read();
        table.get(key)
    }

    /// Tries to read `key`'s count without blocking.
    pub fn try_get(&self, key: &str) -> Option<Option<u64>> {
        let table = self.inner.try_read()?;
        Some(table.get(key))
    }

    pub fn len(&self) -> usize {
        let table = self.inner.read();
        table.len()
    }

    pub fn is_empty(&self) -> bool {
        let table = self.inner.read();
        table.is_empty()
    }

    pub fn sorted_entries(&self) -> Vec<Entry> {
        let table = self.inner.read();
        table.sorted_entries()
    }

    /// Encodes a consistent snapshot under the read lock.
    pub fn encode(&self) -> Vec<u8> {
        let table = self.inner.read();
        table.encode()
    }

    /// Runs `f` on a shared reference to the store.
    pub fn with_read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let table = self.inner.read();
        f(&table)
    }

    /// Runs `f` on a mutable reference to the store.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut table = self.inner.write();
        f(&mut table)
    }
}

impl<T: TopK> From<T> for ConcurrentTopK<T> {
    fn from(table: T) -> Self {
        Self::new(table)
    }
}
