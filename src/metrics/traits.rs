//! # Metrics Trait Hierarchy
//!
//! Recording, snapshotting and export are separate traits so stores only
//! write counters and never know who reads them.
//!
//! ## Architecture
//!
//! ```text
//!                      ┌─────────────────────────────┐
//!                      │     TopKMetricsRecorder     │
//!                      │  increment/insert/evict     │
//!                      │  update/reject/reorder      │
//!                      └──────────────┬──────────────┘
//!                                     │
//!                     ┌───────────────┴───────────────┐
//!                     ▼                               ▼
//!               ┌──────────┐                    ┌──────────┐
//!               │ArrayTopK │                    │ ListTopK │
//!               └──────────┘                    └──────────┘
//!
//!   Consumption (decoupled from recording):
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```

/// Counters shared by every top-K store.
pub trait TopKMetricsRecorder {
    fn record_increment_call(&mut self);
    fn record_increment_hit(&mut self);
    fn record_insert_new(&mut self);
    fn record_eviction(&mut self);
    fn record_increment_existing_call(&mut self);
    fn record_increment_existing_hit(&mut self);
    fn record_update_call(&mut self);
    fn record_update_rejected(&mut self);
    /// Slots (array) or nodes (list) walked past while restoring order.
    fn record_reorder_steps(&mut self, steps: u64);
    fn record_load(&mut self);
    fn record_clear(&mut self);
}

/// Snapshot provider for bench/testing.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Reset metrics between tests or benchmark iterations.
pub trait MetricsReset {
    fn reset_metrics(&mut self);
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
