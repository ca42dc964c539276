#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TopKMetricsSnapshot {
    pub increment_calls: u64,
    pub increment_hits: u64,
    pub inserts: u64,
    pub evictions: u64,

    pub increment_existing_calls: u64,
    pub increment_existing_hits: u64,

    pub update_calls: u64,
    pub update_rejections: u64,

    pub reorder_steps: u64, // slots or nodes walked while restoring order
    pub loads: u64,         // decode / legacy import
    pub clears: u64,

    // gauges captured at snapshot time
    pub len: usize,
    pub capacity: usize,
}

impl TopKMetricsSnapshot {
    /// Fraction of `increment` calls that hit a tracked key.
    pub fn hit_ratio(&self) -> f64 {
        if self.increment_calls == 0 {
            0.0
        } else {
            self.increment_hits as f64 / self.increment_calls as f64
        }
    }

    /// Fraction of `increment` calls that evicted a key.
    pub fn eviction_ratio(&self) -> f64 {
        if self.increment_calls == 0 {
            0.0
        } else {
            self.evictions as f64 / self.increment_calls as f64
        }
    }
}
