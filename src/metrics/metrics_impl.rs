use crate::metrics::snapshot::TopKMetricsSnapshot;
use crate::metrics::traits::TopKMetricsRecorder;

#[derive(Debug, Default, Clone)]
pub struct TopKMetrics {
    pub increment_calls: u64,
    pub increment_hits: u64,
    pub inserts: u64,
    pub evictions: u64,
    pub increment_existing_calls: u64,
    pub increment_existing_hits: u64,
    pub update_calls: u64,
    pub update_rejections: u64,
    pub reorder_steps: u64,
    pub loads: u64,
    pub clears: u64,
}

impl TopKMetrics {
    pub fn new() -> TopKMetrics {
        Self::default()
    }

    /// Captures counters plus the table gauges passed in by the store.
    pub fn snapshot(&self, len: usize, capacity: usize) -> TopKMetricsSnapshot {
        TopKMetricsSnapshot {
            increment_calls: self.increment_calls,
            increment_hits: self.increment_hits,
            inserts: self.inserts,
            evictions: self.evictions,
            increment_existing_calls: self.increment_existing_calls,
            increment_existing_hits: self.increment_existing_hits,
            update_calls: self.update_calls,
            update_rejections: self.update_rejections,
            reorder_steps: self.reorder_steps,
            loads: self.loads,
            clears: self.clears,
            len,
            capacity,
        }
    }
}

impl TopKMetricsRecorder for TopKMetrics {
    fn record_increment_call(&mut self) {
        self.increment_calls += 1;
    }

    fn record_increment_hit(&mut self) {
        self.increment_hits += 1;
    }

    fn record_insert_new(&mut self) {
        self.inserts += 1;
    }

    fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    fn record_increment_existing_call(&mut self) {
        self.increment_existing_calls += 1;
    }

    fn record_increment_existing_hit(&mut self) {
        self.increment_existing_hits += 1;
    }

    fn record_update_call(&mut self) {
        self.update_calls += 1;
    }

    fn record_update_rejected(&mut self) {
        self.update_rejections += 1;
    }

    fn record_reorder_steps(&mut self, steps: u64) {
        self.reorder_steps = self.reorder_steps.saturating_add(steps);
    }

    fn record_load(&mut self) {
        self.loads += 1;
    }

    fn record_clear(&mut self) {
        self.clears += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_copies_counters_and_gauges() {
        let mut metrics = TopKMetrics::new();
        metrics.record_increment_call();
        metrics.record_increment_call();
        metrics.record_increment_hit();
        metrics.record_eviction();
        metrics.record_reorder_steps(7);

        let snap = metrics.snapshot(3, 8);
        assert_eq!(snap.increment_calls, 2);
        assert_eq!(snap.increment_hits, 1);
        assert_eq!(snap.evictions, 1);
        assert_eq!(snap.reorder_steps, 7);
        assert_eq!(snap.len, 3);
        assert_eq!(snap.capacity, 8);
    }
}
