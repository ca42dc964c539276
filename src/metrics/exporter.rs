use std::io::Write;
use std::sync::{Mutex, PoisonError};

use crate::metrics::snapshot::TopKMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for top-K metrics snapshots.
///
/// This exporter writes in the Prometheus text exposition format so it can be
/// scraped by Prometheus or forwarded to an OpenTelemetry collector.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send + Sync> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send + Sync> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_metric(&self, kind: &str, suffix: &str, value: u64) {
        let name = self.metric_name(suffix);
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_counter(&self, suffix: &str, value: u64) {
        self.write_metric("counter", suffix, value);
    }

    fn write_gauge(&self, suffix: &str, value: u64) {
        self.write_metric("gauge", suffix, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send + Sync> MetricsExporter<TopKMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &TopKMetricsSnapshot) {
        self.write_counter("increment_calls_total", snapshot.increment_calls);
        self.write_counter("increment_hits_total", snapshot.increment_hits);
        self.write_counter("inserts_total", snapshot.inserts);
        self.write_counter("evictions_total", snapshot.evictions);
        self.write_counter(
            "increment_existing_calls_total",
            snapshot.increment_existing_calls,
        );
        self.write_counter(
            "increment_existing_hits_total",
            snapshot.increment_existing_hits,
        );
        self.write_counter("update_calls_total", snapshot.update_calls);
        self.write_counter("update_rejections_total", snapshot.update_rejections);
        self.write_counter("reorder_steps_total", snapshot.reorder_steps);
        self.write_counter("loads_total", snapshot.loads);
        self.write_counter("clears_total", snapshot.clears);
        self.write_gauge("len", snapshot.len as u64);
        self.write_gauge("capacity", snapshot.capacity as u64);
    }
}
