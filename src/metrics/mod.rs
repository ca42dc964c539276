//! Operation counters for top-K stores, behind the `metrics` feature.

pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use exporter::PrometheusTextExporter;
pub use metrics_impl::TopKMetrics;
pub use snapshot::TopKMetricsSnapshot;
pub use traits::{MetricsExporter, MetricsReset, MetricsSnapshotProvider, TopKMetricsRecorder};
