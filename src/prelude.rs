pub use crate::builder::{Representation, TopKBuilder, TopKTable};
pub use crate::codec::LegacyRecord;
pub use crate::error::{ConfigError, DecodeError, InvariantError};
pub use crate::store::{ArrayTopK, ListTopK};
pub use crate::traits::{Entry, ReadOnlyTopK, SortedEntries, TopK, UpdateOutcome};

#[cfg(feature = "concurrency")]
pub use crate::concurrent::ConcurrentTopK;
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::TopKMetricsSnapshot;
#[cfg(feature = "metrics")]
pub use crate::metrics::traits::{MetricsReset, MetricsSnapshotProvider};
