//! Pre-ordered structured record and its upgrade path.
//!
//! Old tables were persisted as a record with an unordered key → count map
//! plus a cached minimum value, minimum key and a "lossy" flag. Only the map
//! carries information the ordered tables need; the other fields are read so
//! old records deserialize cleanly and are then dropped.

use std::collections::HashMap;

use crate::traits::Entry;

/// Legacy structured top-K record.
///
/// With the `serde` feature the field names match the historical record
/// (`map`, `minVal`, `minKey`, `lossy`); missing fields default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LegacyRecord {
    pub map: HashMap<String, u64>,
    #[cfg_attr(feature = "serde", serde(rename = "minVal"))]
    pub min_val: u64,
    #[cfg_attr(feature = "serde", serde(rename = "minKey"))]
    pub min_key: Option<String>,
    pub lossy: bool,
}

impl LegacyRecord {
    /// Builds a record from `(key, count)` pairs, deriving the cached minimum.
    pub fn from_counts<K, I>(counts: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, u64)>,
    {
        let map: HashMap<String, u64> = counts.into_iter().map(|(k, c)| (k.into(), c)).collect();
        let min = map.iter().min_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)));
        let (min_key, min_val) = match min {
            Some((key, count)) => (Some(key.clone()), *count),
            None => (None, 0),
        };
        Self {
            map,
            min_val,
            min_key,
            lossy: false,
        }
    }

    /// Upgrades the record into entries sorted by count descending.
    ///
    /// Ties are ordered by key so the result does not depend on hash order.
    pub fn into_sorted_entries(self) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self
            .map
            .into_iter()
            .map(|(key, count)| Entry { key, count })
            .collect();
        sort_descending(&mut entries);
        tracing::debug!(
            entries = entries.len(),
            lossy = self.lossy,
            "upgraded legacy top-k record"
        );
        entries
    }
}

/// Orders entries by count descending, then key ascending.
pub(crate) fn sort_descending(entries: &mut [Entry]) {
    entries.sort_unstable_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_counts_tracks_minimum() {
        let record = LegacyRecord::from_counts([("a", 5), ("b", 2), ("c", 9)]);
        assert_eq!(record.min_val, 2);
        assert_eq!(record.min_key.as_deref(), Some("b"));
        assert!(!record.lossy);

        let empty = LegacyRecord::from_counts(Vec::<(String, u64)>::new());
        assert_eq!(empty.min_key, None);
        assert!(empty.into_sorted_entries().is_empty());
    }

    #[test]
    fn upgrade_sorts_descending_and_keeps_ties() {
        let record = LegacyRecord::from_counts([("x", 3), ("b", 7), ("a", 3), ("z", 1)]);
        let entries = record.into_sorted_entries();
        assert_eq!(
            entries,
            vec![
                Entry::new("b", 7),
                Entry::new("a", 3),
                Entry::new("x", 3),
                Entry::new("z", 1),
            ]
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_historical_field_names() {
        let json = r#"{"map":{"a":4,"b":1},"minVal":1,"minKey":"b","lossy":true}"#;
        let record: LegacyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.min_val, 1);
        assert_eq!(record.min_key.as_deref(), Some("b"));
        assert!(record.lossy);
        assert_eq!(record.map.get("a"), Some(&4));

        let sparse: LegacyRecord = serde_json::from_str(r#"{"map":{"q":2}}"#).unwrap();
        assert_eq!(sparse.min_val, 0);
        assert!(!sparse.lossy);
    }
}
