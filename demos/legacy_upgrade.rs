//! Example upgrading persisted legacy data into an ordered table.
//!
//! Run with: cargo run --example legacy_upgrade --features serde

use topkit::codec::{self, LegacyRecord};
use topkit::store::{ArrayTopK, ListTopK};
use topkit::traits::{ReadOnlyTopK, TopK};

const RECORD: &str = r#"{
    "map": {"home": 42, "cart": 17, "faq": 3, "tos": 3},
    "minVal": 3,
    "minKey": "faq",
    "lossy": true
}"#;

fn main() {
    println!("=== Legacy upgrade ===\n");

    // Example 1: structured record, e.g. from an old JSON store
    println!("1. Structured record");
    let record: LegacyRecord = serde_json::from_str(RECORD).unwrap();
    let table = ArrayTopK::from_legacy(record);
    for entry in table.sorted_entries() {
        println!("   {:>5} ~ {}", entry.key, entry.count);
    }
    println!();

    // Example 2: unordered wire bytes written by an old encoder
    println!("2. Legacy wire layout");
    let old_bytes = codec::encode_legacy([("b", 2), ("c", 9), ("a", 5)]);
    let (_, layout) = codec::decode_with_layout(&old_bytes).unwrap();
    let mut list = ListTopK::new();
    list.decode(&old_bytes).unwrap();
    println!("   detected {layout:?} layout");
    println!("   entries: {:?}", list.iter().collect::<Vec<_>>());

    let new_bytes = list.encode();
    let (_, layout) = codec::decode_with_layout(&new_bytes).unwrap();
    println!("   re-encoded as {layout:?} ({} bytes)", new_bytes.len());
}
