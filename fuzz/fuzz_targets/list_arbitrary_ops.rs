#![no_main]

use libfuzzer_sys::fuzz_target;
use topkit::store::ListTopK;
use topkit::traits::{ReadOnlyTopK, TopK, UpdateOutcome};

// Fuzz arbitrary operation sequences on ListTopK
//
// Tests random sequences of increment, increment_by, increment_existing,
// update, clear and encode/decode against a small key universe.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let mut table = ListTopK::new();
    let mut largest = 0usize;

    let mut idx = 1;
    while idx + 2 < data.len() {
        let op = data[idx] % 6;
        let key = format!("k{}", data[idx + 1] % 32);
        let arg = data[idx + 2];
        let maxsize = usize::from(arg % 16) + 1;

        match op {
            0 => {
                largest = largest.max(maxsize);
                let before = table.len();
                let evicted = table.increment(&key, maxsize).unwrap();
                if let Some(evicted) = evicted {
                    assert!(!table.contains(&evicted));
                    assert_eq!(table.len(), before);
                }
                assert!(table.contains(&key));
            }
            1 => {
                largest = largest.max(maxsize);
                let weight = u64::from(arg);
                let had = table.get(&key);
                table.increment_by(&key, weight, maxsize).unwrap();
                if let Some(had) = had {
                    assert_eq!(table.get(&key), Some(had.saturating_add(weight)));
                }
            }
            2 => {
                let had = table.get(&key);
                assert_eq!(table.increment_existing(&key), had.is_some());
            }
            3 => {
                // Present-key overwrite is covered by unit tests; keep order checks meaningful.
                if !table.contains(&key) {
                    largest = largest.max(maxsize);
                    let before = table.sorted_entries();
                    let count = u64::from(arg);
                    match table.update(&key, count, maxsize).unwrap() {
                        UpdateOutcome::Rejected(offered) => {
                            assert_eq!(offered, key);
                            assert_eq!(table.sorted_entries(), before);
                        }
                        UpdateOutcome::Evicted(evicted) => {
                            assert!(!table.contains(&evicted));
                            assert_eq!(table.get(&key), Some(count));
                        }
                        UpdateOutcome::Accepted => assert_eq!(table.get(&key), Some(count)),
                    }
                }
            }
            4 => {
                let entries = table.sorted_entries();
                let bytes = table.encode();
                table.decode(&bytes).unwrap();
                assert_eq!(table.sorted_entries(), entries);
            }
            5 => {
                if arg % 8 == 0 {
                    table.clear();
                    assert!(table.is_empty());
                }
            }
            _ => unreachable!(),
        }

        table.check_invariants().unwrap();
        assert!(table.len() <= largest.max(table.capacity()));

        idx += 3;
    }
});
