#![no_main]

use libfuzzer_sys::fuzz_target;
use topkit::store::{ArrayTopK, ListTopK};
use topkit::traits::{ReadOnlyTopK, TopK};

// Differential fuzzing between the two stores
//
// With a fixed maxsize and a key universe no larger than it, nothing is ever
// evicted, so both stores must hold exactly the same counts.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let maxsize = usize::from(data[0] % 32) + 1;

    let mut array = ArrayTopK::with_seed(1);
    let mut list = ListTopK::new();

    for pair in data[1..].chunks_exact(2) {
        let key = format!("k{}", usize::from(pair[0]) % maxsize);
        let weight = u64::from(pair[1]);
        assert_eq!(array.increment_by(&key, weight, maxsize).unwrap(), None);
        assert_eq!(list.increment_by(&key, weight, maxsize).unwrap(), None);
    }

    assert_eq!(array.len(), list.len());
    for (key, count) in list.iter() {
        assert_eq!(array.get(key), Some(count));
    }
    let array_counts: Vec<u64> = array.iter().map(|(_, c)| c).collect();
    let list_counts: Vec<u64> = list.iter().map(|(_, c)| c).collect();
    assert_eq!(array_counts, list_counts);
});
