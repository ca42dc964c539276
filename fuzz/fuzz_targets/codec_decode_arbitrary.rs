#![no_main]

use libfuzzer_sys::fuzz_target;
use topkit::codec;
use topkit::store::{ArrayTopK, ListTopK};
use topkit::traits::{ReadOnlyTopK, TopK};

// Fuzz the decoder with arbitrary bytes
//
// Decode must never panic. Anything it accepts must load into both stores,
// come out descending, and re-encode to bytes that decode to the same entries.
fuzz_target!(|data: &[u8]| {
    let Ok(entries) = codec::decode(data) else {
        return;
    };
    assert!(entries.windows(2).all(|w| w[0].count >= w[1].count));

    let mut array = ArrayTopK::with_seed(0);
    array.decode(data).unwrap();
    array.check_invariants().unwrap();
    assert_eq!(array.sorted_entries(), entries);

    let mut list = ListTopK::new();
    list.decode(data).unwrap();
    list.check_invariants().unwrap();
    assert_eq!(list.sorted_entries(), entries);

    let again = codec::decode(&array.encode()).unwrap();
    assert_eq!(again, entries);
});
