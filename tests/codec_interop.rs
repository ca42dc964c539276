// ==============================================
// WIRE FORMAT INTEROP TESTS (integration)
// ==============================================
//
// Byte-level fixtures for the ordered and legacy layouts, checked through the
// public codec and through both stores.

use topkit::codec::{self, CONTINUATION_MARKER, Layout};
use topkit::error::DecodeError;
use topkit::prelude::*;

// ==============================================
// Fixed byte layouts
// ==============================================

mod fixtures {
    use super::*;

    #[test]
    fn ordered_layout_bytes() {
        let mut table = ListTopK::new();
        table.update("ab", 300, 2).unwrap();
        table.update("c", 1, 2).unwrap();
        assert_eq!(
            table.encode(),
            vec![
                0x02, // size
                0x02, CONTINUATION_MARKER, b'a', b'b', 0xAC, 0x02, // "ab": 300
                0x01, b'c', 0x01, // "c": 1
            ]
        );
    }

    #[test]
    fn legacy_layout_bytes_decode() {
        let bytes = [0x02, 0x01, b'c', 0x01, 0x02, b'a', b'b', 0xAC, 0x02];
        let (entries, layout) = codec::decode_with_layout(&bytes).unwrap();
        assert_eq!(layout, Layout::Legacy);
        assert_eq!(entries, vec![Entry::new("ab", 300), Entry::new("c", 1)]);
    }

    #[test]
    fn multibyte_keys_use_byte_lengths() {
        let mut table = ArrayTopK::with_seed(0);
        table.update("ключ", 5, 1).unwrap();
        let bytes = table.encode();
        assert_eq!(bytes[1] as usize, "ключ".len());
        assert_eq!(bytes[2], CONTINUATION_MARKER);

        let mut restored = ListTopK::new();
        restored.decode(&bytes).unwrap();
        assert_eq!(restored.get("ключ"), Some(5));
    }
}

// ==============================================
// Cross-store transfer
// ==============================================

mod transfer {
    use super::*;

    #[test]
    fn array_bytes_load_into_list_and_back() {
        let mut array = ArrayTopK::with_seed(4);
        for i in 0..200u64 {
            array.increment(&format!("k{}", i % 37), 16).unwrap();
        }
        let mut list = ListTopK::new();
        list.decode(&array.encode()).unwrap();
        assert_eq!(list.sorted_entries(), array.sorted_entries());

        let mut again = ArrayTopK::with_seed(9);
        again.decode(&list.encode()).unwrap();
        assert_eq!(again.sorted_entries(), array.sorted_entries());
        again.check_invariants().unwrap();
        list.check_invariants().unwrap();
    }

    #[test]
    fn array_overwrite_still_round_trips() {
        let mut table = ArrayTopK::with_seed(0);
        table.increment_by("a", 5, 2).unwrap();
        table.increment_by("b", 1, 2).unwrap();
        table.update("b", 9, 2).unwrap();

        let mut restored = ListTopK::new();
        restored.decode(&table.encode()).unwrap();
        assert_eq!(
            restored.sorted_entries(),
            vec![Entry::new("b", 9), Entry::new("a", 5)]
        );
    }

    #[test]
    fn legacy_ties_are_all_kept() {
        let bytes = codec::encode_legacy([("z", 2), ("a", 2), ("m", 2)]);
        let mut table = ListTopK::new();
        table.decode(&bytes).unwrap();
        assert_eq!(table.len(), 3);
        let keys: Vec<_> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "m", "z"]);
    }
}

// ==============================================
// Hostile input
// ==============================================

mod hostile {
    use super::*;

    #[test]
    fn huge_size_prefix_fails_without_allocating() {
        // size = u64::MAX / 2 followed by nothing useful
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F, 0x01];
        assert!(codec::decode(&bytes).is_err());
    }

    #[test]
    fn invalid_utf8_key() {
        let bytes = [0x01, 0x01, 0xFF, 0x01];
        assert!(matches!(
            codec::decode(&bytes),
            Err(DecodeError::InvalidUtf8 { .. })
        ));
    }

    #[test]
    fn zero_size_with_trailing_bytes() {
        assert_eq!(
            codec::decode(&[0x00, 0x01]),
            Err(DecodeError::TrailingBytes { remaining: 1 })
        );
    }
}
