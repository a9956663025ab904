use git_hash::hex::{hex_to_bytes, hex_to_string};
use git_hash::{ObjectId, Prefix};
use proptest::prelude::*;

proptest! {
    #[test]
    fn hex_encode_decode_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
        let hex = hex_to_string(&bytes);
        prop_assert_eq!(hex.len(), bytes.len() * 2);
        prop_assert_eq!(hex_to_bytes(&hex).unwrap(), bytes);
    }

    #[test]
    fn oid_hex_roundtrip(bytes in any::<[u8; 20]>()) {
        let oid = ObjectId::from(bytes);
        let hex = oid.to_hex();
        prop_assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        prop_assert_eq!(ObjectId::from_hex(&hex).unwrap(), oid);
        prop_assert_eq!(ObjectId::from_bytes(oid.as_bytes()).unwrap(), oid);
    }

    #[test]
    fn every_prefix_of_an_oid_matches_it(bytes in any::<[u8; 20]>(), len in 4usize..=40) {
        let oid = ObjectId::from(bytes);
        let prefix = Prefix::from_hex(&oid.to_hex()[..len]).unwrap();
        prop_assert_eq!(prefix.hex_len(), len);
        prop_assert!(prefix.matches(&oid));
        let (lo, hi) = prefix.range();
        prop_assert!(lo <= oid && oid <= hi);
    }

    #[test]
    fn prefix_agrees_with_string_prefix(a in any::<[u8; 20]>(), b in any::<[u8; 20]>(), len in 4usize..=40) {
        let a = ObjectId::from(a);
        let b = ObjectId::from(b);
        let prefix = Prefix::from_hex(&a.to_hex()[..len]).unwrap();
        prop_assert_eq!(prefix.matches(&b), b.to_hex().starts_with(&prefix.to_hex()));
    }

    #[test]
    fn ordering_matches_hex_ordering(a in any::<[u8; 20]>(), b in any::<[u8; 20]>()) {
        let a = ObjectId::from(a);
        let b = ObjectId::from(b);
        prop_assert_eq!(a.cmp(&b), a.to_hex().cmp(&b.to_hex()));
    }
}
