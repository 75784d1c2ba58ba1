use plumb_hash::hasher::Hasher;
use plumb_hash::ObjectId;
use proptest::prelude::*;

fn kind() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("blob"), Just("tree"), Just("commit")]
}

proptest! {
    #[test]
    fn hash_object_equals_digest_of_framed_bytes(
        kind in kind(),
        payload in proptest::collection::vec(any::<u8>(), 0..512),
    ) {
        let mut framed = format!("{kind} {}\0", payload.len()).into_bytes();
        framed.extend_from_slice(&payload);
        prop_assert_eq!(
            Hasher::hash_object(kind, &payload).unwrap(),
            Hasher::digest(&framed).unwrap()
        );
    }

    #[test]
    fn chunking_does_not_change_digest(
        data in proptest::collection::vec(any::<u8>(), 0..1024),
        chunk in 1usize..64,
    ) {
        let mut hasher = Hasher::new();
        for piece in data.chunks(chunk) {
            hasher.update(piece);
        }
        prop_assert_eq!(hasher.finalize().unwrap(), Hasher::digest(&data).unwrap());
    }

    #[test]
    fn hex_form_is_forty_lowercase_digits(bytes in proptest::array::uniform20(any::<u8>())) {
        let hex = ObjectId::new(bytes).to_hex();
        prop_assert_eq!(hex.len(), 40);
        prop_assert!(hex.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
        let (bucket, entry) = ObjectId::new(bytes).bucket_and_entry();
        prop_assert_eq!(format!("{bucket}{entry}"), hex);
    }
}
