use std::sync::Arc;
use std::thread;

use git_hash::{ObjectId, Prefix};
use git_object::{Blob, Object, ObjectType};
use git_odb::{MemoryObjectStore, ObjectDatabase, OdbError};
use proptest::prelude::*;

#[test]
fn lookup_decodes_and_types() {
    let odb = ObjectDatabase::in_memory();
    let oid = odb.write(&Object::Blob(Blob::new(b"content".to_vec()))).unwrap();
    let obj = odb.lookup(&oid).unwrap();
    assert_eq!(obj.id(), oid);
    assert_eq!(obj.kind(), ObjectType::Blob);
    assert_eq!(obj.to_blob().unwrap().data, b"content");
}

#[test]
fn missing_object_is_not_found() {
    let odb = ObjectDatabase::in_memory();
    let oid = ObjectId::from_raw(&[0xaa; 20]);
    assert!(odb.find(&oid).unwrap().is_none());
    assert!(matches!(odb.lookup(&oid), Err(OdbError::NotFound(id)) if id == oid));
}

#[test]
fn undecodable_bytes_are_corrupt() {
    let store = MemoryObjectStore::new();
    let oid = ObjectId::from_raw(&[0x42; 20]);
    store.insert_unchecked(oid, ObjectType::Commit, b"not a commit".to_vec());
    let odb = ObjectDatabase::new(store);
    match odb.lookup(&oid) {
        Err(OdbError::Corrupt { oid: bad, .. }) => assert_eq!(bad, oid),
        other => panic!("expected corruption, got {other:?}"),
    }
}

#[test]
fn repeated_lookups_share_payload() {
    let odb = ObjectDatabase::in_memory();
    let oid = odb.write_raw(ObjectType::Blob, b"shared").unwrap();
    let a = odb.lookup(&oid).unwrap().to_blob().unwrap();
    let b = odb.lookup(&oid).unwrap().to_blob().unwrap();
    assert!(a.shares_data(&b));

    odb.clear_cache();
    let c = odb.lookup(&oid).unwrap().to_blob().unwrap();
    assert!(!a.shares_data(&c));
    assert_eq!(a, c);
}

#[test]
fn lookup_prefix_roundtrip() {
    let odb = ObjectDatabase::in_memory();
    let oid = odb.write_raw(ObjectType::Blob, b"abbreviated").unwrap();
    let prefix = Prefix::from_hex(&oid.to_hex()[..7]).unwrap();
    assert_eq!(odb.lookup_prefix(&prefix).unwrap().id(), oid);
}

#[test]
fn concurrent_readers() {
    let odb = Arc::new(ObjectDatabase::with_cache_size(MemoryObjectStore::new(), 8));
    let ids: Vec<ObjectId> = (0..64u32)
        .map(|n| odb.write_raw(ObjectType::Blob, &n.to_be_bytes()).unwrap())
        .collect();
    let ids = Arc::new(ids);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let odb = Arc::clone(&odb);
            let ids = Arc::clone(&ids);
            thread::spawn(move || {
                for (n, oid) in ids.iter().enumerate() {
                    let blob = odb.lookup(oid).unwrap().to_blob().unwrap();
                    assert_eq!(blob.data, (n as u32).to_be_bytes());
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}

proptest! {
    #[test]
    fn prefix_lookup_agrees_with_scan(
        contents in proptest::collection::hash_set(proptest::collection::vec(any::<u8>(), 0..8), 1..40),
        len in 4usize..8,
    ) {
        let odb = ObjectDatabase::in_memory();
        let ids: Vec<ObjectId> = contents
            .iter()
            .map(|c| odb.write_raw(ObjectType::Blob, c).unwrap())
            .collect();
        let target = ids[0];
        let prefix = Prefix::from_hex(&target.to_hex()[..len]).unwrap();
        let matching = ids.iter().filter(|oid| oid.to_hex().starts_with(&prefix.to_hex())).count();
        match odb.resolve_prefix(&prefix) {
            Ok(oid) => {
                prop_assert_eq!(matching, 1);
                prop_assert_eq!(oid, target);
            }
            Err(OdbError::Ambiguous { count, .. }) => prop_assert_eq!(count, matching),
            Err(other) => prop_assert!(false, "unexpected error {}", other),
        }
    }
}
