use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use git_hash::hasher::Hasher;
use git_hash::{ObjectId, Prefix};
use git_object::ObjectType;

use crate::backend::{ObjectStore, RawObject};
use crate::OdbError;

/// In-memory object store, ordered by identifier.
///
/// Intended for tests and embedding. Objects live behind a `RwLock`; the
/// ordered map makes prefix scans a range query.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RwLock<BTreeMap<ObjectId, RawObject>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store bytes under an arbitrary identifier without hashing them.
    /// Lets callers model damaged or foreign storage.
    pub fn insert_unchecked(&self, oid: ObjectId, kind: ObjectType, data: Vec<u8>) {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(oid, RawObject { kind, data });
    }

    /// Drop an object, leaving anything that references it dangling.
    pub fn remove(&self, oid: &ObjectId) -> bool {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(oid)
            .is_some()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn read(&self, oid: &ObjectId) -> Result<Option<RawObject>, OdbError> {
        let map = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        Ok(map.get(oid).cloned())
    }

    fn write(&self, kind: ObjectType, data: &[u8]) -> Result<ObjectId, OdbError> {
        let oid = Hasher::hash_object(kind.as_str(), data)?;
        let mut map = self.objects.write().unwrap_or_else(PoisonError::into_inner);
        // Content addressing: an existing entry already holds these bytes.
        map.entry(oid).or_insert_with(|| RawObject {
            kind,
            data: data.to_vec(),
        });
        Ok(oid)
    }

    fn contains(&self, oid: &ObjectId) -> bool {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(oid)
    }

    fn ids_with_prefix(&self, prefix: &Prefix) -> Result<Vec<ObjectId>, OdbError> {
        let (lo, hi) = prefix.range();
        let map = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        Ok(map.range(lo..=hi).map(|(oid, _)| *oid).collect())
    }
}
