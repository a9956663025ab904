//! The object store collaborator.

use git_hash::{ObjectId, Prefix};
use git_object::ObjectType;

use crate::OdbError;

/// Undecoded object content as a store keeps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObject {
    pub kind: ObjectType,
    pub data: Vec<u8>,
}

/// Storage that maps identifiers to typed byte blobs.
///
/// Implementations own the persistence format; the database above decodes
/// and caches. `write` must return the git content hash of `(kind, data)`.
pub trait ObjectStore: Send + Sync {
    fn read(&self, oid: &ObjectId) -> Result<Option<RawObject>, OdbError>;

    fn write(&self, kind: ObjectType, data: &[u8]) -> Result<ObjectId, OdbError>;

    fn contains(&self, oid: &ObjectId) -> bool;

    /// All stored identifiers starting with `prefix`, in ascending order.
    fn ids_with_prefix(&self, prefix: &Prefix) -> Result<Vec<ObjectId>, OdbError>;
}
