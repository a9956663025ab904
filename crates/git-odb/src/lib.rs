//! Object database for the object graph layer.
//!
//! Wraps a pluggable [`ObjectStore`] with decoding into shared
//! [`RepoObject`] handles, an LRU cache of decoded handles and resolution
//! of abbreviated identifiers.

pub mod backend;
mod memory;
pub mod prefix;

use std::sync::{Mutex, PoisonError};

use git_hash::{ObjectId, Prefix};
use git_object::cache::{ObjectCache, DEFAULT_CAPACITY};
use git_object::{Object, ObjectType, RepoObject};

pub use backend::{ObjectStore, RawObject};
pub use error::OdbError;
pub use memory::MemoryObjectStore;

mod error {
    use git_hash::{HashError, ObjectId, Prefix};

    #[derive(Debug, thiserror::Error)]
    pub enum OdbError {
        #[error("object not found: {0}")]
        NotFound(ObjectId),

        #[error("no object matches prefix {0}")]
        PrefixNotFound(Prefix),

        #[error("ambiguous object name: {prefix} matches {count} objects")]
        Ambiguous { prefix: Prefix, count: usize },

        #[error("corrupt object {oid}: {reason}")]
        Corrupt { oid: ObjectId, reason: String },

        #[error("object store failure: {0}")]
        Backend(String),

        #[error(transparent)]
        Hash(#[from] HashError),
    }

    impl OdbError {
        /// True for both a missing identifier and a prefix with no match.
        pub fn is_not_found(&self) -> bool {
            matches!(self, Self::NotFound(_) | Self::PrefixNotFound(_))
        }
    }
}

/// Decoded, cached access to an object store.
pub struct ObjectDatabase {
    store: Box<dyn ObjectStore>,
    cache: Mutex<ObjectCache>,
}

impl ObjectDatabase {
    pub fn new(store: impl ObjectStore + 'static) -> Self {
        Self::with_cache_size(store, DEFAULT_CAPACITY)
    }

    pub fn with_cache_size(store: impl ObjectStore + 'static, cache_size: usize) -> Self {
        Self {
            store: Box::new(store),
            cache: Mutex::new(ObjectCache::new(cache_size)),
        }
    }

    /// A database over a fresh [`MemoryObjectStore`].
    pub fn in_memory() -> Self {
        Self::new(MemoryObjectStore::new())
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    /// Look an object up, returning `None` when the store lacks it.
    pub fn find(&self, oid: &ObjectId) -> Result<Option<RepoObject>, OdbError> {
        if let Some(obj) = self.cache.lock().unwrap_or_else(PoisonError::into_inner).get(oid) {
            return Ok(Some(obj));
        }

        let Some(raw) = self.store.read(oid)? else {
            return Ok(None);
        };
        let object = Object::parse(raw.kind, &raw.data).map_err(|e| OdbError::Corrupt {
            oid: *oid,
            reason: e.to_string(),
        })?;
        let handle = RepoObject::new(*oid, object);
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle.clone());
        Ok(Some(handle))
    }

    /// Look an object up; a missing object is [`OdbError::NotFound`].
    pub fn lookup(&self, oid: &ObjectId) -> Result<RepoObject, OdbError> {
        self.find(oid)?.ok_or(OdbError::NotFound(*oid))
    }

    /// Look an object up by abbreviated identifier.
    pub fn lookup_prefix(&self, prefix: &Prefix) -> Result<RepoObject, OdbError> {
        let oid = self.resolve_prefix(prefix)?;
        self.lookup(&oid)
    }

    /// Expand an abbreviation to the single identifier it names.
    pub fn resolve_prefix(&self, prefix: &Prefix) -> Result<ObjectId, OdbError> {
        prefix::resolve_prefix(self, prefix)
    }

    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.store.contains(oid)
    }

    /// Serialise and store an object, returning its identifier.
    pub fn write(&self, object: &Object) -> Result<ObjectId, OdbError> {
        self.write_raw(object.object_type(), &object.serialize())
    }

    pub fn write_raw(&self, kind: ObjectType, data: &[u8]) -> Result<ObjectId, OdbError> {
        let oid = self.store.write(kind, data)?;
        tracing::trace!(%oid, %kind, size = data.len(), "wrote object");
        Ok(oid)
    }

    /// Forget every cached handle.
    pub fn clear_cache(&self) {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Default for ObjectDatabase {
    fn default() -> Self {
        Self::in_memory()
    }
}
