//! LRU cache of decoded object handles.

use std::num::NonZeroUsize;

use git_hash::ObjectId;
use lru::LruCache;

use crate::RepoObject;

/// Default number of handles kept by [`ObjectCache`].
pub const DEFAULT_CAPACITY: usize = 1024;

/// LRU cache keyed by identifier. Hits hand out clones of the cached
/// handle, so repeated lookups share one decoded payload.
pub struct ObjectCache {
    cache: LruCache<ObjectId, RepoObject>,
}

impl ObjectCache {
    /// Create with the given capacity (number of objects, at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    /// Get a cached handle, promoting it to most-recently-used.
    pub fn get(&mut self, oid: &ObjectId) -> Option<RepoObject> {
        self.cache.get(oid).cloned()
    }

    pub fn insert(&mut self, obj: RepoObject) {
        self.cache.put(obj.id(), obj);
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.cache.contains(oid)
    }
}

impl Default for ObjectCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
