use std::collections::HashSet;

use crate::ObjectId;

/// Hash set of ObjectIds, used for visited and hidden marks during walks.
#[derive(Debug, Clone, Default)]
pub struct OidSet {
    inner: HashSet<ObjectId>,
}

impl OidSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an OID. Returns `true` if the OID was newly inserted.
    pub fn insert(&mut self, oid: ObjectId) -> bool {
        self.inner.insert(oid)
    }

    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.inner.contains(oid)
    }

    pub fn remove(&mut self, oid: &ObjectId) -> bool {
        self.inner.remove(oid)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectId> {
        self.inner.iter()
    }

    pub fn clear(&mut self) {
        self.inner.clear()
    }
}

impl Extend<ObjectId> for OidSet {
    fn extend<I: IntoIterator<Item = ObjectId>>(&mut self, iter: I) {
        self.inner.extend(iter)
    }
}

impl FromIterator<ObjectId> for OidSet {
    fn from_iter<I: IntoIterator<Item = ObjectId>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}
