use std::ops::ControlFlow;

use bstr::ByteSlice;
use git_hash::ObjectId;
use git_utils::wildmatch::{wildmatch, WildmatchFlags};

use crate::error::RefError;
use crate::name::RefName;
use crate::reflog::ReflogEntry;
use crate::Reference;

/// Outcome of [`RefStore::for_each`]. Stopping early is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enumeration {
    /// Every reference was visited.
    Completed,
    /// The callback returned `ControlFlow::Break`.
    Stopped,
}

impl Enumeration {
    pub fn is_stopped(self) -> bool {
        self == Enumeration::Stopped
    }
}

/// Trait for pluggable reference storage backends.
///
/// Stores persist name to target mappings and an append-only log per
/// name. Names reaching a store have already been validated by
/// [`RefName`].
pub trait RefStore: Send + Sync {
    /// Look up a reference without following symbolic targets.
    fn get(&self, name: &RefName) -> Result<Option<Reference>, RefError>;

    /// Create or overwrite a reference.
    fn put(&self, reference: &Reference) -> Result<(), RefError>;

    /// Remove a reference and its log. Returns whether it existed.
    fn delete(&self, name: &RefName) -> Result<bool, RefError>;

    /// Iterate references whose name starts with `prefix`, sorted by name.
    fn iter(
        &self,
        prefix: Option<&str>,
    ) -> Result<Box<dyn Iterator<Item = Result<Reference, RefError>> + '_>, RefError>;

    /// Log entries for a reference, newest first.
    fn reflog(&self, name: &RefName) -> Result<Vec<ReflogEntry>, RefError>;

    fn append_reflog(&self, name: &RefName, entry: &ReflogEntry) -> Result<(), RefError>;

    /// Move the log of `from` to `to`, appending to any log `to` has.
    fn rename_reflog(&self, from: &RefName, to: &RefName) -> Result<(), RefError>;

    /// Like [`RefStore::get`] but a missing reference is an error.
    fn find(&self, name: &RefName) -> Result<Reference, RefError> {
        self.get(name)?
            .ok_or_else(|| RefError::NotFound(name.to_string()))
    }

    fn contains(&self, name: &RefName) -> Result<bool, RefError> {
        Ok(self.get(name)?.is_some())
    }

    /// Look up `name` and follow symbolic targets to a direct reference.
    fn resolve(&self, name: &RefName) -> Result<Reference, RefError> {
        self.find(name)?.resolve(self)
    }

    /// The object id `name` finally designates.
    fn resolve_to_oid(&self, name: &RefName) -> Result<ObjectId, RefError> {
        let reference = self.resolve(name)?;
        reference
            .target_oid()
            .ok_or_else(|| RefError::NotFound(name.to_string()))
    }

    /// Names of all references matching a wildmatch `pattern`, sorted.
    fn list(&self, pattern: &str) -> Result<Vec<RefName>, RefError> {
        let pattern = pattern.as_bytes().as_bstr();
        let mut names = Vec::new();
        for reference in self.iter(None)? {
            let reference = reference?;
            if wildmatch(pattern, reference.name().as_bstr(), WildmatchFlags::empty()) {
                names.push(reference.name().clone());
            }
        }
        Ok(names)
    }

    /// Visit every reference in name order until `f` breaks.
    fn for_each(
        &self,
        f: &mut dyn FnMut(&Reference) -> ControlFlow<()>,
    ) -> Result<Enumeration, RefError> {
        for reference in self.iter(None)? {
            if f(&reference?).is_break() {
                return Ok(Enumeration::Stopped);
            }
        }
        Ok(Enumeration::Completed)
    }
}
