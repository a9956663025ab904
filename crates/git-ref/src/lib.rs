//! References for the git object graph layer.
//!
//! A [`Reference`] is a snapshot of a name and its target, either an
//! object id or another reference name. Resolution follows symbolic chains
//! through a [`RefStore`] with cycle and dangling-target detection.
//! Mutations never touch an existing handle: they write through to the
//! store and return the new value, so older handles are stale.

mod error;
mod memory;
mod name;
pub mod reflog;
mod store;

use git_hash::ObjectId;
use tracing::{debug, trace};

pub use error::RefError;
pub use memory::MemoryRefStore;
pub use name::{RefName, RefNameFlags, HEAD};
pub use reflog::{ReflogEntry, ReflogMessage};
pub use store::{Enumeration, RefStore};

/// Maximum number of symbolic hops followed by [`Reference::resolve`].
pub const MAX_SYMREF_DEPTH: usize = 10;

/// A git reference: either direct (points to an OID) or symbolic (points to another ref).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Direct { name: RefName, target: ObjectId },
    Symbolic { name: RefName, target: RefName },
}

impl Reference {
    pub fn direct(name: RefName, target: ObjectId) -> Self {
        Reference::Direct { name, target }
    }

    pub fn symbolic(name: RefName, target: RefName) -> Self {
        Reference::Symbolic { name, target }
    }

    pub fn name(&self) -> &RefName {
        match self {
            Reference::Direct { name, .. } | Reference::Symbolic { name, .. } => name,
        }
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, Reference::Symbolic { .. })
    }

    pub fn is_direct(&self) -> bool {
        matches!(self, Reference::Direct { .. })
    }

    /// The object id of a direct reference.
    pub fn target_oid(&self) -> Option<ObjectId> {
        match self {
            Reference::Direct { target, .. } => Some(*target),
            Reference::Symbolic { .. } => None,
        }
    }

    /// The target name of a symbolic reference.
    pub fn symbolic_target(&self) -> Option<&RefName> {
        match self {
            Reference::Symbolic { target, .. } => Some(target),
            Reference::Direct { .. } => None,
        }
    }

    /// Follow symbolic targets until a direct reference is reached.
    ///
    /// A direct reference resolves to itself. Revisiting a name, or more
    /// than [`MAX_SYMREF_DEPTH`] hops, fails with `ResolutionCycle`; a
    /// target missing from the store fails with `Dangling`.
    pub fn resolve(&self, store: &(impl RefStore + ?Sized)) -> Result<Reference, RefError> {
        let mut current = self.clone();
        let mut seen = vec![self.name().clone()];
        loop {
            let target = match &current {
                Reference::Direct { .. } => return Ok(current),
                Reference::Symbolic { target, .. } => target.clone(),
            };
            if seen.contains(&target) || seen.len() > MAX_SYMREF_DEPTH {
                debug!(start = %self.name(), at = %target, hops = seen.len(), "symbolic ref cycle");
                return Err(RefError::ResolutionCycle {
                    name: target.to_string(),
                });
            }
            trace!(from = %current.name(), to = %target, "following symbolic ref");
            current = store.get(&target)?.ok_or_else(|| RefError::Dangling {
                name: current.name().to_string(),
                target: target.to_string(),
            })?;
            seen.push(target);
        }
    }

    /// A fresh snapshot of this reference from the store.
    pub fn reload(&self, store: &(impl RefStore + ?Sized)) -> Result<Reference, RefError> {
        store.find(self.name())
    }

    /// Point this reference at `target`, making it direct.
    pub fn set_target(
        &self,
        store: &(impl RefStore + ?Sized),
        target: ObjectId,
        log: Option<ReflogMessage<'_>>,
    ) -> Result<Reference, RefError> {
        let old = self.current_oid(store);
        let updated = Reference::direct(self.name().clone(), target);
        store.put(&updated)?;
        debug!(name = %updated.name(), %old, new = %target, "updated ref");
        if let Some(log) = log {
            store.append_reflog(updated.name(), &log.entry(old, target))?;
        }
        Ok(updated)
    }

    /// Point this reference at another reference name, making it symbolic.
    pub fn set_symbolic_target(
        &self,
        store: &(impl RefStore + ?Sized),
        target: RefName,
        log: Option<ReflogMessage<'_>>,
    ) -> Result<Reference, RefError> {
        let old = self.current_oid(store);
        let updated = Reference::symbolic(self.name().clone(), target);
        store.put(&updated)?;
        debug!(name = %updated.name(), target = ?updated.symbolic_target(), "updated symbolic ref");
        if let Some(log) = log {
            let new = updated.current_oid(store);
            store.append_reflog(updated.name(), &log.entry(old, new))?;
        }
        Ok(updated)
    }

    /// Move this reference to `new_name`, carrying its log along.
    ///
    /// Fails with `AlreadyExists` when `new_name` is taken, unless `force`.
    pub fn rename(
        &self,
        store: &(impl RefStore + ?Sized),
        new_name: RefName,
        force: bool,
        log: Option<ReflogMessage<'_>>,
    ) -> Result<Reference, RefError> {
        if &new_name == self.name() {
            return Ok(self.clone());
        }
        if !force && store.contains(&new_name)? {
            return Err(RefError::AlreadyExists(new_name.to_string()));
        }
        let current = self.reload(store)?;
        let renamed = match current {
            Reference::Direct { target, .. } => Reference::direct(new_name, target),
            Reference::Symbolic { target, .. } => Reference::symbolic(new_name, target),
        };
        store.put(&renamed)?;
        store.rename_reflog(self.name(), renamed.name())?;
        store.delete(self.name())?;
        debug!(from = %self.name(), to = %renamed.name(), "renamed ref");
        if let Some(log) = log {
            let oid = renamed.current_oid(store);
            store.append_reflog(renamed.name(), &log.entry(oid, oid))?;
        }
        Ok(renamed)
    }

    /// Remove this reference and its log from the store.
    pub fn delete(self, store: &(impl RefStore + ?Sized)) -> Result<(), RefError> {
        if !store.delete(self.name())? {
            return Err(RefError::NotFound(self.name().to_string()));
        }
        debug!(name = %self.name(), "deleted ref");
        Ok(())
    }

    /// The id this reference designates in `store` right now, or the null
    /// id when it is unborn or unresolvable.
    fn current_oid(&self, store: &(impl RefStore + ?Sized)) -> ObjectId {
        match self.resolve(store) {
            Ok(resolved) => resolved.target_oid().unwrap_or(ObjectId::NULL),
            Err(_) => ObjectId::NULL,
        }
    }
}
