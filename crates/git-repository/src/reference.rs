use std::ops::ControlFlow;

use git_hash::ObjectId;
use git_ref::{Enumeration, RefError, RefName, Reference};

use crate::{RepoError, Repository};

impl Repository {
    pub fn find_reference(&self, name: &str) -> Result<Reference, RepoError> {
        Ok(self.refs().find(&RefName::new(name)?)?)
    }

    /// The object id `name` designates after following symbolic targets.
    pub fn resolve_reference(&self, name: &str) -> Result<ObjectId, RepoError> {
        Ok(self.refs().resolve_to_oid(&RefName::new(name)?)?)
    }

    /// Create a direct reference to an object that exists in the database.
    ///
    /// An existing reference is only replaced when `force` is set.
    pub fn create_reference(
        &self,
        name: &str,
        target: ObjectId,
        force: bool,
        message: &str,
    ) -> Result<Reference, RepoError> {
        let name = RefName::new(name)?;
        self.lookup(&target)?;
        let current = self.existing_or_new(&name, force)?;
        Ok(current.set_target(self.refs(), target, self.log(message))?)
    }

    /// Create a symbolic reference to `target`, which need not exist yet.
    pub fn create_symbolic_reference(
        &self,
        name: &str,
        target: &str,
        force: bool,
        message: &str,
    ) -> Result<Reference, RepoError> {
        let name = RefName::new(name)?;
        let target = RefName::new(target)?;
        let current = self.existing_or_new(&name, force)?;
        Ok(current.set_symbolic_target(self.refs(), target, self.log(message))?)
    }

    /// The stored reference when `force` allows replacing it, or a
    /// placeholder that logs as a creation.
    fn existing_or_new(&self, name: &RefName, force: bool) -> Result<Reference, RepoError> {
        match self.refs().get(name)? {
            Some(_) if !force => Err(RefError::AlreadyExists(name.to_string()).into()),
            Some(existing) => Ok(existing),
            None => Ok(Reference::direct(name.clone(), ObjectId::NULL)),
        }
    }

    pub fn delete_reference(&self, name: &str) -> Result<(), RepoError> {
        let reference = self.find_reference(name)?;
        Ok(reference.delete(self.refs())?)
    }

    /// All references whose name starts with `prefix`, in name order.
    pub fn references(&self, prefix: Option<&str>) -> Result<Vec<Reference>, RepoError> {
        Ok(self
            .refs()
            .iter(prefix)?
            .collect::<Result<Vec<_>, RefError>>()?)
    }

    /// Names of all references matching the wildmatch `pattern`.
    pub fn list_references(&self, pattern: &str) -> Result<Vec<RefName>, RepoError> {
        Ok(self.refs().list(pattern)?)
    }

    pub fn for_each_reference(
        &self,
        f: &mut dyn FnMut(&Reference) -> ControlFlow<()>,
    ) -> Result<Enumeration, RepoError> {
        Ok(self.refs().for_each(f)?)
    }

    /// The name a write through `name` would land on: the end of its
    /// symbolic chain, which may not exist yet (an unborn branch).
    pub(crate) fn terminal_name(&self, name: &RefName) -> Result<RefName, RepoError> {
        let Some(reference) = self.refs().get(name)? else {
            return Ok(name.clone());
        };
        match reference.resolve(self.refs()) {
            Ok(direct) => Ok(direct.name().clone()),
            Err(RefError::Dangling { target, .. }) => Ok(RefName::new(target)?),
            Err(e) => Err(e.into()),
        }
    }
}
