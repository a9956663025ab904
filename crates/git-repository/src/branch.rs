use git_object::CommitView;
use git_ref::{RefName, Reference};
use tracing::debug;

use crate::{RepoError, Repository};

impl Repository {
    /// Create `refs/heads/<name>` at `target`.
    ///
    /// With `force` an existing branch is moved, except the one `HEAD`
    /// has checked out.
    pub fn create_branch(
        &self,
        name: &str,
        target: &CommitView,
        force: bool,
    ) -> Result<Reference, RepoError> {
        let refname = RefName::branch(name)?;
        if force && self.branch_is_head(name)? {
            return Err(RepoError::CurrentBranch(refname.to_string()));
        }
        let message = format!("branch: Created from {}", target.id());
        self.create_reference(refname.as_str(), target.id(), force, &message)
    }

    pub fn find_branch(&self, name: &str) -> Result<Reference, RepoError> {
        Ok(self.refs().find(&RefName::branch(name)?)?)
    }

    /// Local branches in name order.
    pub fn branches(&self) -> Result<Vec<Reference>, RepoError> {
        self.references(Some("refs/heads/"))
    }

    /// Whether `HEAD` points at `refs/heads/<name>`.
    pub fn branch_is_head(&self, name: &str) -> Result<bool, RepoError> {
        let refname = RefName::branch(name)?;
        Ok(self.current_branch()?.as_ref() == Some(&refname))
    }

    /// Delete a branch other than the checked-out one.
    pub fn delete_branch(&self, name: &str) -> Result<(), RepoError> {
        let branch = self.find_branch(name)?;
        if self.branch_is_head(name)? {
            return Err(RepoError::CurrentBranch(branch.name().to_string()));
        }
        Ok(branch.delete(self.refs())?)
    }

    /// Rename a branch with its log. A checked-out branch takes `HEAD`
    /// along.
    pub fn rename_branch(&self, old: &str, new: &str, force: bool) -> Result<Reference, RepoError> {
        let to = RefName::branch(new)?;
        let branch = self.find_branch(old)?;
        let was_head = self.branch_is_head(old)?;

        let message = format!("branch: renamed {} to {}", branch.name(), to);
        let renamed = branch.rename(self.refs(), to.clone(), force, self.log(&message))?;
        if was_head {
            self.head()?
                .set_symbolic_target(self.refs(), to, self.log(&message))?;
        }
        debug!(from = old, to = new, was_head, "renamed branch");
        Ok(renamed)
    }
}
