use git_object::cache::DEFAULT_CAPACITY;
use git_utils::date::Signature;

/// Branch `HEAD` points at in a freshly initialised repository.
pub const DEFAULT_BRANCH: &str = "main";

/// Explicit configuration for a [`crate::Repository`].
#[derive(Debug, Clone)]
pub struct RepositoryOptions {
    /// Identity recorded in reflog entries. Without one, reference
    /// updates are not logged.
    pub committer: Option<Signature>,
    /// Capacity of the decoded-object cache.
    pub object_cache_size: usize,
    /// Short name of the branch an unborn `HEAD` points at.
    pub default_branch: String,
}

impl RepositoryOptions {
    pub fn with_committer(mut self, committer: Signature) -> Self {
        self.committer = Some(committer);
        self
    }
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            committer: None,
            object_cache_size: DEFAULT_CAPACITY,
            default_branch: DEFAULT_BRANCH.to_owned(),
        }
    }
}
