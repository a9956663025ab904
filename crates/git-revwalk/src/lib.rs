//! Revision walking: commit traversal and revision parsing.
//!
//! [`RevWalk`] enumerates the commits reachable from a set of pushed
//! starting points and not reachable from a set of hidden ones. The order
//! is chosen with [`Sort`] flags that combine: committer time, topological
//! (children before parents) and reverse. Starting points may be object
//! ids, references, reference globs, `HEAD` or an `A..B` range, and
//! [`resolve_revision`] turns expressions like `main~2` or `v1.0^{commit}`
//! into object ids.

mod range;
mod walk;

pub use range::{parse_range, resolve_revision, resolve_revision_object};
pub use walk::{RevWalk, Sort, WalkOptions};

use git_hash::ObjectId;
use git_object::ObjectType;
use git_repository::RepoError;

/// Errors produced by revision walking operations.
#[derive(Debug, thiserror::Error)]
pub enum RevWalkError {
    #[error("invalid revision range '{range}': {reason}")]
    InvalidRange { range: String, reason: &'static str },

    #[error("invalid revision '{rev}': {reason}")]
    InvalidRevision { rev: String, reason: String },

    #[error("broken history: parent {parent} of commit {commit} is missing")]
    BrokenHistory { commit: ObjectId, parent: ObjectId },

    #[error("object {oid} is a {kind}, not a commit")]
    NotACommit { oid: ObjectId, kind: ObjectType },

    #[error(transparent)]
    Repo(RepoError),

    #[error(transparent)]
    Odb(#[from] git_odb::OdbError),

    #[error(transparent)]
    Ref(#[from] git_ref::RefError),

    #[error(transparent)]
    Object(#[from] git_object::ObjectError),

    #[error(transparent)]
    Hash(#[from] git_hash::HashError),
}

impl RevWalkError {
    /// Whether the error reports an absent object or reference.
    pub fn is_not_found(&self) -> bool {
        match self {
            RevWalkError::Repo(e) => e.is_not_found(),
            RevWalkError::Odb(e) => e.is_not_found(),
            RevWalkError::Ref(e) => e.is_not_found(),
            _ => false,
        }
    }
}

impl From<RepoError> for RevWalkError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotACommit { oid, kind } => RevWalkError::NotACommit { oid, kind },
            other => RevWalkError::Repo(other),
        }
    }
}
