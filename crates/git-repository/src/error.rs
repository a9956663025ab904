use git_hash::ObjectId;
use git_object::ObjectType;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("object {oid} is a {kind}, not a commit")]
    NotACommit { oid: ObjectId, kind: ObjectType },

    #[error("object {oid} is a {actual}, expected a {expected}")]
    WrongKind {
        oid: ObjectId,
        expected: ObjectType,
        actual: ObjectType,
    },

    #[error("HEAD points to unborn branch {0}")]
    UnbornHead(String),

    #[error("commit {commit} has no parent at index {index}")]
    NoSuchParent { commit: ObjectId, index: usize },

    #[error("cannot update {name}: it points at {current}, not the first parent {expected}")]
    ParentMismatch {
        name: String,
        current: ObjectId,
        expected: ObjectId,
    },

    #[error("cannot force-update or delete branch {0}: it is checked out as HEAD")]
    CurrentBranch(String),

    #[error(transparent)]
    Odb(#[from] git_odb::OdbError),

    #[error(transparent)]
    Ref(#[from] git_ref::RefError),

    #[error(transparent)]
    Object(#[from] git_object::ObjectError),

    #[error(transparent)]
    Hash(#[from] git_hash::HashError),
}

impl RepoError {
    /// Whether the error reports an absent object or reference.
    pub fn is_not_found(&self) -> bool {
        match self {
            RepoError::Odb(e) => e.is_not_found(),
            RepoError::Ref(e) => e.is_not_found(),
            _ => false,
        }
    }
}
