//! Repository facade tying the object database and the reference store
//! together.
//!
//! A [`Repository`] owns an [`ObjectDatabase`] over some object store and a
//! boxed [`RefStore`]. It provides typed lookups, tag peeling, `HEAD`
//! inspection and the creation helpers (blobs, trees, commits, tags,
//! branches) that keep references and their logs in step.

mod branch;
mod commit;
mod error;
mod options;
mod reference;
mod tag;

pub use commit::NewCommit;
pub use error::RepoError;
pub use options::{RepositoryOptions, DEFAULT_BRANCH};

use git_hash::{ObjectId, Prefix};
use git_object::{
    BlobView, CommitView, Object, ObjectKind, ObjectType, RepoObject, TagView, Tree, TreeView, View,
};
use git_odb::{MemoryObjectStore, ObjectDatabase, ObjectStore};
use git_ref::{MemoryRefStore, RefError, RefName, RefStore, Reference, ReflogMessage};
use git_utils::date::Signature;

/// The central repository struct.
pub struct Repository {
    odb: ObjectDatabase,
    refs: Box<dyn RefStore>,
    options: RepositoryOptions,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Repository {
    /// Wrap existing stores without touching them.
    pub fn new(
        objects: impl ObjectStore + 'static,
        refs: impl RefStore + 'static,
        options: RepositoryOptions,
    ) -> Self {
        Self {
            odb: ObjectDatabase::with_cache_size(objects, options.object_cache_size),
            refs: Box::new(refs),
            options,
        }
    }

    /// Wrap stores and point `HEAD` at the default branch if it is absent.
    pub fn init(
        objects: impl ObjectStore + 'static,
        refs: impl RefStore + 'static,
        options: RepositoryOptions,
    ) -> Result<Self, RepoError> {
        let repo = Self::new(objects, refs, options);
        let head = RefName::head();
        if !repo.refs.contains(&head)? {
            let branch = RefName::branch(&repo.options.default_branch)?;
            repo.refs.put(&Reference::symbolic(head, branch))?;
        }
        Ok(repo)
    }

    /// A fresh repository over in-memory stores.
    pub fn in_memory() -> Result<Self, RepoError> {
        Self::in_memory_with(RepositoryOptions::default())
    }

    pub fn in_memory_with(options: RepositoryOptions) -> Result<Self, RepoError> {
        Self::init(MemoryObjectStore::new(), MemoryRefStore::new(), options)
    }

    // --- Subsystem accessors ---

    pub fn odb(&self) -> &ObjectDatabase {
        &self.odb
    }

    pub fn refs(&self) -> &dyn RefStore {
        self.refs.as_ref()
    }

    pub fn options(&self) -> &RepositoryOptions {
        &self.options
    }

    pub fn committer(&self) -> Option<&Signature> {
        self.options.committer.as_ref()
    }

    pub fn set_committer(&mut self, committer: Option<Signature>) {
        self.options.committer = committer;
    }

    /// Reflog context for `message`, present only when a committer is set.
    pub(crate) fn log<'a>(&'a self, message: &'a str) -> Option<ReflogMessage<'a>> {
        self.committer().map(|who| ReflogMessage::new(who, message))
    }

    // --- Objects ---

    pub fn lookup(&self, oid: &ObjectId) -> Result<RepoObject, RepoError> {
        Ok(self.odb.lookup(oid)?)
    }

    /// Look an object up by an abbreviated hex identifier.
    pub fn lookup_prefix(&self, hex: &str) -> Result<RepoObject, RepoError> {
        let prefix = Prefix::from_hex(hex)?;
        Ok(self.odb.lookup_prefix(&prefix)?)
    }

    pub fn find_commit(&self, oid: &ObjectId) -> Result<CommitView, RepoError> {
        let obj = self.lookup(oid)?;
        obj.to_commit().ok_or(RepoError::NotACommit {
            oid: *oid,
            kind: obj.kind(),
        })
    }

    pub fn find_tree(&self, oid: &ObjectId) -> Result<TreeView, RepoError> {
        self.find_as(oid)
    }

    pub fn find_blob(&self, oid: &ObjectId) -> Result<BlobView, RepoError> {
        self.find_as(oid)
    }

    pub fn find_tag(&self, oid: &ObjectId) -> Result<TagView, RepoError> {
        self.find_as(oid)
    }

    fn find_as<T: ObjectKind>(&self, oid: &ObjectId) -> Result<View<T>, RepoError> {
        let obj = self.lookup(oid)?;
        obj.view().ok_or(RepoError::WrongKind {
            oid: *oid,
            expected: T::KIND,
            actual: obj.kind(),
        })
    }

    /// The `n`th parent of `commit`, loaded from the store.
    pub fn commit_parent(&self, commit: &CommitView, n: usize) -> Result<CommitView, RepoError> {
        let parent = commit.parents.get(n).ok_or(RepoError::NoSuchParent {
            commit: commit.id(),
            index: n,
        })?;
        self.find_commit(parent)
    }

    pub fn commit_parents(&self, commit: &CommitView) -> Result<Vec<CommitView>, RepoError> {
        commit.parents.iter().map(|p| self.find_commit(p)).collect()
    }

    pub fn commit_tree(&self, commit: &CommitView) -> Result<TreeView, RepoError> {
        self.find_tree(&commit.tree)
    }

    /// The object a tag points at, one level down.
    pub fn tag_target(&self, tag: &TagView) -> Result<RepoObject, RepoError> {
        self.lookup(&tag.target)
    }

    /// Follow a chain of annotated tags to the first non-tag object.
    pub fn peel_tag(&self, tag: &TagView) -> Result<RepoObject, RepoError> {
        let mut current = self.tag_target(tag)?;
        while let Some(inner) = current.to_tag() {
            current = self.tag_target(&inner)?;
        }
        Ok(current)
    }

    /// Peel `obj` until it has the requested kind: tags are followed and a
    /// commit yields its tree.
    pub fn peel_to_kind(&self, obj: &RepoObject, kind: ObjectType) -> Result<RepoObject, RepoError> {
        let mut current = obj.clone();
        loop {
            if current.kind() == kind {
                return Ok(current);
            }
            current = match current.data() {
                git_object::ObjectData::Tag(tag) => self.lookup(&tag.target)?,
                git_object::ObjectData::Commit(commit) if kind == ObjectType::Tree => {
                    self.lookup(&commit.tree)?
                }
                _ => {
                    return Err(RepoError::WrongKind {
                        oid: current.id(),
                        expected: kind,
                        actual: current.kind(),
                    })
                }
            };
        }
    }

    /// Peel `obj` through any tags to a commit.
    pub fn peel_to_commit(&self, obj: &RepoObject) -> Result<CommitView, RepoError> {
        let peeled = self.peel_to_kind(obj, ObjectType::Commit).map_err(|e| match e {
            RepoError::WrongKind { oid, actual, .. } => RepoError::NotACommit { oid, kind: actual },
            other => other,
        })?;
        self.find_commit(&peeled.id())
    }

    /// For a direct reference pointing at an annotated tag, the first
    /// non-tag object down the tag chain. `None` for symbolic references
    /// and references to anything but a tag.
    pub fn peeled_target(&self, reference: &Reference) -> Result<Option<RepoObject>, RepoError> {
        let Some(oid) = reference.target_oid() else {
            return Ok(None);
        };
        match self.lookup(&oid)?.to_tag() {
            Some(tag) => Ok(Some(self.peel_tag(&tag)?)),
            None => Ok(None),
        }
    }

    pub fn create_blob(&self, data: &[u8]) -> Result<ObjectId, RepoError> {
        Ok(self.odb.write_raw(ObjectType::Blob, data)?)
    }

    pub fn create_tree(&self, tree: &Tree) -> Result<ObjectId, RepoError> {
        Ok(self.odb.write(&Object::Tree(tree.clone()))?)
    }

    // --- HEAD ---

    /// A snapshot of `HEAD` itself, symbolic or detached.
    pub fn head(&self) -> Result<Reference, RepoError> {
        Ok(self.refs.find(&RefName::head())?)
    }

    /// The commit id `HEAD` designates. An unborn branch is `UnbornHead`.
    pub fn head_id(&self) -> Result<ObjectId, RepoError> {
        match self.head()?.resolve(self.refs()) {
            Ok(resolved) => resolved
                .target_oid()
                .ok_or_else(|| RepoError::Ref(RefError::NotFound(resolved.name().to_string()))),
            Err(RefError::Dangling { target, .. }) => Err(RepoError::UnbornHead(target)),
            Err(e) => Err(e.into()),
        }
    }

    pub fn head_commit(&self) -> Result<CommitView, RepoError> {
        let oid = self.head_id()?;
        self.peel_to_commit(&self.lookup(&oid)?)
    }

    /// Whether `HEAD` holds an object id rather than a branch name.
    pub fn is_head_detached(&self) -> Result<bool, RepoError> {
        Ok(self.head()?.is_direct())
    }

    /// Whether `HEAD` names a branch that does not exist yet.
    pub fn is_head_unborn(&self) -> Result<bool, RepoError> {
        match self.head_id() {
            Ok(_) => Ok(false),
            Err(RepoError::UnbornHead(_)) => Ok(true),
            Err(e) => Err(e),
        }
    }

    /// The branch `HEAD` points at, `None` when detached.
    pub fn current_branch(&self) -> Result<Option<RefName>, RepoError> {
        Ok(self.head()?.symbolic_target().cloned())
    }

    /// Whether the repository has an unborn `HEAD` and no references.
    pub fn is_empty(&self) -> Result<bool, RepoError> {
        Ok(self.is_head_unborn()? && self.refs.iter(Some("refs/"))?.next().is_none())
    }
}
