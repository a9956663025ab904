//! Shared object handles and their typed views.
//!
//! A [`RepoObject`] pairs an identifier with the decoded object behind an
//! `Arc`. Casting to a typed [`View`] clones the `Arc`, never the payload,
//! and a cast to the wrong kind yields `None`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use git_hash::ObjectId;

use crate::{Blob, Commit, Object, ObjectType, Tag, Tree};

/// Decoded payload of a handle, one variant per kind.
#[derive(Debug, Clone)]
pub enum ObjectData {
    Commit(Arc<Commit>),
    Tree(Arc<Tree>),
    Blob(Arc<Blob>),
    Tag(Arc<Tag>),
}

impl From<Object> for ObjectData {
    fn from(obj: Object) -> Self {
        match obj {
            Object::Commit(c) => Self::Commit(Arc::new(c)),
            Object::Tree(t) => Self::Tree(Arc::new(t)),
            Object::Blob(b) => Self::Blob(Arc::new(b)),
            Object::Tag(t) => Self::Tag(Arc::new(t)),
        }
    }
}

/// Object kinds that can back a typed [`View`].
pub trait ObjectKind: Sized {
    const KIND: ObjectType;

    fn project(data: &ObjectData) -> Option<&Arc<Self>>;

    fn wrap(data: Arc<Self>) -> ObjectData;
}

macro_rules! object_kind {
    ($ty:ident, $variant:ident) => {
        impl ObjectKind for $ty {
            const KIND: ObjectType = ObjectType::$variant;

            fn project(data: &ObjectData) -> Option<&Arc<Self>> {
                match data {
                    ObjectData::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn wrap(data: Arc<Self>) -> ObjectData {
                ObjectData::$variant(data)
            }
        }
    };
}

object_kind!(Commit, Commit);
object_kind!(Tree, Tree);
object_kind!(Blob, Blob);
object_kind!(Tag, Tag);

/// A looked-up object: identifier plus shared decoded payload.
///
/// Equality and hashing use the identifier only.
#[derive(Clone)]
pub struct RepoObject {
    id: ObjectId,
    data: ObjectData,
}

impl RepoObject {
    pub fn new(id: ObjectId, object: Object) -> Self {
        Self {
            id,
            data: object.into(),
        }
    }

    pub fn from_data(id: ObjectId, data: ObjectData) -> Self {
        Self { id, data }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn data(&self) -> &ObjectData {
        &self.data
    }

    pub fn kind(&self) -> ObjectType {
        match self.data {
            ObjectData::Commit(_) => ObjectType::Commit,
            ObjectData::Tree(_) => ObjectType::Tree,
            ObjectData::Blob(_) => ObjectType::Blob,
            ObjectData::Tag(_) => ObjectType::Tag,
        }
    }

    pub fn is_commit(&self) -> bool {
        self.kind() == ObjectType::Commit
    }

    pub fn is_tree(&self) -> bool {
        self.kind() == ObjectType::Tree
    }

    pub fn is_blob(&self) -> bool {
        self.kind() == ObjectType::Blob
    }

    pub fn is_tag(&self) -> bool {
        self.kind() == ObjectType::Tag
    }

    /// Typed view of the payload, or `None` when the kind differs.
    pub fn view<T: ObjectKind>(&self) -> Option<View<T>> {
        T::project(&self.data).map(|data| View {
            id: self.id,
            data: Arc::clone(data),
        })
    }

    pub fn to_commit(&self) -> Option<CommitView> {
        self.view()
    }

    pub fn to_tree(&self) -> Option<TreeView> {
        self.view()
    }

    pub fn to_blob(&self) -> Option<BlobView> {
        self.view()
    }

    pub fn to_tag(&self) -> Option<TagView> {
        self.view()
    }
}

impl PartialEq for RepoObject {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RepoObject {}

impl Hash for RepoObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl fmt::Debug for RepoObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepoObject")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .finish()
    }
}

/// A typed projection of a [`RepoObject`]. Dereferences to the payload.
pub struct View<T> {
    id: ObjectId,
    data: Arc<T>,
}

pub type CommitView = View<Commit>;
pub type TreeView = View<Tree>;
pub type BlobView = View<Blob>;
pub type TagView = View<Tag>;

impl<T: ObjectKind> View<T> {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn kind(&self) -> ObjectType {
        T::KIND
    }

    /// Back to the untyped handle, sharing the same payload.
    pub fn to_object(&self) -> RepoObject {
        RepoObject {
            id: self.id,
            data: T::wrap(Arc::clone(&self.data)),
        }
    }

    /// Whether both views share one decoded payload.
    pub fn shares_data(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl<T> Deref for View<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

impl<T> Clone for View<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            data: Arc::clone(&self.data),
        }
    }
}

impl<T> PartialEq for View<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for View<T> {}

impl<T> Hash for View<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl<T: fmt::Debug> fmt::Debug for View<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("id", &self.id)
            .field("data", &self.data)
            .finish()
    }
}

impl<T: ObjectKind> From<View<T>> for RepoObject {
    fn from(view: View<T>) -> Self {
        RepoObject {
            id: view.id,
            data: T::wrap(view.data),
        }
    }
}
