use bstr::ByteSlice;
use git_hash::ObjectId;
use git_object::{Object, RepoObject, Tag};
use git_ref::{RefError, RefName, Reference};
use git_utils::date::Signature;
use git_utils::wildmatch::{wildmatch, WildmatchFlags};

use crate::{RepoError, Repository};

impl Repository {
    /// Write an annotated tag object for `target` and point
    /// `refs/tags/<name>` at it.
    pub fn create_tag(
        &self,
        name: &str,
        target: &RepoObject,
        tagger: &Signature,
        message: &str,
        force: bool,
    ) -> Result<ObjectId, RepoError> {
        let refname = RefName::tag(name)?;
        if !force && self.refs().contains(&refname)? {
            return Err(RefError::AlreadyExists(refname.to_string()).into());
        }
        let tag = Tag {
            target: target.id(),
            target_type: target.kind(),
            tag_name: name.into(),
            tagger: Some(tagger.clone()),
            message: message.into(),
            gpgsig: None,
        };
        let oid = self.odb().write(&Object::Tag(tag))?;
        self.create_reference(refname.as_str(), oid, force, &format!("tag: {name}"))?;
        Ok(oid)
    }

    /// Point `refs/tags/<name>` straight at `target`, with no tag object.
    pub fn create_lightweight_tag(
        &self,
        name: &str,
        target: &RepoObject,
        force: bool,
    ) -> Result<Reference, RepoError> {
        let refname = RefName::tag(name)?;
        self.create_reference(refname.as_str(), target.id(), force, &format!("tag: {name}"))
    }

    pub fn delete_tag(&self, name: &str) -> Result<(), RepoError> {
        let reference = self.refs().find(&RefName::tag(name)?)?;
        Ok(reference.delete(self.refs())?)
    }

    /// Short names of all tags, optionally filtered by a wildmatch
    /// pattern over the short name.
    pub fn tag_names(&self, pattern: Option<&str>) -> Result<Vec<String>, RepoError> {
        let mut names = Vec::new();
        for reference in self.refs().iter(Some("refs/tags/"))? {
            let reference = reference?;
            let short = reference.name().short_name();
            let keep = pattern.map_or(true, |p| {
                wildmatch(p.as_bytes().as_bstr(), short.as_bytes().as_bstr(), WildmatchFlags::empty())
            });
            if keep {
                names.push(short.to_owned());
            }
        }
        Ok(names)
    }
}
