use bstr::BString;
use git_hash::ObjectId;
use git_object::{Commit, Object};
use git_ref::{RefName, Reference};
use git_utils::date::Signature;
use tracing::debug;

use crate::{RepoError, Repository};

/// Everything needed to write a commit object.
#[derive(Debug, Clone)]
pub struct NewCommit<'a> {
    pub author: &'a Signature,
    pub committer: &'a Signature,
    pub message: &'a str,
    /// Message encoding header; omitted means UTF-8.
    pub encoding: Option<&'a str>,
    pub tree: ObjectId,
    pub parents: &'a [ObjectId],
}

impl<'a> NewCommit<'a> {
    pub fn new(
        author: &'a Signature,
        committer: &'a Signature,
        message: &'a str,
        tree: ObjectId,
        parents: &'a [ObjectId],
    ) -> Self {
        Self {
            author,
            committer,
            message,
            encoding: None,
            tree,
            parents,
        }
    }

    pub fn with_encoding(mut self, encoding: &'a str) -> Self {
        self.encoding = Some(encoding);
        self
    }

    fn reflog_message(&self) -> String {
        let subject = self.message.lines().next().unwrap_or_default();
        match self.parents.len() {
            0 => format!("commit (initial): {subject}"),
            1 => format!("commit: {subject}"),
            _ => format!("commit (merge): {subject}"),
        }
    }
}

impl Repository {
    /// Write a commit and optionally move `update_ref` to it.
    ///
    /// The tree and every parent must already exist with the right kinds.
    /// `update_ref` is followed through symbolic references, so `HEAD`
    /// advances the checked-out branch, creating it when unborn. An
    /// existing target must currently point at the first parent.
    pub fn create_commit(
        &self,
        update_ref: Option<&str>,
        new: &NewCommit<'_>,
    ) -> Result<ObjectId, RepoError> {
        self.find_tree(&new.tree)?;
        for parent in new.parents {
            self.find_commit(parent)?;
        }

        let commit = Commit {
            tree: new.tree,
            parents: new.parents.to_vec(),
            author: new.author.clone(),
            committer: new.committer.clone(),
            encoding: new.encoding.map(BString::from),
            gpgsig: None,
            extra_headers: Vec::new(),
            message: new.message.into(),
        };
        let oid = self.odb().write(&Object::Commit(commit))?;
        debug!(%oid, parents = new.parents.len(), "created commit");

        if let Some(name) = update_ref {
            self.advance_ref(&RefName::new(name)?, oid, new)?;
        }
        Ok(oid)
    }

    fn advance_ref(&self, start: &RefName, oid: ObjectId, new: &NewCommit<'_>) -> Result<(), RepoError> {
        let terminal = self.terminal_name(start)?;
        let current = self.refs().get(&terminal)?;
        let expected = new.parents.first().copied();
        let old = current.as_ref().and_then(Reference::target_oid);

        if let Some(old) = old {
            if Some(old) != expected {
                return Err(RepoError::ParentMismatch {
                    name: terminal.to_string(),
                    current: old,
                    expected: expected.unwrap_or(ObjectId::NULL),
                });
            }
        }

        let message = new.reflog_message();
        let handle = current.unwrap_or_else(|| Reference::direct(terminal.clone(), ObjectId::NULL));
        handle.set_target(self.refs(), oid, self.log(&message))?;

        // The symbolic entry point keeps its own log, as HEAD does in git.
        if &terminal != start {
            if let Some(log) = self.log(&message) {
                let entry = log.entry(old.unwrap_or(ObjectId::NULL), oid);
                self.refs().append_reflog(start, &entry)?;
            }
        }
        Ok(())
    }
}
