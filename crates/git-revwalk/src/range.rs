//! Revision expressions and `A..B` ranges.

use git_hash::{ObjectId, Prefix};
use git_object::name::{is_hex_prefix, parse_revision, RevisionSuffix};
use git_object::{ObjectType, RepoObject};
use git_ref::RefName;
use git_repository::Repository;

use crate::RevWalkError;

/// Prefixes tried, in order, when a revision names a reference.
const DWIM_RULES: &[&str] = &["", "refs/", "refs/tags/", "refs/heads/", "refs/remotes/"];

/// Split `A..B` and resolve both sides to object ids, an empty side being
/// `HEAD`. Returns `(A, B)`: the side to hide and the side to push.
///
/// The symmetric form `A...B` is rejected, as are a missing `..`, a second
/// `..` and a range with both sides empty, all before either side is
/// resolved.
pub fn parse_range(repo: &Repository, range: &str) -> Result<(ObjectId, ObjectId), RevWalkError> {
    let invalid = |reason| RevWalkError::InvalidRange {
        range: range.to_owned(),
        reason,
    };
    if range.contains("...") {
        return Err(invalid("symmetric difference is not supported"));
    }
    let Some((from, to)) = range.split_once("..") else {
        return Err(invalid("expected 'A..B'"));
    };
    if from.is_empty() && to.is_empty() {
        return Err(invalid("both sides are empty"));
    }
    if to.contains("..") {
        return Err(invalid("more than one '..'"));
    }

    let side = |rev: &str| {
        if rev.is_empty() {
            resolve_revision(repo, "HEAD")
        } else {
            resolve_revision(repo, rev)
        }
    };
    Ok((side(from)?, side(to)?))
}

/// Resolve a revision expression to an object id.
///
/// Supports:
/// - Full 40-char hex OID and unambiguous abbreviations
/// - Ref names, tried as given and under `refs/`, `refs/tags/`,
///   `refs/heads/` and `refs/remotes/`
/// - Suffixes `~N`, `^N`, `^{}`, `^{commit}`, `^{tree}` and the other
///   object kinds, chained left to right
pub fn resolve_revision(repo: &Repository, rev: &str) -> Result<ObjectId, RevWalkError> {
    Ok(resolve_revision_object(repo, rev)?.id())
}

/// Like [`resolve_revision`], returning the loaded object.
pub fn resolve_revision_object(repo: &Repository, rev: &str) -> Result<RepoObject, RevWalkError> {
    let rev = rev.trim();
    let expr = parse_revision(rev)?;
    let mut current = repo.lookup(&resolve_base(repo, rev, expr.base)?)?;

    for suffix in expr.suffixes {
        current = match suffix {
            RevisionSuffix::Parent(0) => repo.peel_to_commit(&current)?.to_object(),
            RevisionSuffix::Parent(n) => {
                let commit = repo.peel_to_commit(&current)?;
                let parent = commit.parents.get(n - 1).ok_or_else(|| {
                    RevWalkError::InvalidRevision {
                        rev: rev.to_owned(),
                        reason: format!("commit {} has no parent {n}", commit.id()),
                    }
                })?;
                repo.lookup(parent)?
            }
            RevisionSuffix::Ancestor(n) => {
                let mut commit = repo.peel_to_commit(&current)?;
                for _ in 0..n {
                    let parent = commit.first_parent().copied().ok_or_else(|| {
                        RevWalkError::InvalidRevision {
                            rev: rev.to_owned(),
                            reason: format!("history ends at root commit {}", commit.id()),
                        }
                    })?;
                    commit = repo.find_commit(&parent)?;
                }
                commit.to_object()
            }
            RevisionSuffix::Peel(kind) => peel(repo, rev, &current, kind)?,
            RevisionSuffix::PeelAny => match current.to_tag() {
                Some(tag) => repo.peel_tag(&tag)?,
                None => current,
            },
        };
    }
    Ok(current)
}

fn peel(
    repo: &Repository,
    rev: &str,
    obj: &RepoObject,
    kind: ObjectType,
) -> Result<RepoObject, RevWalkError> {
    if kind == ObjectType::Commit {
        return Ok(repo.peel_to_commit(obj)?.to_object());
    }
    repo.peel_to_kind(obj, kind).map_err(|err| match err {
        git_repository::RepoError::WrongKind { oid, actual, .. } => RevWalkError::InvalidRevision {
            rev: rev.to_owned(),
            reason: format!("{actual} {oid} cannot be peeled to a {kind}"),
        },
        other => other.into(),
    })
}

/// The object id a revision's base names: a hex id or abbreviation first,
/// then references.
fn resolve_base(repo: &Repository, rev: &str, base: &str) -> Result<ObjectId, RevWalkError> {
    if is_hex_prefix(base) {
        let prefix = Prefix::from_hex(base)?;
        match repo.odb().resolve_prefix(&prefix) {
            Ok(oid) => return Ok(oid),
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err.into()),
        }
    }

    for rule in DWIM_RULES {
        let candidate = format!("{rule}{base}");
        let Ok(name) = RefName::new(candidate.as_str()) else {
            continue;
        };
        if repo.refs().contains(&name)? {
            tracing::trace!(rev, %name, "revision names a reference");
            return Ok(repo.refs().resolve_to_oid(&name)?);
        }
    }

    Err(RevWalkError::InvalidRevision {
        rev: rev.to_owned(),
        reason: format!("'{base}' is neither an object id nor a reference"),
    })
}
