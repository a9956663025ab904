//! Abbreviated identifier resolution with ambiguity detection.

use git_hash::{ObjectId, Prefix};

use crate::{ObjectDatabase, OdbError};

/// Resolve `prefix` to the one stored identifier it abbreviates.
///
/// A full 40-digit prefix is checked for existence directly. Otherwise
/// zero matches is [`OdbError::PrefixNotFound`] and two or more is
/// [`OdbError::Ambiguous`] with the match count.
pub fn resolve_prefix(odb: &ObjectDatabase, prefix: &Prefix) -> Result<ObjectId, OdbError> {
    if let Some(oid) = prefix.to_object_id() {
        return if odb.contains(&oid) {
            Ok(oid)
        } else {
            Err(OdbError::NotFound(oid))
        };
    }

    let mut matches = odb.store().ids_with_prefix(prefix)?;
    matches.dedup();
    tracing::debug!(%prefix, candidates = matches.len(), "resolving abbreviated id");

    match matches.as_slice() {
        [] => Err(OdbError::PrefixNotFound(*prefix)),
        [oid] => Ok(*oid),
        many => Err(OdbError::Ambiguous {
            prefix: *prefix,
            count: many.len(),
        }),
    }
}
