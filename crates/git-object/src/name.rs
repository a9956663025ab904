//! Revision expression syntax.
//!
//! Splits expressions like `HEAD~3`, `abc1234^2` or `v1.0^{commit}` into a
//! base name and a chain of navigation suffixes. Resolving the base needs
//! an object database and reference store, so that happens in the walker.

use crate::{ObjectError, ObjectType};

/// A navigation step applied after the base is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionSuffix {
    /// `^` or `^N`: the Nth parent; `^0` is the commit itself.
    Parent(usize),
    /// `~N`: the Nth first-parent ancestor.
    Ancestor(usize),
    /// `^{type}`: peel until an object of this kind.
    Peel(ObjectType),
    /// `^{}`: peel tags until a non-tag object.
    PeelAny,
}

/// A parsed revision expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionExpr<'a> {
    /// Hex identifier, abbreviation or reference name.
    pub base: &'a str,
    pub suffixes: Vec<RevisionSuffix>,
}

/// Parse a revision expression.
///
/// - `"HEAD"` → base `HEAD`, no suffixes
/// - `"main^^~3"` → base `main`, `[Parent(1), Parent(1), Ancestor(3)]`
/// - `"v1.0^{commit}"` → base `v1.0`, `[Peel(Commit)]`
pub fn parse_revision(input: &str) -> Result<RevisionExpr<'_>, ObjectError> {
    let invalid = |reason: String| ObjectError::InvalidRevision {
        expr: input.to_string(),
        reason,
    };

    let base_end = input.find(|c| c == '^' || c == '~').unwrap_or(input.len());
    let base = &input[..base_end];
    if base.is_empty() {
        return Err(invalid("missing base revision".into()));
    }

    let bytes = input.as_bytes();
    let mut suffixes = Vec::new();
    let mut pos = base_end;
    while pos < bytes.len() {
        let op = bytes[pos];
        pos += 1;
        if op == b'^' && bytes.get(pos) == Some(&b'{') {
            let close = input[pos..]
                .find('}')
                .ok_or_else(|| invalid("unclosed '^{'".into()))?
                + pos;
            let inner = &input[pos + 1..close];
            suffixes.push(if inner.is_empty() {
                RevisionSuffix::PeelAny
            } else {
                RevisionSuffix::Peel(
                    inner
                        .parse()
                        .map_err(|_| invalid(format!("unknown peel type '{inner}'")))?,
                )
            });
            pos = close + 1;
            continue;
        }

        let digits = bytes[pos..].iter().take_while(|b| b.is_ascii_digit()).count();
        let count = if digits == 0 {
            1
        } else {
            input[pos..pos + digits]
                .parse()
                .map_err(|_| invalid("count out of range".into()))?
        };
        pos += digits;
        match op {
            b'^' => suffixes.push(RevisionSuffix::Parent(count)),
            b'~' => suffixes.push(RevisionSuffix::Ancestor(count)),
            other => {
                return Err(invalid(format!("unexpected character '{}'", other as char)));
            }
        }
    }

    Ok(RevisionExpr { base, suffixes })
}

/// Whether `s` could be an abbreviated or full hex identifier.
pub fn is_hex_prefix(s: &str) -> bool {
    (git_hash::MIN_PREFIX_LEN..=git_hash::HEX_LEN).contains(&s.len())
        && s.bytes().all(|b| b.is_ascii_hexdigit())
}
