use std::fmt;

use bstr::{BStr, BString, ByteSlice, ByteVec};
use git_hash::{ObjectId, HEX_LEN};
use git_utils::date::Signature;

use crate::error::RefError;

/// One recorded change of a reference's value.
///
/// Line form: `<old-hex> <new-hex> <name> <<email>> <timestamp> <tz>\t<message>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflogEntry {
    pub old_oid: ObjectId,
    pub new_oid: ObjectId,
    pub identity: Signature,
    pub message: BString,
}

/// Who made a reference change and why. Passed to the mutating
/// operations of [`crate::Reference`]; when absent no entry is written.
#[derive(Debug, Clone, Copy)]
pub struct ReflogMessage<'a> {
    pub committer: &'a Signature,
    pub message: &'a str,
}

impl<'a> ReflogMessage<'a> {
    pub fn new(committer: &'a Signature, message: &'a str) -> Self {
        Self { committer, message }
    }

    /// The entry recording a change from `old_oid` to `new_oid`.
    pub fn entry(&self, old_oid: ObjectId, new_oid: ObjectId) -> ReflogEntry {
        ReflogEntry {
            old_oid,
            new_oid,
            identity: self.committer.clone(),
            message: self.message.into(),
        }
    }
}

impl ReflogEntry {
    /// Parse one reflog line. A trailing newline is ignored.
    pub fn parse(line: &BStr) -> Result<Self, RefError> {
        let line: &[u8] = line.as_bytes();
        let line = line.strip_suffix(b"\n").unwrap_or(line);
        let oid_at = |start: usize| -> Result<ObjectId, RefError> {
            let hex = line
                .get(start..start + HEX_LEN)
                .ok_or_else(|| RefError::Parse(format!("line too short: {} bytes", line.len())))?;
            let hex = hex
                .to_str()
                .map_err(|_| RefError::Parse("object id is not ASCII".into()))?;
            Ok(ObjectId::from_hex(hex)?)
        };

        let old_oid = oid_at(0)?;
        let new_oid = oid_at(HEX_LEN + 1)?;
        let rest_at = 2 * HEX_LEN + 2;
        if line.get(HEX_LEN) != Some(&b' ') || line.get(rest_at - 1) != Some(&b' ') {
            return Err(RefError::Parse("expected a space after each object id".into()));
        }

        let rest = &line[rest_at..];
        let (identity, message) = match rest.find_byte(b'\t') {
            Some(tab) => (&rest[..tab], &rest[tab + 1..]),
            None => (rest, &b""[..]),
        };
        let identity = Signature::parse(identity.as_bstr())
            .map_err(|e| RefError::Parse(format!("invalid identity: {e}")))?;

        Ok(Self {
            old_oid,
            new_oid,
            identity,
            message: message.into(),
        })
    }

    /// The line form, without a trailing newline.
    pub fn to_bytes(&self) -> BString {
        let mut out = BString::from(Vec::with_capacity(2 * HEX_LEN + 64 + self.message.len()));
        out.push_str(self.old_oid.to_hex());
        out.push_byte(b' ');
        out.push_str(self.new_oid.to_hex());
        out.push_byte(b' ');
        out.push_str(self.identity.to_bytes());
        out.push_byte(b'\t');
        out.push_str(&self.message);
        out
    }

    /// Whether this entry records the creation of the reference.
    pub fn is_creation(&self) -> bool {
        self.old_oid.is_null() && !self.new_oid.is_null()
    }

    /// Whether this entry records the removal of the reference.
    pub fn is_deletion(&self) -> bool {
        self.new_oid.is_null()
    }
}

impl fmt::Display for ReflogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_bytes(), f)
    }
}
