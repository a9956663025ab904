use bstr::{BStr, BString, ByteSlice};
use git_hash::ObjectId;
use git_utils::date::Signature;

use crate::header::{parse_oid, write_field, HeaderLines};
use crate::ObjectError;

/// Encoding assumed when a commit carries no `encoding` header.
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// A git commit object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// OID of the root tree.
    pub tree: ObjectId,
    /// Parent commit OIDs (empty for root commit).
    pub parents: Vec<ObjectId>,
    pub author: Signature,
    pub committer: Signature,
    /// Optional encoding header (e.g., "ISO-8859-1").
    pub encoding: Option<BString>,
    /// Optional GPG signature (multi-line).
    pub gpgsig: Option<BString>,
    /// Extra headers (mergetag, etc.) preserved for round-trip.
    pub extra_headers: Vec<(BString, BString)>,
    /// Commit message (everything after the blank line separator).
    pub message: BString,
}

impl Commit {
    /// Parse commit content from raw bytes (no object header).
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut tree = None;
        let mut parents = Vec::new();
        let mut author = None;
        let mut committer = None;
        let mut encoding = None;
        let mut gpgsig = None;
        let mut extra_headers = Vec::new();

        let mut lines = HeaderLines::new(content);
        for (key, value) in lines.by_ref() {
            match key {
                b"tree" => tree = Some(parse_oid(&value, "tree")?),
                b"parent" => parents.push(parse_oid(&value, "parent")?),
                b"author" => author = Some(parse_signature(&value)?),
                b"committer" => committer = Some(parse_signature(&value)?),
                b"encoding" => encoding = Some(value),
                b"gpgsig" => gpgsig = Some(value),
                _ => extra_headers.push((BString::from(key), value)),
            }
        }

        Ok(Self {
            tree: tree.ok_or(ObjectError::MissingCommitField { field: "tree" })?,
            parents,
            author: author.ok_or(ObjectError::MissingCommitField { field: "author" })?,
            committer: committer.ok_or(ObjectError::MissingCommitField { field: "committer" })?,
            encoding,
            gpgsig,
            extra_headers,
            message: BString::from(lines.body()),
        })
    }

    /// Serialize commit content to bytes (no object header).
    pub fn serialize_content(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(256 + self.message.len());
        write_field(&mut out, b"tree", self.tree.to_hex().as_bytes());
        for parent in &self.parents {
            write_field(&mut out, b"parent", parent.to_hex().as_bytes());
        }
        write_field(&mut out, b"author", &self.author.to_bytes());
        write_field(&mut out, b"committer", &self.committer.to_bytes());
        if let Some(enc) = &self.encoding {
            write_field(&mut out, b"encoding", enc);
        }
        if let Some(sig) = &self.gpgsig {
            write_field(&mut out, b"gpgsig", sig);
        }
        for (key, val) in &self.extra_headers {
            write_field(&mut out, key, val);
        }
        out.push(b'\n');
        out.extend_from_slice(&self.message);
        out
    }

    /// Get the first parent (or None for root commits).
    pub fn first_parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Committer time in seconds since the epoch.
    pub fn time(&self) -> i64 {
        self.committer.date.timestamp
    }

    /// Committer timezone offset in minutes east of UTC.
    pub fn time_offset(&self) -> i32 {
        self.committer.date.tz_offset
    }

    /// The declared message encoding, `UTF-8` when absent.
    pub fn encoding_or_default(&self) -> &BStr {
        match &self.encoding {
            Some(enc) => enc.as_bstr(),
            None => DEFAULT_ENCODING.as_bytes().as_bstr(),
        }
    }

    /// First line of the message.
    pub fn summary(&self) -> &BStr {
        let msg = self.message.as_bytes();
        msg.find_byte(b'\n').map_or(msg, |pos| &msg[..pos]).as_bstr()
    }

    /// The first paragraph of the message with its line breaks replaced by
    /// spaces, as `git log --oneline` shows it.
    pub fn short_message(&self) -> BString {
        let msg = self.message.trim_start();
        let para = msg.find(b"\n\n").map_or(msg, |pos| &msg[..pos]);
        let mut out = BString::from(Vec::with_capacity(para.len()));
        for (i, line) in para.lines().map(|l| l.trim()).filter(|l| !l.is_empty()).enumerate() {
            if i > 0 {
                out.push(b' ');
            }
            out.extend_from_slice(line);
        }
        out
    }

    /// Everything after the first blank line of the message.
    pub fn body(&self) -> Option<&BStr> {
        let msg = self.message.as_bytes();
        msg.find(b"\n\n").map(|pos| msg[pos + 2..].as_bstr())
    }
}

fn parse_signature(data: &[u8]) -> Result<Signature, ObjectError> {
    Signature::parse(data.as_bstr()).map_err(|e| ObjectError::InvalidSignature(e.to_string()))
}
