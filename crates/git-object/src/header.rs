//! `key value` header blocks shared by commits and tags.
//!
//! A header block is a run of `key SP value LF` lines terminated by an empty
//! line. Lines starting with a single space continue the previous value;
//! they are folded into it joined by `\n`.

use bstr::{BString, ByteSlice};
use git_hash::ObjectId;

use crate::ObjectError;

/// Iterator over the header lines of a commit or tag.
pub struct HeaderLines<'a> {
    data: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> HeaderLines<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            done: false,
        }
    }

    /// Everything after the blank separator line. Only meaningful once the
    /// iterator is exhausted.
    pub fn body(&self) -> &'a [u8] {
        &self.data[self.pos.min(self.data.len())..]
    }

    fn line_end(&self, from: usize) -> usize {
        self.data[from..]
            .find_byte(b'\n')
            .map_or(self.data.len(), |p| p + from)
    }
}

impl<'a> Iterator for HeaderLines<'a> {
    type Item = (&'a [u8], BString);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos >= self.data.len() {
            return None;
        }
        if self.data[self.pos] == b'\n' {
            self.pos += 1;
            self.done = true;
            return None;
        }

        let end = self.line_end(self.pos);
        let line = &self.data[self.pos..end];
        let (key, value) = match line.find_byte(b' ') {
            Some(sp) => (&line[..sp], &line[sp + 1..]),
            None => (line, &b""[..]),
        };

        let mut value = BString::from(value);
        let mut next = end + 1;
        while next < self.data.len() && self.data[next] == b' ' {
            let cont_end = self.line_end(next);
            value.push(b'\n');
            value.extend_from_slice(&self.data[next + 1..cont_end]);
            next = cont_end + 1;
        }
        self.pos = next;
        Some((key, value))
    }
}

/// Append `key value\n`, writing embedded newlines as continuation lines.
pub fn write_field(out: &mut Vec<u8>, key: &[u8], value: &[u8]) {
    out.extend_from_slice(key);
    out.push(b' ');
    for (i, line) in value.split(|&b| b == b'\n').enumerate() {
        if i > 0 {
            out.extend_from_slice(b"\n ");
        }
        out.extend_from_slice(line);
    }
    out.push(b'\n');
}

pub(crate) fn parse_oid(value: &[u8], field: &'static str) -> Result<ObjectId, ObjectError> {
    let hex = std::str::from_utf8(value)
        .map_err(|_| ObjectError::InvalidHeader(format!("non-UTF-8 {field} id")))?;
    Ok(ObjectId::from_hex(hex)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_keys_and_body() {
        let data = b"tree abc\nparent def\n\nmessage\n";
        let mut lines = HeaderLines::new(data);
        let collected: Vec<_> = lines.by_ref().collect();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].0, b"tree");
        assert_eq!(collected[1].1, "def");
        assert_eq!(lines.body(), b"message\n");
        assert!(lines.next().is_none());
    }

    #[test]
    fn folds_continuation_lines() {
        let data = b"gpgsig -----BEGIN-----\n \n abc\n -----END-----\n\nmsg";
        let mut lines = HeaderLines::new(data);
        let (key, value) = lines.next().unwrap();
        assert_eq!(key, b"gpgsig");
        assert_eq!(value, "-----BEGIN-----\n\nabc\n-----END-----");
        assert!(lines.next().is_none());
        assert_eq!(lines.body(), b"msg");
    }

    #[test]
    fn headers_without_body() {
        let mut lines = HeaderLines::new(b"tree abc");
        assert_eq!(lines.next().unwrap().1, "abc");
        assert!(lines.next().is_none());
        assert_eq!(lines.body(), b"");
    }

    #[test]
    fn write_field_folds_back() {
        let mut out = Vec::new();
        write_field(&mut out, b"gpgsig", b"a\n\nb");
        assert_eq!(out, b"gpgsig a\n \n b\n");
    }
}
