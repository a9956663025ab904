use std::cmp::Ordering;

use bstr::{BStr, BString, ByteSlice};
use git_hash::{ObjectId, RAW_LEN};

use crate::{ObjectError, ObjectType};

/// File mode for tree entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMode {
    /// Regular file (100644)
    Regular,
    /// Executable file (100755)
    Executable,
    /// Symbolic link (120000)
    Symlink,
    /// Submodule commit (160000)
    Gitlink,
    /// Subdirectory (40000)
    Tree,
    /// Unknown mode, preserved for round-trip
    Unknown(u32),
}

impl FileMode {
    /// Parse from octal ASCII bytes (e.g., `b"100644"`).
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        let raw = parse_octal(s)
            .ok_or_else(|| ObjectError::InvalidFileMode(String::from_utf8_lossy(s).into()))?;
        Ok(Self::from_raw(raw))
    }

    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0o100644 => Self::Regular,
            0o100755 => Self::Executable,
            0o120000 => Self::Symlink,
            0o160000 => Self::Gitlink,
            0o040000 => Self::Tree,
            other => Self::Unknown(other),
        }
    }

    pub fn raw(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Executable => 0o100755,
            Self::Symlink => 0o120000,
            Self::Gitlink => 0o160000,
            Self::Tree => 0o40000,
            Self::Unknown(v) => *v,
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, Self::Tree)
    }

    pub fn is_blob(&self) -> bool {
        matches!(self, Self::Regular | Self::Executable | Self::Symlink)
    }

    /// Kind of object an entry with this mode points at.
    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Tree => ObjectType::Tree,
            Self::Gitlink => ObjectType::Commit,
            _ => ObjectType::Blob,
        }
    }
}

fn parse_octal(s: &[u8]) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    s.iter().try_fold(0u32, |acc, &b| {
        if !(b'0'..=b'7').contains(&b) {
            return None;
        }
        acc.checked_mul(8)?.checked_add(u32::from(b - b'0'))
    })
}

/// A single entry in a tree object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: FileMode,
    pub name: BString,
    pub oid: ObjectId,
}

impl TreeEntry {
    pub fn new(mode: FileMode, name: impl Into<BString>, oid: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            oid,
        }
    }

    pub fn kind(&self) -> ObjectType {
        self.mode.object_type()
    }
}

impl PartialOrd for TreeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Git's canonical entry order: byte-wise, with directory names compared
/// as if they carried a trailing `/`.
impl Ord for TreeEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        let a = self.name.as_bytes();
        let b = other.name.as_bytes();
        let common = a.len().min(b.len());
        a[..common].cmp(&b[..common]).then_with(|| {
            let next = |name: &[u8], is_dir: bool| match name.get(common) {
                Some(&c) => c,
                None if is_dir => b'/',
                None => 0,
            };
            next(a, self.mode.is_tree()).cmp(&next(b, other.mode.is_tree()))
        })
    }
}

/// A git tree object: a directory listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse tree content. Each entry is `<mode-ascii> SP <name> NUL <20 raw bytes>`.
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < content.len() {
            let invalid = |offset: usize, reason: &str| ObjectError::InvalidTreeEntry {
                offset,
                reason: reason.into(),
            };

            let rest = &content[pos..];
            let space = rest
                .find_byte(b' ')
                .ok_or_else(|| invalid(pos, "missing space after mode"))?;
            let mode =
                FileMode::from_bytes(&rest[..space]).map_err(|_| invalid(pos, "invalid mode"))?;

            let nul = rest[space + 1..]
                .find_byte(0)
                .ok_or_else(|| invalid(pos + space + 1, "missing NUL after name"))?
                + space
                + 1;
            let name = BString::from(&rest[space + 1..nul]);

            let oid_bytes = rest
                .get(nul + 1..nul + 1 + RAW_LEN)
                .ok_or_else(|| invalid(pos + nul + 1, "truncated object id"))?;
            entries.push(TreeEntry {
                mode,
                name,
                oid: ObjectId::from_bytes(oid_bytes)?,
            });
            pos += nul + 1 + RAW_LEN;
        }

        Ok(Self { entries })
    }

    /// Serialize entries in canonical order.
    pub fn serialize_content(&self) -> Vec<u8> {
        let mut sorted: Vec<&TreeEntry> = self.entries.iter().collect();
        sorted.sort();

        let mut out = Vec::with_capacity(self.entries.len() * 40);
        for entry in sorted {
            out.extend_from_slice(format!("{:o} ", entry.mode.raw()).as_bytes());
            out.extend_from_slice(&entry.name);
            out.push(0);
            out.extend_from_slice(entry.oid.as_bytes());
        }
        out
    }

    pub fn entry_by_name(&self, name: &BStr) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name.as_bstr() == name)
    }

    pub fn entry_by_index(&self, index: usize) -> Option<&TreeEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(n: u8) -> ObjectId {
        ObjectId::from_raw(&[n; 20])
    }

    #[test]
    fn file_mode_roundtrip() {
        for mode in [
            FileMode::Regular,
            FileMode::Executable,
            FileMode::Symlink,
            FileMode::Gitlink,
            FileMode::Tree,
        ] {
            let text = format!("{:o}", mode.raw());
            assert_eq!(FileMode::from_bytes(text.as_bytes()).unwrap(), mode);
        }
        assert_eq!(FileMode::from_bytes(b"040000").unwrap(), FileMode::Tree);
        assert!(FileMode::from_bytes(b"10064x").is_err());
        assert!(FileMode::from_bytes(b"").is_err());
    }

    #[test]
    fn mode_kinds() {
        assert_eq!(FileMode::Tree.object_type(), ObjectType::Tree);
        assert_eq!(FileMode::Gitlink.object_type(), ObjectType::Commit);
        assert_eq!(FileMode::Executable.object_type(), ObjectType::Blob);
    }

    #[test]
    fn directories_sort_with_trailing_slash() {
        let dir = TreeEntry::new(FileMode::Tree, "foo", oid(1));
        let dotted = TreeEntry::new(FileMode::Regular, "foo.c", oid(1));
        let dashed = TreeEntry::new(FileMode::Regular, "foo-bar", oid(1));
        let file = TreeEntry::new(FileMode::Regular, "foo", oid(1));
        assert_eq!(dir.cmp(&dotted), Ordering::Greater);
        assert_eq!(dir.cmp(&dashed), Ordering::Greater);
        assert_eq!(file.cmp(&dotted), Ordering::Less);
    }

    #[test]
    fn parse_single_entry() {
        let mut data = b"100644 hello.txt\0".to_vec();
        data.extend_from_slice(oid(7).as_bytes());

        let tree = Tree::parse(&data).unwrap();
        assert_eq!(tree.len(), 1);
        let entry = tree.entry_by_index(0).unwrap();
        assert_eq!(entry.mode, FileMode::Regular);
        assert_eq!(entry.name, "hello.txt");
        assert_eq!(entry.oid, oid(7));
    }

    #[test]
    fn truncated_entry_errors() {
        let mut data = b"100644 a\0".to_vec();
        data.extend_from_slice(&[1; 10]);
        assert!(matches!(
            Tree::parse(&data),
            Err(ObjectError::InvalidTreeEntry { offset: 9, .. })
        ));
    }

    #[test]
    fn serialize_sorts() {
        let tree = Tree {
            entries: vec![
                TreeEntry::new(FileMode::Regular, "b.txt", oid(1)),
                TreeEntry::new(FileMode::Tree, "a-dir", oid(2)),
            ],
        };
        let parsed = Tree::parse(&tree.serialize_content()).unwrap();
        assert_eq!(parsed.entries[0].name, "a-dir");
        assert_eq!(parsed.entries[1].name, "b.txt");
    }

    #[test]
    fn lookup_by_name_and_index() {
        let tree = Tree {
            entries: vec![
                TreeEntry::new(FileMode::Regular, "README.md", oid(1)),
                TreeEntry::new(FileMode::Tree, "src", oid(2)),
            ],
        };
        assert_eq!(tree.entry_by_name(BStr::new("src")).unwrap().oid, oid(2));
        assert!(tree.entry_by_name(BStr::new("nonexistent")).is_none());
        assert!(tree.entry_by_index(2).is_none());
    }
}
