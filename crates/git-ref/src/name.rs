use std::fmt;
use std::str::FromStr;

use bstr::{BStr, BString, ByteSlice};

use crate::error::RefError;

bitflags::bitflags! {
    /// Relaxations applied by [`RefName::normalize`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RefNameFlags: u32 {
        /// Accept names without a `/`, provided they are all capitals and
        /// underscores (`HEAD`, `ORIG_HEAD`).
        const ALLOW_ONELEVEL = 0x01;
        /// Accept a single `*`, as in `refs/heads/*`.
        const REFSPEC_PATTERN = 0x02;
        /// Accept any one-level name (`main`), as refspec shorthand does.
        const REFSPEC_SHORTHAND = 0x04;
    }
}

/// A validated reference name.
///
/// Names follow `git-check-ref-format(1)`: no control characters, space or
/// any of `~ ^ : ? * [ \`; no `..`, `@{` or `//`; not `@` alone; no leading
/// or trailing `/`; not ending in `.`; no component that starts with `.` or
/// ends with `.lock`. One-level names must be capitals and underscores.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefName(String);

const FORBIDDEN_CHARS: &[u8] = b" ~^:?*[\\";

pub const HEAD: &str = "HEAD";

impl RefName {
    /// Validate a full reference name.
    pub fn new(name: impl Into<BString>) -> Result<Self, RefError> {
        let name = name.into();
        check(&name, RefNameFlags::ALLOW_ONELEVEL).map_err(|reason| invalid(&name, reason))?;
        into_name(name)
    }

    /// Collapse runs of `/` into one, then validate under `flags`.
    pub fn normalize(name: &str, flags: RefNameFlags) -> Result<Self, RefError> {
        let mut collapsed = BString::from(Vec::with_capacity(name.len()));
        for &b in name.as_bytes() {
            if b == b'/' && collapsed.last() == Some(&b'/') {
                continue;
            }
            collapsed.push(b);
        }
        check(&collapsed, flags).map_err(|reason| invalid(&collapsed, reason))?;
        into_name(collapsed)
    }

    /// Whether `name` is acceptable to [`RefName::new`].
    pub fn is_valid(name: &str) -> bool {
        check(name.as_bytes(), RefNameFlags::ALLOW_ONELEVEL).is_ok()
    }

    pub fn head() -> Self {
        Self(HEAD.to_owned())
    }

    /// `refs/heads/<short>`.
    pub fn branch(short: &str) -> Result<Self, RefError> {
        Self::new(format!("refs/heads/{short}"))
    }

    /// `refs/tags/<short>`.
    pub fn tag(short: &str) -> Result<Self, RefError> {
        Self::new(format!("refs/tags/{short}"))
    }

    /// The name with its `refs/heads/`, `refs/tags/` or `refs/remotes/`
    /// namespace removed.
    pub fn short_name(&self) -> &str {
        ["refs/heads/", "refs/tags/", "refs/remotes/"]
            .iter()
            .find_map(|ns| self.0.strip_prefix(ns))
            .unwrap_or(&self.0)
    }

    pub fn is_head(&self) -> bool {
        self.0 == HEAD
    }

    pub fn is_branch(&self) -> bool {
        self.0.starts_with("refs/heads/")
    }

    pub fn is_tag(&self) -> bool {
        self.0.starts_with("refs/tags/")
    }

    pub fn is_remote(&self) -> bool {
        self.0.starts_with("refs/remotes/")
    }

    /// A one-level pseudo ref such as `HEAD` or `FETCH_HEAD`.
    pub fn is_onelevel(&self) -> bool {
        !self.0.contains('/')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bstr(&self) -> &BStr {
        self.0.as_bytes().as_bstr()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

fn invalid(name: &[u8], reason: &'static str) -> RefError {
    RefError::InvalidName {
        name: name.to_str_lossy().into_owned(),
        reason,
    }
}

fn into_name(name: BString) -> Result<RefName, RefError> {
    String::from_utf8(name.into())
        .map(RefName)
        .map_err(|e| invalid(e.as_bytes(), "not valid UTF-8"))
}

fn is_all_caps(component: &[u8]) -> bool {
    component.first().is_some_and(u8::is_ascii_uppercase)
        && component.iter().all(|&b| b.is_ascii_uppercase() || b == b'_')
}

fn check(name: &[u8], flags: RefNameFlags) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("empty name");
    }
    if name == b"@" {
        return Err("'@' alone is reserved");
    }
    if name.starts_with(b"/") || name.ends_with(b"/") {
        return Err("leading or trailing '/'");
    }
    if name.ends_with(b".") {
        return Err("ends with '.'");
    }
    if name.find(b"..").is_some() {
        return Err("contains '..'");
    }
    if name.find(b"@{").is_some() {
        return Err("contains '@{'");
    }

    let mut stars = 0;
    for &b in name {
        if b < 0x20 || b == 0x7f {
            return Err("contains a control character");
        }
        if b == b'*' && flags.contains(RefNameFlags::REFSPEC_PATTERN) {
            stars += 1;
            if stars > 1 {
                return Err("more than one '*'");
            }
            continue;
        }
        if FORBIDDEN_CHARS.contains(&b) {
            return Err("contains a forbidden character");
        }
    }

    let mut components = 0;
    for component in name.split_str("/") {
        components += 1;
        if component.is_empty() {
            return Err("contains '//'");
        }
        if component.starts_with(b".") {
            return Err("component starts with '.'");
        }
        if component.ends_with(b".lock") {
            return Err("component ends with '.lock'");
        }
    }

    let first = name.split_str("/").next().unwrap_or_default();
    if components == 1 {
        if !flags.intersects(RefNameFlags::ALLOW_ONELEVEL | RefNameFlags::REFSPEC_SHORTHAND) {
            return Err("one-level names are not allowed");
        }
        let pattern = flags.contains(RefNameFlags::REFSPEC_PATTERN) && name == b"*";
        if !flags.contains(RefNameFlags::REFSPEC_SHORTHAND) && !is_all_caps(name) && !pattern {
            return Err("one-level names must be capitals and underscores");
        }
    } else if is_all_caps(first) {
        return Err("pseudo ref cannot have components");
    }
    Ok(())
}

impl FromStr for RefName {
    type Err = RefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for RefName {
    type Error = RefError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RefName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
