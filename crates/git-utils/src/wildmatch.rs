//! Glob matching with git's `wildmatch` semantics, used for reference
//! patterns (`refs/heads/*`, `refs/tags/v1.?`).

use bstr::{BStr, BString, ByteSlice};

bitflags::bitflags! {
    /// Flags controlling wildmatch behavior.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WildmatchFlags: u32 {
        /// Case-insensitive matching.
        const CASEFOLD = 0x01;
        /// Don't match '/' with wildcards (pathname mode).
        const PATHNAME = 0x02;
    }
}

/// Outcome of one match attempt. `Abort` lets a failed `*` stop the outer
/// backtracking early once the text is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Match,
    NoMatch,
    Abort,
}

/// Check if a byte is a glob special character.
pub fn is_glob_special(c: u8) -> bool {
    matches!(c, b'*' | b'?' | b'[' | b'\\')
}

/// Does `pattern` contain any glob metacharacter?
pub fn has_glob_chars(pattern: &BStr) -> bool {
    pattern.iter().any(|&c| matches!(c, b'*' | b'?' | b'['))
}

fn fold(c: u8, flags: WildmatchFlags) -> u8 {
    if flags.contains(WildmatchFlags::CASEFOLD) {
        c.to_ascii_lowercase()
    } else {
        c
    }
}

fn do_match(pattern: &[u8], text: &[u8], flags: WildmatchFlags) -> Outcome {
    let pathname = flags.contains(WildmatchFlags::PATHNAME);
    let mut p = 0;
    let mut t = 0;

    while p < pattern.len() {
        match pattern[p] {
            b'*' => {
                let mut q = p + 1;
                while q < pattern.len() && pattern[q] == b'*' {
                    q += 1;
                }
                // `**` crosses directory separators even in pathname mode.
                let crosses_slash = !pathname || q - p >= 2;
                if q == pattern.len() {
                    if crosses_slash || !text[t..].contains(&b'/') {
                        return Outcome::Match;
                    }
                    return Outcome::NoMatch;
                }
                let rest = &pattern[q..];
                let mut i = t;
                loop {
                    match do_match(rest, &text[i..], flags) {
                        Outcome::NoMatch => {}
                        other => return other,
                    }
                    if i >= text.len() {
                        return Outcome::Abort;
                    }
                    if !crosses_slash && text[i] == b'/' {
                        return Outcome::NoMatch;
                    }
                    i += 1;
                }
            }
            b'?' => {
                if t >= text.len() || (pathname && text[t] == b'/') {
                    return Outcome::NoMatch;
                }
                p += 1;
                t += 1;
            }
            b'[' => {
                if t >= text.len() {
                    return Outcome::Abort;
                }
                match match_class(&pattern[p + 1..], text[t], flags) {
                    Some((true, consumed)) => {
                        p += 1 + consumed;
                        t += 1;
                    }
                    Some((false, _)) => return Outcome::NoMatch,
                    // Unterminated class never matches.
                    None => return Outcome::Abort,
                }
            }
            c => {
                let c = if c == b'\\' && p + 1 < pattern.len() {
                    p += 1;
                    pattern[p]
                } else {
                    c
                };
                if t >= text.len() {
                    return Outcome::Abort;
                }
                if fold(c, flags) != fold(text[t], flags) {
                    return Outcome::NoMatch;
                }
                p += 1;
                t += 1;
            }
        }
    }

    if t == text.len() {
        Outcome::Match
    } else {
        Outcome::NoMatch
    }
}

/// Match one byte against a bracket expression. `class` starts just after
/// the opening `[`. Returns whether it matched and how many pattern bytes
/// (including the closing `]`) were consumed.
fn match_class(class: &[u8], ch: u8, flags: WildmatchFlags) -> Option<(bool, usize)> {
    let mut i = 0;
    let negated = matches!(class.first(), Some(b'!') | Some(b'^'));
    if negated {
        i += 1;
    }
    if flags.contains(WildmatchFlags::PATHNAME) && ch == b'/' {
        let end = class[i..].find_byte(b']')? + i;
        return Some((false, end + 1));
    }

    let ch = fold(ch, flags);
    let mut matched = false;
    let mut first = true;
    loop {
        let c = *class.get(i)?;
        if c == b']' && !first {
            break;
        }
        first = false;
        let lo = if c == b'\\' {
            i += 1;
            *class.get(i)?
        } else {
            c
        };
        if class.get(i + 1) == Some(&b'-') && class.get(i + 2).is_some_and(|&h| h != b']') {
            let hi = class[i + 2];
            if fold(lo, flags) <= ch && ch <= fold(hi, flags) {
                matched = true;
            }
            i += 3;
        } else {
            if fold(lo, flags) == ch {
                matched = true;
            }
            i += 1;
        }
    }
    Some((matched != negated, i + 1))
}

/// Compiled wildmatch pattern for efficient repeated matching.
#[derive(Debug, Clone)]
pub struct WildmatchPattern {
    pattern: BString,
    flags: WildmatchFlags,
}

impl WildmatchPattern {
    /// Create a new pattern.
    pub fn new(pattern: &BStr, flags: WildmatchFlags) -> Self {
        Self {
            pattern: pattern.into(),
            flags,
        }
    }

    /// Match against text. Returns true if the pattern matches.
    pub fn matches(&self, text: &BStr) -> bool {
        wildmatch(self.pattern.as_ref(), text, self.flags)
    }

    pub fn as_bstr(&self) -> &BStr {
        self.pattern.as_ref()
    }
}

/// Match `text` against `pattern`.
pub fn wildmatch(pattern: &BStr, text: &BStr, flags: WildmatchFlags) -> bool {
    do_match(pattern.as_bytes(), text.as_bytes(), flags) == Outcome::Match
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glob(pattern: &str, text: &str) -> bool {
        wildmatch(
            BStr::new(pattern),
            BStr::new(text),
            WildmatchFlags::PATHNAME,
        )
    }

    #[test]
    fn literal() {
        assert!(glob("refs/heads/main", "refs/heads/main"));
        assert!(!glob("refs/heads/main", "refs/heads/mai"));
        assert!(!glob("refs/heads/mai", "refs/heads/main"));
    }

    #[test]
    fn star_stays_in_component() {
        assert!(glob("refs/heads/*", "refs/heads/main"));
        assert!(!glob("refs/heads/*", "refs/heads/feature/x"));
        assert!(glob("refs/*/main", "refs/heads/main"));
    }

    #[test]
    fn star_without_pathname_crosses_slash() {
        assert!(wildmatch(
            BStr::new("refs/*"),
            BStr::new("refs/heads/feature/x"),
            WildmatchFlags::empty(),
        ));
    }

    #[test]
    fn double_star_crosses_components() {
        assert!(glob("refs/**", "refs/heads/feature/x"));
        assert!(glob("refs/**/x", "refs/heads/feature/x"));
    }

    #[test]
    fn question_mark() {
        assert!(glob("refs/tags/v1.?", "refs/tags/v1.2"));
        assert!(!glob("refs/tags/v1.?", "refs/tags/v1.23"));
        assert!(!glob("a?b", "a/b"));
    }

    #[test]
    fn bracket_classes() {
        assert!(glob("v[0-9]", "v7"));
        assert!(!glob("v[0-9]", "vx"));
        assert!(glob("v[!0-9]", "vx"));
        assert!(glob("v[]]", "v]"));
        assert!(!glob("v[abc", "va"));
    }

    #[test]
    fn escaped_metachar() {
        assert!(glob("a\\*b", "a*b"));
        assert!(!glob("a\\*b", "axb"));
    }

    #[test]
    fn casefold() {
        assert!(wildmatch(
            BStr::new("REFS/heads/*"),
            BStr::new("refs/HEADS/Main"),
            WildmatchFlags::CASEFOLD | WildmatchFlags::PATHNAME,
        ));
    }

    #[test]
    fn compiled_pattern() {
        let pat = WildmatchPattern::new(BStr::new("refs/tags/*"), WildmatchFlags::PATHNAME);
        assert!(pat.matches(BStr::new("refs/tags/v1.0")));
        assert!(!pat.matches(BStr::new("refs/heads/v1.0")));
    }

    #[test]
    fn detects_glob_chars() {
        assert!(has_glob_chars(BStr::new("refs/heads/*")));
        assert!(has_glob_chars(BStr::new("v[12]")));
        assert!(!has_glob_chars(BStr::new("refs/heads/main")));
    }
}
