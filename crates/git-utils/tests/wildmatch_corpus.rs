//! Wildmatch vectors covering the pattern shapes reference listing relies on.

use bstr::BStr;
use git_utils::wildmatch::{wildmatch, WildmatchFlags};

fn wm(pattern: &[u8], text: &[u8], flags: WildmatchFlags) {
    assert!(
        wildmatch(BStr::new(pattern), BStr::new(text), flags),
        "expected match: pattern={:?}, text={:?}, flags={:?}",
        String::from_utf8_lossy(pattern),
        String::from_utf8_lossy(text),
        flags,
    );
}

fn wn(pattern: &[u8], text: &[u8], flags: WildmatchFlags) {
    assert!(
        !wildmatch(BStr::new(pattern), BStr::new(text), flags),
        "expected no match: pattern={:?}, text={:?}, flags={:?}",
        String::from_utf8_lossy(pattern),
        String::from_utf8_lossy(text),
        flags,
    );
}

const NONE: WildmatchFlags = WildmatchFlags::empty();
const PATHNAME: WildmatchFlags = WildmatchFlags::PATHNAME;

#[test]
fn corpus_literal() {
    wm(b"foo", b"foo", NONE);
    wn(b"foo", b"bar", NONE);
    wm(b"", b"", NONE);
    wn(b"", b"a", NONE);
}

#[test]
fn corpus_star() {
    wm(b"*", b"foo", NONE);
    wm(b"*", b"", NONE);
    wm(b"f*", b"foo", NONE);
    wm(b"*o", b"foo", NONE);
    wm(b"f*o", b"foo", NONE);
    wm(b"f*o", b"fo", NONE);
    wn(b"f*o", b"f", NONE);
    wm(b"*/*", b"a/b", PATHNAME);
    wn(b"*", b"a/b", PATHNAME);
}

#[test]
fn corpus_question() {
    wm(b"?", b"a", NONE);
    wn(b"?", b"", NONE);
    wm(b"??", b"ab", NONE);
    wn(b"??", b"a", NONE);
    wm(b"?", b"/", NONE);
    wn(b"?", b"/", PATHNAME);
}

#[test]
fn corpus_brackets() {
    wm(b"[abc]", b"b", NONE);
    wn(b"[abc]", b"d", NONE);
    wm(b"[a-c]", b"b", NONE);
    wm(b"[!a-c]", b"d", NONE);
    wm(b"[^a-c]", b"d", NONE);
    wm(b"[a-]", b"-", NONE);
    wn(b"[/]", b"/", PATHNAME);
}

#[test]
fn corpus_double_star() {
    wm(b"**", b"a/b/c", PATHNAME);
    wm(b"a/**/c", b"a/b/c", PATHNAME);
    wm(b"a/**", b"a/b/c", PATHNAME);
    wn(b"a/*", b"a/b/c", PATHNAME);
}

#[test]
fn ref_globs() {
    wm(b"refs/heads/*", b"refs/heads/main", PATHNAME);
    wm(b"refs/heads/feature-*", b"refs/heads/feature-x", PATHNAME);
    wn(b"refs/heads/feature-*", b"refs/heads/fix-x", PATHNAME);
    wm(b"refs/tags/v[0-9].*", b"refs/tags/v1.0", PATHNAME);
    wn(b"refs/tags/*", b"refs/heads/main", PATHNAME);
}
