//! Raw date and signature formats as they appear in commit and tag headers.

use bstr::BStr;
use git_utils::date::{GitDate, Signature};
use proptest::prelude::*;

#[test]
fn raw_format_roundtrip() {
    let inputs = [
        "1234567890 +0000",
        "1234567890 -0500",
        "1234567890 +0530",
        "0 +0000",
        "1700000000 +1200",
        "1700000000 -1100",
    ];

    for input in inputs {
        let date = GitDate::parse_raw(input).unwrap();
        assert_eq!(date.to_raw(), input, "format mismatch for input: {input}");
    }
}

#[test]
fn signature_roundtrip() {
    let inputs = [
        "John Doe <john@example.com> 1234567890 +0000",
        "A U Thor <author@example.com> 1112911993 -0700",
    ];

    for input in inputs {
        let sig = Signature::parse(BStr::new(input)).unwrap();
        assert_eq!(sig.to_bytes(), input, "signature mismatch for input: {input}");
    }
}

proptest! {
    #[test]
    fn offsets_survive_formatting(ts in 0i64..4_000_000_000, hours in -12i32..=14, mins in 0i32..60) {
        let minutes = if hours < 0 { hours * 60 - mins } else { hours * 60 + mins };
        let date = GitDate::new(ts, minutes);
        let reparsed = GitDate::parse_raw(&date.to_raw()).unwrap();
        prop_assert_eq!(reparsed, date);
    }
}
