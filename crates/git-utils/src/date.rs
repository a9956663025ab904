use bstr::{BStr, BString, ByteSlice, ByteVec};
use chrono::{DateTime, FixedOffset, Local};

use crate::error::UtilError;
use crate::Result;

/// A point in time as git records it: seconds since the epoch plus the
/// author's timezone offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GitDate {
    /// Seconds since Unix epoch.
    pub timestamp: i64,
    /// Timezone offset in minutes from UTC (e.g., -300 for EST).
    pub tz_offset: i32,
}

/// Git stores offsets as signed decimal `HHMM` (`-0130` is -130).
fn hhmm_to_minutes(tz: i32) -> i32 {
    let sign = if tz < 0 { -1 } else { 1 };
    let abs = tz.unsigned_abs() as i32;
    sign * ((abs / 100) * 60 + abs % 100)
}

fn minutes_to_hhmm(minutes: i32) -> i32 {
    let sign = if minutes < 0 { -1 } else { 1 };
    let abs = minutes.unsigned_abs() as i32;
    sign * ((abs / 60) * 100 + abs % 60)
}

impl GitDate {
    /// Create a GitDate from a Unix timestamp and timezone offset in minutes.
    pub fn new(timestamp: i64, tz_offset_minutes: i32) -> Self {
        Self {
            timestamp,
            tz_offset: tz_offset_minutes,
        }
    }

    /// The current time in the local timezone.
    pub fn now() -> Self {
        let now = Local::now();
        Self {
            timestamp: now.timestamp(),
            tz_offset: now.offset().local_minus_utc() / 60,
        }
    }

    /// Parse raw git format: `"<timestamp> <+/-HHMM>"` or just `"<timestamp>"`.
    pub fn parse_raw(input: &str) -> Result<Self> {
        let input = input.trim();
        let (ts, tz) = match input.split_once(' ') {
            Some((ts, tz)) => (ts, Some(tz.trim())),
            None => (input, None),
        };

        let timestamp: i64 = ts
            .parse()
            .map_err(|_| UtilError::DateParse(format!("invalid timestamp: '{ts}'")))?;

        let tz_offset = match tz {
            Some(tz) => {
                let raw: i32 = tz
                    .parse()
                    .map_err(|_| UtilError::DateParse(format!("invalid timezone: '{tz}'")))?;
                hhmm_to_minutes(raw)
            }
            None => 0,
        };

        Ok(Self {
            timestamp,
            tz_offset,
        })
    }

    /// Format as git's raw form: `"1234567890 +0000"`.
    pub fn to_raw(&self) -> String {
        format!("{} {:+05}", self.timestamp, minutes_to_hhmm(self.tz_offset))
    }

    /// Convert to a chrono DateTime with the stored timezone.
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(self.tz_offset * 60)?;
        DateTime::from_timestamp(self.timestamp, 0).map(|dt| dt.with_timezone(&offset))
    }
}

/// Author, committer, tagger or reflog identity with timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: BString,
    pub email: BString,
    pub date: GitDate,
}

impl Signature {
    /// Build a signature stamped with the current time.
    pub fn now(name: impl Into<BString>, email: impl Into<BString>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            date: GitDate::now(),
        }
    }

    /// Parse from git format: `Name <email> timestamp tz`
    ///
    /// Example: "John Doe <john@example.com> 1234567890 +0000"
    pub fn parse(input: &BStr) -> Result<Self> {
        let input = input.as_bytes();

        // The last '>' closes the email; names may contain '<' or '>'.
        let gt_pos = input
            .rfind_byte(b'>')
            .ok_or_else(|| UtilError::Signature("missing '>'".into()))?;
        let lt_pos = input[..gt_pos]
            .rfind_byte(b'<')
            .ok_or_else(|| UtilError::Signature("missing '<'".into()))?;

        let name = input[..lt_pos].trim();
        let email = &input[lt_pos + 1..gt_pos];
        let date_str = std::str::from_utf8(input[gt_pos + 1..].trim())
            .map_err(|_| UtilError::Signature("non-UTF-8 date".into()))?;

        Ok(Self {
            name: BString::from(name),
            email: BString::from(email),
            date: GitDate::parse_raw(date_str)?,
        })
    }

    /// Format in git's canonical format: `Name <email> timestamp tz`
    pub fn to_bytes(&self) -> BString {
        let mut out = BString::new(Vec::with_capacity(64));
        out.push_str(&self.name);
        out.push_str(b" <");
        out.push_str(&self.email);
        out.push_str(b"> ");
        out.push_str(self.date.to_raw().as_bytes());
        out
    }
}
