//! Record tags and header layout.

use std::fmt;
use std::str::FromStr;

/// Length of every tag in characters.
pub const TAG_LEN: usize = 8;

/// Tag plus the separator; the payload starts at this offset.
pub const HEADER_LEN: usize = TAG_LEN + 1;

/// Records shorter than this carry no value.
pub const MIN_RECORD_LEN: usize = HEADER_LEN + 1;

/// Separator written between tag and payload.
pub const SEPARATOR: char = '|';

/// Discriminator at the start of every encoded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Date,
    Pattern,
    /// Pattern whose payload also carries flags: `flags|source`.
    FlaggedPattern,
    Number,
    Boolean,
    String,
    Structured,
    Absent,
}

impl Tag {
    pub const ALL: [Tag; 8] = [
        Tag::Date,
        Tag::Pattern,
        Tag::FlaggedPattern,
        Tag::Number,
        Tag::Boolean,
        Tag::String,
        Tag::Structured,
        Tag::Absent,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Tag::Date => "__date__",
            Tag::Pattern => "__expr__",
            Tag::FlaggedPattern => "__exfl__",
            Tag::Number => "__numb__",
            Tag::Boolean => "__bool__",
            Tag::String => "__strn__",
            Tag::Structured => "__objt__",
            Tag::Absent => "__none__",
        }
    }

    /// Build a full record from this tag and a payload.
    pub fn record(self, payload: &str) -> String {
        let mut record = String::with_capacity(HEADER_LEN + payload.len());
        record.push_str(self.as_str());
        record.push(SEPARATOR);
        record.push_str(payload);
        record
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a prefix is not a known tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag(pub String);

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown record tag '{}'", self.0)
    }
}

impl std::error::Error for UnknownTag {}

impl FromStr for Tag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}
