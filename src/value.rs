//! Typed values that can be kept in a string-only store.

use std::fmt;

use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};

use crate::error::CodecError;

/// A regular expression kept as source text plus flag letters.
///
/// Flags use the one-letter spelling of browser regular expressions
/// (`g`, `i`, `m`, `s`, `u`, `y`, ...). The pattern is not compiled until
/// [`to_regex`](Self::to_regex) is called, so decoding a stored pattern never
/// fails on bad syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    source: String,
    flags: String,
}

impl Pattern {
    /// A pattern without flags.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flags: String::new(),
        }
    }

    pub fn with_flags(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flags: flags.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Compile the pattern with the `regex` crate.
    ///
    /// `i`, `m`, `s` and `x` map onto the builder options of the same
    /// meaning. Flags that only affect matching state in a browser (`g`,
    /// `y`, `d`) and the unicode flags (`u`, `v`) are accepted and ignored.
    pub fn to_regex(&self) -> Result<Regex, CodecError> {
        let mut builder = RegexBuilder::new(&self.source);
        for flag in self.flags.chars() {
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'x' => {
                    builder.ignore_whitespace(true);
                }
                _ => {}
            }
        }
        Ok(builder.build()?)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

/// The kind of a [`TypedValue`], used for logging and CLI input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Date,
    Pattern,
    Number,
    Boolean,
    String,
    Structured,
    Unsupported,
    Absent,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Date => "date",
            ValueKind::Pattern => "pattern",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::String => "string",
            ValueKind::Structured => "structured",
            ValueKind::Unsupported => "unsupported",
            ValueKind::Absent => "absent",
        };
        f.write_str(name)
    }
}

/// A value the store knows how to encode.
///
/// # Example
///
/// ```ignore
/// use typed_storage::TypedValue;
///
/// let n = TypedValue::from(42);
/// let s = TypedValue::from("hello");
/// let j = TypedValue::from(serde_json::json!({"a": 1}));
/// assert!(n.is_truthy() && s.is_truthy() && j.is_truthy());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// An instant, persisted at second precision.
    Date(DateTime<Utc>),
    Pattern(Pattern),
    Number(f64),
    Boolean(bool),
    String(String),
    /// Any JSON value, usually an object or an array.
    Structured(serde_json::Value),
    /// Textual form of something without a stored representation, such as a
    /// callback. It is written as a string and reads back as
    /// [`TypedValue::String`].
    Unsupported(String),
    /// Null or undefined.
    Absent,
}

impl TypedValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            TypedValue::Date(_) => ValueKind::Date,
            TypedValue::Pattern(_) => ValueKind::Pattern,
            TypedValue::Number(_) => ValueKind::Number,
            TypedValue::Boolean(_) => ValueKind::Boolean,
            TypedValue::String(_) => ValueKind::String,
            TypedValue::Structured(_) => ValueKind::Structured,
            TypedValue::Unsupported(_) => ValueKind::Unsupported,
            TypedValue::Absent => ValueKind::Absent,
        }
    }

    /// Truthiness as a browser script would see the value.
    ///
    /// `0`, `NaN`, `false`, the empty string and null are falsy, as are the
    /// same primitives when they appear as a bare structured JSON value.
    /// Dates, patterns, objects and arrays are always truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            TypedValue::Date(_) | TypedValue::Pattern(_) => true,
            TypedValue::Number(n) => *n != 0.0 && !n.is_nan(),
            TypedValue::Boolean(b) => *b,
            TypedValue::String(s) | TypedValue::Unsupported(s) => !s.is_empty(),
            TypedValue::Structured(json) => json_is_truthy(json),
            TypedValue::Absent => false,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            TypedValue::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_pattern(&self) -> Option<&Pattern> {
        match self {
            TypedValue::Pattern(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            TypedValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            TypedValue::Structured(json) => Some(json),
            _ => None,
        }
    }

    /// Map a JSON value onto the kind it would be stored as.
    ///
    /// Primitives become their own kinds and null becomes
    /// [`TypedValue::Absent`]; objects and arrays stay structured.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => TypedValue::Absent,
            serde_json::Value::Bool(b) => TypedValue::Boolean(b),
            serde_json::Value::Number(n) => TypedValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => TypedValue::String(s),
            other => TypedValue::Structured(other),
        }
    }

    /// The JSON form used when reading a value back through serde.
    pub(crate) fn into_json(self) -> serde_json::Value {
        match self {
            TypedValue::Date(d) => serde_json::Value::String(d.to_rfc3339()),
            TypedValue::Pattern(p) => serde_json::Value::String(p.source),
            TypedValue::Number(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            TypedValue::Boolean(b) => serde_json::Value::Bool(b),
            TypedValue::String(s) | TypedValue::Unsupported(s) => serde_json::Value::String(s),
            TypedValue::Structured(json) => json,
            TypedValue::Absent => serde_json::Value::Null,
        }
    }
}

fn json_is_truthy(json: &serde_json::Value) -> bool {
    match json {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Date(d) => write!(f, "{}", d.to_rfc3339()),
            TypedValue::Pattern(p) => write!(f, "{}", p),
            TypedValue::Number(n) => f.write_str(&crate::codec::format_number(*n)),
            TypedValue::Boolean(b) => write!(f, "{}", b),
            TypedValue::String(s) | TypedValue::Unsupported(s) => f.write_str(s),
            TypedValue::Structured(json) => write!(f, "{}", json),
            TypedValue::Absent => f.write_str("null"),
        }
    }
}

impl From<DateTime<Utc>> for TypedValue {
    fn from(d: DateTime<Utc>) -> Self {
        TypedValue::Date(d)
    }
}

impl From<Pattern> for TypedValue {
    fn from(p: Pattern) -> Self {
        TypedValue::Pattern(p)
    }
}

impl From<Regex> for TypedValue {
    fn from(r: Regex) -> Self {
        TypedValue::Pattern(Pattern::new(r.as_str()))
    }
}

impl From<f64> for TypedValue {
    fn from(n: f64) -> Self {
        TypedValue::Number(n)
    }
}

impl From<i32> for TypedValue {
    fn from(n: i32) -> Self {
        TypedValue::Number(f64::from(n))
    }
}

impl From<u32> for TypedValue {
    fn from(n: u32) -> Self {
        TypedValue::Number(f64::from(n))
    }
}

impl From<bool> for TypedValue {
    fn from(b: bool) -> Self {
        TypedValue::Boolean(b)
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::String(s.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        TypedValue::String(s)
    }
}

/// Same mapping as [`TypedValue::from_json`]: only arrays and objects become
/// [`TypedValue::Structured`].
impl From<serde_json::Value> for TypedValue {
    fn from(json: serde_json::Value) -> Self {
        TypedValue::from_json(json)
    }
}

impl<T: Into<TypedValue>> From<Option<T>> for TypedValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(TypedValue::Absent, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_falsy_values() {
        assert!(!TypedValue::Number(0.0).is_truthy());
        assert!(!TypedValue::Number(-0.0).is_truthy());
        assert!(!TypedValue::Number(f64::NAN).is_truthy());
        assert!(!TypedValue::Boolean(false).is_truthy());
        assert!(!TypedValue::from("").is_truthy());
        assert!(!TypedValue::Absent.is_truthy());
        assert!(!TypedValue::Structured(json!(null)).is_truthy());
        assert!(!TypedValue::Structured(json!(0)).is_truthy());
    }

    #[test]
    fn test_truthy_values() {
        assert!(TypedValue::Number(f64::INFINITY).is_truthy());
        assert!(TypedValue::from("0").is_truthy());
        assert!(TypedValue::Structured(json!({})).is_truthy());
        assert!(TypedValue::Structured(json!([])).is_truthy());
        assert!(TypedValue::Pattern(Pattern::new("")).is_truthy());
        assert!(TypedValue::Date(DateTime::from_timestamp(0, 0).unwrap()).is_truthy());
    }

    #[test]
    fn test_from_json_maps_primitives() {
        assert_eq!(TypedValue::from_json(json!(null)), TypedValue::Absent);
        assert_eq!(TypedValue::from_json(json!(true)), TypedValue::Boolean(true));
        assert_eq!(TypedValue::from_json(json!(2.5)), TypedValue::Number(2.5));
        assert_eq!(TypedValue::from_json(json!("x")), TypedValue::from("x"));
        assert_eq!(
            TypedValue::from_json(json!([1, 2])),
            TypedValue::Structured(json!([1, 2]))
        );
    }

    #[test]
    fn test_json_conversion_keeps_primitives() {
        assert_eq!(TypedValue::from(json!(5)), TypedValue::Number(5.0));
        assert_eq!(TypedValue::from(json!("x")), TypedValue::from("x"));
        assert_eq!(TypedValue::from(json!(null)), TypedValue::Absent);
        assert_eq!(
            TypedValue::from(json!({"a": 1})),
            TypedValue::Structured(json!({"a": 1}))
        );
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(TypedValue::from(None::<i32>), TypedValue::Absent);
        assert_eq!(TypedValue::from(Some(3)), TypedValue::Number(3.0));
    }

    #[test]
    fn test_pattern_flags_compile() {
        let re = Pattern::with_flags("^hello$", "im").to_regex().unwrap();
        assert!(re.is_match("HELLO"));
        assert!(re.is_match("first\nhello\nlast"));

        let plain = Pattern::new("^hello$").to_regex().unwrap();
        assert!(!plain.is_match("HELLO"));
    }

    #[test]
    fn test_invalid_pattern_fails_only_on_compile() {
        let pattern = Pattern::new("(unclosed");
        assert_eq!(pattern.source(), "(unclosed");
        assert!(matches!(pattern.to_regex(), Err(CodecError::InvalidPattern(_))));
    }
}
