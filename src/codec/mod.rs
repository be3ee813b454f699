//! Tagged string records.
//!
//! Every value is written as `TAG|PAYLOAD`, where the tag is one of the
//! fixed-width discriminators in [`Tag`] and the payload is the value's
//! textual form. Decoding is total except for structured payloads, whose JSON
//! errors are returned to the caller.
//!
//! | Value | Record |
//! |---|---|
//! | date | `__date__\|Thu, 01 Jan 1970 00:00:00 GMT` |
//! | pattern | `__expr__\|^a+$` or `__exfl__\|gi\|^a+$` |
//! | number | `__numb__\|3.5` |
//! | boolean | `__bool__\|1` |
//! | string | `__strn__\|hello` |
//! | structured | `__objt__\|{"a":1}` |
//! | absent | `__none__\|` |

mod tag;
mod text;

pub use tag::{HEADER_LEN, MIN_RECORD_LEN, SEPARATOR, TAG_LEN, Tag, UnknownTag};
pub use text::{format_date, format_number, parse_date, parse_number};

use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::logging::{trace, warn};
use crate::value::{Pattern, TypedValue};

/// Encode a value into a record.
pub fn encode(value: &TypedValue, config: &CodecConfig) -> Result<String, CodecError> {
    let record = match value {
        TypedValue::Date(date) => Tag::Date.record(&format_date(date)),
        TypedValue::Pattern(pattern) => {
            if config.persist_pattern_flags && !pattern.flags().is_empty() {
                let payload = format!("{}{}{}", pattern.flags(), SEPARATOR, pattern.source());
                Tag::FlaggedPattern.record(&payload)
            } else {
                Tag::Pattern.record(pattern.source())
            }
        }
        TypedValue::Number(n) => Tag::Number.record(&format_number(*n)),
        TypedValue::Boolean(b) => Tag::Boolean.record(if *b { "1" } else { "0" }),
        TypedValue::String(s) | TypedValue::Unsupported(s) => Tag::String.record(s),
        TypedValue::Structured(json) => {
            let payload = serde_json::to_string(json).map_err(CodecError::Serialize)?;
            Tag::Structured.record(&payload)
        }
        TypedValue::Absent => Tag::Absent.record(""),
    };
    trace!(kind = %value.kind(), len = record.len(), "encoded record");
    Ok(record)
}

/// Decode a record.
///
/// Returns `Ok(None)` when the record carries no value: it is shorter than
/// [`MIN_RECORD_LEN`] characters or its date payload does not parse. A record
/// whose prefix is not a known tag decodes to the whole record as a string.
pub fn decode(record: &str) -> Result<Option<TypedValue>, CodecError> {
    if record.chars().count() < MIN_RECORD_LEN {
        trace!(len = record.len(), "record shorter than header");
        return Ok(None);
    }

    let (Some(prefix), Some(payload)) = (record.get(..TAG_LEN), record.get(HEADER_LEN..)) else {
        return Ok(Some(TypedValue::String(record.to_string())));
    };

    let Ok(tag) = prefix.parse::<Tag>() else {
        trace!(prefix = prefix, "unrecognized tag, returning raw record");
        return Ok(Some(TypedValue::String(record.to_string())));
    };

    decode_payload(tag, payload)
}

/// Decode a record without the short-record rule.
///
/// A record that is exactly a known header (`__strn__|`, `__numb__|`, ...)
/// reads as that kind's empty value: `""`, NaN, `false` or an empty pattern.
/// Bare `__none__|`, `__date__|` and `__objt__|` headers still carry no
/// value. Every other record decodes as in [`decode`].
pub fn decode_strict(record: &str) -> Result<Option<TypedValue>, CodecError> {
    if record.chars().count() == HEADER_LEN {
        if let Some(tag) = record.get(..TAG_LEN).and_then(|p| p.parse::<Tag>().ok()) {
            return match tag {
                Tag::Absent | Tag::Structured => Ok(None),
                _ => decode_payload(tag, ""),
            };
        }
    }
    decode(record)
}

fn decode_payload(tag: Tag, payload: &str) -> Result<Option<TypedValue>, CodecError> {
    let value = match tag {
        Tag::Date => {
            let date = parse_date(payload);
            if date.is_none() {
                warn!(payload = payload, "unparseable date payload");
            }
            date.map(TypedValue::Date)
        }
        Tag::Pattern => Some(TypedValue::Pattern(Pattern::new(payload))),
        Tag::FlaggedPattern => {
            let pattern = match payload.split_once(SEPARATOR) {
                Some((flags, source)) => Pattern::with_flags(source, flags),
                None => Pattern::new(payload),
            };
            Some(TypedValue::Pattern(pattern))
        }
        Tag::Number => Some(TypedValue::Number(parse_number(payload))),
        Tag::Boolean => Some(TypedValue::Boolean(payload == "1")),
        Tag::String => Some(TypedValue::String(payload.to_string())),
        Tag::Structured => {
            let json: serde_json::Value =
                serde_json::from_str(payload).map_err(CodecError::MalformedPayload)?;
            Some(TypedValue::Structured(json))
        }
        // Only reachable with trailing text after the header.
        Tag::Absent => Some(TypedValue::Absent),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use serde_json::json;

    fn enc(value: impl Into<TypedValue>) -> String {
        encode(&value.into(), &CodecConfig::default()).unwrap()
    }

    #[test]
    fn test_encode_each_kind() {
        let epoch = DateTime::from_timestamp(0, 0).unwrap();
        assert_eq!(enc(epoch), "__date__|Thu, 01 Jan 1970 00:00:00 GMT");
        assert_eq!(enc(Pattern::new("^a+$")), "__expr__|^a+$");
        assert_eq!(enc(Pattern::with_flags("^a+$", "gi")), "__exfl__|gi|^a+$");
        assert_eq!(enc(3.5), "__numb__|3.5");
        assert_eq!(enc(true), "__bool__|1");
        assert_eq!(enc(false), "__bool__|0");
        assert_eq!(enc("hello"), "__strn__|hello");
        assert_eq!(enc(json!({"a": 1})), "__objt__|{\"a\":1}");
        assert_eq!(enc(TypedValue::Absent), "__none__|");
    }

    #[test]
    fn test_unsupported_degrades_to_string() {
        let source = "function () { return 1; }";
        let record = enc(TypedValue::Unsupported(source.to_string()));
        assert_eq!(record, format!("__strn__|{source}"));
        assert_eq!(decode(&record).unwrap(), Some(TypedValue::from(source)));
    }

    #[test]
    fn test_flags_dropped_when_not_persisted() {
        let config = CodecConfig {
            persist_pattern_flags: false,
            ..CodecConfig::default()
        };
        let record = encode(&Pattern::with_flags("x", "i").into(), &config).unwrap();
        assert_eq!(record, "__expr__|x");
        assert_eq!(
            decode(&record).unwrap(),
            Some(TypedValue::Pattern(Pattern::new("x")))
        );
    }

    #[test]
    fn test_flagged_pattern_keeps_separator_in_source() {
        let decoded = decode("__exfl__|m|a|b").unwrap();
        assert_eq!(
            decoded,
            Some(TypedValue::Pattern(Pattern::with_flags("a|b", "m")))
        );
    }

    #[test]
    fn test_short_records_carry_no_value() {
        assert_eq!(decode("").unwrap(), None);
        assert_eq!(decode("__bool__|").unwrap(), None);
        assert_eq!(decode("__none__|").unwrap(), None);
        assert_eq!(decode("undefined").unwrap(), None);
    }

    #[test]
    fn test_unrecognized_tag_returns_raw_record() {
        let raw = "plain text value";
        assert_eq!(decode(raw).unwrap(), Some(TypedValue::from(raw)));
    }

    #[test]
    fn test_non_ascii_prefix_returns_raw_record() {
        let raw = "ééééééééééé";
        assert_eq!(decode(raw).unwrap(), Some(TypedValue::from(raw)));
    }

    #[test]
    fn test_boolean_payload_must_be_one() {
        assert_eq!(decode("__bool__|1").unwrap(), Some(TypedValue::Boolean(true)));
        assert_eq!(decode("__bool__|0").unwrap(), Some(TypedValue::Boolean(false)));
        assert_eq!(decode("__bool__|yes").unwrap(), Some(TypedValue::Boolean(false)));
    }

    #[test]
    fn test_separator_is_not_checked() {
        assert_eq!(decode("__strn__:abc").unwrap(), Some(TypedValue::from("abc")));
    }

    #[test]
    fn test_garbage_number_is_nan() {
        let value = decode("__numb__|abc").unwrap().unwrap();
        assert!(value.as_number().unwrap().is_nan());
    }

    #[test]
    fn test_garbage_date_is_no_value() {
        assert_eq!(decode("__date__|yesterday").unwrap(), None);
    }

    #[test]
    fn test_malformed_structured_payload() {
        let err = decode("__objt__|{\"a\":").unwrap_err();
        assert!(matches!(err, CodecError::MalformedPayload(_)));
    }

    #[test]
    fn test_strict_decode_reads_bare_headers() {
        assert_eq!(decode_strict("__strn__|").unwrap(), Some(TypedValue::from("")));
        assert_eq!(decode_strict("__bool__|").unwrap(), Some(TypedValue::Boolean(false)));
        assert_eq!(
            decode_strict("__expr__|").unwrap(),
            Some(TypedValue::Pattern(Pattern::new("")))
        );
        assert!(decode_strict("__numb__|").unwrap().unwrap().as_number().unwrap().is_nan());

        assert_eq!(decode_strict("__none__|").unwrap(), None);
        assert_eq!(decode_strict("__objt__|").unwrap(), None);
        assert_eq!(decode_strict("__date__|").unwrap(), None);
        assert_eq!(decode_strict("short").unwrap(), None);
        assert_eq!(decode_strict("__strn__|x").unwrap(), Some(TypedValue::from("x")));
    }

    #[test]
    fn test_length_counts_chars_not_utf16_units() {
        // Five emoji: 5 chars, 20 bytes, 10 UTF-16 units.
        let emoji = "\u{1F600}".repeat(5);
        assert_eq!(emoji.chars().count(), 5);
        assert_eq!(decode(&emoji).unwrap(), None);

        let ten = "\u{1F600}".repeat(10);
        assert_eq!(decode(&ten).unwrap(), Some(TypedValue::String(ten.clone())));
    }
}
