//! Textual forms of numbers and dates inside record payloads.

use chrono::{DateTime, NaiveDateTime, Utc};

/// RFC-1123 layout, always in GMT: `Thu, 01 Jan 1970 00:00:00 GMT`.
const RFC1123_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Decimal text of a number.
///
/// Non-finite values use `NaN`, `Infinity` and `-Infinity`, and negative
/// zero prints as `0`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

/// Parse the decimal text of a number. Anything unparseable is NaN.
pub fn parse_number(text: &str) -> f64 {
    match text.trim() {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        "" => f64::NAN,
        other => other.parse().unwrap_or(f64::NAN),
    }
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format(RFC1123_FORMAT).to_string()
}

/// Parse an RFC-1123/RFC-2822 date, falling back to RFC-3339.
///
/// Years outside `0000..=9999` are written with a sign (`+10000`, `-0001`),
/// which RFC-2822 rejects; those are read back with the layout they were
/// written in.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    DateTime::parse_from_rfc2822(text)
        .or_else(|_| DateTime::parse_from_rfc3339(text))
        .map(|d| d.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(text, RFC1123_FORMAT).map(|d| d.and_utc()))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(-2.5), "-2.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), 42.0);
        assert_eq!(parse_number(" 0.25 "), 0.25);
        assert_eq!(parse_number("Infinity"), f64::INFINITY);
        assert!(parse_number("twelve").is_nan());
        assert!(parse_number("").is_nan());
    }

    #[test]
    fn test_epoch_is_rfc1123() {
        let epoch = DateTime::from_timestamp(0, 0).unwrap();
        assert_eq!(format_date(&epoch), "Thu, 01 Jan 1970 00:00:00 GMT");
        assert_eq!(parse_date("Thu, 01 Jan 1970 00:00:00 GMT"), Some(epoch));
    }

    #[test]
    fn test_signed_years_roundtrip() {
        for year in [10000, -1, 0, 9999] {
            let date = NaiveDate::from_ymd_opt(year, 6, 1)
                .unwrap()
                .and_hms_opt(12, 30, 5)
                .unwrap()
                .and_utc();
            let text = format_date(&date);
            assert_eq!(parse_date(&text), Some(date), "{text}");
        }
        let far = NaiveDate::from_ymd_opt(10000, 6, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert!(format_date(&far.and_utc()).contains("+10000"));
    }

    #[test]
    fn test_parse_date_fallbacks() {
        let expected = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(parse_date("2023-11-14T22:13:20Z"), Some(expected));
        assert_eq!(parse_date("not a date"), None);
    }
}
