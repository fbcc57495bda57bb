//! Lenient field coercion at the record boundary
//!
//! Snapshots come from wherever the caller got them. These helpers turn
//! loosely-typed JSON into the canonical model types and never fail on a
//! bad value: unreadable text, numbers or dates become `None`/defaults, and
//! the calculations downstream treat those as zero or "no date".

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserializer;
use std::fmt;

/// Date-time layouts accepted besides RFC 3339
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp in any of the accepted layouts
///
/// Offsets are normalised to UTC wall-clock time. A bare date means
/// midnight at the start of that day.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    parse_date(s).map(|d| d.and_time(NaiveTime::MIN))
}

/// Parse a calendar date, taking the date part of a full timestamp if given
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if s.len() > 10 && s.is_char_boundary(10) {
        if let Ok(d) = NaiveDate::parse_from_str(&s[..10], "%Y-%m-%d") {
            return Some(d);
        }
    }
    None
}

/// Scalar JSON value collapsed to text, or `None` for null/containers
enum Scalar {
    Text(String),
    Bool(bool),
    Nothing,
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Scalar;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "any value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Scalar, E> {
        Ok(Scalar::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
        Ok(Scalar::Text(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
        Ok(Scalar::Text(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
        Ok(Scalar::Text(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
        Ok(Scalar::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> {
        Ok(Scalar::Text(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Scalar, E> {
        Ok(Scalar::Nothing)
    }

    fn visit_none<E: de::Error>(self) -> Result<Scalar, E> {
        Ok(Scalar::Nothing)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Scalar, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Scalar, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Scalar::Nothing)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Scalar, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Scalar::Nothing)
    }
}

fn scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Scalar, D::Error> {
    deserializer.deserialize_any(ScalarVisitor)
}

/// Any scalar as trimmed text; empty strings, null and containers become `None`
pub fn opt_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match scalar(deserializer)? {
        Scalar::Text(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Scalar::Bool(b) => Some(b.to_string()),
        Scalar::Nothing => None,
    })
}

/// Any scalar as text, empty when absent
pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(opt_string(deserializer)?.unwrap_or_default())
}

/// A timestamp in any accepted layout; anything unreadable is `None`
pub fn opt_datetime<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error> {
    Ok(opt_string(deserializer)?.and_then(|s| parse_datetime(&s)))
}

/// A calendar date; anything unreadable is `None`
pub fn opt_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    Ok(opt_string(deserializer)?.and_then(|s| parse_date(&s)))
}

/// A yes/no flag; anything that is not clearly false counts as true
pub fn opt_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(match scalar(deserializer)? {
        Scalar::Bool(b) => Some(b),
        Scalar::Text(s) => Some(!matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "false" | "0" | "no" | "off"
        )),
        Scalar::Nothing => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_datetime_layouts() {
        let plain = parse_datetime("2025-01-15").unwrap();
        assert_eq!(plain.date(), NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(plain.hour(), 0);

        let local = parse_datetime("2025-01-15T14:30:00").unwrap();
        assert_eq!(local.hour(), 14);

        let millis = parse_datetime("2025-01-15T14:30:00.250").unwrap();
        assert_eq!(millis.nanosecond(), 250_000_000);

        let zoned = parse_datetime("2025-01-15T23:30:00-02:00").unwrap();
        assert_eq!(zoned.date(), NaiveDate::from_ymd_opt(2025, 1, 16).unwrap());
        assert_eq!(zoned.hour(), 1);

        let zulu = parse_datetime("2025-01-15T10:00:00.000Z").unwrap();
        assert_eq!(zulu.hour(), 10);
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert!(parse_datetime("").is_none());
        assert!(parse_datetime("yesterday").is_none());
        assert!(parse_datetime("2025-13-45").is_none());
    }

    #[test]
    fn test_parse_date_takes_date_part() {
        assert_eq!(
            parse_date("2025-03-31T12:00:00Z"),
            NaiveDate::from_ymd_opt(2025, 3, 31)
        );
        assert_eq!(parse_date("nope"), None);
    }
}
