// Timestamp decoding shared by both document shapes.
// Accepted: RFC 3339, "YYYY-MM-DD HH:MM:SS[.f]", "YYYY-MM-DDTHH:MM:SS[.f]", "YYYY-MM-DD", epoch millis.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

enum Decoded {
    Zoned(DateTime<Utc>),
    Naive(NaiveDateTime),
}

fn decode(v: &Value) -> Option<Decoded> {
    match v {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(Decoded::Zoned(dt.with_timezone(&Utc)));
            }
            for fmt in NAIVE_FORMATS {
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                    return Some(Decoded::Naive(naive));
                }
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(Decoded::Naive)
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(Decoded::Zoned),
        _ => None,
    }
}

/// Decode as an instant; naive values are taken as UTC.
pub fn parse_utc(v: &Value) -> Option<DateTime<Utc>> {
    Some(match decode(v)? {
        Decoded::Zoned(dt) => dt,
        Decoded::Naive(naive) => naive.and_utc(),
    })
}

/// Decode as a chart-axis wall clock: zoned values are converted to UTC, naive values kept as written.
pub fn parse_wall_clock(v: &Value) -> Option<NaiveDateTime> {
    Some(match decode(v)? {
        Decoded::Zoned(dt) => dt.naive_utc(),
        Decoded::Naive(naive) => naive,
    })
}
