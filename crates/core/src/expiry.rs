//! Expiry-timestamp canonicalization.
//!
//! Mobile clients have historically written the listing expiry in several
//! shapes: an RFC 3339 string, an epoch-seconds or epoch-milliseconds
//! number, or the document-store timestamp wrapper object
//! (`{"seconds": …, "nanoseconds": …}`, sometimes spelled with leading
//! underscores). [`resolve`] maps any of them to a canonical UTC instant.
//! Unrecognized shapes yield `None` so callers can skip and log instead of
//! failing the sweep.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::types::Timestamp;

/// Epoch values at or above this are interpreted as milliseconds.
const EPOCH_MILLIS_CUTOFF: i64 = 100_000_000_000;

/// Canonicalize a stored expiry value into a UTC instant.
pub fn resolve(value: &Value) -> Option<Timestamp> {
    match value {
        Value::String(s) => parse_string(s),
        Value::Number(n) => {
            let raw = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            from_epoch(raw)
        }
        Value::Object(map) => {
            let seconds = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))?
                .as_i64()?;
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_i64)
                .unwrap_or(0)
                .clamp(0, 999_999_999) as u32;
            Utc.timestamp_opt(seconds, nanos).single()
        }
        _ => None,
    }
}

fn parse_string(s: &str) -> Option<Timestamp> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| s.parse::<DateTime<Utc>>().ok())
}

fn from_epoch(raw: i64) -> Option<Timestamp> {
    if raw >= EPOCH_MILLIS_CUTOFF {
        Utc.timestamp_millis_opt(raw).single()
    } else {
        Utc.timestamp_opt(raw, 0).single()
    }
}
