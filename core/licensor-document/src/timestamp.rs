//! RFC 3339 timestamps with a byte-stable text form.
//!
//! Millisecond-precision values are written with exactly three fractional
//! digits (`2025-01-02T03:04:05.000Z`), which is what JavaScript's
//! `Date.toISOString` emits. Anything finer falls back to the shortest
//! exact fractional form so parsing always returns the same instant.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

use crate::DocumentError;

/// A UTC instant as carried in entitlement documents.
pub type Timestamp = DateTime<Utc>;

const NANOS_PER_MILLI: u32 = 1_000_000;

/// Last year RFC 3339 can carry. Later instants format with a sign and a
/// fifth year digit that no parser accepts.
pub const MAX_YEAR: i32 = 9999;

/// Returns the current time truncated to whole milliseconds.
#[must_use]
pub fn now_millis() -> Timestamp {
    Utc::now().trunc_subsecs(3)
}

/// Formats a timestamp in its canonical document form.
#[must_use]
pub fn format_timestamp(ts: &Timestamp) -> String {
    let precision = if ts.timestamp_subsec_nanos() % NANOS_PER_MILLI == 0 {
        SecondsFormat::Millis
    } else {
        SecondsFormat::AutoSi
    };
    ts.to_rfc3339_opts(precision, true)
}

/// Parses an RFC 3339 timestamp, normalizing any offset to UTC.
pub fn parse_timestamp(s: &str) -> Result<Timestamp, DocumentError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DocumentError::InvalidTimestamp(format!("{s:?}: {e}")))
}

/// Serde adapter for `#[serde(with = "...")]` on timestamp fields.
pub(crate) mod iso8601 {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::{format_timestamp, parse_timestamp, Timestamp};

    pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_timestamp(&s).map_err(de::Error::custom)
    }
}
