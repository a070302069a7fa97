//! Lenient timestamp decoding.
//!
//! The records API emits local date-times (`2024-09-01T08:30:00`) from some
//! endpoints and offset date-times (`2024-09-01T08:30:00Z`,
//! `2024-09-01T08:30:00+02:00`) from others. Both decode to a naive UTC
//! value; an empty string or `null` decodes to `None`.

use chrono::{DateTime, NaiveDateTime};
use serde::{de, Deserialize, Deserializer};

pub(crate) fn parse(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    raw.parse::<NaiveDateTime>().ok()
}

pub(crate) fn lenient<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}"))),
    }
}
