// Timestamp parsing and display-zone formatting
use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized timestamp: {0:?}")]
pub struct TimestampError(pub String);

/// Parse an ISO-8601-like timestamp. Strings without a zone offset are UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TimestampError(raw.to_string()))
}

/// Serde adapter for zone-less upstream timestamps.
pub fn deserialize_utc<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

/// Renders instants in the configured display timezone.
#[derive(Debug, Clone, Copy)]
pub struct DisplayClock {
    timezone: Tz,
}

impl DisplayClock {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Full date and time, e.g. "31/12/2023, 19:00:00".
    pub fn format(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.timezone)
            .format("%d/%m/%Y, %H:%M:%S")
            .to_string()
    }

    /// Time of day only, used for chart axis labels.
    pub fn time_label(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.timezone)
            .format("%H:%M:%S")
            .to_string()
    }
}
