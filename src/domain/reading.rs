// Reading domain model
use crate::domain::timestamp::deserialize_utc;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Identifier assigned by the ingestion API. Usually numeric, but kept opaque.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(untagged)]
pub enum ReadingId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ReadingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingId::Number(n) => write!(f, "{}", n),
            ReadingId::Text(s) => f.write_str(s),
        }
    }
}

/// A single telemetry sample as pushed by the sensor API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reading {
    pub id: ReadingId,
    #[serde(deserialize_with = "deserialize_utc")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "turbidez_porcentaje")]
    pub turbidity_percent: f64,
    pub tds_ppm: f64,
}

#[derive(Debug, Error)]
#[error("malformed reading: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

impl Reading {
    /// Decode one inbound stream message.
    pub fn from_json(text: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
pub(crate) fn sample(id: i64, turbidity_percent: f64, tds_ppm: f64) -> Reading {
    Reading {
        id: ReadingId::Number(id),
        timestamp: DateTime::from_timestamp(1_704_067_200 + id * 60, 0).unwrap(),
        turbidity_percent,
        tds_ppm,
    }
}
