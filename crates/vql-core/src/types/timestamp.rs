use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

///
/// Timestamp
/// (in microseconds since the unix epoch, UTC)
///
/// Restricted to years 1..=9999 so the canonical RFC 3339 text always
/// parses back to the same value.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const EPOCH: Self = Self(0);

    /// Construct from microseconds, rejecting values outside years 1..=9999.
    #[must_use]
    pub fn from_micros(micros: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp_micros(micros)
            .filter(|dt| (1..=9999).contains(&dt.year()))
            .map(|_| Self(micros))
    }

    /// Construct from milliseconds.
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        millis.checked_mul(1_000).and_then(Self::from_micros)
    }

    /// Construct from whole seconds.
    #[must_use]
    pub fn from_seconds(secs: i64) -> Option<Self> {
        secs.checked_mul(1_000_000).and_then(Self::from_micros)
    }

    #[must_use]
    pub const fn as_micros(self) -> i64 {
        self.0
    }

    /// Parse an RFC 3339 datetime or a bare `YYYY-MM-DD` date (midnight UTC).
    ///
    /// Sub-microsecond precision is rejected rather than truncated.
    pub fn parse(s: &str) -> Result<Self, TimestampParseError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            if dt.timestamp_subsec_nanos() % 1_000 != 0 {
                return Err(TimestampParseError::SubMicrosecond);
            }

            return Self::from_micros(dt.timestamp_micros())
                .ok_or(TimestampParseError::OutOfRange);
        }

        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| TimestampParseError::Format(s.to_string()))?;
        let micros = date
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc().timestamp_micros())
            .ok_or(TimestampParseError::OutOfRange)?;

        Self::from_micros(micros).ok_or(TimestampParseError::OutOfRange)
    }

    fn to_datetime(self) -> DateTime<Utc> {
        // constructors only admit renderable values
        DateTime::<Utc>::from_timestamp_micros(self.0).unwrap_or_default()
    }
}

///
/// TimestampParseError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum TimestampParseError {
    #[error("timestamp parse error: '{0}' is neither RFC 3339 nor YYYY-MM-DD")]
    Format(String),

    #[error("timestamp is outside the representable range")]
    OutOfRange,

    #[error("timestamp carries sub-microsecond precision")]
    SubMicrosecond,
}

// Canonical RFC 3339 UTC form: `Z` suffix, fractional digits only when non-zero.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_datetime().to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl FromStr for Timestamp {
    type Err = TimestampParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

///
/// TESTS
///
