//! # Temporal Types: UTC-Only Timestamps
//!
//! `Timestamp` is a UTC timestamp truncated to seconds, serialized as
//! `YYYY-MM-DDTHH:MM:SSZ`. Issuance, expiration, and proof-creation dates
//! on credentials all use it, so a credential re-serialized by the store
//! carries exactly the strings the factory wrote.
//!
//! Deserialization is lenient (any RFC 3339 offset, converted to UTC) because
//! credentials arrive from untrusted external callers; [`Timestamp::parse()`]
//! is the strict path.

use std::fmt;

use chrono::{DateTime, Duration, Months, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse an RFC 3339 string. Only the `Z` suffix is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimestamp`] for malformed input or
    /// any explicit offset, including `+00:00`.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if !s.ends_with('Z') {
            return Err(ValidationError::InvalidTimestamp(format!(
                "timestamp must use Z suffix, got {s:?}"
            )));
        }
        Self::parse_lenient(s)
    }

    /// Parse an RFC 3339 string with any offset, converting to UTC.
    pub fn parse_lenient(s: &str) -> Result<Self, ValidationError> {
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| ValidationError::InvalidTimestamp(format!("{s:?}: {e}")))?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    /// Calendar date portion (`YYYY-MM-DD`).
    pub fn date_string(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// Add calendar years. February 29 clamps to February 28 in non-leap
    /// target years. Saturates at the chrono maximum.
    pub fn plus_years(&self, years: u32) -> Self {
        let months = Months::new(years.saturating_mul(12));
        Self(self.0.checked_add_months(months).unwrap_or(DateTime::<Utc>::MAX_UTC))
    }

    /// Subtract calendar years, saturating at the chrono minimum.
    pub fn minus_years(&self, years: u32) -> Self {
        let months = Months::new(years.saturating_mul(12));
        Self(self.0.checked_sub_months(months).unwrap_or(DateTime::<Utc>::MIN_UTC))
    }

    /// Add whole days (negative values move backwards).
    pub fn plus_days(&self, days: i64) -> Self {
        Duration::try_days(days)
            .and_then(|d| self.0.checked_add_signed(d))
            .map(Self)
            .unwrap_or(*self)
    }

    /// Add whole seconds (negative values move backwards).
    pub fn plus_seconds(&self, secs: i64) -> Self {
        Duration::try_seconds(secs)
            .and_then(|d| self.0.checked_add_signed(d))
            .map(Self)
            .unwrap_or(*self)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_utc(dt)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_lenient(&s).map_err(serde::de::Error::custom)
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
