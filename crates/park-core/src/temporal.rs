//! # Temporal Types — Millisecond UTC Instants
//!
//! Defines `Timestamp`, the only instant type in the engine. It is UTC,
//! truncated to millisecond precision, and persists as integer epoch
//! milliseconds, the representation used by the stored lot document.
//!
//! Billing and lateness are pure functions of two instants. Only the
//! binary reads the wall clock (via [`Timestamp::now()`]) and passes the
//! value down.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParkError;

/// Milliseconds in one minute.
pub const MILLIS_PER_MINUTE: i64 = 60_000;

/// Milliseconds in one day.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// A UTC instant with millisecond precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-millis.
/// - [`Timestamp::from_millis()`] — from epoch milliseconds.
/// - [`Timestamp::parse()`] — from an RFC 3339 string with any offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(#[serde(with = "chrono::serde::ts_milliseconds")] DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated to milliseconds.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-milliseconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_millis(dt))
    }

    /// Create a timestamp from Unix epoch milliseconds.
    pub fn from_millis(millis: i64) -> Result<Self, ParkError> {
        DateTime::from_timestamp_millis(millis)
            .map(Self)
            .ok_or_else(|| ParkError::Validation(format!("invalid epoch milliseconds: {millis}")))
    }

    /// Parse an RFC 3339 string, converting any offset to UTC.
    pub fn parse(s: &str) -> Result<Self, ParkError> {
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| ParkError::Validation(format!("invalid RFC 3339 timestamp {s:?}: {e}")))?;
        Ok(Self::from_utc(dt.with_timezone(&Utc)))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Unix epoch milliseconds.
    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Signed milliseconds elapsed from `earlier` to `self`.
    ///
    /// Negative when `earlier` is actually later (clock skew).
    pub fn millis_since(&self, earlier: &Timestamp) -> i64 {
        self.epoch_millis() - earlier.epoch_millis()
    }

    /// This instant shifted by `delta`, or `None` on overflow.
    pub fn checked_add(&self, delta: Duration) -> Option<Timestamp> {
        self.0.checked_add_signed(delta).map(Self::from_utc)
    }

    /// Calendar day of month (1..=31) of this instant seen at `offset`.
    pub fn day_of_month(&self, offset: &FixedOffset) -> u32 {
        self.0.with_timezone(offset).day()
    }

    /// Render as ISO8601 with Z suffix, seconds precision.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or(dt)
}
