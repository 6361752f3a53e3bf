//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::ValidationError;

/// Immutable point in time, always UTC, truncated to millisecond precision.
///
/// Serializes as an ISO-8601 string with exactly three fractional digits
/// (`2026-01-29T14:50:00.000Z`), so a value survives a JSON round trip
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Creates a timestamp that is strictly later than `previous`.
    ///
    /// Returns the current moment when the clock has already moved past
    /// `previous`, otherwise `previous` plus one millisecond.
    pub fn now_after(previous: &Timestamp) -> Self {
        let now = Self::now();
        if now > *previous {
            now
        } else {
            previous.plus_millis(1)
        }
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.trunc_subsecs(3))
    }

    /// Parses an RFC 3339 / ISO-8601 string with any UTC offset.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| Self::from_datetime(dt.with_timezone(&Utc)))
            .map_err(|e| ValidationError::invalid_format("timestamp", e.to_string()))
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Creates a new timestamp by adding the specified number of milliseconds.
    pub fn plus_millis(&self, millis: i64) -> Self {
        Self(self.0 + Duration::milliseconds(millis))
    }

    /// Formats as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
    pub fn to_iso_string(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now().trunc_subsecs(3);
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn timestamp_truncates_to_milliseconds() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 29, 14, 50, 0).unwrap()
            + Duration::nanoseconds(123_456_789);
        let ts = Timestamp::from_datetime(dt);
        assert_eq!(ts.as_datetime().nanosecond(), 123_000_000);
    }

    #[test]
    fn timestamp_formats_like_iso_string() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 29, 14, 50, 0).unwrap();
        let ts = Timestamp::from_datetime(dt);
        assert_eq!(ts.to_iso_string(), "2026-01-29T14:50:00.000Z");
    }

    #[test]
    fn now_after_is_strictly_later() {
        let future = Timestamp::now().plus_millis(10_000);
        let next = Timestamp::now_after(&future);
        assert!(next.is_after(&future));
        assert_eq!(next, future.plus_millis(1));
    }

    #[test]
    fn now_after_uses_clock_when_it_has_moved_on() {
        let past = Timestamp::now().plus_millis(-10_000);
        let next = Timestamp::now_after(&past);
        assert!(next.duration_is_recent());
    }

    #[test]
    fn parse_accepts_offsets_and_normalizes_to_utc() {
        let ts = Timestamp::parse("2026-01-29T16:50:00.000+02:00").unwrap();
        assert_eq!(ts.to_iso_string(), "2026-01-29T14:50:00.000Z");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Timestamp::parse("yesterday").is_err());
    }

    #[test]
    fn json_round_trip_is_lossless() {
        let ts = Timestamp::now();
        let json = serde_json::to_string(&ts).unwrap();
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }

    impl Timestamp {
        fn duration_is_recent(&self) -> bool {
            Utc::now().signed_duration_since(self.0) < Duration::seconds(5)
        }
    }
}
