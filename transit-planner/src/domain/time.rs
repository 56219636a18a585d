//! Service-day time handling.
//!
//! Timetables give times as "HH:MM:SS" measured from the start of the
//! service day. Trips running past midnight keep counting, so "25:10:00" is
//! a valid time (ten past one the following morning, same service day).

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const SECONDS_PER_MINUTE: u32 = 60;
const SECONDS_PER_HOUR: u32 = 60 * SECONDS_PER_MINUTE;

/// Largest hour accepted when parsing. Feeds rarely exceed 30.
const MAX_HOURS: u32 = 99;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day on the service day, with one-second resolution.
///
/// # Examples
///
/// ```
/// use transit_planner::domain::ServiceTime;
///
/// let t = ServiceTime::parse("08:15:00").unwrap();
/// assert_eq!(t.as_seconds(), 8 * 3600 + 15 * 60);
/// assert_eq!(t.to_string(), "08:15:00");
///
/// // After-midnight trips keep counting hours
/// assert!(ServiceTime::parse("25:10:00").is_ok());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceTime(u32);

impl ServiceTime {
    /// Midnight at the start of the service day.
    pub const MIDNIGHT: ServiceTime = ServiceTime(0);

    /// Create a time from seconds after midnight.
    pub fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    /// Create a time from hour, minute and second components.
    pub fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Result<Self, TimeError> {
        if hours > MAX_HOURS {
            return Err(TimeError::new("hour out of range"));
        }
        if minutes > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        if seconds > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }
        Ok(Self(
            hours * SECONDS_PER_HOUR + minutes * SECONDS_PER_MINUTE + seconds,
        ))
    }

    /// Parse "HH:MM:SS" (or "HH:MM"). A single-digit hour is accepted.
    ///
    /// ```
    /// use transit_planner::domain::ServiceTime;
    ///
    /// assert!(ServiceTime::parse("8:05:00").is_ok());
    /// assert!(ServiceTime::parse("08:05").is_ok());
    /// assert!(ServiceTime::parse("08:5:00").is_err());
    /// assert!(ServiceTime::parse("08:60:00").is_err());
    /// assert!(ServiceTime::parse("").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let mut parts = s.trim().split(':');

        let hours = parts
            .next()
            .filter(|h| (1..=2).contains(&h.len()))
            .and_then(parse_digits)
            .ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minutes = parts
            .next()
            .filter(|m| m.len() == 2)
            .and_then(parse_digits)
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        let seconds = match parts.next() {
            Some(sec) if sec.len() == 2 => {
                parse_digits(sec).ok_or_else(|| TimeError::new("invalid second digits"))?
            }
            Some(_) => return Err(TimeError::new("invalid second digits")),
            None => 0,
        };

        if parts.next().is_some() {
            return Err(TimeError::new("expected HH:MM:SS format"));
        }

        Self::from_hms(hours, minutes, seconds)
    }

    /// Seconds after midnight.
    pub fn as_seconds(&self) -> u32 {
        self.0
    }

    /// Returns the hour (may be 24 or more).
    pub fn hours(&self) -> u32 {
        self.0 / SECONDS_PER_HOUR
    }

    /// Returns the minute (0-59).
    pub fn minutes(&self) -> u32 {
        (self.0 % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE
    }

    /// Returns the second (0-59).
    pub fn seconds(&self) -> u32 {
        self.0 % SECONDS_PER_MINUTE
    }

    /// Add a duration, returning `None` on overflow or if the result would
    /// fall before midnight.
    pub fn checked_add(&self, duration: Duration) -> Option<Self> {
        let secs = i64::from(self.0).checked_add(duration.num_seconds())?;
        u32::try_from(secs).ok().map(Self)
    }

    /// Subtract a duration, returning `None` if the result would fall before
    /// midnight.
    pub fn checked_sub(&self, duration: Duration) -> Option<Self> {
        let secs = i64::from(self.0).checked_sub(duration.num_seconds())?;
        u32::try_from(secs).ok().map(Self)
    }

    /// Add a duration, clamping at the representable range.
    pub fn saturating_add(&self, duration: Duration) -> Self {
        let secs = i64::from(self.0).saturating_add(duration.num_seconds());
        Self(secs.clamp(0, i64::from(u32::MAX)) as u32)
    }

    /// Subtract a duration, clamping at midnight.
    pub fn saturating_sub(&self, duration: Duration) -> Self {
        let secs = i64::from(self.0).saturating_sub(duration.num_seconds());
        Self(secs.clamp(0, i64::from(u32::MAX)) as u32)
    }

    /// Returns the duration between two times.
    ///
    /// Returns a negative duration if `other` is after `self`.
    pub fn signed_duration_since(&self, other: Self) -> Duration {
        Duration::seconds(i64::from(self.0) - i64::from(other.0))
    }

    /// True if `self` is strictly earlier than `other`.
    pub fn is_before(&self, other: Self) -> bool {
        self.0 < other.0
    }
}

/// Parse an ASCII digit string into a u32.
fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Debug for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceTime({self})")
    }
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}

impl FromStr for ServiceTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ServiceTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ServiceTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Serialize a `chrono::Duration` as whole seconds.
pub(crate) fn serialize_duration_secs<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(duration.num_seconds())
}
