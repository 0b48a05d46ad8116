//! Time-of-day arithmetic and timestamp helpers.
//!
//! Scenes are keyed by clock position within a day, not by instant, so the
//! core type here is [`TimeOfDay`]: seconds since midnight with arithmetic
//! that wraps around the day boundary in both directions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Seconds in a full day.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Minutes in a full day.
const MINUTES_PER_DAY: i32 = 1_440;

/// UTC timestamp used for event times.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// A clock position within the day, stored as seconds since midnight.
///
/// The inner value is always in `0..86_400`. Parsed from `"HH:MM"` or
/// `"HH:MM:SS"`, displayed as `"HH:MM:SS"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    /// The start of the day cycle.
    pub const MIDNIGHT: Self = Self(0);

    /// Wrap a raw seconds-since-midnight count.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TimeOutOfRange`] when `secs` reaches a
    /// full day or more.
    pub fn from_secs(secs: u32) -> Result<Self, ValidationError> {
        if secs >= SECONDS_PER_DAY {
            return Err(ValidationError::TimeOutOfRange { secs });
        }
        Ok(Self(secs))
    }

    /// Build from clock components.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTime`] when a component is out of
    /// its clock range.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Result<Self, ValidationError> {
        if hour >= 24 || minute >= 60 || second >= 60 {
            return Err(ValidationError::InvalidTime {
                value: format!("{hour:02}:{minute:02}:{second:02}"),
            });
        }
        Ok(Self(hour * 3_600 + minute * 60 + second))
    }

    /// Seconds elapsed since midnight.
    #[must_use]
    pub fn as_secs(self) -> u32 {
        self.0
    }

    /// Shift by a whole number of minutes, wrapping around midnight.
    ///
    /// Negative shifts move earlier in the day; a shift past either day
    /// boundary comes out the other side.
    #[must_use]
    pub fn shifted_by(self, minutes: i32) -> Self {
        let wrapped = minutes.rem_euclid(MINUTES_PER_DAY).unsigned_abs();
        Self((self.0 + wrapped * 60) % SECONDS_PER_DAY)
    }

    /// Forward distance in seconds from `self` to `other` on the day circle.
    ///
    /// Measuring forward means the result is `0` only when the two times
    /// are equal; otherwise it wraps past midnight as needed.
    #[must_use]
    pub fn seconds_until(self, other: Self) -> u32 {
        (other.0 + SECONDS_PER_DAY - self.0) % SECONDS_PER_DAY
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hour = self.0 / 3_600;
        let minute = self.0 / 60 % 60;
        let second = self.0 % 60;
        write!(f, "{hour:02}:{minute:02}:{second:02}")
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidTime {
            value: s.to_string(),
        };
        let mut parts = s.split(':');
        let hour = parts
            .next()
            .and_then(|part| part.parse().ok())
            .ok_or_else(invalid)?;
        let minute = parts
            .next()
            .and_then(|part| part.parse().ok())
            .ok_or_else(invalid)?;
        let second = match parts.next() {
            Some(part) => part.parse().map_err(|_| invalid())?,
            None => 0,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }
        Self::from_hms(hour, minute, second).map_err(|_| invalid())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// Project a wall-clock instant onto the day cycle.
#[must_use]
pub fn local_time_of_day(at: DateTime<Local>) -> TimeOfDay {
    TimeOfDay(at.time().num_seconds_from_midnight() % SECONDS_PER_DAY)
}
