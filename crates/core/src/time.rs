use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A simple clock abstraction for deterministic time in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

//
// ─── VIDEO TIME VALUES ─────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum TimeParseError {
    #[error("time `{raw}` is not in M:SS form")]
    MissingSeparator { raw: String },

    #[error("time `{raw}` has a non-numeric {part} part")]
    InvalidNumber { raw: String, part: &'static str },

    #[error("time must be a non-negative finite number of seconds, got {value}")]
    OutOfRange { value: f64 },
}

/// A point in a video as authored in a lesson file.
///
/// Lesson files carry either a raw second count (`12.5`) or a
/// `"M:SS[.fraction]"` string (`"1:13.5"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    Seconds(f64),
    Clock(String),
}

impl TimeValue {
    /// Read a time typed by an author: a plain number is seconds, anything
    /// else is taken as `M:SS`.
    #[must_use]
    pub fn from_input(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<f64>() {
            Ok(seconds) => Self::Seconds(seconds),
            Err(_) => Self::Clock(raw.to_owned()),
        }
    }

    /// Normalize to a second count.
    ///
    /// # Errors
    ///
    /// Returns `TimeParseError` when a string lacks the `:` separator, either
    /// part is not a number, or the result is negative or not finite.
    pub fn to_seconds(&self) -> Result<f64, TimeParseError> {
        match self {
            Self::Seconds(value) => check_range(*value),
            Self::Clock(raw) => parse_clock(raw),
        }
    }
}

impl From<f64> for TimeValue {
    fn from(value: f64) -> Self {
        Self::Seconds(value)
    }
}

impl From<&str> for TimeValue {
    fn from(value: &str) -> Self {
        Self::Clock(value.to_owned())
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds(value) => write!(f, "{value:.2}"),
            Self::Clock(raw) => f.write_str(raw),
        }
    }
}

fn parse_clock(raw: &str) -> Result<f64, TimeParseError> {
    let (minutes, seconds) =
        raw.trim()
            .split_once(':')
            .ok_or_else(|| TimeParseError::MissingSeparator {
                raw: raw.to_owned(),
            })?;

    let minutes: f64 = minutes
        .trim()
        .parse()
        .map_err(|_| TimeParseError::InvalidNumber {
            raw: raw.to_owned(),
            part: "minutes",
        })?;
    let seconds: f64 = seconds
        .trim()
        .parse()
        .map_err(|_| TimeParseError::InvalidNumber {
            raw: raw.to_owned(),
            part: "seconds",
        })?;

    check_range(minutes)?;
    check_range(seconds)?;
    check_range(minutes * 60.0 + seconds)
}

fn check_range(value: f64) -> Result<f64, TimeParseError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(TimeParseError::OutOfRange { value })
    }
}
