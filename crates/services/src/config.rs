//! Player configuration: stop strategy and timings.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(1000);

/// How a segment's end is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopStrategyKind {
    /// Read the playhead on a fixed interval and pause once it reaches the end.
    #[default]
    Poll,
    /// Pause once after the segment's duration has elapsed.
    Timer,
}

impl FromStr for StopStrategyKind {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "poll" => Ok(Self::Poll),
            "timer" => Ok(Self::Timer),
            _ => Err(ConfigError::UnknownStrategy { raw: raw.to_owned() }),
        }
    }
}

impl fmt::Display for StopStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Poll => "poll",
            Self::Timer => "timer",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Desktop,
    Touch,
}

impl DeviceClass {
    #[must_use]
    pub fn from_user_agent(user_agent: &str) -> Self {
        const TOUCH_MARKERS: [&str; 4] = ["iPhone", "iPad", "iPod", "Android"];
        if TOUCH_MARKERS.iter().any(|marker| user_agent.contains(marker)) {
            Self::Touch
        } else {
            Self::Desktop
        }
    }

    #[must_use]
    pub fn stop_strategy(self) -> StopStrategyKind {
        match self {
            Self::Desktop => StopStrategyKind::Poll,
            Self::Touch => StopStrategyKind::Timer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerConfig {
    pub stop_strategy: StopStrategyKind,
    pub poll_interval: Duration,
    /// Pause between a solved line and playing the next one.
    pub advance_delay: Duration,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            stop_strategy: StopStrategyKind::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            advance_delay: DEFAULT_ADVANCE_DELAY,
        }
    }
}

impl PlayerConfig {
    #[must_use]
    pub fn for_device(device: DeviceClass) -> Self {
        Self::default().with_stop_strategy(device.stop_strategy())
    }

    #[must_use]
    pub fn with_stop_strategy(mut self, stop_strategy: StopStrategyKind) -> Self {
        self.stop_strategy = stop_strategy;
        self
    }

    #[must_use]
    pub fn with_advance_delay(mut self, advance_delay: Duration) -> Self {
        self.advance_delay = advance_delay;
        self
    }

    /// Defaults overridden by `LINGO_STOP_STRATEGY`, `LINGO_POLL_INTERVAL_MS`
    /// and `LINGO_ADVANCE_DELAY_MS`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup("LINGO_STOP_STRATEGY") {
            config.stop_strategy = raw.parse()?;
        }
        if let Some(ms) = millis(&lookup, "LINGO_POLL_INTERVAL_MS")? {
            config.poll_interval = ms;
        }
        if let Some(ms) = millis(&lookup, "LINGO_ADVANCE_DELAY_MS")? {
            config.advance_delay = ms;
        }
        Ok(config)
    }
}

fn millis(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let value: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { var, raw: raw.clone() })?;
    if value == 0 && var == "LINGO_POLL_INTERVAL_MS" {
        return Err(ConfigError::InvalidNumber { var, raw });
    }
    Ok(Some(Duration::from_millis(value)))
}
