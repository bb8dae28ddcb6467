//! Time of day in 24-hour form

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A wall-clock time, always rendered as zero-padded `HH:MM`
///
/// The constructor guarantees `hour` is in 0..=23 and `minute` in 0..=59, so any
/// value of this type formats to a valid 24-hour string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Create a time, returning `None` if either component is out of range
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    /// Parse `H:MM` or `HH:MM`
    pub fn parse(s: &str) -> Option<Self> {
        let (h, m) = s.trim().split_once(':')?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return None;
        }
        if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }
        Self::new(h.parse().ok()?, m.parse().ok()?)
    }

    /// Hour component (0-23)
    pub fn hour(&self) -> u32 {
        self.hour as u32
    }

    /// Minute component (0-59)
    pub fn minute(&self) -> u32 {
        self.minute as u32
    }

    /// Minutes since midnight
    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour() * 60 + self.minute()
    }

    /// Night window: 22:00 through 05:00, inclusive at both ends
    pub fn is_night(&self) -> bool {
        let minutes = self.minutes_since_midnight();
        minutes >= 22 * 60 || minutes <= 5 * 60
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl std::str::FromStr for ClockTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid time (expected HH:MM): {}", s))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
