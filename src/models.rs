//! Core Data Models
//!
//! ## Data Flow
//!
//! 1. **Raw Data**: [`LogRecord`] - one decoded log line, as parsed and as stored
//! 2. **Display**: [`Level`] - the closed set of severities that charts know how to color
//!
//! A [`LogRecord`] keeps its level as the raw token so that loading never rejects
//! an unfamiliar severity. The token is turned into a [`Level`] only when a chart
//! needs its color, which is where an unknown level becomes an error.

use crate::error::UnknownLevel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One structured log line: `<date> <time> - <level> - <message>. (<number>)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogRecord {
    pub date: String,
    pub time: String,
    pub level: String,
    pub message: String,
    #[serde(rename = "randomNumber")]
    pub number: i64,
}

impl LogRecord {
    pub fn new(
        date: impl Into<String>,
        time: impl Into<String>,
        level: impl Into<String>,
        message: impl Into<String>,
        number: i64,
    ) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            level: level.into(),
            message: message.into(),
            number,
        }
    }

    /// Resolve the raw level token against the color table
    pub fn level(&self) -> Result<Level, UnknownLevel> {
        self.level.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Info,
    Warning,
    Error,
    Debug,
    Critical,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Debug,
        Level::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Debug => "DEBUG",
            Level::Critical => "CRITICAL",
        }
    }

    /// Named chart color for this level
    pub fn color_name(&self) -> &'static str {
        match self {
            Level::Info => "blue",
            Level::Warning => "orange",
            Level::Error => "red",
            Level::Debug => "green",
            Level::Critical => "purple",
        }
    }

    /// RGB value of [`Level::color_name`]
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Level::Info => [0, 0, 255],
            Level::Warning => [255, 165, 0],
            Level::Error => [255, 0, 0],
            Level::Debug => [0, 128, 0],
            Level::Critical => [128, 0, 128],
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownLevel(s.to_string()))
    }
}
