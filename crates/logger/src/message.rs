//! Log messages and the records handed to backends

use crate::Data;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::str::FromStr;

/// Appended to the text of a message whose arguments failed to format
pub const FORMAT_ERROR_MARKER: &str = "%!(BADFORMAT)";

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Verbose output, further ranked by a debug sub-level
    Debug,
    /// Normal operation
    Info,
    /// Failures
    Error,
}

impl Level {
    /// The lowercase level name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Error => "error",
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
        match s {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "error" => Ok(Self::Error),
            _ => Err(UnknownLevel(s.to_string())),
        }
    }
}

/// Returned when parsing a level name that does not exist
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level {0:?}")]
pub struct UnknownLevel(pub String);

fn full_level(level: Level, debug_level: u32) -> String {
    match level {
        Level::Debug => format!("debug.{debug_level}"),
        _ => level.to_string(),
    }
}

/// A message as built by the caller.
///
/// A message carries no domain: the logger it is sent through stamps its own
/// domain on the resulting [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// When the event happened; defaults to the time it is logged
    pub time: Option<DateTime<Utc>>,
    /// Log level
    pub level: Level,
    /// Verbosity tier, only meaningful for [`Level::Debug`]
    pub debug_level: u32,
    /// The message text
    pub message: String,
    /// Data attached to this message only
    pub data: Data,
}

impl Message {
    /// Create a message without data or time
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            time: None,
            level,
            debug_level: 0,
            message: message.into(),
            data: Data::new(),
        }
    }

    /// Create a debug message at the given verbosity tier
    pub fn debug(debug_level: u32, message: impl Into<String>) -> Self {
        Self {
            debug_level,
            ..Self::new(Level::Debug, message)
        }
    }

    /// Create an info message
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }

    /// Create an error message
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    /// Attach data to the message
    #[must_use]
    pub fn with_data(mut self, data: Data) -> Self {
        self.data = data;
        self
    }

    /// Set an explicit time, in any time zone; it is stored as UTC
    #[must_use]
    pub fn with_time<Tz: TimeZone>(mut self, time: DateTime<Tz>) -> Self {
        self.time = Some(time.with_timezone(&Utc));
        self
    }

    /// `"debug.<n>"` for debug messages, the bare level name otherwise
    pub fn full_level(&self) -> String {
        full_level(self.level, self.debug_level)
    }
}

/// A fully enriched message, as received by a [`Backend`](crate::Backend).
///
/// Only a [`Logger`](crate::Logger) can build a record, which guarantees that
/// `time` is set and in UTC, that `domain` is the emitting logger's domain,
/// and that `data` already includes the logger's inherited context.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub struct Record {
    /// When the event happened
    pub time: DateTime<Utc>,
    /// Dot-separated domain of the emitting logger
    pub domain: String,
    /// Log level
    pub level: Level,
    /// Verbosity tier, only meaningful for [`Level::Debug`]
    pub debug_level: u32,
    /// The message text
    pub message: String,
    /// Logger data overlaid with message data
    pub data: Data,
}

impl Record {
    pub(crate) fn new(message: Message, time: DateTime<Utc>, domain: String, data: Data) -> Self {
        Self {
            time,
            domain,
            level: message.level,
            debug_level: message.debug_level,
            message: message.message,
            data,
        }
    }

    /// `"debug.<n>"` for debug records, the bare level name otherwise
    pub fn full_level(&self) -> String {
        full_level(self.level, self.debug_level)
    }
}

/// Render format arguments into a string without ever panicking.
///
/// `format!` panics when a `Display` implementation reports an error. Here
/// the text written so far is kept and [`FORMAT_ERROR_MARKER`] is appended
/// instead.
pub fn format_message(args: fmt::Arguments<'_>) -> String {
    if let Some(text) = args.as_str() {
        return text.to_string();
    }

    let mut text = String::new();
    if text.write_fmt(args).is_err() {
        text.push_str(FORMAT_ERROR_MARKER);
    }
    text
}
