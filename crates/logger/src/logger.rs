//! Hierarchical logger

use crate::config::LoggerConfig;
use crate::error::{Error, Result};
use crate::message::format_message;
use crate::{Backend, Data, Level, Message, Record, merge_data};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;

/// A logger bound to a domain, inherited data and a backend.
///
/// Loggers form a tree through [`Logger::child`]. They are immutable: every
/// derived logger is a new value, and logging never changes logger state, so
/// a logger can be cloned and shared freely across threads.
#[derive(Clone)]
pub struct Logger {
    domain: String,
    data: Data,
    debug_level: u32,
    backend: Arc<dyn Backend>,
}

impl Logger {
    /// Create a root logger with no data and debug output disabled
    pub fn new(domain: impl Into<String>, backend: Arc<dyn Backend>) -> Self {
        Self {
            domain: domain.into(),
            data: Data::new(),
            debug_level: 0,
            backend,
        }
    }

    /// Start building a root logger
    pub fn builder(domain: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder {
            domain: domain.into(),
            backend: None,
            data: Data::new(),
            debug_level: 0,
        }
    }

    /// Create a root logger with the backend described by `config`.
    ///
    /// # Errors
    ///
    /// Fails if the backend type is missing or unknown, if the matching
    /// backend block is absent, or if that block is invalid.
    pub fn from_config(domain: impl Into<String>, config: &LoggerConfig) -> Result<Self> {
        let backend = config.build_backend()?;

        Self::builder(domain)
            .backend(backend)
            .debug_level(config.debug_level)
            .build()
    }

    /// A logger writing colored lines to stderr, with debug output disabled
    #[cfg(feature = "terminal")]
    pub fn default_logger(domain: impl Into<String>) -> Self {
        let backend = crate::TerminalBackend::new(crate::TerminalBackendConfig {
            color: true,
            ..Default::default()
        });

        Self::new(domain, Arc::new(backend))
    }

    /// The dot-separated domain of this logger
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Data attached to every message of this logger
    pub fn data(&self) -> &Data {
        &self.data
    }

    /// Highest debug sub-level this logger emits
    pub fn debug_level(&self) -> u32 {
        self.debug_level
    }

    /// The shared backend
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// A copy of this logger with a different debug threshold
    #[must_use]
    pub fn with_debug_level(&self, debug_level: u32) -> Self {
        Self {
            debug_level,
            ..self.clone()
        }
    }

    /// Create a child logger.
    ///
    /// The child's domain is this domain followed by `"." + name`, or this
    /// domain unchanged when `name` is empty. Its data is this logger's data
    /// overlaid with `data`. The backend and debug threshold are copied; later
    /// changes to the parent are not seen by the child.
    #[must_use]
    pub fn child(&self, name: &str, data: Data) -> Self {
        let domain = if name.is_empty() {
            self.domain.clone()
        } else {
            format!("{}.{}", self.domain, name)
        };

        Self {
            domain,
            data: merge_data([&self.data, &data]),
            debug_level: self.debug_level,
            backend: self.backend.clone(),
        }
    }

    /// Whether a message at `level` (and `debug_level` for debug messages)
    /// passes the verbosity filter.
    ///
    /// Debug messages pass when their sub-level is at most the logger's
    /// threshold; other levels always pass.
    #[inline]
    pub fn is_enabled(&self, level: Level, debug_level: u32) -> bool {
        level != Level::Debug || debug_level <= self.debug_level
    }

    /// Enrich a message and hand it to the backend.
    ///
    /// Debug messages above the threshold are dropped silently. The time
    /// defaults to now, the domain is always this logger's, and the data is
    /// this logger's data overlaid with the message data.
    pub fn log(&self, msg: Message) {
        if !self.is_enabled(msg.level, msg.debug_level) {
            return;
        }

        let time = msg.time.unwrap_or_else(Utc::now);
        let data = merge_data([&self.data, &msg.data]);

        let record = Record::new(msg, time, self.domain.clone(), data);
        self.backend.render(record);
    }

    /// Log a debug message at verbosity tier `level`
    pub fn debug(&self, level: u32, args: fmt::Arguments<'_>) {
        self.debug_data(Data::new(), level, args);
    }

    /// Log a debug message with attached data
    pub fn debug_data(&self, data: Data, level: u32, args: fmt::Arguments<'_>) {
        // Skip formatting for filtered messages
        if !self.is_enabled(Level::Debug, level) {
            return;
        }

        self.log(Message::debug(level, format_message(args)).with_data(data));
    }

    /// Log an info message
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.info_data(Data::new(), args);
    }

    /// Log an info message with attached data
    pub fn info_data(&self, data: Data, args: fmt::Arguments<'_>) {
        self.log(Message::info(format_message(args)).with_data(data));
    }

    /// Log an error message
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.error_data(Data::new(), args);
    }

    /// Log an error message with attached data
    pub fn error_data(&self, data: Data, args: fmt::Arguments<'_>) {
        self.log(Message::error(format_message(args)).with_data(data));
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("domain", &self.domain)
            .field("data", &self.data)
            .field("debug_level", &self.debug_level)
            .finish_non_exhaustive()
    }
}

/// Builder for root loggers
pub struct LoggerBuilder {
    domain: String,
    backend: Option<Arc<dyn Backend>>,
    data: Data,
    debug_level: u32,
}

impl LoggerBuilder {
    /// Set the backend every logger of the tree renders to
    #[must_use]
    pub fn backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set the data attached to every message
    #[must_use]
    pub fn data(mut self, data: Data) -> Self {
        self.data = data;
        self
    }

    /// Set the highest debug sub-level to emit
    #[must_use]
    pub fn debug_level(mut self, debug_level: u32) -> Self {
        self.debug_level = debug_level;
        self
    }

    /// Build the logger.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingBackend`] if no backend was set.
    pub fn build(self) -> Result<Logger> {
        let backend = self.backend.ok_or(Error::MissingBackend)?;

        Ok(Logger {
            domain: self.domain,
            data: self.data,
            debug_level: self.debug_level,
            backend,
        })
    }
}

/// Log a debug message: `debug!(logger, level, "format", args...)`
#[macro_export]
macro_rules! debug {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.debug($level, format_args!($($arg)+))
    };
}

/// Log a debug message with data: `debug_data!(logger, data, level, "format", args...)`
#[macro_export]
macro_rules! debug_data {
    ($logger:expr, $data:expr, $level:expr, $($arg:tt)+) => {
        $logger.debug_data($data, $level, format_args!($($arg)+))
    };
}

/// Log an info message: `info!(logger, "format", args...)`
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(format_args!($($arg)+))
    };
}

/// Log an info message with data: `info_data!(logger, data, "format", args...)`
#[macro_export]
macro_rules! info_data {
    ($logger:expr, $data:expr, $($arg:tt)+) => {
        $logger.info_data($data, format_args!($($arg)+))
    };
}

/// Log an error message: `error!(logger, "format", args...)`
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(format_args!($($arg)+))
    };
}

/// Log an error message with data: `error_data!(logger, data, "format", args...)`
#[macro_export]
macro_rules! error_data {
    ($logger:expr, $data:expr, $($arg:tt)+) => {
        $logger.error_data($data, format_args!($($arg)+))
    };
}
