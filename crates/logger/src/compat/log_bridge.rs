//! Bridge from the `log` crate to a [`Logger`]

use crate::{Data, Datum, Level, Logger, Message};
use log::kv::{self, Key, Value, VisitSource};
use log::{LevelFilter, Log, Metadata, Record as LogRecord};

/// Data key holding the `log` target of a bridged record
pub const TARGET_KEY: &str = "target";

/// Data key marking records that were warnings in the `log` crate
pub const LOG_LEVEL_KEY: &str = "log_level";

/// Forwards `log` records to a [`Logger`].
///
/// | `log` level | emitted as |
/// |-------------|------------|
/// | `Error`     | `error` |
/// | `Warn`      | `info`, with `log_level = "warn"` |
/// | `Info`      | `info` |
/// | `Debug`     | `debug.1` |
/// | `Trace`     | `debug.2` |
pub struct LogBridge {
    logger: Logger,
}

impl LogBridge {
    /// Create a bridge emitting through `logger`
    pub const fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// The logger records are forwarded to
    pub const fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let (level, debug_level) = map_level(metadata.level());
        self.logger.is_enabled(level, debug_level)
    }

    fn log(&self, record: &LogRecord) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let (level, debug_level) = map_level(record.level());

        let mut data = Data::new().with(TARGET_KEY, record.target());
        if record.level() == log::Level::Warn {
            data.insert(LOG_LEVEL_KEY, "warn");
        }

        let mut visitor = DataVisitor(&mut data);
        // A failing source only loses its remaining pairs
        let _ = record.key_values().visit(&mut visitor);

        let mut message = Message::new(level, crate::format_message(*record.args())).with_data(data);
        message.debug_level = debug_level;

        self.logger.log(message);
    }

    fn flush(&self) {}
}

struct DataVisitor<'a>(&'a mut Data);

impl<'kvs> VisitSource<'kvs> for DataVisitor<'_> {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), kv::Error> {
        self.0.insert(key.as_str(), kv_value(&value));
        Ok(())
    }
}

fn kv_value(value: &Value<'_>) -> Datum {
    if let Some(v) = value.to_bool() {
        Datum::from(v)
    } else if let Some(v) = value.to_i64() {
        Datum::from(v)
    } else if let Some(v) = value.to_u64() {
        Datum::from(v)
    } else if let Some(v) = value.to_f64() {
        Datum::from(v)
    } else {
        Datum::from(value.to_string())
    }
}

const fn map_level(level: log::Level) -> (Level, u32) {
    match level {
        log::Level::Error => (Level::Error, 0),
        log::Level::Warn | log::Level::Info => (Level::Info, 0),
        log::Level::Debug => (Level::Debug, 1),
        log::Level::Trace => (Level::Debug, 2),
    }
}

/// The most verbose `log` level a logger lets through
pub fn max_level(logger: &Logger) -> LevelFilter {
    match logger.debug_level() {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install a [`LogBridge`] as the global `log` logger.
///
/// The global max level follows the logger's debug threshold.
///
/// # Example
/// ```no_run
/// use ember_logger::Logger;
/// use ember_logger::compat::init_log_bridge;
///
/// init_log_bridge(Logger::default_logger("app")).expect("Failed to set log bridge");
/// log::info!("from the log crate");
/// ```
///
/// # Errors
///
/// Fails if a global `log` logger is already installed.
pub fn init_log_bridge(logger: Logger) -> Result<(), log::SetLoggerError> {
    let max = max_level(&logger);

    // log::set_logger requires a 'static logger
    let bridge = Box::leak(Box::new(LogBridge::new(logger)));
    log::set_logger(bridge)?;
    log::set_max_level(max);

    Ok(())
}
