//! Human-readable line backend

use crate::backend::{Output, diagnostic};
use crate::error::Result;
use crate::timestamp::{format_time, validate_format};
use crate::{Backend, Datum, Level, Record};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

/// Width the full level is padded to, fits `debug.NN`
const LEVEL_WIDTH: usize = 8;

/// Terminal backend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TerminalBackendConfig {
    /// Color the level and dim secondary fields with ANSI escapes
    pub color: bool,
    /// chrono format string; RFC 3339 when unset
    pub timestamp_format: Option<String>,
    /// Where lines go
    pub output: Output,
}

impl Default for TerminalBackendConfig {
    fn default() -> Self {
        Self {
            color: false,
            timestamp_format: None,
            output: Output::Stderr,
        }
    }
}

/// Backend printing one line per record:
///
/// ```text
/// 2024-05-01T10:00:00.250Z info     app.http  request served  path="/a b" status=200
/// ```
///
/// Each line is rendered into a buffer first and written with a single
/// `write_all` under a lock, so concurrent records never interleave.
pub struct TerminalBackend {
    config: TerminalBackendConfig,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl TerminalBackend {
    /// Create a backend writing to the configured standard stream.
    ///
    /// An invalid `timestamp_format` falls back to RFC 3339; use
    /// [`TerminalBackend::try_new`] to reject it instead.
    pub fn new(config: TerminalBackendConfig) -> Self {
        let sink = config.output.open();
        Self::build(config, sink)
    }

    /// Create a backend, rejecting an invalid timestamp format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) if
    /// `timestamp_format` is not a valid chrono format string.
    pub fn try_new(config: TerminalBackendConfig) -> Result<Self> {
        if let Some(format) = &config.timestamp_format {
            validate_format(format)?;
        }
        Ok(Self::new(config))
    }

    /// Create a backend writing to an arbitrary sink; `output` is ignored
    pub fn with_writer(config: TerminalBackendConfig, writer: impl Write + Send + 'static) -> Self {
        Self::build(config, Box::new(writer))
    }

    fn build(mut config: TerminalBackendConfig, sink: Box<dyn Write + Send>) -> Self {
        if let Some(format) = &config.timestamp_format {
            if let Err(e) = validate_format(format) {
                diagnostic(format_args!("{e}, using RFC 3339"));
                config.timestamp_format = None;
            }
        }

        Self {
            config,
            sink: Mutex::new(sink),
        }
    }

    /// The settings in use
    pub fn config(&self) -> &TerminalBackendConfig {
        &self.config
    }

    fn render_line(&self, record: &Record) -> io::Result<Vec<u8>> {
        let mut buf = if self.config.color {
            Buffer::ansi()
        } else {
            Buffer::no_color()
        };

        let dimmed = ColorSpec::new().set_dimmed(true).clone();

        let time = format_time(&record.time, self.config.timestamp_format.as_deref());
        buf.set_color(&dimmed)?;
        write!(buf, "{time}")?;
        buf.reset()?;
        write!(buf, " ")?;

        buf.set_color(ColorSpec::new().set_fg(Some(level_color(record.level))).set_bold(true))?;
        write!(buf, "{:<width$}", record.full_level(), width = LEVEL_WIDTH)?;
        buf.reset()?;

        buf.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(buf, " {}", record.domain)?;
        buf.reset()?;

        write!(buf, "  {}", record.message)?;

        if !record.data.is_empty() {
            write!(buf, " ")?;
            for (key, value) in record.data.sorted() {
                buf.set_color(&dimmed)?;
                write!(buf, " {key}=")?;
                buf.reset()?;
                write!(buf, "{}", format_value(value))?;
            }
        }

        writeln!(buf)?;
        Ok(buf.into_inner())
    }
}

impl Backend for TerminalBackend {
    fn render(&self, record: Record) {
        let line = match self.render_line(&record) {
            Ok(line) => line,
            Err(e) => {
                diagnostic(format_args!("cannot render log record: {e}"));
                return;
            }
        };

        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = sink.write_all(&line).and_then(|()| sink.flush()) {
            diagnostic(format_args!("cannot write log record: {e}"));
        }
    }
}

const fn level_color(level: Level) -> Color {
    match level {
        Level::Debug => Color::Blue,
        Level::Info => Color::Green,
        Level::Error => Color::Red,
    }
}

/// Bare strings stay bare unless quoting is needed to read them back;
/// everything else is compact JSON.
fn format_value(value: &Datum) -> String {
    match value {
        Datum::String(s) if is_bare(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_bare(s: &str) -> bool {
    !s.is_empty()
        && !s
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '"' || c == '=')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Data, Logger, Message, data};
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn logger(config: TerminalBackendConfig) -> (SharedBuf, Logger) {
        let buf = SharedBuf::default();
        let backend = TerminalBackend::with_writer(config, buf.clone());
        (buf, Logger::new("app", Arc::new(backend)).with_debug_level(3))
    }

    fn time() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_plain_line() {
        let (buf, logger) = logger(TerminalBackendConfig::default());

        logger.child("http", Data::new()).log(
            Message::info("request served")
                .with_time(time())
                .with_data(data! { "status" => 200, "path" => "/a b" }),
        );

        assert_eq!(
            buf.text(),
            "2024-05-01T10:00:00Z info     app.http  request served  path=\"/a b\" status=200\n"
        );
    }

    #[test]
    fn test_debug_level_is_padded() {
        let (buf, logger) = logger(TerminalBackendConfig::default());

        logger.log(Message::debug(2, "verbose").with_time(time()));

        assert_eq!(buf.text(), "2024-05-01T10:00:00Z debug.2  app  verbose\n");
    }

    #[test]
    fn test_timestamp_cannot_be_disabled() {
        let config: std::result::Result<TerminalBackendConfig, _> =
            serde_json::from_str(r#"{"timestamps": false}"#);
        assert!(config.is_err());

        let (buf, logger) = logger(TerminalBackendConfig::default());
        logger.info(format_args!("stamped"));

        let text = buf.text();
        let (stamp, _) = text.split_once(' ').unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok(), "{text}");
    }

    #[test]
    fn test_custom_timestamp_format() {
        let config = TerminalBackendConfig {
            timestamp_format: Some("%H:%M".to_string()),
            ..Default::default()
        };
        let (buf, logger) = logger(config);

        logger.log(Message::error("boom").with_time(time()));

        assert_eq!(buf.text(), "10:00 error    app  boom\n");
    }

    #[test]
    fn test_invalid_timestamp_format() {
        let config = TerminalBackendConfig {
            timestamp_format: Some("%Q".to_string()),
            ..Default::default()
        };
        assert!(TerminalBackend::try_new(config.clone()).is_err());

        let backend = TerminalBackend::with_writer(config, io::sink());
        assert_eq!(backend.config().timestamp_format, None);
    }

    #[test]
    fn test_color_output_contains_escapes() {
        let config = TerminalBackendConfig {
            color: true,
            ..Default::default()
        };
        let (buf, logger) = logger(config);

        logger.error(format_args!("red"));

        let text = buf.text();
        assert!(text.contains("\x1b["));
        assert!(text.contains("red"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!("plain")), "plain");
        assert_eq!(format_value(&json!("")), "\"\"");
        assert_eq!(format_value(&json!("a=b")), "\"a=b\"");
        assert_eq!(format_value(&json!(1.5)), "1.5");
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!({"k": [1]})), "{\"k\":[1]}");
    }

    #[test]
    fn test_concurrent_lines_do_not_interleave() {
        let config = TerminalBackendConfig {
            timestamp_format: Some("%H".to_string()),
            ..Default::default()
        };
        let (buf, logger) = logger(config);

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let logger = logger.child(&format!("t{t}"), Data::new());
                std::thread::spawn(move || {
                    for i in 0..50 {
                        logger.info(format_args!("line {i}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let text = buf.text();
        assert_eq!(text.lines().count(), 400);
        for line in text.lines() {
            assert!(line[3..].starts_with("info     app.t"), "{line}");
            assert!(line.contains("  line "), "{line}");
        }
    }
}
