//! Bridge from unstructured byte writers into a logger
//!
//! Code that can only write raw text (anything taking an [`io::Write`]) can
//! still select a level by prefixing its output with the level name followed
//! by [`LEVEL_SEPARATOR`]. Each write is decoded on its own; nothing is kept
//! between calls.

use crate::message::format_message;
use crate::{Level, Logger, Message};
use std::fmt;
use std::io;

/// ASCII unit separator, ending the optional level prefix
pub const LEVEL_SEPARATOR: u8 = 0x1f;

/// Decode one chunk of raw text into a message.
///
/// If `bytes` contains [`LEVEL_SEPARATOR`] and the text before it is
/// `debug`, `info` or `error`, that prefix selects the level and the rest is
/// the message. Any other prefix is not consumed: the whole input becomes
/// the message at info level, as does input without a separator. The text is
/// trimmed, and invalid UTF-8 is replaced rather than rejected.
///
/// Debug messages decoded here have sub-level 0, so they pass every debug
/// threshold.
///
/// ```
/// use ember_logger::{Level, writer::decode};
///
/// let msg = decode(b"error\x1fsomething failed\n");
/// assert_eq!(msg.level, Level::Error);
/// assert_eq!(msg.message, "something failed");
/// ```
pub fn decode(bytes: &[u8]) -> Message {
    let (level, body) = match bytes.iter().position(|&b| b == LEVEL_SEPARATOR) {
        Some(idx) => match parse_level(&bytes[..idx]) {
            Some(level) => (level, &bytes[idx + 1..]),
            None => (Level::Info, bytes),
        },
        None => (Level::Info, bytes),
    };

    let text = String::from_utf8_lossy(body);
    Message::new(level, text.trim())
}

fn parse_level(prefix: &[u8]) -> Option<Level> {
    std::str::from_utf8(prefix).ok()?.parse().ok()
}

/// The level prefix understood by [`decode`], e.g. `b"error\x1f"`
pub fn level_prefix(level: Level) -> Vec<u8> {
    let mut prefix = level.as_str().as_bytes().to_vec();
    prefix.push(LEVEL_SEPARATOR);
    prefix
}

/// An [`io::Write`] sink turning every write into one log message.
///
/// Writes always succeed and always report the full length. Note that
/// `write!` on an `io::Write` may split its output over several writes; use
/// [`StdLogger::print`] or write complete lines to keep one line per message.
#[derive(Debug, Clone)]
pub struct LogWriter {
    logger: Logger,
}

impl LogWriter {
    /// Wrap a logger
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// The logger messages are sent through
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    fn write_bytes(&self, buf: &[u8]) {
        self.logger.log(decode(buf));
    }
}

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A print-style handle bound to a single level.
///
/// Every line is prefixed with the level marker and written to a
/// [`LogWriter`] in one call, so legacy call sites pick a level without
/// knowing anything about messages.
#[derive(Debug, Clone)]
pub struct StdLogger {
    writer: LogWriter,
    level: Level,
    prefix: Vec<u8>,
}

impl StdLogger {
    /// The level of every line printed through this handle
    pub fn level(&self) -> Level {
        self.level
    }

    /// The bytes prepended to every line
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// Format and emit one line
    pub fn print(&self, args: fmt::Arguments<'_>) {
        let text = format_message(args);

        let mut line = Vec::with_capacity(self.prefix.len() + text.len() + 1);
        line.extend_from_slice(&self.prefix);
        line.extend_from_slice(text.as_bytes());
        if !line.ends_with(b"\n") {
            line.push(b'\n');
        }

        self.writer.write_bytes(&line);
    }
}

impl Logger {
    /// A byte sink feeding this logger, see [`decode`]
    pub fn writer(&self) -> LogWriter {
        LogWriter::new(self.clone())
    }

    /// A print-style handle emitting every line at `level`
    pub fn std_logger(&self, level: Level) -> StdLogger {
        StdLogger {
            writer: self.writer(),
            level,
            prefix: level_prefix(level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CaptureBackend;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use std::sync::Arc;

    #[test]
    fn test_decode_known_prefix() {
        let msg = decode(b"error\x1fsomething failed\n");
        assert_eq!(msg.level, Level::Error);
        assert_eq!(msg.message, "something failed");

        let msg = decode(b"debug\x1f  verbose  ");
        assert_eq!(msg.level, Level::Debug);
        assert_eq!(msg.debug_level, 0);
        assert_eq!(msg.message, "verbose");

        let msg = decode(b"info\x1fhello");
        assert_eq!(msg.level, Level::Info);
        assert_eq!(msg.message, "hello");
    }

    #[test]
    fn test_decode_without_separator() {
        let msg = decode(b"plain text\n");
        assert_eq!(msg.level, Level::Info);
        assert_eq!(msg.message, "plain text");
    }

    #[test]
    fn test_decode_unknown_prefix_keeps_full_input() {
        let msg = decode(b"weird\x1fpayload");
        assert_eq!(msg.level, Level::Info);
        assert_eq!(msg.message, "weird\x1fpayload");
    }

    #[test]
    fn test_decode_prefix_uses_level_names() {
        for level in [Level::Debug, Level::Info, Level::Error] {
            let mut bytes = level_prefix(level);
            bytes.extend_from_slice(b"text");
            assert_eq!(decode(&bytes).level, level);
        }

        let msg = decode(b"ERROR\x1fshouting");
        assert_eq!(msg.level, Level::Info);
        assert_eq!(msg.message, "ERROR\x1fshouting");

        let msg = decode(b"\xff\x1fbinary");
        assert_eq!(msg.level, Level::Info);
        assert_eq!(msg.message, "\u{fffd}\x1fbinary");
    }

    #[test]
    fn test_decode_only_first_separator_counts() {
        let msg = decode(b"error\x1fa\x1fb");
        assert_eq!(msg.level, Level::Error);
        assert_eq!(msg.message, "a\x1fb");
    }

    #[test]
    fn test_decode_empty_and_invalid_utf8() {
        let msg = decode(b"");
        assert_eq!(msg.level, Level::Info);
        assert_eq!(msg.message, "");

        let msg = decode(b"error\x1f\xffbad\n");
        assert_eq!(msg.level, Level::Error);
        assert_eq!(msg.message, "\u{fffd}bad");
    }

    #[test]
    fn test_level_prefix() {
        assert_eq!(level_prefix(Level::Error), b"error\x1f");
        assert_eq!(decode(&level_prefix(Level::Debug)).level, Level::Debug);
    }

    #[test]
    fn test_writer_reports_full_length() {
        let capture = CaptureBackend::new();
        let logger = Logger::new("legacy", Arc::new(capture.clone()));
        let mut writer = logger.writer();

        let input = b"error\x1fdisk full\n";
        assert_eq!(writer.write(input).unwrap(), input.len());
        writer.flush().unwrap();

        let records = capture.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, Level::Error);
        assert_eq!(records[0].message, "disk full");
        assert_eq!(records[0].domain, "legacy");
    }

    #[test]
    fn test_std_logger_emits_one_record_per_print() {
        let capture = CaptureBackend::new();
        let logger = Logger::new("legacy", Arc::new(capture.clone()));
        let std_logger = logger.std_logger(Level::Error);

        assert_eq!(std_logger.level(), Level::Error);
        assert_eq!(std_logger.prefix(), b"error\x1f");

        std_logger.print(format_args!("failed after {} attempts", 3));
        std_logger.print(format_args!("second line\n"));

        let records = capture.records();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.level == Level::Error));
        assert_eq!(capture.messages(), ["failed after 3 attempts", "second line"]);
    }

    #[test]
    fn test_std_logger_debug_passes_threshold_zero() {
        let capture = CaptureBackend::new();
        let logger = Logger::new("legacy", Arc::new(capture.clone()));

        logger.std_logger(Level::Debug).print(format_args!("tier zero"));

        assert_eq!(capture.records()[0].full_level(), "debug.0");
    }
}
