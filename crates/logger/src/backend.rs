//! Backend trait - the single rendering seam

use crate::Record;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};

/// A rendering target for log records.
///
/// Backends are shared by every logger of a tree, possibly across threads.
/// An implementation must make sure concurrent calls to [`render`] never
/// interleave partial output, typically by producing the whole rendered
/// record first and writing it with a single call under a lock.
///
/// Rendering never fails from the caller's point of view: a record that
/// cannot be serialized or written is reported through [`diagnostic`] and
/// dropped.
///
/// [`render`]: Backend::render
pub trait Backend: Send + Sync + 'static {
    /// Render one record
    fn render(&self, record: Record);
}

/// A backend that discards every record
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpBackend;

impl Backend for NoOpBackend {
    #[inline]
    fn render(&self, _record: Record) {}
}

/// Standard stream a backend writes to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    /// Standard error
    #[default]
    Stderr,
    /// Standard output
    Stdout,
}

impl Output {
    /// Open the stream as a boxed writer
    pub fn open(self) -> Box<dyn Write + Send> {
        match self {
            Self::Stderr => Box::new(io::stderr()),
            Self::Stdout => Box::new(io::stdout()),
        }
    }
}

/// Report a backend failure on stderr.
///
/// This is the side channel used when a record is dropped. It writes
/// directly to the process stderr and ignores any error doing so.
pub fn diagnostic(args: fmt::Arguments<'_>) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "ember-logger: {args}");
}
