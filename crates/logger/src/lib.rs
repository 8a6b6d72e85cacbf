//! Minimal structured logging core.
//!
//! A [`Logger`] carries a dotted domain, a set of [`Data`] fields and a
//! debug verbosity threshold. Children extend the domain and merge their
//! fields over the parent's; every emitted record goes to one shared
//! [`Backend`] which renders it as a terminal line or a JSON object.
//!
//! ```
//! use ember_logger::{Backend, Logger, Record, data, info};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Default)]
//! struct Lines(Mutex<Vec<String>>);
//!
//! impl Backend for Lines {
//!     fn render(&self, record: Record) {
//!         let line = format!("{} {} {}", record.full_level(), record.domain, record.message);
//!         self.0.lock().unwrap().push(line);
//!     }
//! }
//!
//! let lines = Arc::new(Lines::default());
//! let root = Logger::new("app", lines.clone());
//! let http = root.child("http", data! { "port" => 8080 });
//!
//! info!(http, "listening on {}", 8080);
//!
//! assert_eq!(lines.0.lock().unwrap()[0], "info app.http listening on 8080");
//! ```
//!
//! Unstructured text producers can write through [`LogWriter`] or
//! [`StdLogger`]; a leading `<level>\x1F` prefix selects the level.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

mod backend;
mod config;
mod data;
mod error;
mod logger;
mod message;
mod timestamp;
pub mod writer;

#[cfg(feature = "json")]
mod json;
#[cfg(feature = "terminal")]
mod terminal;

#[cfg(any(feature = "log-compat", feature = "tracing-compat"))]
pub mod compat;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use backend::{Backend, NoOpBackend, Output, diagnostic};
pub use config::{BackendType, LoggerConfig};
pub use data::{Data, Datum, merge_data};
pub use error::{Error, Result};
pub use logger::{Logger, LoggerBuilder};
pub use message::{FORMAT_ERROR_MARKER, Level, Message, Record, UnknownLevel, format_message};
pub use writer::{LogWriter, StdLogger};

#[cfg(feature = "json")]
pub use json::{JsonBackend, JsonBackendConfig};
#[cfg(feature = "terminal")]
pub use terminal::{TerminalBackend, TerminalBackendConfig};
