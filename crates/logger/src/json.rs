//! Structured JSON backend

use crate::backend::{Output, diagnostic};
use crate::error::{Error, Result};
use crate::timestamp::{format_time, validate_format};
use crate::{Backend, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Default key of the timestamp field
pub const DEFAULT_TIMESTAMP_KEY: &str = "time";
/// Default key of the domain field
pub const DEFAULT_DOMAIN_KEY: &str = "domain";
/// Default key of the level field
pub const DEFAULT_LEVEL_KEY: &str = "level";
/// Default key of the message field
pub const DEFAULT_MESSAGE_KEY: &str = "msg";
/// Default key of the data field
pub const DEFAULT_DATA_KEY: &str = "data";

/// JSON backend settings; every unset key uses its default
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JsonBackendConfig {
    /// Key of the timestamp field
    pub timestamp_key: Option<String>,
    /// chrono format string; RFC 3339 with sub-seconds when unset
    pub timestamp_format: Option<String>,
    /// Key of the domain field
    pub domain_key: Option<String>,
    /// Key of the full level field
    pub level_key: Option<String>,
    /// Key of the message field
    pub message_key: Option<String>,
    /// Key of the data object
    pub data_key: Option<String>,
    /// Where objects go
    pub output: Output,
}

/// Field names after defaults are applied
#[derive(Debug, Clone, PartialEq, Eq)]
struct Keys {
    timestamp: String,
    domain: String,
    level: String,
    message: String,
    data: String,
}

impl Keys {
    fn resolve(config: &JsonBackendConfig) -> Result<Self> {
        let pick = |key: &Option<String>, default: &str| -> String {
            key.as_deref()
                .filter(|k| !k.is_empty())
                .unwrap_or(default)
                .to_string()
        };

        let keys = Self {
            timestamp: pick(&config.timestamp_key, DEFAULT_TIMESTAMP_KEY),
            domain: pick(&config.domain_key, DEFAULT_DOMAIN_KEY),
            level: pick(&config.level_key, DEFAULT_LEVEL_KEY),
            message: pick(&config.message_key, DEFAULT_MESSAGE_KEY),
            data: pick(&config.data_key, DEFAULT_DATA_KEY),
        };

        // Five distinct keys, or a field would silently overwrite another
        let all = keys.all();
        for (i, key) in all.iter().enumerate() {
            if all[..i].contains(key) {
                return Err(Error::DuplicateKey((*key).to_string()));
            }
        }

        Ok(keys)
    }

    fn all(&self) -> [&str; 5] {
        [
            &self.timestamp,
            &self.domain,
            &self.level,
            &self.message,
            &self.data,
        ]
    }
}

/// Backend writing one JSON object per line:
///
/// ```text
/// {"data":{"a":42},"domain":"app.http","level":"info","msg":"served","time":"2024-05-01T10:00:00.250Z"}
/// ```
///
/// A record that cannot be encoded or written is reported on stderr and
/// dropped.
pub struct JsonBackend {
    keys: Keys,
    timestamp_format: Option<String>,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl JsonBackend {
    /// Create a backend writing to the configured standard stream.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::DuplicateKey`] if two fields share a key, or
    /// [`Error::InvalidConfig`] if the timestamp format is invalid.
    pub fn new(config: JsonBackendConfig) -> Result<Self> {
        let sink = config.output.open();
        Self::build(&config, sink)
    }

    /// Create a backend writing to an arbitrary sink; `output` is ignored.
    ///
    /// # Errors
    ///
    /// Same as [`JsonBackend::new`].
    pub fn with_writer(config: JsonBackendConfig, writer: impl Write + Send + 'static) -> Result<Self> {
        Self::build(&config, Box::new(writer))
    }

    fn build(config: &JsonBackendConfig, sink: Box<dyn Write + Send>) -> Result<Self> {
        let keys = Keys::resolve(config)?;

        let timestamp_format = config.timestamp_format.clone().filter(|f| !f.is_empty());
        if let Some(format) = &timestamp_format {
            validate_format(format)?;
        }

        Ok(Self {
            keys,
            timestamp_format,
            sink: Mutex::new(sink),
        })
    }

    fn encode(&self, record: &Record) -> serde_json::Result<Vec<u8>> {
        let mut object = Map::with_capacity(5);

        object.insert(
            self.keys.timestamp.clone(),
            Value::String(format_time(&record.time, self.timestamp_format.as_deref())),
        );
        object.insert(self.keys.domain.clone(), Value::String(record.domain.clone()));
        object.insert(self.keys.level.clone(), Value::String(record.full_level()));
        object.insert(self.keys.message.clone(), Value::String(record.message.clone()));
        object.insert(self.keys.data.clone(), serde_json::to_value(&record.data)?);

        let mut line = serde_json::to_vec(&Value::Object(object))?;
        line.push(b'\n');
        Ok(line)
    }
}

impl Backend for JsonBackend {
    fn render(&self, record: Record) {
        let line = match self.encode(&record) {
            Ok(line) => line,
            Err(e) => {
                diagnostic(format_args!("cannot encode log record {record:?}: {e}"));
                return;
            }
        };

        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = sink.write_all(&line).and_then(|()| sink.flush()) {
            diagnostic(format_args!("cannot write log record: {e}"));
        }
    }
}
