//! Logger configuration

use crate::error::{Error, Result};
use crate::Backend;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

#[cfg(feature = "json")]
pub use crate::json::JsonBackendConfig;
#[cfg(feature = "terminal")]
pub use crate::terminal::TerminalBackendConfig;

/// Kind of backend a configuration selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// Human-readable lines
    Terminal,
    /// One JSON object per line
    Json,
}

impl BackendType {
    /// The configuration name of the backend type
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Terminal => "terminal",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "terminal" => Ok(Self::Terminal),
            "json" => Ok(Self::Json),
            "" => Err(Error::MissingBackendType),
            other => Err(Error::InvalidBackendType(other.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for BackendType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Configuration of a root logger.
///
/// ```toml
/// backend_type = "json"
/// debug_level = 2
///
/// [json_backend]
/// message_key = "message"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    /// Which backend to build
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_type: Option<BackendType>,

    /// Highest debug sub-level to emit
    pub debug_level: u32,

    /// Settings for [`BackendType::Terminal`]
    #[cfg(feature = "terminal")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal_backend: Option<TerminalBackendConfig>,

    /// Settings for [`BackendType::Json`]
    #[cfg(feature = "json")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_backend: Option<JsonBackendConfig>,
}

impl LoggerConfig {
    /// Parse a TOML document
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for malformed documents, and the
    /// backend type errors for an empty or unknown `backend_type`.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let table: toml::Table =
            toml::from_str(source).map_err(|e| Error::InvalidConfig(e.message().to_string()))?;
        check_backend_type(table.get("backend_type").and_then(toml::Value::as_str))?;

        toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| Error::InvalidConfig(e.message().to_string()))
    }

    /// Parse a JSON document
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for malformed documents, and the
    /// backend type errors for an empty or unknown `backend_type`.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(source).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        check_backend_type(value.get("backend_type").and_then(serde_json::Value::as_str))?;

        serde_json::from_value(value).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Read a `.toml` or `.json` file
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, has another extension, or does not
    /// parse.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&source),
            Some("json") => Self::from_json_str(&source),
            _ => Err(Error::InvalidConfig(format!(
                "unsupported configuration file {}",
                path.display()
            ))),
        }
    }

    /// Instantiate the configured backend.
    ///
    /// # Errors
    ///
    /// Fails if the backend type is missing, if its configuration block is
    /// absent or invalid, or if its support was not compiled in.
    pub fn build_backend(&self) -> Result<Arc<dyn Backend>> {
        let backend_type = self.backend_type.ok_or(Error::MissingBackendType)?;

        match backend_type {
            BackendType::Terminal => self.build_terminal_backend(),
            BackendType::Json => self.build_json_backend(),
        }
    }

    #[cfg(feature = "terminal")]
    fn build_terminal_backend(&self) -> Result<Arc<dyn Backend>> {
        let config = self
            .terminal_backend
            .clone()
            .ok_or(Error::MissingBackendConfig(BackendType::Terminal))?;

        Ok(Arc::new(crate::TerminalBackend::try_new(config)?))
    }

    #[cfg(not(feature = "terminal"))]
    fn build_terminal_backend(&self) -> Result<Arc<dyn Backend>> {
        Err(Error::BackendDisabled(BackendType::Terminal))
    }

    #[cfg(feature = "json")]
    fn build_json_backend(&self) -> Result<Arc<dyn Backend>> {
        let config = self
            .json_backend
            .clone()
            .ok_or(Error::MissingBackendConfig(BackendType::Json))?;

        Ok(Arc::new(crate::JsonBackend::new(config)?))
    }

    #[cfg(not(feature = "json"))]
    fn build_json_backend(&self) -> Result<Arc<dyn Backend>> {
        Err(Error::BackendDisabled(BackendType::Json))
    }
}

/// Surface backend type errors as such instead of as parse failures
fn check_backend_type(name: Option<&str>) -> Result<()> {
    match name {
        Some(name) => name.parse::<BackendType>().map(drop),
        None => Ok(()),
    }
}
