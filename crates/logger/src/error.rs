//! Error types for logger construction

use crate::config::BackendType;

/// Result type for logger construction
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced while building a logger.
///
/// Logging itself never returns an error: once a [`Logger`](crate::Logger)
/// exists, failures are contained inside the backend.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A logger was built without a backend
    #[error("missing logging backend")]
    MissingBackend,

    /// The configuration does not name a backend type
    #[error("missing or empty backend type")]
    MissingBackendType,

    /// The configuration names a backend type that does not exist
    #[error("invalid backend type {0:?}")]
    InvalidBackendType(String),

    /// The block matching the selected backend type is absent
    #[error("missing {0} backend configuration")]
    MissingBackendConfig(BackendType),

    /// The selected backend was not compiled into this build
    #[error("{0} backend support is not enabled in this build")]
    BackendDisabled(BackendType),

    /// Two rendered fields were configured with the same key
    #[error("duplicate field key {0:?}")]
    DuplicateKey(String),

    /// The configuration could not be parsed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error while reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
