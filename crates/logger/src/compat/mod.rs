//! Bridges from the `log` and `tracing` ecosystems into a [`Logger`](crate::Logger)

#[cfg(feature = "log-compat")]
pub mod log_bridge;

#[cfg(feature = "tracing-compat")]
pub mod tracing_bridge;

#[cfg(feature = "log-compat")]
pub use log_bridge::{LogBridge, init_log_bridge};

#[cfg(feature = "tracing-compat")]
pub use tracing_bridge::{TracingBridge, init_tracing_bridge};
