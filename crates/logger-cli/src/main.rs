//! CLI binary emitting a sample of every kind of log record.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::path::PathBuf;

use clap::Parser;
use ember_logger::compat::{init_log_bridge, init_tracing_bridge};
use ember_logger::{
    BackendType, Data, JsonBackendConfig, Level, Logger, LoggerConfig, TerminalBackendConfig, data,
    debug, error, info, info_data,
};

/// Debug threshold when neither a flag nor a configuration file sets one
const DEMO_DEBUG_LEVEL: u32 = 1;

/// CLI-specific error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Logger construction error
    #[error(transparent)]
    Logger(#[from] ember_logger::Error),

    /// `log` bridge installation error
    #[error("log bridge error: {0}")]
    LogBridge(#[from] log::SetLoggerError),

    /// tracing bridge installation error
    #[error("tracing bridge error: {0}")]
    TracingBridge(#[from] tracing::subscriber::SetGlobalDefaultError),
}

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Backend to render with; overrides the configuration file
    #[arg(long, env = "EMBER_LOG_BACKEND")]
    backend: Option<BackendType>,

    /// Configuration file (.toml or .json)
    #[arg(long, env = "EMBER_LOG_CONFIG")]
    config: Option<PathBuf>,

    /// Highest debug sub-level to emit; overrides the configuration file,
    /// defaults to 1 without one
    #[arg(long, env = "EMBER_LOG_DEBUG_LEVEL")]
    debug_level: Option<u32>,

    /// Root domain of the demo logger
    #[arg(long, default_value = "demo")]
    domain: String,

    /// Disable colors in terminal output
    #[arg(long)]
    no_color: bool,
}

impl Args {
    /// Merge the configuration file with the command line flags
    fn logger_config(&self) -> Result<LoggerConfig, Error> {
        let mut config = match &self.config {
            Some(path) => LoggerConfig::from_file(path)?,
            None => LoggerConfig::default(),
        };

        if let Some(backend) = self.backend {
            config.backend_type = Some(backend);
        }
        if config.backend_type.is_none() {
            config.backend_type = Some(BackendType::Terminal);
        }
        match (self.debug_level, &self.config) {
            (Some(debug_level), _) => config.debug_level = debug_level,
            (None, None) => config.debug_level = DEMO_DEBUG_LEVEL,
            (None, Some(_)) => {}
        }

        let terminal = config
            .terminal_backend
            .get_or_insert_with(|| TerminalBackendConfig {
                color: true,
                ..Default::default()
            });
        if self.no_color {
            terminal.color = false;
        }
        config
            .json_backend
            .get_or_insert_with(JsonBackendConfig::default);

        Ok(config)
    }
}

fn run_demo(logger: &Logger) {
    debug!(logger, 1, "debug message at sub-level {}", 1);
    debug!(logger, 2, "debug message at sub-level {}", 2);
    info!(logger, "informational message");
    info_data!(logger, data! { "a" => 42, "b" => "hello" }, "informational message with data");
    error!(logger, "error message");

    let child = logger.child("child", data! { "x" => "y" });
    info!(child, "message from a child logger");

    child
        .std_logger(Level::Info)
        .print(format_args!("line from an unstructured producer"));
}

fn main() -> Result<(), Error> {
    let args = Args::parse();

    let config = args.logger_config()?;
    let logger = Logger::from_config(args.domain.as_str(), &config)?;

    run_demo(&logger);

    init_log_bridge(logger.child("log", Data::new()))?;
    log::warn!(target: "ember_log_demo", "record from the log crate");

    init_tracing_bridge(logger.child("tracing", Data::new()))?;
    let span = tracing::info_span!("demo");
    let _entered = span.enter();
    tracing::info!(answer = 42, "event from tracing");

    Ok(())
}
