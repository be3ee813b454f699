//! Logging initialization for the CLI.

use std::io::{self, IsTerminal};

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use typed_storage::config::{LogFormat, LoggingConfig};

/// Install a stderr subscriber described by `config`.
///
/// Log lines go to stderr so command output on stdout stays clean.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| LoggingError::InvalidFilter(e.to_string()))?;

    let installed = match config.format {
        LogFormat::Text => {
            let layer = fmt::layer()
                .with_ansi(io::stderr().is_terminal())
                .with_span_events(FmtSpan::NONE)
                .with_writer(io::stderr);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::NONE)
                .with_writer(io::stderr);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.without_time())
                    .try_init()
            }
        }
    };

    installed.map_err(|e| LoggingError::Install(e.to_string()))
}

/// Errors that can occur during logging initialization.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Failed to install log subscriber: {0}")]
    Install(String),
}
