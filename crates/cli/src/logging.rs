//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr so stdout stays free for command output.
//! `RUST_LOG` takes precedence over the level chosen on the command line.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Configuration for diagnostic logging.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// JSON lines instead of human-readable text
    pub json_format: bool,
    /// Level used when `RUST_LOG` is not set
    pub default_level: Level,
}

impl LoggingConfig {
    pub fn from_flags(verbose: bool, json_format: bool) -> Self {
        let default_level = if verbose { Level::INFO } else { Level::WARN };
        Self { json_format, default_level }
    }
}

/// Install the global subscriber. Later calls have no effect.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_level.to_string()));

    if config.json_format {
        let layer = fmt::layer().json().with_writer(std::io::stderr);
        let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
    } else {
        let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
        let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
    }
}
