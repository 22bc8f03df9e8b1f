//! Diagnostics via `tracing` and `tracing-subscriber`.
//!
//! Library code only emits events; the binary installs the subscriber once at
//! startup. Events go to stderr so command output on stdout stays clean.
//!
//! # Levels
//!
//! - `error`: clipboard write failures
//! - `warn`: rejected input files
//! - `info`: command progress
//! - `debug`: viewer, reveal, and page-context state transitions
//! - `trace`: inputs ignored by a state machine
//!
//! `RUST_LOG` overrides the level chosen from `-v`.

use tracing::Level;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    /// Include the module path in each line.
    pub with_target: bool,
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            with_target: false,
            with_ansi: true,
        }
    }
}

impl LogConfig {
    /// Map a `-v` count to a level.
    ///
    /// - 0: warn
    /// - 1 (`-v`): info
    /// - 2 (`-vv`): debug
    /// - 3+ (`-vvv`): trace
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            // Module paths only help once state transitions are visible.
            with_target: verbosity >= 2,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }
}

/// Install the global subscriber writing to stderr.
pub fn init_logging(config: &LogConfig) -> Result<(), TryInitError> {
    init_logging_with_writer(config, std::io::stderr)
}

/// Install the global subscriber with a custom writer.
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W) -> Result<(), TryInitError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config.level)));
    let layer = fmt::layer()
        .compact()
        .with_writer(writer)
        .with_ansi(config.with_ansi)
        .with_target(config.with_target)
        .without_time();

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
}

/// Our crate at `level`, everything else at warn.
fn default_directives(level: Level) -> String {
    let level = level.as_str().to_lowercase();
    format!("warn,folio={level}")
}
