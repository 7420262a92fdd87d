//! `tracing` subscriber setup.
//!
//! Filter precedence: `--log` / `FREIGHT_LOG`, then `RUST_LOG`, then the
//! per-command default (`info` for `rank`, `warn` for `tui`, `debug` with
//! `--verbose`).

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

pub const DEFAULT_TUI_LOG_FILE: &str = "freight.log";

/// Where log events are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    /// Appended to; the TUI owns the terminal so events cannot go to stderr.
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub filter: Option<String>,
    pub default_level: &'static str,
    pub sink: LogSink,
}

impl LogSettings {
    pub fn new(filter: Option<String>, verbose: bool, interactive: bool) -> Self {
        let default_level = match (verbose, interactive) {
            (true, _) => "debug",
            (false, true) => "warn",
            (false, false) => "info",
        };
        Self {
            filter,
            default_level,
            sink: LogSink::Stderr,
        }
    }

    pub fn with_sink(mut self, sink: LogSink) -> Self {
        self.sink = sink;
        self
    }

    fn env_filter(&self) -> Result<EnvFilter, AppError> {
        if let Some(filter) = &self.filter {
            return EnvFilter::try_new(filter)
                .map_err(|e| AppError::new(2, format!("Invalid log filter '{filter}': {e}")));
        }
        Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_level)))
    }
}

/// Install the global subscriber. Safe to call once per process.
pub fn init(settings: &LogSettings) -> Result<(), AppError> {
    let filter = settings.env_filter()?;

    let result = match &settings.sink {
        LogSink::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .with_writer(std::io::stderr)
            .try_init(),
        LogSink::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| AppError::new(4, format!("Failed to open log file '{}': {e}", path.display())))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    result.map_err(|e| AppError::new(4, format!("Failed to initialize logging: {e}")))
}
