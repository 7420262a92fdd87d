use std::path::{Path, PathBuf};

use thiserror::Error;

/// Front-end error: a process exit code plus a user-facing message.
///
/// Exit codes:
/// - `2`: input problems (missing/unreadable workbook, bad config, bad flags)
/// - `3`: nothing left to score after cleaning and joining
/// - `4`: terminal/runtime failures
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Typed failures of the data loader. Every variant is terminal for the run.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LoadError {
    #[error("Source workbook not found (tried: {}).", fmt_paths(.tried))]
    SourceNotFound { tried: Vec<PathBuf> },

    #[error("Failed to parse workbook '{}': {reason}", .path.display())]
    ParseFailure { path: PathBuf, reason: String },

    #[error(
        "No carriers left to score in '{}' ({values_kept} priced rows, {lead_times_kept} lead-time rows, none matched by name).",
        .path.display()
    )]
    EmptyAfterFiltering {
        path: PathBuf,
        values_kept: usize,
        lead_times_kept: usize,
    },
}

impl LoadError {
    pub fn parse(path: &Path, reason: impl Into<String>) -> Self {
        LoadError::ParseFailure {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        let exit_code = match err {
            LoadError::SourceNotFound { .. } | LoadError::ParseFailure { .. } => 2,
            LoadError::EmptyAfterFiltering { .. } => 3,
        };
        AppError::new(exit_code, err.to_string())
    }
}

fn fmt_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("'{}'", p.display()))
        .collect::<Vec<_>>()
        .join(", ")
}
