use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by taskmon.
#[derive(Error, Debug)]
pub enum TaskmonError {
    /// A log file could not be opened or read from disk.
    #[error("Failed to read log {path}: {source}")]
    LogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input source (file, directory or serial device) does not exist or
    /// could not be opened.
    #[error("Input source not available: {0}")]
    SourceUnavailable(PathBuf),

    /// No log files were found under the given directory.
    #[error("No log files found in {0}")]
    NoLogFiles(PathBuf),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the taskmon crates.
pub type Result<T> = std::result::Result<T, TaskmonError>;
