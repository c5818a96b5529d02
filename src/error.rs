//! Error types for the telemetry pipeline.
//!
//! A log line that fails to parse is *not* an error — per-line rejection is
//! part of the grammar contract and surfaces as `None` from the parser.
//! Errors here cover the things that can actually interrupt a refresh:
//! unreadable files (other than a missing log, which yields an empty series),
//! malformed settings, and terminal failures.

use std::io;
use thiserror::Error;

/// Error type for statscope operations.
#[derive(Debug, Error)]
pub enum StatscopeError {
    /// Reading the log file failed for a reason other than it not existing.
    #[error("failed to read log file '{path}': {source}")]
    LogRead {
        /// Path of the log file.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Settings parsing error with line number.
    #[error("settings error at line {line}: {message}")]
    SettingsParse {
        /// Line number where the error occurred (1-indexed, 0 if unknown).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Settings file not found.
    #[error("settings file not found: {0}")]
    SettingsNotFound(String),

    /// Appending a sample to the log failed.
    #[error("failed to append to log file '{path}': {source}")]
    LogAppend {
        /// Path of the log file.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Terminal initialization or rendering error.
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

/// Result type alias for statscope operations.
pub type Result<T> = std::result::Result<T, StatscopeError>;
