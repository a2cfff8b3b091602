//! Error types for the Rust Payments Reconciler
//!
//! The reconciliation core never fails on bad log input: malformed payloads
//! become parse-error markers and unmatched entries become orphan pairs.
//! The errors below are the session-level failures around it.
//!
//! # Error Categories
//!
//! - **Input Errors**: Missing log files, unreadable files
//! - **Output Errors**: CSV or JSON serialization failures
//! - **Session Errors**: Runtime construction failures, invalid configuration

use thiserror::Error;

/// Main error type for a reconciliation session
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconcileError {
    /// Log file not found at the specified path
    ///
    /// This is a fatal error that prevents the session from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading a log or writing output
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// Normalized transactions could not be serialized
    #[error("Output error ({format}): {message}")]
    OutputError {
        /// Output format being written
        format: String,
        /// Description of the serialization error
        message: String,
    },

    /// The async runtime or one of its tasks failed
    #[error("Runtime error: {message}")]
    RuntimeError {
        /// Description of the runtime failure
        message: String,
    },

    /// No log file was given for either channel
    #[error("No input: at least one of --fixed-field or --json is required")]
    NoInput,
}

impl From<std::io::Error> for ReconcileError {
    fn from(error: std::io::Error) -> Self {
        ReconcileError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for ReconcileError {
    fn from(error: csv::Error) -> Self {
        ReconcileError::output("csv", error)
    }
}

impl From<serde_json::Error> for ReconcileError {
    fn from(error: serde_json::Error) -> Self {
        ReconcileError::output("jsonl", error)
    }
}

impl ReconcileError {
    /// Create a FileNotFound error
    pub fn file_not_found(path: &std::path::Path) -> Self {
        ReconcileError::FileNotFound {
            path: path.display().to_string(),
        }
    }

    /// Create an OutputError
    pub fn output(format: &str, error: impl std::fmt::Display) -> Self {
        ReconcileError::OutputError {
            format: format.to_string(),
            message: error.to_string(),
        }
    }

    /// Create a RuntimeError
    pub fn runtime(error: impl std::fmt::Display) -> Self {
        ReconcileError::RuntimeError {
            message: error.to_string(),
        }
    }
}
