//! Error types for the label logger.
//!
//! Logging itself never fails the caller: write errors on the log stream are
//! swallowed and a missing log file degrades to console-only output. The only
//! errors surfaced to callers are usage errors and I/O failures from explicit
//! operations.

use thiserror::Error;

/// Errors returned by [`Logger`](crate::Logger) operations.
#[derive(Error, Debug)]
pub enum LogError {
    /// A progress bar is already running on this logger.
    ///
    /// Only one bar may be live at a time; stop the current one before
    /// starting another.
    #[error("progress bar already started")]
    ProgressBarActive,

    /// The progress bar template was rejected by indicatif.
    #[error("invalid progress bar template: {0}")]
    Template(#[from] indicatif::style::TemplateError),

    /// I/O error while talking to a terminal or file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for results with [`LogError`].
pub type LogResult<T> = Result<T, LogError>;
