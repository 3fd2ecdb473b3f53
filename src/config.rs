//! Logger configuration.
//!
//! [`LoggerConfig`] replaces the process-wide switches (log file path, date
//! prefixing, debug and timing output) with a value that is resolved once
//! and handed to the [`Logger`](crate::Logger) at construction time.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Returns true if the environment variable is set to exactly `1`.
pub(crate) fn env_flag(name: &str) -> bool {
    std::env::var(name).map(|v| v == "1").unwrap_or(false)
}

/// Returns true if the environment variable is set to a non-empty value.
pub(crate) fn env_set(name: &str) -> bool {
    std::env::var_os(name).map(|v| !v.is_empty()).unwrap_or(false)
}

/// Behaviour switches for a [`Logger`](crate::Logger).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Mirror every log line to this file (created if missing, appended to).
    pub log_file: Option<PathBuf>,

    /// Prefix every write with `[<timestamp>] `.
    pub prepend_date: bool,

    /// Emit `Debug` lines. Defaults to `DEBUG` being non-empty.
    pub debug: bool,

    /// Emit `Timing` lines. Defaults to `DEBUG_TIMING` being non-empty.
    pub timing: bool,

    /// Draw the progress bar even when the output is not a terminal.
    pub force_progress_bar: bool,
}

impl LoggerConfig {
    /// Read the switches that have environment variables.
    ///
    /// `DEBUG` and `DEBUG_TIMING` enable their levels when non-empty;
    /// `FORCE_PROGRESS_BAR=1` forces the progress bar. The log file and date
    /// prefix have no environment counterpart and start disabled.
    pub fn from_env() -> Self {
        Self {
            log_file: None,
            prepend_date: false,
            debug: env_set("DEBUG"),
            timing: env_set("DEBUG_TIMING"),
            force_progress_bar: env_flag("FORCE_PROGRESS_BAR"),
        }
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn with_prepend_date(mut self, enabled: bool) -> Self {
        self.prepend_date = enabled;
        self
    }

    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    pub fn with_timing(mut self, enabled: bool) -> Self {
        self.timing = enabled;
        self
    }

    pub fn with_force_progress_bar(mut self, enabled: bool) -> Self {
        self.force_progress_bar = enabled;
        self
    }
}
