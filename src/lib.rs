//! # labellog
//!
//! Labelled, colorized terminal log lines for command-line tools.
//!
//! ```text
//!            Info resolving 3 packages
//!         Warning cache is stale
//!           Error could not reach registry
//!                  connection refused
//! ```
//!
//! ## Features
//!
//! - **Leveled lines**: `Error`, `Warning`, `Info`, `Debug` and `Timing`
//!   labels, right-justified in a fixed column, with multi-line messages
//!   aligned under the message column
//! - **Color markup**: `[red]`, `[bold]`, `[dim]`, `[reset]` and friends
//!   inside messages
//! - **Color policy**: `NO_COLOR=1` / `FORCE_COLOR=1` overrides, otherwise
//!   colors only on interactive terminals; codes are stripped everywhere else
//! - **Log file mirroring** and optional timestamp prefixes
//! - **Progress bar**: a single bar that log lines are routed around
//! - **Error trees**: `anyhow` error chains rendered one cause per line
//!
//! ## Architecture Overview
//!
//! - `color`: terminal policy, markup expansion and ANSI stripping
//! - `format`: pure line, error-tree and list formatting
//! - `writer`: the `Write` decorator pipeline
//! - `progress`: the progress bar controller
//! - `logger`: the [`Logger`] context object tying it together
//! - `logging`: a `tracing` event formatter producing the same lines
//!
//! ## Usage Example
//!
//! ```rust
//! use labellog::{Logger, LoggerConfig, TerminalPolicy};
//!
//! let mut log = Logger::builder()
//!     .config(LoggerConfig::default().with_debug(true))
//!     .policy(TerminalPolicy::plain())
//!     .output(std::io::sink())
//!     .build();
//!
//! log.info("building [bold]docs[reset]");
//! log.debug("only shown with debug enabled");
//! ```

pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod format;
pub mod logger;
pub mod logging;
pub mod progress;
pub mod utils;
pub mod writer;

pub use color::{showing_colors, TerminalPolicy};
pub use config::LoggerConfig;
pub use error::{LogError, LogResult};
pub use format::{format_errors, format_list};
pub use logger::{Level, Logger, LoggerBuilder};
pub use progress::BarTarget;

/// The current version of labellog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed layout values
pub mod defaults {
    /// Width of the right-justified verb column
    pub const VERB_WIDTH: usize = 15;

    /// Width of the progress bar body in characters
    pub const BAR_WIDTH: usize = 30;

    /// Progress bar redraw rate on a terminal
    pub const REFRESH_HZ: u8 = 100;
}
