use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::LoggerConfig;
use crate::logger::Level;
use crate::utils::parse_duration;

/// labellog - print labelled, colorized log lines from the shell
#[derive(Parser, Debug, Clone, Default)]
#[clap(version, about, long_about = None)]
pub struct Args {
    /// Message to log; words are joined with spaces
    pub message: Vec<String>,

    /// Level of the line (ignored when --verb is given)
    #[clap(short = 'l', long, value_enum, default_value_t = LevelArg::Info, help_heading = "Line Options")]
    pub level: LevelArg,

    /// Custom label instead of the level's verb
    #[clap(long, help_heading = "Line Options")]
    pub verb: Option<String>,

    /// Color of a custom label
    #[clap(long, default_value = "green", help_heading = "Line Options")]
    pub color: String,

    /// Do not expand [color] markup in the message
    #[clap(long, default_value_t = false, help_heading = "Line Options")]
    pub no_markup: bool,

    /// Also append output to this file
    #[clap(long)]
    pub log_file: Option<PathBuf>,

    /// Prefix every line with a timestamp
    #[clap(long, default_value_t = false)]
    pub prepend_date: bool,

    /// Show debug lines (same as DEBUG=1)
    #[clap(long, default_value_t = false)]
    pub debug: bool,

    /// Show timing lines (same as DEBUG_TIMING=1)
    #[clap(long, default_value_t = false)]
    pub timing: bool,

    /// Draw the progress bar even when not on a terminal (same as FORCE_PROGRESS_BAR=1)
    #[clap(long, default_value_t = false)]
    pub force_progress_bar: bool,

    /// Run a demo progress bar with this many steps
    #[clap(short = 'p', long, help_heading = "Demo Options")]
    pub progress: Option<u64>,

    /// Delay between demo steps (e.g. "50ms", "1s")
    #[clap(long, value_parser = parse_duration, default_value = "50ms", help_heading = "Demo Options")]
    pub step_delay: Duration,

    /// Print the resolved configuration as JSON and exit
    #[clap(long, default_value_t = false)]
    pub print_config: bool,
}

/// Levels selectable from the command line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LevelArg {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl From<LevelArg> for Level {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Error => Level::Error,
            LevelArg::Warn => Level::Warn,
            LevelArg::Info => Level::Info,
            LevelArg::Debug => Level::Debug,
        }
    }
}

impl Args {
    /// The message words as one string.
    pub fn message_text(&self) -> String {
        self.message.join(" ")
    }

    /// Layer the command-line switches over `base`.
    ///
    /// Flags can only turn features on; an environment setting is never
    /// switched off from the command line.
    pub fn apply_to(&self, base: LoggerConfig) -> LoggerConfig {
        LoggerConfig {
            log_file: self.log_file.clone().or(base.log_file),
            prepend_date: base.prepend_date || self.prepend_date,
            debug: base.debug || self.debug,
            timing: base.timing || self.timing,
            force_progress_bar: base.force_progress_bar || self.force_progress_bar,
        }
    }
}
