//! # Label Logger
//!
//! [`Logger`] is the context object every log call goes through. It owns:
//!
//! - the resolved [`LoggerConfig`] and [`TerminalPolicy`],
//! - the writer pipeline built from them (file mirror, date prefix, progress
//!   bypass, ANSI stripping),
//! - the [`ProgressController`] for the single progress bar.
//!
//! Loggers are independent of each other, so tests can run several side by
//! side with their own sinks.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use labellog::Logger;
//!
//! let mut log = Logger::from_env();
//! log.info(format!("resolving [bold]{}[reset] packages", 3));
//!
//! log.start_progress_bar(3, "Fetching", "blue").expect("no bar running yet");
//! for name in ["a", "b", "c"] {
//!     log.update_progress_bar("Fetching", "blue", name, &[]);
//!     log.increment_progress_bar();
//! }
//! log.stop_progress_bar();
//!
//! let err = anyhow::anyhow!("connection refused");
//! log.error_display("could not reach registry", err);
//! ```

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::color::{colorize, TerminalPolicy};
use crate::config::LoggerConfig;
use crate::error::{LogError, LogResult};
use crate::format::{format_errors, render_line, timing_message};
use crate::progress::{BarTarget, ProgressController};
use crate::writer::{build_pipeline, BoxWriter, ProgressSlot};

/// Fixed verb and color pairs for the leveled log calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
    Timing,
}

impl Level {
    pub fn verb(&self) -> &'static str {
        match self {
            Level::Error => "Error",
            Level::Warn => "Warning",
            Level::Info => "Info",
            Level::Debug => "Debug",
            Level::Timing => "Timing",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Level::Error => "red",
            Level::Warn => "yellow",
            Level::Info => "blue",
            Level::Debug => "magenta",
            Level::Timing => "dim",
        }
    }
}

/// Builder for a [`Logger`] with explicit output, terminal and config.
pub struct LoggerBuilder {
    config: LoggerConfig,
    policy: TerminalPolicy,
    output: Option<BoxWriter>,
    bar_target: BarTarget,
}

impl LoggerBuilder {
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn policy(mut self, policy: TerminalPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Base stream for log lines. Defaults to stderr.
    pub fn output<W: Write + Send + 'static>(mut self, output: W) -> Self {
        self.output = Some(Box::new(output));
        self
    }

    /// Where progress bars are drawn. Defaults to stderr.
    pub fn bar_target(mut self, target: BarTarget) -> Self {
        self.bar_target = target;
        self
    }

    pub fn build(self) -> Logger {
        let colors = self.policy.showing_colors();
        let slot: ProgressSlot = Arc::new(Mutex::new(None));
        let base = self
            .output
            .unwrap_or_else(|| Box::new(io::stderr()) as BoxWriter);
        let out = build_pipeline(base, &self.config, colors, Arc::clone(&slot));

        Logger {
            progress: ProgressController::new(slot, colors, self.bar_target),
            config: self.config,
            policy: self.policy,
            out,
        }
    }
}

/// Leveled, labelled logging to a terminal with an optional progress bar.
pub struct Logger {
    config: LoggerConfig,
    policy: TerminalPolicy,
    out: BoxWriter,
    progress: ProgressController,
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder {
            config: LoggerConfig::default(),
            policy: TerminalPolicy::default(),
            output: None,
            bar_target: BarTarget::Stderr,
        }
    }

    /// Logger writing to stderr, configured from the process environment.
    pub fn from_env() -> Self {
        Self::builder()
            .config(LoggerConfig::from_env())
            .policy(TerminalPolicy::detect())
            .build()
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn policy(&self) -> &TerminalPolicy {
        &self.policy
    }

    /// Whether this logger emits ANSI colors.
    pub fn showing_colors(&self) -> bool {
        self.policy.showing_colors()
    }

    // ---- line output -------------------------------------------------

    /// Log a message with a custom verb and color, expanding color markup in
    /// the message.
    pub fn log(&mut self, verb: &str, color: &str, message: impl Display) {
        let message = colorize(&message.to_string());
        self.log_no_formatting(verb, color, message);
    }

    /// Like [`log`](Self::log), but markup in the message is left alone.
    /// Use it for text that did not come from the program itself.
    pub fn log_no_color(&mut self, verb: &str, color: &str, message: impl Display) {
        self.log_no_formatting(verb, color, message);
    }

    /// Write a label line without touching the message at all.
    pub fn log_no_formatting(&mut self, verb: &str, color: &str, message: impl Display) {
        let mut line = render_line(verb, color, &message.to_string());
        line.push('\n');

        if let Err(err) = self.out.write_all(line.as_bytes()) {
            tracing::trace!(error = %err, "dropping log line");
        }
    }

    fn level(&mut self, level: Level, message: impl Display) {
        self.log(level.verb(), level.color(), message);
    }

    /// Log a non-fatal error.
    pub fn error(&mut self, message: impl Display) {
        self.level(Level::Error, message);
    }

    pub fn warn(&mut self, message: impl Display) {
        self.level(Level::Warn, message);
    }

    pub fn info(&mut self, message: impl Display) {
        self.level(Level::Info, message);
    }

    /// Log debug information; a no-op unless debug output is enabled.
    pub fn debug(&mut self, message: impl Display) {
        if !self.config.debug {
            return;
        }
        self.level(Level::Debug, message);
    }

    /// Debug line without markup expansion.
    pub fn debug_no_color(&mut self, message: impl Display) {
        if !self.config.debug {
            return;
        }
        self.log_no_color(Level::Debug.verb(), Level::Debug.color(), message);
    }

    /// Log `err` as an error, wrapped with `context` and rendered as a tree.
    pub fn error_display(&mut self, context: impl Display, err: impl Into<anyhow::Error>) {
        let tree = format_errors(&err.into().context(context.to_string()));
        self.error(tree);
    }

    /// Log `err` as a warning, wrapped with `context` and rendered as a tree.
    pub fn warn_display(&mut self, context: impl Display, err: impl Into<anyhow::Error>) {
        let tree = format_errors(&err.into().context(context.to_string()));
        self.warn(tree);
    }

    // ---- timing ------------------------------------------------------

    /// Log how long `job` took. A no-op unless timing output is enabled.
    pub fn timing(&mut self, job: &str, args: &[&dyn Display], elapsed: Duration) {
        if !self.config.timing {
            return;
        }
        let message = timing_message(job, args, elapsed);
        self.level(Level::Timing, message);
    }

    /// Log the time elapsed since `start`.
    pub fn time_track(&mut self, start: Instant, job: &str, args: &[&dyn Display]) {
        if !self.config.timing {
            return;
        }
        self.timing(job, args, start.elapsed());
    }

    /// Run `f` and log how long it took.
    pub fn timed<T>(&mut self, job: &str, args: &[&dyn Display], f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        self.time_track(start, job, args);
        result
    }

    // ---- progress bar ------------------------------------------------

    /// Start the progress bar.
    ///
    /// Nothing is shown when output is not an interactive terminal, unless
    /// the bar is forced in the config. Starting while a bar is running is
    /// an error.
    pub fn start_progress_bar(&mut self, total: u64, verb: &str, color: &str) -> LogResult<()> {
        if self.progress.is_active() {
            return Err(LogError::ProgressBarActive);
        }

        if self.policy.interactive || self.config.force_progress_bar {
            self.debug("terminal is interactive, starting progress bar");
        } else {
            self.debug("not starting progress bar because not in an interactive terminal");
            return Ok(());
        }

        self.progress
            .start(total, verb, color, self.policy.interactive)
    }

    /// Advance the bar by one, stopping it if it was already complete.
    pub fn increment_progress_bar(&mut self) {
        self.progress.increment(None::<fn()>);
    }

    /// Like [`increment_progress_bar`](Self::increment_progress_bar), running
    /// `on_done` right before a completed bar is stopped.
    pub fn increment_progress_bar_then(&mut self, on_done: impl FnOnce()) {
        self.progress.increment(Some(on_done));
    }

    pub fn progress_bar_finished(&self) -> bool {
        self.progress.finished()
    }

    /// Whether a progress bar is currently running.
    pub fn progress_bar_active(&self) -> bool {
        self.progress.is_active()
    }

    /// Change the bar's label and trailing message; `details` are dimmed.
    pub fn update_progress_bar(&mut self, verb: &str, color: &str, message: &str, details: &[&str]) {
        self.progress.update(verb, color, message, details);
    }

    pub fn stop_progress_bar(&mut self) {
        self.progress.stop();
    }

    /// Flush the writer pipeline, including the log file.
    pub fn flush(&mut self) -> LogResult<()> {
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.progress.stop();
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::strip_ansi_str;
    use indicatif::ProgressDrawTarget;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn logger(config: LoggerConfig, policy: TerminalPolicy) -> (Logger, Capture) {
        let sink = Capture::default();
        let logger = Logger::builder()
            .config(config)
            .policy(policy)
            .output(sink.clone())
            .bar_target(BarTarget::Custom(Box::new(ProgressDrawTarget::hidden)))
            .build();
        (logger, sink)
    }

    fn colored_policy() -> TerminalPolicy {
        TerminalPolicy {
            force_color: true,
            ..TerminalPolicy::default()
        }
    }

    #[test]
    fn test_level_labels() {
        assert_eq!((Level::Error.verb(), Level::Error.color()), ("Error", "red"));
        assert_eq!((Level::Warn.verb(), Level::Warn.color()), ("Warning", "yellow"));
        assert_eq!((Level::Info.verb(), Level::Info.color()), ("Info", "blue"));
        assert_eq!((Level::Debug.verb(), Level::Debug.color()), ("Debug", "magenta"));
    }

    #[test]
    fn test_info_plain_output() {
        let (mut log, sink) = logger(LoggerConfig::default(), TerminalPolicy::plain());
        log.info("hello [bold]world[reset]");
        assert_eq!(sink.text(), "           Info hello world\n");
    }

    #[test]
    fn test_error_colored_output() {
        let (mut log, sink) = logger(LoggerConfig::default(), colored_policy());
        log.error("boom");
        assert_eq!(sink.text(), "\x1b[1m\x1b[31m          Error\x1b[0m\x1b[0m boom\n");
    }

    #[test]
    fn test_no_color_variant_keeps_markup() {
        let (mut log, sink) = logger(LoggerConfig::default(), colored_policy());
        log.log_no_color("Output", "green", "[red] is literal");
        assert!(sink.text().ends_with(" [red] is literal\n"));
    }

    #[test]
    fn test_multiline_messages_are_aligned() {
        let (mut log, sink) = logger(LoggerConfig::default(), TerminalPolicy::plain());
        log.warn("one\ntwo");
        assert_eq!(
            sink.text(),
            format!("        Warning one\n{}two\n", " ".repeat(16))
        );
    }

    #[test]
    fn test_debug_disabled_is_silent() {
        let (mut log, sink) = logger(LoggerConfig::default(), colored_policy());
        log.debug("x");
        log.debug_no_color("y");
        assert_eq!(sink.text(), "");
    }

    #[test]
    fn test_debug_enabled_is_magenta() {
        let (mut log, sink) = logger(LoggerConfig::default().with_debug(true), colored_policy());
        log.debug("x");
        let text = sink.text();
        assert!(text.starts_with("\x1b[1m\x1b[35m          Debug"));
        assert!(text.ends_with(" x\n"));
    }

    #[test]
    fn test_error_display_renders_tree() {
        let (mut log, sink) = logger(LoggerConfig::default(), TerminalPolicy::plain());
        let err = anyhow::anyhow!("c").context("b");
        log.error_display("a", err);
        assert_eq!(
            sink.text(),
            format!("          Error a\n{0} b\n{0}  c\n", " ".repeat(16))
        );
    }

    #[test]
    fn test_warn_display_accepts_std_errors() {
        let (mut log, sink) = logger(LoggerConfig::default(), TerminalPolicy::plain());
        let err = io::Error::new(io::ErrorKind::NotFound, "missing");
        log.warn_display("reading cache", err);
        assert_eq!(
            sink.text(),
            format!("        Warning reading cache\n{} missing\n", " ".repeat(16))
        );
    }

    #[test]
    fn test_timing_only_when_enabled() {
        let (mut log, sink) = logger(LoggerConfig::default(), TerminalPolicy::plain());
        log.timing("job", &[], Duration::from_millis(1));
        assert_eq!(sink.text(), "");

        let (mut log, sink) = logger(LoggerConfig::default().with_timing(true), TerminalPolicy::plain());
        let value = log.timed("compute", &[&"input"], || 41 + 1);
        assert_eq!(value, 42);
        let text = strip_ansi_str(&sink.text());
        assert!(text.starts_with("         Timing compute"));
        assert!(text.contains("(input"));
        assert!(text.contains(" took "));
    }

    #[test]
    fn test_progress_bar_skipped_when_not_interactive() {
        let (mut log, sink) = logger(LoggerConfig::default().with_debug(true), TerminalPolicy::plain());
        log.start_progress_bar(3, "Fetching", "blue").unwrap();
        assert!(!log.progress_bar_active());
        assert!(sink.text().contains("not starting progress bar"));

        // Absent bar: every operation is a harmless no-op.
        log.increment_progress_bar();
        log.update_progress_bar("Fetching", "blue", "x", &[]);
        assert!(!log.progress_bar_finished());
        log.stop_progress_bar();
    }

    #[test]
    fn test_progress_bar_forced() {
        let config = LoggerConfig::default().with_force_progress_bar(true);
        let (mut log, _sink) = logger(config, TerminalPolicy::plain());
        log.start_progress_bar(1, "Fetching", "blue").unwrap();
        assert!(log.progress_bar_active());
    }

    #[test]
    fn test_second_start_is_an_error() {
        let (mut log, _sink) = logger(LoggerConfig::default(), TerminalPolicy::interactive());
        log.start_progress_bar(2, "Fetching", "blue").unwrap();
        let err = log.start_progress_bar(2, "Fetching", "blue").unwrap_err();
        assert!(matches!(err, LogError::ProgressBarActive));
    }

    #[test]
    fn test_increment_runs_callback_on_completion() {
        let (mut log, _sink) = logger(LoggerConfig::default(), TerminalPolicy::interactive());
        log.start_progress_bar(1, "Fetching", "blue").unwrap();

        let mut completed = false;
        log.increment_progress_bar();
        assert!(log.progress_bar_finished());
        log.increment_progress_bar_then(|| completed = true);
        assert!(completed);
        assert!(!log.progress_bar_active());
    }

    #[test]
    fn test_lines_still_written_while_bar_runs() {
        let (mut log, sink) = logger(LoggerConfig::default(), TerminalPolicy::interactive());
        log.start_progress_bar(5, "Fetching", "blue").unwrap();
        log.info("between redraws");
        assert!(strip_ansi_str(&sink.text()).contains("Info between redraws"));
    }
}
