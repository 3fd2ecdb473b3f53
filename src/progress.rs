//! # Progress Bar Controller
//!
//! Owns at most one [`indicatif::ProgressBar`] per logger. The bar lives in a
//! [`ProgressSlot`] that the writer pipeline also holds, so log lines written
//! while the bar is running are routed around it (see
//! [`ProgressBypass`](crate::writer::ProgressBypass)).
//!
//! ## Lifecycle
//!
//! ```text
//! absent --start--> running --stop / completed increment--> absent
//! ```
//!
//! Operations on an absent bar are no-ops. Whether a bar may be started at
//! all (interactive output, forcing) is decided by the [`Logger`](crate::Logger).

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle, TermLike};
use std::io;

use crate::color::{colorize, strip_ansi_str};
use crate::defaults::{BAR_WIDTH, REFRESH_HZ};
use crate::error::{LogError, LogResult};
use crate::format::pad_verb;
use crate::writer::ProgressSlot;

/// Fill, head and empty glyphs of the bar.
pub const BAR_CHARS: &str = "=> ";

/// Where progress bars are drawn.
pub enum BarTarget {
    /// stderr; forced bars on a non-terminal go through [`ForcedTerm`].
    Stderr,
    /// Caller supplied draw target, created once per bar.
    Custom(Box<dyn Fn() -> ProgressDrawTarget + Send + Sync>),
}

impl BarTarget {
    fn draw_target(&self, terminal: bool) -> ProgressDrawTarget {
        match self {
            BarTarget::Stderr if terminal => ProgressDrawTarget::stderr_with_hz(REFRESH_HZ),
            BarTarget::Stderr => ProgressDrawTarget::term_like(Box::new(ForcedTerm::stderr())),
            BarTarget::Custom(make) => make(),
        }
    }
}

impl std::fmt::Debug for BarTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BarTarget::Stderr => write!(f, "Stderr"),
            BarTarget::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// A stderr terminal that draws even when stderr is not a TTY.
///
/// indicatif skips drawing to non-terminals; this wrapper is used when the
/// bar is explicitly forced.
#[derive(Debug)]
pub struct ForcedTerm {
    term: console::Term,
}

impl ForcedTerm {
    pub fn stderr() -> Self {
        Self {
            term: console::Term::stderr(),
        }
    }
}

impl TermLike for ForcedTerm {
    fn width(&self) -> u16 {
        self.term.size().1
    }

    fn move_cursor_up(&self, n: usize) -> io::Result<()> {
        self.term.move_cursor_up(n)
    }

    fn move_cursor_down(&self, n: usize) -> io::Result<()> {
        self.term.move_cursor_down(n)
    }

    fn move_cursor_right(&self, n: usize) -> io::Result<()> {
        self.term.move_cursor_right(n)
    }

    fn move_cursor_left(&self, n: usize) -> io::Result<()> {
        self.term.move_cursor_left(n)
    }

    fn write_line(&self, s: &str) -> io::Result<()> {
        self.term.write_line(s)
    }

    fn write_str(&self, s: &str) -> io::Result<()> {
        self.term.write_str(s)
    }

    fn clear_line(&self) -> io::Result<()> {
        self.term.clear_line()
    }

    fn flush(&self) -> io::Result<()> {
        self.term.flush()
    }
}

/// Expand markup, dropping the escape codes again when colors are off.
fn styled(markup: &str, colors: bool) -> String {
    let expanded = colorize(markup);
    if colors {
        expanded
    } else {
        strip_ansi_str(&expanded)
    }
}

/// Text left of the bar: the padded verb, bold and colored when colors are on.
pub fn render_prefix(verb: &str, color: &str, colors: bool) -> String {
    if colors {
        colorize(&format!("[{}][bold]{}[reset]", color, pad_verb(verb)))
    } else {
        pad_verb(verb)
    }
}

/// Text right of the counter: the message followed by dimmed details.
pub fn render_suffix(message: &str, details: &[&str], colors: bool) -> String {
    styled(
        &format!("{} [dim]{}[reset]", message, details.join(" ")),
        colors,
    )
}

fn bar_style() -> LogResult<ProgressStyle> {
    let template = format!("{{prefix}} [{{bar:{}}}] {{pos}}/{{len}} {{msg}}", BAR_WIDTH);
    Ok(ProgressStyle::with_template(&template)?.progress_chars(BAR_CHARS))
}

/// Single-bar progress state shared with the writer pipeline.
pub struct ProgressController {
    slot: ProgressSlot,
    colors: bool,
    target: BarTarget,
}

impl ProgressController {
    pub fn new(slot: ProgressSlot, colors: bool, target: BarTarget) -> Self {
        Self {
            slot,
            colors,
            target,
        }
    }

    /// Returns the current bar, if one is running.
    pub fn bar(&self) -> Option<ProgressBar> {
        self.slot.lock().clone()
    }

    pub fn is_active(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Create and show a bar of `total` steps.
    ///
    /// `terminal` says whether the output is an interactive terminal; when it
    /// is not, the bar is drawn through [`ForcedTerm`].
    pub fn start(&self, total: u64, verb: &str, color: &str, terminal: bool) -> LogResult<()> {
        let mut slot = self.slot.lock();
        if slot.is_some() {
            return Err(LogError::ProgressBarActive);
        }

        let bar = ProgressBar::with_draw_target(Some(total), self.target.draw_target(terminal))
            .with_style(bar_style()?);
        bar.set_prefix(render_prefix(verb, color, self.colors));
        bar.set_message(render_suffix("", &[], self.colors));
        *slot = Some(bar);
        Ok(())
    }

    /// True when a bar exists and has reached its total.
    pub fn finished(&self) -> bool {
        match self.bar() {
            Some(bar) => match bar.length() {
                Some(total) if total > 0 => bar.position() >= total,
                _ => false,
            },
            None => false,
        }
    }

    /// Advance the bar by one step.
    ///
    /// A bar that is already complete is stopped instead, after running
    /// `on_done`.
    pub fn increment<F: FnOnce()>(&self, on_done: Option<F>) {
        if self.finished() {
            if let Some(on_done) = on_done {
                on_done();
            }
            self.stop();
            return;
        }

        if let Some(bar) = self.bar() {
            bar.inc(1);
        }
    }

    /// Replace the bar's label and trailing message.
    pub fn update(&self, verb: &str, color: &str, message: &str, details: &[&str]) {
        if let Some(bar) = self.bar() {
            bar.set_prefix(render_prefix(verb, color, self.colors));
            bar.set_message(render_suffix(message, details, self.colors));
        }
    }

    /// Clear the bar from the screen and forget it.
    pub fn stop(&self) {
        let Some(bar) = self.slot.lock().take() else {
            return;
        };
        bar.finish_and_clear();

        if let BarTarget::Stderr = self.target {
            // Erase whatever is left on the bar's line.
            if let Err(err) = console::Term::stderr().clear_line() {
                tracing::trace!(error = %err, "could not erase progress bar line");
            }
        }
    }
}
