//! # Color Policy and Markup
//!
//! Decides whether ANSI colors are emitted and implements the bracketed
//! color markup used in log messages.
//!
//! ## Markup Syntax
//!
//! Messages may contain tokens such as `[red]`, `[bold]`, `[dim]` or
//! `[reset]`. Each known token is replaced by the matching ANSI SGR
//! sequence; unknown tokens are left untouched so that text like `[v1.2]`
//! survives. Background colors are written with surrounding underscores,
//! e.g. `[_blue_]`.
//!
//! ```rust
//! use labellog::color::{colorize, strip_ansi_str};
//!
//! let styled = colorize("[red]failed[reset] [unknown]");
//! assert_eq!(styled, "\x1b[31mfailed\x1b[0m [unknown]\x1b[0m");
//! assert_eq!(strip_ansi_str(&styled), "failed [unknown]");
//! ```
//!
//! ## Color Resolution
//!
//! Colors are shown when `FORCE_COLOR=1` is set, or when both stdout and
//! stderr are interactive terminals. `NO_COLOR=1` always wins.

use colored::Color;
use regex::bytes::Regex as BytesRegex;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::config::env_flag;

/// Terminal facts that decide how output is rendered.
///
/// Captured once (usually via [`TerminalPolicy::detect`]) and handed to the
/// [`Logger`](crate::Logger), so tests can describe any terminal without
/// touching the process environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TerminalPolicy {
    /// `NO_COLOR=1` was set.
    pub no_color: bool,
    /// `FORCE_COLOR=1` was set.
    pub force_color: bool,
    /// Both stdout and stderr are terminals.
    pub interactive: bool,
}

impl TerminalPolicy {
    /// Snapshot the current process environment and terminal state.
    pub fn detect() -> Self {
        Self {
            no_color: env_flag("NO_COLOR"),
            force_color: env_flag("FORCE_COLOR"),
            interactive: is_interactive_terminal(),
        }
    }

    /// An interactive terminal with no environment overrides.
    pub fn interactive() -> Self {
        Self {
            interactive: true,
            ..Self::default()
        }
    }

    /// Non-interactive output (pipes, files, CI) with no overrides.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Returns true if ANSI escape codes should be written.
    pub fn showing_colors(&self) -> bool {
        if self.no_color {
            return false;
        }
        if self.force_color {
            return true;
        }
        self.interactive
    }
}

/// Returns true if colors (ANSI escape codes) should be printed for the
/// current process.
///
/// `NO_COLOR=1` disables colors and `FORCE_COLOR=1` forces them; otherwise
/// colors are shown only on an interactive terminal.
pub fn showing_colors() -> bool {
    TerminalPolicy::detect().showing_colors()
}

/// Returns true if both stdout and stderr are attached to a terminal.
pub fn is_interactive_terminal() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}

fn markup_regex() -> &'static Regex {
    static MARKUP: OnceLock<Regex> = OnceLock::new();
    MARKUP.get_or_init(|| Regex::new(r"(?i)\[[a-z0-9_-]+\]").expect("markup pattern is valid"))
}

fn ansi_regex() -> &'static BytesRegex {
    static ANSI: OnceLock<BytesRegex> = OnceLock::new();
    ANSI.get_or_init(|| BytesRegex::new(r"\x1b\[[0-9;]*m").expect("ansi pattern is valid"))
}

/// Attribute tokens that are not colors.
fn attribute_code(name: &str) -> Option<&'static str> {
    let code = match name {
        "reset" => "0",
        "bold" => "1",
        "dim" => "2",
        "underline" => "4",
        "blink_slow" => "5",
        "blink_fast" => "6",
        "invert" => "7",
        "hidden" => "8",
        "reset_bold" => "21",
        "default" => "39",
        "_default_" => "49",
        _ => return None,
    };
    Some(code)
}

/// Map a markup color name onto a [`colored::Color`].
///
/// The markup uses `light_*` for the bright palette; `white` is the bright
/// white and `light_gray` the regular one.
fn parse_color(name: &str) -> Option<Color> {
    let canonical: Cow<'_, str> = match name {
        "light_gray" => "white".into(),
        "dark_gray" => "bright black".into(),
        "white" => "bright white".into(),
        "purple" => return None,
        other => match other.strip_prefix("light_") {
            Some(base) => format!("bright {}", base).into(),
            None => other.into(),
        },
    };
    canonical.parse().ok()
}

/// Resolve a markup token name (without brackets) to its SGR parameter.
pub fn markup_code(name: &str) -> Option<Cow<'static, str>> {
    // Token names are case sensitive even though the scanner is not.
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        return None;
    }
    if let Some(code) = attribute_code(name) {
        return Some(Cow::Borrowed(code));
    }

    let background = name
        .strip_prefix('_')
        .and_then(|inner| inner.strip_suffix('_'));
    match background {
        Some(inner) => parse_color(inner).map(|color| color.to_bg_str()),
        None => parse_color(name).map(|color| color.to_fg_str()),
    }
}

/// Expand color markup into ANSI escape sequences.
///
/// A trailing reset is appended when at least one token was expanded, so
/// styling never leaks past the end of the string.
pub fn colorize(text: &str) -> String {
    let mut styled = false;
    let expanded = markup_regex().replace_all(text, |caps: &Captures<'_>| {
        let token = &caps[0];
        match markup_code(&token[1..token.len() - 1]) {
            Some(code) => {
                styled = true;
                format!("\x1b[{}m", code)
            }
            None => token.to_string(),
        }
    });

    let mut result = expanded.into_owned();
    if styled {
        result.push_str("\x1b[0m");
    }
    result
}

/// Remove ANSI color sequences (`ESC [ <params> m`) from a byte stream.
pub fn strip_ansi(bytes: &[u8]) -> Cow<'_, [u8]> {
    ansi_regex().replace_all(bytes, &b""[..])
}

/// String flavour of [`strip_ansi`].
pub fn strip_ansi_str(text: &str) -> String {
    String::from_utf8_lossy(&strip_ansi(text.as_bytes())).into_owned()
}
