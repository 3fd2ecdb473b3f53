//! # Line and Error Formatting
//!
//! Pure string builders used by the [`Logger`](crate::Logger):
//!
//! - **Label lines**: the verb right-justified in a fixed field, styled bold
//!   and colored, followed by the message with continuation lines aligned
//!   under the message column.
//! - **Error trees**: an error chain split on `": "` and rendered one cause
//!   per line, each indented one space deeper than the previous.
//! - **Lists and timing lines**: small helpers for common message shapes.
//!
//! ```text
//!           Error could not open config
//!                 with a second line aligned here
//! ```

use std::fmt::Display;
use std::time::Duration;

use crate::color::colorize;
use crate::defaults::VERB_WIDTH;
use crate::utils::format_duration;

/// Right-justify a verb in the fixed label field.
pub fn pad_verb(verb: &str) -> String {
    format!("{:>width$}", verb, width = VERB_WIDTH)
}

/// Indent every line after the first by `size` spaces.
pub fn indent_subsequent(size: usize, text: &str) -> String {
    let indentation = " ".repeat(size);
    text.replace('\n', &format!("\n{}", indentation))
}

/// Build the bold, colored label for a verb.
pub fn render_label(verb: &str, color: &str) -> String {
    colorize(&format!("[bold][{}]{}[reset]", color, pad_verb(verb)))
}

/// Render a complete log line (without the trailing newline).
///
/// The message is used as-is; callers decide whether markup in it gets
/// expanded.
pub fn render_line(verb: &str, color: &str, message: &str) -> String {
    format!(
        "{} {}",
        render_label(verb, color),
        indent_subsequent(VERB_WIDTH + 1, message)
    )
}

/// Render an error chain as an indented tree.
///
/// The error's alternate form is used, which for `anyhow::Error` includes
/// every cause joined by `": "`. Each segment goes on its own line,
/// indented by its depth in the chain.
///
/// ```rust
/// use labellog::format::format_errors;
///
/// let err = anyhow::anyhow!("c").context("b").context("a");
/// assert_eq!(format_errors(&err), "a\n b\n  c");
/// ```
pub fn format_errors<E>(err: &E) -> String
where
    E: Display + ?Sized,
{
    format_error_chain(&format!("{:#}", err))
}

/// Render an already flattened `"outer: inner: cause"` message as a tree.
pub fn format_error_chain(chain: &str) -> String {
    chain
        .split(": ")
        .enumerate()
        .map(|(depth, cause)| format!("{}{}", " ".repeat(depth), cause))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format each item and join them with `separator`.
///
/// ```rust
/// use labellog::format::format_list;
///
/// let tags = ["alpha", "beta"];
/// assert_eq!(format_list(&tags, |t| format!("[bold]{}[reset]", t), ", "),
///            "[bold]alpha[reset], [bold]beta[reset]");
/// ```
pub fn format_list<S, F>(items: &[S], format: F, separator: &str) -> String
where
    S: AsRef<str>,
    F: Fn(&str) -> String,
{
    items
        .iter()
        .map(|item| format(item.as_ref()))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Markup for a `Timing` line: job name, its arguments and the elapsed time.
pub fn timing_message(job: &str, args: &[&dyn Display], elapsed: Duration) -> String {
    let formatted_args = args
        .iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "[bold]{:<30}[reset][dim]([reset]{:<50}[dim])[reset] took [yellow]{}",
        job,
        formatted_args,
        format_duration(elapsed)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::strip_ansi_str;

    #[test]
    fn test_pad_verb() {
        assert_eq!(pad_verb("Info"), "           Info");
        assert_eq!(pad_verb("Info").len(), 15);
        // Longer verbs are not truncated.
        assert_eq!(pad_verb("AVeryLongVerbIndeed"), "AVeryLongVerbIndeed");
    }

    #[test]
    fn test_render_label_styles() {
        assert_eq!(
            render_label("Error", "red"),
            "\x1b[1m\x1b[31m          Error\x1b[0m\x1b[0m"
        );
    }

    #[test]
    fn test_render_line_layout() {
        let line = strip_ansi_str(&render_line("Warning", "yellow", "first\nsecond\nthird"));
        assert_eq!(
            line,
            format!(
                "        Warning first\n{0}second\n{0}third",
                " ".repeat(16)
            )
        );
    }

    #[test]
    fn test_render_line_does_not_expand_message_markup() {
        let line = render_line("Info", "blue", "[red]literal");
        assert!(line.ends_with(" [red]literal"));
    }

    #[test]
    fn test_every_newline_gets_sixteen_spaces() {
        for verb in ["Info", "Warning", "Debug", "X"] {
            let line = render_line(verb, "blue", "a\nb\n\nc");
            let continuation: Vec<&str> = line.split('\n').skip(1).collect();
            let pad = " ".repeat(16);
            assert_eq!(
                continuation,
                [format!("{}b", pad), pad.clone(), format!("{}c", pad)]
            );
        }
    }

    #[test]
    fn test_format_error_chain() {
        assert_eq!(format_error_chain("a: b: c"), "a\n b\n  c");
        assert_eq!(format_error_chain("single"), "single");
        // Only ": " splits; bare colons stay.
        assert_eq!(
            format_error_chain("open http://x: refused"),
            "open http://x\n refused"
        );
    }

    #[test]
    fn test_format_errors_with_anyhow_context() {
        let err = anyhow::anyhow!("permission denied")
            .context("reading settings.toml")
            .context("loading configuration");
        assert_eq!(
            format_errors(&err),
            "loading configuration\n reading settings.toml\n  permission denied"
        );
    }

    #[test]
    fn test_format_list() {
        let items = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(format_list(&items, |s| format!("<{}>", s), ", "), "<a>, <b>, <c>");
        let empty: [&str; 0] = [];
        assert_eq!(format_list(&empty, |s| s.to_string(), ", "), "");
    }

    #[test]
    fn test_timing_message() {
        let message = timing_message("fetch", &[&"pkg", &3], Duration::from_millis(2));
        let plain = strip_ansi_str(&colorize(&message));
        assert!(plain.starts_with(&format!("{:<30}(", "fetch")));
        assert!(plain.contains(&format!("{:<50})", "pkg 3")));
        assert!(plain.ends_with("took 2.00ms"));
    }
}
