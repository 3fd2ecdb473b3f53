//! `tracing` integration.
//!
//! [`LabelFormatter`] renders `tracing` events as label lines, so libraries
//! that log through `tracing` look the same as direct [`Logger`](crate::Logger)
//! output.

use std::fmt;
use tracing::{Event, Level as TraceLevel, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

use crate::color::{strip_ansi_str, TerminalPolicy};
use crate::format::render_line;
use crate::logger::Level;

/// Verb and color for a tracing level.
pub fn label_for(level: &TraceLevel) -> (&'static str, &'static str) {
    let level = match *level {
        TraceLevel::ERROR => Level::Error,
        TraceLevel::WARN => Level::Warn,
        TraceLevel::INFO => Level::Info,
        TraceLevel::DEBUG => Level::Debug,
        TraceLevel::TRACE => return ("Trace", "dim"),
    };
    (level.verb(), level.color())
}

/// A tracing event formatter producing label lines.
///
/// Only the event's fields are printed; targets, spans and timestamps are
/// left out. Color codes are removed when the writer does not support ANSI.
pub struct LabelFormatter;

impl<S, N> FormatEvent<S, N> for LabelFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        // Fields are buffered so they can be indented as one message.
        let mut buffer = String::new();
        ctx.format_fields(Writer::new(&mut buffer), event)?;

        let (verb, color) = label_for(event.metadata().level());
        let line = render_line(verb, color, &buffer);

        if writer.has_ansi_escapes() {
            writeln!(writer, "{}", line)
        } else {
            writeln!(writer, "{}", strip_ansi_str(&line))
        }
    }
}

/// Install a global subscriber that writes label lines to stderr.
///
/// Filtering follows `RUST_LOG`. Returns false if a global subscriber was
/// already installed.
pub fn init_tracing(policy: &TerminalPolicy) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_ansi(policy.showing_colors())
        .event_format(LabelFormatter)
        .try_init()
        .is_ok()
}
