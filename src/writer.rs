//! # Writer Pipeline
//!
//! Log lines travel through a chain of [`std::io::Write`] decorators that is
//! assembled once when the [`Logger`](crate::Logger) is built:
//!
//! ```text
//! StripAnsi -> ProgressBypass -> DatePrefix -> Tee(base, log file)
//! ```
//!
//! - [`Tee`] mirrors output into the optional log file.
//! - [`DatePrefix`] stamps each write with the local time.
//! - [`ProgressBypass`] clears an active progress bar around each write and
//!   redraws it afterwards.
//! - [`StripAnsi`] removes color codes when colors are off. It is always the
//!   outermost stage so it sees exactly the bytes the caller wrote.
//!
//! Every decorator reports the caller's full buffer as written; callers emit a
//! whole line per `write_all`, which keeps the date prefix per line.

use indicatif::ProgressBar;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::Path;
use std::sync::Arc;

use crate::color::strip_ansi;
use crate::config::LoggerConfig;

/// The progress bar shared between the controller and the bypass writer.
pub type ProgressSlot = Arc<Mutex<Option<ProgressBar>>>;

/// Local timestamp used by [`DatePrefix`].
pub fn timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S%.6f %z")
        .to_string()
}

/// Open a log file for appending, creating it if needed.
///
/// The file is line buffered so a crash loses at most a partial line.
pub fn open_log_file(path: &Path) -> io::Result<LineWriter<File>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(LineWriter::new(file))
}

/// Writes everything to two writers.
pub struct Tee<A, B> {
    primary: A,
    mirror: B,
}

impl<A: Write, B: Write> Tee<A, B> {
    pub fn new(primary: A, mirror: B) -> Self {
        Self { primary, mirror }
    }
}

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.primary.write_all(buf)?;
        self.mirror.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.primary.flush()?;
        self.mirror.flush()
    }
}

/// Prefixes each write with `[<timestamp>] `.
///
/// Leading spaces of the payload are dropped, so right-justified labels sit
/// directly after the timestamp.
pub struct DatePrefix<W> {
    out: W,
    clock: fn() -> String,
}

impl<W: Write> DatePrefix<W> {
    pub fn new(out: W) -> Self {
        Self::with_clock(out, timestamp)
    }

    pub fn with_clock(out: W, clock: fn() -> String) -> Self {
        Self { out, clock }
    }
}

impl<W: Write> Write for DatePrefix<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let start = buf.iter().position(|&b| b != b' ').unwrap_or(buf.len());
        let mut stamped = format!("[{}] ", (self.clock)()).into_bytes();
        stamped.extend_from_slice(&buf[start..]);
        self.out.write_all(&stamped)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Routes writes around the active progress bar, if any.
pub struct ProgressBypass<W> {
    out: W,
    slot: ProgressSlot,
}

impl<W: Write> ProgressBypass<W> {
    pub fn new(out: W, slot: ProgressSlot) -> Self {
        Self { out, slot }
    }
}

impl<W: Write> Write for ProgressBypass<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // Clone the handle so the slot is not locked while the bar redraws.
        let bar = self.slot.lock().clone();
        match bar {
            Some(bar) if !bar.is_finished() => {
                let out = &mut self.out;
                bar.suspend(|| out.write_all(buf))?;
            }
            _ => self.out.write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Strips ANSI color sequences before writing.
pub struct StripAnsi<W> {
    out: W,
}

impl<W: Write> StripAnsi<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Write for StripAnsi<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write_all(&strip_ansi(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Boxed writer the pipeline stages are composed from.
pub type BoxWriter = Box<dyn Write + Send>;

/// Compose the writer chain for a logger.
///
/// A log file that cannot be opened is skipped; output then only goes to
/// `base`.
pub fn build_pipeline(
    base: BoxWriter,
    config: &LoggerConfig,
    colors: bool,
    slot: ProgressSlot,
) -> BoxWriter {
    let mut writer = base;

    if let Some(path) = &config.log_file {
        match open_log_file(path) {
            Ok(file) => writer = Box::new(Tee::new(writer, file)),
            Err(err) => {
                tracing::debug!(
                    path = %path.display(),
                    error = %err,
                    "log file unavailable, logging to console only"
                );
            }
        }
    }

    if config.prepend_date {
        writer = Box::new(DatePrefix::new(writer));
    }

    writer = Box::new(ProgressBypass::new(writer, slot));

    if !colors {
        writer = Box::new(StripAnsi::new(writer));
    }

    writer
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A clonable in-memory sink for inspecting pipeline output.
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

    fn fixed_clock() -> String {
        "2024-01-02 03:04:05.000000 +0000".to_string()
    }

    fn empty_slot() -> ProgressSlot {
        Arc::new(Mutex::new(None))
    }

    #[test]
    fn test_strip_ansi_writer() {
        let sink = Capture::default();
        let mut writer = StripAnsi::new(sink.clone());
        writer.write_all(b"\x1b[1m\x1b[31mX\x1b[0m\n").unwrap();
        assert_eq!(sink.text(), "X\n");
    }

    #[test]
    fn test_date_prefix_trims_leading_spaces() {
        let sink = Capture::default();
        let mut writer = DatePrefix::with_clock(sink.clone(), fixed_clock);
        writer.write_all(b"     Info hello\n").unwrap();
        assert_eq!(
            sink.text(),
            "[2024-01-02 03:04:05.000000 +0000] Info hello\n"
        );
    }

    #[test]
    fn test_tee_writes_both() {
        let a = Capture::default();
        let b = Capture::default();
        let mut writer = Tee::new(a.clone(), b.clone());
        writer.write_all(b"line\n").unwrap();
        assert_eq!(a.text(), "line\n");
        assert_eq!(b.text(), "line\n");
    }

    #[test]
    fn test_bypass_without_bar_passes_through() {
        let sink = Capture::default();
        let mut writer = ProgressBypass::new(sink.clone(), empty_slot());
        writer.write_all(b"plain\n").unwrap();
        assert_eq!(sink.text(), "plain\n");
    }

    #[test]
    fn test_bypass_with_hidden_bar_still_writes() {
        let sink = Capture::default();
        let slot = empty_slot();
        *slot.lock() = Some(ProgressBar::hidden());
        let mut writer = ProgressBypass::new(sink.clone(), slot);
        writer.write_all(b"around the bar\n").unwrap();
        assert_eq!(sink.text(), "around the bar\n");
    }

    #[test]
    fn test_pipeline_strips_when_colors_off() {
        let sink = Capture::default();
        let mut writer = build_pipeline(
            Box::new(sink.clone()),
            &LoggerConfig::default(),
            false,
            empty_slot(),
        );
        writer.write_all(b"\x1b[34mblue\x1b[0m\n").unwrap();
        assert_eq!(sink.text(), "blue\n");
    }

    #[test]
    fn test_pipeline_keeps_colors_when_on() {
        let sink = Capture::default();
        let mut writer = build_pipeline(
            Box::new(sink.clone()),
            &LoggerConfig::default(),
            true,
            empty_slot(),
        );
        writer.write_all(b"\x1b[34mblue\x1b[0m\n").unwrap();
        assert_eq!(sink.text(), "\x1b[34mblue\x1b[0m\n");
    }

    #[test]
    fn test_pipeline_ignores_unopenable_log_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a file.
        let config = LoggerConfig::default().with_log_file(dir.path());
        let sink = Capture::default();
        let mut writer = build_pipeline(Box::new(sink.clone()), &config, false, empty_slot());
        writer.write_all(b"still here\n").unwrap();
        assert_eq!(sink.text(), "still here\n");
    }

    #[test]
    fn test_pipeline_mirrors_to_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let config = LoggerConfig::default().with_log_file(&path);
        let sink = Capture::default();
        {
            let mut writer =
                build_pipeline(Box::new(sink.clone()), &config, false, empty_slot());
            writer.write_all(b"\x1b[31mmirrored\x1b[0m\n").unwrap();
            writer.flush().unwrap();
        }
        assert_eq!(sink.text(), "mirrored\n");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "mirrored\n");
    }
}
