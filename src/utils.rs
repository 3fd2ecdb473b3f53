//! # Utility Functions
//!
//! Small helpers shared by the formatter and the logger.

use std::time::Duration;

/// Render a duration for `Timing` lines.
///
/// Sub-minute values use the largest fitting unit with two decimals
/// (`750ns`, `1.25μs`, `2.50ms`, `5.25s`); longer ones are split into
/// whole minutes and hours (`1m 30s`, `2h 15m 30s`).
///
/// ```rust
/// # use labellog::utils::format_duration;
/// # use std::time::Duration;
/// assert_eq!(format_duration(Duration::from_micros(2500)), "2.50ms");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    let scaled = |per_unit: f64, unit: &str| format!("{:.2}{}", nanos as f64 / per_unit, unit);

    match nanos {
        0..=999 => format!("{}ns", nanos),
        1_000..=999_999 => scaled(1e3, "μs"),
        1_000_000..=999_999_999 => scaled(1e6, "ms"),
        1_000_000_000..=59_999_999_999 => scaled(1e9, "s"),
        _ => {
            let secs = duration.as_secs();
            let (hours, minutes, seconds) = (secs / 3600, secs / 60 % 60, secs % 60);
            if hours == 0 {
                format!("{}m {}s", minutes, seconds)
            } else {
                format!("{}h {}m {}s", hours, minutes, seconds)
            }
        }
    }
}

/// Parse a duration such as `250ms`, `1.5s`, `5m` or `1h`.
///
/// Bare numbers are read as seconds. Negative, non-finite and overflowing
/// values are rejected, so the parser is safe to hand to clap.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Duration cannot be empty".to_string());
    }

    let (num_str, seconds_per_unit) = if let Some(stripped) = s.strip_suffix("ms") {
        (stripped, 0.001)
    } else if let Some(stripped) = s.strip_suffix('s') {
        (stripped, 1.0)
    } else if let Some(stripped) = s.strip_suffix('m') {
        (stripped, 60.0)
    } else if let Some(stripped) = s.strip_suffix('h') {
        (stripped, 3600.0)
    } else {
        (s, 1.0)
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number in duration: {}", num_str))?;
    if !num.is_finite() || num < 0.0 {
        return Err(format!("Duration must be a non-negative number: {}", num_str));
    }

    Duration::try_from_secs_f64(num * seconds_per_unit)
        .map_err(|_| format!("Duration is out of range: {}", s))
}
