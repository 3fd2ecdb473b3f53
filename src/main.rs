//! # labellog - Main Entry Point
//!
//! Prints one labelled log line built from the command line, and can run a
//! short demo progress bar with log lines interleaved, which is handy for
//! checking how a terminal (or a pipe) renders the output.
//!
//! ```text
//! labellog --level warn "cache is [bold]stale[reset]"
//! labellog --verb Deployed --color green "api v2"
//! labellog --progress 5 --step-delay 200ms
//! NO_COLOR=1 labellog --log-file run.log "plain everywhere"
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use labellog::{
    cli::Args,
    logging::init_tracing,
    Level, Logger, LoggerConfig, TerminalPolicy,
};
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    let args = Args::parse();
    let policy = TerminalPolicy::detect();

    // Diagnostics from the library itself; filtered by RUST_LOG.
    init_tracing(&policy);

    let config = args.apply_to(LoggerConfig::from_env());
    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let mut log = Logger::builder().config(config).policy(policy).build();

    if let Err(err) = run(&args, &mut log) {
        log.error_display("labellog failed", err);
        drop(log);
        std::process::exit(1);
    }
    Ok(())
}

/// Emit the requested line and run the optional demo.
fn run(args: &Args, log: &mut Logger) -> Result<()> {
    let message = args.message_text();

    if !message.is_empty() {
        match &args.verb {
            Some(verb) if args.no_markup => log.log_no_color(verb, &args.color, &message),
            Some(verb) => log.log(verb, &args.color, &message),
            None => emit(log, args.level.into(), &message, !args.no_markup),
        }
    }

    if let Some(total) = args.progress {
        demo_progress(log, total, args.step_delay)?;
    }

    log.flush()?;
    Ok(())
}

fn emit(log: &mut Logger, level: Level, message: &str, markup: bool) {
    match (level, markup) {
        (Level::Error, true) => log.error(message),
        (Level::Warn, true) => log.warn(message),
        (Level::Info, true) => log.info(message),
        (Level::Debug, true) => log.debug(message),
        (Level::Debug, false) => log.debug_no_color(message),
        (level, _) => log.log_no_color(level.verb(), level.color(), message),
    }
}

fn demo_progress(log: &mut Logger, total: u64, delay: Duration) -> Result<()> {
    log.start_progress_bar(total, "Working", "cyan")
        .context("starting demo progress bar")?;

    for step in 1..=total {
        let detail = format!("{}/{}", step, total);
        log.update_progress_bar("Working", "cyan", "demo step", &[detail.as_str()]);
        log.timed("demo step", &[&step], || thread::sleep(delay));
        log.info(format!("finished step [bold]{}[reset] of {}", step, total));
        log.increment_progress_bar();
    }

    let mut completed = false;
    log.increment_progress_bar_then(|| completed = true);
    log.stop_progress_bar();

    if completed {
        log.info("[green]all demo steps done[reset]");
    }
    Ok(())
}
