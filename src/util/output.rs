use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

use console::style;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};

const QUIET: u8 = 0;
const NORMAL: u8 = 1;
const VERBOSE: u8 = 2;

static LEVEL: AtomicU8 = AtomicU8::new(NORMAL);

pub fn configure(verbose: u8, quiet: bool, no_color: bool) {
    let level = if quiet {
        QUIET
    } else if verbose > 0 {
        VERBOSE
    } else {
        NORMAL
    };
    LEVEL.store(level, Ordering::Relaxed);
    if no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
}

fn level() -> u8 {
    LEVEL.load(Ordering::Relaxed)
}

pub fn info(message: &str) {
    if level() >= NORMAL {
        let _ = writeln!(io::stderr(), "{}", message);
    }
}

pub fn debug(message: &str) {
    if level() >= VERBOSE {
        let _ = writeln!(io::stderr(), "{}", style(message).dim());
    }
}

pub fn warn(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).yellow());
}

pub fn error(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).red());
}

/// Logs an external command before it runs.
pub fn step(program: &str, message: &str) {
    if level() >= VERBOSE {
        let _ = writeln!(io::stderr(), "{} {}", style(program).cyan(), message);
    }
}

/// Spinner on stderr, hidden when quiet or when stderr is not a terminal.
pub fn spinner(message: &str) -> ProgressBar {
    if level() == QUIET || !console::Term::stderr().is_term() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]") {
        bar.set_style(template);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(std::time::Duration::from_millis(120));
    bar
}

pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool, dialoguer::Error> {
    if assume_yes {
        return Ok(true);
    }

    Confirm::new().with_prompt(prompt).default(false).interact()
}
