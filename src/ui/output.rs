//! Output functions for cache runs
//!
//! Plain lines carry a bracketed status label so CI logs can be grepped
//! for `[WARN]` without colour codes getting in the way.

use super::context::UiContext;
use crate::error::StashError;
use console::{style, StyledObject};

/// Status label of a plain output line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    Info,
    Warn,
    Fail,
}

impl Status {
    fn label(self) -> StyledObject<&'static str> {
        match self {
            Self::Ok => style("[OK]").green(),
            Self::Info => style("[INFO]").cyan(),
            Self::Warn => style("[WARN]").yellow(),
            Self::Fail => style("[FAIL]").red(),
        }
    }

    /// Recoverable errors are warnings, everything else a failure
    fn of(err: &StashError) -> Self {
        if err.is_fatal() {
            Self::Fail
        } else {
            Self::Warn
        }
    }
}

fn plain_step(status: Status, message: &str) {
    println!("  {} {}", status.label(), message);
}

/// Banner naming the run
pub fn intro(ctx: &UiContext, title: &str) {
    if ctx.use_fancy_output() {
        cliclack::intro(style(title).cyan().bold()).ok();
    } else {
        println!("{}", style(title).cyan().bold());
    }
}

/// Closing line for a run that finished cleanly
pub fn outro_success(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::outro(style(message).green().bold()).ok();
    } else {
        println!("{} {}", Status::Ok.label(), message);
    }
}

/// Closing line for a run that finished with recoverable failures
pub fn outro_warn(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::outro(style(message).yellow().bold()).ok();
    } else {
        println!("{} {}", Status::Warn.label(), message);
    }
}

pub fn step_ok(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::success(message).ok();
    } else {
        plain_step(Status::Ok, message);
    }
}

/// Success step with a detail such as copy statistics
pub fn step_ok_detail(ctx: &UiContext, message: &str, detail: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::success(format!("{} ({})", message, style(detail).dim())).ok();
    } else {
        plain_step(Status::Ok, &format!("{} ({})", message, detail));
    }
}

pub fn step_info(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::info(message).ok();
    } else {
        plain_step(Status::Info, message);
    }
}

/// Report a cache error as a step, with its hint on the following line
///
/// Non-fatal errors (a failed restore, populate or slot removal) show as
/// warnings; the run carries on after them.
pub fn step_error(ctx: &UiContext, err: &StashError) {
    let text = error_text(err);
    let status = Status::of(err);

    if ctx.use_fancy_output() {
        match status {
            Status::Fail => cliclack::log::error(text).ok(),
            _ => cliclack::log::warning(text).ok(),
        };
    } else {
        plain_step(status, &text);
    }
}

/// Error message followed by its hint, if there is one
fn error_text(err: &StashError) -> String {
    match err.hint() {
        Some(hint) => format!("{}\n      {} {}", err, style("hint:").dim(), hint),
        None => err.to_string(),
    }
}

/// Labelled value in the run header
pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    if ctx.use_fancy_output() {
        println!("  {}: {}", style(key).dim(), value);
    } else {
        println!("  {}: {}", key, value);
    }
}
