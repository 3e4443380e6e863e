//! Clean command - remove every cache slot except the current one

use super::RunContext;
use crate::cache::PruneReport;
use crate::error::StashResult;
use crate::manifest::Manifest;
use crate::ui::{self, UiContext};
use tracing::debug;

/// Execute the clean command
///
/// Removal failures are reported but do not fail the run.
pub fn execute(ctx: &RunContext, dry_run: bool) -> StashResult<()> {
    let ui_ctx = UiContext::detect();

    let key = Manifest::read(&ctx.manifest_path)?.key();

    ui::intro(&ui_ctx, "depstash clean");
    ui::key_value(&ui_ctx, "Cache", &ctx.store.root().display().to_string());
    ui::key_value(&ui_ctx, "Keep", key.as_str());

    if !ctx.store.root().exists() {
        debug!("Nothing to clean at {}", ctx.store.root().display());
        ui::outro_success(&ui_ctx, "No cache directory, nothing to clean");
        return Ok(());
    }

    let report = if dry_run {
        ctx.store.prune_plan(&key)
    } else {
        ctx.store.prune(&key)
    };

    print_report(&ui_ctx, &report, dry_run);
    Ok(())
}

fn print_report(ui_ctx: &UiContext, report: &PruneReport, dry_run: bool) {
    let verb = if dry_run { "Would remove" } else { "Removed" };

    for name in &report.removed {
        ui::step_ok(ui_ctx, &format!("{} {}", verb, name));
    }
    for failure in &report.failures {
        ui::step_error(ui_ctx, failure);
    }
    if let Some(ref kept) = report.kept {
        ui::step_info(ui_ctx, &format!("Kept {}", kept));
    }

    let summary = format!(
        "{} {} slot(s), kept {}",
        verb,
        report.removed_count(),
        report.kept_count()
    );

    if report.is_clean() {
        ui::outro_success(ui_ctx, &summary);
    } else {
        ui::outro_warn(
            ui_ctx,
            &format!("{}, {} failed", summary, report.failures.len()),
        );
    }
}
