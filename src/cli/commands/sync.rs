//! Sync command - restore the dependency home or fetch and cache it

use super::RunContext;
use crate::cache::{format_bytes, CopyStats};
use crate::config::Config;
use crate::error::{StashError, StashResult};
use crate::fetch::{CommandFetcher, Fetcher};
use crate::home::resolve_home;
use crate::manifest::Manifest;
use crate::sync::{sync, SyncOutcome};
use crate::ui::{self, UiContext};

/// Execute the sync command
pub async fn execute(ctx: &RunContext) -> StashResult<()> {
    let ui_ctx = UiContext::detect();

    let manifest = Manifest::read(&ctx.manifest_path)?;
    let key = manifest.key();
    let home = resolve_home(&ctx.config.home, ctx.home.as_deref())?;

    ui::intro(&ui_ctx, "depstash");
    ui::key_value(&ui_ctx, "Manifest", &manifest.path().display().to_string());
    ui::key_value(&ui_ctx, "Key", key.as_str());
    ui::key_value(&ui_ctx, "Home", &home.display().to_string());
    ui::key_value(&ui_ctx, "Slot", &ctx.store.slot_path(&key).display().to_string());

    let report = sync(&ctx.store, &key, &home, || {
        let fetcher = build_fetcher(&manifest, &ctx.config, &ctx.fetch)?;
        ui::step_info(
            &ui_ctx,
            &format!("Fetching dependencies: {}", fetcher.describe()),
        );
        Ok(fetcher)
    })
    .await?;

    for warning in &report.warnings {
        ui::step_error(&ui_ctx, warning);
    }

    match report.outcome {
        SyncOutcome::Restored(stats) => {
            ui::step_ok_detail(&ui_ctx, "Restored dependencies from cache", &describe(&stats));
        }
        SyncOutcome::Fetched {
            populated: Some(stats),
        } => {
            ui::step_ok_detail(&ui_ctx, "Cached dependencies for next run", &describe(&stats));
        }
        SyncOutcome::Fetched { populated: None } => {}
    }

    if report.warnings.is_empty() {
        ui::outro_success(&ui_ctx, "Dependencies ready");
    } else {
        ui::outro_warn(&ui_ctx, "Dependencies ready with warnings");
    }

    Ok(())
}

/// Pick the fetch command: command line first, then config for the manifest type
fn build_fetcher(
    manifest: &Manifest,
    config: &Config,
    command_line: &[String],
) -> StashResult<Box<dyn Fetcher>> {
    let fetcher = match CommandFetcher::new(command_line, config.home.env.clone()) {
        Some(fetcher) => fetcher,
        None => {
            let kind = manifest.kind()?;
            CommandFetcher::new(config.fetch.command_for(kind), config.home.env.clone())
                .ok_or_else(|| StashError::FetchNotConfigured(kind.to_string()))?
        }
    };
    Ok(Box::new(fetcher))
}

fn describe(stats: &CopyStats) -> String {
    let mut detail = format!("{} files, {}", stats.files, format_bytes(stats.bytes));
    if stats.skipped > 0 {
        detail.push_str(&format!(", {} skipped", stats.skipped));
    }
    detail
}
