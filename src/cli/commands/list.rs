//! List command - show cache slots

use super::RunContext;
use crate::cache::{format_bytes, CacheKey, SlotInfo};
use crate::cli::args::OutputFormat;
use crate::error::StashResult;
use crate::manifest::Manifest;
use console::style;

/// Execute the list command
pub fn execute(ctx: &RunContext, format: OutputFormat) -> StashResult<()> {
    let key = Manifest::read(&ctx.manifest_path)?.key();
    let slots = ctx.store.list()?;

    match format {
        OutputFormat::Table => print_slot_table(&slots, &key),
        OutputFormat::Json => print_slot_json(&slots, &key)?,
        OutputFormat::Plain => print_slot_plain(&slots),
    }

    Ok(())
}

fn print_slot_table(slots: &[SlotInfo], current: &CacheKey) {
    if slots.is_empty() {
        println!("No cache slots found.");
        return;
    }

    println!(
        "{:<16} {:<10} {:>8} {:>10} {:<20}",
        "SLOT", "STATE", "FILES", "SIZE", "MODIFIED"
    );
    println!("{}", "-".repeat(68));

    let mut total = 0;
    for slot in slots {
        let state = if slot.matches(current) {
            style("current").green().to_string()
        } else if slot.well_formed {
            style("stale").yellow().to_string()
        } else {
            style("foreign").dim().to_string()
        };

        let modified = slot
            .modified
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<16} {:<10} {:>8} {:>10} {:<20}",
            abbreviate(&slot.name),
            state,
            slot.files,
            format_bytes(slot.size_bytes),
            modified
        );
        total += slot.size_bytes;
    }

    println!();
    println!("Total: {} slot(s), {}", slots.len(), format_bytes(total));
}

fn print_slot_json(slots: &[SlotInfo], current: &CacheKey) -> StashResult<()> {
    #[derive(serde::Serialize)]
    struct SlotJson<'a> {
        #[serde(flatten)]
        slot: &'a SlotInfo,
        current: bool,
    }

    let json_slots: Vec<SlotJson<'_>> = slots
        .iter()
        .map(|slot| SlotJson {
            slot,
            current: slot.matches(current),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&json_slots)?);
    Ok(())
}

fn print_slot_plain(slots: &[SlotInfo]) {
    for slot in slots {
        println!("{}", slot.name);
    }
}

fn abbreviate(name: &str) -> &str {
    match CacheKey::parse(name) {
        Some(_) => &name[..12],
        None => name,
    }
}
