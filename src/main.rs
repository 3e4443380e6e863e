//! depstash - content-addressed CI cache for dependency homes
//!
//! CLI entry point that dispatches on the selected mode.

use clap::Parser;
use console::style;
use depstash::cli::commands::{self, RunContext};
use depstash::cli::{Cli, Mode};
use depstash::config::{Config, ConfigManager};
use depstash::error::{StashError, StashResult};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        // Recoverable cache failures never fail the build
        Err(e) if !e.is_fatal() => {
            eprintln!("{} {}", style("Warning:").yellow().bold(), e);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> StashResult<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir()
        .map_err(|e| StashError::io("getting current directory", e))?;

    let config = load_config(&cli, &cwd).await?;
    init_logging(cli.verbose, &config);

    let ctx = RunContext::resolve(&cli, config, &cwd);
    debug!("Manifest: {}", ctx.manifest_path.display());
    debug!("Cache root: {}", ctx.store.root().display());

    match cli.mode() {
        Mode::Sync => commands::sync(&ctx).await,
        Mode::Clean { dry_run } => commands::clean(&ctx, dry_run),
        Mode::PrintKey => commands::key(&ctx),
        Mode::List(format) => commands::list(&ctx, format),
    }
}

async fn load_config(cli: &Cli, cwd: &std::path::Path) -> StashResult<Config> {
    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };

    let local_config_path = if cli.no_local {
        None
    } else {
        ConfigManager::find_local_config(cwd)
    };

    config_manager
        .load_merged(local_config_path.as_deref())
        .await
}

/// Initialize logging: 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("depstash=warn"),
        1 => EnvFilter::new("depstash=info"),
        _ => EnvFilter::new("depstash=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.with_target(false).without_time().init();
    }
}
