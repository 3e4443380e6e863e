//! CLI argument definitions using clap derive

use clap::{ArgAction, ArgGroup, Parser, ValueEnum};
use std::path::PathBuf;

/// depstash - Content-addressed CI cache for dependency homes
///
/// Restores the package manager's dependency home from a cache slot keyed
/// by the manifest hash, or fetches dependencies and stores them for the
/// next run.
#[derive(Parser, Debug)]
#[command(name = "depstash")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("mode").args(["clean", "print_key", "list"])))]
pub struct Cli {
    /// Delete every cache slot except the one for the current manifest
    #[arg(long)]
    pub clean: bool,

    /// With --clean, show what would be removed without deleting anything
    #[arg(long, requires = "clean")]
    pub dry_run: bool,

    /// Print the cache key for the current manifest and exit
    #[arg(long)]
    pub print_key: bool,

    /// List cache slots
    #[arg(long)]
    pub list: bool,

    /// Output format for --list
    #[arg(short, long, requires = "list")]
    pub format: Option<OutputFormat>,

    /// Manifest whose contents determine the cache key
    #[arg(short, long, env = "DEPSTASH_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Cache root directory, relative to the working directory
    #[arg(long, env = "DEPSTASH_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Dependency home directory (overrides environment and config)
    #[arg(long)]
    pub home: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "DEPSTASH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local .depstash.toml discovery
    #[arg(long)]
    pub no_local: bool,

    /// Command that fetches dependencies on a cache miss
    /// (defaults to the configured command for the manifest type)
    #[arg(last = true)]
    pub fetch: Vec<String>,
}

/// What a run does, derived from the mode flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Restore from cache, or fetch and populate
    Sync,
    /// Prune stale slots
    Clean { dry_run: bool },
    /// Print the cache key
    PrintKey,
    /// List slots
    List(OutputFormat),
}

impl Cli {
    /// The mode selected by the flags
    pub fn mode(&self) -> Mode {
        if self.clean {
            Mode::Clean {
                dry_run: self.dry_run,
            }
        } else if self.print_key {
            Mode::PrintKey
        } else if self.list {
            Mode::List(self.format.unwrap_or(OutputFormat::Table))
        } else {
            Mode::Sync
        }
    }
}

/// Output format for --list
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Slot names only, one per line
    Plain,
}
