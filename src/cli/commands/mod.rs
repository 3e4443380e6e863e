//! CLI command implementations

pub mod clean;
pub mod key;
pub mod list;
pub mod sync;

pub use clean::execute as clean;
pub use key::execute as key;
pub use list::execute as list;
pub use sync::execute as sync;

use crate::cache::CacheStore;
use crate::cli::Cli;
use crate::config::Config;
use std::path::{Path, PathBuf};

/// Settings resolved from the command line, configuration and working directory
#[derive(Debug)]
pub struct RunContext {
    /// Merged configuration
    pub config: Config,
    /// Absolute path of the manifest
    pub manifest_path: PathBuf,
    /// Store rooted at the cache directory
    pub store: CacheStore,
    /// Dependency home given on the command line
    pub home: Option<PathBuf>,
    /// Fetch command given after `--`
    pub fetch: Vec<String>,
}

impl RunContext {
    /// Resolve paths against `cwd`; command-line values override config
    pub fn resolve(cli: &Cli, config: Config, cwd: &Path) -> Self {
        let manifest = cli.manifest.as_ref().unwrap_or(&config.cache.manifest);
        let cache_dir = cli.cache_dir.as_ref().unwrap_or(&config.cache.dir);

        Self {
            manifest_path: cwd.join(manifest),
            store: CacheStore::new(cwd.join(cache_dir)),
            home: cli.home.clone(),
            fetch: cli.fetch.clone(),
            config,
        }
    }
}
