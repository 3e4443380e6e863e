//! Dependency home discovery
//!
//! Resolution order: explicit path, the configured environment variable,
//! the configured default, then `<user home>/.elm`.

use crate::config::schema::HomeConfig;
use crate::error::{StashError, StashResult};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory name of the package manager's home under the user home
const DEFAULT_HOME_DIR: &str = ".elm";

/// Resolve the dependency home directory
pub fn resolve_home(config: &HomeConfig, explicit: Option<&Path>) -> StashResult<PathBuf> {
    if let Some(path) = explicit {
        debug!("Using dependency home from command line: {}", path.display());
        return Ok(expand_user(path));
    }

    if let Some(value) = env::var_os(&config.env).filter(|v| !v.is_empty()) {
        let path = PathBuf::from(value);
        debug!("Using dependency home from {}: {}", config.env, path.display());
        return Ok(expand_user(&path));
    }

    if let Some(ref path) = config.default {
        debug!("Using configured dependency home: {}", path.display());
        return Ok(expand_user(path));
    }

    dirs::home_dir()
        .map(|home| home.join(DEFAULT_HOME_DIR))
        .ok_or_else(|| StashError::HomeNotFound {
            env: config.env.clone(),
        })
}

/// Expand a leading `~/` to the user's home directory
pub fn expand_user(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
