//! Configuration management for depstash

pub mod schema;

pub use schema::Config;

use crate::error::{StashError, StashResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// File name of the project-local configuration
pub const LOCAL_CONFIG_FILE: &str = ".depstash.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
    explicit: bool,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
            explicit: false,
        }
    }

    /// Create a config manager with a custom path, which must exist
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            explicit: true,
        }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("depstash")
            .join("config.toml")
    }

    /// Find a project-local config in `dir`
    pub fn find_local_config(dir: &Path) -> Option<PathBuf> {
        let path = dir.join(LOCAL_CONFIG_FILE);
        path.is_file().then_some(path)
    }

    /// Load the global configuration with a local file merged on top
    ///
    /// Tables merge key by key; scalar and array values in the local file
    /// replace the global ones.
    pub async fn load_merged(&self, local: Option<&Path>) -> StashResult<Config> {
        let mut merged = toml::Table::new();

        if self.config_path.exists() {
            merge_tables(&mut merged, Self::read_table(&self.config_path).await?);
        } else if self.explicit {
            return Err(StashError::ConfigNotFound(self.config_path.clone()));
        } else {
            debug!("Config file not found, using defaults");
        }

        if let Some(local) = local {
            debug!("Merging local config {}", local.display());
            merge_tables(&mut merged, Self::read_table(local).await?);
        }

        let origin = local.unwrap_or(&self.config_path);
        toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| StashError::ConfigInvalid {
                path: origin.to_path_buf(),
                reason: e.to_string(),
            })
    }

    async fn read_table(path: &Path) -> StashResult<toml::Table> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| StashError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| StashError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        let merged = match (base.remove(&key), value) {
            (Some(toml::Value::Table(mut existing)), toml::Value::Table(incoming)) => {
                merge_tables(&mut existing, incoming);
                toml::Value::Table(existing)
            }
            (_, value) => value,
        };
        base.insert(key, merged);
    }
}
