//! Configuration schema for depstash
//!
//! Global configuration lives at `~/.config/depstash/config.toml`;
//! a project-local `.depstash.toml` is merged on top of it.

use crate::manifest::ManifestKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Cache location and manifest
    pub cache: CacheConfig,

    /// Dependency home discovery
    pub home: HomeConfig,

    /// Fetch commands per manifest kind
    pub fetch: FetchConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache root, relative to the working directory
    pub dir: PathBuf,

    /// Manifest file whose bytes determine the cache key
    pub manifest: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".depstash"),
            manifest: PathBuf::from("elm.json"),
        }
    }
}

/// Dependency home configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeConfig {
    /// Environment variable that overrides the home location. Also
    /// exported to the fetch command.
    pub env: String,

    /// Home used when the variable is unset (`~/` is expanded)
    pub default: Option<PathBuf>,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            env: "ELM_HOME".to_string(),
            default: None,
        }
    }
}

/// Commands that populate the dependency home
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Command for application manifests
    pub application: Vec<String>,

    /// Command for package manifests
    pub package: Vec<String>,
}

impl FetchConfig {
    /// The configured command for a manifest kind
    pub fn command_for(&self, kind: ManifestKind) -> &[String] {
        match kind {
            ManifestKind::Application => &self.application,
            ManifestKind::Package => &self.package,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            application: vec![
                "elm".to_string(),
                "make".to_string(),
                "src/Main.elm".to_string(),
                "--output=/dev/null".to_string(),
            ],
            package: vec![
                "elm".to_string(),
                "make".to_string(),
                "--docs=/dev/null".to_string(),
            ],
        }
    }
}
