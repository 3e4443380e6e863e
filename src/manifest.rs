//! Project manifest loading
//!
//! The manifest is read once per run. Its bytes feed the cache key; the
//! only field ever interpreted is the top-level `"type"`, which selects
//! the default fetch command.

use crate::cache::CacheKey;
use crate::error::{StashError, StashResult};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Kind of project described by the manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestKind {
    /// An application with pinned direct and indirect dependencies
    Application,
    /// A publishable package with version ranges
    Package,
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Application => "application",
            Self::Package => "package",
        };
        write!(f, "{}", name)
    }
}

#[derive(Deserialize)]
struct TypeField {
    #[serde(rename = "type")]
    kind: ManifestKind,
}

/// A manifest file held in memory
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl Manifest {
    /// Read the manifest at `path`
    pub fn read(path: &Path) -> StashResult<Self> {
        let bytes = fs::read(path).map_err(|e| StashError::ManifestUnreadable {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!("Read manifest {} ({} bytes)", path.display(), bytes.len());

        Ok(Self {
            path: path.to_path_buf(),
            bytes,
        })
    }

    /// Path the manifest was read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cache key for these exact bytes
    pub fn key(&self) -> CacheKey {
        CacheKey::from_bytes(&self.bytes)
    }

    /// Parse the project kind from the `"type"` field
    pub fn kind(&self) -> StashResult<ManifestKind> {
        serde_json::from_slice::<TypeField>(&self.bytes)
            .map(|t| t.kind)
            .map_err(|e| StashError::ManifestInvalid {
                path: self.path.clone(),
                reason: e.to_string(),
            })
    }
}
