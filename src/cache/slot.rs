//! Slot metadata for listing the cache root

use crate::cache::key::CacheKey;
use crate::cache::tree::measure_tree;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Format bytes as human-readable size (e.g., "1.5 GB")
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// A slot directory found under the cache root
#[derive(Debug, Clone, Serialize)]
pub struct SlotInfo {
    /// Directory name
    pub name: String,
    /// Full path to the slot
    pub path: PathBuf,
    /// Whether the name is a well-formed cache key
    pub well_formed: bool,
    /// Total size of regular files in bytes
    pub size_bytes: u64,
    /// Number of regular files
    pub files: u64,
    /// Last modification time of the slot directory itself
    pub modified: Option<DateTime<Utc>>,
}

impl SlotInfo {
    /// Inspect a slot directory on disk
    pub fn inspect(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (size_bytes, files) = measure_tree(path);
        let modified = fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        Self {
            well_formed: CacheKey::parse(&name).is_some(),
            name,
            path: path.to_path_buf(),
            size_bytes,
            files,
            modified,
        }
    }

    /// Whether this slot belongs to the given key
    pub fn matches(&self, key: &CacheKey) -> bool {
        self.name == key.as_str()
    }
}
