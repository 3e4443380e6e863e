//! Cache store: one slot directory per cache key under a cache root
//!
//! ```text
//! <cwd>/.depstash/
//!   <64-hex-key>/   verbatim copy of the dependency home
//!   <64-hex-key>/
//! ```
//!
//! The layout is flat and read by other tooling (CI cache actions), so
//! slot names are exactly the cache key and nothing is nested by other
//! criteria.

use crate::cache::key::CacheKey;
use crate::cache::slot::SlotInfo;
use crate::cache::tree::{copy_tree, remove_tree, CopyStats};
use crate::error::{StashError, StashResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of pruning the cache root
#[derive(Debug, Default)]
pub struct PruneReport {
    /// Slot names that were removed (or would be, for a plan)
    pub removed: Vec<String>,
    /// Slot name that matched the kept key, if present
    pub kept: Option<String>,
    /// Per-slot failures; the scan continues past each one
    pub failures: Vec<StashError>,
}

impl PruneReport {
    /// Number of slots removed
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    /// Number of slots kept (0 or 1)
    pub fn kept_count(&self) -> usize {
        usize::from(self.kept.is_some())
    }

    /// Whether every removal succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Content-addressed store of dependency-home snapshots
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// Create a store rooted at `root`; the directory need not exist yet
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The cache root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the slot for `key`
    pub fn slot_path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.as_str())
    }

    /// Whether a slot exists for `key`
    ///
    /// A symlink to a directory counts as a slot here and in prune and
    /// list alike.
    pub fn exists(&self, key: &CacheKey) -> bool {
        self.slot_path(key).is_dir()
    }

    /// Copy the slot for `key` into `dest`
    ///
    /// Failure is recoverable: the caller should re-fetch instead.
    pub fn restore(&self, key: &CacheKey, dest: &Path) -> StashResult<CopyStats> {
        let slot = self.slot_path(key);
        debug!("Restoring {} into {}", slot.display(), dest.display());

        let result = if slot.is_dir() {
            copy_tree(&slot, dest)
        } else {
            Err(StashError::SlotNotFound(slot))
        };

        result.map_err(|e| StashError::RestoreFailed {
            key: key.to_string(),
            source: Box::new(e),
        })
    }

    /// Copy `src` into the slot for `key`, creating the root and slot
    ///
    /// A failure leaves whatever was copied so far in place.
    pub fn populate(&self, key: &CacheKey, src: &Path) -> StashResult<CopyStats> {
        let slot = self.slot_path(key);
        debug!("Populating {} from {}", slot.display(), src.display());

        copy_tree(src, &slot).map_err(|e| StashError::PopulateFailed {
            key: key.to_string(),
            source: Box::new(e),
        })
    }

    /// Delete every slot except the one named `keep`
    ///
    /// A missing root is a no-op. Removal failures are collected in the
    /// report and do not stop the scan.
    pub fn prune(&self, keep: &CacheKey) -> PruneReport {
        self.prune_with(keep, remove_tree)
    }

    /// Classify slots as removed or kept without touching the disk
    pub fn prune_plan(&self, keep: &CacheKey) -> PruneReport {
        let mut report = PruneReport::default();
        let stale = self.classify(keep, &mut report);
        report.removed = stale.into_iter().map(|slot| slot.name).collect();
        report
    }

    fn prune_with<F>(&self, keep: &CacheKey, mut remove: F) -> PruneReport
    where
        F: FnMut(&Path) -> io::Result<()>,
    {
        let mut report = PruneReport::default();

        for slot in self.classify(keep, &mut report) {
            match remove(&slot.path) {
                Ok(()) => {
                    info!("Removed stale cache slot {}", slot.name);
                    report.removed.push(slot.name);
                }
                Err(e) => {
                    warn!("Failed to remove cache slot {}: {}", slot.name, e);
                    report.failures.push(StashError::PruneEntryFailed {
                        slot: slot.path,
                        source: e,
                    });
                }
            }
        }

        report
    }

    /// Record the kept slot in `report` and return the stale ones
    fn classify(&self, keep: &CacheKey, report: &mut PruneReport) -> Vec<SlotEntry> {
        let slots = match self.slots() {
            Ok(slots) => slots,
            Err(e) => {
                report.failures.push(e);
                return Vec::new();
            }
        };

        let mut stale = Vec::new();
        for slot in slots {
            if slot.name == keep.as_str() {
                report.kept = Some(slot.name);
            } else {
                stale.push(slot);
            }
        }
        stale
    }

    /// Inspect every slot under the root
    pub fn list(&self) -> StashResult<Vec<SlotInfo>> {
        Ok(self
            .slots()?
            .iter()
            .map(|slot| SlotInfo::inspect(&slot.path))
            .collect())
    }

    /// Immediate subdirectories of the root, sorted by name
    ///
    /// Symlinks are followed, matching `exists`.
    fn slots(&self) -> StashResult<Vec<SlotEntry>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Cache root {} does not exist", self.root.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(StashError::io(
                    format!("reading cache root {}", self.root.display()),
                    e,
                ))
            }
        };

        let mut slots = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                StashError::io(format!("reading cache root {}", self.root.display()), e)
            })?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            slots.push(SlotEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
            });
        }

        slots.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(slots)
    }
}

/// A slot directory as found on disk
///
/// `name` is for display and key comparison only; names that are not
/// valid UTF-8 are only reachable through `path`.
#[derive(Debug)]
struct SlotEntry {
    name: String,
    path: PathBuf,
}
