//! Recursive directory primitives shared by restore, populate and prune
//!
//! Copies are overwrite-merge: every entry of the source ends up in the
//! destination, and destination entries without a source counterpart
//! are left alone. Symlinks in the source are dereferenced; dangling
//! links and special files (FIFOs, sockets, devices) are skipped with a
//! warning. A symlink already present in the destination is replaced,
//! never written through.

use crate::error::{StashError, StashResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Counters collected while copying a tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Regular files copied
    pub files: u64,
    /// Directories created or already present
    pub dirs: u64,
    /// Total bytes copied
    pub bytes: u64,
    /// Dangling symlinks and special files that were not copied
    pub skipped: u64,
}

/// Recursively copy the contents of `src` into `dest`
///
/// `dest` and any missing parents are created first. Files at the same
/// relative path are overwritten.
pub fn copy_tree(src: &Path, dest: &Path) -> StashResult<CopyStats> {
    let meta = fs::metadata(src)
        .map_err(|e| StashError::io(format!("reading {}", src.display()), e))?;
    if !meta.is_dir() {
        return Err(StashError::io(
            format!("copying from {}", src.display()),
            io::Error::new(io::ErrorKind::InvalidInput, "source is not a directory"),
        ));
    }

    fs::create_dir_all(dest)
        .map_err(|e| StashError::io(format!("creating directory {}", dest.display()), e))?;

    let mut stats = CopyStats::default();

    for entry in WalkDir::new(src).follow_links(true).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if let Some(link) = dangling_link(&err) {
                    warn!("Skipping dangling symlink {}", link.display());
                    stats.skipped += 1;
                    continue;
                }
                return Err(walk_error(src, err));
            }
        };
        let target = dest.join(relative_to(src, entry.path())?);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            unlink_symlink(&target)?;
            fs::create_dir_all(&target).map_err(|e| {
                StashError::io(format!("creating directory {}", target.display()), e)
            })?;
            stats.dirs += 1;
        } else if file_type.is_file() {
            stats.bytes += copy_file(entry.path(), &target)?;
            stats.files += 1;
        } else {
            warn!("Skipping special file {}", entry.path().display());
            stats.skipped += 1;
        }
    }

    debug!(
        "Copied {} -> {}: {} files, {} dirs, {} bytes",
        src.display(),
        dest.display(),
        stats.files,
        stats.dirs,
        stats.bytes
    );
    Ok(stats)
}

/// Recursively delete a directory and everything below it
pub fn remove_tree(dir: &Path) -> io::Result<()> {
    debug!("Removing {}", dir.display());
    fs::remove_dir_all(dir)
}

/// Total size in bytes and number of regular files below `dir`
///
/// Symlinks are not followed. Unreadable entries are ignored.
pub fn measure_tree(dir: &Path) -> (u64, u64) {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .fold((0, 0), |(bytes, files), m| (bytes + m.len(), files + 1))
}

/// Copy a single file, replacing whatever sits at `target`
fn copy_file(source: &Path, target: &Path) -> StashResult<u64> {
    unlink_symlink(target)?;

    fs::copy(source, target).map_err(|e| {
        StashError::io(
            format!("copying {} to {}", source.display(), target.display()),
            e,
        )
    })
}

/// Remove a symlink sitting at `target` so nothing is written through it
fn unlink_symlink(target: &Path) -> StashResult<()> {
    let is_link = fs::symlink_metadata(target)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    if !is_link {
        return Ok(());
    }

    debug!("Replacing symlink {}", target.display());
    // Directory links on Windows can only be removed with remove_dir
    fs::remove_file(target)
        .or_else(|_| fs::remove_dir(target))
        .map_err(|e| StashError::io(format!("replacing {}", target.display()), e))
}

/// The link path when a walk error comes from a symlink whose target is gone
///
/// Link cycles are not matched here and stay errors.
fn dangling_link(err: &walkdir::Error) -> Option<&Path> {
    if err.loop_ancestor().is_some() {
        return None;
    }
    let path = err.path()?;
    let target_missing = err
        .io_error()
        .map(|e| e.kind() == io::ErrorKind::NotFound)
        .unwrap_or(false);
    let is_link = fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    (target_missing && is_link).then_some(path)
}

fn relative_to(root: &Path, path: &Path) -> StashResult<PathBuf> {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .map_err(|_| {
            StashError::io(
                format!("resolving {}", path.display()),
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("path is not under {}", root.display()),
                ),
            )
        })
}

fn walk_error(root: &Path, err: walkdir::Error) -> StashError {
    let context = match err.path() {
        Some(path) => format!("walking {}", path.display()),
        None => format!("walking {}", root.display()),
    };
    StashError::io(context, err.into())
}
