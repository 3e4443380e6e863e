//! Manifest hashing for content-addressed cache keys
//!
//! The key is the SHA256 of the manifest's exact bytes, rendered as
//! 64 lowercase hex characters. Same manifest = same slot.

use crate::error::{StashError, StashResult};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Length of a rendered cache key in hex characters
pub const KEY_LEN: usize = 64;

/// A cache key: lowercase hex SHA256 digest of a manifest
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Hash raw manifest bytes into a key
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    /// Parse an existing key, accepting only 64 lowercase hex characters
    pub fn parse(s: &str) -> Option<Self> {
        let well_formed = s.len() == KEY_LEN
            && s
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        well_formed.then(|| Self(s.to_string()))
    }

    /// The key as a string slice, which is also the slot directory name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for human-readable output
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Read a manifest file and derive its cache key
///
/// Fails with [`StashError::ManifestUnreadable`] if the file cannot be read.
pub fn derive_key(manifest_path: &Path) -> StashResult<CacheKey> {
    let contents = fs::read(manifest_path).map_err(|e| StashError::ManifestUnreadable {
        path: manifest_path.to_path_buf(),
        source: e,
    })?;

    let key = CacheKey::from_bytes(&contents);
    debug!("Derived cache key {} from {}", key, manifest_path.display());
    Ok(key)
}
