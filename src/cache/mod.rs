//! Content-addressed cache of dependency homes
//!
//! Provides slot storage keyed by manifest hashes. Each slot is a plain
//! directory copy of the dependency home, so CI cache actions can save
//! and restore the cache root without knowing anything about depstash.
//!
//! # Protocol
//!
//! - Cache key is the SHA256 of the manifest bytes (64 lowercase hex chars)
//! - Hit: slot is copied over the dependency home (overwrite-merge)
//! - Miss: dependencies are fetched, then the home is copied into the slot
//! - Clean: every slot except the current key is deleted
//!
//! # Copy Semantics
//!
//! | Source entry | Destination behavior |
//! |--------------|----------------------|
//! | Directory | Created if missing |
//! | Regular file | Copied, overwriting |
//! | Symlink | Target content copied |
//! | FIFO/socket/device | Skipped with a warning |
//! | (absent) | Destination entry left untouched |

pub mod key;
pub mod slot;
pub mod store;
pub mod tree;

pub use key::{derive_key, CacheKey};
pub use slot::{format_bytes, SlotInfo};
pub use store::{CacheStore, PruneReport};
pub use tree::CopyStats;
