//! depstash - content-addressed CI cache for dependency homes
//!
//! Keys a cache slot by the SHA256 of the project manifest, restores the
//! package manager's dependency home from that slot, or fetches and
//! stores it on a miss.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod home;
pub mod manifest;
pub mod sync;
pub mod ui;

pub use error::{StashError, StashResult};
