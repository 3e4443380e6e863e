//! Error types for depstash
//!
//! All modules use `StashResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for depstash operations
pub type StashResult<T> = Result<T, StashError>;

/// All errors that can occur in depstash
#[derive(Error, Debug)]
pub enum StashError {
    // Manifest errors
    #[error("Failed to read manifest {}: {source}", path.display())]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest {}: {reason}", path.display())]
    ManifestInvalid { path: PathBuf, reason: String },

    // Cache errors
    #[error("Failed to restore cache slot {key}: {source}")]
    RestoreFailed {
        key: String,
        #[source]
        source: Box<StashError>,
    },

    #[error("Failed to populate cache slot {key}: {source}")]
    PopulateFailed {
        key: String,
        #[source]
        source: Box<StashError>,
    },

    #[error("Failed to remove cache slot {}: {source}", slot.display())]
    PruneEntryFailed {
        slot: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cache slot not found: {0}")]
    SlotNotFound(PathBuf),

    // Dependency home errors
    #[error("Could not determine the dependency home directory: {env} is not set")]
    HomeNotFound { env: String },

    // Fetch errors
    #[error("Dependency fetch failed: {command}, exit code: {}", code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    FetchFailed { command: String, code: Option<i32> },

    #[error("Failed to start fetch command: {command}")]
    FetchSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No fetch command configured for {0} manifests")]
    FetchNotConfigured(String),

    // Configuration errors
    #[error("Invalid configuration at {}: {reason}", path.display())]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    // IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StashError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a fetch spawn error
    pub fn fetch_spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::FetchSpawn {
            command: command.into(),
            source,
        }
    }

    /// Whether this error must terminate the run.
    ///
    /// Restore, populate and per-slot prune failures degrade to a slower
    /// path or a warning; everything else stops the process.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::RestoreFailed { .. } | Self::PopulateFailed { .. } | Self::PruneEntryFailed { .. }
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ManifestUnreadable { .. } => {
                Some("Run from the project root or pass --manifest <PATH>")
            }
            Self::HomeNotFound { .. } => {
                Some("Pass --home <DIR>, or set home.default in .depstash.toml")
            }
            Self::FetchNotConfigured(_) => {
                Some("Pass the fetch command after --, e.g. depstash -- elm make src/Main.elm")
            }
            Self::FetchSpawn { .. } => Some("Check that the package manager is on PATH"),
            Self::RestoreFailed { .. } => {
                Some("Dependencies were fetched instead; --clean drops unreadable slots")
            }
            Self::PopulateFailed { .. } | Self::PruneEntryFailed { .. } => {
                Some("Check that the cache directory is writable")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StashError::ManifestUnreadable {
            path: PathBuf::from("elm.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("Failed to read manifest elm.json"));
    }

    #[test]
    fn error_hint() {
        let home = StashError::HomeNotFound {
            env: "GHCUP_HOME".to_string(),
        };
        assert!(home.to_string().ends_with("GHCUP_HOME is not set"));
        assert!(!home.hint().unwrap().contains("ELM_HOME"));
        assert_eq!(StashError::SlotNotFound(PathBuf::from("x")).hint(), None);
    }

    #[test]
    fn error_fatal() {
        let restore = StashError::RestoreFailed {
            key: "abc".to_string(),
            source: Box::new(StashError::SlotNotFound(PathBuf::from("abc"))),
        };
        assert!(!restore.is_fatal());

        let fetch = StashError::FetchFailed {
            command: "elm make".to_string(),
            code: Some(1),
        };
        assert!(fetch.is_fatal());
        assert!(fetch.to_string().contains("exit code: 1"));
    }

    #[test]
    fn fetch_failed_without_code() {
        let err = StashError::FetchFailed {
            command: "elm".to_string(),
            code: None,
        };
        assert!(err.to_string().ends_with("exit code: none"));
    }
}
