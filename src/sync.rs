//! Restore-or-fetch pipeline
//!
//! On a hit the slot is restored over the dependency home. On a miss, or
//! when the restore fails, the fetcher runs and the resulting home is
//! copied into the slot for the next run.

use crate::cache::{CacheKey, CacheStore, CopyStats};
use crate::error::{StashError, StashResult};
use crate::fetch::Fetcher;
use std::path::Path;
use tracing::{info, warn};

/// What the pipeline did to produce the dependency home
#[derive(Debug)]
pub enum SyncOutcome {
    /// The slot was copied into the home; no fetch ran
    Restored(CopyStats),
    /// Dependencies were fetched; `populated` is `None` if caching failed
    Fetched { populated: Option<CopyStats> },
}

/// Result of a sync run, including non-fatal failures
#[derive(Debug)]
pub struct SyncReport {
    /// What happened
    pub outcome: SyncOutcome,
    /// Recoverable restore/populate failures encountered along the way
    pub warnings: Vec<StashError>,
}

impl SyncReport {
    /// Whether the slot was restored without fetching
    pub fn is_hit(&self) -> bool {
        matches!(self.outcome, SyncOutcome::Restored(_))
    }
}

/// Bring `home` up to date for `key`
///
/// `make_fetcher` is only called when a fetch is actually needed, so a
/// hit never inspects the manifest beyond its key. Only fetch failures
/// (and failures building the fetcher) are returned as errors.
pub async fn sync<F>(
    store: &CacheStore,
    key: &CacheKey,
    home: &Path,
    make_fetcher: F,
) -> StashResult<SyncReport>
where
    F: FnOnce() -> StashResult<Box<dyn Fetcher>>,
{
    let mut warnings = Vec::new();

    if store.exists(key) {
        info!("Cache hit for {}", key.short());
        match store.restore(key, home) {
            Ok(stats) => {
                return Ok(SyncReport {
                    outcome: SyncOutcome::Restored(stats),
                    warnings,
                })
            }
            Err(e) => {
                warn!("{}; falling back to fetch", e);
                warnings.push(e);
            }
        }
    } else {
        info!("Cache miss for {}", key.short());
    }

    let fetcher = make_fetcher()?;
    fetcher.fetch(home).await?;

    let populated = match store.populate(key, home) {
        Ok(stats) => Some(stats),
        Err(e) => {
            warn!("{}", e);
            warnings.push(e);
            None
        }
    };

    Ok(SyncReport {
        outcome: SyncOutcome::Fetched { populated },
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Writes a fixed file into the home and counts invocations
    struct FakeFetcher {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl Fetcher for FakeFetcher {
        async fn fetch(&self, home: &Path) -> StashResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StashError::FetchFailed {
                    command: "fake".to_string(),
                    code: Some(1),
                });
            }
            fs::create_dir_all(home.join("0.19.1/packages")).unwrap();
            fs::write(home.join("0.19.1/packages/registry.dat"), "fetched").unwrap();
            Ok(())
        }

        fn describe(&self) -> String {
            "fake".to_string()
        }
    }

    fn fetcher(calls: &Arc<AtomicUsize>, fail: bool) -> StashResult<Box<dyn Fetcher>> {
        Ok(Box::new(FakeFetcher {
            calls: Arc::clone(calls),
            fail,
        }))
    }

    fn setup() -> (TempDir, CacheStore, CacheKey) {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path().join(".depstash"));
        let key = CacheKey::from_bytes(br#"{"type":"application"}"#);
        (dir, store, key)
    }

    #[tokio::test]
    async fn miss_fetches_then_hit_restores() {
        let (dir, store, key) = setup();
        let calls = Arc::new(AtomicUsize::new(0));
        let home = dir.path().join("home");

        let first = sync(&store, &key, &home, || fetcher(&calls, false))
            .await
            .unwrap();
        assert!(!first.is_hit());
        assert!(first.warnings.is_empty());
        assert!(store.exists(&key));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // A fresh machine: empty home, same cache root
        let fresh_home = dir.path().join("fresh-home");
        let second = sync(&store, &key, &fresh_home, || fetcher(&calls, false))
            .await
            .unwrap();
        assert!(second.is_hit());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            fs::read_to_string(fresh_home.join("0.19.1/packages/registry.dat")).unwrap(),
            "fetched"
        );
    }

    #[tokio::test]
    async fn hit_never_builds_fetcher() {
        let (dir, store, key) = setup();
        let home = dir.path().join("home");
        fs::create_dir_all(store.slot_path(&key).join("0.19.1")).unwrap();

        let report = sync(&store, &key, &home, || {
            Err(StashError::FetchNotConfigured("application".to_string()))
        })
        .await
        .unwrap();

        assert!(report.is_hit());
        assert!(home.join("0.19.1").is_dir());
    }

    #[tokio::test]
    async fn fetch_failure_is_fatal_and_nothing_cached() {
        let (dir, store, key) = setup();
        let calls = Arc::new(AtomicUsize::new(0));

        let err = sync(&store, &key, &dir.path().join("home"), || {
            fetcher(&calls, true)
        })
        .await
        .unwrap_err();

        assert!(matches!(err, StashError::FetchFailed { .. }));
        assert!(!store.exists(&key));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn restore_failure_falls_back_to_fetch() {
        let (dir, store, key) = setup();
        let calls = Arc::new(AtomicUsize::new(0));
        let slot = store.slot_path(&key);
        fs::create_dir_all(&slot).unwrap();
        fs::write(slot.join("0.19.1"), "a file where the home has a directory").unwrap();

        let home = dir.path().join("home");
        fs::create_dir_all(home.join("0.19.1")).unwrap();

        let report = sync(&store, &key, &home, || fetcher(&calls, false))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!report.is_hit());
        assert!(matches!(
            report.warnings.first(),
            Some(StashError::RestoreFailed { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn populate_failure_is_a_warning() {
        let (dir, store, key) = setup();
        let calls = Arc::new(AtomicUsize::new(0));
        // A regular file where the cache root should be
        fs::write(store.root(), "blocked").unwrap();

        let report = sync(&store, &key, &dir.path().join("home"), || {
            fetcher(&calls, false)
        })
        .await
        .unwrap();

        assert!(matches!(
            report.outcome,
            SyncOutcome::Fetched { populated: None }
        ));
        assert!(matches!(
            report.warnings.as_slice(),
            [StashError::PopulateFailed { .. }]
        ));
    }
}
