//! Durable, lazily-loaded store of per-entry dependency timestamps
//!
//! The store reads the cache document at most once per build cycle and keeps
//! it as an immutable in-memory snapshot until [`CacheStore::reset`] is
//! called at the start of the next cycle.

use crate::cache::{Cache, EntryPointInfo, EntryRecord};
use crate::error::{CacheError, CacheResult};
use crate::probe;
use futures_util::future::join_all;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, error, info};

pub struct CacheStore {
    cache_file: PathBuf,
    snapshot: Option<Cache>,
}

impl CacheStore {
    pub fn new(cache_file: PathBuf) -> Self {
        Self {
            cache_file,
            snapshot: None,
        }
    }

    /// Drop the in-memory snapshot so the next read reloads from disk
    ///
    /// Called once at the start of every build cycle: the file may have been
    /// rewritten at the end of the previous cycle, and stale in-memory state
    /// must not leak across cycles.
    pub fn reset(&mut self) {
        debug!("cache snapshot reset");
        self.snapshot = None;
    }

    /// The in-memory snapshot, loading from disk on first access
    ///
    /// A missing cache file is not an error; it just means everything gets
    /// rebuilt. Any other read or parse failure is corruption the store
    /// cannot safely recover from and is propagated.
    pub fn load(&mut self) -> CacheResult<&Cache> {
        if self.snapshot.is_none() {
            self.snapshot = Some(self.read_from_disk()?);
        }
        Ok(self.snapshot.get_or_insert_with(Cache::new))
    }

    fn read_from_disk(&self) -> CacheResult<Cache> {
        let data = match std::fs::read_to_string(&self.cache_file) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("no cache file found, rebuilding everything");
                return Ok(Cache::new());
            }
            Err(e) => {
                return Err(CacheError::io(
                    format!("reading cache file {}", self.cache_file.display()),
                    e,
                ))
            }
        };

        let cache: Cache = serde_json::from_str(&data).map_err(|e| CacheError::CacheCorrupt {
            path: self.cache_file.clone(),
            source: e,
        })?;
        debug!(entries = cache.len(), "cache loaded from disk");
        Ok(cache)
    }

    /// Compute a full replacement cache from live filesystem timestamps
    ///
    /// Every dependency of every entry is probed concurrently; a probe
    /// failure resolves to the missing-file sentinel rather than failing the
    /// whole regeneration. The result is the current snapshot overlaid with a
    /// fresh record per regenerated entry; entries not named in `entry_infos`
    /// keep their old records verbatim. Pure with respect to disk.
    // TODO: records of entries dropped from the build configuration are never
    // removed; pruning needs the host to hand over the full configured entry
    // list, not just the entries of this cycle.
    pub async fn regenerate(&mut self, entry_infos: &[EntryPointInfo]) -> CacheResult<Cache> {
        let mut next = self.load()?.clone();

        let records = join_all(entry_infos.iter().map(|info| async move {
            let probes = join_all(info.dependency_set.iter().map(|path| async move {
                (path.clone(), probe::probe_async(path).await)
            }))
            .await;
            (info.name.clone(), probes.into_iter().collect::<EntryRecord>())
        }))
        .await;

        for (name, record) in records {
            debug!(entry = %name, files = record.len(), "regenerated entry record");
            next.insert(name, record);
        }

        Ok(next)
    }

    /// Serialize and write a cache to the backing file
    ///
    /// Write failures are logged and absorbed: the cache is an optimization,
    /// and a failed write must never fail the build. At worst the next build
    /// rebuilds everything.
    pub async fn persist(&self, cache: &Cache) {
        let json = match serde_json::to_string(cache) {
            Ok(json) => json,
            Err(e) => {
                error!(%e, "failed to serialize cache");
                return;
            }
        };

        match tokio::fs::write(&self.cache_file, json).await {
            Ok(()) => {
                debug!(path = %self.cache_file.display(), entries = cache.len(), "cache persisted")
            }
            Err(e) => {
                error!(path = %self.cache_file.display(), %e, "failed to write cache file")
            }
        }
    }
}
