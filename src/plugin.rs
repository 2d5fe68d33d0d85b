//! Host integration layer
//!
//! The host build tool sees two integration points: an interception method
//! called once per candidate entry before scheduling, and a completion
//! method called once per cycle after dependency resolution. Both are plain
//! methods taking explicit callbacks, instead of hook interception patched
//! onto a live compilation object.

use crate::cache::EntryPointInfo;
use crate::config::CacheConfig;
use crate::decider;
use crate::error::{CacheError, CacheResult};
use crate::store::CacheStore;
use std::path::PathBuf;
use tracing::debug;

pub struct RebuildPlugin {
    store: CacheStore,
    rebuilt_any: bool,
}

impl RebuildPlugin {
    /// Create the plugin, bootstrapping the cache subdirectory if absent
    pub fn new(config: &CacheConfig) -> CacheResult<Self> {
        let cache_dir = config.cache_dir();
        std::fs::create_dir_all(&cache_dir).map_err(|e| {
            CacheError::io(format!("creating cache directory {}", cache_dir.display()), e)
        })?;

        Ok(Self {
            store: CacheStore::new(config.cache_file()),
            rebuilt_any: false,
        })
    }

    /// Start a new build cycle
    ///
    /// Discards the previous cycle's snapshot so this cycle observes the
    /// state written at the end of the last one.
    pub fn begin_cycle(&mut self) {
        debug!("build cycle started");
        self.store.reset();
        self.rebuilt_any = false;
    }

    /// Interception point, called once per candidate entry
    ///
    /// Invokes `schedule` when the entry must be rebuilt and `skip` when the
    /// cached timestamps show no change; exactly one of the two runs. The
    /// fatal corrupt-cache error from the lazy load propagates to the host
    /// before either callback fires.
    pub fn filter_entry<S, K>(
        &mut self,
        entry_name: &str,
        direct_deps: &[PathBuf],
        schedule: S,
        skip: K,
    ) -> CacheResult<()>
    where
        S: FnOnce(),
        K: FnOnce(),
    {
        if decider::should_rebuild(&mut self.store, entry_name, direct_deps)? {
            debug!(entry = entry_name, "scheduling rebuild");
            self.rebuilt_any = true;
            schedule();
        } else {
            debug!(entry = entry_name, "suppressing rebuild");
            skip();
        }
        Ok(())
    }

    /// Post-resolution hook, called once per cycle with the final dependency
    /// sets of all entries
    ///
    /// Regenerates the cache from live timestamps and writes it back, but
    /// only when this cycle actually rebuilt something; otherwise the file on
    /// disk is already accurate.
    pub async fn complete_cycle(&mut self, entry_infos: &[EntryPointInfo]) -> CacheResult<()> {
        if !self.rebuilt_any {
            debug!("no entries rebuilt this cycle, cache left untouched");
            return Ok(());
        }

        let next = self.store.regenerate(entry_infos).await?;
        self.store.persist(&next).await;
        Ok(())
    }
}
