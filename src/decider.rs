//! Per-entry rebuild verdicts
//!
//! Runs inline in the host's single-threaded entry-scheduling pass, so all
//! probing here is synchronous and must complete before the scheduling step
//! returns.

use crate::cache::EntryRecord;
use crate::error::CacheResult;
use crate::probe;
use crate::store::CacheStore;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Decide whether an entry point needs rebuilding
///
/// Policy, short-circuiting on the first hit:
/// 1. no cached record for the entry → rebuild (first-ever build, or the
///    cache was missing);
/// 2. any of the entry's own declared source files has an mtime differing
///    from the cached value → rebuild;
/// 3. any file in the cached record (the full transitive set known from the
///    last build) has an mtime differing from the cached value → rebuild;
/// 4. otherwise the entry is fresh.
///
/// A path the record has never seen compares unequal to any live timestamp.
/// A file missing both now and at cache time (sentinel on both sides) counts
/// as unchanged, so unresolvable optional dependencies do not rebuild
/// forever.
pub fn should_rebuild(
    store: &mut CacheStore,
    entry_name: &str,
    direct_deps: &[PathBuf],
) -> CacheResult<bool> {
    let cache = store.load()?;

    let Some(record) = cache.entry(entry_name) else {
        debug!(entry = entry_name, "no cached record, rebuilding");
        return Ok(true);
    };

    // The entry's own declared source files. Catches edits to the entry
    // itself before the transitive pass even starts.
    for path in direct_deps {
        if is_modified(record, path)? {
            return Ok(true);
        }
    }

    // The full transitive set known from the last successful build. Catches
    // edits to imported modules the declared list does not mention.
    for path in record.keys() {
        if is_modified(record, path)? {
            return Ok(true);
        }
    }

    debug!(entry = entry_name, "all dependency timestamps match");
    Ok(false)
}

fn is_modified(record: &EntryRecord, path: &Path) -> CacheResult<bool> {
    let live = probe::probe_sync(path)?;
    let cached = record.get(path).copied();
    if cached != Some(live) {
        debug!(
            path = %path.display(),
            live,
            cached = ?cached,
            "dependency was modified"
        );
        return Ok(true);
    }
    Ok(false)
}
