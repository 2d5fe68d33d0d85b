//! File modification-timestamp probes
//!
//! Two flavors with deliberately different failure policies: the synchronous
//! probe runs on the decision path and treats anything other than a missing
//! file as fatal; the asynchronous probe runs during cache regeneration and
//! absorbs every failure into the [`MISSING_MTIME`] sentinel so one bad file
//! never aborts regenerating the rest.

use crate::cache::MISSING_MTIME;
use crate::error::{CacheError, CacheResult};
use std::fs::Metadata;
use std::io::ErrorKind;
use std::path::Path;
use std::time::UNIX_EPOCH;
use tracing::{debug, error};

fn mtime_millis(metadata: &Metadata) -> i64 {
    metadata
        .modified()
        .ok()
        .and_then(|mtime| mtime.duration_since(UNIX_EPOCH).ok())
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(MISSING_MTIME)
}

/// Probe a file's mtime, blocking. A missing file reports the sentinel.
pub fn probe_sync(path: &Path) -> CacheResult<i64> {
    match std::fs::metadata(path) {
        Ok(metadata) => Ok(mtime_millis(&metadata)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "could not probe mtime: file not found");
            Ok(MISSING_MTIME)
        }
        Err(e) => Err(CacheError::io(format!("stat {}", path.display()), e)),
    }
}

/// Probe a file's mtime without blocking. Any failure reports the sentinel.
pub async fn probe_async(path: &Path) -> i64 {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => mtime_millis(&metadata),
        Err(e) => {
            error!(path = %path.display(), %e, "mtime probe failed");
            MISSING_MTIME
        }
    }
}
