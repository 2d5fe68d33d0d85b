//! Incremental rebuild decisions for build entry points
//!
//! Given a named entry point and the source files it depends on, decides
//! whether the entry must be recompiled by comparing live file modification
//! timestamps against a per-entry cache persisted from the previous build.
//!
//! One cycle per build invocation: the cache snapshot is reset, every
//! candidate entry is filtered through [`RebuildPlugin::filter_entry`], and
//! once the host has resolved the final dependency sets of the rebuilt
//! entries, [`RebuildPlugin::complete_cycle`] regenerates the cache from
//! live timestamps and writes it back to disk.

pub mod cache;
pub mod config;
pub mod decider;
pub mod error;
pub mod plugin;
pub mod probe;
pub mod store;

pub use cache::{Cache, EntryPointInfo, EntryRecord, MISSING_MTIME};
pub use config::{CacheConfig, LogLevel};
pub use error::{CacheError, CacheResult};
pub use plugin::RebuildPlugin;
pub use store::CacheStore;
