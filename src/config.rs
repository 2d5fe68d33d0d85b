//! Plugin configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// Subdirectory created under the configured cache directory
const CACHE_SUBDIR: &str = ".build-cache";

/// Name of the cache document inside the cache subdirectory
const CACHE_FILE_NAME: &str = "cache.json";

/// Verbosity of the plugin's diagnostic tracing
///
/// The plugin only emits `tracing` events; it never installs a subscriber.
/// Hosts that honor this option convert it with [`LogLevel::level_filter`]
/// and wire the result into their own subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Silent
    #[default]
    None,
    /// Only absorbed write and probe failures
    Error,
    /// Every decision and cache mutation
    Debug,
}

impl LogLevel {
    /// Tracing filter equivalent of this level
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::None => LevelFilter::OFF,
            Self::Error => LevelFilter::ERROR,
            Self::Debug => LevelFilter::DEBUG,
        }
    }
}

/// Constructor-supplied plugin options
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Base directory under which the cache subdirectory is created
    pub cache_directory: PathBuf,
    /// Diagnostic verbosity, default silent
    pub log_level: LogLevel,
}

impl CacheConfig {
    pub fn new(cache_directory: impl Into<PathBuf>) -> Self {
        Self {
            cache_directory: cache_directory.into(),
            log_level: LogLevel::default(),
        }
    }

    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    /// Directory holding the cache document
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_directory.join(CACHE_SUBDIR)
    }

    /// Full path of the cache document
    pub fn cache_file(&self) -> PathBuf {
        self.cache_dir().join(CACHE_FILE_NAME)
    }
}
