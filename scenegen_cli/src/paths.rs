//! Centralized path resolution for configuration and cache data

use std::path::PathBuf;

/// Default cache directory for generated images
///
/// Honors `XDG_CACHE_HOME` through `dirs`, falling back to a local
/// directory when no home is available.
pub fn get_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|d| d.join("scenegen/images"))
        .unwrap_or_else(|| PathBuf::from(".scenegen/cache"))
}

/// Default configuration file path
pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("scenegen/config.toml"))
        .unwrap_or_else(|| PathBuf::from(".scenegen/config.toml"))
}
