//! Cache factory for creating blob store implementations
//!
//! Provides a factory pattern for building cache instances based on
//! configuration, so callers depend only on the `BlobCache` trait.

use crate::cache::file_store::FileBlobStore;
use crate::cache::noop_store::NoOpBlobStore;
use crate::cache::traits::BlobCache;
use crate::error::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the different cache types
#[derive(Debug, Clone)]
pub enum CacheConfig {
    /// File-backed cache rooted at `cache_dir`
    File {
        cache_dir: PathBuf,
        /// TTL applied to writes that don't specify one; `None` keeps the
        /// store default
        default_ttl: Option<Duration>,
    },
    /// No-operation cache (caching disabled)
    NoOp,
}

/// Factory for creating blob cache implementations
pub struct CacheFactory;

impl CacheFactory {
    /// Create a cache implementation based on configuration
    pub fn create(config: CacheConfig) -> Result<Arc<dyn BlobCache>> {
        match config {
            CacheConfig::File {
                cache_dir,
                default_ttl,
            } => {
                let store = match default_ttl {
                    Some(ttl) => FileBlobStore::with_default_ttl(cache_dir, ttl)?,
                    None => FileBlobStore::new(cache_dir)?,
                };
                Ok(Arc::new(store))
            }
            CacheConfig::NoOp => Ok(Arc::new(NoOpBlobStore::new())),
        }
    }

    /// Create a file-backed cache with the default TTL
    pub fn file(cache_dir: PathBuf) -> Result<Arc<dyn BlobCache>> {
        Self::create(CacheConfig::File {
            cache_dir,
            default_ttl: None,
        })
    }

    /// Create a no-op cache
    pub fn noop() -> Result<Arc<dyn BlobCache>> {
        Self::create(CacheConfig::NoOp)
    }
}
