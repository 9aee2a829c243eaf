//! No-operation blob cache implementation
//!
//! A cache that doesn't store anything, useful for testing or when caching
//! is disabled. Every lookup misses; writes validate their content and hand
//! the embedded representation straight back as the reference.

use crate::cache::traits::BlobCache;
use crate::cache::CacheStats;
use crate::content::EmbeddedContent;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// A blob cache that doesn't cache anything
pub struct NoOpBlobStore;

impl NoOpBlobStore {
    /// Create a new no-op store
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BlobCache for NoOpBlobStore {
    async fn has_live(&self, _key: &str) -> Result<bool> {
        Ok(false)
    }

    async fn resolve(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn read_bytes(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn write(&self, _key: &str, content: &str, _ttl: Option<Duration>) -> Result<String> {
        // Still reject malformed content so callers observe the same write
        // contract as the durable store.
        EmbeddedContent::parse(content)?;
        Ok(content.to_string())
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    async fn cleanup(&self) -> Result<usize> {
        Ok(0)
    }

    async fn clear(&self) -> Result<usize> {
        Ok(0)
    }

    async fn stats(&self) -> Result<CacheStats> {
        Ok(CacheStats::default())
    }
}

impl Default for NoOpBlobStore {
    fn default() -> Self {
        Self::new()
    }
}
