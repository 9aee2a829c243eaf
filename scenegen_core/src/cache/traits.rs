//! Blob cache trait definition

use crate::cache::CacheStats;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Trait for durable key→bytes cache implementations
///
/// Implementations own their index and backing storage exclusively; no other
/// component writes to the cache directory. A single store instance is safe
/// to share across tasks, but two independent processes must not share one
/// cache directory (single-writer assumption).
#[async_trait]
pub trait BlobCache: Send + Sync {
    /// Whether a live entry exists for `key`
    ///
    /// Returns true iff the entry exists, is not expired, and its backing
    /// file is present on disk. An expired entry or one whose file went
    /// missing is purged from the index as a side effect (self-healing) and
    /// reported as not live.
    async fn has_live(&self, key: &str) -> Result<bool>;

    /// Durable `file://` reference to the stored content, if live
    ///
    /// Does not read file bytes.
    async fn resolve(&self, key: &str) -> Result<Option<String>>;

    /// Raw stored bytes, if live
    ///
    /// Used only when an embedded (non-file) representation is required.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store embedded content under `key` and return a durable reference
    ///
    /// `content` is a `data:<mediaType>;base64,<payload>` URI; malformed
    /// content is rejected before any filesystem mutation. Overwriting a
    /// live key is permitted (last write wins). `ttl` defaults to the
    /// store's configured TTL.
    async fn write(&self, key: &str, content: &str, ttl: Option<Duration>) -> Result<String>;

    /// Remove the entry for `key`
    ///
    /// File removal is best-effort; a missing file is tolerated. No-op if
    /// the key is absent.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Remove every expired entry, returning the count removed
    ///
    /// Live entries are not touched.
    async fn cleanup(&self) -> Result<usize>;

    /// Remove every entry regardless of TTL, returning the count removed
    async fn clear(&self) -> Result<usize>;

    /// Entry count and total on-disk size
    ///
    /// Entries whose file is missing are skipped in the byte total but are
    /// not purged by this call; only the read and cleanup paths purge.
    async fn stats(&self) -> Result<CacheStats>;
}
