//! Durable blob cache for generated scene images
//!
//! Key→bytes storage with TTL expiration behind a trait-based abstraction.
//! The file-backed store owns a JSON index document beside the blob files and
//! is the only component that mutates the cache directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

pub mod factory;
pub mod file_store;
pub mod noop_store;
pub mod traits;

pub use factory::{CacheConfig, CacheFactory};
pub use file_store::FileBlobStore;
pub use noop_store::NoOpBlobStore;
pub use traits::BlobCache;

/// Persisted record for one cached blob
///
/// Created on a successful write and read-only thereafter except for
/// deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The cache key this entry belongs to
    pub id: String,
    /// Absolute path of the backing blob file
    pub file_path: PathBuf,
    /// Write time
    pub created_at: SystemTime,
    /// Time-to-live relative to `created_at`
    pub ttl: Duration,
}

impl CacheEntry {
    /// Whether this entry's age exceeds its TTL at `now`
    pub fn is_expired(&self, now: SystemTime) -> bool {
        now.duration_since(self.created_at)
            .is_ok_and(|age| age > self.ttl)
    }

    /// Durable file-scheme reference to the backing file
    pub fn file_url(&self) -> String {
        format!("file://{}", self.file_path.display())
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of index entries
    pub entry_count: usize,
    /// Sum of blob file sizes on disk; entries whose file is missing are
    /// skipped
    pub total_size_bytes: u64,
}
