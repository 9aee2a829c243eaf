//! Cache-aside service for scene image generation
//!
//! Wraps an `ImageProvider` with the blob cache so that repeated requests
//! for the same logical content reuse prior work instead of re-invoking the
//! costly, rate-limited generation call. Concurrent requests for the same
//! key are coalesced through a per-key in-flight lock, so at most one
//! generation is in flight per key within a process.

use crate::cache::BlobCache;
use crate::error::Result;
use crate::generation::ImageProvider;
use crate::keys::{Orientation, derive_cache_key};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The asset returned to callers
///
/// A cache hit and a cache miss return the identical shape; only how `url`
/// resolves to bytes differs (stored `file://` reference vs. freshly
/// produced embedded content), so downstream consumers stay agnostic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAsset {
    pub id: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Scene image service that wraps the provider with caching
pub struct SceneImageService {
    /// The external generation collaborator
    provider: Arc<dyn ImageProvider>,
    /// The blob cache implementation to use
    cache: Arc<dyn BlobCache>,
    /// Per-key in-flight locks; entries are dropped once no fetch for the
    /// key is in flight
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    /// Enable verbose logging
    verbose: bool,
}

impl SceneImageService {
    /// Create a new service over a provider and a cache
    pub fn new(provider: Arc<dyn ImageProvider>, cache: Arc<dyn BlobCache>) -> Self {
        Self {
            provider,
            cache,
            in_flight: Mutex::new(HashMap::new()),
            verbose: false,
        }
    }

    /// Create a new service with verbose logging
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Fetch the image for `terms` and `orientation`, generating on a miss
    ///
    /// `duration_hint` is the downstream animation duration; it does not
    /// participate in caching and is passed through untouched.
    ///
    /// For two calls with identical inputs where the first completed
    /// successfully, the second within the TTL window resolves to
    /// byte-identical content without invoking the provider again, including
    /// across process restarts. Generation errors propagate verbatim; cache
    /// write failures degrade to returning the uncached result.
    pub async fn fetch<S: AsRef<str>>(
        &self,
        terms: &[S],
        orientation: Orientation,
        duration_hint: f64,
    ) -> Result<ImageAsset> {
        let key = derive_cache_key(terms, orientation);

        if self.verbose {
            log::debug!("Fetching scene image {key} (duration hint {duration_hint}s)");
        }

        // Single-flight: concurrent callers for the same key serialize here;
        // the second caller finds the first's result already cached.
        let lock = self.key_lock(&key).await;
        let guard = lock.lock().await;

        let result = self.fetch_locked(&key, terms, orientation).await;

        drop(guard);
        self.release_key_lock(&key, &lock).await;

        result
    }

    async fn fetch_locked<S: AsRef<str>>(
        &self,
        key: &str,
        terms: &[S],
        orientation: Orientation,
    ) -> Result<ImageAsset> {
        let (width, height) = orientation.dimensions();

        if self.cache.has_live(key).await?
            && let Some(url) = self.cache.resolve(key).await?
        {
            if self.verbose {
                log::debug!("Cache hit for {key}");
            }
            return Ok(ImageAsset {
                id: key.to_string(),
                url,
                width,
                height,
            });
        }

        if self.verbose {
            log::debug!("Cache miss for {key}, invoking image provider");
        }

        let query = terms
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        let generated = self.provider.generate(&query, width, height).await?;

        // The write happens only after a complete result: a failed or
        // canceled generation never leaves a partial entry behind.
        match self.cache.write(key, &generated.url, None).await {
            Ok(stored_url) => Ok(ImageAsset {
                id: key.to_string(),
                url: stored_url,
                width: generated.width,
                height: generated.height,
            }),
            Err(e) => {
                // A cache failure must never become a generation failure.
                log::warn!("Failed to cache generated image for {key}: {e}");
                Ok(ImageAsset {
                    id: generated.id,
                    url: generated.url,
                    width: generated.width,
                    height: generated.height,
                })
            }
        }
    }

    async fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut table = self.in_flight.lock().await;
        table
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn release_key_lock(&self, key: &str, lock: &Arc<Mutex<()>>) {
        let mut table = self.in_flight.lock().await;
        // Two strong references mean the table's copy and ours: no other
        // caller is waiting, so the entry can go.
        if Arc::strong_count(lock) <= 2 {
            table.remove(key);
        }
    }
}

// Service tests live in tests/service_tests.rs: they use the
// `MockImageProvider` from `scenegen-test-utils`, which implements the
// `ImageProvider` trait from the library build and therefore cannot be
// used from a unit-test module compiled into a second copy of this crate.
