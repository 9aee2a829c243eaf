//! File-backed blob store implementation
//!
//! Persists decoded image bytes under the cache directory and tracks them in
//! a single JSON index document (`index.json`) beside the blobs. The index is
//! loaded once at construction and fully rewritten on every mutating
//! operation, which makes the store single-writer: two independent processes
//! must not share one cache directory without external coordination.

use crate::cache::traits::BlobCache;
use crate::cache::{CacheEntry, CacheStats};
use crate::content::{EmbeddedContent, blob_file_name};
use crate::error::{CacheError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::fs;
use tokio::sync::RwLock;

/// Default entry TTL: 30 days
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 86400);

const INDEX_FILE: &str = "index.json";

/// File-backed blob cache with a durable JSON index
pub struct FileBlobStore {
    cache_dir: PathBuf,
    default_ttl: Duration,
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl FileBlobStore {
    /// Open a store over `cache_dir`, creating the directory if needed
    ///
    /// The existing index is loaded from disk; a corrupt index is treated as
    /// an empty cache rather than a fatal error.
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        Self::with_default_ttl(cache_dir, DEFAULT_TTL)
    }

    /// Open a store with a custom default TTL for writes
    pub fn with_default_ttl(cache_dir: PathBuf, default_ttl: Duration) -> Result<Self> {
        if !cache_dir.exists() {
            std::fs::create_dir_all(&cache_dir)
                .map_err(|e| CacheError::io("creating cache directory", e))?;
        }

        // Entries carry absolute blob paths, so resolve the root up front.
        let cache_dir = cache_dir
            .canonicalize()
            .map_err(|e| CacheError::io("resolving cache directory", e))?;

        let entries = Self::load_index(&cache_dir);

        Ok(Self {
            cache_dir,
            default_ttl,
            entries: Arc::new(RwLock::new(entries)),
        })
    }

    /// Cache directory this store owns
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn index_path(cache_dir: &Path) -> PathBuf {
        cache_dir.join(INDEX_FILE)
    }

    /// Load the index document, recovering from absence or corruption with
    /// an empty cache
    fn load_index(cache_dir: &Path) -> HashMap<String, CacheEntry> {
        let index_file = Self::index_path(cache_dir);

        if !index_file.exists() {
            return HashMap::new();
        }

        let data = match std::fs::read_to_string(&index_file) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("Failed to read cache index, starting empty: {e}");
                return HashMap::new();
            }
        };

        match serde_json::from_str(&data) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Cache index is corrupt, starting empty: {e}");
                HashMap::new()
            }
        }
    }

    /// Rewrite the full index document
    ///
    /// Callers must hold the entries write lock for the whole
    /// read-modify-persist sequence.
    async fn persist_index(&self, entries: &HashMap<String, CacheEntry>) -> Result<()> {
        let data = serde_json::to_string_pretty(entries).map_err(CacheError::from)?;

        fs::write(Self::index_path(&self.cache_dir), data)
            .await
            .map_err(|e| CacheError::io("persisting cache index", e))?;

        Ok(())
    }
}

/// Best-effort blob file removal
///
/// A cache is not the source of truth: losing track of one stale file is
/// acceptable, so failures beyond NotFound are logged and swallowed.
async fn remove_blob_file(path: &Path) {
    if let Err(e) = fs::remove_file(path).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        log::warn!("Failed to remove cache file {}: {e}", path.display());
    }
}

#[async_trait::async_trait]
impl BlobCache for FileBlobStore {
    async fn has_live(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;

        let Some(entry) = entries.get(key) else {
            return Ok(false);
        };

        if entry.is_expired(SystemTime::now()) {
            log::debug!("Purging expired cache entry: {key}");
            let file_path = entry.file_path.clone();
            entries.remove(key);
            remove_blob_file(&file_path).await;
            self.persist_index(&entries).await?;
            return Ok(false);
        }

        if !fs::try_exists(&entry.file_path).await.unwrap_or(false) {
            log::debug!("Purging cache entry with missing file: {key}");
            entries.remove(key);
            self.persist_index(&entries).await?;
            return Ok(false);
        }

        Ok(true)
    }

    async fn resolve(&self, key: &str) -> Result<Option<String>> {
        if !self.has_live(key).await? {
            return Ok(None);
        }

        let entries = self.entries.read().await;
        Ok(entries.get(key).map(CacheEntry::file_url))
    }

    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if !self.has_live(key).await? {
            return Ok(None);
        }

        let path = {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) => entry.file_path.clone(),
                None => return Ok(None),
            }
        };

        let bytes = fs::read(&path)
            .await
            .map_err(|e| CacheError::io("reading blob file", e))?;
        Ok(Some(bytes))
    }

    async fn write(&self, key: &str, content: &str, ttl: Option<Duration>) -> Result<String> {
        // Reject malformed content before any filesystem mutation.
        let decoded = EmbeddedContent::parse(content)?;

        let file_path = self
            .cache_dir
            .join(blob_file_name(key, decoded.extension()));

        let mut entries = self.entries.write().await;

        fs::write(&file_path, &decoded.bytes)
            .await
            .map_err(|e| CacheError::io("writing blob file", e))?;

        let entry = CacheEntry {
            id: key.to_string(),
            file_path: file_path.clone(),
            created_at: SystemTime::now(),
            ttl: ttl.unwrap_or(self.default_ttl),
        };

        let url = entry.file_url();
        entries.insert(key.to_string(), entry);
        self.persist_index(&entries).await?;

        log::debug!("Cached {} bytes under key {key}", decoded.bytes.len());
        Ok(url)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().await;

        if let Some(entry) = entries.remove(key) {
            remove_blob_file(&entry.file_path).await;
            self.persist_index(&entries).await?;
        }

        Ok(())
    }

    async fn cleanup(&self) -> Result<usize> {
        let mut entries = self.entries.write().await;
        let now = SystemTime::now();

        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            if let Some(entry) = entries.remove(key) {
                remove_blob_file(&entry.file_path).await;
            }
        }

        if !expired.is_empty() {
            self.persist_index(&entries).await?;
            log::debug!("Cleanup removed {} expired cache entries", expired.len());
        }

        Ok(expired.len())
    }

    async fn clear(&self) -> Result<usize> {
        let mut entries = self.entries.write().await;

        let removed = entries.len();
        for entry in entries.values() {
            remove_blob_file(&entry.file_path).await;
        }
        entries.clear();

        self.persist_index(&entries).await?;
        Ok(removed)
    }

    async fn stats(&self) -> Result<CacheStats> {
        let entries = self.entries.read().await;

        let mut total_size_bytes = 0;
        for entry in entries.values() {
            // Entries whose file went missing are skipped, not purged; the
            // read and cleanup paths own purging.
            if let Ok(metadata) = fs::metadata(&entry.file_path).await {
                total_size_bytes += metadata.len();
            }
        }

        Ok(CacheStats {
            entry_count: entries.len(),
            total_size_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use tempfile::TempDir;

    fn png_uri(bytes: &[u8]) -> String {
        format!("data:image/png;base64,{}", BASE64.encode(bytes))
    }

    fn store(dir: &TempDir) -> FileBlobStore {
        FileBlobStore::new(dir.path().to_path_buf()).unwrap()
    }

    #[tokio::test]
    async fn test_write_then_resolve_and_read() {
        let dir = TempDir::new().unwrap();
        let cache = store(&dir);
        let payload = vec![0x89, 0x50, 0x4e, 0x47];

        let url = cache
            .write("spooky-playground-portrait", &png_uri(&payload), None)
            .await
            .unwrap();

        assert!(url.starts_with("file://"));
        assert!(cache.has_live("spooky-playground-portrait").await.unwrap());
        assert_eq!(
            cache.resolve("spooky-playground-portrait").await.unwrap(),
            Some(url.clone())
        );

        let bytes = cache
            .read_bytes("spooky-playground-portrait")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bytes, payload);

        // The reference resolves to a real file holding the decoded bytes.
        let path = url.strip_prefix("file://").unwrap();
        assert_eq!(std::fs::read(path).unwrap(), payload);
    }

    #[tokio::test]
    async fn test_stats_concrete_scenario() {
        let dir = TempDir::new().unwrap();
        let cache = store(&dir);

        cache
            .write("spooky-playground-portrait", "data:image/png;base64,AAAA", None)
            .await
            .unwrap();

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.entry_count, 1);
        // "AAAA" decodes to three zero bytes
        assert_eq!(stats.total_size_bytes, 3);
    }

    #[tokio::test]
    async fn test_unknown_key_is_not_live() {
        let dir = TempDir::new().unwrap();
        let cache = store(&dir);

        assert!(!cache.has_live("never-written").await.unwrap());
        assert_eq!(cache.resolve("never-written").await.unwrap(), None);
        assert_eq!(cache.read_bytes("never-written").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ttl_expiration_purges_entry() {
        let dir = TempDir::new().unwrap();
        let cache = store(&dir);

        cache
            .write(
                "fleeting-portrait",
                &png_uri(b"x"),
                Some(Duration::from_millis(50)),
            )
            .await
            .unwrap();
        assert!(cache.has_live("fleeting-portrait").await.unwrap());

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(!cache.has_live("fleeting-portrait").await.unwrap());
        // The expired entry was removed from the index, not just hidden.
        assert_eq!(cache.stats().await.unwrap().entry_count, 0);
    }

    #[tokio::test]
    async fn test_self_healing_on_missing_file() {
        let dir = TempDir::new().unwrap();
        let cache = store(&dir);

        let url = cache
            .write("vanishing-portrait", &png_uri(b"bytes"), None)
            .await
            .unwrap();

        // Delete the blob out-of-band.
        std::fs::remove_file(url.strip_prefix("file://").unwrap()).unwrap();

        assert!(!cache.has_live("vanishing-portrait").await.unwrap());
        assert_eq!(cache.stats().await.unwrap().entry_count, 0);
    }

    #[tokio::test]
    async fn test_overwrite_same_key_last_write_wins() {
        let dir = TempDir::new().unwrap();
        let cache = store(&dir);

        cache
            .write("cat-portrait", &png_uri(b"first"), None)
            .await
            .unwrap();
        cache
            .write("cat-portrait", &png_uri(b"second"), None)
            .await
            .unwrap();

        let bytes = cache.read_bytes("cat-portrait").await.unwrap().unwrap();
        assert_eq!(bytes, b"second");
        assert_eq!(cache.stats().await.unwrap().entry_count, 1);
    }

    #[tokio::test]
    async fn test_malformed_content_rejected_before_mutation() {
        let dir = TempDir::new().unwrap();
        let cache = store(&dir);

        let err = cache
            .write("bad-portrait", "not a data uri", None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Malformed embedded content"));

        assert_eq!(cache.stats().await.unwrap().entry_count, 0);
        // Nothing was written: no blob files and no index document.
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert!(names.is_empty(), "unexpected files: {names:?}");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let cache = store(&dir);

        let url = cache
            .write("doomed-portrait", &png_uri(b"bytes"), None)
            .await
            .unwrap();

        cache.delete("doomed-portrait").await.unwrap();
        assert!(!cache.has_live("doomed-portrait").await.unwrap());
        assert!(!std::path::Path::new(url.strip_prefix("file://").unwrap()).exists());

        // Deleting an absent key is a no-op.
        cache.delete("doomed-portrait").await.unwrap();
        cache.delete("never-written").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_tolerates_missing_file() {
        let dir = TempDir::new().unwrap();
        let cache = store(&dir);

        let url = cache
            .write("half-gone-portrait", &png_uri(b"bytes"), None)
            .await
            .unwrap();
        std::fs::remove_file(url.strip_prefix("file://").unwrap()).unwrap();

        cache.delete("half-gone-portrait").await.unwrap();
        assert_eq!(cache.stats().await.unwrap().entry_count, 0);
    }

    #[tokio::test]
    async fn test_cleanup_removes_exactly_the_expired() {
        let dir = TempDir::new().unwrap();
        let cache = store(&dir);

        cache
            .write("live-one", &png_uri(b"a"), Some(Duration::from_secs(3600)))
            .await
            .unwrap();
        cache
            .write("stale-one", &png_uri(b"b"), Some(Duration::from_millis(10)))
            .await
            .unwrap();
        cache
            .write("stale-two", &png_uri(b"c"), Some(Duration::from_millis(10)))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;

        let removed = cache.cleanup().await.unwrap();
        assert_eq!(removed, 2);

        assert!(cache.resolve("live-one").await.unwrap().is_some());
        assert!(cache.resolve("stale-one").await.unwrap().is_none());
        assert!(cache.resolve("stale-two").await.unwrap().is_none());
        assert_eq!(cache.stats().await.unwrap().entry_count, 1);
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let dir = TempDir::new().unwrap();
        let cache = store(&dir);

        cache.write("one", &png_uri(b"a"), None).await.unwrap();
        cache.write("two", &png_uri(b"b"), None).await.unwrap();

        let removed = cache.clear().await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(cache.stats().await.unwrap(), CacheStats::default());
    }

    #[tokio::test]
    async fn test_entries_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let payload = b"persistent bytes".to_vec();

        {
            let cache = store(&dir);
            cache
                .write("durable-portrait", &png_uri(&payload), None)
                .await
                .unwrap();
        }

        let reopened = store(&dir);
        assert!(reopened.has_live("durable-portrait").await.unwrap());
        assert_eq!(
            reopened
                .read_bytes("durable-portrait")
                .await
                .unwrap()
                .unwrap(),
            payload
        );
    }

    #[tokio::test]
    async fn test_corrupt_index_is_treated_as_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.json"), "{not json").unwrap();

        let cache = store(&dir);
        assert_eq!(cache.stats().await.unwrap().entry_count, 0);

        // The store keeps working after recovery.
        cache.write("fresh", &png_uri(b"x"), None).await.unwrap();
        assert!(cache.has_live("fresh").await.unwrap());
    }

    #[tokio::test]
    async fn test_stats_skips_missing_files_without_purging() {
        let dir = TempDir::new().unwrap();
        let cache = store(&dir);

        cache.write("kept", &png_uri(b"abcd"), None).await.unwrap();
        let url = cache.write("lost", &png_uri(b"efgh"), None).await.unwrap();
        std::fs::remove_file(url.strip_prefix("file://").unwrap()).unwrap();

        let stats = cache.stats().await.unwrap();
        // Both entries still counted; only the present file contributes bytes.
        assert_eq!(stats.entry_count, 2);
        assert_eq!(stats.total_size_bytes, 4);
    }
}
