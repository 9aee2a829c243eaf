//! Scenegen Core Library
//!
//! This is the core library for the scenegen pipeline, providing cache key
//! derivation, a durable blob cache for generated images, the image provider
//! seam, and the cache-aside service that ties them together.

pub mod cache;
pub mod content;
pub mod error;
pub mod generation;
pub mod keys;
pub mod service;

// Re-export main types
pub use cache::{
    BlobCache, CacheConfig, CacheEntry, CacheFactory, CacheStats, FileBlobStore, NoOpBlobStore,
};
pub use content::EmbeddedContent;
pub use error::{CacheError, Error, GenerationError, Result};
pub use generation::{GeneratedImage, HttpImageProvider, ImageProvider, StyleTemplate};
pub use keys::{Orientation, derive_cache_key};
pub use service::{ImageAsset, SceneImageService};
