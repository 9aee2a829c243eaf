//! Image generation collaborator seam
//!
//! The cache layer only depends on the `ImageProvider` trait; the concrete
//! HTTP provider lives in the `http` submodule. Providers are costly,
//! rate-limited and not idempotent by default, which is exactly why the
//! cache-aside service exists.

use crate::error::GenerationError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod http;

pub use http::HttpImageProvider;

/// A freshly generated image
///
/// `url` is an embedded `data:<mediaType>;base64,<payload>` representation;
/// the cache-aside service replaces it with a durable `file://` reference
/// after a successful cache write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Trait for image generation providers
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generate an image for `query` at the requested dimensions
    ///
    /// Cancellation and timeouts follow the provider's own transport
    /// contract; the cache layer never retries.
    async fn generate(
        &self,
        query: &str,
        width: u32,
        height: u32,
    ) -> std::result::Result<GeneratedImage, GenerationError>;
}

/// Prompt style template with a `{query}` placeholder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleTemplate(String);

impl StyleTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Substitute the query into the template
    pub fn render(&self, query: &str) -> String {
        self.0.replace("{query}", query)
    }
}

impl Default for StyleTemplate {
    fn default() -> Self {
        Self::new(
            "A moody, cinematic illustration of {query}, muted colors, soft light, no text",
        )
    }
}
