//! HTTP image generation provider
//!
//! Talks to an OpenAI-compatible image generation endpoint and returns the
//! result as embedded base64 content. Error responses are mapped onto the
//! `GenerationError` taxonomy; retry policy belongs to the caller, not here.

use crate::error::GenerationError;
use crate::generation::{GeneratedImage, ImageProvider, StyleTemplate};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

/// HTTP provider for an OpenAI-compatible `/images/generations` endpoint
pub struct HttpImageProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    style: StyleTemplate,
}

#[derive(Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: String,
    n: u32,
    size: String,
    response_format: &'a str,
}

#[derive(Deserialize)]
struct GenerationResponse {
    data: Vec<GenerationDatum>,
}

#[derive(Deserialize)]
struct GenerationDatum {
    b64_json: String,
}

impl HttpImageProvider {
    /// Create a provider against `base_url` (e.g. `https://api.openai.com/v1`)
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            style: StyleTemplate::default(),
        }
    }

    /// Use a custom prompt style template
    pub fn with_style(mut self, style: StyleTemplate) -> Self {
        self.style = style;
        self
    }
}

#[async_trait]
impl ImageProvider for HttpImageProvider {
    async fn generate(
        &self,
        query: &str,
        width: u32,
        height: u32,
    ) -> std::result::Result<GeneratedImage, GenerationError> {
        let prompt = self.style.render(query);
        log::debug!("Requesting {width}x{height} image for query: {query}");

        let request = GenerationRequest {
            model: &self.model,
            prompt,
            n: 1,
            size: format!("{width}x{height}"),
            response_format: "b64_json",
        };

        let response = self
            .client
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::from_status(status.as_u16(), message));
        }

        let body: GenerationResponse = response.json().await?;
        let Some(datum) = body.data.into_iter().next() else {
            return Err(GenerationError::EmptyResult);
        };

        // Content-derived id; stable for identical payloads.
        let digest = format!("{:x}", Sha1::digest(datum.b64_json.as_bytes()));
        let id = format!("img-{}", &digest[..12]);

        Ok(GeneratedImage {
            id,
            url: format!("data:image/png;base64,{}", datum.b64_json),
            width,
            height,
        })
    }
}
